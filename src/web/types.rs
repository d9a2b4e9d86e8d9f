//! Request and response types for the conversion API.

use serde::{Deserialize, Serialize};

use crate::convert::Conversion;

/// Body of `POST /data`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertRequest {
    /// The ABC tune to convert.
    pub userdata: String,
    #[serde(default)]
    pub args: ConvertArgs,
}

/// Conversion switches sent alongside the tune.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ConvertArgs {
    /// Keep the tune's own pickup-measure numbering instead of renumbering
    /// from 1.
    #[serde(rename = "hasPickup", default)]
    pub has_pickup: bool,
}

/// Body of every `POST /data` response.
///
/// Either the three outputs are filled and `error` is empty, or the outputs
/// are empty and `error` says why.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertResponse {
    pub braille: String,
    #[serde(rename = "asciiBraille")]
    pub ascii_braille: String,
    pub musicxml: String,
    pub error: String,
}

impl ConvertResponse {
    pub fn success(conversion: Conversion) -> Self {
        Self {
            braille: conversion.braille,
            ascii_braille: conversion.ascii_braille,
            musicxml: conversion.musicxml,
            error: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_args_default_to_no_pickup() {
        let request: ConvertRequest = serde_json::from_str(r#"{"userdata": "K: C"}"#).unwrap();
        assert!(!request.args.has_pickup);

        let request: ConvertRequest =
            serde_json::from_str(r#"{"userdata": "K: C", "args": {"hasPickup": true}}"#).unwrap();
        assert!(request.args.has_pickup);
    }

    #[test]
    fn test_failure_leaves_outputs_empty() {
        let response = ConvertResponse::failure("Invalid syntax. Unable to convert.");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["braille"], "");
        assert_eq!(json["asciiBraille"], "");
        assert_eq!(json["musicxml"], "");
        assert_eq!(json["error"], "Invalid syntax. Unable to convert.");
    }
}
