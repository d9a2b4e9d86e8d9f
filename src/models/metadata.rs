//! Score metadata block
//!
//! Carries the ABC information fields that survive into the outputs. The
//! catalog number is kept separate so the conversion pipeline can drop it
//! before braille transcription.

use serde::{Serialize, Deserialize};

/// Header metadata mapped from ABC information fields.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Tune title (`T:`)
    pub title: Option<String>,
    /// Composer (`C:`)
    pub composer: Option<String>,
    /// Reference / catalog number (`X:`)
    pub number: Option<u32>,
}

impl Metadata {
    /// Copy of the block with the catalog number removed.
    pub fn without_number(&self) -> Metadata {
        Metadata {
            number: None,
            ..self.clone()
        }
    }
}
