//! The notation-to-braille conversion pipeline.
//!
//! One call runs the whole chain: parse the tune, normalize the tempo and
//! metadata, apply the pickup policy, then render every output format.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::parse::{parse, ParseError};
use crate::renderers::braille::{transcribe, unicode_to_ascii, TranscribeError};
use crate::renderers::musicxml::to_musicxml;

/// Caller-controlled conversion switches.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// When false, measures are renumbered from 1 and any pickup flag is
    /// dropped before export.
    pub has_pickup: bool,
}

/// Every output format produced from one tune.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Conversion {
    pub braille: String,
    pub ascii_braille: String,
    pub musicxml: String,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Transcribe(#[from] TranscribeError),
    #[error("MusicXML export failed: {0}")]
    Export(String),
}

/// Convert ABC notation into braille, Braille ASCII and MusicXML.
pub fn convert(input: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
    let mut score = parse(input)?;

    // Fractional metronome rates notate badly; keep the integer part.
    score.tempo = score.tempo.map(|tempo| tempo.truncated());
    // The catalog number would surface as a braille heading line.
    score.metadata = score.metadata.without_number();
    if !options.has_pickup {
        score.renumber_from_one();
    }

    debug!(
        parts = score.parts.len(),
        measures = score.parts.iter().map(|p| p.measures.len()).sum::<usize>(),
        "score assembled"
    );

    let musicxml = to_musicxml(&score).map_err(ConvertError::Export)?;
    let braille = transcribe(&score)?;
    let ascii_braille = unicode_to_ascii(&braille);

    Ok(Conversion {
        braille,
        ascii_braille,
        musicxml,
    })
}
