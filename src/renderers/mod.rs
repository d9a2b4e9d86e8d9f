//! Renderers for converting a parsed score into output formats.

pub mod braille;
pub mod musicxml;

pub use braille::{ascii_to_unicode, transcribe, unicode_to_ascii, TranscribeError};
pub use musicxml::to_musicxml;
