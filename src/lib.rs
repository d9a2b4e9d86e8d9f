//! ABC notation to braille music conversion.
//!
//! Parses a subset of ABC notation into a score model and renders it as
//! Unicode braille music, North American Braille ASCII and MusicXML 3.1.
//! The `web` module wraps the pipeline in a small JSON API.

pub mod convert;
pub mod measurize;
pub mod models;
pub mod parse;
pub mod renderers;
pub mod web;

// Re-export the pipeline entry points
pub use convert::{convert, Conversion, ConvertError, ConvertOptions};
pub use parse::{parse, ParseError};
pub use renderers::{to_musicxml, transcribe, unicode_to_ascii};
