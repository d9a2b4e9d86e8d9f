//! Braille music transcription
//!
//! Produces Unicode braille (U+2800 block) from a score and converts it to
//! North American Braille ASCII.
//!
//! # Module Structure
//!
//! - **signs**: braille music sign tables (note shapes, rests, octave marks)
//! - **text**: literary braille for heading text
//! - **transcribe**: score to Unicode braille transcription
//! - **ascii**: Braille ASCII codec

pub mod ascii;
pub mod signs;
pub mod text;
pub mod transcribe;

pub use ascii::{ascii_to_unicode, unicode_to_ascii};
pub use transcribe::{transcribe, TranscribeError};
