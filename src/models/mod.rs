//! Score model for the conversion pipeline
//!
//! This module contains the data model a conversion request works on:
//! pitches, durations, measure contents and the score/part/measure
//! containers.

pub mod duration;
pub mod elements;
pub mod metadata;
pub mod pitch;
pub mod score;

// Re-export commonly used types
pub use duration::{classify, divisions_for, dur, to_divisions, Dur, NoteValue};
pub use elements::{
    BarlineKind, KeySignature, Mode, Note, Rest, ScoreEvent, TempoMark, TimeSignature,
};
pub use metadata::Metadata;
pub use pitch::{Accidental, Pitch, Step};
pub use score::{Measure, MeasureElement, Part, Score};
