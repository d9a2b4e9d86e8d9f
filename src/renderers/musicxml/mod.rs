//! MusicXML export module
//!
//! Provides MusicXML 3.1 partwise export for scores.
//!
//! # Module Structure
//!
//! - **builder**: XML structure building for one part (measures, notes, barlines)
//! - **export**: Main entry point (`to_musicxml()`) assembling the full document

pub mod builder;
pub mod export;

pub use export::to_musicxml;
