//! Pitch representation for the score model
//!
//! A pitch is a diatonic step plus a chromatic alteration and a scientific
//! octave. This maps directly onto MusicXML's `<pitch>` element and onto the
//! braille pitch-sign / octave-mark pair.

use serde::{Serialize, Deserialize};

/// The seven diatonic letter names.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Step {
    /// Letter as it appears in MusicXML `<step>`.
    pub fn letter(self) -> char {
        match self {
            Step::C => 'C',
            Step::D => 'D',
            Step::E => 'E',
            Step::F => 'F',
            Step::G => 'G',
            Step::A => 'A',
            Step::B => 'B',
        }
    }

    /// Position within the octave, C = 0 through B = 6.
    pub fn index(self) -> i32 {
        match self {
            Step::C => 0,
            Step::D => 1,
            Step::E => 2,
            Step::F => 3,
            Step::G => 4,
            Step::A => 5,
            Step::B => 6,
        }
    }

    /// Parse a note letter in either case.
    pub fn from_letter(c: char) -> Option<Step> {
        match c.to_ascii_uppercase() {
            'C' => Some(Step::C),
            'D' => Some(Step::D),
            'E' => Some(Step::E),
            'F' => Some(Step::F),
            'G' => Some(Step::G),
            'A' => Some(Step::A),
            'B' => Some(Step::B),
            _ => None,
        }
    }

    /// Circle-of-fifths offset of this step's major key (C major = 0).
    pub fn fifths(self) -> i8 {
        match self {
            Step::C => 0,
            Step::D => 2,
            Step::E => 4,
            Step::F => -1,
            Step::G => 1,
            Step::A => 3,
            Step::B => 5,
        }
    }
}

/// Accidental as written in the source text.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Accidental {
    Natural,
    Sharp,
    DoubleSharp,
    Flat,
    DoubleFlat,
}

impl Accidental {
    /// Semitone offset applied to the natural step.
    pub fn alter(self) -> i8 {
        match self {
            Accidental::Natural => 0,
            Accidental::Sharp => 1,
            Accidental::DoubleSharp => 2,
            Accidental::Flat => -1,
            Accidental::DoubleFlat => -2,
        }
    }

    /// Name used by MusicXML `<accidental>`.
    pub fn xml_name(self) -> &'static str {
        match self {
            Accidental::Natural => "natural",
            Accidental::Sharp => "sharp",
            Accidental::DoubleSharp => "double-sharp",
            Accidental::Flat => "flat",
            Accidental::DoubleFlat => "flat-flat",
        }
    }
}

/// A concrete pitch.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pitch {
    /// Diatonic letter
    pub step: Step,
    /// Chromatic alteration in semitones (-2 through 2)
    pub alter: i8,
    /// Scientific octave (middle C is C4)
    pub octave: i8,
}

impl Pitch {
    pub fn new(step: Step, alter: i8, octave: i8) -> Self {
        Self { step, alter, octave }
    }

    /// Absolute diatonic position, used to size melodic intervals.
    pub fn diatonic_position(&self) -> i32 {
        self.octave as i32 * 7 + self.step.index()
    }

    /// Melodic interval size to `other`: 1 = unison, 2 = second, and so on.
    pub fn interval_to(&self, other: &Pitch) -> i32 {
        (self.diatonic_position() - other.diatonic_position()).abs() + 1
    }
}
