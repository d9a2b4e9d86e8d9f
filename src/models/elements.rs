//! Measure contents and signatures
//!
//! Notes, rests, barlines, key/time signatures and tempo marks. These are the
//! element types the parser produces and both exporters consume.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use super::duration::Dur;
use super::pitch::{Accidental, Pitch, Step};

/// A sounded note.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub dur: Dur,
    /// Accidental as written in the source, if any
    pub accidental: Option<Accidental>,
    /// Tie into the following note
    pub tie_start: bool,
    /// Tie from the preceding note
    pub tie_stop: bool,
}

impl Note {
    pub fn new(pitch: Pitch, dur: Dur) -> Self {
        Self {
            pitch,
            dur,
            accidental: None,
            tie_start: false,
            tie_stop: false,
        }
    }
}

/// A rest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Rest {
    pub dur: Dur,
}

impl Rest {
    pub fn new(dur: Dur) -> Self {
        Self { dur }
    }
}

/// One parsed body event. A flat stream of these per voice is the
/// measurizer's input.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ScoreEvent {
    Note(Note),
    Rest(Rest),
    Bar(BarlineKind),
}

/// Barline kinds in the accepted notation subset.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BarlineKind {
    Regular,     // |
    Double,      // || or [|
    Final,       // |]
    RepeatStart, // |:
    RepeatEnd,   // :|
    RepeatBoth,  // ::
}

impl BarlineKind {
    /// Longest-match token table, multi-character forms first.
    pub fn parse(input: &str) -> Option<(BarlineKind, usize)> {
        const PATTERNS: &[(&str, BarlineKind)] = &[
            ("|]", BarlineKind::Final),
            ("[|", BarlineKind::Double),
            ("||", BarlineKind::Double),
            ("|:", BarlineKind::RepeatStart),
            (":|", BarlineKind::RepeatEnd),
            ("::", BarlineKind::RepeatBoth),
            ("|", BarlineKind::Regular),
        ];
        for (pattern, kind) in PATTERNS {
            if input.starts_with(pattern) {
                return Some((*kind, pattern.len()));
            }
        }
        None
    }
}

/// Time signature.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_type: u8,
}

impl TimeSignature {
    pub fn new(beats: u8, beat_type: u8) -> Self {
        Self { beats, beat_type }
    }

    /// Full measure duration in whole-note units.
    pub fn measure_dur(&self) -> Dur {
        Ratio::new(self.beats as u32, self.beat_type as u32)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        TimeSignature::new(4, 4)
    }
}

/// Key mode.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Major,
    Minor,
}

/// Key signature as a circle-of-fifths count plus mode.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySignature {
    /// Positive = sharps, negative = flats
    pub fifths: i8,
    pub mode: Mode,
}

impl KeySignature {
    pub fn new(fifths: i8, mode: Mode) -> Self {
        Self { fifths, mode }
    }

    /// Alteration the signature applies to a step.
    ///
    /// Sharps accumulate in the order F C G D A E B, flats in the order
    /// B E A D G C F.
    pub fn alter_for(&self, step: Step) -> i8 {
        const SHARP_ORDER: [Step; 7] = [
            Step::F, Step::C, Step::G, Step::D, Step::A, Step::E, Step::B,
        ];
        const FLAT_ORDER: [Step; 7] = [
            Step::B, Step::E, Step::A, Step::D, Step::G, Step::C, Step::F,
        ];
        if self.fifths > 0 {
            let count = (self.fifths as usize).min(7);
            if SHARP_ORDER[..count].contains(&step) { 1 } else { 0 }
        } else if self.fifths < 0 {
            let count = ((-self.fifths) as usize).min(7);
            if FLAT_ORDER[..count].contains(&step) { -1 } else { 0 }
        } else {
            0
        }
    }
}

impl Default for KeySignature {
    fn default() -> Self {
        KeySignature::new(0, Mode::Major)
    }
}

/// Metronome indication from the `Q:` field.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct TempoMark {
    /// Beat unit in whole-note units
    pub unit: Dur,
    /// Beats per minute; may be fractional as parsed
    pub per_minute: f64,
}

impl TempoMark {
    pub fn new(unit: Dur, per_minute: f64) -> Self {
        Self { unit, per_minute }
    }

    /// Whether the rate is a whole number.
    pub fn is_integral(&self) -> bool {
        self.per_minute.fract() == 0.0
    }

    /// Copy with the rate truncated toward zero.
    pub fn truncated(&self) -> TempoMark {
        TempoMark {
            unit: self.unit,
            per_minute: self.per_minute.trunc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_barline_longest_match() {
        assert_eq!(BarlineKind::parse("|] end"), Some((BarlineKind::Final, 2)));
        assert_eq!(BarlineKind::parse("|| x"), Some((BarlineKind::Double, 2)));
        assert_eq!(BarlineKind::parse("|:"), Some((BarlineKind::RepeatStart, 2)));
        assert_eq!(BarlineKind::parse("| A"), Some((BarlineKind::Regular, 1)));
        assert_eq!(BarlineKind::parse("A |"), None);
    }

    #[test]
    fn test_key_signature_alterations() {
        let d_major = KeySignature::new(2, Mode::Major);
        assert_eq!(d_major.alter_for(Step::F), 1);
        assert_eq!(d_major.alter_for(Step::C), 1);
        assert_eq!(d_major.alter_for(Step::G), 0);

        let f_major = KeySignature::new(-1, Mode::Major);
        assert_eq!(f_major.alter_for(Step::B), -1);
        assert_eq!(f_major.alter_for(Step::E), 0);
    }

    #[test]
    fn test_measure_dur() {
        assert_eq!(TimeSignature::new(4, 4).measure_dur(), Ratio::new(1, 1));
        assert_eq!(TimeSignature::new(6, 8).measure_dur(), Ratio::new(3, 4));
    }

    #[test]
    fn test_tempo_truncation() {
        let tempo = TempoMark::new(Ratio::new(1, 4), 115.5);
        assert!(!tempo.is_integral());
        let truncated = tempo.truncated();
        assert!(truncated.is_integral());
        assert_eq!(truncated.per_minute, 115.0);
    }
}
