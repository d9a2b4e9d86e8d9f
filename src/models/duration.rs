//! Exact note durations
//!
//! Durations are rationals in whole-note units (a quarter note is 1/4).
//! Keeping them as `num_rational::Ratio` values makes unit-length
//! multipliers, broken-rhythm adjustments and divisions math exact.

use num_rational::Ratio;
use serde::{Serialize, Deserialize};

/// Duration in whole-note units.
pub type Dur = Ratio<u32>;

/// Shorthand for building a duration from a fraction of a whole note.
pub fn dur(numer: u32, denom: u32) -> Dur {
    Ratio::new(numer, denom)
}

/// Notated value classes recognized by the exporters.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteValue {
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl NoteValue {
    /// Name used by MusicXML `<type>`.
    pub fn xml_name(self) -> &'static str {
        match self {
            NoteValue::Whole => "whole",
            NoteValue::Half => "half",
            NoteValue::Quarter => "quarter",
            NoteValue::Eighth => "eighth",
            NoteValue::Sixteenth => "16th",
            NoteValue::ThirtySecond => "32nd",
        }
    }

    /// Undotted duration of this value in whole-note units.
    pub fn base(self) -> Dur {
        match self {
            NoteValue::Whole => Ratio::from_integer(1),
            NoteValue::Half => Ratio::new(1, 2),
            NoteValue::Quarter => Ratio::new(1, 4),
            NoteValue::Eighth => Ratio::new(1, 8),
            NoteValue::Sixteenth => Ratio::new(1, 16),
            NoteValue::ThirtySecond => Ratio::new(1, 32),
        }
    }

    const ALL: [NoteValue; 6] = [
        NoteValue::Whole,
        NoteValue::Half,
        NoteValue::Quarter,
        NoteValue::Eighth,
        NoteValue::Sixteenth,
        NoteValue::ThirtySecond,
    ];
}

/// Split a duration into a notated value plus augmentation dots (0 to 2).
///
/// Returns `None` for durations that cannot be written as a single notehead,
/// such as 5/16 of a whole note.
pub fn classify(d: Dur) -> Option<(NoteValue, u8)> {
    for value in NoteValue::ALL {
        let base = value.base();
        if d == base {
            return Some((value, 0));
        }
        if d == base * Ratio::new(3, 2) {
            return Some((value, 1));
        }
        if d == base * Ratio::new(7, 4) {
            return Some((value, 2));
        }
    }
    None
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd(b, a % b) }
}

fn lcm(a: u32, b: u32) -> u32 {
    if a == 0 || b == 0 { 0 } else { a / gcd(a, b) * b }
}

/// MusicXML divisions value for a part: the least common multiple of the
/// quarter-note denominators of every duration, at least 1.
pub fn divisions_for<I: IntoIterator<Item = Dur>>(durs: I) -> u32 {
    let mut div = 1;
    for d in durs {
        let quarters = d * Ratio::from_integer(4);
        div = lcm(div, *quarters.denom());
    }
    div
}

/// A duration expressed in divisions-per-quarter ticks.
///
/// Exact whenever `divisions` came from [`divisions_for`] over a set that
/// included this duration.
pub fn to_divisions(d: Dur, divisions: u32) -> u32 {
    (d * Ratio::from_integer(4 * divisions)).to_integer()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_plain_values() {
        assert_eq!(classify(dur(1, 4)), Some((NoteValue::Quarter, 0)));
        assert_eq!(classify(dur(1, 1)), Some((NoteValue::Whole, 0)));
        assert_eq!(classify(dur(1, 32)), Some((NoteValue::ThirtySecond, 0)));
    }

    #[test]
    fn test_classify_dotted_values() {
        assert_eq!(classify(dur(3, 8)), Some((NoteValue::Quarter, 1)));
        assert_eq!(classify(dur(3, 4)), Some((NoteValue::Half, 1)));
        assert_eq!(classify(dur(7, 16)), Some((NoteValue::Quarter, 2)));
    }

    #[test]
    fn test_classify_rejects_tied_durations() {
        assert_eq!(classify(dur(5, 16)), None);
        assert_eq!(classify(dur(5, 4)), None);
    }

    #[test]
    fn test_divisions_for_mixed_values() {
        // Quarters alone need divisions=1, eighths 2, a dotted eighth 4
        assert_eq!(divisions_for([dur(1, 4), dur(1, 4)]), 1);
        assert_eq!(divisions_for([dur(1, 4), dur(1, 8)]), 2);
        assert_eq!(divisions_for([dur(3, 16), dur(1, 8)]), 4);
    }

    #[test]
    fn test_to_divisions_is_exact() {
        let divisions = divisions_for([dur(3, 16), dur(1, 16)]);
        assert_eq!(divisions, 4);
        assert_eq!(to_divisions(dur(3, 16), divisions), 3);
        assert_eq!(to_divisions(dur(1, 4), divisions), 4);
        assert_eq!(to_divisions(dur(1, 1), divisions), 16);
    }
}
