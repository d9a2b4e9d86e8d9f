// Braille music sign tables

use crate::models::{Accidental, NoteValue, Step, TimeSignature};

/// Blank braille cell (U+2800), used wherever print would use a space.
pub const BLANK: char = '\u{2800}';
/// Numeric indicator.
pub const NUMBER_SIGN: char = '⠼';
/// Augmentation dot.
pub const DOT_SIGN: char = '⠄';
/// Metronome equals sign between beat unit and rate.
pub const METRONOME_SIGN: char = '⠶';
/// Tie into the following note.
pub const TIE_SIGN: &str = "⠈⠉";
/// Final double bar.
pub const FINAL_BAR: &str = "⠣⠅";
/// Sectional double bar.
pub const SECTION_BAR: &str = "⠣⠅⠄";

/// Note sign for a pitch shape and value class.
///
/// The shape carries the letter in dots 1-4 and the value in dots 3 and 6;
/// 16ths reuse the whole-note shapes and 32nds the half-note shapes.
pub fn note_sign(step: Step, value: NoteValue) -> char {
    // columns C D E F G A B
    const EIGHTH: [char; 7] = ['⠙', '⠑', '⠋', '⠛', '⠓', '⠊', '⠚'];
    const QUARTER: [char; 7] = ['⠹', '⠱', '⠫', '⠻', '⠳', '⠪', '⠺'];
    const HALF: [char; 7] = ['⠝', '⠕', '⠏', '⠟', '⠗', '⠎', '⠞'];
    const WHOLE: [char; 7] = ['⠽', '⠵', '⠯', '⠿', '⠷', '⠮', '⠾'];

    let shapes = match value {
        NoteValue::Whole | NoteValue::Sixteenth => &WHOLE,
        NoteValue::Half | NoteValue::ThirtySecond => &HALF,
        NoteValue::Quarter => &QUARTER,
        NoteValue::Eighth => &EIGHTH,
    };
    shapes[step.index() as usize]
}

/// Rest sign for a value class; value reuse mirrors the note shapes.
pub fn rest_sign(value: NoteValue) -> char {
    match value {
        NoteValue::Whole | NoteValue::Sixteenth => '⠍',
        NoteValue::Half | NoteValue::ThirtySecond => '⠥',
        NoteValue::Quarter => '⠧',
        NoteValue::Eighth => '⠭',
    }
}

/// Octave mark for octaves 1-7; octaves beyond the range double the edge mark.
pub fn octave_mark(octave: i8) -> String {
    const MARKS: [char; 7] = ['⠈', '⠘', '⠸', '⠐', '⠨', '⠰', '⠠'];
    if octave < 1 {
        "⠈⠈".to_string()
    } else if octave > 7 {
        "⠠⠠".to_string()
    } else {
        MARKS[(octave - 1) as usize].to_string()
    }
}

pub fn accidental_sign(accidental: Accidental) -> &'static str {
    match accidental {
        Accidental::Sharp => "⠩",
        Accidental::DoubleSharp => "⠩⠩",
        Accidental::Flat => "⠣",
        Accidental::DoubleFlat => "⠣⠣",
        Accidental::Natural => "⠡",
    }
}

/// Upper-cell digit, indexed 0-9.
pub fn upper_digit(digit: u8) -> char {
    const DIGITS: [char; 10] = ['⠚', '⠁', '⠃', '⠉', '⠙', '⠑', '⠋', '⠛', '⠓', '⠊'];
    DIGITS[(digit % 10) as usize]
}

/// Lower-cell digit, indexed 0-9.
pub fn lower_digit(digit: u8) -> char {
    const DIGITS: [char; 10] = ['⠴', '⠂', '⠆', '⠒', '⠲', '⠢', '⠖', '⠶', '⠦', '⠔'];
    DIGITS[(digit % 10) as usize]
}

/// Number sign followed by upper-cell digits.
pub fn upper_number(n: u32) -> String {
    let mut out = String::new();
    out.push(NUMBER_SIGN);
    for ch in n.to_string().chars() {
        out.push(upper_digit(ch as u8 - b'0'));
    }
    out
}

/// Key signature: up to three accidental signs written out, four or more
/// abbreviated with a count.
pub fn key_signature_sign(fifths: i8) -> String {
    if fifths == 0 {
        return String::new();
    }
    let sign = if fifths > 0 { '⠩' } else { '⠣' };
    let count = fifths.unsigned_abs();
    if count <= 3 {
        (0..count).map(|_| sign).collect()
    } else {
        let mut out = String::new();
        out.push(NUMBER_SIGN);
        out.push(upper_digit(count));
        out.push(sign);
        out
    }
}

/// Time signature: numerator in upper cells, denominator in lower cells.
pub fn time_signature_sign(time: &TimeSignature) -> String {
    let mut out = String::new();
    out.push(NUMBER_SIGN);
    for ch in time.beats.to_string().chars() {
        out.push(upper_digit(ch as u8 - b'0'));
    }
    for ch in time.beat_type.to_string().chars() {
        out.push(lower_digit(ch as u8 - b'0'));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_signs_by_value_class() {
        assert_eq!(note_sign(Step::C, NoteValue::Eighth), '⠙');
        assert_eq!(note_sign(Step::C, NoteValue::Quarter), '⠹');
        assert_eq!(note_sign(Step::C, NoteValue::Half), '⠝');
        assert_eq!(note_sign(Step::C, NoteValue::Whole), '⠽');
        assert_eq!(note_sign(Step::B, NoteValue::Eighth), '⠚');
        assert_eq!(note_sign(Step::B, NoteValue::Whole), '⠾');
    }

    #[test]
    fn test_sixteenths_reuse_whole_shapes() {
        assert_eq!(
            note_sign(Step::G, NoteValue::Sixteenth),
            note_sign(Step::G, NoteValue::Whole)
        );
        assert_eq!(
            note_sign(Step::G, NoteValue::ThirtySecond),
            note_sign(Step::G, NoteValue::Half)
        );
        assert_eq!(rest_sign(NoteValue::Sixteenth), rest_sign(NoteValue::Whole));
    }

    #[test]
    fn test_octave_marks() {
        assert_eq!(octave_mark(4), "⠐");
        assert_eq!(octave_mark(1), "⠈");
        assert_eq!(octave_mark(7), "⠠");
        assert_eq!(octave_mark(0), "⠈⠈");
        assert_eq!(octave_mark(8), "⠠⠠");
    }

    #[test]
    fn test_key_signatures() {
        assert_eq!(key_signature_sign(0), "");
        assert_eq!(key_signature_sign(2), "⠩⠩");
        assert_eq!(key_signature_sign(-3), "⠣⠣⠣");
        assert_eq!(key_signature_sign(4), "⠼⠙⠩");
        assert_eq!(key_signature_sign(-5), "⠼⠑⠣");
    }

    #[test]
    fn test_time_signatures() {
        assert_eq!(
            time_signature_sign(&TimeSignature::new(4, 4)),
            "⠼⠙⠲"
        );
        assert_eq!(
            time_signature_sign(&TimeSignature::new(6, 8)),
            "⠼⠋⠦"
        );
        assert_eq!(
            time_signature_sign(&TimeSignature::new(12, 8)),
            "⠼⠁⠃⠦"
        );
    }

    #[test]
    fn test_upper_number() {
        assert_eq!(upper_number(1), "⠼⠁");
        assert_eq!(upper_number(120), "⠼⠁⠃⠚");
    }
}
