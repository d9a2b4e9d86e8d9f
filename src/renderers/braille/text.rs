// Literary braille for heading text

use super::signs;

/// Capitalization prefix.
const CAPITAL_SIGN: char = '⠠';

/// Transcribe heading text into literary braille.
///
/// Letters, digits and basic punctuation are covered; a run of digits shares
/// one numeric indicator. Characters without a sign are dropped.
pub fn to_braille(text: &str) -> String {
    let mut out = String::new();
    let mut in_number = false;
    for c in text.chars() {
        if c.is_ascii_digit() {
            if !in_number {
                out.push(signs::NUMBER_SIGN);
                in_number = true;
            }
            out.push(signs::upper_digit(c as u8 - b'0'));
            continue;
        }
        in_number = false;
        if let Some(sign) = letter_sign(c.to_ascii_lowercase()) {
            if c.is_ascii_uppercase() {
                out.push(CAPITAL_SIGN);
            }
            out.push(sign);
        } else if let Some(sign) = punctuation_sign(c) {
            out.push(sign);
        }
    }
    out
}

fn letter_sign(c: char) -> Option<char> {
    const LETTERS: [char; 26] = [
        '⠁', '⠃', '⠉', '⠙', '⠑', '⠋', '⠛', '⠓', '⠊', '⠚', '⠅', '⠇', '⠍',
        '⠝', '⠕', '⠏', '⠟', '⠗', '⠎', '⠞', '⠥', '⠧', '⠺', '⠭', '⠽', '⠵',
    ];
    if c.is_ascii_lowercase() {
        Some(LETTERS[(c as u8 - b'a') as usize])
    } else {
        None
    }
}

fn punctuation_sign(c: char) -> Option<char> {
    match c {
        ' ' => Some(signs::BLANK),
        '.' => Some('⠲'),
        ',' => Some('⠂'),
        ';' => Some('⠆'),
        ':' => Some('⠒'),
        '\'' => Some('⠄'),
        '-' => Some('⠤'),
        '!' => Some('⠖'),
        '?' => Some('⠦'),
        '(' | ')' => Some('⠶'),
        _ => None,
    }
}
