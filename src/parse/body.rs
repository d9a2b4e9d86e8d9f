//! Tune body tokenizer
//!
//! Scans body lines into per-voice event streams. Production rules are tried
//! in order, multi-character patterns first: barlines, then notes with their
//! accidental/octave/length affixes, then rests, then the single-character
//! tokens. Unsupported constructs fail the scan rather than silently
//! changing the music.

use std::collections::HashMap;

use num_rational::Ratio;

use crate::models::{
    classify, Accidental, BarlineKind, Dur, KeySignature, Note, Pitch, Rest, ScoreEvent, Step,
    TimeSignature,
};

use super::ParseError;

/// Broken-rhythm marker waiting for its right-hand note.
#[derive(Clone, Copy, Debug)]
enum Broken {
    /// `>`: left note dotted, right note halved
    RightHalved,
    /// `<`: left note halved, right note dotted
    RightDotted,
}

/// Accumulated events and measure-local state for one voice.
pub(crate) struct Voice {
    pub id: String,
    pub name: Option<String>,
    pub events: Vec<ScoreEvent>,
    /// Accidental alterations carried through the current measure
    carried: HashMap<(Step, i8), i8>,
    /// Pending broken-rhythm marker and the line it came from
    broken: Option<(Broken, usize)>,
}

impl Voice {
    pub(crate) fn new(id: String, name: Option<String>) -> Self {
        Self {
            id,
            name,
            events: Vec::new(),
            carried: HashMap::new(),
            broken: None,
        }
    }
}

/// Tokenizer over the tune body, writing into the current voice.
pub(crate) struct BodyParser {
    voices: Vec<Voice>,
    current: usize,
    key: KeySignature,
    time: TimeSignature,
    unit: Dur,
}

impl BodyParser {
    pub(crate) fn new(
        key: KeySignature,
        time: TimeSignature,
        unit: Dur,
        declared: Vec<(String, Option<String>)>,
    ) -> Self {
        let voices = if declared.is_empty() {
            vec![Voice::new("1".to_string(), None)]
        } else {
            declared
                .into_iter()
                .map(|(id, name)| Voice::new(id, name))
                .collect()
        };
        Self {
            voices,
            current: 0,
            key,
            time,
            unit,
        }
    }

    /// Make `id` the current voice, declaring it on first use.
    pub(crate) fn switch_voice(&mut self, id: &str) {
        match self.voices.iter().position(|v| v.id == id) {
            Some(i) => self.current = i,
            None => {
                self.voices.push(Voice::new(id.to_string(), None));
                self.current = self.voices.len() - 1;
            }
        }
    }

    /// Hand back the voices; fails if a broken-rhythm marker never found its
    /// right-hand note.
    pub(crate) fn finish(self) -> Result<Vec<Voice>, ParseError> {
        for voice in &self.voices {
            if let Some((_, line)) = voice.broken {
                return Err(ParseError::syntax(
                    line,
                    "broken rhythm must sit between two notes",
                ));
            }
        }
        Ok(self.voices)
    }

    /// Scan one body line into events.
    pub(crate) fn scan_line(&mut self, line: &str, line_no: usize) -> Result<(), ParseError> {
        let mut rest = line;
        while !rest.is_empty() {
            let consumed = self.scan_token(rest, line_no)?;
            rest = &rest[consumed..];
        }
        Ok(())
    }

    // ========================================================================
    // Production rules (multi-character patterns first)
    // ========================================================================

    /// Scan one token, returning the consumed byte count.
    fn scan_token(&mut self, rest: &str, line_no: usize) -> Result<usize, ParseError> {
        let c = rest.chars().next().unwrap_or(' ');

        // Whitespace only separates beam groups
        if c.is_whitespace() {
            return Ok(c.len_utf8());
        }

        // Barlines ("|]" before "|", etc.)
        if let Some((kind, len)) = BarlineKind::parse(rest) {
            self.push_bar(kind);
            return Ok(len);
        }

        // Notes, with optional accidental/octave/length affixes
        if let Some(len) = self.scan_note(rest, line_no)? {
            return Ok(len);
        }

        // Rests
        if let Some(len) = self.scan_rest(rest, line_no)? {
            return Ok(len);
        }

        match c {
            '-' => self.push_tie(line_no),
            '>' | '<' => self.push_broken(c, line_no),
            '(' => {
                if rest[1..].starts_with(|d: char| d.is_ascii_digit()) {
                    Err(ParseError::syntax(line_no, "tuplets are not supported"))
                } else {
                    // Slur open; slurs do not affect either output
                    Ok(1)
                }
            }
            ')' => Ok(1),
            '.' | '~' => Ok(1),
            '"' => skip_delimited(rest, '"', "chord symbol", line_no),
            '!' => skip_delimited(rest, '!', "decoration", line_no),
            '{' => {
                let len = skip_to(rest, '}')
                    .ok_or_else(|| ParseError::syntax(line_no, "unterminated grace-note group"))?;
                tracing::debug!(line = line_no, "skipping grace-note group");
                Ok(len)
            }
            '\\' => Ok(1),
            '[' => Err(ParseError::syntax(
                line_no,
                "chords and inline fields are not supported",
            )),
            _ => Err(ParseError::syntax(
                line_no,
                format!("unexpected character '{c}'"),
            )),
        }
    }

    /// Note rule: `[accidental] letter [octave marks] [length]`.
    fn scan_note(&mut self, rest: &str, line_no: usize) -> Result<Option<usize>, ParseError> {
        let mut i = 0;
        let accidental = scan_accidental(rest).map(|(acc, len)| {
            i += len;
            acc
        });

        let bytes = rest.as_bytes();
        let letter = match bytes.get(i) {
            Some(&b) if (b as char).is_ascii_alphabetic() => b as char,
            _ if accidental.is_some() => {
                return Err(ParseError::syntax(line_no, "accidental without a note"));
            }
            _ => return Ok(None),
        };
        let Some(step) = note_step(letter) else {
            if accidental.is_some() {
                return Err(ParseError::syntax(line_no, "accidental without a note"));
            }
            return Ok(None);
        };
        let mut octave: i8 = if letter.is_ascii_lowercase() { 5 } else { 4 };
        i += 1;

        while let Some(&b) = bytes.get(i) {
            match b {
                b'\'' => {
                    octave = octave.saturating_add(1);
                    i += 1;
                }
                b',' => {
                    octave = octave.saturating_sub(1);
                    i += 1;
                }
                _ => break,
            }
        }
        // MusicXML octaves run 0-9
        if !(0..=9).contains(&octave) {
            return Err(ParseError::syntax(
                line_no,
                format!("note octave {octave} is out of range"),
            ));
        }

        let (mult, len) =
            scan_length(&rest[i..]).map_err(|m| ParseError::syntax(line_no, m))?;
        i += len;

        let key_alter = self.key.alter_for(step);
        let unit = self.unit;
        let voice = &mut self.voices[self.current];

        let mut dur = unit * mult;
        if let Some((broken, _)) = voice.broken.take() {
            dur *= broken_factor(broken);
        }
        if classify(dur).is_none() {
            return Err(ParseError::syntax(
                line_no,
                format!("note length {dur} cannot be notated"),
            ));
        }

        let alter = match accidental {
            Some(acc) => {
                let alter = acc.alter();
                voice.carried.insert((step, octave), alter);
                alter
            }
            None => voice
                .carried
                .get(&(step, octave))
                .copied()
                .unwrap_or(key_alter),
        };

        let mut note = Note::new(Pitch::new(step, alter, octave), dur);
        note.accidental = accidental;
        voice.events.push(ScoreEvent::Note(note));
        Ok(Some(i))
    }

    /// Rest rule: `z`/`x` with a length, or `Z` whole-measure rests.
    fn scan_rest(&mut self, rest: &str, line_no: usize) -> Result<Option<usize>, ParseError> {
        match rest.chars().next() {
            Some('z') | Some('x') => {
                let (mult, len) =
                    scan_length(&rest[1..]).map_err(|m| ParseError::syntax(line_no, m))?;
                let unit = self.unit;
                let measure_dur = self.time.measure_dur();
                let voice = &mut self.voices[self.current];
                let mut dur = unit * mult;
                if let Some((broken, _)) = voice.broken.take() {
                    dur *= broken_factor(broken);
                }
                if dur != measure_dur && classify(dur).is_none() {
                    return Err(ParseError::syntax(
                        line_no,
                        format!("rest length {dur} cannot be notated"),
                    ));
                }
                voice.events.push(ScoreEvent::Rest(Rest::new(dur)));
                Ok(Some(1 + len))
            }
            Some('Z') => {
                let (count, len) = scan_integer(&rest[1..]);
                let count = count.unwrap_or(1);
                if count == 0 {
                    return Err(ParseError::syntax(line_no, "zero-length multi-measure rest"));
                }
                let measure_dur = self.time.measure_dur();
                let voice = &mut self.voices[self.current];
                if voice.broken.is_some() {
                    return Err(ParseError::syntax(
                        line_no,
                        "broken rhythm must sit between two notes",
                    ));
                }
                for n in 0..count {
                    if n > 0 {
                        voice.carried.clear();
                        voice.events.push(ScoreEvent::Bar(BarlineKind::Regular));
                    }
                    voice.events.push(ScoreEvent::Rest(Rest::new(measure_dur)));
                }
                Ok(Some(1 + len))
            }
            _ => Ok(None),
        }
    }

    fn push_bar(&mut self, kind: BarlineKind) {
        let voice = &mut self.voices[self.current];
        voice.carried.clear();
        voice.events.push(ScoreEvent::Bar(kind));
    }

    fn push_tie(&mut self, line_no: usize) -> Result<usize, ParseError> {
        let voice = &mut self.voices[self.current];
        match voice.events.last_mut() {
            Some(ScoreEvent::Note(note)) => {
                note.tie_start = true;
                Ok(1)
            }
            _ => Err(ParseError::syntax(line_no, "tie must follow a note")),
        }
    }

    fn push_broken(&mut self, c: char, line_no: usize) -> Result<usize, ParseError> {
        let voice = &mut self.voices[self.current];
        if voice.broken.is_some() {
            return Err(ParseError::syntax(
                line_no,
                "chained broken rhythm is not supported",
            ));
        }
        match voice.events.last_mut() {
            Some(ScoreEvent::Note(prev)) => {
                let (left, pending) = if c == '>' {
                    (Ratio::new(3, 2), Broken::RightHalved)
                } else {
                    (Ratio::new(1, 2), Broken::RightDotted)
                };
                prev.dur *= left;
                if classify(prev.dur).is_none() {
                    return Err(ParseError::syntax(
                        line_no,
                        format!("note length {} cannot be notated", prev.dur),
                    ));
                }
                voice.broken = Some((pending, line_no));
                Ok(1)
            }
            _ => Err(ParseError::syntax(
                line_no,
                "broken rhythm must follow a note",
            )),
        }
    }
}

// ============================================================================
// Scanners
// ============================================================================

fn note_step(letter: char) -> Option<Step> {
    if letter.is_ascii_uppercase() || letter.is_ascii_lowercase() {
        match letter.to_ascii_uppercase() {
            'A'..='G' => Step::from_letter(letter),
            _ => None,
        }
    } else {
        None
    }
}

fn broken_factor(broken: Broken) -> Ratio<u32> {
    match broken {
        Broken::RightHalved => Ratio::new(1, 2),
        Broken::RightDotted => Ratio::new(3, 2),
    }
}

/// Accidental prefixes, double forms first.
fn scan_accidental(rest: &str) -> Option<(Accidental, usize)> {
    const PATTERNS: &[(&str, Accidental)] = &[
        ("^^", Accidental::DoubleSharp),
        ("__", Accidental::DoubleFlat),
        ("^", Accidental::Sharp),
        ("_", Accidental::Flat),
        ("=", Accidental::Natural),
    ];
    for (pattern, accidental) in PATTERNS {
        if rest.starts_with(pattern) {
            return Some((*accidental, pattern.len()));
        }
    }
    None
}

/// Length suffix: `n`, `/`, `/n`, `n/m`, `//` and combinations.
/// Returns the multiplier applied to the unit note length.
fn scan_length(rest: &str) -> Result<(Ratio<u32>, usize), String> {
    let (numer, mut i) = scan_integer(rest);
    if numer == Some(0) {
        return Err("zero note length".to_string());
    }
    let numer = numer.unwrap_or(1);
    let mut denom: u32 = 1;
    while rest[i..].starts_with('/') {
        i += 1;
        let (d, len) = scan_integer(&rest[i..]);
        match d {
            Some(0) => return Err("zero note length divisor".to_string()),
            Some(d) => {
                denom = denom.saturating_mul(d);
                i += len;
            }
            None => denom = denom.saturating_mul(2),
        }
    }
    Ok((Ratio::new(numer, denom), i))
}

/// Leading decimal integer, if any, and its byte length.
fn scan_integer(rest: &str) -> (Option<u32>, usize) {
    let digits: usize = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits == 0 {
        return (None, 0);
    }
    // Lengths beyond u32 would never classify anyway; saturate rather than wrap
    let value = rest[..digits]
        .bytes()
        .fold(0u32, |acc, b| {
            acc.saturating_mul(10).saturating_add((b - b'0') as u32)
        });
    (Some(value), digits)
}

/// Skip a `delim ... delim` region, returning its byte length.
fn skip_delimited(
    rest: &str,
    delim: char,
    what: &str,
    line_no: usize,
) -> Result<usize, ParseError> {
    match skip_to(&rest[delim.len_utf8()..], delim) {
        Some(inner) => Ok(delim.len_utf8() + inner),
        None => Err(ParseError::syntax(line_no, format!("unterminated {what}"))),
    }
}

/// Byte length up to and including the next `close`, if present.
fn skip_to(rest: &str, close: char) -> Option<usize> {
    rest.find(close).map(|pos| pos + close.len_utf8())
}
