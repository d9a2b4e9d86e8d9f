// Score to Unicode braille music transcription

use thiserror::Error;

use crate::models::{
    classify, BarlineKind, Dur, MeasureElement, Note, NoteValue, Part, Pitch, Rest, Score, Step,
    TempoMark, TimeSignature,
};

use super::signs;
use super::text;

/// Width of an embossed line in cells.
const LINE_CELLS: usize = 40;

#[derive(Debug, Error, PartialEq)]
pub enum TranscribeError {
    #[error("metronome rate {0} is not a whole number")]
    FractionalTempo(f64),
    #[error("duration cannot be notated in braille")]
    UnsupportedDuration,
}

/// Transcribe a score into Unicode braille music.
///
/// Heading lines (title, composer, catalog number, signatures) are followed
/// by the measures of each part, one braille word per measure, wrapped at
/// forty cells. Parts are separated by a blank line.
pub fn transcribe(score: &Score) -> Result<String, TranscribeError> {
    let mut lines: Vec<String> = Vec::new();

    if let Some(title) = score.metadata.title.as_deref() {
        if !title.is_empty() {
            lines.push(center(&text::to_braille(title)));
        }
    }
    if let Some(composer) = score.metadata.composer.as_deref() {
        if !composer.is_empty() {
            lines.push(right_align(&text::to_braille(composer)));
        }
    }
    if let Some(number) = score.metadata.number {
        lines.push(signs::upper_number(number));
    }

    let signature = signature_line(score)?;
    if !signature.is_empty() {
        lines.push(center(&signature));
    }

    for (index, part) in score.parts.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        let words = part_words(part)?;
        lines.extend(wrap_words(&words, LINE_CELLS));
    }

    Ok(lines.join("\n"))
}

/// Key and time signature with the metronome marking when a tempo is set.
fn signature_line(score: &Score) -> Result<String, TranscribeError> {
    let part = score.parts.first();
    let fifths = part.map(|p| p.key.fifths).unwrap_or(0);
    let default_time = TimeSignature::default();
    let time = part.map(|p| &p.time).unwrap_or(&default_time);

    let mut line = signs::key_signature_sign(fifths);
    line.push_str(&signs::time_signature_sign(time));
    if let Some(tempo) = &score.tempo {
        line.push(signs::BLANK);
        line.push_str(&metronome_sign(tempo)?);
    }
    Ok(line)
}

/// Metronome marking: beat-unit note sign, equals sign, rate.
fn metronome_sign(tempo: &TempoMark) -> Result<String, TranscribeError> {
    if !tempo.is_integral() {
        return Err(TranscribeError::FractionalTempo(tempo.per_minute));
    }
    let (value, dots) = classify(tempo.unit).ok_or(TranscribeError::UnsupportedDuration)?;
    let mut out = String::new();
    out.push(signs::note_sign(Step::C, value));
    for _ in 0..dots {
        out.push(signs::DOT_SIGN);
    }
    out.push(signs::METRONOME_SIGN);
    out.push_str(&signs::upper_number(tempo.per_minute as u32));
    Ok(out)
}

fn part_words(part: &Part) -> Result<Vec<String>, TranscribeError> {
    let mut words = Vec::new();
    let mut octaves = OctaveState::new();
    let measure_dur = part.time.measure_dur();
    for measure in &part.measures {
        let mut word = String::new();
        for element in &measure.elements {
            match element {
                MeasureElement::Note(note) => word.push_str(&note_signs(note, &mut octaves)?),
                MeasureElement::Rest(rest) => word.push_str(&rest_signs(rest, measure_dur)?),
            }
        }
        match measure.barline {
            Some(BarlineKind::Final) => word.push_str(signs::FINAL_BAR),
            Some(
                BarlineKind::Double
                | BarlineKind::RepeatStart
                | BarlineKind::RepeatEnd
                | BarlineKind::RepeatBoth,
            ) => word.push_str(signs::SECTION_BAR),
            Some(BarlineKind::Regular) | None => {}
        }
        if !word.is_empty() {
            words.push(word);
        }
    }
    Ok(words)
}

/// Sign order for one note: accidental, octave mark, note shape, dots, tie.
fn note_signs(note: &Note, octaves: &mut OctaveState) -> Result<String, TranscribeError> {
    let (value, dots) = classify(note.dur).ok_or(TranscribeError::UnsupportedDuration)?;
    let mut out = String::new();
    if let Some(accidental) = note.accidental {
        out.push_str(signs::accidental_sign(accidental));
    }
    if octaves.needs_mark(&note.pitch) {
        out.push_str(&signs::octave_mark(note.pitch.octave));
    }
    out.push(signs::note_sign(note.pitch.step, value));
    for _ in 0..dots {
        out.push(signs::DOT_SIGN);
    }
    if note.tie_start {
        out.push_str(signs::TIE_SIGN);
    }
    Ok(out)
}

/// A rest filling its measure is written as a whole rest whatever the meter.
fn rest_signs(rest: &Rest, measure_dur: Dur) -> Result<String, TranscribeError> {
    if rest.dur == measure_dur {
        return Ok(signs::rest_sign(NoteValue::Whole).to_string());
    }
    let (value, dots) = classify(rest.dur).ok_or(TranscribeError::UnsupportedDuration)?;
    let mut out = String::new();
    out.push(signs::rest_sign(value));
    for _ in 0..dots {
        out.push(signs::DOT_SIGN);
    }
    Ok(out)
}

/// Octave-mark bookkeeping across one part.
///
/// The first note is always marked. After that a second or third needs no
/// mark, a fourth or fifth is marked only when it crosses into another
/// octave, and a sixth or wider is always marked. Rests and barlines do not
/// disturb the state.
struct OctaveState {
    previous: Option<Pitch>,
}

impl OctaveState {
    fn new() -> Self {
        Self { previous: None }
    }

    fn needs_mark(&mut self, pitch: &Pitch) -> bool {
        let needed = match &self.previous {
            None => true,
            Some(prev) => {
                let interval = prev.interval_to(pitch);
                if interval <= 3 {
                    false
                } else if interval <= 5 {
                    pitch.octave != prev.octave
                } else {
                    true
                }
            }
        };
        self.previous = Some(*pitch);
        needed
    }
}

fn center(line: &str) -> String {
    let cells = line.chars().count();
    if cells >= LINE_CELLS {
        return line.to_string();
    }
    let mut out = String::new();
    for _ in 0..(LINE_CELLS - cells) / 2 {
        out.push(signs::BLANK);
    }
    out.push_str(line);
    out
}

fn right_align(line: &str) -> String {
    let cells = line.chars().count();
    if cells >= LINE_CELLS {
        return line.to_string();
    }
    let mut out = String::new();
    for _ in 0..LINE_CELLS - cells {
        out.push(signs::BLANK);
    }
    out.push_str(line);
    out
}

/// Fill lines with measure words separated by one blank cell.
fn wrap_words(words: &[String], width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut cells = 0usize;
    for word in words {
        let len = word.chars().count();
        if cells == 0 {
            line.push_str(word);
            cells = len;
        } else if cells + 1 + len <= width {
            line.push(signs::BLANK);
            line.push_str(word);
            cells += 1 + len;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            cells = len;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
