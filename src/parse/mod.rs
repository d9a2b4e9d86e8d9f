//! ABC notation parser
//!
//! Turns ABC text into a [`Score`]: a header pass over the information
//! fields, a body pass that tokenizes tune lines into per-voice event
//! streams, then measure structuring via [`crate::measurize`].

pub mod body;
pub mod fields;

use thiserror::Error;

use crate::measurize::measurize;
use crate::models::{Dur, KeySignature, Metadata, Part, Score, TempoMark, TimeSignature};
use body::{BodyParser, Voice};

/// Errors from the notation parser.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// Input was empty or all whitespace
    #[error("cannot parse an empty notation string")]
    EmptyInput,
    /// Input could not be understood as the accepted ABC subset
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        ParseError::Syntax {
            line,
            message: message.into(),
        }
    }
}

/// Parse ABC text into a score.
///
/// The header is the leading run of information-field lines and must
/// contain a key field (`K:`); the first tune line ends it. Everything
/// after is tune body. Measures are numbered natively here: a part whose
/// first measure is an anacrusis candidate starts at 0, otherwise at 1.
pub fn parse(input: &str) -> Result<Score, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::EmptyInput);
    }
    tracing::debug!(bytes = input.len(), "parsing notation input");

    let mut lines = input.lines().enumerate().peekable();

    // ------------------------------------------------------------------
    // Header phase
    // ------------------------------------------------------------------
    let mut metadata = Metadata::default();
    let mut time: Option<TimeSignature> = None;
    let mut unit: Option<Dur> = None;
    let mut tempo: Option<TempoMark> = None;
    let mut key: Option<KeySignature> = None;
    let mut declared: Vec<(String, Option<String>)> = Vec::new();
    let mut last_voice: Option<String> = None;
    let mut last_line = 1;

    while let Some(&(idx, raw)) = lines.peek() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            lines.next();
            continue;
        }
        let Some((field, value)) = split_field(line) else {
            break;
        };
        match field {
            'X' => {
                metadata.number = Some(value.trim().parse().map_err(|_| {
                    ParseError::syntax(line_no, format!("bad reference number '{}'", value.trim()))
                })?);
            }
            'T' => {
                if metadata.title.is_none() {
                    metadata.title = Some(value.trim().to_string());
                } else {
                    tracing::debug!(line = line_no, "skipping secondary title");
                }
            }
            'C' => metadata.composer = Some(value.trim().to_string()),
            'M' => {
                time = Some(
                    fields::parse_meter(value).map_err(|m| ParseError::syntax(line_no, m))?,
                );
            }
            'L' => {
                unit = Some(
                    fields::parse_unit_length(value)
                        .map_err(|m| ParseError::syntax(line_no, m))?,
                );
            }
            'Q' => {
                tempo = fields::parse_tempo(value).map_err(|m| ParseError::syntax(line_no, m))?;
            }
            'V' => {
                let (id, name) = fields::parse_voice_decl(value)
                    .map_err(|m| ParseError::syntax(line_no, m))?;
                if !declared.iter().any(|(existing, _)| *existing == id) {
                    declared.push((id.clone(), name));
                }
                last_voice = Some(id);
            }
            'K' => {
                key = Some(fields::parse_key(value).map_err(|m| ParseError::syntax(line_no, m))?);
            }
            _ => tracing::debug!(line = line_no, field = %field, "skipping header field"),
        }
        lines.next();
    }

    let Some(key) = key else {
        return Err(ParseError::syntax(last_line, "missing key field (K:)"));
    };
    let time = time.unwrap_or_default();
    let unit = unit.unwrap_or_else(|| fields::default_unit_length(&time));

    // ------------------------------------------------------------------
    // Body phase
    // ------------------------------------------------------------------
    let mut parser = BodyParser::new(key, time, unit, declared);
    // Tune lines continue whichever voice the header last named
    if let Some(id) = &last_voice {
        parser.switch_voice(id);
    }

    for (idx, raw) in lines {
        let line_no = idx + 1;
        let line = strip_comment(raw);
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((field, value)) = split_field(trimmed) {
            match field {
                'V' => {
                    let (id, _) = fields::parse_voice_decl(value)
                        .map_err(|m| ParseError::syntax(line_no, m))?;
                    parser.switch_voice(&id);
                    continue;
                }
                'w' | 'W' => {
                    tracing::debug!(line = line_no, "skipping lyric line");
                    continue;
                }
                _ => {
                    return Err(ParseError::syntax(
                        line_no,
                        format!("mid-tune field '{field}:' is not supported"),
                    ));
                }
            }
        }
        parser.scan_line(trimmed, line_no)?;
    }

    let voices = parser.finish()?;

    // ------------------------------------------------------------------
    // Score assembly
    // ------------------------------------------------------------------
    let mut kept: Vec<Voice> = voices.into_iter().filter(|v| !v.events.is_empty()).collect();
    if kept.is_empty() {
        // Headers-only input still yields one (empty) part
        kept.push(Voice::new("1".to_string(), None));
    }

    let mut score = Score::new(metadata);
    score.tempo = tempo;
    for (i, voice) in kept.into_iter().enumerate() {
        let mut part = Part::new(format!("P{}", i + 1));
        part.name = voice.name;
        part.key = key;
        part.time = time;
        part.measures = measurize(&voice.events, &time);
        score.parts.push(part);
    }
    tracing::debug!(
        parts = score.parts.len(),
        measures = score.parts.first().map(|p| p.measures.len()).unwrap_or(0),
        "parsed score"
    );
    Ok(score)
}

/// Text up to the first `%` comment marker.
fn strip_comment(line: &str) -> &str {
    line.split('%').next().unwrap_or(line)
}

/// Split an information-field line (`X: value`) into its letter and value.
fn split_field(line: &str) -> Option<(char, &str)> {
    let mut chars = line.chars();
    let field = chars.next()?;
    if !field.is_ascii_alphabetic() {
        return None;
    }
    if chars.next()? != ':' {
        return None;
    }
    Some((field, chars.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dur, MeasureElement, Mode, Step};

    const SKETCH: &str = "X: 1\nT: Sketch\nK: C\nL: 1/4\nM: 4/4\n| A B c d |]";

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), Err(ParseError::EmptyInput));
        assert_eq!(parse("  \n\t "), Err(ParseError::EmptyInput));
    }

    #[test]
    fn test_missing_key_field() {
        let err = parse("X: 1\nT: No key").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_garbage_input() {
        let err = parse("not abc at all").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_sketch_tune_parses() {
        let score = parse(SKETCH).unwrap();
        assert_eq!(score.metadata.title.as_deref(), Some("Sketch"));
        assert_eq!(score.metadata.number, Some(1));
        assert_eq!(score.parts.len(), 1);
        let part = &score.parts[0];
        assert_eq!(part.id, "P1");
        assert_eq!(part.measures.len(), 1);
        assert_eq!(part.measures[0].elements.len(), 4);
        match &part.measures[0].elements[0] {
            MeasureElement::Note(n) => {
                assert_eq!(n.pitch.step, Step::A);
                assert_eq!(n.dur, dur(1, 4));
            }
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn test_sketch_leading_barline_numbers_from_zero() {
        let score = parse(SKETCH).unwrap();
        let measure = &score.parts[0].measures[0];
        assert_eq!(measure.number, 0);
        assert!(measure.implicit);
    }

    #[test]
    fn test_header_fields_feed_the_score() {
        let input = "X: 7\nT: Field Test\nC: Trad.\nM: 6/8\nL: 1/8\nQ: 1/4=96\nK: D\nD E F G A B | d c B A G F |]";
        let score = parse(input).unwrap();
        assert_eq!(score.metadata.composer.as_deref(), Some("Trad."));
        assert_eq!(score.tempo.unwrap().per_minute, 96.0);
        let part = &score.parts[0];
        assert_eq!(part.time, TimeSignature::new(6, 8));
        assert_eq!(part.key.fifths, 2);
        assert_eq!(part.key.mode, Mode::Major);
        // F in D major picks up the key sharp
        match &part.measures[0].elements[2] {
            MeasureElement::Note(n) => assert_eq!(n.pitch.alter, 1),
            other => panic!("expected note, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_and_continuations() {
        let input = "X: 1 % reference\nK: C\nC D E F | % first measure\nG A B c |]\\\n";
        let score = parse(input).unwrap();
        assert_eq!(score.parts[0].measures.len(), 2);
    }

    #[test]
    fn test_unknown_header_field_skipped() {
        let input = "X: 1\nO: Ireland\nR: reel\nK: C\nC D E F |]";
        assert!(parse(input).is_ok());
    }

    #[test]
    fn test_mid_tune_field_rejected() {
        let input = "X: 1\nK: C\nC D E F |\nM: 3/4\nG A B |]";
        assert!(matches!(parse(input), Err(ParseError::Syntax { .. })));
    }

    #[test]
    fn test_two_voices_become_two_parts() {
        let input = "X: 1\nM: 4/4\nL: 1/4\nV: 1\nV: 2 name=\"Bass\"\nK: C\nV: 1\nc d e f |]\nV: 2\nC, D, E, F, |]";
        let score = parse(input).unwrap();
        assert_eq!(score.parts.len(), 2);
        assert_eq!(score.parts[0].id, "P1");
        assert_eq!(score.parts[1].id, "P2");
        assert_eq!(score.parts[1].name.as_deref(), Some("Bass"));
        assert_eq!(score.parts[1].measures.len(), 1);
    }

    #[test]
    fn test_headers_only_scores_keep_one_part() {
        let score = parse("X: 1\nT: Empty\nK: C").unwrap();
        assert_eq!(score.parts.len(), 1);
        assert!(score.parts[0].measures.is_empty());
    }
}
