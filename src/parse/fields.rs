//! Header information-field parsers
//!
//! Each ABC information field that influences the score gets its own parser.
//! All of them return `Err(message)` on bad input; the caller attaches the
//! line number.

use num_rational::Ratio;

use crate::models::{Dur, KeySignature, Mode, Step, TempoMark, TimeSignature};

/// Parse a meter field (`M:`): `n/d`, `C` (common time) or `C|` (cut time).
pub fn parse_meter(value: &str) -> Result<TimeSignature, String> {
    let value = value.trim();
    match value {
        "C" => return Ok(TimeSignature::new(4, 4)),
        "C|" => return Ok(TimeSignature::new(2, 2)),
        _ => {}
    }
    let (beats, beat_type) = value
        .split_once('/')
        .ok_or_else(|| format!("unrecognized meter '{value}'"))?;
    let beats: u8 = beats
        .trim()
        .parse()
        .map_err(|_| format!("bad beat count in meter '{value}'"))?;
    let beat_type: u8 = beat_type
        .trim()
        .parse()
        .map_err(|_| format!("bad beat unit in meter '{value}'"))?;
    if beats == 0 || beat_type == 0 {
        return Err(format!("meter '{value}' has a zero component"));
    }
    Ok(TimeSignature::new(beats, beat_type))
}

/// Parse a unit-note-length field (`L:`), a fraction of a whole note.
pub fn parse_unit_length(value: &str) -> Result<Dur, String> {
    let value = value.trim();
    let (numer, denom) = value
        .split_once('/')
        .ok_or_else(|| format!("unrecognized unit note length '{value}'"))?;
    let numer: u32 = numer
        .trim()
        .parse()
        .map_err(|_| format!("bad unit note length '{value}'"))?;
    let denom: u32 = denom
        .trim()
        .parse()
        .map_err(|_| format!("bad unit note length '{value}'"))?;
    if numer == 0 || denom == 0 {
        return Err(format!("unit note length '{value}' has a zero component"));
    }
    Ok(Ratio::new(numer, denom))
}

/// Default unit note length when `L:` is absent: meters shorter than 3/4 get
/// sixteenths, everything else eighths.
pub fn default_unit_length(time: &TimeSignature) -> Dur {
    if time.measure_dur() < Ratio::new(3, 4) {
        Ratio::new(1, 16)
    } else {
        Ratio::new(1, 8)
    }
}

/// Parse a tempo field (`Q:`): either `beats-per-minute` (quarter-note beat)
/// or `unit=beats-per-minute`, where the rate may be fractional.
///
/// Text-only tempo fields (`Q: "Allegro"`) carry no rate and yield `None`.
pub fn parse_tempo(value: &str) -> Result<Option<TempoMark>, String> {
    let value = value.trim();
    if value.starts_with('"') {
        return Ok(None);
    }
    let (unit, rate) = match value.split_once('=') {
        Some((unit, rate)) => {
            let unit = unit.trim();
            let (numer, denom) = unit
                .split_once('/')
                .ok_or_else(|| format!("unrecognized tempo beat unit '{unit}'"))?;
            let numer: u32 = numer
                .trim()
                .parse()
                .map_err(|_| format!("bad tempo beat unit '{unit}'"))?;
            let denom: u32 = denom
                .trim()
                .parse()
                .map_err(|_| format!("bad tempo beat unit '{unit}'"))?;
            if numer == 0 || denom == 0 {
                return Err(format!("tempo beat unit '{unit}' has a zero component"));
            }
            (Ratio::new(numer, denom), rate.trim())
        }
        None => (Ratio::new(1, 4), value),
    };
    let per_minute: f64 = rate
        .parse()
        .map_err(|_| format!("bad tempo rate '{rate}'"))?;
    if !per_minute.is_finite() || per_minute <= 0.0 {
        return Err(format!("tempo rate '{rate}' is out of range"));
    }
    Ok(Some(TempoMark::new(unit, per_minute)))
}

/// Parse a key field (`K:`): tonic letter, optional `#`/`b`, optional mode
/// word (`m`, `min`, `minor`, `maj`, `major`, attached or space-separated).
/// `none` means an open key, rendered as C. Modes outside major/minor are
/// rejected; `clef=` style modifiers after the key token are skipped.
pub fn parse_key(value: &str) -> Result<KeySignature, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        return Ok(KeySignature::default());
    }

    let mut tokens = value.split_whitespace();
    let token = tokens.next().unwrap_or(value);

    let mut chars = token.chars();
    let letter = chars.next().ok_or_else(|| "empty key field".to_string())?;
    let step = Step::from_letter(letter).ok_or_else(|| format!("unrecognized key '{token}'"))?;
    let rest = chars.as_str();

    let (alter, mut mode_text) = match rest.chars().next() {
        Some('#') => (1i8, &rest[1..]),
        Some('b') if is_mode_suffix(&rest[1..]) => (-1i8, &rest[1..]),
        _ => (0i8, rest),
    };
    if mode_text.is_empty() {
        match tokens.next() {
            Some(extra) if !extra.contains('=') => mode_text = extra,
            Some(_) => tracing::debug!(field = value, "ignoring key field modifiers"),
            None => {}
        }
    }

    let mode = match mode_text.to_ascii_lowercase().as_str() {
        "" | "maj" | "major" => Mode::Major,
        "m" | "min" | "minor" => Mode::Minor,
        other => return Err(format!("unsupported key mode '{other}'")),
    };

    // Major keys sit at the step's own fifths offset; relative minors three
    // fifths below.
    let mut fifths = step.fifths() + 7 * alter;
    if mode == Mode::Minor {
        fifths -= 3;
    }
    if !(-7..=7).contains(&fifths) {
        return Err(format!("key '{token}' needs more than seven accidentals"));
    }
    Ok(KeySignature::new(fifths, mode))
}

fn is_mode_suffix(rest: &str) -> bool {
    matches!(
        rest.to_ascii_lowercase().as_str(),
        "" | "m" | "min" | "minor" | "maj" | "major"
    )
}

/// Parse a voice declaration (`V:`): an id token, optionally followed by a
/// `name="..."` attribute.
pub fn parse_voice_decl(value: &str) -> Result<(String, Option<String>), String> {
    let value = value.trim();
    let id = value
        .split_whitespace()
        .next()
        .ok_or_else(|| "empty voice field".to_string())?
        .to_string();
    let name = value.find("name=\"").and_then(|start| {
        let rest = &value[start + 6..];
        rest.find('"').map(|end| rest[..end].to_string())
    });
    Ok((id, name))
}
