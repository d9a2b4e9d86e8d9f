//! Measure structuring
//!
//! Folds a voice's flat event stream into measures: splits at barlines,
//! detects an anacrusis, assigns printed numbers and resolves tie endpoints.
//!
//! Native numbering starts at 0 when the first measure is a pickup
//! candidate, either because it is shorter than the meter or because the
//! tune body opened with a plain barline before any note. The conversion
//! pipeline renumbers from 1 when the caller says there is no pickup.

use num_rational::Ratio;

use crate::models::{
    BarlineKind, Dur, Measure, MeasureElement, Pitch, ScoreEvent, TimeSignature,
};

/// Build the measure list for one voice.
pub fn measurize(events: &[ScoreEvent], time: &TimeSignature) -> Vec<Measure> {
    let mut raw: Vec<(Vec<MeasureElement>, Option<BarlineKind>)> = Vec::new();
    let mut current: Vec<MeasureElement> = Vec::new();
    let mut opens_with_barline = false;

    for event in events {
        match event {
            ScoreEvent::Note(note) => current.push(MeasureElement::Note(note.clone())),
            ScoreEvent::Rest(rest) => current.push(MeasureElement::Rest(rest.clone())),
            ScoreEvent::Bar(kind) => {
                if current.is_empty() {
                    if raw.is_empty() {
                        // Leading barline before any note
                        if *kind == BarlineKind::Regular {
                            opens_with_barline = true;
                        } else {
                            tracing::debug!(?kind, "dropping leading barline");
                        }
                    } else if *kind != BarlineKind::Regular {
                        // "| |]" style closes: keep the stronger barline
                        if let Some(last) = raw.last_mut() {
                            last.1 = Some(*kind);
                        }
                    }
                } else {
                    raw.push((std::mem::take(&mut current), Some(*kind)));
                }
            }
        }
    }
    if !current.is_empty() {
        raw.push((current, None));
    }

    let pickup = !raw.is_empty() && (opens_with_barline || first_is_short(&raw, time));

    let mut measures: Vec<Measure> = raw
        .into_iter()
        .enumerate()
        .map(|(i, (elements, barline))| {
            let number = if pickup { i as i32 } else { i as i32 + 1 };
            let mut measure = Measure::new(number);
            measure.implicit = pickup && i == 0;
            measure.elements = elements;
            measure.barline = barline.filter(|k| *k != BarlineKind::Regular);
            measure
        })
        .collect();

    resolve_ties(&mut measures);
    measures
}

fn first_is_short(
    raw: &[(Vec<MeasureElement>, Option<BarlineKind>)],
    time: &TimeSignature,
) -> bool {
    let Some((elements, _)) = raw.first() else {
        return false;
    };
    let content: Dur = elements
        .iter()
        .fold(Ratio::from_integer(0), |acc, e| acc + e.dur());
    content < time.measure_dur()
}

/// A started tie needs the immediately following element to be a note of the
/// same pitch; otherwise the tie is dropped.
fn resolve_ties(measures: &mut [Measure]) {
    let positions: Vec<(usize, usize)> = measures
        .iter()
        .enumerate()
        .flat_map(|(mi, m)| (0..m.elements.len()).map(move |ei| (mi, ei)))
        .collect();

    for window in positions.windows(2) {
        let (mi, ei) = window[0];
        let (nmi, nei) = window[1];
        let Some(start_pitch) = tie_start_pitch(&measures[mi].elements[ei]) else {
            continue;
        };
        let next_matches = matches!(
            &measures[nmi].elements[nei],
            MeasureElement::Note(next) if next.pitch == start_pitch
        );
        if next_matches {
            if let MeasureElement::Note(next) = &mut measures[nmi].elements[nei] {
                next.tie_stop = true;
            }
        } else {
            tracing::debug!("dropping tie without a matching following note");
            clear_tie_start(&mut measures[mi].elements[ei]);
        }
    }

    // A tie on the very last element has nothing to land on
    if let Some(&(mi, ei)) = positions.last() {
        if tie_start_pitch(&measures[mi].elements[ei]).is_some() {
            tracing::debug!("dropping tie on the final note");
            clear_tie_start(&mut measures[mi].elements[ei]);
        }
    }
}

fn tie_start_pitch(element: &MeasureElement) -> Option<Pitch> {
    match element {
        MeasureElement::Note(note) if note.tie_start => Some(note.pitch),
        _ => None,
    }
}

fn clear_tie_start(element: &mut MeasureElement) {
    if let MeasureElement::Note(note) = element {
        note.tie_start = false;
    }
}
