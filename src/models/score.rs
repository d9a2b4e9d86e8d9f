//! Score, part and measure containers
//!
//! The in-memory score a conversion request works on. Built by the parser
//! and measurizer, post-processed by the conversion pipeline, consumed by
//! the MusicXML exporter and the braille transcriber. Never persisted.

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use super::duration::Dur;
use super::elements::{BarlineKind, KeySignature, Note, Rest, TempoMark, TimeSignature};
use super::metadata::Metadata;

/// A complete parsed score.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Score {
    pub metadata: Metadata,
    /// Tune-wide tempo, if the header carried one
    pub tempo: Option<TempoMark>,
    pub parts: Vec<Part>,
}

impl Score {
    pub fn new(metadata: Metadata) -> Self {
        Self {
            metadata,
            tempo: None,
            parts: Vec::new(),
        }
    }

    /// Renumber measures 1..N in every part and clear pickup flags.
    pub fn renumber_from_one(&mut self) {
        for part in &mut self.parts {
            for (i, measure) in part.measures.iter_mut().enumerate() {
                measure.number = i as i32 + 1;
                measure.implicit = false;
            }
        }
    }
}

/// A single voice, one staff in the outputs.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Part {
    /// Stable part id ("P1", "P2", ...)
    pub id: String,
    /// Display name from the voice declaration, if any
    pub name: Option<String>,
    pub key: KeySignature,
    pub time: TimeSignature,
    pub measures: Vec<Measure>,
}

impl Part {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            key: KeySignature::default(),
            time: TimeSignature::default(),
            measures: Vec::new(),
        }
    }

    /// Iterate every note and rest duration in the part.
    pub fn durations(&self) -> impl Iterator<Item = Dur> + '_ {
        self.measures
            .iter()
            .flat_map(|m| m.elements.iter())
            .map(|e| e.dur())
    }
}

/// One measure of one part.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Measure {
    /// Printed measure number
    pub number: i32,
    /// Pickup measure, excluded from the count
    pub implicit: bool,
    pub elements: Vec<MeasureElement>,
    /// Barline closing the measure, when not a plain one
    pub barline: Option<BarlineKind>,
}

impl Measure {
    pub fn new(number: i32) -> Self {
        Self {
            number,
            implicit: false,
            elements: Vec::new(),
            barline: None,
        }
    }

    /// Total sounding duration of the measure contents.
    pub fn content_dur(&self) -> Dur {
        self.elements
            .iter()
            .fold(Ratio::from_integer(0), |acc, e| acc + e.dur())
    }
}

/// A note or a rest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum MeasureElement {
    Note(Note),
    Rest(Rest),
}

impl MeasureElement {
    pub fn dur(&self) -> Dur {
        match self {
            MeasureElement::Note(n) => n.dur,
            MeasureElement::Rest(r) => r.dur,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::duration::dur;
    use crate::models::pitch::{Pitch, Step};

    fn quarter_note(step: Step) -> MeasureElement {
        MeasureElement::Note(Note::new(Pitch::new(step, 0, 4), dur(1, 4)))
    }

    #[test]
    fn test_renumber_from_one_clears_pickup() {
        let mut score = Score::new(Metadata::default());
        let mut part = Part::new("P1".to_string());
        let mut pickup = Measure::new(0);
        pickup.implicit = true;
        pickup.elements.push(quarter_note(Step::A));
        let mut full = Measure::new(1);
        full.elements.push(quarter_note(Step::B));
        part.measures = vec![pickup, full];
        score.parts.push(part);

        score.renumber_from_one();

        let numbers: Vec<i32> = score.parts[0].measures.iter().map(|m| m.number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert!(score.parts[0].measures.iter().all(|m| !m.implicit));
    }

    #[test]
    fn test_content_dur_sums_elements() {
        let mut measure = Measure::new(1);
        measure.elements.push(quarter_note(Step::C));
        measure.elements.push(MeasureElement::Rest(Rest::new(dur(1, 2))));
        assert_eq!(measure.content_dur(), dur(3, 4));
    }
}
