// MusicXML builder state machine

use crate::models::{
    classify, to_divisions, BarlineKind, Dur, KeySignature, Mode, Note, Rest, TempoMark,
    TimeSignature,
};

/// State machine for building the measure body of one `<part>`.
pub struct MusicXmlBuilder {
    buffer: String,
    divisions: u32,
    attributes_written: bool,
    /// A repeat-start barline closes one measure but renders at the left of
    /// the next one
    pending_left_repeat: bool,
}

impl MusicXmlBuilder {
    pub fn new(divisions: u32) -> Self {
        Self {
            buffer: String::new(),
            divisions: divisions.max(1),
            attributes_written: false,
            pending_left_repeat: false,
        }
    }

    /// Open a measure. The first call also writes the part attributes.
    pub fn start_measure(
        &mut self,
        number: i32,
        implicit: bool,
        key: &KeySignature,
        time: &TimeSignature,
    ) {
        if implicit {
            self.buffer.push_str(&format!(
                "    <measure number=\"{}\" implicit=\"yes\">\n",
                number
            ));
        } else {
            self.buffer
                .push_str(&format!("    <measure number=\"{}\">\n", number));
        }
        if self.pending_left_repeat {
            self.buffer.push_str("      <barline location=\"left\">\n");
            self.buffer
                .push_str("        <bar-style>heavy-light</bar-style>\n");
            self.buffer
                .push_str("        <repeat direction=\"forward\"/>\n");
            self.buffer.push_str("      </barline>\n");
            self.pending_left_repeat = false;
        }
        if !self.attributes_written {
            self.write_attributes(key, time);
            self.attributes_written = true;
        }
    }

    /// Close the measure, rendering its closing barline when present.
    pub fn end_measure(&mut self, barline: Option<BarlineKind>) {
        match barline {
            Some(BarlineKind::Double) => self.write_right_barline("light-light", false),
            Some(BarlineKind::Final) => self.write_right_barline("light-heavy", false),
            Some(BarlineKind::RepeatEnd) => self.write_right_barline("light-heavy", true),
            Some(BarlineKind::RepeatStart) => self.pending_left_repeat = true,
            Some(BarlineKind::RepeatBoth) => {
                self.write_right_barline("light-heavy", true);
                self.pending_left_repeat = true;
            }
            Some(BarlineKind::Regular) | None => {}
        }
        self.buffer.push_str("    </measure>\n");
    }

    /// Write a note with pitch, duration, ties and any printed accidental.
    pub fn write_note(&mut self, note: &Note) -> Result<(), String> {
        let (value, dots) = classify(note.dur)
            .ok_or_else(|| format!("note duration {} cannot be notated", note.dur))?;

        self.buffer.push_str("      <note>\n");
        self.buffer.push_str("        <pitch>\n");
        self.buffer.push_str(&format!(
            "          <step>{}</step>\n",
            note.pitch.step.letter()
        ));
        if note.pitch.alter != 0 {
            self.buffer
                .push_str(&format!("          <alter>{}</alter>\n", note.pitch.alter));
        }
        self.buffer.push_str(&format!(
            "          <octave>{}</octave>\n",
            note.pitch.octave
        ));
        self.buffer.push_str("        </pitch>\n");
        self.buffer.push_str(&format!(
            "        <duration>{}</duration>\n",
            to_divisions(note.dur, self.divisions)
        ));

        // Tie elements: stop before start
        if note.tie_stop {
            self.buffer.push_str("        <tie type=\"stop\"/>\n");
        }
        if note.tie_start {
            self.buffer.push_str("        <tie type=\"start\"/>\n");
        }

        self.buffer
            .push_str(&format!("        <type>{}</type>\n", value.xml_name()));
        for _ in 0..dots {
            self.buffer.push_str("        <dot/>\n");
        }
        if let Some(accidental) = note.accidental {
            self.buffer.push_str(&format!(
                "        <accidental>{}</accidental>\n",
                accidental.xml_name()
            ));
        }

        if note.tie_stop || note.tie_start {
            self.buffer.push_str("        <notations>\n");
            if note.tie_stop {
                self.buffer.push_str("          <tied type=\"stop\"/>\n");
            }
            if note.tie_start {
                self.buffer.push_str("          <tied type=\"start\"/>\n");
            }
            self.buffer.push_str("        </notations>\n");
        }

        self.buffer.push_str("      </note>\n");
        Ok(())
    }

    /// Write a rest. A rest filling the whole measure is written as a
    /// measure rest without a type.
    pub fn write_rest(&mut self, rest: &Rest, measure_dur: Dur) -> Result<(), String> {
        self.buffer.push_str("      <note>\n");
        if rest.dur == measure_dur {
            self.buffer.push_str("        <rest measure=\"yes\"/>\n");
            self.buffer.push_str(&format!(
                "        <duration>{}</duration>\n",
                to_divisions(rest.dur, self.divisions)
            ));
        } else {
            let (value, dots) = classify(rest.dur)
                .ok_or_else(|| format!("rest duration {} cannot be notated", rest.dur))?;
            self.buffer.push_str("        <rest/>\n");
            self.buffer.push_str(&format!(
                "        <duration>{}</duration>\n",
                to_divisions(rest.dur, self.divisions)
            ));
            self.buffer
                .push_str(&format!("        <type>{}</type>\n", value.xml_name()));
            for _ in 0..dots {
                self.buffer.push_str("        <dot/>\n");
            }
        }
        self.buffer.push_str("      </note>\n");
        Ok(())
    }

    /// Write a metronome direction for the tune-wide tempo.
    pub fn write_tempo(&mut self, tempo: &TempoMark) -> Result<(), String> {
        let (value, dots) = classify(tempo.unit)
            .ok_or_else(|| format!("tempo beat unit {} cannot be notated", tempo.unit))?;
        let rate = format_number(tempo.per_minute);
        // <sound> carries quarter notes per minute
        let unit_quarters = *tempo.unit.numer() as f64 / *tempo.unit.denom() as f64 * 4.0;
        let qpm = format_number(tempo.per_minute * unit_quarters);

        self.buffer
            .push_str("      <direction placement=\"above\">\n");
        self.buffer.push_str("        <direction-type>\n");
        self.buffer.push_str("          <metronome>\n");
        self.buffer.push_str(&format!(
            "            <beat-unit>{}</beat-unit>\n",
            value.xml_name()
        ));
        for _ in 0..dots {
            self.buffer.push_str("            <beat-unit-dot/>\n");
        }
        self.buffer
            .push_str(&format!("            <per-minute>{}</per-minute>\n", rate));
        self.buffer.push_str("          </metronome>\n");
        self.buffer.push_str("        </direction-type>\n");
        self.buffer
            .push_str(&format!("        <sound tempo=\"{}\"/>\n", qpm));
        self.buffer.push_str("      </direction>\n");
        Ok(())
    }

    /// Hand back the accumulated part body.
    pub fn finalize(self) -> String {
        self.buffer
    }

    fn write_right_barline(&mut self, style: &str, repeat_backward: bool) {
        self.buffer.push_str("      <barline location=\"right\">\n");
        self.buffer
            .push_str(&format!("        <bar-style>{}</bar-style>\n", style));
        if repeat_backward {
            self.buffer
                .push_str("        <repeat direction=\"backward\"/>\n");
        }
        self.buffer.push_str("      </barline>\n");
    }

    /// Part attributes: divisions, key, time and a treble clef.
    fn write_attributes(&mut self, key: &KeySignature, time: &TimeSignature) {
        self.buffer.push_str("      <attributes>\n");
        self.buffer.push_str(&format!(
            "        <divisions>{}</divisions>\n",
            self.divisions
        ));
        self.buffer.push_str("        <key>\n");
        self.buffer
            .push_str(&format!("          <fifths>{}</fifths>\n", key.fifths));
        let mode = match key.mode {
            Mode::Major => "major",
            Mode::Minor => "minor",
        };
        self.buffer
            .push_str(&format!("          <mode>{}</mode>\n", mode));
        self.buffer.push_str("        </key>\n");
        self.buffer.push_str("        <time>\n");
        self.buffer
            .push_str(&format!("          <beats>{}</beats>\n", time.beats));
        self.buffer.push_str(&format!(
            "          <beat-type>{}</beat-type>\n",
            time.beat_type
        ));
        self.buffer.push_str("        </time>\n");
        self.buffer
            .push_str("        <clef><sign>G</sign><line>2</line></clef>\n");
        self.buffer.push_str("      </attributes>\n");
    }
}

/// Format a rate without a trailing `.0` when it is whole.
fn format_number(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Escape special XML characters
pub(super) fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{dur, Pitch, Step};

    fn builder() -> MusicXmlBuilder {
        MusicXmlBuilder::new(1)
    }

    #[test]
    fn test_measure_header_and_implicit_flag() {
        let mut b = builder();
        b.start_measure(0, true, &KeySignature::default(), &TimeSignature::default());
        b.end_measure(None);
        let xml = b.finalize();
        assert!(xml.contains("<measure number=\"0\" implicit=\"yes\">"));
        assert!(xml.contains("<divisions>1</divisions>"));
        assert!(xml.contains("<beats>4</beats>"));
        assert!(xml.contains("<clef><sign>G</sign><line>2</line></clef>"));
    }

    #[test]
    fn test_note_with_alteration() {
        let mut b = builder();
        let mut note = Note::new(Pitch::new(Step::F, 1, 4), dur(1, 4));
        note.accidental = Some(crate::models::Accidental::Sharp);
        b.write_note(&note).unwrap();
        let xml = b.finalize();
        assert!(xml.contains("<step>F</step>"));
        assert!(xml.contains("<alter>1</alter>"));
        assert!(xml.contains("<octave>4</octave>"));
        assert!(xml.contains("<duration>1</duration>"));
        assert!(xml.contains("<type>quarter</type>"));
        assert!(xml.contains("<accidental>sharp</accidental>"));
    }

    #[test]
    fn test_dotted_note_gets_dot_element() {
        let mut b = MusicXmlBuilder::new(2);
        let note = Note::new(Pitch::new(Step::A, 0, 4), dur(3, 8));
        b.write_note(&note).unwrap();
        let xml = b.finalize();
        assert!(xml.contains("<type>quarter</type>"));
        assert!(xml.contains("<dot/>"));
        assert!(xml.contains("<duration>3</duration>"));
    }

    #[test]
    fn test_tie_elements_order() {
        let mut b = builder();
        let mut note = Note::new(Pitch::new(Step::A, 0, 4), dur(1, 4));
        note.tie_start = true;
        note.tie_stop = true;
        b.write_note(&note).unwrap();
        let xml = b.finalize();
        let stop = xml.find("<tie type=\"stop\"/>").unwrap();
        let start = xml.find("<tie type=\"start\"/>").unwrap();
        assert!(stop < start);
        assert!(xml.contains("<tied type=\"stop\"/>"));
        assert!(xml.contains("<tied type=\"start\"/>"));
    }

    #[test]
    fn test_full_measure_rest_has_no_type() {
        let mut b = builder();
        b.write_rest(&Rest::new(dur(1, 1)), dur(1, 1)).unwrap();
        let xml = b.finalize();
        assert!(xml.contains("<rest measure=\"yes\"/>"));
        assert!(!xml.contains("<type>"));
    }

    #[test]
    fn test_partial_rest_is_typed() {
        let mut b = MusicXmlBuilder::new(2);
        b.write_rest(&Rest::new(dur(1, 8)), dur(1, 1)).unwrap();
        let xml = b.finalize();
        assert!(xml.contains("<rest/>"));
        assert!(xml.contains("<type>eighth</type>"));
        assert!(xml.contains("<duration>1</duration>"));
    }

    #[test]
    fn test_repeat_barlines_span_measures() {
        let mut b = builder();
        b.start_measure(1, false, &KeySignature::default(), &TimeSignature::default());
        b.end_measure(Some(BarlineKind::RepeatStart));
        b.start_measure(2, false, &KeySignature::default(), &TimeSignature::default());
        b.end_measure(Some(BarlineKind::RepeatEnd));
        let xml = b.finalize();
        assert!(xml.contains("<repeat direction=\"forward\"/>"));
        assert!(xml.contains("<repeat direction=\"backward\"/>"));
        assert!(xml.contains("<bar-style>heavy-light</bar-style>"));
        assert!(xml.contains("<bar-style>light-heavy</bar-style>"));
    }

    #[test]
    fn test_tempo_direction() {
        let mut b = builder();
        b.write_tempo(&TempoMark::new(dur(1, 4), 120.0)).unwrap();
        let xml = b.finalize();
        assert!(xml.contains("<beat-unit>quarter</beat-unit>"));
        assert!(xml.contains("<per-minute>120</per-minute>"));
        assert!(xml.contains("<sound tempo=\"120\"/>"));
    }

    #[test]
    fn test_tempo_with_eighth_unit() {
        let mut b = builder();
        b.write_tempo(&TempoMark::new(dur(1, 8), 90.0)).unwrap();
        let xml = b.finalize();
        assert!(xml.contains("<beat-unit>eighth</beat-unit>"));
        assert!(xml.contains("<sound tempo=\"45\"/>"));
    }

    #[test]
    fn test_xml_escape() {
        assert_eq!(xml_escape("Tom & Jerry's <Suite>"),
            "Tom &amp; Jerry&apos;s &lt;Suite&gt;");
    }
}
