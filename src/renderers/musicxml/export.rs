// Score to MusicXML document export

use crate::models::{divisions_for, MeasureElement, Score};

use super::builder::{xml_escape, MusicXmlBuilder};

/// Render a score as a complete MusicXML 3.1 partwise document.
pub fn to_musicxml(score: &Score) -> Result<String, String> {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<!DOCTYPE score-partwise PUBLIC \"-//Recordare//DTD MusicXML 3.1 Partwise//EN\" \"http://www.musicxml.org/dtds/partwise.dtd\">\n");
    xml.push_str("<score-partwise version=\"3.1\">\n");

    if let Some(title) = score.metadata.title.as_deref() {
        if !title.is_empty() {
            xml.push_str(&format!(
                "  <movement-title>{}</movement-title>\n",
                xml_escape(title)
            ));
        }
    }
    if let Some(composer) = score.metadata.composer.as_deref() {
        if !composer.is_empty() {
            xml.push_str("  <identification>\n");
            xml.push_str(&format!(
                "    <creator type=\"composer\">{}</creator>\n",
                xml_escape(composer)
            ));
            xml.push_str("  </identification>\n");
        }
    }

    xml.push_str("  <part-list>\n");
    for part in &score.parts {
        xml.push_str(&format!("    <score-part id=\"{}\">\n", part.id));
        let name = part.name.as_deref().unwrap_or("");
        xml.push_str(&format!(
            "      <part-name>{}</part-name>\n",
            xml_escape(name)
        ));
        xml.push_str("    </score-part>\n");
    }
    xml.push_str("  </part-list>\n");

    for (part_index, part) in score.parts.iter().enumerate() {
        xml.push_str(&format!("  <part id=\"{}\">\n", part.id));
        let divisions = divisions_for(part.durations());
        let mut builder = MusicXmlBuilder::new(divisions);

        if part.measures.is_empty() {
            builder.start_measure(1, false, &part.key, &part.time);
            builder.end_measure(None);
        }
        for (measure_index, measure) in part.measures.iter().enumerate() {
            builder.start_measure(measure.number, measure.implicit, &part.key, &part.time);
            if part_index == 0 && measure_index == 0 {
                if let Some(tempo) = &score.tempo {
                    builder.write_tempo(tempo)?;
                }
            }
            let measure_dur = part.time.measure_dur();
            for element in &measure.elements {
                match element {
                    MeasureElement::Note(note) => builder.write_note(note)?,
                    MeasureElement::Rest(rest) => builder.write_rest(rest, measure_dur)?,
                }
            }
            builder.end_measure(measure.barline);
        }
        xml.push_str(&builder.finalize());
        xml.push_str("  </part>\n");
    }

    xml.push_str("</score-partwise>\n");
    Ok(xml)
}
