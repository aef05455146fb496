//! Output rendering: Markdown timeline table, JSON, and the run summary.

use std::io::{self, Write};

use chronolex_core::event::TimelineEvent;

const DESCRIPTION_PREVIEW_CHARS: usize = 100;

/// Write the timeline as a Markdown table.
pub fn write_markdown(out: &mut impl Write, events: &[TimelineEvent]) -> io::Result<()> {
    writeln!(out, "# Legal Document Timeline")?;
    writeln!(out)?;
    writeln!(out, "| Date | Event Type | Description | Source File |")?;
    writeln!(out, "|------|------------|-------------|-------------|")?;
    for event in events {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            event.date,
            event.event_type,
            preview(&event.description),
            event.source_file
        )?;
    }
    Ok(())
}

/// Write the full event list as pretty-printed JSON.
pub fn write_json(out: &mut impl Write, events: &[TimelineEvent]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, events)?;
    out.write_all(b"\n")?;
    Ok(())
}

/// Write the processing summary.
pub fn write_summary(
    out: &mut impl Write,
    files_processed: usize,
    events_extracted: usize,
    elapsed_secs: f64,
) -> io::Result<()> {
    writeln!(out, "# Processing Summary")?;
    writeln!(out)?;
    writeln!(out, "* **Files Processed:** {files_processed}")?;
    writeln!(out, "* **Events Extracted:** {events_extracted}")?;
    writeln!(out, "* **Total Time:** {elapsed_secs:.2} seconds")?;
    Ok(())
}

/// Flatten, escape table pipes, and truncate a description for one cell.
fn preview(description: &str) -> String {
    let flat = description.replace('\n', " ").replace('|', "\\|");
    if flat.chars().count() <= DESCRIPTION_PREVIEW_CHARS {
        return flat;
    }
    let truncated: String = flat.chars().take(DESCRIPTION_PREVIEW_CHARS).collect();
    format!("{truncated}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chronolex_core::event::{EntityMap, EventOrigin};

    fn event(date: &str, description: &str) -> TimelineEvent {
        TimelineEvent {
            date: date.into(),
            event_type: "Lease Agreement".into(),
            description: description.into(),
            context: "ctx".into(),
            confidence_score: 0.85,
            source_file: "deed.txt".into(),
            entities: EntityMap::new(),
            origin: EventOrigin::Local,
        }
    }

    fn render_markdown(events: &[TimelineEvent]) -> String {
        let mut buf = Vec::new();
        write_markdown(&mut buf, events).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn markdown_has_header_and_rows() {
        let rendered = render_markdown(&[event("March 11, 1921", "A lease deed was executed.")]);
        assert!(rendered.starts_with("# Legal Document Timeline"));
        assert!(rendered.contains("| Date | Event Type | Description | Source File |"));
        assert!(rendered.contains(
            "| March 11, 1921 | Lease Agreement | A lease deed was executed. | deed.txt |"
        ));
    }

    #[test]
    fn markdown_escapes_pipes_and_newlines() {
        let rendered = render_markdown(&[event("March 11, 1921", "one | two\nthree")]);
        assert!(rendered.contains("one \\| two three"));
    }

    #[test]
    fn markdown_truncates_long_descriptions() {
        let rendered = render_markdown(&[event("March 11, 1921", &"d".repeat(150))]);
        assert!(rendered.contains(&format!("{}...", "d".repeat(100))));
        assert!(!rendered.contains(&"d".repeat(101)));
    }

    #[test]
    fn json_roundtrips() {
        let mut buf = Vec::new();
        write_json(&mut buf, &[event("March 11, 1921", "desc")]).unwrap();
        let parsed: Vec<TimelineEvent> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].date, "March 11, 1921");
    }

    #[test]
    fn summary_reports_counts_and_time() {
        let mut buf = Vec::new();
        write_summary(&mut buf, 12, 34, 5.678).unwrap();
        let rendered = String::from_utf8(buf).unwrap();
        assert!(rendered.contains("* **Files Processed:** 12"));
        assert!(rendered.contains("* **Events Extracted:** 34"));
        assert!(rendered.contains("* **Total Time:** 5.68 seconds"));
    }
}
