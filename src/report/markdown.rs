//! Human-readable rendering of the unusable-art report

use super::UnusableArtReport;
use crate::types::Format;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt::Write;

/// Render the narrative report
///
/// Sections: summary, cards grouped by format (formats without entries are
/// omitted), layout analysis, and the complete flat list.
pub fn render_markdown(report: &UnusableArtReport, generated_at: DateTime<Utc>) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = write_report(&mut out, report, generated_at);
    out
}

fn write_report(
    out: &mut String,
    report: &UnusableArtReport,
    generated_at: DateTime<Utc>,
) -> std::fmt::Result {
    writeln!(out, "# Unusable Art Cards Report")?;
    writeln!(
        out,
        "Generated: {}\n",
        generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    )?;

    writeln!(out, "## Summary")?;
    writeln!(
        out,
        "Total cards with unusable art that are legal in formats: {}\n",
        report.total()
    )?;

    writeln!(out, "## Cards by Format\n")?;
    for format in Format::ALL {
        let entries = report.for_format(format);
        if entries.is_empty() {
            continue;
        }
        writeln!(out, "### {} ({} cards)\n", format, entries.len())?;
        for card in entries {
            writeln!(out, "- **{}** ({})", card.name, card.layout)?;
            writeln!(out, "  - ID: {}", card.id)?;
            writeln!(out, "  - Has main image_uris: {}", card.has_image_uris)?;
            writeln!(out, "  - Has card_faces: {}", card.has_card_faces)?;
            writeln!(
                out,
                "  - Card faces with images: {}",
                card.card_faces_with_images
            )?;
            writeln!(out, "  - [View on Scryfall]({})\n", card.scryfall_uri)?;
        }
    }

    writeln!(out, "## Layout Analysis\n")?;
    for (layout, count) in report.layout_breakdown() {
        writeln!(out, "- **{}**: {} cards", layout, count)?;
    }

    writeln!(out, "\n## Complete List\n")?;
    for card in &report.cards {
        let formats: Vec<&str> = card.formats.iter().map(Format::name).collect();
        writeln!(
            out,
            "- **{}** ({}) - Legal in: {}",
            card.name,
            card.layout,
            formats.join(", ")
        )?;
        writeln!(out, "  - [View on Scryfall]({})", card.scryfall_uri)?;
    }

    Ok(())
}
