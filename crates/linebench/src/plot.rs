//! Bounding-polygon debug plot
//!
//! Renders the polygons encoded in a JSONL file's ids over a page image as
//! an SVG document, one closed polygon per annotation with the raw id as a
//! legend entry. Meant for eyeballing a page's segmentation, not for
//! production output.

use crate::geometry::LineId;
use crate::{jsonl, Result};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Deterministic stroke palette, cycled over annotations in file order
const PALETTE: [&str; 8] = [
    "#e6194b", "#3cb44b", "#4363d8", "#f58231", "#911eb4", "#46f0f0", "#f032e6", "#9a6324",
];

const MARGIN: i64 = 16;
const LEGEND_LINE_HEIGHT: i64 = 18;

fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render an SVG overlay for a set of labeled polygons
///
/// Each entry pairs the raw annotation id with its parsed geometry; the raw
/// id becomes the legend label so a legend entry maps straight back to one
/// bounding box. The canvas is sized from the polygon extents;
/// `image_href`, when given, is embedded underneath the overlay so the
/// polygons line up with the source page.
pub fn render_svg(entries: &[(String, LineId)], image_href: Option<&str>) -> String {
    let width = entries
        .iter()
        .flat_map(|(_, id)| id.polygon.iter().map(|p| p.x))
        .max()
        .unwrap_or(0)
        + MARGIN;
    let height = entries
        .iter()
        .flat_map(|(_, id)| id.polygon.iter().map(|p| p.y))
        .max()
        .unwrap_or(0)
        + MARGIN;
    let legend_height = entries.len() as i64 * LEGEND_LINE_HEIGHT + MARGIN;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{total}" viewBox="0 0 {width} {total}">"#,
        total = height + legend_height,
    );

    if let Some(href) = image_href {
        let _ = writeln!(
            svg,
            r#"  <image href="{}" x="0" y="0" width="{width}" height="{height}"/>"#,
            xml_escape(href),
        );
    }

    for (index, (_, line_id)) in entries.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let points = line_id
            .polygon
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        let _ = writeln!(
            svg,
            r#"  <polygon points="{points}" fill="none" stroke="{color}" stroke-width="2"/>"#,
        );
    }

    for (index, (raw_id, _)) in entries.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let y = height + MARGIN + index as i64 * LEGEND_LINE_HEIGHT;
        let label = xml_escape(raw_id);
        let _ = writeln!(
            svg,
            r#"  <text x="{MARGIN}" y="{y}" fill="{color}" font-size="13" font-family="monospace">{label}</text>"#,
        );
    }

    svg.push_str("</svg>\n");
    svg
}

/// Plot one JSONL file's polygons over a page image
pub fn run(jsonl_path: &Path, image_href: Option<&str>, output_svg: &Path) -> Result<usize> {
    let records = jsonl::read_records_lenient(jsonl_path)?;

    let mut entries = Vec::new();
    for record in &records {
        let Some(id) = record.id.as_deref() else {
            continue;
        };
        match LineId::parse(id) {
            Ok(parsed) => entries.push((id.to_string(), parsed)),
            Err(err) => {
                warn!(id, %err, "skipping record with unparseable id");
            }
        }
    }

    let svg = render_svg(&entries, image_href);
    if let Some(parent) = output_svg.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(output_svg, svg)?;

    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str) -> (String, LineId) {
        (id.to_string(), LineId::parse(id).unwrap())
    }

    #[test]
    fn test_svg_contains_polygon_and_label() {
        let entries = vec![entry("p1_10-20_30-20_30-40_10-40")];
        let svg = render_svg(&entries, None);

        assert!(svg.contains(r#"points="10,20 30,20 30,40 10,40""#));
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_legend_labels_are_raw_ids() {
        let entries = vec![entry("p1_10-20_30-20_30-40_10-40")];
        let svg = render_svg(&entries, None);

        // The full raw id is the label text, not a renumbered form.
        assert!(svg.contains(">p1_10-20_30-20_30-40_10-40</text>"));
        assert!(!svg.contains(">p1_1</text>"));
    }

    #[test]
    fn test_image_href_is_escaped() {
        let entries = vec![entry("p1_1-1")];
        let svg = render_svg(&entries, Some("page.jpg?a=1&b=2"));
        assert!(svg.contains("page.jpg?a=1&amp;b=2"));
    }

    #[test]
    fn test_colors_cycle_deterministically() {
        let entries: Vec<(String, LineId)> = (0..10)
            .map(|i| entry(&format!("p1_{}-{}", i, i * 10)))
            .collect();
        let svg = render_svg(&entries, None);

        // 8-color palette wraps after the eighth polygon.
        assert_eq!(svg.matches(PALETTE[0]).count(), 4); // 2 polygons + 2 labels
    }

    #[test]
    fn test_run_skips_bad_ids() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let input = temp_dir.path().join("page.jsonl");
        fs::write(&input, "{\"id\":\"p1_5-5\"}\n{\"id\":\"broken\"}\n").unwrap();

        let output = temp_dir.path().join("page.svg");
        let plotted = run(&input, None, &output).unwrap();
        assert_eq!(plotted, 1);
        assert!(output.exists());

        let svg = fs::read_to_string(&output).unwrap();
        assert!(svg.contains(">p1_5-5</text>"));
    }
}
