//! Line reconciliation engine
//!
//! For every split group this module decides whether the annotation set can
//! be trusted on its own, and derives the canonical 1-based line numbering
//! either from bounding-box geometry or from the split's plain-text
//! transcript.
//!
//! The two numbering schemes agree on well-formed inputs, where every
//! visually ordered line image has exactly one annotation. The `line` field
//! is a reviewer-asserted expected count; when it matches the group size,
//! the annotation set is complete and one-to-one with physical lines, and
//! purely geometric ordering is safe. On any disagreement the transcript's
//! physical line order is taken as ground truth instead. A group is
//! processed by exactly one of the two strategies, never a mix.

use crate::geometry::LineId;
use crate::record::AnnotationRecord;
use crate::Result;
use std::fs;
use std::path::Path;
use tracing::warn;

/// A canonically renumbered line: line-image filename plus its text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalLine {
    /// `<split>_<n>.png`, n assigned 1..N
    pub image_id: String,
    pub text: String,
}

/// How a split group's lines are renumbered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Sort annotations by top-edge y and rank them
    Geometry,
    /// Trust the physical line order of the split's transcript
    TextFallback,
}

/// Choose the renumbering strategy for one split group
///
/// Geometry requires every member to carry `line` and the group size to
/// equal the first member's `line` value. Per-record `line` values are not
/// cross-checked beyond presence; downstream datasets depend on exactly
/// this selection rule.
pub fn select_strategy(group: &[AnnotationRecord]) -> Strategy {
    let Some(first) = group.first() else {
        return Strategy::TextFallback;
    };
    let all_have_line = group.iter().all(|record| record.line.is_some());
    match first.line {
        Some(expected) if all_have_line && group.len() as u64 == expected => Strategy::Geometry,
        _ => Strategy::TextFallback,
    }
}

/// Renumber a group by bounding-box geometry
///
/// Records missing `line` or carrying an unparseable id are skipped with a
/// warning. The sort is stable, so annotations sharing a top edge keep
/// their encounter order. An empty result is valid output, not an error.
pub fn renumber_by_geometry(split_id: &str, group: &[AnnotationRecord]) -> Vec<CanonicalLine> {
    let mut positioned: Vec<(i64, &AnnotationRecord)> = Vec::with_capacity(group.len());

    for record in group {
        let Some(id) = record.id.as_deref() else {
            warn!(split_id, "missing 'id' key, skipping record");
            continue;
        };
        if record.line.is_none() {
            warn!(id, "missing 'line' key, skipping record");
            continue;
        }
        match LineId::parse(id) {
            Ok(parsed) => positioned.push((parsed.top_edge(), record)),
            Err(err) => {
                warn!(id, %err, "skipping record with unparseable id");
            }
        }
    }

    positioned.sort_by_key(|(top_edge, _)| *top_edge);

    positioned
        .iter()
        .enumerate()
        .map(|(index, (_, record))| CanonicalLine {
            image_id: format!("{}_{}.png", split_id, index + 1),
            text: record.user_input.clone().unwrap_or_default(),
        })
        .collect()
}

/// Renumber a split from its plain-text transcript
///
/// Each physical line of `<text_dir>/<split>.txt` becomes one canonical
/// line in file order. A missing transcript drops the split with a warning
/// rather than failing the run.
pub fn renumber_from_transcript(split_id: &str, text_dir: &Path) -> Result<Vec<CanonicalLine>> {
    let transcript = text_dir.join(format!("{split_id}.txt"));
    if !transcript.exists() {
        warn!(split_id, path = %transcript.display(), "transcript not found, dropping split");
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(&transcript)?;
    let lines = contents
        .lines()
        .enumerate()
        .map(|(index, line)| CanonicalLine {
            image_id: format!("{}_{}.png", split_id, index + 1),
            text: line.trim_end().to_string(),
        })
        .collect();

    Ok(lines)
}

/// Reconcile one split group end to end
pub fn reconcile_group(
    split_id: &str,
    group: &[AnnotationRecord],
    text_dir: &Path,
) -> Result<Vec<CanonicalLine>> {
    match select_strategy(group) {
        Strategy::Geometry => Ok(renumber_by_geometry(split_id, group)),
        Strategy::TextFallback => renumber_from_transcript(split_id, text_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(json: &str) -> AnnotationRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_geometry_selected_when_count_matches() {
        let group = vec![
            record(r#"{"id":"s1_0-30","line":2,"user_input":"low"}"#),
            record(r#"{"id":"s1_0-10","line":2,"user_input":"high"}"#),
        ];
        assert_eq!(select_strategy(&group), Strategy::Geometry);
    }

    #[test]
    fn test_fallback_when_count_disagrees() {
        // Size 2 against the first member's expected count of 1.
        let group = vec![
            record(r#"{"id":"s1_1-100","line":1,"user_input":"T1"}"#),
            record(r#"{"id":"s1_2-200","line":1,"user_input":"T2"}"#),
        ];
        assert_eq!(select_strategy(&group), Strategy::TextFallback);
    }

    #[test]
    fn test_single_record_group_matches_its_own_count() {
        let group = vec![record(r#"{"id":"s1_1-100","line":1,"user_input":"T1"}"#)];
        assert_eq!(select_strategy(&group), Strategy::Geometry);
    }

    #[test]
    fn test_fallback_when_any_line_missing() {
        let group = vec![
            record(r#"{"id":"s1_0-10","line":2}"#),
            record(r#"{"id":"s1_0-30"}"#),
        ];
        assert_eq!(select_strategy(&group), Strategy::TextFallback);
    }

    #[test]
    fn inconsistent_line_values_follow_first_member() {
        // Only the first member's expected count is consulted.
        let group = vec![
            record(r#"{"id":"s1_0-10","line":2}"#),
            record(r#"{"id":"s1_0-30","line":99}"#),
        ];
        assert_eq!(select_strategy(&group), Strategy::Geometry);

        let reversed = vec![
            record(r#"{"id":"s1_0-30","line":99}"#),
            record(r#"{"id":"s1_0-10","line":2}"#),
        ];
        assert_eq!(select_strategy(&reversed), Strategy::TextFallback);
    }

    #[test]
    fn test_geometry_sorts_by_top_edge() {
        let group = vec![
            record(r#"{"id":"s1_40-300_90-300","line":3,"user_input":"third"}"#),
            record(r#"{"id":"s1_40-100_90-100","line":3,"user_input":"first"}"#),
            record(r#"{"id":"s1_40-200_90-200","line":3,"user_input":"second"}"#),
        ];

        let lines = renumber_by_geometry("s1", &group);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].image_id, "s1_1.png");
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[1].text, "second");
        assert_eq!(lines[2].text, "third");
        assert_eq!(lines[2].image_id, "s1_3.png");
    }

    #[test]
    fn test_geometry_tie_keeps_encounter_order() {
        let group = vec![
            record(r#"{"id":"s1_40-100","line":2,"user_input":"earlier"}"#),
            record(r#"{"id":"s1_60-100","line":2,"user_input":"later"}"#),
        ];

        let lines = renumber_by_geometry("s1", &group);
        assert_eq!(lines[0].text, "earlier");
        assert_eq!(lines[1].text, "later");
    }

    #[test]
    fn test_geometry_skips_defective_records() {
        let group = vec![
            record(r#"{"id":"s1_40-200","line":3,"user_input":"kept"}"#),
            record(r#"{"id":"s1_40-100"}"#),
            record(r#"{"id":"not-a-positional-id","line":3}"#),
        ];

        let lines = renumber_by_geometry("s1", &group);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].image_id, "s1_1.png");
        assert_eq!(lines[0].text, "kept");
    }

    #[test]
    fn test_geometry_empty_group_yields_no_rows() {
        let group = vec![record(r#"{"id":"s1_40-100"}"#)];
        assert!(renumber_by_geometry("s1", &group).is_empty());
    }

    #[test]
    fn test_geometry_defaults_missing_text_to_empty() {
        let group = vec![record(r#"{"id":"s1_40-100","line":1}"#)];
        let lines = renumber_by_geometry("s1", &group);
        assert_eq!(lines[0].text, "");
    }

    #[test]
    fn test_transcript_numbering() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("split1.txt"), "Line 1\nLine 2\n").unwrap();

        let lines = renumber_from_transcript("split1", temp_dir.path()).unwrap();
        assert_eq!(
            lines,
            vec![
                CanonicalLine {
                    image_id: "split1_1.png".to_string(),
                    text: "Line 1".to_string()
                },
                CanonicalLine {
                    image_id: "split1_2.png".to_string(),
                    text: "Line 2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_transcript_missing_file_is_empty_output() {
        let temp_dir = TempDir::new().unwrap();
        let lines = renumber_from_transcript("absent", temp_dir.path()).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn test_transcript_strips_trailing_whitespace() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("s.txt"), "text\t \nmore\r\n").unwrap();

        let lines = renumber_from_transcript("s", temp_dir.path()).unwrap();
        assert_eq!(lines[0].text, "text");
        assert_eq!(lines[1].text, "more");
    }

    #[test]
    fn test_reconcile_never_mixes_strategies() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("s1.txt"), "from transcript\n").unwrap();

        // Count disagrees: output must come from the transcript alone.
        let group = vec![
            record(r#"{"id":"s1_1-100","line":1,"user_input":"T1"}"#),
            record(r#"{"id":"s1_2-200","line":1,"user_input":"T2"}"#),
        ];
        let lines = reconcile_group("s1", &group, temp_dir.path()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "from transcript");
    }
}
