//! Transcript line-count annotation
//!
//! Keeps reviewer-accepted records (decision code `[2]`) and stamps each
//! with the physical line count of its split's transcript, which the
//! reconciliation engine later compares against the group size.

use crate::record::AnnotationRecord;
use crate::{jsonl, Result};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Reviewer decision code marking a record as accepted after correction
pub const ACCEPTED: i64 = 2;

/// Number of physical lines in a transcript file
pub fn count_transcript_lines(path: &Path) -> Result<usize> {
    Ok(fs::read_to_string(path)?.lines().count())
}

/// Keep accepted records, filling `line` from the transcript where possible
///
/// A record whose transcript is missing passes through with its `line`
/// field untouched; the reconciliation engine will route such splits to the
/// fallback path anyway.
pub fn annotate_line_counts(
    records: Vec<AnnotationRecord>,
    text_dir: &Path,
) -> Vec<AnnotationRecord> {
    let mut annotated = Vec::new();

    for mut record in records {
        if !record.accepted_with(ACCEPTED) {
            continue;
        }

        let split_id = record.split_id().unwrap_or_default().to_string();
        let transcript = text_dir.join(format!("{split_id}.txt"));
        match count_transcript_lines(&transcript) {
            Ok(count) => record.line = Some(count as u64),
            Err(_) => {
                warn!(%split_id, "transcript not readable, keeping record without count");
            }
        }

        annotated.push(record);
    }

    annotated
}

/// Annotate one JSONL file, writing `updated_<name>` next to it
pub fn run(jsonl_dir: &Path, text_dir: &Path, file_name: &str) -> Result<usize> {
    let input_path = jsonl_dir.join(file_name);
    let records = jsonl::read_records_lenient(&input_path)?;
    let annotated = annotate_line_counts(records, text_dir);

    let output_path = jsonl_dir.join(format!("updated_{file_name}"));
    jsonl::write_records(&output_path, &annotated)?;

    Ok(annotated.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(json: &str) -> AnnotationRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_only_accepted_records_survive() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![
            record(r#"{"id":"p1_0-1","accept":[2]}"#),
            record(r#"{"id":"p2_0-1","accept":[1]}"#),
            record(r#"{"id":"p3_0-1"}"#),
        ];

        let annotated = annotate_line_counts(records, temp_dir.path());
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].id.as_deref(), Some("p1_0-1"));
    }

    #[test]
    fn test_line_count_comes_from_transcript() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("p1.txt"), "a\nb\nc\n").unwrap();

        let records = vec![record(r#"{"id":"p1_0-1","accept":[2]}"#)];
        let annotated = annotate_line_counts(records, temp_dir.path());
        assert_eq!(annotated[0].line, Some(3));
    }

    #[test]
    fn test_missing_transcript_leaves_record_unchanged() {
        let temp_dir = TempDir::new().unwrap();
        let records = vec![record(r#"{"id":"p1_0-1","accept":[2],"line":5}"#)];

        let annotated = annotate_line_counts(records, temp_dir.path());
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].line, Some(5));
    }

    #[test]
    fn test_run_writes_updated_file() {
        let temp_dir = TempDir::new().unwrap();
        let jsonl_dir = temp_dir.path().join("jsonl");
        let text_dir = temp_dir.path().join("text");
        fs::create_dir_all(&jsonl_dir).unwrap();
        fs::create_dir_all(&text_dir).unwrap();
        fs::write(text_dir.join("p1.txt"), "one\ntwo\n").unwrap();
        fs::write(
            jsonl_dir.join("pering.jsonl"),
            "{\"id\":\"p1_0-1\",\"accept\":[2]}\n",
        )
        .unwrap();

        let kept = run(&jsonl_dir, &text_dir, "pering.jsonl").unwrap();
        assert_eq!(kept, 1);

        let updated = jsonl::read_records(&jsonl_dir.join("updated_pering.jsonl")).unwrap();
        assert_eq!(updated[0].line, Some(2));
    }
}
