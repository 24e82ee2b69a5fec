//! Sorted-line re-emission
//!
//! Reads every annotation export of a directory, orders each split's
//! records top to bottom by bounding-box geometry, and rewrites their ids
//! to `<split>_<n>` sequence numbers. Unlike the manifest build this keeps
//! whole records, so downstream tools see every original field.

use crate::geometry::LineId;
use crate::group::group_by_split_id;
use crate::record::AnnotationRecord;
use crate::{jsonl, Result};
use std::path::Path;
use tracing::warn;

/// Group, sort, and renumber all records from a directory of JSONL files
pub fn sort_lines(input_dir: &Path) -> Result<Vec<AnnotationRecord>> {
    let mut all_records = Vec::new();
    for path in jsonl::jsonl_files_in(input_dir)? {
        for record in jsonl::read_records_lenient(&path)? {
            if record.id.is_none() {
                warn!(path = %path.display(), "record without 'id', skipping");
                continue;
            }
            all_records.push(record);
        }
    }

    let mut result = Vec::with_capacity(all_records.len());
    for (split_id, group) in group_by_split_id(all_records)? {
        let mut positioned: Vec<(i64, AnnotationRecord)> = Vec::with_capacity(group.len());
        for record in group {
            let id = record.id.as_deref().unwrap_or_default();
            match LineId::parse(id) {
                Ok(parsed) => positioned.push((parsed.top_edge(), record)),
                Err(err) => {
                    warn!(id, %err, "skipping record with unparseable id");
                }
            }
        }

        positioned.sort_by_key(|(top_edge, _)| *top_edge);

        for (index, (_, mut record)) in positioned.into_iter().enumerate() {
            record.id = Some(format!("{}_{}", split_id, index + 1));
            result.push(record);
        }
    }

    Ok(result)
}

/// Sort a directory's records and write them as one JSONL file
pub fn run(input_dir: &Path, output_path: &Path) -> Result<usize> {
    let sorted = sort_lines(input_dir)?;
    jsonl::write_records(output_path, &sorted)?;
    Ok(sorted.len())
}
