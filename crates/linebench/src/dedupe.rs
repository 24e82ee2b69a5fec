//! JSONL deduplication by record id
//!
//! Keeps the first-seen record per unique `id`, preserving first-occurrence
//! order. Records without an `id` are dropped. The operation is idempotent:
//! running it on its own output is a no-op.

use crate::jsonl;
use crate::record::AnnotationRecord;
use crate::Result;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Drop duplicate and id-less records, keeping first occurrences
pub fn dedupe_records(records: Vec<AnnotationRecord>) -> Vec<AnnotationRecord> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for record in records {
        let Some(id) = record.id.clone() else {
            continue;
        };
        if seen.insert(id) {
            unique.push(record);
        }
    }

    unique
}

/// Deduplicate one JSONL file into another
pub fn dedupe_file(input_path: &Path, output_path: &Path) -> Result<usize> {
    let records = jsonl::read_records_lenient(input_path)?;
    let unique = dedupe_records(records);
    jsonl::write_records(output_path, &unique)?;

    info!(
        input = %input_path.display(),
        output = %output_path.display(),
        unique = unique.len(),
        "deduplicated file"
    );

    Ok(unique.len())
}

/// Deduplicate every `*.jsonl` file of a directory
///
/// Each `<name>.jsonl` becomes `<output_dir>/deduplicate_<name>.jsonl`.
pub fn dedupe_directory(input_dir: &Path, output_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(output_dir)?;

    for input_path in jsonl::jsonl_files_in(input_dir)? {
        let file_name = input_path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or_default();
        let output_path = output_dir.join(format!("deduplicate_{file_name}"));
        dedupe_file(&input_path, &output_path)?;
    }

    Ok(())
}
