//! JSONL reading and writing
//!
//! All exchange files are UTF-8 JSON-lines: one object per line. Readers
//! come in two flavors. The lenient reader is what the pipeline uses: a
//! malformed line is logged with file and line context and skipped, never
//! aborting the run. The strict reader is for reference inputs that must
//! be intact (the id-set filter's reference file).

use crate::record::AnnotationRecord;
use crate::{Error, Result};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read records, skipping malformed lines with a warning
pub fn read_records_lenient(path: &Path) -> Result<Vec<AnnotationRecord>> {
    let contents = fs::read_to_string(path)?;
    let mut records = Vec::new();

    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<AnnotationRecord>(line) {
            Ok(record) => records.push(record),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    line = number + 1,
                    %err,
                    "skipping malformed JSON line"
                );
            }
        }
    }

    Ok(records)
}

/// Read records, failing on the first malformed line
pub fn read_records(path: &Path) -> Result<Vec<AnnotationRecord>> {
    let contents = fs::read_to_string(path)?;
    let mut records = Vec::new();

    for (number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        records.push(
            serde_json::from_str::<AnnotationRecord>(line).map_err(|source| Error::Json {
                path: path.to_path_buf(),
                line: number + 1,
                source,
            })?,
        );
    }

    Ok(records)
}

/// Write records one JSON object per line, creating parent directories
///
/// serde_json emits UTF-8 without ASCII escaping, so non-Latin text (the
/// common case for OCR transcripts) round-trips byte-identically.
pub fn write_records(path: &Path, records: &[AnnotationRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = fs::File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    Ok(())
}

/// All `*.jsonl` files directly inside `dir`, in lexicographic order
pub fn jsonl_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
