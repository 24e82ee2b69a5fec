//! Id-set filtering of annotation exports
//!
//! A reference JSONL file defines which pages belong to the dataset; every
//! candidate record from a corpus directory survives only if its split id
//! is in that set. Candidate `image` URLs are normalized by dropping any
//! trailing query string, since the exports carry expiring signed URLs.

use crate::record::AnnotationRecord;
use crate::{jsonl, Error, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Strip the extension from an id, mirroring `Path::file_stem` semantics
/// for plain strings (`"page.jpg"` -> `"page"`, `".hidden"` unchanged)
fn strip_extension(id: &str) -> &str {
    match id.rfind('.') {
        Some(pos) if pos > 0 => &id[..pos],
        _ => id,
    }
}

/// Drop a URL's query string, if any
pub fn clean_image_url(url: &str) -> &str {
    url.split_once('?').map_or(url, |(base, _)| base)
}

/// Extension-stripped ids of every record in the reference file
///
/// The reference file must be intact: a malformed line or a record missing
/// `id` fails the call.
pub fn reference_ids(reference_path: &Path) -> Result<HashSet<String>> {
    let records = jsonl::read_records(reference_path)?;
    let mut ids = HashSet::with_capacity(records.len());

    for record in records {
        let id = record.id.as_deref().ok_or_else(|| Error::MissingField {
            field: "id",
            id: "<reference record>".to_string(),
        })?;
        ids.insert(strip_extension(id).to_string());
    }

    Ok(ids)
}

/// Collect candidate records from a directory whose split id is in the set
///
/// Malformed lines and records without an `id` are skipped with a warning.
/// Surviving records have their `image` URL normalized in place.
pub fn matching_records(
    candidate_dir: &Path,
    match_ids: &HashSet<String>,
) -> Result<Vec<AnnotationRecord>> {
    let mut matched = Vec::new();

    for path in jsonl::jsonl_files_in(candidate_dir)? {
        for mut record in jsonl::read_records_lenient(&path)? {
            let Some(split_id) = record.split_id() else {
                warn!(path = %path.display(), "record without 'id', skipping");
                continue;
            };
            if !match_ids.contains(strip_extension(split_id)) {
                continue;
            }
            if let Some(url) = record.image.take() {
                record.image = Some(clean_image_url(&url).to_string());
            }
            matched.push(record);
        }
    }

    Ok(matched)
}

/// Filter a corpus directory against a reference file and write the result
pub fn run(reference_path: &Path, candidate_dir: &Path, output_path: &Path) -> Result<usize> {
    let match_ids = reference_ids(reference_path)?;
    let matched = matching_records(candidate_dir, &match_ids)?;
    jsonl::write_records(output_path, &matched)?;
    Ok(matched.len())
}
