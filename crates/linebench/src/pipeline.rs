//! End-to-end manifest build
//!
//! One input directory of JSONL annotation exports fans out to a rayon
//! parallel map, one task per file. Files are fully independent, so there
//! is no shared mutable state; per-file row vectors are concatenated in
//! lexicographic file order once every task has finished.

use crate::group::group_by_split_id;
use crate::jsonl;
use crate::manifest::{self, ManifestConfig, ManifestRow};
use crate::reconcile::reconcile_group;
use crate::Result;
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::warn;

/// Build manifest rows for a single JSONL export
pub fn build_rows_for_file(
    jsonl_path: &Path,
    text_dir: &Path,
    image_names: &HashSet<String>,
    config: &ManifestConfig,
) -> Result<Vec<ManifestRow>> {
    let records = jsonl::read_records_lenient(jsonl_path)?;

    let mut keyed = Vec::with_capacity(records.len());
    for record in records {
        if record.id.is_none() {
            warn!(path = %jsonl_path.display(), "record without 'id', skipping");
            continue;
        }
        keyed.push(record);
    }

    let mut rows = Vec::new();
    for (split_id, group) in group_by_split_id(keyed)? {
        let reconciled = reconcile_group(&split_id, &group, text_dir)?;
        let matched = manifest::match_existing_images(reconciled, image_names);
        rows.extend(
            matched
                .into_iter()
                .map(|line| ManifestRow::new(config, line)),
        );
    }

    Ok(rows)
}

/// Build manifest rows for every `*.jsonl` file in `jsonl_dir`
pub fn build_manifest(
    jsonl_dir: &Path,
    text_dir: &Path,
    image_dir: &Path,
    config: &ManifestConfig,
) -> Result<Vec<ManifestRow>> {
    let files = jsonl::jsonl_files_in(jsonl_dir)?;
    let image_names = manifest::png_names_in(image_dir)?;

    let per_file: Vec<Vec<ManifestRow>> = files
        .par_iter()
        .map(|path| build_rows_for_file(path, text_dir, &image_names, config))
        .collect::<Result<_>>()?;

    Ok(per_file.into_iter().flatten().collect())
}

/// Build the manifest and write it as CSV
pub fn run(
    jsonl_dir: &Path,
    text_dir: &Path,
    image_dir: &Path,
    output_csv: &Path,
    config: &ManifestConfig,
) -> Result<usize> {
    let rows = build_manifest(jsonl_dir, text_dir, image_dir, config)?;
    manifest::write_csv(output_csv, &rows)?;
    Ok(rows.len())
}
