//! Manifest assembly and CSV output
//!
//! Canonical lines that survive the image-existence filter are extended
//! with dataset metadata and written as the flat CSV manifest the
//! benchmark consumes.

use crate::reconcile::CanonicalLine;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Dataset-wide manifest metadata
///
/// These were once module constants; they are passed in explicitly so the
/// same assembly code serves different datasets and tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Public URL prefix the image id is appended to
    pub url_prefix: String,
    pub group_id: u64,
    pub batch_id: u64,
    /// Workflow state label, e.g. "post_correction"
    pub state: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            url_prefix: "https://s3.amazonaws.com/monlam.ai.ocr/e2e_benchmark/".to_string(),
            group_id: 1,
            batch_id: 1,
            state: "post_correction".to_string(),
        }
    }
}

/// One row of the output CSV
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub id: String,
    pub group_id: u64,
    pub batch_id: u64,
    pub state: String,
    pub text: String,
    pub url: String,
}

impl ManifestRow {
    /// Build a row for one canonical line
    pub fn new(config: &ManifestConfig, line: CanonicalLine) -> Self {
        let url = format!("{}{}", config.url_prefix, line.image_id);
        Self {
            id: line.image_id,
            group_id: config.group_id,
            batch_id: config.batch_id,
            state: config.state.clone(),
            text: line.text,
            url,
        }
    }
}

/// Collect the `*.png` filenames directly inside `image_dir`
pub fn png_names_in(image_dir: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(image_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("png") {
            if let Some(name) = path.file_name().and_then(|s| s.to_str()) {
                names.insert(name.to_string());
            }
        }
    }
    Ok(names)
}

/// Keep only lines whose image id names an existing crop
///
/// Exact, case-sensitive filename match; input order is preserved. An
/// annotation whose line image was never rendered (an empty line produces
/// no crop) is an expected condition, not an error.
pub fn match_existing_images(
    lines: Vec<CanonicalLine>,
    image_names: &HashSet<String>,
) -> Vec<CanonicalLine> {
    lines
        .into_iter()
        .filter(|line| image_names.contains(&line.image_id))
        .collect()
}

/// Write the manifest CSV, creating parent directories
///
/// Header is always emitted: `id,group_id,batch_id,state,text,url`.
pub fn write_csv(output_path: &Path, rows: &[ManifestRow]) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(output_path)?;
    writer.write_record(["id", "group_id", "batch_id", "state", "text", "url"])?;
    for row in rows {
        writer.write_record(&[
            row.id.clone(),
            row.group_id.to_string(),
            row.batch_id.to_string(),
            row.state.clone(),
            row.text.clone(),
            row.url.clone(),
        ])?;
    }
    writer.flush()?;

    Ok(())
}
