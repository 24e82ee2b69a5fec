//! linebench - OCR line-benchmark dataset preparation
//!
//! Offline tooling for turning reviewer-exported line annotations into a
//! benchmark manifest: deduplication, id-set filtering, transcript
//! line-count annotation, line reconciliation, and CSV assembly.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use linebench::{pipeline, ManifestConfig};
//! use std::path::Path;
//!
//! # fn main() -> linebench::Result<()> {
//! let rows = pipeline::run(
//!     Path::new("data/pering_line_to_text"),
//!     Path::new("data/text"),
//!     Path::new("data/line_images"),
//!     Path::new("data/csv_output/e2e_output.csv"),
//!     &ManifestConfig::default(),
//! )?;
//! println!("wrote {rows} manifest rows");
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Reconciliation** (`reconcile`): per-split strategy selection and
//!   renumbering, the core of the pipeline
//! - **Grouping** (`group`) and the typed id parser (`geometry`)
//! - **Manifest** (`manifest`) and the parallel driver (`pipeline`)
//! - **Auxiliary operations**: `dedupe`, `filter`, `line_info`, `sort`,
//!   `plot`

#![deny(unsafe_code)]

pub mod dedupe;
pub mod error;
pub mod filter;
pub mod geometry;
pub mod group;
pub mod jsonl;
pub mod line_info;
pub mod manifest;
pub mod pipeline;
pub mod plot;
pub mod record;
pub mod reconcile;
pub mod sort;

pub use error::{Error, Result};
pub use geometry::{LineId, Point};
pub use manifest::{ManifestConfig, ManifestRow};
pub use record::AnnotationRecord;
pub use reconcile::{CanonicalLine, Strategy};
