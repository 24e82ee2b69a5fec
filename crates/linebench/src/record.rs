//! Annotation record model
//!
//! Records come from reviewer-exported JSONL files. Only a handful of fields
//! carry meaning for the pipeline; everything else is passed through
//! untouched so that filtering and re-sorting operations can re-emit whole
//! records.
//!
//! ## Record format
//!
//! ```json
//! {
//!   "id": "51980774_132-418_1083-418_1083-467_132-467",
//!   "line": 7,
//!   "user_input": "recognized text",
//!   "accept": [2],
//!   "image": "https://example.org/pages/51980774.jpg?X-Amz-Expires=600"
//! }
//! ```
//!
//! The prefix of `id` before the first `_` is the split id: the page all
//! line annotations of one source image share.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One line annotation as exported by the review tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    /// Positional identifier: `<split>_<x0>-<y0>_<x1>-<y1>...`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Reviewer-asserted expected line count for the whole split
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    /// Recognized text for this line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_input: Option<String>,

    /// Reviewer decision, normally a one-element array of codes
    ///
    /// Kept as a raw JSON value: exports occasionally carry scalars or
    /// other shapes here, and those records must still round-trip through
    /// the deduplication and filtering chain untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<Value>,

    /// Source page image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// All remaining fields, preserved verbatim on re-emission
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl AnnotationRecord {
    /// The split id: the substring of `id` before the first `_`
    ///
    /// When the id contains no `_` the whole id is the split id, matching
    /// how the export format degrades for unsegmented pages.
    pub fn split_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(|id| id.split('_').next().unwrap_or(id))
    }

    /// Whether the reviewer accepted this record with decision code `code`
    ///
    /// True only for an `accept` that is exactly the one-element array
    /// `[code]`; scalars and other shapes never match.
    pub fn accepted_with(&self, code: i64) -> bool {
        match self.accept.as_ref().and_then(Value::as_array) {
            Some(items) => matches!(items.as_slice(), [only] if only.as_i64() == Some(code)),
            None => false,
        }
    }
}
