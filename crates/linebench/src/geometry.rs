//! Typed parser for positional annotation ids
//!
//! Annotation ids encode a split id and a bounding polygon in one string:
//! `<split>_<x0>-<y0>_<x1>-<y1>...`. Keeping the string-format knowledge
//! here isolates the sorting and renumbering logic from the id convention.

use crate::{Error, Result};

/// One polygon vertex in page-image pixel coordinates (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

/// A parsed positional annotation id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineId {
    /// Page identifier shared by all lines of one source image
    pub split: String,
    /// Bounding polygon vertices in encoded order
    pub polygon: Vec<Point>,
}

impl LineId {
    /// Parse an id of the form `<split>_<x0>-<y0>_<x1>-<y1>...`
    pub fn parse(id: &str) -> Result<Self> {
        let mut segments = id.split('_');
        let split = segments
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::BadLineId {
                id: id.to_string(),
                reason: "empty split id".to_string(),
            })?;

        let mut polygon = Vec::new();
        for segment in segments {
            let (x, y) = segment.split_once('-').ok_or_else(|| Error::BadLineId {
                id: id.to_string(),
                reason: format!("coordinate segment '{segment}' has no '-' separator"),
            })?;
            let parse = |token: &str| {
                token.parse::<i64>().map_err(|_| Error::BadLineId {
                    id: id.to_string(),
                    reason: format!("non-numeric coordinate token '{token}'"),
                })
            };
            polygon.push(Point {
                x: parse(x)?,
                y: parse(y)?,
            });
        }

        if polygon.is_empty() {
            return Err(Error::BadLineId {
                id: id.to_string(),
                reason: "no coordinate segments".to_string(),
            });
        }

        Ok(Self {
            split: split.to_string(),
            polygon,
        })
    }

    /// The y coordinate of the first encoded vertex
    ///
    /// The export convention places a top corner first, so ascending
    /// `top_edge` order is visual top-to-bottom line order.
    pub fn top_edge(&self) -> i64 {
        self.polygon[0].y
    }
}
