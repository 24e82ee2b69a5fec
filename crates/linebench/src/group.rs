//! Grouping annotation records by split id

use crate::record::AnnotationRecord;
use crate::{Error, Result};
use indexmap::IndexMap;

/// Partition records into per-split groups
///
/// The grouping key is the substring of `id` before the first `_`. Record
/// order within a group is encounter order; group iteration order is the
/// order each split was first seen. A record without an `id` is a caller
/// precondition violation and fails the whole call.
pub fn group_by_split_id(
    records: Vec<AnnotationRecord>,
) -> Result<IndexMap<String, Vec<AnnotationRecord>>> {
    let mut grouped: IndexMap<String, Vec<AnnotationRecord>> = IndexMap::new();

    for record in records {
        let split_id = record
            .split_id()
            .ok_or_else(|| Error::MissingField {
                field: "id",
                id: "<unknown>".to_string(),
            })?
            .to_string();
        grouped.entry(split_id).or_default().push(record);
    }

    Ok(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> AnnotationRecord {
        serde_json::from_str(&format!(r#"{{"id":"{id}"}}"#)).unwrap()
    }

    #[test]
    fn test_groups_keep_first_occurrence_order() {
        let records = vec![
            record("b_1-10"),
            record("a_1-20"),
            record("b_1-30"),
            record("c_1-40"),
        ];

        let grouped = group_by_split_id(records).unwrap();
        let keys: Vec<_> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(grouped["b"].len(), 2);
        assert_eq!(grouped["b"][0].id.as_deref(), Some("b_1-10"));
        assert_eq!(grouped["b"][1].id.as_deref(), Some("b_1-30"));
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let records = vec![serde_json::from_str(r#"{"user_input":"x"}"#).unwrap()];
        assert!(matches!(
            group_by_split_id(records),
            Err(Error::MissingField { field: "id", .. })
        ));
    }
}
