//! Sparse patch merge over stored JSON documents.
//!
//! The merge works on the stored document as a JSON object rather than on a typed record,
//! so fields the current model does not know about are carried through unchanged. Keys
//! keep their original position; new keys are appended.

use crate::model::DiversityPatch;
use serde_json::{Map, Value};

/// An overlay that can list the fields it sets.
pub trait SparseOverlay {
    /// The present fields, keyed by their stored JSON name.
    ///
    /// # Errors
    ///
    /// Returns an error if the overlay cannot be serialised.
    fn present_fields(&self) -> serde_json::Result<Map<String, Value>>;
}

impl SparseOverlay for DiversityPatch {
    fn present_fields(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map
                .into_iter()
                .filter(|(_, v)| !v.is_null())
                .collect()),
            _ => Ok(Map::new()),
        }
    }
}

impl SparseOverlay for Map<String, Value> {
    fn present_fields(&self) -> serde_json::Result<Map<String, Value>> {
        Ok(self
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

/// Writes every present overlay field into `existing_document`.
///
/// # Arguments
///
/// * `existing_document` - Stored record in serialised JSON form
/// * `patch` - Overlay to apply
///
/// # Returns
///
/// The merged document, or `None` if `patch` is absent or `existing_document` is empty,
/// unparseable or not a JSON object.
pub fn merge_patch<P: SparseOverlay>(existing_document: &str, patch: Option<&P>) -> Option<String> {
    let patch = patch?;
    if existing_document.trim().is_empty() {
        return None;
    }

    let mut document: Value = match serde_json::from_str(existing_document) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(error = %e, "stored document is not valid JSON");
            return None;
        }
    };
    let object = document.as_object_mut()?;

    let fields = match patch.present_fields() {
        Ok(fields) => fields,
        Err(e) => {
            tracing::debug!(error = %e, "patch overlay could not be serialised");
            return None;
        }
    };
    for (name, value) in fields {
        object.insert(name, value);
    }

    serde_json::to_string(&document).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use reference_data::Ethnicity;
    use serde_json::json;

    const STORED: &str = r#"{"DiversityId":"550e8400-e29b-41d4-a716-446655440000","CustomerId":"6ba7b810-9dad-11d1-80b4-00c04fd430c8","ConsentToCollectLLDDHealth":true,"ConsentToCollectEthnicity":false,"Ethnicity":99,"LastModifiedBy":"0000000001","LegacyField":{"nested":[1,2,3]}}"#;

    #[test]
    fn absent_patch_returns_none() {
        assert_eq!(merge_patch::<DiversityPatch>(STORED, None), None);
    }

    #[test]
    fn empty_document_returns_none() {
        let patch = DiversityPatch::default();
        assert_eq!(merge_patch("", Some(&patch)), None);
        assert_eq!(merge_patch("   ", Some(&patch)), None);
    }

    #[test]
    fn non_object_document_returns_none() {
        let patch = DiversityPatch::default();
        assert_eq!(merge_patch("[1,2]", Some(&patch)), None);
        assert_eq!(merge_patch("null", Some(&patch)), None);
        assert_eq!(merge_patch("{not json", Some(&patch)), None);
    }

    #[test]
    fn empty_patch_leaves_document_unchanged() {
        let merged = merge_patch(STORED, Some(&DiversityPatch::default())).unwrap();
        assert_eq!(merged, STORED);
    }

    #[test]
    fn only_overlay_fields_change() {
        let patch = DiversityPatch {
            consent_to_collect_ethnicity: Some(true),
            ethnicity: Some(Ethnicity::Caribbean.into()),
            ..Default::default()
        };
        let merged = merge_patch(STORED, Some(&patch)).unwrap();

        let before: Value = serde_json::from_str(STORED).unwrap();
        let after: Value = serde_json::from_str(&merged).unwrap();
        let before = before.as_object().unwrap();
        let after = after.as_object().unwrap();

        assert_eq!(after["ConsentToCollectEthnicity"], json!(true));
        assert_eq!(after["Ethnicity"], json!(45));
        for (key, value) in before {
            if key != "ConsentToCollectEthnicity" && key != "Ethnicity" {
                assert_eq!(&after[key], value, "field {key} changed");
            }
        }
        assert_eq!(after.len(), before.len());
    }

    #[test]
    fn unknown_fields_and_key_order_are_preserved() {
        let patch = DiversityPatch {
            ethnicity: Some(Ethnicity::Irish.into()),
            ..Default::default()
        };
        let merged = merge_patch(STORED, Some(&patch)).unwrap();
        assert_eq!(merged, STORED.replace(r#""Ethnicity":99"#, r#""Ethnicity":32"#));
    }

    #[test]
    fn new_fields_are_appended() {
        let patch = DiversityPatch {
            last_modified_date: Some(
                chrono::DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
                    .unwrap()
                    .with_timezone(&chrono::Utc),
            ),
            ..Default::default()
        };
        let merged = merge_patch(STORED, Some(&patch)).unwrap();
        assert!(merged.ends_with(r#","LastModifiedDate":"2024-01-02T03:04:05Z"}"#));
    }

    #[test]
    fn field_order_of_overlay_does_not_matter() {
        let mut forward = Map::new();
        forward.insert("Ethnicity".into(), json!(40));
        forward.insert("ConsentToCollectEthnicity".into(), json!(true));

        let mut reverse = Map::new();
        reverse.insert("ConsentToCollectEthnicity".into(), json!(true));
        reverse.insert("Ethnicity".into(), json!(40));

        assert_eq!(
            merge_patch(STORED, Some(&forward)),
            merge_patch(STORED, Some(&reverse))
        );
    }

    #[test]
    fn null_overlay_values_are_skipped() {
        let mut overlay = Map::new();
        overlay.insert("Ethnicity".into(), Value::Null);
        assert_eq!(merge_patch(STORED, Some(&overlay)).unwrap(), STORED);
    }
}
