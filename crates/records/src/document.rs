use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const ID_FIELD: &str = "_id";
const DELETED_FIELD: &str = "_deleted";
const PREFS_SAFE_ID_FIELD: &str = "prefsSafeId";

/// A database document (Prefs Safe or GPII Key).
///
/// Every field read from the database or from disk is kept as-is, so a
/// document can be written back with only its tombstone changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Map<String, Value>);

impl Document {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    /// Foreign key of a GPII Key record.
    pub fn prefs_safe_id(&self) -> Option<&str> {
        self.0.get(PREFS_SAFE_ID_FIELD).and_then(Value::as_str)
    }

    /// Raw `_id` value, whatever its JSON type.
    pub fn id_value(&self) -> Option<&Value> {
        self.0.get(ID_FIELD)
    }

    pub fn prefs_safe_id_value(&self) -> Option<&Value> {
        self.0.get(PREFS_SAFE_ID_FIELD)
    }

    pub fn is_deleted(&self) -> bool {
        self.0
            .get(DELETED_FIELD)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Set the `_deleted` tombstone so a bulk write removes the document.
    pub fn mark_deleted(&mut self) {
        self.0.insert(DELETED_FIELD.to_string(), Value::Bool(true));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Document {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn mark_deleted_keeps_other_fields() {
        let mut safe = doc(json!({"_id": "ps1", "_rev": "1-a", "prefsSafeType": "snapset"}));
        assert!(!safe.is_deleted());

        safe.mark_deleted();

        assert!(safe.is_deleted());
        assert_eq!(
            serde_json::to_value(&safe).unwrap(),
            json!({"_id": "ps1", "_rev": "1-a", "prefsSafeType": "snapset", "_deleted": true})
        );
    }

    #[test]
    fn non_string_identifiers_are_absent() {
        let key = doc(json!({"_id": 7, "prefsSafeId": null}));
        assert_eq!(key.id(), None);
        assert_eq!(key.prefs_safe_id(), None);
    }

    #[test]
    fn raw_identifier_values_are_exposed() {
        let key = doc(json!({"_id": 7, "prefsSafeId": "ps1"}));
        assert_eq!(key.id_value(), Some(&json!(7)));
        assert_eq!(key.prefs_safe_id_value(), Some(&json!("ps1")));
        assert_eq!(doc(json!({})).prefs_safe_id_value(), None);
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(serde_json::from_value::<Document>(json!(["ps1"])).is_err());
    }
}
