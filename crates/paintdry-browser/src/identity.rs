//! Row identifiers for records that may or may not carry one

use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a rendered row.
///
/// Backend identifiers and client-side placeholders are different variants, so a
/// placeholder can never be mistaken for a real record even when the backend
/// emits negative numbers itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    /// Identifier supplied by the backend (numbers kept in their JSON text form)
    Backend(String),
    /// Placeholder assigned because the backend omitted the identifier
    Ephemeral(i64),
}

impl RowId {
    /// Read an identifier from a JSON value; `null` means "absent"
    pub fn from_value(value: &Value) -> Option<RowId> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(RowId::Backend(s.clone())),
            other => Some(RowId::Backend(other.to_string())),
        }
    }

    pub fn is_ephemeral(&self) -> bool {
        matches!(self, RowId::Ephemeral(_))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Backend(id) => f.write_str(id),
            RowId::Ephemeral(n) => write!(f, "{}", n),
        }
    }
}

/// One record of a collection, with its identifier resolved
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: RowId,
    pub fields: Map<String, Value>,
}

impl Row {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The record as JSON with its resolved identifier written back into `id`
    pub fn to_json(&self) -> Value {
        let mut fields = self.fields.clone();
        let id = match &self.id {
            RowId::Backend(id) => self
                .fields
                .get("id")
                .filter(|v| !v.is_null())
                .cloned()
                .unwrap_or_else(|| Value::String(id.clone())),
            RowId::Ephemeral(n) => Value::from(*n),
        };
        fields.insert("id".to_string(), id);
        Value::Object(fields)
    }
}

/// Give every record an identifier.
///
/// Records keep the `id` the backend sent. Records without one (missing or null)
/// get placeholders counting down from -1 in input order, unique within this batch
/// only. Elements that are not JSON objects are kept as a single `value` field.
pub fn identify_rows(records: Vec<Value>) -> Vec<Row> {
    let mut counter: i64 = -1;
    records
        .into_iter()
        .map(|record| {
            let fields = match record {
                Value::Object(fields) => fields,
                other => {
                    let mut fields = Map::new();
                    fields.insert("value".to_string(), other);
                    fields
                }
            };
            let id = match fields.get("id").and_then(RowId::from_value) {
                Some(id) => id,
                None => {
                    let id = RowId::Ephemeral(counter);
                    counter -= 1;
                    id
                }
            };
            Row { id, fields }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_backend_ids_are_kept() {
        let rows = identify_rows(vec![
            json!({"id": 7, "resource": "a"}),
            json!({"id": "abc", "resource": "b"}),
        ]);
        assert_eq!(rows[0].id, RowId::Backend("7".to_string()));
        assert_eq!(rows[1].id, RowId::Backend("abc".to_string()));
    }

    #[test]
    fn test_missing_and_null_ids_count_down() {
        let rows = identify_rows(vec![
            json!({"resource": "a"}),
            json!({"id": 3, "resource": "b"}),
            json!({"id": null, "resource": "c"}),
            json!({"resource": "d"}),
        ]);
        let ids: Vec<_> = rows.iter().map(|r| r.id.clone()).collect();
        assert_eq!(
            ids,
            vec![
                RowId::Ephemeral(-1),
                RowId::Backend("3".to_string()),
                RowId::Ephemeral(-2),
                RowId::Ephemeral(-3),
            ]
        );
    }

    #[test]
    fn test_every_row_gets_distinct_decreasing_placeholders() {
        let records: Vec<Value> = (0..200)
            .map(|i| {
                if i % 3 == 0 {
                    json!({"id": i})
                } else {
                    json!({"n": i})
                }
            })
            .collect();
        let rows = identify_rows(records);
        assert_eq!(rows.len(), 200);

        let placeholders: Vec<i64> = rows
            .iter()
            .filter_map(|r| match r.id {
                RowId::Ephemeral(n) => Some(n),
                _ => None,
            })
            .collect();
        assert!(!placeholders.is_empty());
        assert!(placeholders.windows(2).all(|w| w[0] > w[1]));
        assert!(placeholders.iter().all(|n| *n < 0));
    }

    #[test]
    fn test_placeholder_never_equals_backend_negative() {
        let rows = identify_rows(vec![json!({"id": -1}), json!({"id": null})]);
        assert_eq!(rows[0].id.to_string(), rows[1].id.to_string());
        assert_ne!(rows[0].id, rows[1].id);
        assert!(rows[1].id.is_ephemeral());
    }

    #[test]
    fn test_non_object_elements_are_wrapped() {
        let rows = identify_rows(vec![json!("bare"), json!(null)]);
        assert_eq!(rows[0].get("value"), Some(&json!("bare")));
        assert_eq!(rows[1].id, RowId::Ephemeral(-2));
    }

    #[test]
    fn test_to_json_writes_back_id() {
        let rows = identify_rows(vec![json!({"id": 5}), json!({"resource": "x"})]);
        assert_eq!(rows[0].to_json(), json!({"id": 5}));
        assert_eq!(rows[1].to_json(), json!({"id": -1, "resource": "x"}));
    }
}
