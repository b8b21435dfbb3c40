use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Firestore field map, each value in its typed wrapper (`{"stringValue": ..}`)
pub type Fields = HashMap<String, Value>;

pub fn string_value(s: &str) -> Value {
    json!({ "stringValue": s })
}

pub fn timestamp_value(rfc3339: &str) -> Value {
    json!({ "timestampValue": rfc3339 })
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default)]
    pub fields: Fields,
}

impl Document {
    pub fn with_fields(fields: Fields) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    pub fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)?.get("stringValue")?.as_str()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionSelector {
    collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldReference {
    field_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FieldFilter {
    field: FieldReference,
    op: String,
    value: Value,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Filter {
    field_filter: FieldFilter,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StructuredQuery {
    from: Vec<CollectionSelector>,
    #[serde(rename = "where")]
    filter: Filter,
}

/// Body of `documents:runQuery` with a single field filter
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunQueryRequest {
    structured_query: StructuredQuery,
}

impl RunQueryRequest {
    pub fn field_filter(collection: &str, field: &str, op: &str, value: Value) -> Self {
        let filter = Filter {
            field_filter: FieldFilter {
                field: FieldReference {
                    field_path: field.to_string(),
                },
                op: op.to_string(),
                value,
            },
        };
        let structured_query = StructuredQuery {
            from: vec![CollectionSelector {
                collection_id: collection.to_string(),
            }],
            filter,
        };
        Self { structured_query }
    }
}

/// One element of the `runQuery` response array; rows that only report
/// a read time have no document
#[derive(Debug, Deserialize)]
pub struct RunQueryRow {
    pub document: Option<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_query_request_shape() {
        let req = RunQueryRequest::field_filter(
            "meals",
            "timestamp",
            "GREATER_THAN_OR_EQUAL",
            timestamp_value("2024-03-09T18:30:00.000Z"),
        );
        let body = serde_json::to_value(&req).unwrap();
        let expected = json!({
            "structuredQuery": {
                "from": [{ "collectionId": "meals" }],
                "where": {
                    "fieldFilter": {
                        "field": { "fieldPath": "timestamp" },
                        "op": "GREATER_THAN_OR_EQUAL",
                        "value": { "timestampValue": "2024-03-09T18:30:00.000Z" }
                    }
                }
            }
        });
        assert_eq!(body, expected);
    }

    #[test]
    fn test_parse_run_query_rows() {
        let body = r#"[
            {
                "document": {
                    "name": "projects/p/databases/(default)/documents/meals/abc",
                    "fields": {
                        "meal": { "stringValue": "Lunch" },
                        "timestamp": { "timestampValue": "2024-03-10T07:40:00Z" },
                        "photoUrl": { "stringValue": "https://x/y.jpg" },
                        "tags": { "arrayValue": { "values": [] } }
                    },
                    "createTime": "2024-03-10T07:40:01Z",
                    "updateTime": "2024-03-10T07:40:01Z"
                },
                "readTime": "2024-03-10T10:00:00Z"
            },
            { "readTime": "2024-03-10T10:00:00Z" }
        ]"#;
        let rows: Vec<RunQueryRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        let doc = rows[0].document.as_ref().unwrap();
        assert_eq!(doc.string_field("meal"), Some("Lunch"));
        assert_eq!(doc.fields["timestamp"]["timestampValue"], "2024-03-10T07:40:00Z");
        assert_eq!(doc.string_field("timestamp"), None);
        assert!(rows[1].document.is_none());
    }
}
