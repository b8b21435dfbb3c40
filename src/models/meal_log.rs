use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;

use crate::{
    constants::*,
    database::documents::{timestamp_value, Document, RunQueryRequest},
};

/// Names of the meals photo-logged since the start of the civil day
pub type UploadedMealSet = HashSet<String>;

/// A photo-log entry as far as reminders care about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealLog {
    pub meal: String,
}

impl MealLog {
    pub fn from_document(doc: &Document) -> Option<Self> {
        let meal = doc.string_field(FIELD_MEAL)?;
        Some(Self {
            meal: meal.to_string(),
        })
    }

    /// Query for every log with `timestamp >= since`
    pub fn logged_since_query(collection: &str, since: DateTime<Utc>) -> RunQueryRequest {
        let since = since.to_rfc3339_opts(SecondsFormat::Millis, true);
        RunQueryRequest::field_filter(
            collection,
            FIELD_TIMESTAMP,
            "GREATER_THAN_OR_EQUAL",
            timestamp_value(&since),
        )
    }
}

/// Collect meal names out of query results, skipping malformed documents
pub fn uploaded_meals(docs: &[Document]) -> UploadedMealSet {
    docs.iter()
        .filter_map(|doc| {
            let log = MealLog::from_document(doc);
            if log.is_none() {
                tracing::debug!("skipping meal log without a meal name: {}", doc.name);
            }
            log
        })
        .map(|log| log.meal)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::documents::{string_value, Fields};

    fn doc(meal: Option<&str>) -> Document {
        let mut fields = Fields::new();
        if let Some(meal) = meal {
            fields.insert(FIELD_MEAL.to_string(), string_value(meal));
        }
        fields.insert(
            FIELD_TIMESTAMP.to_string(),
            timestamp_value("2024-03-10T07:40:00Z"),
        );
        Document {
            name: "meals/x".to_string(),
            ..Document::with_fields(fields)
        }
    }

    #[test]
    fn test_uploaded_meals() {
        let docs = vec![doc(Some("Lunch")), doc(None), doc(Some("Breakfast")), doc(Some("Lunch"))];
        let set = uploaded_meals(&docs);
        assert_eq!(set.len(), 2);
        assert!(set.contains("Lunch"));
        assert!(set.contains("Breakfast"));
    }

    #[test]
    fn test_logged_since_query_uses_utc_millis() {
        let since = DateTime::parse_from_rfc3339("2024-03-10T00:00:00+05:30")
            .unwrap()
            .with_timezone(&Utc);
        let req = MealLog::logged_since_query("meals", since);
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(
            body["structuredQuery"]["where"]["fieldFilter"]["value"]["timestampValue"],
            "2024-03-09T18:30:00.000Z"
        );
    }
}
