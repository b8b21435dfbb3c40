use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    constants::*,
    database::documents::{string_value, timestamp_value, Fields},
    utils::reminder_document_id,
};

/// Identity of a reminder marker: one per civil date and meal
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReminderKey {
    pub date: String,
    pub meal: String,
}

impl ReminderKey {
    pub fn new(date: &str, meal: &str) -> Self {
        Self {
            date: date.to_string(),
            meal: meal.to_string(),
        }
    }

    pub fn document_id(&self) -> String {
        reminder_document_id(&self.date, &self.meal)
    }
}

/// Marker body; written as the claim, before the message goes out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRecord {
    pub key: ReminderKey,
    pub claimed_at: DateTime<Utc>,
}

impl ReminderRecord {
    pub fn new(key: ReminderKey, claimed_at: DateTime<Utc>) -> Self {
        Self { key, claimed_at }
    }

    pub fn to_fields(&self) -> Fields {
        let claimed_at = self.claimed_at.to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut fields = Fields::new();
        fields.insert(FIELD_DATE.to_string(), string_value(&self.key.date));
        fields.insert(FIELD_MEAL.to_string(), string_value(&self.key.meal));
        fields.insert(FIELD_CLAIMED_AT.to_string(), timestamp_value(&claimed_at));
        fields
    }
}
