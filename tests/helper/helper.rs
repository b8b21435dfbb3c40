use chrono::{DateTime, Utc};
use std::time::Duration;

use meal_reminder::{config::JobSettings, schedule::MealSchedule};

/// Parse an RFC 3339 instant such as `2024-03-10T15:30:00+05:30`
pub fn civil_instant(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

/// Job settings for the given `Name=HH:MM,..` schedule with no pacing delay
pub fn settings_with(schedule: &str) -> JobSettings {
    JobSettings {
        schedule: MealSchedule::parse(schedule).unwrap(),
        dispatch_delay: Duration::ZERO,
        ..Default::default()
    }
}
