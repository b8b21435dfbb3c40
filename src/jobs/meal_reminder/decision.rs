use chrono::{DateTime, Duration, FixedOffset, NaiveTime};

use super::store::ReminderMarkers;
use crate::{
    civil_time::CivilNow,
    constants::REMINDER_GRACE_MINS,
    models::{ReminderKey, UploadedMealSet},
    schedule::ScheduledMeal,
};

/// Per-meal verdict of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDecision {
    NotDue,
    AlreadyUploaded,
    AlreadyReminded,
    Send,
}

/// Scheduled time on today's civil date plus the grace period
pub fn reminder_due_at(civil: &CivilNow, meal: &ScheduledMeal) -> DateTime<FixedOffset> {
    let scheduled = civil.start_of_day() + (meal.time - NaiveTime::MIN);
    scheduled + Duration::minutes(REMINDER_GRACE_MINS)
}

/// The part of the verdict that needs no marker lookup
fn precheck(
    civil: &CivilNow,
    meal: &ScheduledMeal,
    uploaded: &UploadedMealSet,
) -> Option<DueDecision> {
    if civil.now() < reminder_due_at(civil, meal) {
        return Some(DueDecision::NotDue);
    }
    if uploaded.contains(&meal.name) {
        return Some(DueDecision::AlreadyUploaded);
    }
    None
}

pub fn decide(
    civil: &CivilNow,
    meal: &ScheduledMeal,
    uploaded: &UploadedMealSet,
    already_reminded: bool,
) -> DueDecision {
    match precheck(civil, meal, uploaded) {
        Some(decision) => decision,
        None if already_reminded => DueDecision::AlreadyReminded,
        None => DueDecision::Send,
    }
}

/// Decide for one meal, consulting the marker store only when the meal is
/// due and not uploaded
pub async fn evaluate(
    civil: &CivilNow,
    meal: &ScheduledMeal,
    uploaded: &UploadedMealSet,
    markers: &dyn ReminderMarkers,
    key: &ReminderKey,
) -> anyhow::Result<DueDecision> {
    if let Some(decision) = precheck(civil, meal, uploaded) {
        return Ok(decision);
    }
    let already_reminded = markers.exists(key).await?;
    Ok(decide(civil, meal, uploaded, already_reminded))
}
