use chrono::Utc;
use std::time::Duration;
use tokio::time::sleep;

use super::{store::ReminderMarkers, RunSummary};
use crate::{
    database::CreateOutcome,
    messaging::ReminderSender,
    models::{ReminderKey, ReminderRecord},
    utils::render_reminder,
};

enum Claim {
    Claimed,
    Taken,
    Failed,
}

/// Sends reminders one at a time, pacing successive sends. Only attempts
/// that reach the provider count toward the pacing.
///
/// A marker is claimed (create-if-absent) before the message goes out and
/// released again when the provider rejects it, so a marker left behind
/// always belongs to an accepted message.
pub(super) struct Dispatcher<'a> {
    markers: &'a dyn ReminderMarkers,
    sender: &'a dyn ReminderSender,
    template: &'a str,
    delay: Duration,
    attempts: usize,
}

impl<'a> Dispatcher<'a> {
    pub(super) fn new(
        markers: &'a dyn ReminderMarkers,
        sender: &'a dyn ReminderSender,
        template: &'a str,
        delay: Duration,
    ) -> Self {
        Self {
            markers,
            sender,
            template,
            delay,
            attempts: 0,
        }
    }

    async fn pace(&mut self) {
        if self.attempts > 0 && !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        self.attempts += 1;
    }

    async fn claim(&self, key: &ReminderKey) -> Claim {
        let record = ReminderRecord::new(key.clone(), Utc::now());
        match self.markers.create(&record).await {
            Ok(CreateOutcome::Created) => Claim::Claimed,
            Ok(CreateOutcome::AlreadyExists) => {
                tracing::info!(
                    "reminder for {} on {} was claimed by another run",
                    key.meal,
                    key.date
                );
                Claim::Taken
            }
            Err(err) => {
                tracing::warn!("not able to record reminder for {}: {err:#}", key.meal);
                Claim::Failed
            }
        }
    }

    async fn release(&self, key: &ReminderKey) {
        if let Err(err) = self.markers.release(key).await {
            // the leftover marker suppresses today's reminder for this meal
            tracing::error!(
                "not able to release reminder marker {}: {err:#}",
                key.document_id()
            );
        }
    }

    pub(super) async fn dispatch_one(&mut self, key: &ReminderKey, summary: &mut RunSummary) {
        match self.claim(key).await {
            Claim::Claimed => self.pace().await,
            Claim::Taken => {
                summary.already_reminded += 1;
                return;
            }
            Claim::Failed => {
                summary.failed += 1;
                return;
            }
        }
        let body = render_reminder(self.template, &[key.meal.as_str()]);
        match self.sender.send(&body).await {
            Ok(id) => {
                tracing::info!(
                    "reminder for {} sent via {} ({id})",
                    key.meal,
                    self.sender.provider()
                );
                summary.sent += 1;
            }
            Err(err) => {
                tracing::warn!("not able to send reminder for {}: {err:#}", key.meal);
                self.release(key).await;
                summary.failed += 1;
            }
        }
    }

    /// One message naming every claimed meal
    pub(super) async fn dispatch_batch(&mut self, keys: &[ReminderKey], summary: &mut RunSummary) {
        let mut claimed = Vec::with_capacity(keys.len());
        for key in keys {
            match self.claim(key).await {
                Claim::Claimed => claimed.push(key),
                Claim::Taken => summary.already_reminded += 1,
                Claim::Failed => summary.failed += 1,
            }
        }
        if claimed.is_empty() {
            return;
        }
        self.pace().await;
        let meals: Vec<&str> = claimed.iter().map(|key| key.meal.as_str()).collect();
        let body = render_reminder(self.template, &meals);
        match self.sender.send(&body).await {
            Ok(id) => {
                tracing::info!(
                    "batched reminder for {} sent via {} ({id})",
                    meals.join(", "),
                    self.sender.provider()
                );
                summary.sent += claimed.len();
            }
            Err(err) => {
                tracing::warn!("not able to send batched reminder: {err:#}");
                for key in &claimed {
                    self.release(key).await;
                }
                summary.failed += claimed.len();
            }
        }
    }
}
