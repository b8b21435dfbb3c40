use chrono::{DateTime, Utc};
use std::fmt::{Display, Formatter, Result as FmtResult};

use self::{
    decision::{evaluate, reminder_due_at, DueDecision},
    dispatch::Dispatcher,
    store::{ReminderMarkers, UploadLookup},
};
use crate::{
    civil_time::CivilNow, config::JobSettings, messaging::ReminderSender, models::ReminderKey,
    utils::AppError,
};

pub mod decision;
mod dispatch;
pub mod store;

/// Outcome counts of one run plus the verdict evaluated for each meal
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub date: String,
    pub decisions: Vec<(String, DueDecision)>,
    pub not_due: usize,
    pub already_uploaded: usize,
    pub already_reminded: usize,
    pub sent: usize,
    pub failed: usize,
    pub skipped: usize,
    pub would_send: usize,
}

impl RunSummary {
    pub fn decision_for(&self, meal: &str) -> Option<DueDecision> {
        self.decisions
            .iter()
            .find(|(name, _)| name == meal)
            .map(|(_, decision)| *decision)
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(
            f,
            "date={} not_due={} uploaded={} reminded={} sent={} failed={} skipped={} would_send={}",
            self.date,
            self.not_due,
            self.already_uploaded,
            self.already_reminded,
            self.sent,
            self.failed,
            self.skipped,
            self.would_send
        )
    }
}

/// One invocation of the hourly meal reminder check
pub struct MealReminderJob<'a> {
    settings: &'a JobSettings,
    uploads: &'a dyn UploadLookup,
    markers: &'a dyn ReminderMarkers,
    sender: &'a dyn ReminderSender,
}

impl<'a> MealReminderJob<'a> {
    pub fn new(
        settings: &'a JobSettings,
        uploads: &'a dyn UploadLookup,
        markers: &'a dyn ReminderMarkers,
        sender: &'a dyn ReminderSender,
    ) -> Self {
        Self {
            settings,
            uploads,
            markers,
            sender,
        }
    }

    /// Evaluate every scheduled meal at `instant` and remind the overdue ones.
    ///
    /// Only a failed upload lookup aborts the run; it happens before any
    /// meal is looked at. Everything after that is isolated per meal.
    pub async fn run_once(&self, instant: DateTime<Utc>) -> Result<RunSummary, AppError> {
        let civil = CivilNow::from_instant(instant, self.settings.offset);
        let date = civil.date_key();
        tracing::info!("meal reminder run for {date}, civil now {}", civil.now());

        let uploaded = self
            .uploads
            .uploaded_since(civil.start_of_day_utc())
            .await
            .map_err(AppError::UploadQuery)?;
        tracing::info!("meals uploaded today: {:?}", uploaded);

        let mut summary = RunSummary {
            date: date.clone(),
            ..Default::default()
        };
        let mut dispatcher = Dispatcher::new(
            self.markers,
            self.sender,
            &self.settings.template,
            self.settings.dispatch_delay,
        );
        let mut batch = vec![];
        for meal in self.settings.schedule.iter() {
            let key = ReminderKey::new(&date, &meal.name);
            let decision = match evaluate(&civil, meal, &uploaded, self.markers, &key).await {
                Ok(decision) => decision,
                Err(err) => {
                    tracing::warn!("skipping {}: reminder lookup failed: {err:#}", meal.name);
                    summary.skipped += 1;
                    continue;
                }
            };
            tracing::debug!(
                "{} due at {} -> {:?}",
                meal.name,
                reminder_due_at(&civil, meal),
                decision
            );
            summary.decisions.push((meal.name.clone(), decision));
            match decision {
                DueDecision::NotDue => summary.not_due += 1,
                DueDecision::AlreadyUploaded => summary.already_uploaded += 1,
                DueDecision::AlreadyReminded => summary.already_reminded += 1,
                DueDecision::Send if self.settings.dry_run => {
                    tracing::info!("dry run: would remind about {}", meal.name);
                    summary.would_send += 1;
                }
                DueDecision::Send if self.settings.batch => batch.push(key),
                DueDecision::Send => dispatcher.dispatch_one(&key, &mut summary).await,
            }
        }
        if !batch.is_empty() {
            dispatcher.dispatch_batch(&batch, &mut summary).await;
        }

        tracing::info!("meal reminder run finished: {summary}");
        Ok(summary)
    }
}
