use chrono::Utc;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{AppConfig, MessagingConfig};
use database::AppDatabase;
use jobs::{
    meal_reminder::store::{MealLogRepo, ReminderRepo},
    MealReminderJob, RunSummary,
};
use messaging::build_sender;
use utils::AppError;

pub mod civil_time;
pub mod config;
pub mod constants;
pub mod database;
pub mod jobs;
pub mod messaging;
pub mod models;
pub mod schedule;
pub mod utils;

/// Run the meal reminder check once, as the hourly scheduler expects
pub async fn start_reminder_job() -> Result<RunSummary, AppError> {
    // import .env file
    dotenv().ok();
    initialize_logging();
    let config = AppConfig::from_env()?;
    log_configuration(&config);

    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;
    let db_client = Arc::new(AppDatabase::new(&config.firestore, client.clone()));
    let uploads = MealLogRepo::new(db_client.clone(), &config.firestore.meal_log_collection);
    let markers = ReminderRepo::new(db_client, &config.firestore.reminder_collection);
    let sender = build_sender(&config.messaging, client);

    let job = MealReminderJob::new(&config.job, &uploads, &markers, sender.as_ref());
    job.run_once(Utc::now()).await
}

fn initialize_logging() {
    // create default env filter
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or("meal_reminder=debug".into());
    let pretty = std::env::var("LOG_FORMAT")
        .map(|v| v == "pretty")
        .unwrap_or(false);

    // initialize tracing subscriber for logging
    let registry = tracing_subscriber::registry().with(env_filter);
    if pretty {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Which settings are present, never their values when secret
fn log_configuration(config: &AppConfig) {
    tracing::info!(
        "firestore project {} (meals: {}, reminders: {}, service account: {})",
        config.firestore.project_id,
        config.firestore.meal_log_collection,
        config.firestore.reminder_collection,
        config.firestore.service_account.is_some()
    );
    match &config.messaging {
        MessagingConfig::Twilio(twilio) => tracing::info!(
            "messaging via twilio from {} to {} (account sid present: {}, auth token present: {})",
            twilio.from,
            twilio.to,
            !twilio.account_sid.is_empty(),
            !twilio.auth_token.is_empty()
        ),
        MessagingConfig::Gateway(gateway) => tracing::info!(
            "messaging via gateway {} to {} (token present: {})",
            gateway.url,
            gateway.to,
            gateway.token.is_some()
        ),
    }
    tracing::info!(
        "{} meals scheduled, utc offset {}, batch: {}, dry run: {}, dispatch delay: {:?}",
        config.job.schedule.len(),
        config.job.offset,
        config.job.batch,
        config.job.dry_run,
        config.job.dispatch_delay
    );
}
