use chrono::{FixedOffset, Offset, Utc};
use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    time::Duration,
};

use crate::{
    civil_time::parse_utc_offset,
    constants::*,
    schedule::MealSchedule,
    utils::{env_flag, AppError},
};

#[derive(Clone)]
pub struct ServiceAccount {
    pub client_email: String,
    pub private_key: String,
}

impl Debug for ServiceAccount {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.debug_struct("ServiceAccount")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    pub base_url: String,
    pub project_id: String,
    pub meal_log_collection: String,
    pub reminder_collection: String,
    pub service_account: Option<ServiceAccount>,
}

#[derive(Clone)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

impl Debug for TwilioConfig {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub url: String,
    pub token: Option<String>,
    pub to: String,
}

impl Debug for GatewayConfig {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        f.debug_struct("GatewayConfig")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("to", &self.to)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum MessagingConfig {
    Twilio(TwilioConfig),
    Gateway(GatewayConfig),
}

/// Everything the decision procedure and the dispatch loop need
#[derive(Debug, Clone)]
pub struct JobSettings {
    pub schedule: MealSchedule,
    pub offset: FixedOffset,
    pub template: String,
    pub batch: bool,
    pub dispatch_delay: Duration,
    pub dry_run: bool,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            schedule: MealSchedule::default(),
            offset: parse_utc_offset(DEFAULT_UTC_OFFSET).unwrap_or_else(|_| Utc.fix()),
            template: REMINDER_TEMPLATE.to_string(),
            batch: false,
            dispatch_delay: Duration::from_millis(DISPATCH_DELAY_MS),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub firestore: FirestoreConfig,
    pub messaging: MessagingConfig,
    pub job: JobSettings,
    pub request_timeout: Duration,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &str) -> Result<String, AppError> {
    optional(name).ok_or_else(|| AppError::config(format!("{name} not found in environment")))
}

fn parse_number(name: &str, default: u64) -> Result<u64, AppError> {
    match optional(name) {
        Some(v) => v
            .parse::<u64>()
            .map_err(|_| AppError::config(format!("{name} must be a number, got `{v}`"))),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Build the configuration once from the process environment
    pub fn from_env() -> Result<Self, AppError> {
        let firestore = FirestoreConfig::from_env()?;
        let messaging = MessagingConfig::from_env()?;
        let job = JobSettings::from_env()?;
        let request_timeout =
            Duration::from_secs(parse_number("REQUEST_TIMEOUT_SECS", REQUEST_TIMEOUT_SECS)?);
        Ok(Self {
            firestore,
            messaging,
            job,
            request_timeout,
        })
    }
}

impl FirestoreConfig {
    fn from_env() -> Result<Self, AppError> {
        let service_account = match (
            optional("FIREBASE_SERVICE_CLIENT_EMAIL"),
            optional("FIREBASE_SERVICE_PRIVATE_KEY"),
        ) {
            (Some(client_email), Some(private_key)) => Some(ServiceAccount {
                client_email,
                // keys pasted into .env files usually carry literal \n
                private_key: private_key.replace("\\n", "\n"),
            }),
            (None, None) => None,
            _ => {
                return Err(AppError::config(
                    "FIREBASE_SERVICE_CLIENT_EMAIL and FIREBASE_SERVICE_PRIVATE_KEY must be set together",
                ))
            }
        };
        Ok(Self {
            base_url: optional("FIRESTORE_BASE_URL").unwrap_or(FIRESTORE_BASE_URL.to_string()),
            project_id: required("FIREBASE_PROJECT_ID")?,
            meal_log_collection: optional("MEAL_LOG_COLLECTION").unwrap_or(COLL_MEALS.to_string()),
            reminder_collection: optional("REMINDER_COLLECTION")
                .unwrap_or(COLL_REMINDERS.to_string()),
            service_account,
        })
    }
}

impl MessagingConfig {
    fn from_env() -> Result<Self, AppError> {
        let to = required("PHONE_NUMBER")?;
        let provider = optional("MESSAGING_PROVIDER").unwrap_or("twilio".to_string());
        match provider.to_ascii_lowercase().as_str() {
            "twilio" => Ok(Self::Twilio(TwilioConfig {
                account_sid: required("TWILIO_ACCOUNT_SID")?,
                auth_token: required("TWILIO_AUTH_TOKEN")?,
                from: required("WHATSAPP_NUMBER_FROM")?,
                to,
            })),
            "gateway" => Ok(Self::Gateway(GatewayConfig {
                url: required("WHATSAPP_GATEWAY_URL")?,
                token: optional("WHATSAPP_GATEWAY_TOKEN"),
                to,
            })),
            other => Err(AppError::config(format!(
                "MESSAGING_PROVIDER must be `twilio` or `gateway`, got `{other}`"
            ))),
        }
    }
}

impl JobSettings {
    fn from_env() -> Result<Self, AppError> {
        let offset = optional("CIVIL_UTC_OFFSET").unwrap_or(DEFAULT_UTC_OFFSET.to_string());
        let offset = parse_utc_offset(&offset)
            .map_err(|e| AppError::config(format!("CIVIL_UTC_OFFSET: {e}")))?;
        let schedule = match optional("MEAL_SCHEDULE") {
            Some(s) => MealSchedule::parse(&s)
                .map_err(|e| AppError::config(format!("MEAL_SCHEDULE: {e}")))?,
            None => MealSchedule::default(),
        };
        let template = optional("REMINDER_TEMPLATE").unwrap_or(REMINDER_TEMPLATE.to_string());
        let dispatch_delay =
            Duration::from_millis(parse_number("DISPATCH_DELAY_MS", DISPATCH_DELAY_MS)?);
        Ok(Self {
            schedule,
            offset,
            template,
            batch: env_flag("BATCH_REMINDERS"),
            dispatch_delay,
            dry_run: env_flag("DRY_RUN"),
        })
    }
}
