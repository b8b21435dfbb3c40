use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::{
    database::{AppDatabase, CreateOutcome},
    models::{uploaded_meals, MealLog, ReminderKey, ReminderRecord, UploadedMealSet},
};

/// Source of "already uploaded" for the current civil day
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UploadLookup: Send + Sync {
    async fn uploaded_since(&self, since: DateTime<Utc>) -> anyhow::Result<UploadedMealSet>;
}

/// Source of truth for "already reminded".
///
/// `create` must be create-if-absent so two overlapping runs cannot both
/// claim the same (date, meal).
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ReminderMarkers: Send + Sync {
    async fn exists(&self, key: &ReminderKey) -> anyhow::Result<bool>;

    async fn create(&self, record: &ReminderRecord) -> anyhow::Result<CreateOutcome>;

    async fn release(&self, key: &ReminderKey) -> anyhow::Result<()>;
}

pub struct MealLogRepo {
    db: Arc<AppDatabase>,
    collection: String,
}

impl MealLogRepo {
    pub fn new(db: Arc<AppDatabase>, collection: &str) -> Self {
        Self {
            db,
            collection: collection.to_string(),
        }
    }
}

#[async_trait]
impl UploadLookup for MealLogRepo {
    async fn uploaded_since(&self, since: DateTime<Utc>) -> anyhow::Result<UploadedMealSet> {
        let query = MealLog::logged_since_query(&self.collection, since);
        let docs = self.db.run_query(&query).await?;
        tracing::debug!("{} meal logs since {since}", docs.len());
        Ok(uploaded_meals(&docs))
    }
}

pub struct ReminderRepo {
    db: Arc<AppDatabase>,
    collection: String,
}

impl ReminderRepo {
    pub fn new(db: Arc<AppDatabase>, collection: &str) -> Self {
        Self {
            db,
            collection: collection.to_string(),
        }
    }
}

#[async_trait]
impl ReminderMarkers for ReminderRepo {
    async fn exists(&self, key: &ReminderKey) -> anyhow::Result<bool> {
        let doc = self
            .db
            .get_document(&self.collection, &key.document_id())
            .await?;
        Ok(doc.is_some())
    }

    async fn create(&self, record: &ReminderRecord) -> anyhow::Result<CreateOutcome> {
        self.db
            .create_document(&self.collection, &record.key.document_id(), record.to_fields())
            .await
    }

    async fn release(&self, key: &ReminderKey) -> anyhow::Result<()> {
        self.db
            .delete_document(&self.collection, &key.document_id())
            .await
    }
}
