use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use meal_reminder::{
    database::CreateOutcome,
    jobs::meal_reminder::store::{ReminderMarkers, UploadLookup},
    messaging::ReminderSender,
    models::{ReminderKey, ReminderRecord, UploadedMealSet},
};

#[derive(Default)]
pub struct FakeUploads {
    pub meals: Mutex<UploadedMealSet>,
    pub fail: AtomicBool,
    pub calls: AtomicUsize,
}

impl FakeUploads {
    pub fn with(meals: &[&str]) -> Self {
        let fake = Self::default();
        *fake.meals.lock().unwrap() = meals.iter().map(|m| m.to_string()).collect();
        fake
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.fail.store(true, Ordering::SeqCst);
        fake
    }
}

#[async_trait]
impl UploadLookup for FakeUploads {
    async fn uploaded_since(&self, _since: DateTime<Utc>) -> anyhow::Result<UploadedMealSet> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("firestore runQuery failed with 500 Internal Server Error");
        }
        Ok(self.meals.lock().unwrap().clone())
    }
}

/// In-memory marker store with create-if-absent semantics
#[derive(Default)]
pub struct FakeMarkers {
    pub records: Mutex<HashMap<ReminderKey, DateTime<Utc>>>,
    /// claims made by an overlapping run between `exists` and `create`
    pub raced: Mutex<Vec<ReminderKey>>,
    pub creates: AtomicUsize,
}

impl FakeMarkers {
    pub fn insert(&self, date: &str, meal: &str) {
        self.records
            .lock()
            .unwrap()
            .insert(ReminderKey::new(date, meal), Utc::now());
    }

    pub fn contains(&self, date: &str, meal: &str) -> bool {
        self.records
            .lock()
            .unwrap()
            .contains_key(&ReminderKey::new(date, meal))
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ReminderMarkers for FakeMarkers {
    async fn exists(&self, key: &ReminderKey) -> anyhow::Result<bool> {
        Ok(self.records.lock().unwrap().contains_key(key))
    }

    async fn create(&self, record: &ReminderRecord) -> anyhow::Result<CreateOutcome> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        let raced = self.raced.lock().unwrap().contains(&record.key);
        if raced || records.contains_key(&record.key) {
            records.entry(record.key.clone()).or_insert(record.claimed_at);
            return Ok(CreateOutcome::AlreadyExists);
        }
        records.insert(record.key.clone(), record.claimed_at);
        Ok(CreateOutcome::Created)
    }

    async fn release(&self, key: &ReminderKey) -> anyhow::Result<()> {
        self.records.lock().unwrap().remove(key);
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeSender {
    pub sent: Mutex<Vec<String>>,
    pub fail: AtomicBool,
}

impl FakeSender {
    pub fn failing() -> Self {
        let fake = Self::default();
        fake.fail.store(true, Ordering::SeqCst);
        fake
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReminderSender for FakeSender {
    async fn send(&self, body: &str) -> anyhow::Result<String> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("provider rejected message with 429 Too Many Requests");
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(body.to_string());
        Ok(format!("SM{}", sent.len()))
    }

    fn provider(&self) -> &'static str {
        "fake"
    }
}
