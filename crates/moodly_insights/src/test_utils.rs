//! Mock record sources shared by the unit tests.
#![cfg(test)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use moodly_core::{DateRange, MoodRecord, MoodlyError, RecordSource};

/// Always fails with a retryable fetch error and counts how often it was asked.
#[derive(Clone, Default)]
pub struct FailingSource {
    pub calls: Arc<AtomicU32>,
}

impl FailingSource {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for FailingSource {
    async fn fetch_my_records(&self, _user_id: &str) -> Result<Vec<MoodRecord>, MoodlyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MoodlyError::Fetch("backend unavailable".into()))
    }

    async fn fetch_team_records(
        &self,
        _range: Option<DateRange>,
    ) -> Result<Vec<MoodRecord>, MoodlyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(MoodlyError::Fetch("backend unavailable".into()))
    }
}

/// Fails `failures` times, then serves `records`.
pub struct FlakySource {
    failures: u32,
    calls: AtomicU32,
    records: Vec<MoodRecord>,
}

impl FlakySource {
    pub fn new(failures: u32, records: Vec<MoodRecord>) -> Self {
        Self {
            failures,
            calls: AtomicU32::new(0),
            records,
        }
    }

    fn attempt(&self) -> Result<Vec<MoodRecord>, MoodlyError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n < self.failures {
            Err(MoodlyError::Fetch(format!("attempt {n} failed")))
        } else {
            Ok(self.records.clone())
        }
    }
}

#[async_trait]
impl RecordSource for FlakySource {
    async fn fetch_my_records(&self, user_id: &str) -> Result<Vec<MoodRecord>, MoodlyError> {
        Ok(self
            .attempt()?
            .into_iter()
            .filter(|r| r.user_id.as_deref() == Some(user_id))
            .collect())
    }

    async fn fetch_team_records(
        &self,
        _range: Option<DateRange>,
    ) -> Result<Vec<MoodRecord>, MoodlyError> {
        self.attempt()
    }
}
