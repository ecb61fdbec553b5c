//! Logging and metrics around any [`RecordSource`].

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use moodly_core::{DateRange, MoodRecord, MoodlyError, RecordSource};
use tracing::debug;

/// Wraps a record source and reports every fetch: a `debug!` line with the
/// duration and outcome, the `moodly_fetch_total` and
/// `moodly_records_fetched_total` counters, and the
/// `moodly_fetch_duration_seconds` histogram.
#[derive(Clone)]
pub struct LoggingSource<S: RecordSource> {
    inner: Arc<S>,
}

impl<S: RecordSource> LoggingSource<S> {
    pub fn new(source: S) -> Self {
        Self {
            inner: Arc::new(source),
        }
    }

    async fn with_logging<F, Fut>(
        &self,
        operation: F,
        name: &'static str,
    ) -> Result<Vec<MoodRecord>, MoodlyError>
    where
        F: FnOnce(Arc<S>) -> Fut,
        Fut: std::future::Future<Output = Result<Vec<MoodRecord>, MoodlyError>>,
    {
        let start = Instant::now();
        debug!("Starting fetch: {}", name);

        let result = operation(self.inner.clone()).await;

        let duration = start.elapsed();
        metrics::histogram!("moodly_fetch_duration_seconds", "operation" => name)
            .record(duration.as_secs_f64());
        match &result {
            Ok(records) => {
                debug!(
                    "Fetch completed: {} returned {} records in {:?}",
                    name,
                    records.len(),
                    duration
                );
                metrics::counter!("moodly_fetch_total", "operation" => name, "outcome" => "ok")
                    .increment(1);
                metrics::counter!("moodly_records_fetched_total", "operation" => name)
                    .increment(records.len() as u64);
            }
            Err(e) => {
                debug!("Fetch failed: {} in {:?} - error: {}", name, duration, e);
                metrics::counter!("moodly_fetch_total", "operation" => name, "outcome" => "error")
                    .increment(1);
            }
        }

        result
    }
}

#[async_trait]
impl<S: RecordSource> RecordSource for LoggingSource<S> {
    async fn fetch_my_records(&self, user_id: &str) -> Result<Vec<MoodRecord>, MoodlyError> {
        self.with_logging(
            |source| async move { source.fetch_my_records(user_id).await },
            "fetch_my_records",
        )
        .await
    }

    async fn fetch_team_records(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<MoodRecord>, MoodlyError> {
        self.with_logging(
            |source| async move { source.fetch_team_records(range).await },
            "fetch_team_records",
        )
        .await
    }
}
