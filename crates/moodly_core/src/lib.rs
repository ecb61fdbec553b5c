//! Mood aggregation engine: pure reductions over a snapshot of mood check-ins,
//! plus the `RecordSource` seam through which snapshots are obtained.
//!
//! Every aggregation takes the records and an explicit `now`; nothing here
//! reads the wall clock or keeps state between calls.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod clock;
pub mod mapping;
pub mod model;
pub mod ranking;
pub mod retry;
pub mod stats;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use mapping::{BackendMood, ReportRow};
pub use model::{KNOWN_TAGS, MoodLevel, MoodRecord};
pub use ranking::{Influence, top_influences};
pub use stats::{
    BucketShare, DailyPoint, MoodDistribution, Trend, TrendDirection, daily_series, distribution,
    rolling_average, trend,
};
pub use window::{Window, WeekBuckets};

#[derive(Debug, Error)]
pub enum MoodlyError {
    #[error("fetch error: {0}")]
    Fetch(String),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("mood level out of range: {0}")]
    InvalidMoodLevel(i64),
    #[error("unknown mood label: {0}")]
    UnknownMoodLabel(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl MoodlyError {
    /// Only backend failures are worth another attempt; bad payloads and
    /// configuration stay bad.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MoodlyError::Fetch(_))
    }
}

/// Inclusive calendar-day bounds applied to `occurred_at` (UTC).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, record: &MoodRecord) -> bool {
        if self.start.is_none() && self.end.is_none() {
            return true;
        }
        let Some(day) = record.day() else {
            return false;
        };
        self.start.is_none_or(|s| day >= s) && self.end.is_none_or(|e| day <= e)
    }
}

/// Supplies mood records to the aggregator.
///
/// An `Err` means the records could not be obtained; `Ok(vec![])` means there
/// are genuinely none. Callers must not collapse the two.
#[async_trait]
pub trait RecordSource: Send + Sync + 'static {
    /// Records submitted by a single user.
    async fn fetch_my_records(&self, user_id: &str) -> Result<Vec<MoodRecord>, MoodlyError>;

    /// Records for the whole team, optionally narrowed to a date range.
    async fn fetch_team_records(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<MoodRecord>, MoodlyError>;
}
