//! Dashboards for the Moodly check-in app, built on `moodly_core`.
//!
//! [`InsightsService`] fetches a snapshot through a [`RecordSource`], reads
//! "now" from a [`Clock`], and hands both to the pure compositions in
//! [`domains`].

use std::sync::Arc;

use moodly_core::retry::RetryPolicy;
use moodly_core::{Clock, DateRange, RecordSource, Window};
use serde::Serialize;

pub mod config;
pub mod domains;
pub mod error;
pub mod middleware;
pub mod sources;
mod test_utils;

pub use config::{Config, View};
pub use domains::personal::{PersonalOverview, personal_overview};
pub use domains::team::{TeamStats, team_stats};
pub use error::{InsightsError, InsightsResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DashboardSettings {
    pub window_days: u32,
    pub top_influences: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            window_days: config::DEFAULT_WINDOW_DAYS,
            top_influences: config::DEFAULT_TOP_INFLUENCES,
        }
    }
}

#[derive(Clone)]
pub struct InsightsService {
    source: Arc<dyn RecordSource>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
    settings: DashboardSettings,
}

impl InsightsService {
    pub fn new(source: Arc<dyn RecordSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            retry: RetryPolicy::default(),
            settings: DashboardSettings::default(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_settings(mut self, settings: DashboardSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Team dashboard over the configured window.
    ///
    /// Only the window's calendar days are requested from the source; a
    /// failed fetch is returned as an error, never as an empty dashboard.
    pub async fn team_stats(&self) -> InsightsResult<TeamStats> {
        let now = self.clock.now();
        let window_days = self.settings.window_days;
        let start = Window::last_days(window_days, now).start.date_naive();
        let range = DateRange::new(Some(start), None);

        let records = self
            .retry
            .retry_async(|| self.source.fetch_team_records(Some(range)))
            .await?;
        tracing::info!(records = records.len(), window_days, "computing team stats");
        Ok(team_stats(
            &records,
            now,
            window_days,
            self.settings.top_influences,
        ))
    }

    pub async fn personal_overview(&self, user_id: &str) -> InsightsResult<PersonalOverview> {
        if user_id.trim().is_empty() {
            return Err(InsightsError::Validation("user id must not be empty".into()));
        }
        let now = self.clock.now();
        let records = self
            .retry
            .retry_async(|| self.source.fetch_my_records(user_id))
            .await?;
        tracing::info!(records = records.len(), "computing personal overview");
        Ok(personal_overview(&records, now))
    }

    /// The selected dashboard as pretty-printed JSON.
    pub async fn report(&self, view: View, user_id: Option<&str>) -> InsightsResult<String> {
        match view {
            View::Team => to_json(&self.team_stats().await?),
            View::Personal => {
                let overview = self.personal_overview(user_id.unwrap_or_default()).await?;
                to_json(&overview)
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> InsightsResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemorySource;
    use crate::test_utils::{FailingSource, FlakySource};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use moodly_core::{FixedClock, MoodLevel, MoodRecord, MoodlyError};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap()
    }

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: std::time::Duration::from_millis(1),
        }
    }

    fn records() -> Vec<MoodRecord> {
        vec![
            MoodRecord::new("a", now() - Duration::days(1), MoodLevel::Good).with_user("u1"),
            MoodRecord::new("b", now() - Duration::days(2), MoodLevel::Okay).with_user("u2"),
            MoodRecord::new("c", now() - Duration::days(40), MoodLevel::VeryBad).with_user("u1"),
        ]
    }

    #[tokio::test]
    async fn team_stats_from_source() {
        let service = InsightsService::new(
            Arc::new(InMemorySource::new(records())),
            Arc::new(FixedClock(now())),
        );
        let stats = service.team_stats().await.unwrap();
        assert_eq!(stats.total_reports, 2);
        assert_eq!(stats.average, 3.5);
    }

    #[tokio::test]
    async fn personal_overview_only_sees_own_records() {
        let service = InsightsService::new(
            Arc::new(InMemorySource::new(records())),
            Arc::new(FixedClock(now())),
        );
        let overview = service.personal_overview("u1").await.unwrap();
        assert_eq!(overview.thirty_day_average, 4.0);
        assert_eq!(overview.this_week.len(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_not_an_empty_dashboard() {
        let failing = FailingSource::default();
        let service = InsightsService::new(Arc::new(failing.clone()), Arc::new(FixedClock(now())))
            .with_retry(fast_retry(2));
        let err = service.team_stats().await.unwrap_err();
        assert!(matches!(err, InsightsError::Source(MoodlyError::Fetch(_))));
        assert_eq!(failing.calls(), 3);
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let service = InsightsService::new(
            Arc::new(FlakySource::new(2, records())),
            Arc::new(FixedClock(now())),
        )
        .with_retry(fast_retry(3));
        let overview = service.personal_overview("u2").await.unwrap();
        assert_eq!(overview.thirty_day_average, 3.0);
    }

    #[tokio::test]
    async fn blank_user_is_rejected() {
        let service = InsightsService::new(
            Arc::new(InMemorySource::default()),
            Arc::new(FixedClock(now())),
        );
        assert!(matches!(
            service.personal_overview("  ").await,
            Err(InsightsError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn report_renders_the_selected_view() {
        let service = InsightsService::new(
            Arc::new(InMemorySource::new(records())),
            Arc::new(FixedClock(now())),
        );
        let team: serde_json::Value =
            serde_json::from_str(&service.report(View::Team, None).await.unwrap()).unwrap();
        assert_eq!(team["total_reports"], 2);

        let personal: serde_json::Value =
            serde_json::from_str(&service.report(View::Personal, Some("u1")).await.unwrap())
                .unwrap();
        assert_eq!(personal["thirty_day_average"], 4.0);

        assert!(matches!(
            service.report(View::Personal, None).await,
            Err(InsightsError::Validation(_))
        ));
    }

    #[test]
    fn serialization_failures_are_insights_errors() {
        struct Unserializable;
        impl Serialize for Unserializable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }
        assert!(matches!(
            to_json(&Unserializable),
            Err(InsightsError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn huge_window_setting_does_not_overflow() {
        let service = InsightsService::new(
            Arc::new(InMemorySource::new(records())),
            Arc::new(FixedClock(now())),
        )
        .with_settings(DashboardSettings {
            window_days: u32::MAX,
            top_influences: 3,
        });
        let stats = service.team_stats().await.unwrap();
        assert_eq!(stats.total_reports, 3);
    }

    #[tokio::test]
    async fn settings_narrow_the_window() {
        let service = InsightsService::new(
            Arc::new(InMemorySource::new(records())),
            Arc::new(FixedClock(now())),
        )
        .with_settings(DashboardSettings {
            window_days: 1,
            top_influences: 1,
        });
        let stats = service.team_stats().await.unwrap();
        assert_eq!(stats.total_reports, 1);
        assert_eq!(stats.average, 4.0);
    }
}
