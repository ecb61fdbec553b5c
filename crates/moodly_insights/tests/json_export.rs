use std::io::Write;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use moodly_core::retry::RetryPolicy;
use moodly_core::{FixedClock, MoodLevel, TrendDirection};
use moodly_insights::middleware::LoggingSource;
use moodly_insights::sources::JsonFileSource;
use moodly_insights::{InsightsError, InsightsService};

fn export() -> tempfile::NamedTempFile {
    let rows = serde_json::json!([
        {"id": "1", "user_id": "ana", "date": "2026-09-29", "mood": "good", "reasons": ["Workload", "Focus"], "created_at": "2026-09-29T08:00:00+00:00"},
        {"id": "2", "user_id": "ben", "date": "2026-09-29", "mood": "very_good", "reasons": ["Workload"], "created_at": "2026-09-29 09:30:00"},
        {"id": "3", "user_id": "ana", "date": "2026-09-30", "mood": "okay", "reasons": ["Recognition"], "created_at": "2026-09-30T07:45:00Z"},
        {"id": "4", "user_id": "ben", "date": "2026-09-20", "mood": "bad", "reasons": ["Workload"], "created_at": "2026-09-20T12:00:00Z"},
        {"id": "5", "user_id": "ana", "date": "2026-09-30", "mood": "very_bad", "reasons": [], "created_at": null},
        {"id": "6", "user_id": "ben", "mood": "good", "reasons": ["Focus"], "created_at": "2026-10-05T12:00:00Z"},
        {"id": "7", "user_id": "ana", "mood": "superb", "created_at": "2026-09-30T10:00:00Z"}
    ]);
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{rows}").unwrap();
    file
}

fn service(path: &std::path::Path) -> InsightsService {
    let now = Utc.with_ymd_and_hms(2026, 9, 30, 18, 0, 0).unwrap();
    InsightsService::new(
        Arc::new(LoggingSource::new(JsonFileSource::new(path))),
        Arc::new(FixedClock(now)),
    )
}

#[tokio::test]
async fn team_dashboard_from_export() {
    let file = export();
    let stats = service(file.path()).team_stats().await.unwrap();

    // rows 1-4 are usable; 5 has no instant, 6 is in the future, 7 has an unknown label
    assert_eq!(stats.total_reports, 4);
    assert_eq!(stats.average, 3.5);

    let week = &stats.last_7_days;
    assert_eq!(week.total_checkins, 3);
    assert_eq!(week.average, 4.0);
    assert_eq!(week.trend, TrendDirection::Rising);
    assert_eq!(week.trend_diff, 2.0);
    assert_eq!(week.chart_data.len(), 7);
    assert_eq!(week.chart_data[5].average, 4.5);
    assert_eq!(week.chart_data[6].average, 3.0);
    assert_eq!(week.mood_distribution.bucket(MoodLevel::Good).percentage, Some(33));

    assert_eq!(stats.top_influences[0].tag, "Workload");
    assert_eq!(stats.top_influences[0].count, 2);
    assert_eq!(stats.top_influences[1].tag, "Focus");
}

#[tokio::test]
async fn personal_history_from_export() {
    let file = export();
    let overview = service(file.path()).personal_overview("ana").await.unwrap();
    assert_eq!(overview.thirty_day_average, 3.5);
    assert!(overview.checked_in_today);
    assert_eq!(overview.today.as_ref().map(|r| r.id.as_str()), Some("3"));
    let ids: Vec<_> = overview.this_week.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["3", "1"]);
}

#[tokio::test]
async fn missing_export_surfaces_as_error() {
    let service = service(std::path::Path::new("/nonexistent/moodly-export.json"))
        .with_retry(RetryPolicy::no_retry());
    let err = service.team_stats().await.unwrap_err();
    assert!(matches!(err, InsightsError::Source(_)));
}
