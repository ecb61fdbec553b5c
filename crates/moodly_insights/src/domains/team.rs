use chrono::{DateTime, Utc};
use moodly_core::window::{WEEK_DAYS, is_within_last_n_days};
use moodly_core::{
    DailyPoint, Influence, MoodDistribution, MoodRecord, TrendDirection, daily_series,
    distribution, rolling_average, top_influences, trend,
};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeekSnapshot {
    pub average: f64,
    pub trend: TrendDirection,
    pub trend_diff: f64,
    pub total_checkins: usize,
    pub mood_distribution: MoodDistribution,
    pub chart_data: Vec<DailyPoint>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamStats {
    /// Mean over the dashboard window; `0.0` means no data.
    pub average: f64,
    pub total_reports: usize,
    pub last_7_days: WeekSnapshot,
    pub top_influences: Vec<Influence>,
}

/// Team dashboard: window average and report count, the last-seven-days
/// breakdown, and the most cited tags of the week.
pub fn team_stats(
    records: &[MoodRecord],
    now: DateTime<Utc>,
    window_days: u32,
    influence_limit: usize,
) -> TeamStats {
    let total_reports = records
        .iter()
        .filter(|r| is_within_last_n_days(r, window_days, now))
        .count();

    let week_trend = trend(records, now);
    let mood_distribution = distribution(records, now, WEEK_DAYS);
    let last_7_days = WeekSnapshot {
        average: rolling_average(records, WEEK_DAYS, now),
        trend: week_trend.direction,
        trend_diff: week_trend.diff,
        total_checkins: mood_distribution.total,
        mood_distribution,
        chart_data: daily_series(records, now, WEEK_DAYS),
    };

    TeamStats {
        average: rolling_average(records, window_days, now),
        total_reports,
        last_7_days,
        top_influences: top_influences(records, now, WEEK_DAYS, influence_limit),
    }
}
