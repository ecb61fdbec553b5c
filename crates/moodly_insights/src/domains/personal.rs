use chrono::{DateTime, Utc};
use moodly_core::window::{by_week, most_recent_first, todays_record};
use moodly_core::{MoodLevel, MoodRecord, Trend, rolling_average, trend};
use serde::Serialize;

pub const HISTORY_WINDOW_DAYS: u32 = 30;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersonalOverview {
    pub thirty_day_average: f64,
    /// `"—"` when there is no data, otherwise one decimal.
    pub average_display: String,
    pub average_mood: Option<MoodLevel>,
    pub trend: Trend,
    pub trend_display: String,
    pub checked_in_today: bool,
    pub today: Option<MoodRecord>,
    pub this_week: Vec<MoodRecord>,
    pub last_week: Vec<MoodRecord>,
}

/// An employee's history screen, computed from their own records.
pub fn personal_overview(records: &[MoodRecord], now: DateTime<Utc>) -> PersonalOverview {
    let average = rolling_average(records, HISTORY_WINDOW_DAYS, now);
    let week_trend = trend(records, now);
    let weeks = by_week(records, now);
    let today = todays_record(records, now).cloned();

    PersonalOverview {
        thirty_day_average: average,
        average_display: display_average(average),
        average_mood: MoodLevel::nearest(average),
        trend: week_trend,
        trend_display: display_trend_diff(week_trend.diff),
        checked_in_today: today.is_some(),
        today,
        this_week: most_recent_first(weeks.this_week).into_iter().cloned().collect(),
        last_week: most_recent_first(weeks.last_week).into_iter().cloned().collect(),
    }
}

pub fn display_average(average: f64) -> String {
    if average > 0.0 {
        format!("{average:.1}")
    } else {
        "—".to_string()
    }
}

pub fn display_trend_diff(diff: f64) -> String {
    let sign = if diff > 0.0 { "+" } else { "" };
    format!("{sign}{diff:.2} vs prev week")
}
