//! Averages, trend classification, mood distribution and the daily chart series.
//!
//! Empty populations never produce `NaN`: averages fall back to `0.0`
//! ("no data") and percentages to `None` ("not applicable").

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;

use crate::window::{Window, day_of, observations};
use crate::{MoodLevel, MoodRecord};

/// Minimum week-over-week change in average before a trend is called, in
/// tenths of a level (0.3).
pub const TREND_THRESHOLD_TENTHS: u32 = 3;

/// Round half away from zero to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Sum and count of the levels in a population.
#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    sum: u64,
    count: u64,
}

impl Tally {
    fn of(levels: impl Iterator<Item = MoodLevel>) -> Self {
        levels.fold(Self::default(), |t, level| Self {
            sum: t.sum + u64::from(level.value()),
            count: t.count + 1,
        })
    }

    fn in_window(records: &[MoodRecord], window: Window, now: DateTime<Utc>) -> Self {
        Self::of(observations(records, window, now).map(|(_, level)| level))
    }

    fn mean(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

/// Mean level over the last `window_days` days, one decimal. `0.0` when the
/// window holds no usable records.
pub fn rolling_average(records: &[MoodRecord], window_days: u32, now: DateTime<Utc>) -> f64 {
    Tally::in_window(records, Window::last_days(window_days, now), now)
        .mean()
        .map(|avg| round_to(avg, 1))
        .unwrap_or(0.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TrendDirection {
    Rising,
    Falling,
    Stable,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    /// This week's mean minus last week's, two decimals.
    pub diff: f64,
}

impl Trend {
    pub const STABLE: Trend = Trend {
        direction: TrendDirection::Stable,
        diff: 0.0,
    };
}

/// Compare this week's mean with last week's.
///
/// An empty current week is always `Stable`. An empty previous week has no
/// baseline and is treated as equal to the current week. The threshold is
/// checked on exact sums and counts, so a difference of exactly 0.3 is
/// `Stable`.
pub fn trend(records: &[MoodRecord], now: DateTime<Utc>) -> Trend {
    let current = Tally::in_window(records, Window::this_week(now), now);
    if current.count == 0 {
        return Trend::STABLE;
    }
    let previous = Tally::in_window(records, Window::last_week(now), now);
    if previous.count == 0 {
        return Trend::STABLE;
    }

    // diff = s1/c1 - s2/c2, scaled by 10 * c1 * c2 to stay in integers.
    let (s1, c1) = (i128::from(current.sum), i128::from(current.count));
    let (s2, c2) = (i128::from(previous.sum), i128::from(previous.count));
    let scaled_diff = 10 * (s1 * c2 - s2 * c1);
    let scaled_threshold = i128::from(TREND_THRESHOLD_TENTHS) * c1 * c2;
    let direction = if scaled_diff > scaled_threshold {
        TrendDirection::Rising
    } else if scaled_diff < -scaled_threshold {
        TrendDirection::Falling
    } else {
        TrendDirection::Stable
    };

    let diff = s1 as f64 / c1 as f64 - s2 as f64 / c2 as f64;
    Trend {
        direction,
        diff: round_to(diff, 2),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BucketShare {
    pub level: MoodLevel,
    pub count: usize,
    /// `None` when the window is empty. Rounded independently per bucket.
    pub percentage: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MoodDistribution {
    pub total: usize,
    pub buckets: [BucketShare; 5],
}

impl MoodDistribution {
    pub fn bucket(&self, level: MoodLevel) -> &BucketShare {
        &self.buckets[usize::from(level.value()) - 1]
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Count of records per level over the last `window_days` days.
pub fn distribution(
    records: &[MoodRecord],
    now: DateTime<Utc>,
    window_days: u32,
) -> MoodDistribution {
    let mut counts = [0usize; 5];
    for (_, level) in observations(records, Window::last_days(window_days, now), now) {
        counts[usize::from(level.value()) - 1] += 1;
    }
    let total: usize = counts.iter().sum();

    let buckets = MoodLevel::ALL.map(|level| {
        let count = counts[usize::from(level.value()) - 1];
        let percentage =
            (total > 0).then(|| (count as f64 / total as f64 * 100.0).round() as u32);
        BucketShare {
            level,
            count,
            percentage,
        }
    });
    MoodDistribution { total, buckets }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    /// Mean level that day, one decimal; `0.0` when the day has no records.
    pub average: f64,
    pub count: usize,
}

/// One point per UTC calendar day from `now - (days - 1)` to `now`, oldest first.
///
/// A series reaching back past the earliest representable date starts at
/// that date instead, so it holds fewer than `days` points.
pub fn daily_series(records: &[MoodRecord], now: DateTime<Utc>, days: u32) -> Vec<DailyPoint> {
    if days == 0 {
        return Vec::new();
    }
    let today = day_of(now);
    let first = today
        .checked_sub_signed(Duration::days(i64::from(days) - 1))
        .unwrap_or(NaiveDate::MIN);
    let span = (today - first).num_days() + 1;

    let mut per_day: BTreeMap<NaiveDate, (u64, usize)> = BTreeMap::new();
    for record in records {
        let Some((at, level)) = record.observe(now) else {
            continue;
        };
        let day = day_of(at);
        if day < first {
            continue;
        }
        let entry = per_day.entry(day).or_default();
        entry.0 += u64::from(level.value());
        entry.1 += 1;
    }

    (0..span)
        .map(|offset| {
            let date = first + Duration::days(offset);
            let (sum, count) = per_day.get(&date).copied().unwrap_or_default();
            let average = if count > 0 {
                round_to(sum as f64 / count as f64, 1)
            } else {
                0.0
            };
            DailyPoint {
                date,
                average,
                count,
            }
        })
        .collect()
}
