//! Relative time windows anchored at an explicit `now`.
//!
//! `this_week` is `[now - 7d, now]` and `last_week` is `[now - 14d, now - 7d)`,
//! so a record exactly seven days old belongs to `this_week` only.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::{MoodLevel, MoodRecord};

pub const WEEK_DAYS: u32 = 7;

/// `now - days`, saturating at the earliest instant chrono can represent.
fn days_before(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    now.checked_sub_signed(Duration::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub end_inclusive: bool,
}

impl Window {
    /// `[now - n days, now]`. A start before the representable range is
    /// clamped, so any `n` is accepted.
    pub fn last_days(n: u32, now: DateTime<Utc>) -> Self {
        Self {
            start: days_before(now, n),
            end: now,
            end_inclusive: true,
        }
    }

    pub fn this_week(now: DateTime<Utc>) -> Self {
        Self::last_days(WEEK_DAYS, now)
    }

    pub fn last_week(now: DateTime<Utc>) -> Self {
        Self {
            start: days_before(now, 2 * WEEK_DAYS),
            end: days_before(now, WEEK_DAYS),
            end_inclusive: false,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && (at < self.end || (self.end_inclusive && at == self.end))
    }
}

/// Well-formed, non-future records falling in `window`, with their levels.
pub(crate) fn observations<'a>(
    records: &'a [MoodRecord],
    window: Window,
    now: DateTime<Utc>,
) -> impl Iterator<Item = (&'a MoodRecord, MoodLevel)> + 'a {
    records.iter().filter_map(move |r| {
        let (at, level) = r.observe(now)?;
        window.contains(at).then_some((r, level))
    })
}

fn select(records: &[MoodRecord], window: Window, now: DateTime<Utc>) -> Vec<&MoodRecord> {
    observations(records, window, now).map(|(r, _)| r).collect()
}

/// True iff the record is no more than `n` days old and not future-dated.
pub fn is_within_last_n_days(record: &MoodRecord, n: u32, now: DateTime<Utc>) -> bool {
    record
        .observe(now)
        .is_some_and(|(at, _)| Window::last_days(n, now).contains(at))
}

pub fn this_week(records: &[MoodRecord], now: DateTime<Utc>) -> Vec<&MoodRecord> {
    select(records, Window::this_week(now), now)
}

pub fn last_week(records: &[MoodRecord], now: DateTime<Utc>) -> Vec<&MoodRecord> {
    select(records, Window::last_week(now), now)
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeekBuckets<'a> {
    pub this_week: Vec<&'a MoodRecord>,
    pub last_week: Vec<&'a MoodRecord>,
}

/// Both weekly buckets in one pass. Input order is preserved within each bucket.
pub fn by_week(records: &[MoodRecord], now: DateTime<Utc>) -> WeekBuckets<'_> {
    let current = Window::this_week(now);
    let previous = Window::last_week(now);
    let mut buckets = WeekBuckets::default();
    for record in records {
        let Some((at, _)) = record.observe(now) else {
            continue;
        };
        if current.contains(at) {
            buckets.this_week.push(record);
        } else if previous.contains(at) {
            buckets.last_week.push(record);
        }
    }
    buckets
}

/// UTC calendar day of an instant.
pub fn day_of(at: DateTime<Utc>) -> NaiveDate {
    at.date_naive()
}

/// Records submitted on `now`'s UTC day up to `now`, most recent first.
pub fn todays_records(records: &[MoodRecord], now: DateTime<Utc>) -> Vec<&MoodRecord> {
    let today = day_of(now);
    let todays = records
        .iter()
        .filter(|r| r.observe(now).is_some_and(|(at, _)| day_of(at) == today))
        .collect();
    most_recent_first(todays)
}

pub fn todays_record(records: &[MoodRecord], now: DateTime<Utc>) -> Option<&MoodRecord> {
    todays_records(records, now).into_iter().next()
}

pub fn has_checked_in_today(records: &[MoodRecord], now: DateTime<Utc>) -> bool {
    todays_record(records, now).is_some()
}

/// Display order: newest first, records without an instant last, ties by id.
pub fn most_recent_first(mut records: Vec<&MoodRecord>) -> Vec<&MoodRecord> {
    records.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    records
}
