//! Mood records as handed to the aggregator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::MoodlyError;

/// Tags offered by the check-in screen. Aggregations count any tag, listed or not.
pub const KNOWN_TAGS: [&str; 7] = [
    "Workload",
    "Collaboration",
    "Recognition",
    "Autonomy",
    "Focus",
    "Personal",
    "Other",
];

/// Ordinal mood scale, 1 (worst) through 5 (best).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum MoodLevel {
    VeryBad = 1,
    Bad = 2,
    Okay = 3,
    Good = 4,
    VeryGood = 5,
}

impl MoodLevel {
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel::VeryBad,
        MoodLevel::Bad,
        MoodLevel::Okay,
        MoodLevel::Good,
        MoodLevel::VeryGood,
    ];

    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "Very bad",
            MoodLevel::Bad => "Bad",
            MoodLevel::Okay => "Okay",
            MoodLevel::Good => "Good",
            MoodLevel::VeryGood => "Very good",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "😞",
            MoodLevel::Bad => "😟",
            MoodLevel::Okay => "😐",
            MoodLevel::Good => "🙂",
            MoodLevel::VeryGood => "😄",
        }
    }

    /// Bucket key used in distributions.
    pub fn key(self) -> &'static str {
        match self {
            MoodLevel::VeryBad => "very_bad",
            MoodLevel::Bad => "bad",
            MoodLevel::Okay => "okay",
            MoodLevel::Good => "good",
            MoodLevel::VeryGood => "very_good",
        }
    }

    /// Face for an averaged score. `0.0` is the "no data" sentinel and maps to `None`.
    pub fn nearest(average: f64) -> Option<MoodLevel> {
        if average.is_nan() || average <= 0.0 {
            return None;
        }
        Some(if average >= 4.5 {
            MoodLevel::VeryGood
        } else if average >= 3.5 {
            MoodLevel::Good
        } else if average >= 2.5 {
            MoodLevel::Okay
        } else if average >= 1.5 {
            MoodLevel::Bad
        } else {
            MoodLevel::VeryBad
        })
    }
}

impl TryFrom<i64> for MoodLevel {
    type Error = MoodlyError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MoodLevel::VeryBad),
            2 => Ok(MoodLevel::Bad),
            3 => Ok(MoodLevel::Okay),
            4 => Ok(MoodLevel::Good),
            5 => Ok(MoodLevel::VeryGood),
            other => Err(MoodlyError::InvalidMoodLevel(other)),
        }
    }
}

impl From<MoodLevel> for i64 {
    fn from(level: MoodLevel) -> Self {
        level.value() as i64
    }
}

/// One check-in.
///
/// The level is kept raw so that a bad write from the store can reach the
/// aggregator without failing deserialization; aggregations skip such records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub occurred_at: Option<DateTime<Utc>>,
    pub mood_level: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl MoodRecord {
    pub fn new(id: impl Into<String>, occurred_at: DateTime<Utc>, level: MoodLevel) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            occurred_at: Some(occurred_at),
            mood_level: level.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// `None` when the stored level is outside 1–5.
    pub fn level(&self) -> Option<MoodLevel> {
        MoodLevel::try_from(self.mood_level).ok()
    }

    /// UTC calendar day of the instant. Never taken from a stored date string.
    pub fn day(&self) -> Option<NaiveDate> {
        self.occurred_at.map(|at| at.date_naive())
    }

    /// Instant and level, if the record can take part in a computation at `now`.
    pub(crate) fn observe(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, MoodLevel)> {
        let Some(at) = self.occurred_at else {
            tracing::trace!(id = %self.id, "skipping record without instant");
            return None;
        };
        let Some(level) = self.level() else {
            tracing::trace!(id = %self.id, level = self.mood_level, "skipping record with out-of-range level");
            return None;
        };
        if at > now {
            tracing::trace!(id = %self.id, %at, "skipping future-dated record");
            return None;
        }
        Some((at, level))
    }
}
