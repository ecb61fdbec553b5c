//! Translation between the backend's report rows and [`MoodRecord`].
//!
//! The backend stores the mood as a five-valued label and the tags under
//! `reasons`. Both directions of the label mapping are lossless.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MoodLevel, MoodRecord, MoodlyError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMood {
    VeryBad,
    Bad,
    Okay,
    Good,
    VeryGood,
}

impl BackendMood {
    pub fn as_str(self) -> &'static str {
        MoodLevel::from(self).key()
    }
}

impl std::str::FromStr for BackendMood {
    type Err = MoodlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_bad" => Ok(BackendMood::VeryBad),
            "bad" => Ok(BackendMood::Bad),
            "okay" => Ok(BackendMood::Okay),
            "good" => Ok(BackendMood::Good),
            "very_good" => Ok(BackendMood::VeryGood),
            other => Err(MoodlyError::UnknownMoodLabel(other.to_string())),
        }
    }
}

impl From<MoodLevel> for BackendMood {
    fn from(level: MoodLevel) -> Self {
        match level {
            MoodLevel::VeryBad => BackendMood::VeryBad,
            MoodLevel::Bad => BackendMood::Bad,
            MoodLevel::Okay => BackendMood::Okay,
            MoodLevel::Good => BackendMood::Good,
            MoodLevel::VeryGood => BackendMood::VeryGood,
        }
    }
}

impl From<BackendMood> for MoodLevel {
    fn from(mood: BackendMood) -> Self {
        match mood {
            BackendMood::VeryBad => MoodLevel::VeryBad,
            BackendMood::Bad => MoodLevel::Bad,
            BackendMood::Okay => MoodLevel::Okay,
            BackendMood::Good => MoodLevel::Good,
            BackendMood::VeryGood => MoodLevel::VeryGood,
        }
    }
}

/// Raw ordinal to backend label.
pub fn ordinal_to_external(level: i64) -> Result<BackendMood, MoodlyError> {
    MoodLevel::try_from(level).map(BackendMood::from)
}

/// Backend label to raw ordinal.
pub fn external_to_ordinal(label: &str) -> Result<i64, MoodlyError> {
    let mood: BackendMood = label.parse()?;
    Ok(MoodLevel::from(mood).into())
}

/// Parse a backend timestamp. Accepts RFC 3339 and the naive
/// `YYYY-MM-DD HH:MM:SS[.fff]` form, which is taken as UTC.
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ndt.and_utc());
        }
    }
    None
}

/// A report row as stored by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Calendar day written at submission time. Informational only.
    #[serde(default)]
    pub date: Option<String>,
    pub mood: String,
    #[serde(default)]
    pub reasons: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ReportRow {
    /// Convert to a record. The instant comes from `created_at` alone; a row
    /// without a usable `created_at` becomes a record with no instant, which
    /// every aggregation skips.
    pub fn into_record(self) -> Result<MoodRecord, MoodlyError> {
        let level = MoodLevel::from(self.mood.parse::<BackendMood>()?);
        let occurred_at = self.created_at.as_deref().and_then(parse_instant);
        if occurred_at.is_none() {
            tracing::debug!(id = %self.id, created_at = ?self.created_at, "report row has no usable created_at");
        }
        Ok(MoodRecord {
            id: self.id,
            user_id: self.user_id,
            occurred_at,
            mood_level: level.into(),
            tags: self.reasons,
        })
    }

    /// Inverse of [`ReportRow::into_record`] for well-formed records.
    pub fn from_record(record: &MoodRecord) -> Result<Self, MoodlyError> {
        let mood = ordinal_to_external(record.mood_level)?;
        Ok(Self {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            date: record.day().map(|d| d.format("%Y-%m-%d").to_string()),
            mood: mood.as_str().to_string(),
            reasons: record.tags.clone(),
            created_at: record.occurred_at.map(|at| at.to_rfc3339()),
            updated_at: None,
        })
    }
}
