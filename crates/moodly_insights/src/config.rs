use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use moodly_core::MoodlyError;

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
/// Largest accepted `MOODLY_WINDOW_DAYS`, roughly a century.
pub const MAX_WINDOW_DAYS: u32 = 36_500;
pub const DEFAULT_TOP_INFLUENCES: usize = 3;
pub const DEFAULT_FETCH_RETRIES: u32 = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Team,
    Personal,
}

impl FromStr for View {
    type Err = MoodlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "team" => Ok(View::Team),
            "personal" => Ok(View::Personal),
            other => Err(MoodlyError::Config(format!(
                "MOODLY_VIEW must be 'team' or 'personal', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub records_path: PathBuf,
    pub view: View,
    pub user_id: Option<String>,
    pub window_days: u32,
    pub top_influences: usize,
    /// Fixed "now" for reproducible reports. `None` uses the system clock.
    pub now: Option<DateTime<Utc>>,
    pub fetch_retries: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, MoodlyError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads configuration through `get` so tests never touch the process
    /// environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, MoodlyError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let records_path = get("MOODLY_RECORDS_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| MoodlyError::Config("MOODLY_RECORDS_PATH missing".into()))?;
        let view = match get("MOODLY_VIEW") {
            Some(v) => v.parse()?,
            None => View::Team,
        };
        let user_id = get("MOODLY_USER_ID").filter(|u| !u.trim().is_empty());
        if view == View::Personal && user_id.is_none() {
            return Err(MoodlyError::Config(
                "MOODLY_USER_ID is required for the personal view".into(),
            ));
        }
        let window_days = parse_number(&mut get, "MOODLY_WINDOW_DAYS", DEFAULT_WINDOW_DAYS)?;
        if !(1..=MAX_WINDOW_DAYS).contains(&window_days) {
            return Err(MoodlyError::Config(format!(
                "MOODLY_WINDOW_DAYS must be between 1 and {MAX_WINDOW_DAYS}, got {window_days}"
            )));
        }
        let top_influences =
            parse_number(&mut get, "MOODLY_TOP_INFLUENCES", DEFAULT_TOP_INFLUENCES)?;
        let fetch_retries = parse_number(&mut get, "MOODLY_FETCH_RETRIES", DEFAULT_FETCH_RETRIES)?;
        let now = get("MOODLY_NOW")
            .map(|raw| {
                DateTime::parse_from_rfc3339(raw.trim())
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| MoodlyError::Config(format!("MOODLY_NOW '{raw}': {e}")))
            })
            .transpose()?;

        Ok(Self {
            records_path,
            view,
            user_id,
            window_days,
            top_influences,
            now,
            fetch_retries,
        })
    }
}

fn parse_number<F, T>(get: &mut F, key: &str, default: T) -> Result<T, MoodlyError>
where
    F: FnMut(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| MoodlyError::Config(format!("{key} '{raw}': {e}"))),
        None => Ok(default),
    }
}
