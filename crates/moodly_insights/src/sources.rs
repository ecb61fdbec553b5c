//! Concrete record sources: a fixed in-memory snapshot and a JSON export of
//! backend report rows.

use std::path::PathBuf;

use async_trait::async_trait;
use moodly_core::{DateRange, MoodRecord, MoodlyError, RecordSource, ReportRow};
use tracing::warn;

fn for_user(records: impl IntoIterator<Item = MoodRecord>, user_id: &str) -> Vec<MoodRecord> {
    records
        .into_iter()
        .filter(|r| r.user_id.as_deref() == Some(user_id))
        .collect()
}

fn in_range(records: impl IntoIterator<Item = MoodRecord>, range: Option<DateRange>) -> Vec<MoodRecord> {
    let range = range.unwrap_or_default();
    records.into_iter().filter(|r| range.contains(r)).collect()
}

#[derive(Clone, Debug, Default)]
pub struct InMemorySource {
    records: Vec<MoodRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<MoodRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_my_records(&self, user_id: &str) -> Result<Vec<MoodRecord>, MoodlyError> {
        Ok(for_user(self.records.iter().cloned(), user_id))
    }

    async fn fetch_team_records(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<MoodRecord>, MoodlyError> {
        Ok(in_range(self.records.iter().cloned(), range))
    }
}

/// Reads a JSON array of [`ReportRow`]s on every fetch.
///
/// An unreadable file is a `Fetch` error and malformed JSON a `Decode` error.
/// Rows whose mood label is unknown are dropped with a warning.
#[derive(Clone, Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<Vec<MoodRecord>, MoodlyError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| MoodlyError::Fetch(format!("{}: {e}", self.path.display())))?;
        let rows: Vec<ReportRow> = serde_json::from_slice(&bytes)?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let id = row.id.clone();
            match row.into_record() {
                Ok(record) => records.push(record),
                Err(e) => warn!(%id, error = %e, "dropping report row"),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_my_records(&self, user_id: &str) -> Result<Vec<MoodRecord>, MoodlyError> {
        Ok(for_user(self.load().await?, user_id))
    }

    async fn fetch_team_records(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<MoodRecord>, MoodlyError> {
        Ok(in_range(self.load().await?, range))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};
    use moodly_core::MoodLevel;
    use std::io::Write;

    fn sample() -> Vec<MoodRecord> {
        vec![
            MoodRecord::new("a", Utc.with_ymd_and_hms(2026, 2, 1, 9, 0, 0).unwrap(), MoodLevel::Good)
                .with_user("u1"),
            MoodRecord::new("b", Utc.with_ymd_and_hms(2026, 2, 5, 9, 0, 0).unwrap(), MoodLevel::Bad)
                .with_user("u2"),
        ]
    }

    #[tokio::test]
    async fn in_memory_filters_by_user_and_range() {
        let src = InMemorySource::new(sample());
        let mine = src.fetch_my_records("u1").await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "a");

        let range = DateRange::new(NaiveDate::from_ymd_opt(2026, 2, 3), None);
        let team = src.fetch_team_records(Some(range)).await.unwrap();
        assert_eq!(team.len(), 1);
        assert_eq!(team[0].id, "b");
        assert_eq!(src.fetch_team_records(None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn json_file_skips_unknown_labels() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let rows = serde_json::json!([
            {"id": "r1", "user_id": "u1", "mood": "good", "reasons": ["Focus"], "created_at": "2026-02-01T09:00:00Z"},
            {"id": "r2", "user_id": "u1", "mood": "ecstatic", "reasons": [], "created_at": "2026-02-02T09:00:00Z"}
        ]);
        write!(file, "{rows}").unwrap();

        let src = JsonFileSource::new(file.path());
        let records = src.fetch_team_records(None).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level(), Some(MoodLevel::Good));
    }

    #[tokio::test]
    async fn json_file_errors_are_distinct() {
        let missing = JsonFileSource::new("/nonexistent/moodly/reports.json");
        assert!(matches!(
            missing.fetch_team_records(None).await,
            Err(MoodlyError::Fetch(_))
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let garbled = JsonFileSource::new(file.path());
        assert!(matches!(
            garbled.fetch_team_records(None).await,
            Err(MoodlyError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn json_file_empty_array_is_ok_and_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        let src = JsonFileSource::new(file.path());
        assert!(src.fetch_my_records("u1").await.unwrap().is_empty());
    }
}
