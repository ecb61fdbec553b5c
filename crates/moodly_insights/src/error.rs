//! Error types for the insights service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InsightsError {
    /// The record source failed. Distinct from an empty result.
    #[error("Record source error: {0}")]
    Source(#[from] moodly_core::MoodlyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for insights operations.
pub type InsightsResult<T> = Result<T, InsightsError>;
