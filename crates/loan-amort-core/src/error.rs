use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AmortError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Date overflow stepping one month past {date}")]
    DateOverflow { date: NaiveDate },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AmortError {
    fn from(e: serde_json::Error) -> Self {
        AmortError::SerializationError(e.to_string())
    }
}
