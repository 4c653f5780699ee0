use contracts::shared::period::PeriodError;
use thiserror::Error;

/// Failure of one store or ingestion call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// The read was never sent: its filters do not describe a valid range
    #[error("Invalid query: {0}")]
    Query(String),
}

impl From<PeriodError> for StoreError {
    fn from(err: PeriodError) -> Self {
        StoreError::Query(err.to_string())
    }
}

impl StoreError {
    pub fn decode(err: impl std::fmt::Display) -> Self {
        StoreError::Decode(err.to_string())
    }

    pub fn network(err: impl std::fmt::Display) -> Self {
        StoreError::Network(err.to_string())
    }
}
