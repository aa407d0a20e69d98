use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("Ledger actor error: {0}")]
    ActorError(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("Invalid date {0:?}; expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown entry kind {0:?}; expected income or expense")]
    UnknownKind(String),

    #[error("{0}")]
    Usage(String),

    #[error("Notification delivery failed: {0}")]
    Notification(String),
}

impl LedgerError {
    /// True for input rejected at the boundary, before it reaches storage.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidAmount(_)
                | LedgerError::BlankField(_)
                | LedgerError::InvalidDate(_)
                | LedgerError::UnknownKind(_)
                | LedgerError::Usage(_)
        )
    }
}
