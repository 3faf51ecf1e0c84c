use thiserror::Error;

/// Failures surfaced by the record store gateway.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The supplied identifier could not be parsed. No backend call was made.
    #[error("{0}")]
    InvalidIdentifier(#[from] booking_core::ValidationError),

    /// No record exists with the given identifier.
    #[error("booking {0} not found")]
    RecordNotFound(String),

    /// The backend could not be reached or failed while reading.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The backend rejected a write.
    #[error("storage write failed: {0}")]
    StorageWriteError(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        match err.kind.as_ref() {
            mongodb::error::ErrorKind::Write(_) => Self::StorageWriteError(err.to_string()),
            _ => Self::StorageUnavailable(err.to_string()),
        }
    }
}
