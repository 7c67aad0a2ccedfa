use thiserror::Error;

/// Errors from the in-memory record store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("record store lock poisoned")]
    LockPoisoned,
}

pub type RecordResult<T> = Result<T, RecordError>;

/// Errors reported by a [`crate::RecordMirror`]. Only ever logged.
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("mirror unavailable: {0}")]
    Unavailable(String),
}
