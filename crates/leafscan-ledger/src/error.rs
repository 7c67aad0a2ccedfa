use leafscan_crypto::HasherError;

/// Errors produced by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("broken link at block {index}: previous_hash must be {expected}, got {found}")]
    BrokenLink {
        index: u64,
        expected: String,
        found: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("ledger has no genesis block")]
    MissingGenesis,

    #[error("ledger lock poisoned")]
    LockPoisoned,
}

impl From<HasherError> for LedgerError {
    fn from(e: HasherError) -> Self {
        match e {
            HasherError::Serialization(msg) => Self::Serialization(msg),
        }
    }
}
