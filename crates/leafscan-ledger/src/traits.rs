use leafscan_types::{Digest, DiseaseClass, RequesterId};

use crate::block::{Block, TransactionReceipt};
use crate::error::LedgerError;

/// Write boundary for ledger append operations.
pub trait LedgerWriter: Send + Sync {
    /// Append a new, empty block after the current tail.
    ///
    /// `previous_hash` must equal `hash_block` of the current tail.
    fn create_block(&self, proof: u64, previous_hash: &str) -> Result<Block, LedgerError>;

    /// Close the current tail by appending a block linked to it.
    fn seal_block(&self) -> Result<Block, LedgerError>;

    /// Record a prediction in the current tail block.
    fn add_transaction(
        &self,
        requester_id: &RequesterId,
        image_digest: Digest,
        prediction_label: DiseaseClass,
    ) -> Result<TransactionReceipt, LedgerError>;
}

/// Read boundary for ledger traversal.
pub trait LedgerReader: Send + Sync {
    /// The tail block, the only one accepting transactions.
    fn current_block(&self) -> Result<Block, LedgerError>;

    /// Snapshot of the whole chain, genesis first.
    fn chain(&self) -> Result<Vec<Block>, LedgerError>;

    /// Block by its 1-based index.
    fn block(&self, index: u64) -> Result<Option<Block>, LedgerError>;

    fn block_count(&self) -> Result<u64, LedgerError>;

    /// Transactions across all blocks.
    fn transaction_count(&self) -> Result<u64, LedgerError>;
}
