use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use leafscan_crypto::ContentHasher;
use leafscan_types::{Digest, DiseaseClass, RequesterId};

use crate::error::LedgerError;

/// `previous_hash` sentinel carried by the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "0";

/// Proof marker of the genesis block.
pub const GENESIS_PROOF: u64 = 1;

/// One recorded prediction event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub requester_id: RequesterId,
    pub image_digest: Digest,
    pub prediction_label: DiseaseClass,
    /// When the transaction was appended; independent of the block timestamp.
    pub timestamp: DateTime<Utc>,
}

/// An ordered group of transactions with its chain position.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// 1-based position in the chain.
    pub index: u64,
    /// Assigned once when the block is created.
    pub timestamp: DateTime<Utc>,
    /// Opaque marker supplied by the caller; no proof-of-work is computed.
    pub proof: u64,
    /// Hex `hash_block` of the preceding block, or `"0"` for genesis.
    pub previous_hash: String,
    /// Append-only, in order of occurrence.
    pub transactions: Vec<Transaction>,
}

impl Block {
    pub(crate) fn new(index: u64, proof: u64, previous_hash: impl Into<String>) -> Self {
        Self {
            index,
            timestamp: Utc::now(),
            proof,
            previous_hash: previous_hash.into(),
            transactions: Vec::new(),
        }
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    /// Shorthand for [`hash_block`].
    pub fn hash(&self) -> Result<Digest, LedgerError> {
        hash_block(self)
    }
}

/// Where a transaction landed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionReceipt {
    /// Index of the block that received the transaction.
    pub block_index: u64,
    /// 0-based position within that block.
    pub position: usize,
    pub transaction: Transaction,
}

/// Deterministic identity of a block.
///
/// Domain-separated BLAKE3 over the key-sorted JSON encoding of every field,
/// transactions included. Pure and reproducible across processes.
pub fn hash_block(block: &Block) -> Result<Digest, LedgerError> {
    Ok(ContentHasher::BLOCK.hash_canonical(block)?)
}
