use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info};

use leafscan_types::{Digest, DiseaseClass, RequesterId};

use crate::block::{
    hash_block, Block, Transaction, TransactionReceipt, GENESIS_PREVIOUS_HASH, GENESIS_PROOF,
};
use crate::error::LedgerError;
use crate::traits::{LedgerReader, LedgerWriter};

/// In-memory ledger for the serving process, tests, and embedding.
///
/// All mutation goes through one `RwLock`, so block indices and transaction
/// order stay well-defined when requests are handled concurrently. The chain
/// always holds at least the genesis block.
pub struct InMemoryLedger {
    capacity: Option<usize>,
    inner: RwLock<Vec<Block>>,
}

impl InMemoryLedger {
    /// A ledger holding only the genesis block. The tail never seals itself.
    pub fn new() -> Self {
        Self {
            capacity: None,
            inner: RwLock::new(vec![Block::new(1, GENESIS_PROOF, GENESIS_PREVIOUS_HASH)]),
        }
    }

    /// A ledger whose tail is sealed automatically once it holds
    /// `max_transactions` transactions. Zero is treated as one.
    pub fn with_capacity_limit(max_transactions: usize) -> Self {
        Self {
            capacity: Some(max_transactions.max(1)),
            ..Self::new()
        }
    }

    pub fn capacity_limit(&self) -> Option<usize> {
        self.capacity
    }

    fn read_state(&self) -> Result<RwLockReadGuard<'_, Vec<Block>>, LedgerError> {
        self.inner.read().map_err(|_| LedgerError::LockPoisoned)
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, Vec<Block>>, LedgerError> {
        self.inner.write().map_err(|_| LedgerError::LockPoisoned)
    }

    fn tail(chain: &[Block]) -> Result<&Block, LedgerError> {
        chain.last().ok_or(LedgerError::MissingGenesis)
    }

    fn append_block(chain: &mut Vec<Block>, proof: u64, previous_hash: &str) -> Block {
        let block = Block::new(chain.len() as u64 + 1, proof, previous_hash);
        chain.push(block.clone());
        block
    }

    fn seal_tail(chain: &mut Vec<Block>) -> Result<Block, LedgerError> {
        let tail = Self::tail(chain)?;
        let previous_hash = hash_block(tail)?.to_hex();
        let proof = tail.proof.saturating_add(1);
        let sealed_index = tail.index;
        let sealed_transactions = tail.transaction_count();

        let block = Self::append_block(chain, proof, &previous_hash);
        info!(
            sealed = sealed_index,
            transactions = sealed_transactions,
            next = block.index,
            "sealed ledger block"
        );
        Ok(block)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl LedgerWriter for InMemoryLedger {
    fn create_block(&self, proof: u64, previous_hash: &str) -> Result<Block, LedgerError> {
        let mut chain = self.write_state()?;

        let expected = hash_block(Self::tail(&chain)?)?.to_hex();
        if previous_hash != expected {
            return Err(LedgerError::BrokenLink {
                index: chain.len() as u64 + 1,
                expected,
                found: previous_hash.to_string(),
            });
        }

        let block = Self::append_block(&mut chain, proof, previous_hash);
        debug!(index = block.index, proof, "created ledger block");
        Ok(block)
    }

    fn seal_block(&self) -> Result<Block, LedgerError> {
        let mut chain = self.write_state()?;
        Self::seal_tail(&mut chain)
    }

    fn add_transaction(
        &self,
        requester_id: &RequesterId,
        image_digest: Digest,
        prediction_label: DiseaseClass,
    ) -> Result<TransactionReceipt, LedgerError> {
        let mut chain = self.write_state()?;

        if let Some(limit) = self.capacity {
            if Self::tail(&chain)?.transaction_count() >= limit {
                Self::seal_tail(&mut chain)?;
            }
        }

        let transaction = Transaction {
            requester_id: requester_id.clone(),
            image_digest,
            prediction_label,
            timestamp: Utc::now(),
        };

        let tail = chain.last_mut().ok_or(LedgerError::MissingGenesis)?;
        tail.transactions.push(transaction.clone());

        let receipt = TransactionReceipt {
            block_index: tail.index,
            position: tail.transactions.len() - 1,
            transaction,
        };
        debug!(
            block = receipt.block_index,
            position = receipt.position,
            label = %prediction_label,
            image = %image_digest.short_hex(),
            "recorded ledger transaction"
        );
        Ok(receipt)
    }
}

impl LedgerReader for InMemoryLedger {
    fn current_block(&self) -> Result<Block, LedgerError> {
        let chain = self.read_state()?;
        Self::tail(&chain).cloned()
    }

    fn chain(&self) -> Result<Vec<Block>, LedgerError> {
        Ok(self.read_state()?.clone())
    }

    fn block(&self, index: u64) -> Result<Option<Block>, LedgerError> {
        let chain = self.read_state()?;
        let Some(position) = index.checked_sub(1) else {
            return Ok(None);
        };
        Ok(chain.get(position as usize).cloned())
    }

    fn block_count(&self) -> Result<u64, LedgerError> {
        Ok(self.read_state()?.len() as u64)
    }

    fn transaction_count(&self) -> Result<u64, LedgerError> {
        let chain = self.read_state()?;
        Ok(chain.iter().map(|b| b.transactions.len() as u64).sum())
    }
}
