//! Append-only prediction ledger for Leafscan.
//!
//! Every successful diagnosis is recorded as a [`Transaction`] in the tail
//! [`Block`] of a single chain. This crate provides:
//! - Block and transaction types with canonical, order-independent hashing
//! - `LedgerWriter` / `LedgerReader` trait boundaries
//! - `InMemoryLedger`, a lock-guarded single-writer implementation
//!
//! Blocks after genesis are hash-linked: a new block is only accepted when its
//! `previous_hash` equals [`hash_block`] of the block it follows. There is no
//! proof-of-work and no fork choice; the process is the only writer.

pub mod block;
pub mod error;
pub mod memory;
pub mod traits;

pub use block::{
    hash_block, Block, Transaction, TransactionReceipt, GENESIS_PREVIOUS_HASH, GENESIS_PROOF,
};
pub use error::LedgerError;
pub use memory::InMemoryLedger;
pub use traits::{LedgerReader, LedgerWriter};
