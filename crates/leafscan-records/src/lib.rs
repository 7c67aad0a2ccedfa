//! Analysis record store for Leafscan.
//!
//! Every successful diagnosis also produces an [`AnalysisRecord`], kept in an
//! append-only in-memory [`RecordStore`]. When a [`RecordMirror`] is attached,
//! each record is additionally submitted to it on a background task.
//!
//! # Design Rules
//!
//! 1. Records are immutable once appended; insertion order is preserved.
//! 2. Mirroring is best-effort: failures and timeouts are logged, never
//!    returned to the caller, and never block the append.
//! 3. The local store is authoritative; the mirror may lag or miss records.

pub mod error;
pub mod mirror;
pub mod record;
pub mod stats;
pub mod store;

pub use error::{MirrorError, RecordError, RecordResult};
pub use mirror::{JsonlMirror, RecordMirror};
pub use record::AnalysisRecord;
pub use stats::RecordStats;
pub use store::{RecordStore, DEFAULT_MIRROR_TIMEOUT};
