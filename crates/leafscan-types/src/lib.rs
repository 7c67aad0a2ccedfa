//! Foundation types for Leafscan.
//!
//! This crate provides the identity and classification types shared by the
//! ledger, the record store, and the analysis pipeline. Every other Leafscan
//! crate depends on `leafscan-types`.
//!
//! # Key Types
//!
//! - [`DiseaseClass`]: The fixed set of leaf diseases the classifier can report
//! - [`Digest`]: 256-bit content fingerprint, rendered as lowercase hex
//! - [`RequesterId`]: Opaque identity of whoever asked for an analysis
//! - [`RecordId`]: UUID v7 identifier of an analysis record

pub mod digest;
pub mod disease;
pub mod error;
pub mod identity;

pub use digest::Digest;
pub use disease::{DiseaseClass, NO_DISEASE_INFO};
pub use error::TypeError;
pub use identity::{RecordId, RequesterId};
