//! Hashing primitives for Leafscan.
//!
//! Provides the plain BLAKE3 [`digest`] used to fingerprint uploaded images,
//! a domain-separated [`ContentHasher`] used for block identity, and the
//! key-sorted [`canonical_json`] encoding that makes block hashes independent
//! of field order.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod canonical;
pub mod hasher;

pub use canonical::canonical_json;
pub use hasher::{digest, ContentHasher, HasherError};
