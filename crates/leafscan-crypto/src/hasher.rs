use leafscan_types::Digest;

use crate::canonical::canonical_json;

/// Plain BLAKE3 fingerprint of arbitrary bytes.
///
/// No domain tag is mixed in, so `b3sum` over the same file yields the same
/// hex string. Used for image fingerprinting.
pub fn digest(data: &[u8]) -> Digest {
    Digest::of(data)
}

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"leafscan-block-v1"`) that is
/// prepended to every hash computation, so a block and an image with
/// identical bytes never share an identity.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for ledger blocks.
    pub const BLOCK: Self = Self {
        domain: "leafscan-block-v1",
    };

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        Digest::from_hash(*hasher.finalize().as_bytes())
    }

    /// Hash a serializable value's canonical (key-sorted) JSON form.
    pub fn hash_canonical<T: serde::Serialize>(&self, value: &T) -> Result<Digest, HasherError> {
        let data = canonical_json(value)?;
        Ok(self.hash(&data))
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("serialization error: {0}")]
    Serialization(String),
}
