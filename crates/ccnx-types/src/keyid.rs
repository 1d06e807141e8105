use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Identifier of the key that published a content object.
///
/// A `KeyId` is derived deterministically from a publisher's public key
/// using domain-separated BLAKE3. The same key always produces the same
/// identifier. Interests carry it as a keyid restriction to pick one
/// publisher's object among several sharing a name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId {
    hash: [u8; 32],
}

impl KeyId {
    /// Derive a `KeyId` from a 32-byte Ed25519 public key.
    pub fn derive(public_key: &[u8; 32]) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"ccnx-keyid-v1:");
        hasher.update(public_key);
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Create from a raw 32-byte identifier. Use `derive()` for real keys.
    pub const fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }

    /// The raw 32-byte identifier.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("key:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters), optionally `key:`-prefixed.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("key:").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self { hash: arr })
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeyId({})", self.short_id())
    }
}

impl fmt::Display for KeyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
