use ccnx_types::HashValue;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g., `"ccnx-content-object-v1"`) that
/// is prepended to every hash computation, so identical bytes hashed for
/// different purposes never collide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for content object digests.
    pub const CONTENT_OBJECT: Self = Self {
        domain: "ccnx-content-object-v1",
    };
    /// Hasher for the portion of a content object covered by its signature.
    pub const SIGNED_PORTION: Self = Self {
        domain: "ccnx-signed-portion-v1",
    };

    /// Hash a sequence of fields with domain separation.
    ///
    /// Every part is length-prefixed, so moving bytes from one part into its
    /// neighbour changes the digest.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> HashValue {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(&(part.len() as u64).to_be_bytes());
            hasher.update(part);
        }
        HashValue::from_digest(*hasher.finalize().as_bytes())
    }
}
