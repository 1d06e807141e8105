//! Messages a forwarder hands to the content store.
//!
//! These are decoded, in-memory messages; the store never sees wire bytes.

use std::fmt;

use ccnx_crypto::{ContentHasher, Signature, SignatureError, SigningKey, VerifyingKey};
use ccnx_types::{HashValue, KeyId, Name};

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

/// A request for content.
///
/// An interest needs a name or a hash restriction to be usable. The keyid
/// restriction only narrows a named interest.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Interest {
    pub name: Option<Name>,
    pub keyid_restriction: Option<KeyId>,
    pub hash_restriction: Option<HashValue>,
}

impl Interest {
    /// An interest for `name` with no restrictions.
    pub fn for_name(name: Name) -> Self {
        Self {
            name: Some(name),
            ..Default::default()
        }
    }

    /// A nameless interest that only a specific content hash satisfies.
    pub fn for_hash(hash: HashValue) -> Self {
        Self {
            hash_restriction: Some(hash),
            ..Default::default()
        }
    }

    /// Restrict the interest to objects published under `keyid`.
    pub fn with_keyid(mut self, keyid: KeyId) -> Self {
        self.keyid_restriction = Some(keyid);
        self
    }

    /// Restrict the interest to the object with content hash `hash`.
    pub fn with_hash(mut self, hash: HashValue) -> Self {
        self.hash_restriction = Some(hash);
        self
    }
}

// ---------------------------------------------------------------------------
// ContentObject
// ---------------------------------------------------------------------------

/// Publisher signature over a content object's name and payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub public_key: [u8; 32],
    pub signature: Signature,
}

impl Validation {
    /// Verify the signature over `signed_portion` and return the signer's
    /// [`KeyId`].
    pub fn verify(&self, signed_portion: &[u8]) -> Result<KeyId, SignatureError> {
        let key = VerifyingKey::from_bytes(self.public_key)?;
        key.verify(signed_portion, &self.signature)?;
        Ok(key.key_id())
    }
}

/// A piece of named (or nameless), optionally signed content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentObject {
    pub name: Option<Name>,
    pub payload: Vec<u8>,
    pub validation: Option<Validation>,
}

impl ContentObject {
    /// An unsigned content object.
    pub fn new(name: Option<Name>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            name,
            payload: payload.into(),
            validation: None,
        }
    }

    /// An unsigned, named content object.
    pub fn named(name: Name, payload: impl Into<Vec<u8>>) -> Self {
        Self::new(Some(name), payload)
    }

    /// A content object signed by `key`.
    pub fn signed(name: Option<Name>, payload: impl Into<Vec<u8>>, key: &SigningKey) -> Self {
        let mut object = Self::new(name, payload);
        let signature = key.sign(&object.signed_portion());
        object.validation = Some(Validation {
            public_key: key.verifying_key().as_bytes(),
            signature,
        });
        object
    }

    /// Digest of the bytes a publisher signs: name and payload.
    pub fn signed_portion(&self) -> [u8; 32] {
        let name = encode_name(self.name.as_ref());
        *ContentHasher::SIGNED_PORTION
            .hash_parts(&[&name, &self.payload])
            .as_bytes()
    }

    /// The content object hash: name, payload and validation block.
    pub fn content_hash(&self) -> HashValue {
        let name = encode_name(self.name.as_ref());
        let validation = match &self.validation {
            Some(v) => {
                let mut bytes = v.public_key.to_vec();
                bytes.extend_from_slice(&v.signature.to_bytes());
                bytes
            }
            None => Vec::new(),
        };
        ContentHasher::CONTENT_OBJECT.hash_parts(&[&name, &self.payload, &validation])
    }

    /// The publisher's [`KeyId`], if the object carries a signature that
    /// verifies. Unsigned or badly signed objects have none.
    pub fn key_id(&self) -> Option<KeyId> {
        self.validation
            .as_ref()
            .and_then(|v| v.verify(&self.signed_portion()).ok())
    }
}

/// Unambiguous byte form of an optional name, used as digest input.
fn encode_name(name: Option<&Name>) -> Vec<u8> {
    let Some(name) = name else {
        return vec![0];
    };
    let mut bytes = Vec::with_capacity(1 + name.encoded_len());
    bytes.push(1);
    for segment in name.segments() {
        bytes.extend_from_slice(&segment.segment_type.code().to_be_bytes());
        bytes.extend_from_slice(&(segment.value.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&segment.value);
    }
    bytes
}

// ---------------------------------------------------------------------------
// InterestReturn
// ---------------------------------------------------------------------------

/// Why an interest was sent back towards its requester.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReturnCode {
    NoRoute,
    HopLimitExceeded,
    NoResources,
    PathError,
    Prohibited,
    Congested,
    MtuTooLarge,
}

/// An interest returned by an upstream node. Never valid for the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterestReturn {
    pub interest: Interest,
    pub code: ReturnCode,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Any message a forwarder may hand to the content store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Message {
    Interest(Interest),
    ContentObject(ContentObject),
    InterestReturn(InterestReturn),
}

/// The type of a [`Message`], for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Interest,
    ContentObject,
    InterestReturn,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interest => write!(f, "interest"),
            Self::ContentObject => write!(f, "content object"),
            Self::InterestReturn => write!(f, "interest return"),
        }
    }
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::Interest(_) => MessageKind::Interest,
            Self::ContentObject(_) => MessageKind::ContentObject,
            Self::InterestReturn(_) => MessageKind::InterestReturn,
        }
    }

    /// The name the message carries, if any.
    pub fn name(&self) -> Option<&Name> {
        match self {
            Self::Interest(i) => i.name.as_ref(),
            Self::ContentObject(c) => c.name.as_ref(),
            Self::InterestReturn(r) => r.interest.name.as_ref(),
        }
    }
}

impl From<Interest> for Message {
    fn from(interest: Interest) -> Self {
        Self::Interest(interest)
    }
}

impl From<ContentObject> for Message {
    fn from(object: ContentObject) -> Self {
        Self::ContentObject(object)
    }
}

impl From<InterestReturn> for Message {
    fn from(ret: InterestReturn) -> Self {
        Self::InterestReturn(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    #[test]
    fn content_hash_is_deterministic() {
        let a = ContentObject::named(name("/a"), b"payload".to_vec());
        let b = ContentObject::named(name("/a"), b"payload".to_vec());
        assert_eq!(a.content_hash(), b.content_hash());
    }

    #[test]
    fn content_hash_covers_name_and_payload() {
        let base = ContentObject::named(name("/a"), b"x".to_vec());
        assert_ne!(
            base.content_hash(),
            ContentObject::named(name("/b"), b"x".to_vec()).content_hash()
        );
        assert_ne!(
            base.content_hash(),
            ContentObject::named(name("/a"), b"y".to_vec()).content_hash()
        );
    }

    #[test]
    fn nameless_differs_from_root_name() {
        let nameless = ContentObject::new(None, b"x".to_vec());
        let root = ContentObject::named(Name::root(), b"x".to_vec());
        assert_ne!(nameless.content_hash(), root.content_hash());
    }

    #[test]
    fn unsigned_object_has_no_key_id() {
        assert!(ContentObject::named(name("/a"), b"x".to_vec())
            .key_id()
            .is_none());
    }

    #[test]
    fn signed_object_yields_publisher_key_id() {
        let key = SigningKey::from_label("alice");
        let object = ContentObject::signed(Some(name("/a")), b"x".to_vec(), &key);
        assert_eq!(object.key_id(), Some(key.verifying_key().key_id()));
    }

    #[test]
    fn tampered_object_has_no_key_id() {
        let key = SigningKey::from_label("alice");
        let mut object = ContentObject::signed(Some(name("/a")), b"x".to_vec(), &key);
        object.payload = b"forged".to_vec();
        assert!(object.key_id().is_none());
    }

    #[test]
    fn signature_changes_content_hash() {
        let key = SigningKey::from_label("alice");
        let unsigned = ContentObject::named(name("/a"), b"x".to_vec());
        let signed = ContentObject::signed(Some(name("/a")), b"x".to_vec(), &key);
        assert_ne!(unsigned.content_hash(), signed.content_hash());
    }

    #[test]
    fn message_kind_and_name() {
        let interest: Message = Interest::for_name(name("/a")).into();
        assert_eq!(interest.kind(), MessageKind::Interest);
        assert_eq!(interest.name(), Some(&name("/a")));

        let ret: Message = InterestReturn {
            interest: Interest::for_name(name("/r")),
            code: ReturnCode::NoRoute,
        }
        .into();
        assert_eq!(ret.kind(), MessageKind::InterestReturn);
        assert_eq!(ret.name(), Some(&name("/r")));
        assert_eq!(MessageKind::ContentObject.to_string(), "content object");
    }
}
