//! Resolving interests against the indices.
//!
//! An interest is looked up through its strongest restriction only: the hash
//! restriction if present, else name and keyid, else the bare name. The entry
//! found must then satisfy every restriction the interest carries.

use ccnx_types::{HashValue, Name};

use crate::entry::{EntryArena, EntryId, EntryKeys, NameKeyid};
use crate::error::{StoreError, StoreResult};
use crate::index::Indices;
use crate::message::{Interest, Message};

/// The key an interest is resolved by.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Restriction {
    Hash(HashValue),
    NameKeyid(NameKeyid),
    Name(Name),
}

impl Restriction {
    /// The strongest restriction `interest` carries.
    ///
    /// A keyid restriction without a name cannot be resolved on its own;
    /// such an interest is only usable if it also has a hash restriction.
    pub fn strongest(interest: &Interest) -> StoreResult<Self> {
        if let Some(hash) = interest.hash_restriction {
            return Ok(Self::Hash(hash));
        }
        match (&interest.name, interest.keyid_restriction) {
            (Some(name), Some(keyid)) => Ok(Self::NameKeyid(NameKeyid {
                name: name.clone(),
                keyid,
            })),
            (Some(name), None) => Ok(Self::Name(name.clone())),
            (None, _) => Err(StoreError::NoRestriction),
        }
    }

    /// Exact lookup in the index this restriction selects.
    pub fn lookup(&self, indices: &Indices) -> Option<EntryId> {
        match self {
            Self::Hash(hash) => indices.by_hash.get(hash),
            Self::NameKeyid(key) => indices.by_name_keyid.get(key),
            Self::Name(name) => indices.by_name.get(name),
        }
    }
}

/// Whether an entry with `keys` satisfies every restriction of `interest`.
///
/// A restriction on a key the entry lacks never matches.
pub fn satisfies(interest: &Interest, keys: &EntryKeys) -> bool {
    let name_ok = match &interest.name {
        Some(name) => keys.name.as_ref() == Some(name),
        None => true,
    };
    let keyid_ok = match &interest.keyid_restriction {
        Some(keyid) => keys.keyid.as_ref() == Some(keyid),
        None => true,
    };
    let hash_ok = match &interest.hash_restriction {
        Some(hash) => keys.hash == *hash,
        None => true,
    };
    name_ok && keyid_ok && hash_ok
}

/// Find the resident entry `message` asks for.
///
/// An interest resolves by its strongest restriction; a content object by
/// its own hash. Anything else is rejected.
pub(crate) fn resolve(
    message: &Message,
    indices: &Indices,
    entries: &EntryArena,
) -> StoreResult<Option<EntryId>> {
    match message {
        Message::Interest(interest) => {
            let restriction = Restriction::strongest(interest)?;
            let found = restriction
                .lookup(indices)
                .filter(|id| entries.get(*id).is_some_and(|e| satisfies(interest, e.keys())));
            Ok(found)
        }
        Message::ContentObject(object) => Ok(indices.by_hash.get(&object.content_hash())),
        other => Err(StoreError::InvalidMessage {
            operation: "match interest",
            found: other.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ccnx_types::KeyId;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    #[test]
    fn hash_restriction_wins() {
        let hash = HashValue::from_digest([1; 32]);
        let interest = Interest::for_name(name("/a"))
            .with_keyid(KeyId::from_raw([2; 32]))
            .with_hash(hash);
        assert_eq!(Restriction::strongest(&interest), Ok(Restriction::Hash(hash)));
    }

    #[test]
    fn name_keyid_beats_name() {
        let keyid = KeyId::from_raw([2; 32]);
        let interest = Interest::for_name(name("/a")).with_keyid(keyid);
        assert_eq!(
            Restriction::strongest(&interest),
            Ok(Restriction::NameKeyid(NameKeyid {
                name: name("/a"),
                keyid
            }))
        );
    }

    #[test]
    fn bare_name() {
        assert_eq!(
            Restriction::strongest(&Interest::for_name(name("/a"))),
            Ok(Restriction::Name(name("/a")))
        );
    }

    #[test]
    fn nameless_interest_needs_hash() {
        assert_eq!(
            Restriction::strongest(&Interest::default()),
            Err(StoreError::NoRestriction)
        );
        let keyid_only = Interest {
            keyid_restriction: Some(KeyId::from_raw([3; 32])),
            ..Default::default()
        };
        assert_eq!(Restriction::strongest(&keyid_only), Err(StoreError::NoRestriction));
    }

    #[test]
    fn satisfies_checks_every_restriction() {
        let keyid = KeyId::from_raw([5; 32]);
        let keys = EntryKeys {
            hash: HashValue::from_digest([7; 32]),
            name: Some(name("/a")),
            keyid: Some(keyid),
        };
        assert!(satisfies(&Interest::for_name(name("/a")), &keys));
        assert!(satisfies(&Interest::for_name(name("/a")).with_keyid(keyid), &keys));
        assert!(!satisfies(&Interest::for_name(name("/b")), &keys));
        assert!(!satisfies(
            &Interest::for_name(name("/a")).with_keyid(KeyId::from_raw([6; 32])),
            &keys
        ));
        assert!(!satisfies(
            &Interest::for_name(name("/a")).with_hash(HashValue::from_digest([8; 32])),
            &keys
        ));
    }

    #[test]
    fn missing_entry_key_never_matches_a_restriction() {
        let keys = EntryKeys {
            hash: HashValue::from_digest([7; 32]),
            name: None,
            keyid: None,
        };
        assert!(!satisfies(&Interest::for_name(Name::root()), &keys));
        assert!(satisfies(&Interest::for_hash(keys.hash), &keys));
        assert!(!satisfies(
            &Interest::for_hash(keys.hash).with_keyid(KeyId::from_raw([0; 32])),
            &keys
        ));
    }
}
