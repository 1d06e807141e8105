//! Cryptographic primitives for the CCNx content store.
//!
//! Provides domain-separated BLAKE3 hashing for content objects and Ed25519
//! publisher keys whose public half yields the object's [`KeyId`].
//!
//! All crypto operations wrap established libraries.
//!
//! [`KeyId`]: ccnx_types::KeyId

pub mod hasher;
pub mod signer;

pub use hasher::ContentHasher;
pub use signer::{Signature, SignatureError, SigningKey, VerifyingKey};
