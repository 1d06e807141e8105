//! JSON-lines request traces.
//!
//! One record per line; blank lines and lines starting with `#` are skipped.
//!
//! ```text
//! {"at_us": 0,  "op": "add",    "name": "/video/seg1", "payload": "...", "publisher": "alice"}
//! {"at_us": 5,  "op": "match",  "name": "/video/seg1", "publisher": "alice"}
//! {"at_us": 9,  "op": "match",  "hash": "3f2a..."}
//! {"at_us": 12, "op": "remove", "name": "/video/seg1", "payload": "...", "publisher": "alice"}
//! ```
//!
//! `add` and `remove` describe a content object: its name, payload and the
//! label of the publisher that signs it. `match` describes an interest: the
//! name, a keyid restriction (from `publisher` or an explicit `keyid`), and a
//! hash restriction (an explicit `hash`, or the hash of the object described
//! by `name`, `payload` and `publisher` when `payload` is given).

use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use ccnx_crypto::SigningKey;
use ccnx_store::{ContentObject, Interest, Message};
use ccnx_types::{HashValue, KeyId, Name};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceOp {
    Add,
    Match,
    Remove,
}

/// One line of a trace.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceRecord {
    pub at_us: u64,
    pub op: Option<TraceOp>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub keyid: Option<String>,
    #[serde(default)]
    pub hash: Option<String>,
}

impl TraceRecord {
    pub fn at(&self) -> Duration {
        Duration::from_micros(self.at_us)
    }

    pub fn op(&self) -> anyhow::Result<TraceOp> {
        self.op.context("record has no \"op\"")
    }

    fn name(&self) -> anyhow::Result<Option<Name>> {
        self.name
            .as_deref()
            .map(Name::parse)
            .transpose()
            .context("invalid \"name\"")
    }

    /// The content object an `add` or `remove` record describes.
    pub fn content_object(&self) -> anyhow::Result<ContentObject> {
        let name = self.name()?;
        let payload = self.payload.clone().unwrap_or_default().into_bytes();
        Ok(match &self.publisher {
            Some(label) => ContentObject::signed(name, payload, &SigningKey::from_label(label)),
            None => ContentObject::new(name, payload),
        })
    }

    /// The interest a `match` record describes.
    pub fn interest(&self) -> anyhow::Result<Interest> {
        let mut interest = Interest {
            name: self.name()?,
            ..Default::default()
        };
        if let Some(hex) = &self.keyid {
            interest.keyid_restriction = Some(KeyId::from_hex(hex).context("invalid \"keyid\"")?);
        } else if let Some(label) = &self.publisher {
            interest.keyid_restriction = Some(SigningKey::from_label(label).verifying_key().key_id());
        }
        if let Some(hex) = &self.hash {
            interest.hash_restriction = Some(HashValue::from_hex(hex).context("invalid \"hash\"")?);
        } else if self.payload.is_some() {
            interest.hash_restriction = Some(self.content_object()?.content_hash());
        }
        if interest.name.is_none() && interest.hash_restriction.is_none() {
            bail!("match record needs a \"name\" or a \"hash\"");
        }
        Ok(interest)
    }

    /// The operation and message this record submits.
    pub fn to_message(&self) -> anyhow::Result<(TraceOp, Message)> {
        let op = self.op()?;
        let message = match op {
            TraceOp::Add | TraceOp::Remove => self.content_object()?.into(),
            TraceOp::Match => self.interest()?.into(),
        };
        Ok((op, message))
    }
}

/// Parse a whole trace. Errors name the offending line.
pub fn parse_trace(text: &str) -> anyhow::Result<Vec<TraceRecord>> {
    let mut records = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let record: TraceRecord =
            serde_json::from_str(line).with_context(|| format!("trace line {}", i + 1))?;
        record
            .op()
            .with_context(|| format!("trace line {}", i + 1))?;
        records.push(record);
    }
    Ok(records)
}
