//! Hierarchical CCNx names.
//!
//! A name is an ordered list of typed segments, written as a URI:
//!
//! - `ccnx:/` is the root name (no segments)
//! - `ccnx:/parc/videos/intro` has three generic segments
//! - `ccnx:/parc/videos/Chunk=3` ends with a typed segment
//! - `ccnx:/parc/0x00ff` carries a binary value
//!
//! Names order segment by segment. Within a segment the type decides first,
//! then the value bytes. A proper prefix orders before every name it prefixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

const SCHEME: &str = "ccnx:";

/// Size of the type and length fields in front of every encoded segment.
const SEGMENT_HEADER_LEN: usize = 4;

/// The type tag of a name segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SegmentType {
    /// Generic segment; the label is omitted in URIs.
    Name,
    /// Chunk number of a segmented object.
    Chunk,
    /// Version of an object.
    Version,
    /// Application-defined segment type.
    App(u8),
}

impl SegmentType {
    /// Numeric type code used when a name is encoded.
    pub fn code(&self) -> u16 {
        match self {
            Self::Name => 0x0001,
            Self::Chunk => 0x0010,
            Self::Version => 0x0013,
            Self::App(n) => 0x1000 + u16::from(*n),
        }
    }

    fn parse_label(label: &str) -> Option<Self> {
        match label {
            "Name" => Some(Self::Name),
            "Chunk" => Some(Self::Chunk),
            "Version" => Some(Self::Version),
            other => other
                .strip_prefix("App:")
                .and_then(|n| n.parse::<u8>().ok())
                .map(Self::App),
        }
    }
}

impl fmt::Display for SegmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "Name"),
            Self::Chunk => write!(f, "Chunk"),
            Self::Version => write!(f, "Version"),
            Self::App(n) => write!(f, "App:{n}"),
        }
    }
}

/// One typed segment of a [`Name`].
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameSegment {
    pub segment_type: SegmentType,
    pub value: Vec<u8>,
}

impl NameSegment {
    /// Create a segment of the given type.
    pub fn new(segment_type: SegmentType, value: impl Into<Vec<u8>>) -> Self {
        Self {
            segment_type,
            value: value.into(),
        }
    }

    /// Create a generic segment.
    pub fn generic(value: impl Into<Vec<u8>>) -> Self {
        Self::new(SegmentType::Name, value)
    }

    /// Size of this segment once encoded (header plus value).
    pub fn encoded_len(&self) -> usize {
        SEGMENT_HEADER_LEN + self.value.len()
    }

    fn parse(uri: &str, text: &str) -> Result<Self, TypeError> {
        let invalid = |reason: String| TypeError::InvalidName {
            uri: uri.to_string(),
            reason,
        };

        if text.is_empty() {
            return Err(invalid("segments must not be empty".into()));
        }

        let (segment_type, value) = match text.split_once('=') {
            Some((label, value)) => {
                let segment_type = SegmentType::parse_label(label)
                    .ok_or_else(|| invalid(format!("unknown segment label: {label:?}")))?;
                (segment_type, value)
            }
            None => (SegmentType::Name, text),
        };

        let value = match value.strip_prefix("0x") {
            Some(hex_value) => hex::decode(hex_value)
                .map_err(|e| invalid(format!("bad binary segment {value:?}: {e}")))?,
            None => value.as_bytes().to_vec(),
        };

        Ok(Self::new(segment_type, value))
    }
}

impl fmt::Display for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segment_type != SegmentType::Name {
            write!(f, "{}=", self.segment_type)?;
        }
        match std::str::from_utf8(&self.value) {
            Ok(text)
                if !text.is_empty()
                    && !text.starts_with("0x")
                    && text.chars().all(|c| c.is_ascii_graphic() && c != '/' && c != '=') =>
            {
                write!(f, "{text}")
            }
            _ => write!(f, "0x{}", hex::encode(&self.value)),
        }
    }
}

impl fmt::Debug for NameSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameSegment({self})")
    }
}

/// A hierarchical CCNx name.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Name {
    segments: Vec<NameSegment>,
}

impl Name {
    /// The root name, with no segments.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a name from its segments.
    pub fn from_segments(segments: Vec<NameSegment>) -> Self {
        Self { segments }
    }

    /// Parse a `ccnx:/...` URI. The scheme is optional.
    pub fn parse(uri: &str) -> Result<Self, TypeError> {
        let path = uri.strip_prefix(SCHEME).unwrap_or(uri);
        let path = path.strip_prefix('/').ok_or_else(|| TypeError::InvalidName {
            uri: uri.to_string(),
            reason: "name must start with '/'".into(),
        })?;

        if path.is_empty() {
            return Ok(Self::root());
        }

        let segments = path
            .split('/')
            .map(|text| NameSegment::parse(uri, text))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    /// The segments of this name, outermost first.
    pub fn segments(&self) -> &[NameSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root name.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Size of the name's segments once encoded.
    ///
    /// This is the byte count the forwarding layer charges processing time
    /// against.
    pub fn encoded_len(&self) -> usize {
        self.segments.iter().map(NameSegment::encoded_len).sum()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}")?;
        if self.segments.is_empty() {
            return write!(f, "/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

impl FromStr for Name {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Name {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Name> for String {
    fn from(name: Name) -> Self {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn name(uri: &str) -> Name {
        Name::parse(uri).unwrap()
    }

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_generic_segments() {
        let n = name("ccnx:/parc/videos/intro");
        assert_eq!(n.segment_count(), 3);
        assert_eq!(n.segments()[1], NameSegment::generic("videos"));
    }

    #[test]
    fn parse_without_scheme() {
        assert_eq!(name("/a/b"), name("ccnx:/a/b"));
    }

    #[test]
    fn parse_root() {
        assert!(name("ccnx:/").is_root());
    }

    #[test]
    fn parse_labeled_segments() {
        let n = name("ccnx:/movies/Version=2/Chunk=7/App:3=meta");
        assert_eq!(n.segments()[1].segment_type, SegmentType::Version);
        assert_eq!(n.segments()[2].segment_type, SegmentType::Chunk);
        assert_eq!(n.segments()[3], NameSegment::new(SegmentType::App(3), "meta"));
    }

    #[test]
    fn parse_binary_segment() {
        let n = name("ccnx:/0x00ff");
        assert_eq!(n.segments()[0].value, vec![0x00, 0xff]);
    }

    #[test]
    fn parse_rejects_relative() {
        assert!(matches!(
            Name::parse("ccnx:a/b"),
            Err(TypeError::InvalidName { .. })
        ));
    }

    #[test]
    fn parse_rejects_empty_segment() {
        assert!(Name::parse("ccnx:/a//b").is_err());
        assert!(Name::parse("ccnx:/a/").is_err());
    }

    #[test]
    fn parse_rejects_unknown_label() {
        assert!(Name::parse("ccnx:/Bogus=1").is_err());
        assert!(Name::parse("ccnx:/App:999=1").is_err());
    }

    #[test]
    fn parse_rejects_bad_hex() {
        assert!(Name::parse("ccnx:/0xzz").is_err());
    }

    // -----------------------------------------------------------------------
    // Display
    // -----------------------------------------------------------------------

    #[test]
    fn display_uses_uri_form() {
        assert_eq!(name("/a/Chunk=1").to_string(), "ccnx:/a/Chunk=1");
        assert_eq!(Name::root().to_string(), "ccnx:/");
    }

    #[test]
    fn display_escapes_binary_values() {
        let n = Name::from_segments(vec![NameSegment::generic(vec![b'a', b'/', b'b'])]);
        assert_eq!(n.to_string(), "ccnx:/0x612f62");
        assert_eq!(name(&n.to_string()), n);
    }

    // -----------------------------------------------------------------------
    // Ordering
    // -----------------------------------------------------------------------

    #[test]
    fn prefix_orders_first() {
        assert!(name("/a") < name("/a/b"));
        assert!(name("/a/b") < name("/b"));
    }

    #[test]
    fn ordering_is_segment_wise() {
        // Whole-string comparison would put "/ab" before "/a/z".
        assert!(name("/a/z") < name("/ab"));
    }

    #[test]
    fn segment_type_orders_before_value() {
        assert!(name("/zzz") < name("/Chunk=a"));
    }

    // -----------------------------------------------------------------------
    // Misc
    // -----------------------------------------------------------------------

    #[test]
    fn from_segments_matches_parse() {
        let segments = name("/a/Chunk=1").segments().to_vec();
        assert_eq!(Name::from_segments(segments), name("/a/Chunk=1"));
        assert_eq!(Name::from_segments(Vec::new()), Name::root());
        assert_eq!(name("/a/Chunk=1").segment_count(), 2);
    }

    #[test]
    fn encoded_len_counts_headers() {
        assert_eq!(name("/ab/c").encoded_len(), 4 + 2 + 4 + 1);
        assert_eq!(Name::root().encoded_len(), 0);
    }

    #[test]
    fn segment_codes_are_distinct() {
        let codes = [
            SegmentType::Name.code(),
            SegmentType::Chunk.code(),
            SegmentType::Version.code(),
            SegmentType::App(0).code(),
            SegmentType::App(255).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(codes[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn serde_uses_uri_string() {
        let n = name("/a/Chunk=2");
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, "\"ccnx:/a/Chunk=2\"");
        let parsed: Name = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, n);
        assert!(serde_json::from_str::<Name>("\"no-slash\"").is_err());
    }

    fn segment_strategy() -> impl Strategy<Value = NameSegment> {
        (
            prop_oneof![
                Just(SegmentType::Name),
                Just(SegmentType::Chunk),
                Just(SegmentType::Version),
                any::<u8>().prop_map(SegmentType::App),
            ],
            proptest::collection::vec(any::<u8>(), 1..8),
        )
            .prop_map(|(t, v)| NameSegment::new(t, v))
    }

    fn name_strategy() -> impl Strategy<Value = Name> {
        proptest::collection::vec(segment_strategy(), 0..5).prop_map(Name::from_segments)
    }

    proptest! {
        /// Any name survives printing and re-parsing.
        #[test]
        fn prop_display_parse_roundtrip(n in name_strategy()) {
            let parsed = Name::parse(&n.to_string());
            prop_assert_eq!(parsed, Ok(n));
        }

        /// Extending a name always orders after the original.
        #[test]
        fn prop_extension_orders_after_original(n in name_strategy(), s in segment_strategy()) {
            let mut segments = n.segments().to_vec();
            segments.push(s);
            let extended = Name::from_segments(segments);
            prop_assert!(n < extended);
            prop_assert_eq!(extended.segment_count(), n.segment_count() + 1);
        }
    }
}
