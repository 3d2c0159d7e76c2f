//! Name and label identifiers
//!
//! `namehash` folds a dotted name right to left into a 32-byte node id:
//! starting from the all-zero root, each label's keccak-256 hash is appended
//! to the running node and the 64-byte concatenation is hashed again. Labels
//! whose preimage is unknown are carried as [`Label::HashOnly`] and contribute
//! their embedded hash directly.
//!
//! These ids must match other implementations bit for bit. No normalization
//! is applied here; callers normalize names before hashing if they need to.

use crate::label::Label;
use crate::{Error, Result};
use alloy_primitives::B256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub use alloy_primitives::keccak256;

macro_rules! hash32 {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(B256);

        impl $name {
            /// All-zero value
            pub const ZERO: Self = Self(B256::ZERO);

            /// Wrap raw bytes
            pub const fn new(bytes: [u8; 32]) -> Self {
                Self(B256::new(bytes))
            }

            /// Raw bytes
            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0 .0
            }

            /// The underlying 32-byte word
            pub fn into_inner(self) -> B256 {
                self.0
            }

            /// True when every byte is zero
            pub fn is_zero(&self) -> bool {
                self.0.is_zero()
            }

            /// Build from a byte slice of exactly 32 bytes
            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                let raw: [u8; 32] = bytes.try_into().map_err(|_| {
                    Error::InvalidHash(format!("expected 32 bytes, got {}", bytes.len()))
                })?;
                Ok(Self::new(raw))
            }

            /// Parse 64 hex characters, `0x` prefix optional
            pub fn from_hex(text: &str) -> Result<Self> {
                B256::from_str(text)
                    .map(Self)
                    .map_err(|e| Error::InvalidHash(format!("{}: {}", text, e)))
            }

            /// Lowercase hex without the `0x` prefix
            pub fn to_hex_unprefixed(&self) -> String {
                hex::encode(self.as_bytes())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", self.to_hex_unprefixed())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self)
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; 32]> for $name {
            fn from(bytes: [u8; 32]) -> Self {
                Self::new(bytes)
            }
        }

        impl From<B256> for $name {
            fn from(word: B256) -> Self {
                Self(word)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                self.0.as_slice()
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.to_string())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let text = String::deserialize(deserializer)?;
                Self::from_hex(&text).map_err(serde::de::Error::custom)
            }
        }
    };
}

hash32! {
    /// 32-byte identifier of a position in the name hierarchy
    NodeHash
}

hash32! {
    /// 32-byte identifier of a single label
    LabelHash
}

/// Hash a single label.
///
/// A bracketed 64-hex label (`[<hash>]`) is taken as its embedded hash.
pub fn labelhash(label: &str) -> LabelHash {
    Label::parse(label).hash()
}

/// Node id of `label` under `parent`: `keccak256(parent || label)`
pub fn child_node(parent: NodeHash, label: LabelHash) -> NodeHash {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(parent.as_bytes());
    buf[32..].copy_from_slice(label.as_bytes());
    NodeHash(keccak256(buf))
}

/// Hash a dotted name. The empty name is the zero root node.
pub fn namehash(name: &str) -> NodeHash {
    if name.is_empty() {
        return NodeHash::ZERO;
    }
    name.rsplit('.')
        .fold(NodeHash::ZERO, |node, label| child_node(node, labelhash(label)))
}

/// Hash an already split name, labels ordered left to right
pub fn namehash_labels(labels: &[Label]) -> NodeHash {
    labels
        .iter()
        .rev()
        .fold(NodeHash::ZERO, |node, label| child_node(node, label.hash()))
}
