//! Name labels
//!
//! A label is either known text or only its hash. Hash-only labels come out
//! of event logs, which reveal label hashes but never their preimages. When a
//! hash-only label has to travel inside a dotted name it is written as
//! `[<64 lowercase hex>]`; [`Label::parse`] reads that form back.

use crate::hash::{keccak256, LabelHash};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single name segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Label whose text is known
    Known(String),
    /// Label known only by its hash
    HashOnly(LabelHash),
}

impl Label {
    /// Parse a label, recognizing the bracketed hash-only form
    pub fn parse(text: &str) -> Self {
        match decode_bracketed(text) {
            Some(hash) => Label::HashOnly(hash),
            None => Label::Known(text.to_string()),
        }
    }

    /// Label hash; hash-only labels return their embedded hash
    pub fn hash(&self) -> LabelHash {
        match self {
            Label::Known(text) => LabelHash::from(keccak256(text.as_bytes())),
            Label::HashOnly(hash) => *hash,
        }
    }

    /// Label text when known
    pub fn as_known(&self) -> Option<&str> {
        match self {
            Label::Known(text) => Some(text),
            Label::HashOnly(_) => None,
        }
    }

    /// True if the preimage is unknown
    pub fn is_hash_only(&self) -> bool {
        matches!(self, Label::HashOnly(_))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Known(text) => f.write_str(text),
            Label::HashOnly(hash) => write!(f, "[{}]", hash.to_hex_unprefixed()),
        }
    }
}

impl From<LabelHash> for Label {
    fn from(hash: LabelHash) -> Self {
        Label::HashOnly(hash)
    }
}

fn decode_bracketed(text: &str) -> Option<LabelHash> {
    let inner = text.strip_prefix('[')?.strip_suffix(']')?;
    if inner.len() != 64 {
        return None;
    }
    LabelHash::from_hex(inner).ok()
}

/// Split a dotted name into its labels, left to right
pub fn split_labels(name: &str) -> Vec<Label> {
    if name.is_empty() {
        return Vec::new();
    }
    name.split('.').map(Label::parse).collect()
}

/// Split a name into its first label and its parent name.
///
/// `"sub.example.eth"` gives `(sub, "example.eth")`; a single label has the
/// root (`""`) as its parent.
pub fn split_name(name: &str) -> (Label, &str) {
    match name.split_once('.') {
        Some((first, parent)) => (Label::parse(first), parent),
        None => (Label::parse(name), ""),
    }
}

/// Join a label onto a parent name
pub fn join_name(label: &Label, parent: &str) -> String {
    if parent.is_empty() {
        label.to_string()
    } else {
        format!("{}.{}", label, parent)
    }
}
