//! Naming registry core
//!
//! Pure, I/O-free building blocks shared by every registry client: the
//! name and label hashing scheme, addresses and 32-byte identifiers, labels
//! with unknown preimages, and the multi-codec content-hash encoder/decoder.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod cid;
pub mod contenthash;
pub mod error;
pub mod hash;
pub mod label;

pub use address::{Address, ADDRESS_LENGTH};
pub use contenthash::{
    decode as decode_content, encode as encode_content, is_valid_content_hash, ContentHash,
    EncodedContentHash, ProtocolType,
};
pub use error::{Error, Result};
pub use hash::{child_node, keccak256, labelhash, namehash, namehash_labels, LabelHash, NodeHash};
pub use label::{join_name, split_labels, split_name, Label};
