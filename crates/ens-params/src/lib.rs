//! Naming registry network parameters and constants
//!
//! This crate provides the static per-network address table (registry,
//! public resolver, registrar, reverse registrar), the block at which the
//! registry started emitting events, and the network-class helpers used to
//! decide transaction submission policy.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod network;

pub use network::{Network, NetworkClass, GAS_ESTIMATION_THRESHOLD, NETWORKS};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No address table is known for this network id
    #[error("Unsupported network {0}")]
    UnsupportedNetwork(u64),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
