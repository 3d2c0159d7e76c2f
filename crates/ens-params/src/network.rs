//! Per-network contract address table

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Networks with an id above this value are treated as test-class networks,
/// where gas estimation is unreliable and transactions get an explicit limit.
pub const GAS_ESTIMATION_THRESHOLD: u64 = 1000;

/// Network class enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkClass {
    /// Mainnet-class network (id at or below the threshold)
    Mainnet,
    /// Test-class network (id above the threshold)
    Test,
}

impl NetworkClass {
    /// Classify a numeric network id against a threshold
    pub const fn classify(network_id: u64, threshold: u64) -> Self {
        if network_id > threshold {
            NetworkClass::Test
        } else {
            NetworkClass::Mainnet
        }
    }
}

/// Network configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Network {
    /// Numeric network (chain) id
    pub network_id: u64,
    /// Human-readable name
    pub name: &'static str,
    /// Root ownership registry
    pub registry: &'static str,
    /// Default public resolver assigned to new subdomains
    pub public_resolver: &'static str,
    /// Base registrar for second-level names
    pub base_registrar: &'static str,
    /// Reverse registrar (owner of `addr.reverse`)
    pub reverse_registrar: &'static str,
    /// First block to scan for registry events
    pub start_block: u64,
}

/// Address tables of every network known at compile time
pub const NETWORKS: &[Network] = &[Network::mainnet(), Network::sepolia()];

impl Network {
    /// Get mainnet parameters
    pub const fn mainnet() -> Self {
        Self {
            network_id: 1,
            name: "mainnet",
            registry: "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e",
            public_resolver: "0x231b0Ee14048e9dCcD1d247744d114a4EB5E8E63",
            base_registrar: "0x57f1887a8BF19b14fC0dF6Fd9B2acc9Af147eA85",
            reverse_registrar: "0xa58E81fe9b61B5c3fE2AFD33CF304c454AbFc7Cb",
            start_block: 3_327_417,
        }
    }

    /// Get sepolia parameters
    pub const fn sepolia() -> Self {
        Self {
            network_id: 11_155_111,
            name: "sepolia",
            registry: "0x00000000000C2E074eC69A0dFb2997BA6C7d2e1e",
            public_resolver: "0x8FADE66B79cC9f707aB26799354482EB93a5B7dD",
            base_registrar: "0x57f1887a8BF19b14fC0dF6Fd9B2acc9Af147eA85",
            reverse_registrar: "0xA0a1AbcDAe1a2a4A2EF8e9113Ff0e02DD81DC0C6",
            start_block: 3_702_728,
        }
    }

    /// Look up a network by id
    pub fn by_id(network_id: u64) -> Result<&'static Network> {
        NETWORKS
            .iter()
            .find(|n| n.network_id == network_id)
            .ok_or(Error::UnsupportedNetwork(network_id))
    }
}
