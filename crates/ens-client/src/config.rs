//! Client configuration

use crate::{Error, Result};
use ens_core::Address;
use ens_params::GAS_ESTIMATION_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Client configuration
///
/// Every field is optional in the serialized form; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsConfig {
    /// Registry address, overriding the network table
    pub registry_address: Option<Address>,
    /// First block scanned for registry events, overriding the network table
    pub start_block: Option<u64>,
    /// Resolver assigned to new subdomains, overriding the network's public resolver
    pub default_resolver: Option<Address>,
    /// Base registrar, overriding the network table
    pub base_registrar: Option<Address>,
    /// Ask the transport for a name's resolver before reading the registry
    pub prefer_native_resolver: bool,
    /// Check `supportsInterface` and fall back to the pre-contenthash accessor
    pub legacy_content_check: bool,
    /// Network ids above this get an estimated, doubled gas limit
    pub gas_estimation_threshold: u64,
}

impl Default for EnsConfig {
    fn default() -> Self {
        Self {
            registry_address: None,
            start_block: None,
            default_resolver: None,
            base_registrar: None,
            prefer_native_resolver: true,
            legacy_content_check: false,
            gas_estimation_threshold: GAS_ESTIMATION_THRESHOLD,
        }
    }
}

impl EnsConfig {
    /// Parse from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if self.registry_address.is_some_and(|a| a.is_zero()) {
            return Err(Error::Config(
                "registry_address must not be the zero address".to_string(),
            ));
        }
        if self.base_registrar.is_some_and(|a| a.is_zero()) {
            return Err(Error::Config(
                "base_registrar must not be the zero address".to_string(),
            ));
        }
        Ok(())
    }
}
