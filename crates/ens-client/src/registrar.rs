//! Base registrar client
//!
//! Second-level names are ERC-721 tokens on the base registrar. A name's
//! token id is its namehash read as a big-endian 256-bit integer. Reads only;
//! registration and renewal go through the registrar's controller, which this
//! client does not drive.

use crate::contracts::{self, base_registrar};
use crate::transport::{ContractCall, Token, Transport};
use crate::{Error, Result};
use alloy_primitives::U256;
use ens_core::{namehash, Address};
use ens_params::Network;
use futures_util::future::try_join_all;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Owner and expiry of a registered name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseInfo {
    /// Token owner
    pub owner: Address,
    /// Expiry as a unix timestamp; zero if never registered
    pub expiry_time: u64,
}

/// One name held by an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Registrar token id
    pub token_id: U256,
    /// Full name, `<label>.<tld>`
    pub name: String,
    /// Expiry as a unix timestamp
    pub expires: u64,
}

/// Token id of `name` on the base registrar
pub fn token_id(name: &str) -> U256 {
    U256::from_be_bytes(*namehash(name).as_bytes())
}

/// Read-only client for the base registrar
pub struct RegistrarClient {
    transport: Arc<dyn Transport>,
    address: Option<Address>,
    network_id: u64,
}

impl RegistrarClient {
    /// Bind to `explicit`, or to the network table's registrar.
    ///
    /// An unknown network without `explicit` still binds; its calls report
    /// [`Error::RegistrarAbsent`].
    pub fn new(
        transport: Arc<dyn Transport>,
        network_id: u64,
        explicit: Option<Address>,
    ) -> Result<Self> {
        let address = match explicit {
            Some(address) => Some(address),
            None => match Network::by_id(network_id) {
                Ok(network) => Some(Address::parse(network.base_registrar)?),
                Err(_) => None,
            },
        };
        match address {
            Some(address) => info!(
                "Base registrar for network {} at {}",
                network_id,
                address.to_checksum()
            ),
            None => debug!("No base registrar for network {}", network_id),
        }

        Ok(Self {
            transport,
            address,
            network_id,
        })
    }

    /// Registrar contract address, if known
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    async fn call(&self, call: &ContractCall) -> Result<Token> {
        let address = self
            .address
            .ok_or(Error::RegistrarAbsent(self.network_id))?;
        debug!("registrar {}", call.method());
        Ok(self.transport.call(address, call).await?)
    }

    async fn call_u64(&self, call: ContractCall) -> Result<u64> {
        let token = self.call(&call).await?;
        contracts::returned_u64(&call, token)
    }

    async fn call_string(&self, call: ContractCall) -> Result<String> {
        let token = self.call(&call).await?;
        contracts::returned_string(&call, token)
    }

    /// Expiry of a token as a unix timestamp
    pub async fn expiry_of(&self, id: U256) -> Result<u64> {
        self.call_u64(base_registrar::name_expires(id)).await
    }

    /// Owner of a token
    pub async fn owner_of(&self, id: U256) -> Result<Address> {
        let call = base_registrar::owner_of(id);
        let token = self.call(&call).await?;
        contracts::returned_address(&call, token)
    }

    /// Expiry of `name` as a unix timestamp
    pub async fn get_expiry_time(&self, name: &str) -> Result<u64> {
        self.expiry_of(token_id(name)).await
    }

    /// Owner and expiry of `name`, read concurrently
    pub async fn get_base_info(&self, name: &str) -> Result<BaseInfo> {
        let id = token_id(name);
        let (owner, expiry_time) = tokio::try_join!(self.owner_of(id), self.expiry_of(id))?;
        Ok(BaseInfo { owner, expiry_time })
    }

    /// Every name `owner` holds, in the registrar's enumeration order
    pub async fn get_registrant_list(&self, owner: Address) -> Result<Vec<Registration>> {
        let (balance, tld) = tokio::try_join!(
            self.call_u64(base_registrar::balance_of(owner)),
            self.call_string(base_registrar::tld())
        )?;
        debug!("{} holds {} names under {}", owner, balance, tld);

        let ids = try_join_all((0..balance).map(|index| async move {
            let call = base_registrar::token_of_owner_by_index(owner, index);
            let token = self.call(&call).await?;
            contracts::returned_uint(&call, token)
        }))
        .await?;

        try_join_all(ids.into_iter().map(|id| self.registration(id, &tld))).await
    }

    async fn registration(&self, token_id: U256, tld: &str) -> Result<Registration> {
        let (label, expires) = tokio::try_join!(
            self.call_string(base_registrar::name_of(token_id)),
            self.expiry_of(token_id)
        )?;
        Ok(Registration {
            token_id,
            name: format!("{}.{}", label, tld),
            expires,
        })
    }
}

impl std::fmt::Debug for RegistrarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrarClient")
            .field("address", &self.address)
            .field("network_id", &self.network_id)
            .finish()
    }
}
