//! Registry client
//!
//! Typed view over the root ownership registry. The contract address is fixed
//! at construction, either from the network table or supplied explicitly.

use crate::contracts::{self, registry};
use crate::transport::{ContractCall, PendingTransaction, Token, Transport, TxOverrides};
use crate::{Error, Result};
use ens_core::{child_node, Address, LabelHash, NodeHash};
use ens_params::Network;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry client bound to one contract address
pub struct RegistryClient {
    transport: Arc<dyn Transport>,
    address: Address,
    network_id: u64,
    network: Option<&'static Network>,
}

impl RegistryClient {
    /// Bind to the registry of `network_id`, or to `explicit` if given.
    ///
    /// Fails with [`Error::UnsupportedNetwork`] when the network has no known
    /// registry and no address was supplied.
    pub fn new(
        transport: Arc<dyn Transport>,
        network_id: u64,
        explicit: Option<Address>,
    ) -> Result<Self> {
        let network = Network::by_id(network_id).ok();
        let address = match (explicit, network) {
            (Some(address), _) => address,
            (None, Some(net)) => Address::parse(net.registry)?,
            (None, None) => return Err(Error::UnsupportedNetwork(network_id)),
        };

        info!(
            "Registry client for network {} at {}",
            network_id,
            address.to_checksum()
        );

        Ok(Self {
            transport,
            address,
            network_id,
            network,
        })
    }

    /// Registry contract address
    pub fn address(&self) -> Address {
        self.address
    }

    /// Network table entry, if the network is known
    pub fn network(&self) -> Option<&'static Network> {
        self.network
    }

    /// Numeric network id
    pub fn network_id(&self) -> u64 {
        self.network_id
    }

    /// Shared transport
    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    async fn call(&self, call: &ContractCall) -> Result<Token> {
        debug!("registry {}", call.method());
        Ok(self.transport.call(self.address, call).await?)
    }

    async fn send(&self, call: &ContractCall) -> Result<PendingTransaction> {
        let tx = self
            .transport
            .send(self.address, call, &TxOverrides::default())
            .await?;
        info!("Submitted registry {}: {}", call.method(), tx.hash_hex());
        Ok(tx)
    }

    /// Owner of a node; zero if unowned
    pub async fn owner_of(&self, node: NodeHash) -> Result<Address> {
        let call = registry::owner(node);
        let token = self.call(&call).await?;
        contracts::returned_address(&call, token)
    }

    /// Resolver of a node; zero if unset
    pub async fn resolver_of(&self, node: NodeHash) -> Result<Address> {
        let call = registry::resolver(node);
        let token = self.call(&call).await?;
        contracts::returned_address(&call, token)
    }

    /// Time-to-live of a node's records
    pub async fn ttl_of(&self, node: NodeHash) -> Result<u64> {
        let call = registry::ttl(node);
        let token = self.call(&call).await?;
        contracts::returned_u64(&call, token)
    }

    /// Whether the registry has ever stored a record for the node
    pub async fn record_exists(&self, node: NodeHash) -> Result<bool> {
        let call = registry::record_exists(node);
        let token = self.call(&call).await?;
        contracts::returned_bool(&call, token)
    }

    /// Owner of the child `label` under `parent` when only the label hash is known
    pub async fn owner_by_label_and_parent(
        &self,
        label: LabelHash,
        parent: NodeHash,
    ) -> Result<Address> {
        self.owner_of(child_node(parent, label)).await
    }

    /// Resolver of the child `label` under `parent` when only the label hash is known
    pub async fn resolver_by_label_and_parent(
        &self,
        label: LabelHash,
        parent: NodeHash,
    ) -> Result<Address> {
        self.resolver_of(child_node(parent, label)).await
    }

    /// Transfer a node
    pub async fn set_owner(&self, node: NodeHash, owner: Address) -> Result<PendingTransaction> {
        self.send(&registry::set_owner(node, owner)).await
    }

    /// Assign the child `label` under `parent` to `owner`
    pub async fn set_subnode_owner(
        &self,
        parent: NodeHash,
        label: LabelHash,
        owner: Address,
    ) -> Result<PendingTransaction> {
        self.send(&registry::set_subnode_owner(parent, label, owner))
            .await
    }

    /// Set owner, resolver and ttl of a child in one transaction
    pub async fn set_subnode_record(
        &self,
        parent: NodeHash,
        label: LabelHash,
        owner: Address,
        resolver: Address,
        ttl: u64,
    ) -> Result<PendingTransaction> {
        self.send(&registry::set_subnode_record(
            parent, label, owner, resolver, ttl,
        ))
        .await
    }

    /// Point a node at a resolver
    pub async fn set_resolver(
        &self,
        node: NodeHash,
        resolver: Address,
    ) -> Result<PendingTransaction> {
        self.send(&registry::set_resolver(node, resolver)).await
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("address", &self.address)
            .field("network_id", &self.network_id)
            .finish()
    }
}
