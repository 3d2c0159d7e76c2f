//! Composition root
//!
//! [`Ens`] wires one transport into a registry client, a resolver router, a
//! base-registrar client and a subdomain manager, and offers name-level
//! wrappers over the registry and registrar.

use crate::config::EnsConfig;
use crate::registrar::{BaseInfo, RegistrarClient, Registration};
use crate::registry::RegistryClient;
use crate::resolver::ResolverRouter;
use crate::subdomain::SubdomainManager;
use crate::transport::{PendingTransaction, Transport};
use crate::Result;
use ens_core::{namehash, Address};
use std::sync::Arc;
use tracing::info;

/// Naming client
#[derive(Debug)]
pub struct Ens {
    registry: Arc<RegistryClient>,
    resolver: Arc<ResolverRouter>,
    registrar: RegistrarClient,
    subdomains: SubdomainManager,
}

impl Ens {
    /// Connect using the transport's current network id
    pub async fn connect(transport: Arc<dyn Transport>, config: EnsConfig) -> Result<Self> {
        let network_id = transport.current_network_id().await?;
        Self::with_network_id(transport, network_id, config)
    }

    /// Build for an explicit network id
    pub fn with_network_id(
        transport: Arc<dyn Transport>,
        network_id: u64,
        config: EnsConfig,
    ) -> Result<Self> {
        let registrar =
            RegistrarClient::new(Arc::clone(&transport), network_id, config.base_registrar)?;
        let registry = Arc::new(RegistryClient::new(
            transport,
            network_id,
            config.registry_address,
        )?);
        let resolver = Arc::new(ResolverRouter::new(Arc::clone(&registry), config.clone()));
        let subdomains =
            SubdomainManager::new(Arc::clone(&registry), Arc::clone(&resolver), config);

        info!("Naming client ready on network {}", network_id);
        Ok(Self {
            registry,
            resolver,
            registrar,
            subdomains,
        })
    }

    /// Registry client
    pub fn registry(&self) -> &RegistryClient {
        &self.registry
    }

    /// Resolver router
    pub fn resolver(&self) -> &ResolverRouter {
        &self.resolver
    }

    /// Base registrar client
    pub fn registrar(&self) -> &RegistrarClient {
        &self.registrar
    }

    /// Subdomain manager
    pub fn subdomains(&self) -> &SubdomainManager {
        &self.subdomains
    }

    /// Owner of `name`
    pub async fn get_owner(&self, name: &str) -> Result<Address> {
        self.registry.owner_of(namehash(name)).await
    }

    /// TTL of `name`
    pub async fn get_ttl(&self, name: &str) -> Result<u64> {
        self.registry.ttl_of(namehash(name)).await
    }

    /// Whether `name` has a record in the current registry
    pub async fn is_migrated(&self, name: &str) -> Result<bool> {
        self.registry.record_exists(namehash(name)).await
    }

    /// Expiry of `name` on the base registrar
    pub async fn get_expiry_time(&self, name: &str) -> Result<u64> {
        self.registrar.get_expiry_time(name).await
    }

    /// Registrar owner and expiry of `name`
    pub async fn get_base_info(&self, name: &str) -> Result<BaseInfo> {
        self.registrar.get_base_info(name).await
    }

    /// Names held by `owner` on the base registrar
    pub async fn get_registrant_list(&self, owner: Address) -> Result<Vec<Registration>> {
        self.registrar.get_registrant_list(owner).await
    }

    /// Transfer `name`
    pub async fn set_owner(&self, name: &str, owner: Address) -> Result<PendingTransaction> {
        self.registry.set_owner(namehash(name), owner).await
    }

    /// Point `name` at `resolver`
    pub async fn set_resolver(&self, name: &str, resolver: Address) -> Result<PendingTransaction> {
        self.registry.set_resolver(namehash(name), resolver).await
    }

    /// Assign `name` to `owner` through its parent
    pub async fn set_subnode_owner(&self, name: &str, owner: Address) -> Result<PendingTransaction> {
        self.subdomains.set_subnode_owner(name, owner).await
    }

    /// Set owner and resolver of `name`, keeping its ttl
    pub async fn set_subnode_record(
        &self,
        name: &str,
        owner: Address,
        resolver: Address,
    ) -> Result<PendingTransaction> {
        self.subdomains
            .set_subnode_record(name, owner, resolver)
            .await
    }
}
