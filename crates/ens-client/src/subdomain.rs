//! Subdomain and reverse-record workflows
//!
//! Multi-step operations built on the registry and resolver router:
//! creating and clearing subdomains, enumerating them from `NewOwner` logs,
//! and claiming reverse records.
//!
//! A subdomain record moves through `nonexistent -> owned -> cleared`.
//! Clearing writes the zero owner and zero resolver; the registry has no
//! delete, so a cleared node keeps its slot.

use crate::config::EnsConfig;
use crate::contracts::{reverse_registrar, NewOwnerEvent};
use crate::registry::RegistryClient;
use crate::resolver::ResolverRouter;
use crate::transport::{LogFilter, PendingTransaction, Transport, TxOverrides};
use crate::{Error, Result};
use ens_core::{join_name, namehash, split_name, Address, Label, LabelHash};
use ens_params::NetworkClass;
use futures_util::future::try_join_all;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Reserved parent of every reverse record
pub const REVERSE_ROOT: &str = "addr.reverse";

/// Safety factor applied to gas estimates on test-class networks
pub const GAS_LIMIT_MULTIPLIER: u64 = 2;

/// Name whose address record points at the public resolver
const PUBLIC_RESOLVER_NAME: &str = "resolver.eth";

/// Subdomain discovered from registry logs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subdomain {
    /// Label, hash-only since logs never carry the preimage
    pub label: Label,
    /// Label hash
    pub label_hash: LabelHash,
    /// Parent name
    pub parent: String,
    /// Full name in `[hash].parent` form
    pub name: String,
    /// Current owner
    pub owner: Address,
}

impl Subdomain {
    /// Whether the label text is known
    pub fn decrypted(&self) -> bool {
        !self.label.is_hash_only()
    }
}

/// Subdomain and reverse-record orchestration
pub struct SubdomainManager {
    transport: Arc<dyn Transport>,
    registry: Arc<RegistryClient>,
    router: Arc<ResolverRouter>,
    config: EnsConfig,
}

impl SubdomainManager {
    /// Create a manager over an existing registry client and router
    pub fn new(
        registry: Arc<RegistryClient>,
        router: Arc<ResolverRouter>,
        config: EnsConfig,
    ) -> Self {
        Self {
            transport: Arc::clone(registry.transport()),
            registry,
            router,
            config,
        }
    }

    /// Resolver assigned to new subdomains
    pub async fn default_resolver(&self) -> Result<Address> {
        if let Some(resolver) = self.config.default_resolver {
            return Ok(resolver);
        }
        if let Some(network) = self.registry.network() {
            return Ok(Address::parse(network.public_resolver)?);
        }
        let resolver = self.router.get_address(PUBLIC_RESOLVER_NAME).await?;
        if resolver.is_zero() {
            return Err(Error::Config(format!(
                "no default resolver for network {}",
                self.registry.network_id()
            )));
        }
        Ok(resolver)
    }

    /// Set owner, resolver and ttl of `name` in one registry transaction,
    /// keeping the node's current ttl
    pub async fn set_subnode_record(
        &self,
        name: &str,
        owner: Address,
        resolver: Address,
    ) -> Result<PendingTransaction> {
        let (label, parent) = split_name(name);
        let ttl = self.registry.ttl_of(namehash(name)).await?;
        self.registry
            .set_subnode_record(namehash(parent), label.hash(), owner, resolver, ttl)
            .await
    }

    /// Assign `name` to `owner` through its parent
    pub async fn set_subnode_owner(&self, name: &str, owner: Address) -> Result<PendingTransaction> {
        let (label, parent) = split_name(name);
        self.registry
            .set_subnode_owner(namehash(parent), label.hash(), owner)
            .await
    }

    /// Create `name` owned by the current signer, pointing at the default resolver
    pub async fn create_subdomain(&self, name: &str) -> Result<PendingTransaction> {
        let (signer, resolver) =
            tokio::try_join!(self.current_signer(), self.default_resolver())?;
        info!("Creating subdomain {} for {}", name, signer);
        self.set_subnode_record(name, signer, resolver).await
    }

    /// Reset `name` to the zero owner and zero resolver
    pub async fn delete_subdomain(&self, name: &str) -> Result<PendingTransaction> {
        info!("Clearing subdomain {}", name);
        self.set_subnode_record(name, Address::ZERO, Address::ZERO)
            .await
    }

    /// Subdomains of `parent` seen in `NewOwner` logs, most recent first,
    /// one entry per label hash, each with its current owner
    pub async fn enumerate_subdomains(&self, parent: &str) -> Result<Vec<Subdomain>> {
        let parent_node = namehash(parent);
        let from_block = self
            .config
            .start_block
            .or_else(|| self.registry.network().map(|n| n.start_block))
            .unwrap_or(0);

        let filter = LogFilter {
            address: self.registry.address(),
            topics: vec![
                Some(NewOwnerEvent::topic()),
                Some(*parent_node.as_bytes()),
            ],
            from_block,
            to_block: None,
        };
        let logs = self.transport.get_logs(&filter).await?;

        let mut events: Vec<NewOwnerEvent> = logs
            .iter()
            .filter_map(NewOwnerEvent::from_log)
            .filter(|e| e.node == parent_node)
            .collect();
        events.sort_by_key(|e| (e.block_number, e.log_index));

        let mut seen = HashSet::new();
        let labels: Vec<LabelHash> = events
            .iter()
            .rev()
            .map(|e| e.label)
            .filter(|label| seen.insert(*label))
            .collect();
        debug!(
            "{} NewOwner logs under {}, {} distinct labels",
            events.len(),
            parent,
            labels.len()
        );

        let owners = try_join_all(
            labels
                .iter()
                .map(|label| self.registry.owner_by_label_and_parent(*label, parent_node)),
        )
        .await?;

        Ok(labels
            .into_iter()
            .zip(owners)
            .map(|(label_hash, owner)| {
                let label = Label::HashOnly(label_hash);
                Subdomain {
                    name: join_name(&label, parent),
                    label,
                    label_hash,
                    parent: parent.to_string(),
                    owner,
                }
            })
            .collect())
    }

    /// Reverse registrar: the owner of `addr.reverse`, or the network table's
    /// entry when that node is unowned
    pub async fn reverse_registrar(&self) -> Result<Address> {
        let owner = self.registry.owner_of(namehash(REVERSE_ROOT)).await?;
        if !owner.is_zero() {
            return Ok(owner);
        }
        match self.registry.network() {
            Some(network) => {
                debug!(
                    "{} has no owner, using reverse registrar of {}",
                    REVERSE_ROOT, network.name
                );
                Ok(Address::parse(network.reverse_registrar)?)
            }
            None => Err(Error::ReverseRegistrarAbsent),
        }
    }

    /// Claim the signer's reverse record and point it at `name`.
    ///
    /// On test-class networks the gas limit is estimated and doubled unless the
    /// caller already set one.
    pub async fn claim_reverse_record(
        &self,
        name: &str,
        mut overrides: TxOverrides,
    ) -> Result<PendingTransaction> {
        let registrar = self.reverse_registrar().await?;

        let call = reverse_registrar::set_name(name);
        let network_id = self.registry.network_id();
        if NetworkClass::classify(network_id, self.config.gas_estimation_threshold)
            == NetworkClass::Test
        {
            let estimate = self.transport.estimate_gas(registrar, &call).await?;
            let limit = estimate.saturating_mul(GAS_LIMIT_MULTIPLIER);
            debug!(
                "Network {} gas estimate {} for setName, limit {}",
                network_id, estimate, limit
            );
            overrides.gas_limit.get_or_insert(limit);
        }

        let tx = self.transport.send(registrar, &call, &overrides).await?;
        info!("Claimed reverse record for {}: {}", name, tx.hash_hex());
        Ok(tx)
    }

    /// Write `name` directly on the resolver of the signer's reverse node
    pub async fn set_reverse_record_name(&self, name: &str) -> Result<PendingTransaction> {
        let signer = self.current_signer().await?;
        let reverse_node = reverse_node_name(signer);
        self.router.set_name_record(&reverse_node, name).await
    }

    async fn current_signer(&self) -> Result<Address> {
        Ok(self.transport.current_signer().await?)
    }
}

/// `<lowercase hex>.addr.reverse` for an address
pub fn reverse_node_name(address: Address) -> String {
    format!("{}.{}", address.to_hex_unprefixed(), REVERSE_ROOT)
}

impl std::fmt::Debug for SubdomainManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubdomainManager")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
