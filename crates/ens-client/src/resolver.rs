//! Resolver routing and record access
//!
//! A name's records live in whatever resolver contract the name points at.
//! [`ResolverRouter`] finds that contract (native transport discovery first,
//! registry second) and exposes typed reads and writes against it.
//!
//! Reads degrade to sentinels: no resolver gives the zero address, an empty
//! string or no content, and failing text/content reads are logged and turned
//! into empty or `error` values. Writes always propagate failures.

use crate::config::EnsConfig;
use crate::contracts::{self, resolver, CONTENTHASH_INTERFACE, WILDCARD_INTERFACE};
use crate::registry::RegistryClient;
use crate::transport::{
    ContractCall, PendingTransaction, Token, Transport, TransportError, TxOverrides,
};
use crate::{Error, Result};
use ens_core::{
    decode_content, encode_content, namehash, split_name, Address, ContentHash,
    EncodedContentHash, Label, LabelHash, NodeHash, ProtocolType,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Point-in-time view of a name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainDetails {
    /// Full name as requested
    pub name: String,
    /// First label
    pub label: Label,
    /// Hash of the first label
    pub label_hash: LabelHash,
    /// Parent name (empty for top-level names)
    pub parent: String,
    /// Registry owner; zero if unowned
    pub owner: Address,
    /// Resolver; zero if unset
    pub resolver: Address,
    /// Address record; `None` when there is no resolver
    pub addr: Option<Address>,
    /// Content record; `None` when there is no resolver or the record is empty
    pub content: Option<ContentHash>,
}

impl DomainDetails {
    /// Protocol of the content record, if any
    pub fn content_type(&self) -> Option<ProtocolType> {
        self.content.as_ref().map(|c| c.protocol_type)
    }

    /// Whether the name has a resolver
    pub fn has_resolver(&self) -> bool {
        !self.resolver.is_zero()
    }
}

/// Routes names to their resolver and reads/writes records there
pub struct ResolverRouter {
    transport: Arc<dyn Transport>,
    registry: Arc<RegistryClient>,
    config: EnsConfig,
}

impl ResolverRouter {
    /// Create a router sharing the registry client's transport
    pub fn new(registry: Arc<RegistryClient>, config: EnsConfig) -> Self {
        Self {
            transport: Arc::clone(registry.transport()),
            registry,
            config,
        }
    }

    /// Registry used for fallback routing
    pub fn registry(&self) -> &Arc<RegistryClient> {
        &self.registry
    }

    /// Resolver address for `name`, `None` if unset
    pub async fn resolver_for(&self, name: &str) -> Result<Option<Address>> {
        if self.config.prefer_native_resolver {
            match self.transport.resolve_resolver_address(name).await {
                Ok(found) => {
                    let found = found.filter(|a| !a.is_zero());
                    debug!("Native resolver for {:?}: {:?}", name, found);
                    return Ok(found);
                }
                Err(TransportError::Unsupported(_)) => {
                    debug!("Native resolver discovery unavailable, using registry");
                }
                Err(e) => return Err(e.into()),
            }
        }

        let resolver = self.registry.resolver_of(namehash(name)).await?;
        Ok((!resolver.is_zero()).then_some(resolver))
    }

    async fn require_resolver(&self, name: &str) -> Result<Address> {
        self.resolver_for(name)
            .await?
            .ok_or_else(|| Error::ResolverAbsent(name.to_string()))
    }

    async fn call_at(&self, resolver: Address, call: &ContractCall) -> Result<Token> {
        Ok(self.transport.call(resolver, call).await?)
    }

    async fn send_at(&self, resolver: Address, call: &ContractCall) -> Result<PendingTransaction> {
        let tx = self
            .transport
            .send(resolver, call, &TxOverrides::default())
            .await?;
        info!(
            "Submitted {} on resolver {}: {}",
            call.method(),
            resolver,
            tx.hash_hex()
        );
        Ok(tx)
    }

    async fn address_at(&self, resolver: Address, node: NodeHash) -> Result<Address> {
        let call = resolver::addr(node);
        let token = self.call_at(resolver, &call).await?;
        contracts::returned_address(&call, token)
    }

    async fn supports_interface_at(&self, resolver: Address, id: [u8; 4]) -> Result<bool> {
        let call = resolver::supports_interface(id);
        let token = self.call_at(resolver, &call).await?;
        contracts::returned_bool(&call, token)
    }

    async fn old_content_at(&self, resolver: Address, node: NodeHash) -> Result<Option<ContentHash>> {
        let call = resolver::content(node);
        let token = self.call_at(resolver, &call).await?;
        let word = contracts::returned_word(&call, token)?;
        Ok((word != [0u8; 32]).then(|| ContentHash::old_content(&word)))
    }

    async fn content_hash_at(&self, resolver: Address, node: NodeHash) -> Result<Option<ContentHash>> {
        let call = resolver::contenthash(node);
        let token = self.call_at(resolver, &call).await?;
        let bytes = contracts::returned_bytes(&call, token)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(decode_content(&bytes)))
    }

    /// Content read against a known resolver. Failures become `error` content.
    async fn content_at(&self, resolver: Address, node: NodeHash) -> Option<ContentHash> {
        if self.config.legacy_content_check {
            match self
                .supports_interface_at(resolver, CONTENTHASH_INTERFACE)
                .await
            {
                Ok(true) => {}
                Ok(false) => {
                    debug!("Resolver {} predates contenthash, reading content()", resolver);
                    return self
                        .old_content_at(resolver, node)
                        .await
                        .unwrap_or_else(|e| {
                            warn!("content() failed on {}: {}", resolver, e);
                            Some(ContentHash::error(e.to_string()))
                        });
                }
                Err(e) => debug!("supportsInterface check failed on {}: {}", resolver, e),
            }
        }

        match self.content_hash_at(resolver, node).await {
            Ok(content) => content,
            Err(e) => {
                warn!("contenthash() failed on {}: {}", resolver, e);
                Some(ContentHash::error(e.to_string()))
            }
        }
    }

    /// Default address record; zero if the name is empty or has no resolver
    pub async fn get_address(&self, name: &str) -> Result<Address> {
        if name.is_empty() {
            return Ok(Address::ZERO);
        }
        match self.resolver_for(name).await? {
            Some(resolver) => self.address_at(resolver, namehash(name)).await,
            None => {
                debug!("No resolver for {}", name);
                Ok(Address::ZERO)
            }
        }
    }

    /// Multi-coin address record as raw bytes; empty if unset
    pub async fn get_coin_address(&self, name: &str, coin_type: u64) -> Result<Vec<u8>> {
        let Some(resolver) = self.resolver_for(name).await? else {
            return Ok(Vec::new());
        };
        let call = resolver::coin_addr(namehash(name), coin_type);
        let token = self.call_at(resolver, &call).await?;
        contracts::returned_bytes(&call, token)
    }

    async fn text_record(&self, name: &str, key: &str) -> Result<String> {
        let Some(resolver) = self.resolver_for(name).await? else {
            return Ok(String::new());
        };
        let call = resolver::text(namehash(name), key);
        let token = self.call_at(resolver, &call).await?;
        contracts::returned_string(&call, token)
    }

    /// Text record; empty string when absent or when the read fails
    pub async fn get_text(&self, name: &str, key: &str) -> String {
        self.text_record(name, key).await.unwrap_or_else(|e| {
            warn!("text({}, {}) failed: {}", name, key, e);
            String::new()
        })
    }

    /// Content record, decoded
    ///
    /// `None` when the name has no resolver or the record is empty. Any failure
    /// is returned as `error` content carrying the diagnostic.
    pub async fn get_content(&self, name: &str) -> Option<ContentHash> {
        match self.resolver_for(name).await {
            Ok(Some(resolver)) => self.content_at(resolver, namehash(name)).await,
            Ok(None) => None,
            Err(e) => {
                warn!("Resolver lookup for {} failed: {}", name, e);
                Some(ContentHash::error(e.to_string()))
            }
        }
    }

    /// Value of the pre-contenthash `content(bytes32)` accessor
    pub async fn get_old_content(&self, name: &str) -> Result<Option<ContentHash>> {
        match self.resolver_for(name).await? {
            Some(resolver) => self.old_content_at(resolver, namehash(name)).await,
            None => Ok(None),
        }
    }

    /// Whether the name's resolver implements wildcard resolution
    pub async fn supports_wildcard(&self, name: &str) -> Result<bool> {
        match self.resolver_for(name).await? {
            Some(resolver) => self.supports_interface_at(resolver, WILDCARD_INTERFACE).await,
            None => Ok(false),
        }
    }

    /// Set the default address record
    pub async fn set_address(&self, name: &str, address: Address) -> Result<PendingTransaction> {
        let resolver = self.require_resolver(name).await?;
        self.send_at(resolver, &resolver::set_addr(namehash(name), address))
            .await
    }

    /// Set a multi-coin address record
    pub async fn set_coin_address(
        &self,
        name: &str,
        coin_type: u64,
        address: Vec<u8>,
    ) -> Result<PendingTransaction> {
        let resolver = self.require_resolver(name).await?;
        self.send_at(
            resolver,
            &resolver::set_coin_addr(namehash(name), coin_type, address),
        )
        .await
    }

    /// Set a text record
    pub async fn set_text(&self, name: &str, key: &str, value: &str) -> Result<PendingTransaction> {
        let resolver = self.require_resolver(name).await?;
        self.send_at(resolver, &resolver::set_text(namehash(name), key, value))
            .await
    }

    /// Set the content record from a `<scheme>://<value>` URI.
    ///
    /// An empty string, `0x`, or an all-zero hex string clears the record.
    pub async fn set_content(&self, name: &str, uri: &str) -> Result<PendingTransaction> {
        let encoded = if is_empty_content(uri) {
            EncodedContentHash::empty()
        } else {
            encode_content(uri)?
        };
        let resolver = self.require_resolver(name).await?;
        debug!("Setting content of {} to {}", name, encoded);
        self.send_at(
            resolver,
            &resolver::set_contenthash(namehash(name), encoded.into_bytes()),
        )
        .await
    }

    /// Write the `name` record of `node_name`, as used by reverse nodes
    pub async fn set_name_record(&self, node_name: &str, name: &str) -> Result<PendingTransaction> {
        let resolver = self.require_resolver(node_name).await?;
        self.send_at(resolver, &resolver::set_name(namehash(node_name), name))
            .await
    }

    /// Snapshot of owner, resolver, address and content for `name`.
    ///
    /// Owner and resolver are read concurrently. Address and content are only
    /// read, again concurrently, when a resolver exists. A failed resolver
    /// lookup is logged and reported as no resolver; a failed owner read fails
    /// the snapshot.
    pub async fn get_domain_details(&self, name: &str) -> Result<DomainDetails> {
        let (label, parent) = split_name(name);
        let node = namehash(name);

        let (owner, resolver) =
            tokio::join!(self.registry.owner_of(node), self.resolver_for(name));
        let owner = owner?;
        let resolver = resolver.unwrap_or_else(|e| {
            warn!("Resolver lookup failed for {}: {}", name, e);
            None
        });

        let (addr, content) = match resolver {
            Some(resolver) => {
                let (addr, content) = tokio::join!(
                    self.address_at(resolver, node),
                    self.content_at(resolver, node)
                );
                match addr {
                    Ok(addr) => (Some(addr), content),
                    Err(e) => {
                        warn!("Resolver {} failed for {}: {}", resolver, name, e);
                        (Some(Address::ZERO), Some(ContentHash::error("0x0")))
                    }
                }
            }
            None => (None, None),
        };

        Ok(DomainDetails {
            name: name.to_string(),
            label_hash: label.hash(),
            label,
            parent: parent.to_string(),
            owner,
            resolver: resolver.unwrap_or(Address::ZERO),
            addr,
            content,
        })
    }

    /// Canonical name of `address` via the transport's reverse lookup
    pub async fn get_reverse_name(&self, address: Address) -> Result<Option<String>> {
        Ok(self.transport.reverse_lookup(address).await?)
    }
}

fn is_empty_content(uri: &str) -> bool {
    let uri = uri.trim();
    match uri.strip_prefix("0x") {
        Some(digits) => digits.bytes().all(|b| b == b'0'),
        None => uri.is_empty(),
    }
}

impl std::fmt::Debug for ResolverRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverRouter")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}
