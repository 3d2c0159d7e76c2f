//! In-memory ledger used by the integration tests
//!
//! `MockLedger` answers registry, resolver and base-registrar calls from plain
//! maps and records every call, transaction and gas estimate so tests can
//! assert on traffic.

#![allow(dead_code)]

use alloy_primitives::U256;
use async_trait::async_trait;
use ens_client::{
    token_id, ContractCall, EnsConfig, LogEntry, LogFilter, PendingTransaction, Token, Transport,
    TransportError, TransportResult, TxOverrides,
};
use ens_core::{Address, NodeHash};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Registry address used by every test
pub const REGISTRY: Address = Address::new([0x11; 20]);
/// A resolver that answers
pub const RESOLVER: Address = Address::new([0x22; 20]);
/// A resolver whose calls all revert
pub const BROKEN_RESOLVER: Address = Address::new([0x33; 20]);
/// Reverse registrar
pub const REVERSE_REGISTRAR: Address = Address::new([0x44; 20]);
/// Transaction signer
pub const SIGNER: Address = Address::new([0x55; 20]);
/// Base registrar
pub const BASE_REGISTRAR: Address = Address::new([0x66; 20]);
/// Top-level name the base registrar issues under
pub const TLD: &str = "eth";

/// Config pointing at [`REGISTRY`]
pub fn config() -> EnsConfig {
    EnsConfig {
        registry_address: Some(REGISTRY),
        default_resolver: Some(RESOLVER),
        base_registrar: Some(BASE_REGISTRAR),
        ..Default::default()
    }
}

/// Registry slot
#[derive(Debug, Clone, Copy, Default)]
pub struct Record {
    pub owner: Address,
    pub resolver: Address,
    pub ttl: u64,
}

/// Resolver storage
#[derive(Debug, Clone, Default)]
pub struct ResolverState {
    pub addrs: HashMap<NodeHash, Address>,
    pub coin_addrs: HashMap<(NodeHash, u64), Vec<u8>>,
    pub contenthashes: HashMap<NodeHash, Vec<u8>>,
    pub old_content: HashMap<NodeHash, [u8; 32]>,
    pub texts: HashMap<(NodeHash, String), String>,
    pub legacy: bool,
}

/// Base registrar token
#[derive(Debug, Clone)]
pub struct Token721 {
    pub id: U256,
    pub label: String,
    pub owner: Address,
    pub expires: u64,
}

/// Submitted transaction
#[derive(Debug, Clone)]
pub struct SentTx {
    pub to: Address,
    pub call: ContractCall,
    pub overrides: TxOverrides,
}

#[derive(Default)]
struct State {
    records: HashMap<NodeHash, Record>,
    resolvers: HashMap<Address, ResolverState>,
    native_resolvers: Option<HashMap<String, Address>>,
    native_discovery_error: Option<TransportError>,
    tokens: Vec<Token721>,
    reverse_names: HashMap<Address, String>,
    logs: Vec<LogEntry>,
    calls: Vec<(Address, &'static str)>,
    sent: Vec<SentTx>,
    estimates: usize,
    gas_estimate: u64,
}

/// Recording in-memory transport
pub struct MockLedger {
    network_id: u64,
    state: Mutex<State>,
}

impl MockLedger {
    /// Empty ledger on `network_id` with a working [`RESOLVER`]
    pub fn new(network_id: u64) -> Arc<Self> {
        let mut state = State {
            gas_estimate: 50_000,
            ..Default::default()
        };
        state.resolvers.insert(RESOLVER, ResolverState::default());
        Arc::new(Self {
            network_id,
            state: Mutex::new(state),
        })
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        let mut state = self.state.lock().unwrap();
        f(&mut state)
    }

    pub fn set_record(&self, node: NodeHash, record: Record) {
        self.with_state(|s| {
            s.records.insert(node, record);
        });
    }

    pub fn with_resolver(&self, address: Address, f: impl FnOnce(&mut ResolverState)) {
        self.with_state(|s| f(s.resolvers.entry(address).or_default()));
    }

    /// Enable native resolver discovery with the given table
    pub fn set_native_resolver(&self, name: &str, resolver: Address) {
        self.with_state(|s| {
            s.native_resolvers
                .get_or_insert_with(HashMap::new)
                .insert(name.to_string(), resolver);
        });
    }

    /// Make native resolver discovery fail with `error`
    pub fn fail_native_discovery(&self, error: TransportError) {
        self.with_state(|s| s.native_discovery_error = Some(error));
    }

    /// Register `<label>.eth` on the base registrar
    pub fn register(&self, label: &str, owner: Address, expires: u64) -> U256 {
        let id = token_id(&format!("{}.{}", label, TLD));
        self.with_state(|s| {
            s.tokens.push(Token721 {
                id,
                label: label.to_string(),
                owner,
                expires,
            })
        });
        id
    }

    pub fn set_reverse_name(&self, address: Address, name: &str) {
        self.with_state(|s| {
            s.reverse_names.insert(address, name.to_string());
        });
    }

    pub fn push_log(&self, log: LogEntry) {
        self.with_state(|s| s.logs.push(log));
    }

    pub fn set_gas_estimate(&self, gas: u64) {
        self.with_state(|s| s.gas_estimate = gas);
    }

    /// Number of view calls with this signature
    pub fn call_count(&self, signature: &str) -> usize {
        self.with_state(|s| s.calls.iter().filter(|(_, sig)| *sig == signature).count())
    }

    /// Number of view calls made against `to`
    pub fn calls_to(&self, to: Address) -> usize {
        self.with_state(|s| s.calls.iter().filter(|(addr, _)| *addr == to).count())
    }

    pub fn sent(&self) -> Vec<SentTx> {
        self.with_state(|s| s.sent.clone())
    }

    pub fn estimate_count(&self) -> usize {
        self.with_state(|s| s.estimates)
    }
}

fn node_arg(call: &ContractCall) -> TransportResult<NodeHash> {
    call.args
        .first()
        .cloned()
        .and_then(Token::into_word)
        .map(NodeHash::new)
        .ok_or_else(|| TransportError::Rpc(format!("bad node argument to {}", call.signature)))
}

fn string_arg(call: &ContractCall, index: usize) -> TransportResult<String> {
    call.args
        .get(index)
        .cloned()
        .and_then(Token::into_string)
        .ok_or_else(|| TransportError::Rpc(format!("bad string argument to {}", call.signature)))
}

fn uint_arg(call: &ContractCall, index: usize) -> TransportResult<U256> {
    call.args
        .get(index)
        .cloned()
        .and_then(Token::into_uint)
        .ok_or_else(|| TransportError::Rpc(format!("bad uint argument to {}", call.signature)))
}

fn address_arg(call: &ContractCall, index: usize) -> TransportResult<Address> {
    call.args
        .get(index)
        .cloned()
        .and_then(Token::into_address)
        .ok_or_else(|| TransportError::Rpc(format!("bad address argument to {}", call.signature)))
}

fn registrar_call(state: &State, call: &ContractCall) -> TransportResult<Token> {
    let token = |id: U256| state.tokens.iter().find(|t| t.id == id);
    match call.signature {
        "tld()" => Ok(Token::String(TLD.to_string())),
        "nameExpires(uint256)" => Ok(Token::from(
            token(uint_arg(call, 0)?).map(|t| t.expires).unwrap_or(0),
        )),
        "ownerOf(uint256)" => token(uint_arg(call, 0)?)
            .map(|t| Token::Address(t.owner))
            .ok_or_else(|| TransportError::Reverted("ERC721: invalid token ID".to_string())),
        "nameOf(uint256)" => token(uint_arg(call, 0)?)
            .map(|t| Token::String(t.label.clone()))
            .ok_or_else(|| TransportError::Reverted("unknown token".to_string())),
        "balanceOf(address)" => {
            let owner = address_arg(call, 0)?;
            let count = state.tokens.iter().filter(|t| t.owner == owner).count();
            Ok(Token::from(count as u64))
        }
        "tokenOfOwnerByIndex(address,uint256)" => {
            let owner = address_arg(call, 0)?;
            let index = uint_arg(call, 1)?;
            state
                .tokens
                .iter()
                .filter(|t| t.owner == owner)
                .nth(u64::try_from(index).unwrap_or(u64::MAX) as usize)
                .map(|t| Token::Uint(t.id))
                .ok_or_else(|| TransportError::Reverted("owner index out of bounds".to_string()))
        }
        other => Err(TransportError::Reverted(format!("registrar has no {}", other))),
    }
}

fn registry_call(state: &State, call: &ContractCall) -> TransportResult<Token> {
    let record = state
        .records
        .get(&node_arg(call)?)
        .copied()
        .unwrap_or_default();
    match call.signature {
        "owner(bytes32)" => Ok(Token::Address(record.owner)),
        "resolver(bytes32)" => Ok(Token::Address(record.resolver)),
        "ttl(bytes32)" => Ok(Token::from(record.ttl)),
        "recordExists(bytes32)" => Ok(Token::Bool(!record.owner.is_zero())),
        other => Err(TransportError::Reverted(format!("registry has no {}", other))),
    }
}

fn resolver_call(resolver: &ResolverState, call: &ContractCall) -> TransportResult<Token> {
    match call.signature {
        "supportsInterface(bytes4)" => Ok(Token::Bool(!resolver.legacy)),
        "addr(bytes32)" => Ok(Token::Address(
            resolver
                .addrs
                .get(&node_arg(call)?)
                .copied()
                .unwrap_or_default(),
        )),
        "addr(bytes32,uint256)" => {
            let coin = call.args.get(1).cloned().and_then(Token::into_u64).unwrap_or(0);
            Ok(Token::Bytes(
                resolver
                    .coin_addrs
                    .get(&(node_arg(call)?, coin))
                    .cloned()
                    .unwrap_or_default(),
            ))
        }
        "contenthash(bytes32)" if resolver.legacy => {
            Err(TransportError::Reverted("contenthash not implemented".to_string()))
        }
        "contenthash(bytes32)" => Ok(Token::Bytes(
            resolver
                .contenthashes
                .get(&node_arg(call)?)
                .cloned()
                .unwrap_or_default(),
        )),
        "content(bytes32)" => Ok(Token::FixedBytes(
            resolver
                .old_content
                .get(&node_arg(call)?)
                .copied()
                .unwrap_or_default()
                .to_vec(),
        )),
        "text(bytes32,string)" => {
            let key = (node_arg(call)?, string_arg(call, 1)?);
            Ok(Token::String(
                resolver.texts.get(&key).cloned().unwrap_or_default(),
            ))
        }
        other => Err(TransportError::Reverted(format!("resolver has no {}", other))),
    }
}

#[async_trait]
impl Transport for MockLedger {
    async fn call(&self, to: Address, call: &ContractCall) -> TransportResult<Token> {
        self.with_state(|s| {
            s.calls.push((to, call.signature));
            if to == REGISTRY {
                return registry_call(s, call);
            }
            if to == BASE_REGISTRAR {
                return registrar_call(s, call);
            }
            if to == BROKEN_RESOLVER {
                return Err(TransportError::Reverted("execution reverted".to_string()));
            }
            match s.resolvers.get(&to) {
                Some(resolver) => resolver_call(resolver, call),
                None => Err(TransportError::Rpc(format!("no contract at {}", to))),
            }
        })
    }

    async fn send(
        &self,
        to: Address,
        call: &ContractCall,
        overrides: &TxOverrides,
    ) -> TransportResult<PendingTransaction> {
        self.with_state(|s| {
            s.sent.push(SentTx {
                to,
                call: call.clone(),
                overrides: overrides.clone(),
            });
            let mut hash = [0u8; 32];
            hash[31] = s.sent.len() as u8;
            Ok(PendingTransaction { hash })
        })
    }

    async fn estimate_gas(&self, _to: Address, _call: &ContractCall) -> TransportResult<u64> {
        self.with_state(|s| {
            s.estimates += 1;
            Ok(s.gas_estimate)
        })
    }

    async fn get_logs(&self, filter: &LogFilter) -> TransportResult<Vec<LogEntry>> {
        self.with_state(|s| {
            Ok(s.logs
                .iter()
                .filter(|log| log.address == filter.address)
                .filter(|log| log.block_number >= filter.from_block)
                .filter(|log| {
                    filter.topics.iter().enumerate().all(|(i, topic)| match topic {
                        Some(t) => log.topics.get(i) == Some(t),
                        None => true,
                    })
                })
                .cloned()
                .collect())
        })
    }

    async fn resolve_resolver_address(&self, name: &str) -> TransportResult<Option<Address>> {
        self.with_state(|s| {
            if let Some(error) = &s.native_discovery_error {
                return Err(error.clone());
            }
            match &s.native_resolvers {
                Some(table) => Ok(table.get(name).copied()),
                None => Err(TransportError::Unsupported("resolver discovery".to_string())),
            }
        })
    }

    async fn reverse_lookup(&self, address: Address) -> TransportResult<Option<String>> {
        self.with_state(|s| Ok(s.reverse_names.get(&address).cloned()))
    }

    async fn current_signer(&self) -> TransportResult<Address> {
        Ok(SIGNER)
    }

    async fn current_network_id(&self) -> TransportResult<u64> {
        Ok(self.network_id)
    }
}
