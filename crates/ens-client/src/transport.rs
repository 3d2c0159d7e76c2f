//! Connectivity layer seam
//!
//! Everything that touches the ledger goes through [`Transport`]: view calls,
//! signed transactions, gas estimation, log queries and the provider's own
//! name lookups. ABI encoding, signing, and chain selection all live behind
//! this trait; the client only describes calls as a declared Solidity method
//! plus typed arguments.

use alloy_primitives::U256;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use ens_core::{Address, LabelHash, NodeHash};
use serde::{Deserialize, Serialize};

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The transport does not offer this capability
    #[error("Unsupported by transport: {0}")]
    Unsupported(String),

    /// RPC error
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Contract execution reverted
    #[error("Execution reverted: {0}")]
    Reverted(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),
}

/// Result type for transport calls
pub type TransportResult<T> = std::result::Result<T, TransportError>;

/// Typed call argument or return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `address`
    Address(Address),
    /// `bytesN`
    FixedBytes(Vec<u8>),
    /// `bytes`
    Bytes(Vec<u8>),
    /// `string`
    String(String),
    /// `uintN`
    Uint(U256),
    /// `bool`
    Bool(bool),
}

impl From<Address> for Token {
    fn from(value: Address) -> Self {
        Token::Address(value)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token::Uint(U256::from(value))
    }
}

impl From<NodeHash> for Token {
    fn from(value: NodeHash) -> Self {
        Token::FixedBytes(value.as_bytes().to_vec())
    }
}

impl From<LabelHash> for Token {
    fn from(value: LabelHash) -> Self {
        Token::FixedBytes(value.as_bytes().to_vec())
    }
}

impl Token {
    /// Short type name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Address(_) => "address",
            Token::FixedBytes(_) => "fixed bytes",
            Token::Bytes(_) => "bytes",
            Token::String(_) => "string",
            Token::Uint(_) => "uint",
            Token::Bool(_) => "bool",
        }
    }

    /// Extract an address
    pub fn into_address(self) -> Option<Address> {
        match self {
            Token::Address(a) => Some(a),
            _ => None,
        }
    }

    /// Extract dynamic or fixed bytes
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Token::Bytes(b) | Token::FixedBytes(b) => Some(b),
            _ => None,
        }
    }

    /// Extract a 32-byte word
    pub fn into_word(self) -> Option<[u8; 32]> {
        match self {
            Token::FixedBytes(b) => b.try_into().ok(),
            _ => None,
        }
    }

    /// Extract a string
    pub fn into_string(self) -> Option<String> {
        match self {
            Token::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract an unsigned integer
    pub fn into_uint(self) -> Option<U256> {
        match self {
            Token::Uint(n) => Some(n),
            _ => None,
        }
    }

    /// Extract an unsigned integer that fits in 64 bits
    pub fn into_u64(self) -> Option<u64> {
        self.into_uint().and_then(|n| u64::try_from(n).ok())
    }

    /// Extract a boolean
    pub fn into_bool(self) -> Option<bool> {
        match self {
            Token::Bool(b) => Some(b),
            _ => None,
        }
    }
}

/// A contract method invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Canonical signature, e.g. `setText(bytes32,string,string)`
    pub signature: &'static str,
    selector: [u8; 4],
    /// Arguments in declaration order
    pub args: Vec<Token>,
}

impl ContractCall {
    /// Describe a call to the declared method `C`
    pub fn of<C: SolCall>(args: Vec<Token>) -> Self {
        Self {
            signature: C::SIGNATURE,
            selector: C::SELECTOR,
            args,
        }
    }

    /// 4-byte selector
    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    /// Method name without the parameter list
    pub fn method(&self) -> &'static str {
        self.signature
            .split_once('(')
            .map(|(name, _)| name)
            .unwrap_or(self.signature)
    }
}

/// Caller-supplied transaction parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOverrides {
    /// Gas limit
    pub gas_limit: Option<u64>,
    /// Gas price in wei
    pub gas_price: Option<u64>,
    /// Value in wei
    pub value: Option<u64>,
    /// Explicit nonce
    pub nonce: Option<u64>,
}

/// Handle to a submitted, unconfirmed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Transaction hash
    pub hash: [u8; 32],
}

impl PendingTransaction {
    /// `0x`-prefixed transaction hash
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }
}

/// Log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// Emitting contract
    pub address: Address,
    /// Topic constraints by position; `None` matches anything
    pub topics: Vec<Option<[u8; 32]>>,
    /// First block, inclusive
    pub from_block: u64,
    /// Last block, inclusive; `None` means latest
    pub to_block: Option<u64>,
}

/// Raw log entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics, topic 0 is the event signature
    pub topics: Vec<[u8; 32]>,
    /// Non-indexed data
    pub data: Vec<u8>,
    /// Block height
    pub block_number: u64,
    /// Position within the block
    pub log_index: u64,
}

/// Connectivity collaborator
#[async_trait]
pub trait Transport: Send + Sync {
    /// Read-only contract call
    async fn call(&self, to: Address, call: &ContractCall) -> TransportResult<Token>;

    /// Sign with the current signer and submit; does not wait for confirmation
    async fn send(
        &self,
        to: Address,
        call: &ContractCall,
        overrides: &TxOverrides,
    ) -> TransportResult<PendingTransaction>;

    /// Estimate gas for a call from the current signer
    async fn estimate_gas(&self, to: Address, call: &ContractCall) -> TransportResult<u64>;

    /// Query historical logs
    async fn get_logs(&self, filter: &LogFilter) -> TransportResult<Vec<LogEntry>>;

    /// Provider-native resolver discovery, possibly with wildcard resolution.
    /// `Ok(None)` means the name has no resolver.
    async fn resolve_resolver_address(&self, _name: &str) -> TransportResult<Option<Address>> {
        Err(TransportError::Unsupported("resolver discovery".to_string()))
    }

    /// Provider-native reverse lookup
    async fn reverse_lookup(&self, address: Address) -> TransportResult<Option<String>>;

    /// Account that signs transactions
    async fn current_signer(&self) -> TransportResult<Address>;

    /// Numeric network id
    async fn current_network_id(&self) -> TransportResult<u64>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_call_method() {
        let call = ContractCall::of::<crate::contracts::abi::TextResolver::textCall>(vec![]);
        assert_eq!(call.method(), "text");
        assert_eq!(hex::encode(call.selector()), "59d1d43c");
    }

    #[test]
    fn test_token_conversions() {
        let node = NodeHash::new([1u8; 32]);
        assert_eq!(Token::from(node).into_word(), Some([1u8; 32]));
        assert_eq!(Token::Bytes(vec![1, 2]).into_word(), None);
        assert_eq!(Token::from(7u64).into_u64(), Some(7));
        assert_eq!(Token::from(7u64).into_string(), None);
        assert_eq!(Token::Uint(U256::MAX).into_u64(), None);
        assert_eq!(Token::Uint(U256::MAX).into_uint(), Some(U256::MAX));
        assert_eq!(Token::Bool(true).kind(), "bool");
        assert_eq!(
            Token::Address(Address::ZERO).into_address(),
            Some(Address::ZERO)
        );
    }

    #[test]
    fn test_pending_transaction_hex() {
        let tx = PendingTransaction { hash: [0xab; 32] };
        assert_eq!(tx.hash_hex(), format!("0x{}", "ab".repeat(32)));
    }
}
