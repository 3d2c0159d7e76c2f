//! Contract call descriptions
//!
//! The contract interfaces are declared once in Solidity syntax; selectors,
//! canonical signatures and the `NewOwner` topic all come from those
//! declarations. One builder per method the client uses, grouped by
//! contract. The transport turns these into ABI-encoded calldata.

use crate::transport::{ContractCall, LogEntry, Token};
use crate::{Error, Result};
use alloy_primitives::U256;
use alloy_sol_types::{SolCall, SolEvent};
use ens_core::{Address, LabelHash, NodeHash};

/// Solidity interfaces of the registry, resolver profiles and registrars
#[allow(missing_docs)]
pub mod abi {
    use alloy_sol_types::sol;

    sol! {
        /// ENS registry
        interface EnsRegistry {
            event NewOwner(bytes32 indexed node, bytes32 indexed label, address owner);

            function owner(bytes32 node) external view returns (address);
            function resolver(bytes32 node) external view returns (address);
            function ttl(bytes32 node) external view returns (uint64);
            function recordExists(bytes32 node) external view returns (bool);
            function setOwner(bytes32 node, address owner) external;
            function setSubnodeOwner(bytes32 node, bytes32 label, address owner) external returns (bytes32);
            function setSubnodeRecord(
                bytes32 node,
                bytes32 label,
                address owner,
                address resolver,
                uint64 ttl
            ) external;
            function setResolver(bytes32 node, address resolver) external;
        }

        /// ERC-165 introspection
        interface Erc165 {
            function supportsInterface(bytes4 interfaceID) external view returns (bool);
        }

        /// Ledger-native address profile
        interface AddrResolver {
            function addr(bytes32 node) external view returns (address);
            function setAddr(bytes32 node, address a) external;
        }

        /// Multi-coin address profile
        interface AddressResolver {
            function addr(bytes32 node, uint256 coinType) external view returns (bytes);
            function setAddr(bytes32 node, uint256 coinType, bytes a) external;
        }

        /// Content hash profile
        interface ContentHashResolver {
            function contenthash(bytes32 node) external view returns (bytes);
            function setContenthash(bytes32 node, bytes hash) external;
        }

        /// Pre-contenthash resolvers
        interface LegacyContentResolver {
            function content(bytes32 node) external view returns (bytes32);
        }

        /// Text record profile
        interface TextResolver {
            function text(bytes32 node, string key) external view returns (string);
            function setText(bytes32 node, string key, string value) external;
        }

        /// Reverse name profile
        interface NameResolver {
            function setName(bytes32 node, string newName) external;
        }

        /// Wildcard resolution extension
        interface ExtendedResolver {
            function resolve(bytes name, bytes data) external view returns (bytes);
        }

        /// Reverse registrar
        interface ReverseRegistrar {
            function setName(string name) external returns (bytes32);
        }

        /// Token-based registrar of second-level names
        interface BaseRegistrar {
            function nameExpires(uint256 id) external view returns (uint256);
            function ownerOf(uint256 tokenId) external view returns (address);
            function balanceOf(address owner) external view returns (uint256);
            function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);
            function nameOf(uint256 tokenId) external view returns (string);
            function tld() external view returns (string);
        }
    }
}

use abi::{
    AddrResolver, AddressResolver, BaseRegistrar, ContentHashResolver, EnsRegistry, Erc165,
    ExtendedResolver, LegacyContentResolver, NameResolver, ReverseRegistrar, TextResolver,
};

/// ERC-165 id of `contenthash(bytes32)`
pub const CONTENTHASH_INTERFACE: [u8; 4] = ContentHashResolver::contenthashCall::SELECTOR;

/// ERC-165 id of the wildcard `resolve(bytes,bytes)` extension
pub const WILDCARD_INTERFACE: [u8; 4] = ExtendedResolver::resolveCall::SELECTOR;

/// Registry methods
pub mod registry {
    use super::*;

    /// `owner(bytes32)`
    pub fn owner(node: NodeHash) -> ContractCall {
        ContractCall::of::<EnsRegistry::ownerCall>(vec![node.into()])
    }

    /// `resolver(bytes32)`
    pub fn resolver(node: NodeHash) -> ContractCall {
        ContractCall::of::<EnsRegistry::resolverCall>(vec![node.into()])
    }

    /// `ttl(bytes32)`
    pub fn ttl(node: NodeHash) -> ContractCall {
        ContractCall::of::<EnsRegistry::ttlCall>(vec![node.into()])
    }

    /// `recordExists(bytes32)`
    pub fn record_exists(node: NodeHash) -> ContractCall {
        ContractCall::of::<EnsRegistry::recordExistsCall>(vec![node.into()])
    }

    /// `setOwner(bytes32,address)`
    pub fn set_owner(node: NodeHash, owner: Address) -> ContractCall {
        ContractCall::of::<EnsRegistry::setOwnerCall>(vec![node.into(), owner.into()])
    }

    /// `setSubnodeOwner(bytes32,bytes32,address)`
    pub fn set_subnode_owner(parent: NodeHash, label: LabelHash, owner: Address) -> ContractCall {
        ContractCall::of::<EnsRegistry::setSubnodeOwnerCall>(vec![
            parent.into(),
            label.into(),
            owner.into(),
        ])
    }

    /// `setSubnodeRecord(bytes32,bytes32,address,address,uint64)`
    pub fn set_subnode_record(
        parent: NodeHash,
        label: LabelHash,
        owner: Address,
        resolver: Address,
        ttl: u64,
    ) -> ContractCall {
        ContractCall::of::<EnsRegistry::setSubnodeRecordCall>(vec![
            parent.into(),
            label.into(),
            owner.into(),
            resolver.into(),
            ttl.into(),
        ])
    }

    /// `setResolver(bytes32,address)`
    pub fn set_resolver(node: NodeHash, resolver: Address) -> ContractCall {
        ContractCall::of::<EnsRegistry::setResolverCall>(vec![node.into(), resolver.into()])
    }
}

/// Resolver methods
pub mod resolver {
    use super::*;

    /// `addr(bytes32)`
    pub fn addr(node: NodeHash) -> ContractCall {
        ContractCall::of::<AddrResolver::addrCall>(vec![node.into()])
    }

    /// `addr(bytes32,uint256)`
    pub fn coin_addr(node: NodeHash, coin_type: u64) -> ContractCall {
        ContractCall::of::<AddressResolver::addrCall>(vec![node.into(), coin_type.into()])
    }

    /// `contenthash(bytes32)`
    pub fn contenthash(node: NodeHash) -> ContractCall {
        ContractCall::of::<ContentHashResolver::contenthashCall>(vec![node.into()])
    }

    /// `content(bytes32)`, the pre-contenthash accessor
    pub fn content(node: NodeHash) -> ContractCall {
        ContractCall::of::<LegacyContentResolver::contentCall>(vec![node.into()])
    }

    /// `text(bytes32,string)`
    pub fn text(node: NodeHash, key: &str) -> ContractCall {
        ContractCall::of::<TextResolver::textCall>(vec![
            node.into(),
            Token::String(key.to_string()),
        ])
    }

    /// `supportsInterface(bytes4)`
    pub fn supports_interface(interface_id: [u8; 4]) -> ContractCall {
        ContractCall::of::<Erc165::supportsInterfaceCall>(vec![Token::FixedBytes(
            interface_id.to_vec(),
        )])
    }

    /// `setAddr(bytes32,address)`
    pub fn set_addr(node: NodeHash, address: Address) -> ContractCall {
        ContractCall::of::<AddrResolver::setAddrCall>(vec![node.into(), address.into()])
    }

    /// `setAddr(bytes32,uint256,bytes)`
    pub fn set_coin_addr(node: NodeHash, coin_type: u64, address: Vec<u8>) -> ContractCall {
        ContractCall::of::<AddressResolver::setAddrCall>(vec![
            node.into(),
            coin_type.into(),
            Token::Bytes(address),
        ])
    }

    /// `setContenthash(bytes32,bytes)`
    pub fn set_contenthash(node: NodeHash, hash: Vec<u8>) -> ContractCall {
        ContractCall::of::<ContentHashResolver::setContenthashCall>(vec![
            node.into(),
            Token::Bytes(hash),
        ])
    }

    /// `setText(bytes32,string,string)`
    pub fn set_text(node: NodeHash, key: &str, value: &str) -> ContractCall {
        ContractCall::of::<TextResolver::setTextCall>(vec![
            node.into(),
            Token::String(key.to_string()),
            Token::String(value.to_string()),
        ])
    }

    /// `setName(bytes32,string)`
    pub fn set_name(node: NodeHash, name: &str) -> ContractCall {
        ContractCall::of::<NameResolver::setNameCall>(vec![
            node.into(),
            Token::String(name.to_string()),
        ])
    }
}

/// Reverse registrar methods
pub mod reverse_registrar {
    use super::*;

    /// `setName(string)`
    pub fn set_name(name: &str) -> ContractCall {
        ContractCall::of::<ReverseRegistrar::setNameCall>(vec![Token::String(name.to_string())])
    }
}

/// Base registrar methods. Names are ERC-721 tokens keyed by a 256-bit id.
pub mod base_registrar {
    use super::*;

    /// `nameExpires(uint256)`
    pub fn name_expires(id: U256) -> ContractCall {
        ContractCall::of::<BaseRegistrar::nameExpiresCall>(vec![Token::Uint(id)])
    }

    /// `ownerOf(uint256)`
    pub fn owner_of(id: U256) -> ContractCall {
        ContractCall::of::<BaseRegistrar::ownerOfCall>(vec![Token::Uint(id)])
    }

    /// `balanceOf(address)`
    pub fn balance_of(owner: Address) -> ContractCall {
        ContractCall::of::<BaseRegistrar::balanceOfCall>(vec![owner.into()])
    }

    /// `tokenOfOwnerByIndex(address,uint256)`
    pub fn token_of_owner_by_index(owner: Address, index: u64) -> ContractCall {
        ContractCall::of::<BaseRegistrar::tokenOfOwnerByIndexCall>(vec![
            owner.into(),
            index.into(),
        ])
    }

    /// `nameOf(uint256)`
    pub fn name_of(id: U256) -> ContractCall {
        ContractCall::of::<BaseRegistrar::nameOfCall>(vec![Token::Uint(id)])
    }

    /// `tld()`
    pub fn tld() -> ContractCall {
        ContractCall::of::<BaseRegistrar::tldCall>(vec![])
    }
}

/// Decoded `NewOwner` event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOwnerEvent {
    /// Parent node
    pub node: NodeHash,
    /// Label hash of the child
    pub label: LabelHash,
    /// New owner, if the data word was present
    pub owner: Option<Address>,
    /// Block height of the log
    pub block_number: u64,
    /// Position within the block
    pub log_index: u64,
}

impl NewOwnerEvent {
    /// Topic 0 of the event
    pub fn topic() -> [u8; 32] {
        EnsRegistry::NewOwner::SIGNATURE_HASH.0
    }

    /// Decode a raw log; `None` if it is not a `NewOwner` log
    pub fn from_log(log: &LogEntry) -> Option<Self> {
        if log.topics.len() != 3 || log.topics[0] != Self::topic() {
            return None;
        }
        let owner = match log.data.get(12..32) {
            Some(word) => Address::from_slice(word).ok(),
            None => None,
        };
        Some(Self {
            node: NodeHash::new(log.topics[1]),
            label: LabelHash::new(log.topics[2]),
            owner,
            block_number: log.block_number,
            log_index: log.log_index,
        })
    }
}

fn unexpected(call: &ContractCall, expected: &'static str) -> Error {
    Error::UnexpectedReturn {
        method: call.method().to_string(),
        expected,
    }
}

/// Read an `address` return value
pub(crate) fn returned_address(call: &ContractCall, token: Token) -> Result<Address> {
    token.into_address().ok_or_else(|| unexpected(call, "address"))
}

/// Read a `bytes` return value
pub(crate) fn returned_bytes(call: &ContractCall, token: Token) -> Result<Vec<u8>> {
    token.into_bytes().ok_or_else(|| unexpected(call, "bytes"))
}

/// Read a `bytes32` return value
pub(crate) fn returned_word(call: &ContractCall, token: Token) -> Result<[u8; 32]> {
    token.into_word().ok_or_else(|| unexpected(call, "bytes32"))
}

/// Read a `string` return value
pub(crate) fn returned_string(call: &ContractCall, token: Token) -> Result<String> {
    token.into_string().ok_or_else(|| unexpected(call, "string"))
}

/// Read a `uint` return value
pub(crate) fn returned_uint(call: &ContractCall, token: Token) -> Result<U256> {
    token.into_uint().ok_or_else(|| unexpected(call, "uint"))
}

/// Read a `uint` return value that must fit in 64 bits
pub(crate) fn returned_u64(call: &ContractCall, token: Token) -> Result<u64> {
    token.into_u64().ok_or_else(|| unexpected(call, "uint64"))
}

/// Read a `bool` return value
pub(crate) fn returned_bool(call: &ContractCall, token: Token) -> Result<bool> {
    token.into_bool().ok_or_else(|| unexpected(call, "bool"))
}
