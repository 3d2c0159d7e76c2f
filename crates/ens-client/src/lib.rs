//! Async naming client
//!
//! Registry reads and writes, resolver routing with typed record access,
//! base-registrar lookups, and subdomain/reverse-record workflows. All ledger access goes through an
//! injected [`Transport`]; nothing here holds global provider or signer state.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod contracts;
pub mod ens;
pub mod error;
pub mod registrar;
pub mod registry;
pub mod resolver;
pub mod subdomain;
pub mod transport;

pub use config::EnsConfig;
pub use ens::Ens;
pub use error::{Error, Result};
pub use registrar::{token_id, BaseInfo, RegistrarClient, Registration};
pub use registry::RegistryClient;
pub use resolver::{DomainDetails, ResolverRouter};
pub use subdomain::{reverse_node_name, Subdomain, SubdomainManager, GAS_LIMIT_MULTIPLIER, REVERSE_ROOT};
pub use transport::{
    ContractCall, LogEntry, LogFilter, PendingTransaction, Token, Transport, TransportError,
    TransportResult, TxOverrides,
};
