//! Error types

use crate::transport::TransportError;

/// Client errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No registry address is known for the network and none was supplied
    #[error("Unsupported network {0}: no registry address")]
    UnsupportedNetwork(u64),

    /// The name has no resolver, so a record cannot be written
    #[error("No resolver set for {0}")]
    ResolverAbsent(String),

    /// `addr.reverse` has no owner and the network table has no entry
    #[error("Reverse registrar not found")]
    ReverseRegistrarAbsent,

    /// No base registrar is configured or known for the network
    #[error("No base registrar for network {0}")]
    RegistrarAbsent(u64),

    /// Transport failure, passed through unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Hashing or content codec error
    #[error("Core error: {0}")]
    Core(#[from] ens_core::Error),

    /// A call returned a value of the wrong shape
    #[error("Unexpected return from {method}: expected {expected}")]
    UnexpectedReturn {
        /// Method name
        method: String,
        /// Expected token kind
        expected: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ens_params::Error> for Error {
    fn from(err: ens_params::Error) -> Self {
        match err {
            ens_params::Error::UnsupportedNetwork(id) => Error::UnsupportedNetwork(id),
        }
    }
}

impl Error {
    /// True if the failure came from the transport
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
