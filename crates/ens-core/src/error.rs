//! Error types for the naming core
//!
//! Every fallible pure operation (parsing addresses and hashes, encoding
//! content URIs) reports through this taxonomy. Content *decoding* never
//! fails; it produces an error-typed [`ContentHash`](crate::ContentHash).

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Naming core errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid 32-byte hash
    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    /// Content URI uses a scheme with no known codec
    #[error("Unsupported content scheme: {0}")]
    UnsupportedScheme(String),

    /// Content value does not fit its protocol's format
    #[error("Invalid content: {0}")]
    InvalidContent(String),
}
