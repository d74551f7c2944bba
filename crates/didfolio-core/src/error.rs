//! Error types for didfolio

use thiserror::Error;

/// Main error type for didfolio operations
#[derive(Error, Debug)]
pub enum FolioError {
    /// No signer capability is available to request accounts from
    #[error("Signer unavailable: {0}")]
    SignerUnavailable(String),

    /// The external party declined the account or signing request
    #[error("User rejected request: {0}")]
    UserRejected(String),

    /// The signature challenge was rejected or did not verify
    #[error("Authentication denied: {0}")]
    AuthenticationDenied(String),

    /// The DID document could not be resolved
    #[error("Resolver error: {0}")]
    ResolverError(String),

    /// The authentication handshake timed out on the signer's side
    #[error("Handshake timeout: {0}")]
    HandshakeTimeout(String),

    /// Transport failure talking to the document index
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The index returned data that does not conform to the expected shape
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// The session does not match the document owner
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Invalid DID format
    #[error("Invalid DID format: {0}")]
    InvalidDidFormat(String),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Database creation/opening error
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    /// Transaction error
    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// Table error
    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    /// Storage operation error
    #[error("Storage operation error: {0}")]
    StorageOp(#[from] redb::StorageError),

    /// Commit error
    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using FolioError
pub type FolioResult<T> = Result<T, FolioError>;
