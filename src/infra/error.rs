//! Error types for certificate inspection and role resolution.

use thiserror::Error;

use crate::domain::roles::Role;

/// Result type for role resolution
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Result type for loading, parsing and configuration operations
pub type InspectorResult<T> = Result<T, InspectorError>;

/// The underlying certificate store could not be read.
#[derive(Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
#[error("Certificate store query failed: {message}")]
#[diagnostic(code(certstore::query))]
pub struct QueryError {
    message: String,
}

impl QueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Failure to classify a collection. No partial role set is ever produced.
#[derive(Error, Debug, Clone, PartialEq, Eq, miette::Diagnostic)]
pub enum ResolveError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Query(#[from] QueryError),

    #[error("No CA certificates found for the {0} role")]
    #[diagnostic(
        code(certstore::not_found),
        help("the collection needs a certificate with basicConstraints cA=TRUE")
    )]
    NotFound(Role),
}

/// Crate-wide error for certificate loading, parsing and configuration
#[derive(Error, Debug, miette::Diagnostic)]
pub enum InspectorError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("ASN.1 encoding/decoding error: {0}")]
    Asn1Error(String),

    #[error("Invalid certificate: {0}")]
    InvalidCertificate(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolve(#[from] ResolveError),
}

impl From<der::Error> for InspectorError {
    fn from(error: der::Error) -> Self {
        InspectorError::Asn1Error(error.to_string())
    }
}

impl From<std::io::Error> for InspectorError {
    fn from(error: std::io::Error) -> Self {
        InspectorError::IoError(error.to_string())
    }
}

impl From<InspectorError> for QueryError {
    fn from(error: InspectorError) -> Self {
        QueryError::new(error.to_string())
    }
}
