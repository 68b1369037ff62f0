//! Certificate Store Role Resolution
//!
//! Classifies the certificates returned by a CA or RA during an enrollment
//! exchange into the three roles a client needs: the message **signer**, the
//! message **recipient**, and the certificate **issuer**.
//!
//! Resolution relies only on the basic-constraints and key-usage extensions.
//! It never validates chains, verifies signatures or touches private keys.
//!
//! ```no_run
//! use std::sync::Arc;
//! use certstore_roles::{CertificateCollection, FileCertStore, ResolutionCache};
//!
//! let cache: ResolutionCache = ResolutionCache::new();
//! let store: Arc<dyn CertificateCollection> =
//!     Arc::new(FileCertStore::new(vec!["ca-certs.pem".into()]));
//! let roles = cache.get_or_resolve(&store)?;
//! println!("encrypt to {}", roles.recipient());
//! # Ok::<(), certstore_roles::ResolveError>(())
//! ```

pub mod adapters;
pub mod domain;
pub mod infra;
pub mod pipelines;
pub mod services;

#[cfg(test)]
mod test_fixtures;

pub use adapters::file_store::{load_certificates, parse_certificates, FileCertStore};
pub use adapters::memory_store::MemoryCertStore;
pub use domain::collection::CertificateCollection;
pub use domain::constants::{CA_PATH_LENGTH, KEY_USAGE_LENGTH};
pub use domain::roles::{Role, RoleSet, RoleSetSummary};
pub use domain::selector::{CertSelector, ConstraintFilter};
pub use domain::x509::{
    CaConstraint, CertificateSummary, CertificateView, KeyUsageBit, KeyUsageFlags,
};
pub use infra::config::{ConfigManager, ExportFormat, InspectorConfiguration, OutputFormat};
pub use infra::error::{InspectorError, InspectorResult, QueryError, ResolveError, ResolveResult};
pub use pipelines::inspect::{InspectWorkflow, InspectionReport};
pub use services::{ResolutionCache, RoleResolver};

/// Resolve the roles of `collection` without caching.
pub fn resolve<C: CertificateCollection + ?Sized>(collection: &C) -> ResolveResult<RoleSet> {
    RoleResolver::resolve(collection)
}
