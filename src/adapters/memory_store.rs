//! In-memory certificate collection.

use std::sync::Arc;

use crate::domain::collection::CertificateCollection;
use crate::domain::selector::CertSelector;
use crate::domain::x509::CertificateView;
use crate::infra::error::QueryError;

/// Insertion-ordered, immutable certificate collection. Queries never fail.
#[derive(Debug, Clone, Default)]
pub struct MemoryCertStore {
    certificates: Vec<Arc<CertificateView>>,
}

impl MemoryCertStore {
    #[must_use]
    pub fn new(certificates: Vec<CertificateView>) -> Self {
        Self {
            certificates: certificates.into_iter().map(Arc::new).collect(),
        }
    }

    /// Build from already shared views, keeping their identity.
    #[must_use]
    pub fn from_shared(certificates: Vec<Arc<CertificateView>>) -> Self {
        Self { certificates }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<CertificateView>> {
        self.certificates.iter()
    }
}

impl FromIterator<CertificateView> for MemoryCertStore {
    fn from_iter<I: IntoIterator<Item = CertificateView>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl CertificateCollection for MemoryCertStore {
    fn query(&self, selector: &CertSelector) -> Result<Vec<Arc<CertificateView>>, QueryError> {
        Ok(self
            .certificates
            .iter()
            .filter(|cert| selector.matches(cert))
            .cloned()
            .collect())
    }
}
