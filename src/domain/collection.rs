//! Certificate collection seam.

use std::sync::Arc;

use crate::domain::selector::CertSelector;
use crate::domain::x509::CertificateView;
use crate::infra::error::QueryError;

/// An unordered multiset of certificates that can be filtered by selector.
///
/// Implementations must return matches in an order that stays stable across
/// repeated queries of the same, unchanged collection. No particular order is
/// otherwise required; callers taking the first match get *a* qualifying
/// certificate, consistently.
pub trait CertificateCollection: Send + Sync {
    /// Return every certificate matching `selector`.
    ///
    /// An empty vector means nothing matched; `Err` means the underlying store
    /// could not be read.
    fn query(&self, selector: &CertSelector) -> Result<Vec<Arc<CertificateView>>, QueryError>;
}

impl<T: CertificateCollection + ?Sized> CertificateCollection for Arc<T> {
    fn query(&self, selector: &CertSelector) -> Result<Vec<Arc<CertificateView>>, QueryError> {
        (**self).query(selector)
    }
}
