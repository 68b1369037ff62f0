//! Certificate domain types.
//!
//! Wraps `x509_cert::Certificate` together with the decoded basic-constraints
//! and key-usage extensions so the selectors never touch raw DER.

mod cert;
mod key_usage;

pub use cert::{CaConstraint, CertificateSummary, CertificateView};
pub use key_usage::{KeyUsageBit, KeyUsageFlags};
