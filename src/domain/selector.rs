//! Certificate selection predicates.
//!
//! A [`CertSelector`] describes which certificates a collection query should
//! return. Selectors are plain values: they hold no reference to any
//! collection and can be reused across queries.

use std::fmt;

use crate::domain::constants::CA_PATH_LENGTH;
use crate::domain::x509::{CertificateView, KeyUsageBit, KeyUsageFlags};

/// Basic-constraints requirement of a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintFilter {
    /// CA whose path-length allowance is at least the given value.
    CaWithMinPathLen(u32),
    /// Certificates that are not a CA.
    EndEntityOnly,
}

/// Filter applied by [`CertificateCollection::query`](crate::CertificateCollection::query).
///
/// An empty selector (see [`CertSelector::any`]) matches every certificate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CertSelector {
    constraints: Option<ConstraintFilter>,
    key_usage: Option<KeyUsageFlags>,
}

impl CertSelector {
    /// Selector matching every certificate.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// CA certificates permitted to issue at least `min_path_len` further
    /// levels of CA below them.
    #[must_use]
    pub fn ca_with_path_len(min_path_len: u32) -> Self {
        Self {
            constraints: Some(ConstraintFilter::CaWithMinPathLen(min_path_len)),
            key_usage: None,
        }
    }

    /// The issuer test: any CA allowed to issue certificates.
    #[must_use]
    pub fn issuer() -> Self {
        Self::ca_with_path_len(CA_PATH_LENGTH)
    }

    /// End-entity certificates whose key may be used for `bit`.
    #[must_use]
    pub fn end_entity_with_key_usage(bit: KeyUsageBit) -> Self {
        Self {
            constraints: Some(ConstraintFilter::EndEntityOnly),
            key_usage: Some(bit.into()),
        }
    }

    #[must_use]
    pub fn constraints(&self) -> Option<ConstraintFilter> {
        self.constraints
    }

    #[must_use]
    pub fn key_usage(&self) -> Option<KeyUsageFlags> {
        self.key_usage
    }

    #[must_use]
    pub fn is_match_all(&self) -> bool {
        self.constraints.is_none() && self.key_usage.is_none()
    }

    /// Evaluate the selector against a certificate.
    ///
    /// A certificate without a key-usage extension has an unrestricted key
    /// and satisfies any key-usage requirement.
    #[must_use]
    pub fn matches(&self, cert: &CertificateView) -> bool {
        let constraints_ok = match self.constraints {
            None => true,
            Some(ConstraintFilter::EndEntityOnly) => !cert.is_ca(),
            Some(ConstraintFilter::CaWithMinPathLen(min)) => cert
                .basic_constraints()
                .path_len_allowance()
                .is_some_and(|allowance| allowance >= min),
        };
        if !constraints_ok {
            return false;
        }

        match (self.key_usage, cert.key_usage()) {
            (Some(required), Some(present)) => present.contains_all(required),
            _ => true,
        }
    }
}

impl fmt::Display for CertSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_match_all() {
            return f.write_str("any certificate");
        }
        let mut parts = Vec::new();
        match self.constraints {
            Some(ConstraintFilter::CaWithMinPathLen(min)) => {
                parts.push(format!("basicConstraints pathLen >= {min}"));
            }
            Some(ConstraintFilter::EndEntityOnly) => parts.push("end entity".to_string()),
            None => {}
        }
        if let Some(flags) = self.key_usage {
            for bit in flags.iter() {
                parts.push(format!("keyUsage:{bit}"));
            }
        }
        f.write_str(&parts.join(", "))
    }
}
