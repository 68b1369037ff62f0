//! Trust roles and the resolved role set.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::x509::{CertificateSummary, CertificateView};

/// The three roles a certificate can fill in a CA/RA exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Verifies protocol message signatures.
    Signer,
    /// Receives messages encrypted to its key.
    Recipient,
    /// Certificate authority that issues certificates.
    Issuer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Signer, Role::Recipient, Role::Issuer];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Signer => "signer",
            Role::Recipient => "recipient",
            Role::Issuer => "issuer",
        }
    }

    /// Long-form label used in diagnostics.
    #[must_use]
    pub fn description(self) -> &'static str {
        match self {
            Role::Signer => "message signing entity",
            Role::Recipient => "recipient entity",
            Role::Issuer => "issuing entity",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signer, recipient and issuer certificates drawn from one collection.
///
/// Holds shared references into the collection; certificate data is never
/// copied. Immutable once built.
#[derive(Clone)]
pub struct RoleSet {
    signer: Arc<CertificateView>,
    recipient: Arc<CertificateView>,
    issuer: Arc<CertificateView>,
}

impl RoleSet {
    #[must_use]
    pub fn new(
        signer: Arc<CertificateView>,
        recipient: Arc<CertificateView>,
        issuer: Arc<CertificateView>,
    ) -> Self {
        Self {
            signer,
            recipient,
            issuer,
        }
    }

    #[must_use]
    pub fn signer(&self) -> &Arc<CertificateView> {
        &self.signer
    }

    #[must_use]
    pub fn recipient(&self) -> &Arc<CertificateView> {
        &self.recipient
    }

    #[must_use]
    pub fn issuer(&self) -> &Arc<CertificateView> {
        &self.issuer
    }

    #[must_use]
    pub fn get(&self, role: Role) -> &Arc<CertificateView> {
        match role {
            Role::Signer => &self.signer,
            Role::Recipient => &self.recipient,
            Role::Issuer => &self.issuer,
        }
    }

    /// True when a single certificate fills all three roles, the usual
    /// shape of a CA that runs without a separate RA.
    #[must_use]
    pub fn is_single_authority(&self) -> bool {
        Arc::ptr_eq(&self.signer, &self.issuer) && Arc::ptr_eq(&self.recipient, &self.issuer)
    }

    #[must_use]
    pub fn summary(&self) -> RoleSetSummary {
        RoleSetSummary {
            signer: self.signer.summary(),
            recipient: self.recipient.summary(),
            issuer: self.issuer.summary(),
        }
    }
}

impl fmt::Debug for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleSet")
            .field("signer", &format_args!("{}", self.signer))
            .field("recipient", &format_args!("{}", self.recipient))
            .field("issuer", &format_args!("{}", self.issuer))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleSetSummary {
    pub signer: CertificateSummary,
    pub recipient: CertificateSummary,
    pub issuer: CertificateSummary,
}
