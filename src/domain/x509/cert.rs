use std::fmt;

use der::oid::AssociatedOid;
use der::Decode;
use serde::Serialize;
use x509_cert::ext::pkix::{BasicConstraints, KeyUsage};
use x509_cert::Certificate;

use super::key_usage::{KeyUsageBit, KeyUsageFlags};
use crate::domain::constants::UNLIMITED_PATH_LENGTH;
use crate::infra::error::{InspectorError, InspectorResult};

/// CA status derived from the basic-constraints extension.
///
/// A certificate without the extension, or with `cA = FALSE`, is an end entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaConstraint {
    EndEntity,
    Ca { path_len: Option<u8> },
}

impl CaConstraint {
    #[must_use]
    pub fn is_ca(self) -> bool {
        matches!(self, CaConstraint::Ca { .. })
    }

    /// How many intermediate CAs may follow this certificate.
    ///
    /// `None` for end entities, [`UNLIMITED_PATH_LENGTH`] for a CA without a
    /// `pathLenConstraint`.
    #[must_use]
    pub fn path_len_allowance(self) -> Option<u32> {
        match self {
            CaConstraint::EndEntity => None,
            CaConstraint::Ca { path_len: None } => Some(UNLIMITED_PATH_LENGTH),
            CaConstraint::Ca {
                path_len: Some(len),
            } => Some(u32::from(len)),
        }
    }
}

impl From<&BasicConstraints> for CaConstraint {
    fn from(bc: &BasicConstraints) -> Self {
        if bc.ca {
            CaConstraint::Ca {
                path_len: bc.path_len_constraint,
            }
        } else {
            CaConstraint::EndEntity
        }
    }
}

/// Read-only view of a parsed X.509 certificate with the attributes the role
/// heuristics consult.
#[derive(Clone)]
pub struct CertificateView {
    certificate: Certificate,
    issuer: String,
    subject: String,
    serial_number: String,
    ca: CaConstraint,
    key_usage: Option<KeyUsageFlags>,
}

impl CertificateView {
    /// Parse a DER-encoded certificate.
    pub fn from_der(der: &[u8]) -> InspectorResult<Self> {
        let certificate = Certificate::from_der(der).map_err(|e| {
            InspectorError::InvalidCertificate(format!("Failed to parse certificate: {e}"))
        })?;
        Self::from_x509(certificate)
    }

    /// Wrap an already decoded certificate, decoding its basic-constraints and
    /// key-usage extensions.
    pub fn from_x509(certificate: Certificate) -> InspectorResult<Self> {
        let mut ca = CaConstraint::EndEntity;
        let mut key_usage = None;

        for ext in certificate.tbs_certificate.extensions.iter().flatten() {
            if ext.extn_id == BasicConstraints::OID {
                let bc = BasicConstraints::from_der(ext.extn_value.as_bytes())?;
                ca = CaConstraint::from(&bc);
            } else if ext.extn_id == KeyUsage::OID {
                let ku = KeyUsage::from_der(ext.extn_value.as_bytes())?;
                key_usage = Some(KeyUsageFlags::from_mask(ku.0.bits()));
            }
        }

        let issuer = certificate.tbs_certificate.issuer.to_string();
        let subject = certificate.tbs_certificate.subject.to_string();
        let serial_number = hex::encode(certificate.tbs_certificate.serial_number.as_bytes());

        Ok(Self {
            certificate,
            issuer,
            subject,
            serial_number,
            ca,
            key_usage,
        })
    }

    /// Issuer distinguished name in RFC 4514 form.
    #[must_use]
    pub fn issuer_name(&self) -> &str {
        &self.issuer
    }

    #[must_use]
    pub fn subject_name(&self) -> &str {
        &self.subject
    }

    /// Serial number as lowercase hex.
    #[must_use]
    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    #[must_use]
    pub fn basic_constraints(&self) -> CaConstraint {
        self.ca
    }

    #[must_use]
    pub fn is_ca(&self) -> bool {
        self.ca.is_ca()
    }

    /// Key-usage flags, `None` when the certificate has no key-usage extension.
    #[must_use]
    pub fn key_usage(&self) -> Option<KeyUsageFlags> {
        self.key_usage
    }

    #[must_use]
    pub fn as_x509(&self) -> &Certificate {
        &self.certificate
    }

    #[must_use]
    pub fn summary(&self) -> CertificateSummary {
        let path_len = match self.ca {
            CaConstraint::Ca { path_len } => path_len,
            CaConstraint::EndEntity => None,
        };
        CertificateSummary {
            subject: self.subject.clone(),
            issuer: self.issuer.clone(),
            serial_number: self.serial_number.clone(),
            is_ca: self.is_ca(),
            path_len,
            key_usage: self
                .key_usage
                .map(|flags| flags.iter().map(KeyUsageBit::as_str).collect()),
        }
    }
}

impl fmt::Debug for CertificateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CertificateView")
            .field("issuer", &self.issuer)
            .field("serial", &self.serial_number)
            .field("ca", &self.ca)
            .field("key_usage", &self.key_usage)
            .finish()
    }
}

impl fmt::Display for CertificateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[issuer={}; serial={}]", self.issuer, self.serial_number)
    }
}

/// Serializable digest of a certificate for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateSummary {
    pub subject: String,
    pub issuer: String,
    pub serial_number: String,
    pub is_ca: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_len: Option<u8>,
    pub key_usage: Option<Vec<&'static str>>,
}
