//! Role resolution service.
//!
//! Classifies a certificate collection into signer, recipient and issuer:
//!
//! - issuer: first CA whose basic constraints allow issuing (no fallback)
//! - signer: first end entity with `digitalSignature`, else the issuer
//! - recipient: first end entity with `keyEncipherment`, then
//!   `dataEncipherment`, else the issuer
//!
//! "First" means first in the collection's own query order.

use std::sync::Arc;

use crate::domain::collection::CertificateCollection;
use crate::domain::constants::CA_PATH_LENGTH;
use crate::domain::roles::{Role, RoleSet};
use crate::domain::selector::CertSelector;
use crate::domain::x509::{CertificateView, KeyUsageBit};
use crate::infra::error::{ResolveError, ResolveResult};

/// Key usages tried for the recipient, in order. `keyEncipherment` covers
/// RSA key transport, `dataEncipherment` other encryption-capable keys.
const RECIPIENT_KEY_USAGES: [KeyUsageBit; 2] =
    [KeyUsageBit::KeyEncipherment, KeyUsageBit::DataEncipherment];

const SIGNER_KEY_USAGE: KeyUsageBit = KeyUsageBit::DigitalSignature;

pub struct RoleResolver;

impl RoleResolver {
    /// Resolve all three roles. Either every role is filled or an error is
    /// returned; a query failure aborts immediately.
    pub fn resolve<C: CertificateCollection + ?Sized>(collection: &C) -> ResolveResult<RoleSet> {
        Self::log_inventory(collection)?;

        log::debug!("Looking for {}", Role::Recipient.description());
        let recipient = Self::find_recipient(collection)?;
        Self::log_choice(Role::Recipient, &recipient);

        log::debug!("Looking for {}", Role::Signer.description());
        let signer = Self::find_signer(collection)?;
        Self::log_choice(Role::Signer, &signer);

        log::debug!("Looking for {}", Role::Issuer.description());
        let issuer = Self::find_issuer(collection)?;
        Self::log_choice(Role::Issuer, &issuer);

        Ok(RoleSet::new(signer, recipient, issuer))
    }

    /// The certificate authority permitted to issue certificates.
    pub fn find_issuer<C: CertificateCollection + ?Sized>(
        collection: &C,
    ) -> ResolveResult<Arc<CertificateView>> {
        log::debug!("Selecting candidate with basicConstraints pathLen >= {CA_PATH_LENGTH}");
        Self::first_match(collection, &CertSelector::issuer())?
            .ok_or(ResolveError::NotFound(Role::Issuer))
    }

    /// The certificate verifying message signatures; the issuer stands in
    /// when no end entity is marked for digital signatures.
    pub fn find_signer<C: CertificateCollection + ?Sized>(
        collection: &C,
    ) -> ResolveResult<Arc<CertificateView>> {
        if let Some(cert) = Self::select_end_entity(collection, SIGNER_KEY_USAGE)? {
            return Ok(cert);
        }
        Self::find_issuer(collection)
    }

    /// The certificate messages are encrypted to; the issuer stands in when
    /// no end entity is marked for key or data encipherment.
    pub fn find_recipient<C: CertificateCollection + ?Sized>(
        collection: &C,
    ) -> ResolveResult<Arc<CertificateView>> {
        for bit in RECIPIENT_KEY_USAGES {
            if let Some(cert) = Self::select_end_entity(collection, bit)? {
                return Ok(cert);
            }
        }
        Self::find_issuer(collection)
    }

    fn select_end_entity<C: CertificateCollection + ?Sized>(
        collection: &C,
        bit: KeyUsageBit,
    ) -> ResolveResult<Option<Arc<CertificateView>>> {
        log::debug!("Selecting candidate with keyUsage:{bit}");
        Self::first_match(collection, &CertSelector::end_entity_with_key_usage(bit))
    }

    fn first_match<C: CertificateCollection + ?Sized>(
        collection: &C,
        selector: &CertSelector,
    ) -> ResolveResult<Option<Arc<CertificateView>>> {
        let certs = collection.query(selector)?;
        if certs.is_empty() {
            log::debug!("No certificates found");
            return Ok(None);
        }
        log::debug!("Found {} certificate(s) with {selector}", certs.len());
        Ok(certs.into_iter().next())
    }

    fn log_inventory<C: CertificateCollection + ?Sized>(collection: &C) -> ResolveResult<()> {
        let certs = collection.query(&CertSelector::any())?;
        log::debug!("{} certificate(s) found in collection", certs.len());
        for (i, cert) in certs.iter().enumerate() {
            log::debug!("{}. {cert}", i + 1);
        }
        Ok(())
    }

    fn log_choice(role: Role, cert: &CertificateView) {
        log::debug!("Chosen certificate {cert} for {}", role.description());
    }
}
