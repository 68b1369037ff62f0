//! Shared certificate fixtures for integration tests.
//!
//! Builds real `x509_cert` certificates with chosen basic-constraints and
//! key-usage extensions. Signatures are placeholders; nothing here verifies
//! them.

#![allow(dead_code)]

#[path = "../../src/test_fixtures/certificate.rs"]
mod certificate;

use std::sync::Arc;

use certstore_roles::{CertificateView, KeyUsageBit, KeyUsageFlags, MemoryCertStore};
use der::Encode;
use x509_cert::certificate::Certificate;
use x509_cert::ext::pkix::BasicConstraints;

use certificate::build_certificate;

pub const ROOT: &str = "CN=Test Root CA,O=Example";

/// Shape of one fixture certificate.
pub struct CertSpec {
    pub serial: u8,
    pub basic_constraints: Option<BasicConstraints>,
    pub key_usage: Option<Vec<KeyUsageBit>>,
}

impl CertSpec {
    pub fn ca(serial: u8, path_len: Option<u8>) -> Self {
        Self {
            serial,
            basic_constraints: Some(BasicConstraints {
                ca: true,
                path_len_constraint: path_len,
            }),
            key_usage: Some(vec![KeyUsageBit::KeyCertSign, KeyUsageBit::CrlSign]),
        }
    }

    pub fn end_entity(serial: u8, bits: &[KeyUsageBit]) -> Self {
        Self {
            serial,
            basic_constraints: None,
            key_usage: Some(bits.to_vec()),
        }
    }

    /// End entity with an explicit `cA = FALSE` basic-constraints extension.
    pub fn explicit_end_entity(serial: u8, bits: &[KeyUsageBit]) -> Self {
        Self {
            serial,
            basic_constraints: Some(BasicConstraints {
                ca: false,
                path_len_constraint: None,
            }),
            key_usage: Some(bits.to_vec()),
        }
    }

    pub fn build(&self) -> Certificate {
        let key_usage = self
            .key_usage
            .as_ref()
            .map(|bits| KeyUsageFlags::from_bits(bits).mask());
        build_certificate(
            ROOT,
            &format!("CN=fixture-{}", self.serial),
            self.serial,
            self.basic_constraints.as_ref(),
            key_usage,
        )
    }

    pub fn view(&self) -> CertificateView {
        CertificateView::from_x509(self.build()).unwrap()
    }

    pub fn der(&self) -> Vec<u8> {
        self.build().to_der().unwrap()
    }
}

pub fn store(specs: &[CertSpec]) -> Arc<MemoryCertStore> {
    Arc::new(MemoryCertStore::new(specs.iter().map(CertSpec::view).collect()))
}

/// Serial number as the hex string `CertificateView::serial_number` reports.
pub fn serial_hex(serial: u8) -> String {
    format!("{serial:02x}")
}
