//! Certificate builders for unit tests.
//!
//! Certificates carry a placeholder signature; only the extensions matter here.

mod certificate;

use x509_cert::ext::pkix::BasicConstraints;

use crate::domain::x509::{CertificateView, KeyUsageBit, KeyUsageFlags};

pub(crate) use certificate::build_certificate;

fn view(
    issuer: &str,
    serial: u8,
    basic_constraints: Option<&BasicConstraints>,
    key_usage: Option<&[KeyUsageBit]>,
) -> CertificateView {
    let mask = key_usage.map(|bits| KeyUsageFlags::from_bits(bits).mask());
    let subject = format!("CN=cert-{serial}");
    let cert = build_certificate(issuer, &subject, serial, basic_constraints, mask);
    CertificateView::from_x509(cert).unwrap()
}

pub(crate) fn ca(issuer: &str, serial: u8, path_len: Option<u8>) -> CertificateView {
    let bc = BasicConstraints {
        ca: true,
        path_len_constraint: path_len,
    };
    let ku = [KeyUsageBit::KeyCertSign, KeyUsageBit::CrlSign];
    view(issuer, serial, Some(&bc), Some(&ku))
}

pub(crate) fn end_entity(issuer: &str, serial: u8, bits: &[KeyUsageBit]) -> CertificateView {
    view(issuer, serial, None, Some(bits))
}

pub(crate) fn end_entity_without_key_usage(issuer: &str, serial: u8) -> CertificateView {
    view(issuer, serial, None, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_round_trips_extensions() {
        let view = ca("CN=Fixture Root", 9, Some(1));
        assert_eq!(view.issuer_name(), "CN=Fixture Root");
        assert_eq!(view.subject_name(), "CN=cert-9");
        assert_eq!(view.serial_number(), "09");
        assert_eq!(view.basic_constraints().path_len_allowance(), Some(1));
        let ku = view.key_usage().unwrap();
        assert!(ku.contains(KeyUsageBit::KeyCertSign));
        assert!(ku.contains(KeyUsageBit::CrlSign));
        assert!(!ku.contains(KeyUsageBit::DigitalSignature));
    }

    #[test]
    fn certificate_without_extensions_is_unrestricted_end_entity() {
        let view = end_entity_without_key_usage("CN=Fixture Root", 3);
        assert!(view.as_x509().tbs_certificate.extensions.is_none());
        assert!(!view.is_ca());
        assert!(view.key_usage().is_none());
    }
}
