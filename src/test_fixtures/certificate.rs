//! Certificate builder shared by the unit and integration test fixtures.
//!
//! Only depends on `x509_cert`, `der` and `flagset` so both test crates can
//! include it. Signatures are placeholders; nothing here verifies them.

use std::str::FromStr;
use std::time::Duration;

use der::asn1::{BitString, ObjectIdentifier, OctetString};
use der::oid::AssociatedOid;
use der::Encode;
use flagset::FlagSet;
use x509_cert::certificate::{Certificate, TbsCertificate, Version};
use x509_cert::ext::pkix::{BasicConstraints, KeyUsage, KeyUsages};
use x509_cert::ext::Extension;
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::{AlgorithmIdentifierOwned, SubjectPublicKeyInfoOwned};
use x509_cert::time::Validity;

const SHA256_WITH_RSA: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.11");
const RSA_ENCRYPTION: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");

/// Build a certificate carrying the given extensions. `key_usage` is the
/// RFC 5280 bit mask (bit 0 = digitalSignature).
pub fn build_certificate(
    issuer: &str,
    subject: &str,
    serial: u8,
    basic_constraints: Option<&BasicConstraints>,
    key_usage: Option<u16>,
) -> Certificate {
    let mut extensions = Vec::new();
    if let Some(bc) = basic_constraints {
        extensions.push(extension(bc));
    }
    if let Some(mask) = key_usage {
        extensions.push(extension(&KeyUsage(FlagSet::<KeyUsages>::new_truncated(
            mask,
        ))));
    }

    let algorithm = AlgorithmIdentifierOwned {
        oid: SHA256_WITH_RSA,
        parameters: None,
    };
    Certificate {
        tbs_certificate: TbsCertificate {
            version: Version::V3,
            serial_number: SerialNumber::new(&[serial]).unwrap(),
            signature: algorithm.clone(),
            issuer: Name::from_str(issuer).unwrap(),
            validity: Validity::from_now(Duration::from_secs(86_400)).unwrap(),
            subject: Name::from_str(subject).unwrap(),
            subject_public_key_info: SubjectPublicKeyInfoOwned {
                algorithm: AlgorithmIdentifierOwned {
                    oid: RSA_ENCRYPTION,
                    parameters: None,
                },
                subject_public_key: BitString::from_bytes(&[0u8; 16]).unwrap(),
            },
            issuer_unique_id: None,
            subject_unique_id: None,
            extensions: if extensions.is_empty() {
                None
            } else {
                Some(extensions)
            },
        },
        signature_algorithm: algorithm,
        signature: BitString::from_bytes(&[0u8; 16]).unwrap(),
    }
}

fn extension<T: Encode + AssociatedOid>(value: &T) -> Extension {
    Extension {
        extn_id: T::OID,
        critical: true,
        extn_value: OctetString::new(value.to_der().unwrap()).unwrap(),
    }
}
