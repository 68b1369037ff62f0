use std::fmt;

use crate::domain::constants::{KEY_USAGE_LENGTH, KEY_USAGE_MASK};

/// Named bits of the X.509 `KeyUsage` extension, RFC 5280 §4.2.1.3.
///
/// The discriminant is the bit index inside the BIT STRING.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsageBit {
    DigitalSignature = 0,
    NonRepudiation = 1,
    KeyEncipherment = 2,
    DataEncipherment = 3,
    KeyAgreement = 4,
    KeyCertSign = 5,
    CrlSign = 6,
    EncipherOnly = 7,
    DecipherOnly = 8,
}

impl KeyUsageBit {
    pub const ALL: [KeyUsageBit; KEY_USAGE_LENGTH] = [
        KeyUsageBit::DigitalSignature,
        KeyUsageBit::NonRepudiation,
        KeyUsageBit::KeyEncipherment,
        KeyUsageBit::DataEncipherment,
        KeyUsageBit::KeyAgreement,
        KeyUsageBit::KeyCertSign,
        KeyUsageBit::CrlSign,
        KeyUsageBit::EncipherOnly,
        KeyUsageBit::DecipherOnly,
    ];

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// ASN.1 identifier of the bit as spelled in RFC 5280.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            KeyUsageBit::DigitalSignature => "digitalSignature",
            KeyUsageBit::NonRepudiation => "nonRepudiation",
            KeyUsageBit::KeyEncipherment => "keyEncipherment",
            KeyUsageBit::DataEncipherment => "dataEncipherment",
            KeyUsageBit::KeyAgreement => "keyAgreement",
            KeyUsageBit::KeyCertSign => "keyCertSign",
            KeyUsageBit::CrlSign => "cRLSign",
            KeyUsageBit::EncipherOnly => "encipherOnly",
            KeyUsageBit::DecipherOnly => "decipherOnly",
        }
    }

    fn mask(self) -> u16 {
        1 << self.index()
    }
}

impl fmt::Display for KeyUsageBit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nine key-usage flags of a certificate.
///
/// Invariant: only the low [`KEY_USAGE_LENGTH`] bits may be set.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyUsageFlags {
    bits: u16,
}

impl KeyUsageFlags {
    /// Build from a bit mask where bit `i` is key-usage bit `i`.
    /// Bits outside the named range are dropped.
    #[must_use]
    pub fn from_mask(mask: u16) -> Self {
        Self {
            bits: mask & KEY_USAGE_MASK,
        }
    }

    #[must_use]
    pub fn from_bits(bits: &[KeyUsageBit]) -> Self {
        Self {
            bits: bits.iter().fold(0, |acc, bit| acc | bit.mask()),
        }
    }

    #[must_use]
    pub fn mask(self) -> u16 {
        self.bits
    }

    #[must_use]
    pub fn contains(self, bit: KeyUsageBit) -> bool {
        self.bits & bit.mask() != 0
    }

    /// True when every flag set in `required` is also set here.
    #[must_use]
    pub fn contains_all(self, required: KeyUsageFlags) -> bool {
        self.bits & required.bits == required.bits
    }

    /// Flags as the fixed-length boolean vector, index = bit number.
    #[must_use]
    pub fn to_array(self) -> [bool; KEY_USAGE_LENGTH] {
        KeyUsageBit::ALL.map(|bit| self.contains(bit))
    }

    pub fn iter(self) -> impl Iterator<Item = KeyUsageBit> {
        KeyUsageBit::ALL
            .into_iter()
            .filter(move |bit| self.contains(*bit))
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.bits == 0
    }
}

impl From<KeyUsageBit> for KeyUsageFlags {
    fn from(bit: KeyUsageBit) -> Self {
        Self { bits: bit.mask() }
    }
}

impl fmt::Debug for KeyUsageFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(KeyUsageBit::as_str)).finish()
    }
}
