//! Named X.509 extension constants used by the role heuristics.
//! Keep this intentionally small; only literals tied to RFC 5280 live here.

// === Basic Constraints (RFC 5280 §4.2.1.9) ===

/// Minimum path-length allowance a CA certificate needs to act as issuer.
///
/// A CA with `pathLenConstraint = 0` may still issue end-entity certificates,
/// so zero is the lowest value that qualifies.
pub const CA_PATH_LENGTH: u32 = 0;

/// Path-length allowance reported for a CA without a `pathLenConstraint`.
pub const UNLIMITED_PATH_LENGTH: u32 = u32::MAX;

// === Key Usage (RFC 5280 §4.2.1.3) ===

/// Number of named bits in the `KeyUsage` BIT STRING (`digitalSignature(0)`
/// through `decipherOnly(8)`).
pub const KEY_USAGE_LENGTH: usize = 9;

/// Mask covering every named key-usage bit.
pub const KEY_USAGE_MASK: u16 = (1 << KEY_USAGE_LENGTH) - 1;
