//! Domain model: certificates, selectors, roles and the collection seam.

pub mod collection;
pub mod constants;
pub mod roles;
pub mod selector;
pub mod x509;
