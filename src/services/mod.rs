//! Service layer module root.
//! Role classification and its memoization.

pub mod resolution_cache;
pub mod role_resolver;

pub use resolution_cache::ResolutionCache;
pub use role_resolver::RoleResolver;
