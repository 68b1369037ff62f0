//! Adapter layer: concrete certificate collections.
//!
//! - `memory_store`: insertion-ordered in-memory collection
//! - `file_store`: PEM/DER files and directories on disk

pub mod file_store;
pub mod memory_store;
