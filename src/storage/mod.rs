//! Storage layer for the small file server.
//!
//! Holds registered small files in memory behind a reader/writer lock.

mod registry;

pub use registry::*;
