//! Domain types for the small file server.

mod small_file;

pub use small_file::*;
