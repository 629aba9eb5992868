//! CLI command implementations.

pub mod batch;
pub mod bundle;
pub mod hashes;
pub mod init_config;
