//! CLI command implementations.

pub mod agent;
