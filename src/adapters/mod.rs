//! Adapters for state held outside the domain.

pub mod cache;
