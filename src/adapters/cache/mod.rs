//! In-memory caching layer for the platform's agent list.
//!
//! A single shared [`AgentCache`] holds the authoritative baseline plus any
//! optimistic edits from in-flight mutations.

pub mod agent_cache;

pub use agent_cache::{AgentCache, DEFAULT_STALE_AFTER};
