//! Domain layer for voxdesk
//!
//! Agent records, mutation intents and the ports the core talks through.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{ApiError, ApiResult, DomainError, DomainResult};
