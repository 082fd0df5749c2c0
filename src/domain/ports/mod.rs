//! Port trait definitions (Hexagonal Architecture)
//!
//! - AgentApi: calling platform agent endpoints
//! - NotificationSink: user-facing mutation progress

pub mod agent_api;
pub mod notification_sink;

pub use agent_api::AgentApi;
pub use notification_sink::NotificationSink;
