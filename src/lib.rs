//! voxdesk - admin console core for AI voice-call agents
//!
//! voxdesk keeps a local, read-through cache of the agents hosted on a calling
//! platform and mutates it optimistically: updates and deletions show up in
//! the cache before the platform confirms them and are rolled back exactly if
//! it refuses.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the ports to the outside
//! - **Adapters** (`adapters`): the shared agent cache
//! - **Service Layer** (`services`): read-through reads and the mutation protocol
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, config, logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use voxdesk::{AgentCache, AgentCacheMutator, AgentPatch, AgentService, TracingNotifier};
//! use voxdesk::infrastructure::platform::{PlatformClient, PlatformClientConfig};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = PlatformClient::new(PlatformClientConfig {
//!     base_url: "https://api.verbex.ai".into(),
//!     token: std::env::var("VOXDESK_API__TOKEN")?,
//!     timeout_secs: 30,
//! })?;
//! let agents = AgentService::new(Arc::new(client), Arc::new(AgentCache::default()));
//! agents.list().await?;
//!
//! let mutator = AgentCacheMutator::new(agents, TracingNotifier);
//! mutator.update("agent-id", AgentPatch::name("Front Desk")).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::cache::AgentCache;
pub use domain::errors::{ApiError, ApiResult, DomainError, DomainResult};
pub use domain::models::{
    Agent, AgentPatch, AgentQuery, AgentRecord, AgentStatus, Config, CreateAgentRequest,
    CreateAgentResponse, MutationConfirmation, Notification, NotificationToken,
};
pub use domain::ports::{AgentApi, NotificationSink};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{AgentCacheMutator, AgentService, BroadcastNotifier, TracingNotifier};
