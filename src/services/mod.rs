//! Application services: cache reads, the optimistic mutation protocol and
//! its notification plumbing.

pub mod agent_mutator;
pub mod agent_service;
pub mod mutation_queue;
pub mod notifications;
pub mod optimistic;

pub use agent_mutator::AgentCacheMutator;
pub use agent_service::AgentService;
pub use mutation_queue::{KeyGuard, KeyedMutationQueue};
pub use notifications::{BroadcastNotifier, PendingNotice, TracingNotifier};
