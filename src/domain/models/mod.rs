pub mod agent;
pub mod agent_payload;
pub mod config;
pub mod listing;
pub mod mutation;
pub mod notification;

pub use agent::{Agent, AgentRecord, AgentStatus, LlmSettings, SttSettings, TtsSettings};
pub use agent_payload::{
    AgentListPage, AgentPatch, CreateAgentRequest, CreateAgentResponse, LlmPatch,
    MutationConfirmation, NewLlmSettings, NewSttSettings, NewTtsSettings,
};
pub use config::{ApiConfig, CacheConfig, Config, LogFormat, LoggingConfig, RotationPolicy};
pub use listing::{AgentPage, AgentQuery, SortDirection, SortField, DEFAULT_PAGE_SIZE};
pub use mutation::{CacheSnapshot, IntentId, MutationIntent, MutationKind, MutationPhase};
pub use notification::{Notification, NotificationToken};
