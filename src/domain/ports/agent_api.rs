//! Remote agent API port.

use async_trait::async_trait;

use crate::domain::errors::ApiResult;
use crate::domain::models::{
    AgentListPage, AgentPatch, AgentRecord, CreateAgentRequest, CreateAgentResponse,
    MutationConfirmation,
};

/// Interface to the calling platform's agent endpoints.
///
/// Implementations normalize every failure (transport, timeout, non-2xx,
/// undecodable body) into [`crate::domain::ApiError`] before returning.
#[async_trait]
pub trait AgentApi: Send + Sync {
    /// Fetch one page of agents. `None` requests the first page.
    async fn list_agents(&self, page_token: Option<&str>) -> ApiResult<AgentListPage>;

    /// Fetch a single agent's full configuration.
    async fn get_agent(&self, agent_id: &str) -> ApiResult<AgentRecord>;

    /// Create an agent. The server assigns the identifier.
    async fn create_agent(&self, request: &CreateAgentRequest) -> ApiResult<CreateAgentResponse>;

    /// Send only the changed fields of an agent.
    async fn update_agent(&self, agent_id: &str, patch: &AgentPatch) -> ApiResult<MutationConfirmation>;

    /// Delete an agent.
    async fn delete_agent(&self, agent_id: &str) -> ApiResult<MutationConfirmation>;
}
