//! Optimistic create/update/delete of agents.
//!
//! Update and delete edit the shared cache before the request resolves and
//! roll back on failure. Create never touches the cache until the server has
//! assigned an identifier. Every call emits one "started" notification and
//! exactly one terminal notification with the same token.

use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::agent_service::AgentService;
use super::mutation_queue::KeyedMutationQueue;
use super::notifications::PendingNotice;
use super::optimistic::{self, restore_snapshot};
use crate::adapters::cache::AgentCache;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    AgentPatch, CreateAgentRequest, CreateAgentResponse, MutationConfirmation, MutationIntent,
    MutationKind, MutationPhase,
};
use crate::domain::ports::{AgentApi, NotificationSink};

const CREATING: &str = "Creating AI agent...";
const CREATED: &str = "AI agent created successfully!";
const CREATE_FAILED: &str = "Failed to create AI agent. Please try again.";
const UPDATING: &str = "Updating AI agent...";
const UPDATED: &str = "AI agent updated successfully!";
const UPDATE_FAILED: &str = "Failed to update AI agent.";
const DELETING: &str = "Deleting AI agent...";
const DELETED: &str = "AI agent deleted successfully!";
const DELETE_FAILED: &str = "Failed to delete AI agent.";

pub struct AgentCacheMutator<A: AgentApi, N: NotificationSink> {
    agents: AgentService<A>,
    notifier: N,
    queue: KeyedMutationQueue,
}

impl<A: AgentApi, N: NotificationSink> AgentCacheMutator<A, N> {
    pub fn new(agents: AgentService<A>, notifier: N) -> Self {
        Self {
            agents,
            notifier,
            queue: KeyedMutationQueue::new(),
        }
    }

    pub fn cache(&self) -> &Arc<AgentCache> {
        self.agents.cache()
    }

    pub fn agents(&self) -> &AgentService<A> {
        &self.agents
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Create an agent. The cache is only refreshed after the server confirms.
    #[instrument(skip_all, fields(agent_name = %payload.agent_name))]
    pub async fn create(&self, payload: CreateAgentRequest) -> DomainResult<CreateAgentResponse> {
        let notice = PendingNotice::start(&self.notifier, CREATING);

        if let Err(reason) = payload.validate() {
            warn!(%reason, "create rejected before sending");
            notice.fail(format!("{CREATE_FAILED} Details: {reason}"));
            return Err(DomainError::ValidationFailed(reason));
        }

        let cache = self.cache();
        let mut intent = MutationIntent::new(MutationKind::Create, None, cache.snapshot());
        let result = optimistic::run(
            cache,
            &mut intent,
            |_, _| false,
            |_, _| {},
            self.agents.api().create_agent(&payload),
        )
        .await;

        match result {
            Ok(response) => {
                cache.invalidate();
                if let Err(err) = self.agents.refresh().await {
                    warn!(error = %err, "agent list refetch after create failed, cache left stale");
                }
                intent.advance(MutationPhase::Reconciled)?;
                info!(agent_id = %response.ai_agent_id, "agent created");
                notice.succeed(CREATED);
                Ok(response)
            }
            Err(err) => {
                notice.fail(create_failure_message(&err));
                Err(err)
            }
        }
    }

    /// Apply `patch` to one agent, optimistically.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, agent_id: &str, patch: AgentPatch) -> DomainResult<MutationConfirmation> {
        let notice = PendingNotice::start(&self.notifier, UPDATING);

        if patch.is_empty() {
            let err = DomainError::ValidationFailed("no fields to update".to_string());
            notice.fail(format!("{UPDATE_FAILED} {err}"));
            return Err(err);
        }

        let _turn = self.queue.acquire(agent_id).await;
        let cache = self.cache();
        let mut intent =
            MutationIntent::new(MutationKind::Update, Some(agent_id.to_string()), cache.snapshot());
        let result = optimistic::run(
            cache,
            &mut intent,
            |cache, id| cache.apply_patch(id, agent_id, &patch),
            restore_snapshot,
            self.agents.api().update_agent(agent_id, &patch),
        )
        .await;

        match result {
            Ok(confirmation) => {
                if let Err(err) = self.agents.refresh_agent(agent_id).await {
                    warn!(error = %err, "agent refetch after update failed, cache left stale");
                    cache.invalidate();
                }
                intent.advance(MutationPhase::Reconciled)?;
                info!("agent updated");
                notice.succeed(UPDATED);
                Ok(confirmation)
            }
            Err(err) => {
                notice.fail(format!("{UPDATE_FAILED} {err}"));
                Err(err)
            }
        }
    }

    /// Delete one agent, hiding it from readers while the request is in flight.
    #[instrument(skip(self))]
    pub async fn delete(&self, agent_id: &str) -> DomainResult<MutationConfirmation> {
        let notice = PendingNotice::start(&self.notifier, DELETING);

        let _turn = self.queue.acquire(agent_id).await;
        let cache = self.cache();
        let mut intent =
            MutationIntent::new(MutationKind::Delete, Some(agent_id.to_string()), cache.snapshot());
        let result = optimistic::run(
            cache,
            &mut intent,
            |cache, id| cache.remove(id, agent_id),
            restore_snapshot,
            self.agents.api().delete_agent(agent_id),
        )
        .await;

        match result {
            Ok(confirmation) => {
                cache.invalidate();
                if let Err(err) = self.agents.refresh().await {
                    warn!(error = %err, "agent list refetch after delete failed, cache left stale");
                }
                intent.advance(MutationPhase::Reconciled)?;
                info!("agent deleted");
                notice.succeed(DELETED);
                Ok(confirmation)
            }
            Err(err) => {
                notice.fail(format!("{DELETE_FAILED} {err}"));
                Err(err)
            }
        }
    }
}

fn create_failure_message(err: &DomainError) -> String {
    let details = match err {
        DomainError::Api(api) => api.details().map(str::to_string),
        DomainError::ValidationFailed(reason) => Some(reason.clone()),
        _ => None,
    };
    match details {
        Some(details) => format!("{CREATE_FAILED} Details: {details}"),
        None => CREATE_FAILED.to_string(),
    }
}
