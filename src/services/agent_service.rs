//! Agent service: read-through access to the agent cache.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::adapters::cache::AgentCache;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AgentPage, AgentQuery, AgentRecord};
use crate::domain::ports::AgentApi;

const MAX_REFRESH_ATTEMPTS: usize = 3;

pub struct AgentService<A: AgentApi> {
    api: Arc<A>,
    cache: Arc<AgentCache>,
}

impl<A: AgentApi> Clone for AgentService<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            cache: Arc::clone(&self.cache),
        }
    }
}

impl<A: AgentApi> AgentService<A> {
    pub fn new(api: Arc<A>, cache: Arc<AgentCache>) -> Self {
        Self { api, cache }
    }

    pub fn cache(&self) -> &Arc<AgentCache> {
        &self.cache
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    /// Cached agents, fetched first when the cache is missing or stale.
    pub async fn list(&self) -> DomainResult<Vec<AgentRecord>> {
        if !self.cache.is_fresh() {
            self.refresh().await?;
        }
        Ok(self.cache.get_all())
    }

    /// Fetch every page of the agent list and replace the cache baseline.
    ///
    /// A list whose fetch overlapped a committed mutation is dropped and
    /// fetched again, so it cannot bring back what that mutation changed.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> DomainResult<usize> {
        for attempt in 1..=MAX_REFRESH_ATTEMPTS {
            let epoch = self.cache.commit_epoch();
            let records = self.fetch_all().await?;
            let count = records.len();
            if self.cache.replace_all_since(records, epoch) {
                debug!(count, "agent list refreshed");
                return Ok(count);
            }
            debug!(attempt, "agent list changed during fetch, refetching");
        }

        self.cache.invalidate();
        warn!("agent list kept changing during refresh, cache left stale");
        Ok(self.cache.len())
    }

    /// Every page of the agent list, first occurrence of each id kept.
    async fn fetch_all(&self) -> DomainResult<Vec<AgentRecord>> {
        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut seen_tokens = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.api.list_agents(page_token.as_deref()).await?;
            records.extend(
                page.data
                    .into_iter()
                    .filter(|r| seen_ids.insert(r.ai_agent_id.clone())),
            );
            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) if seen_tokens.insert(next.clone()) => page_token = Some(next),
                _ => break,
            }
        }

        Ok(records)
    }

    /// One agent, from the cache or the server.
    pub async fn get(&self, agent_id: &str) -> DomainResult<AgentRecord> {
        if let Some(record) = self.cache.get(agent_id) {
            return Ok(record);
        }
        self.refresh_agent(agent_id).await
    }

    /// Refetch one agent and upsert it into the cache baseline.
    #[instrument(skip(self))]
    pub async fn refresh_agent(&self, agent_id: &str) -> DomainResult<AgentRecord> {
        let epoch = self.cache.commit_epoch();
        let record = self.api.get_agent(agent_id).await.map_err(|err| {
            if err.is_not_found() {
                DomainError::AgentNotFound(agent_id.to_string())
            } else {
                err.into()
            }
        })?;
        if !self.cache.upsert_since(record.clone(), epoch) {
            debug!(agent_id, "agent fetch overlapped a commit, cached copy kept");
        }
        Ok(record)
    }

    /// Search, sort and page the cached agents.
    pub async fn browse(&self, query: &AgentQuery) -> DomainResult<AgentPage> {
        self.list().await?;
        Ok(query.apply(&self.cache.rows()))
    }
}
