//! Shared fixtures for voxdesk integration tests.
//!
//! [`FakePlatform`] is an in-memory [`AgentApi`] whose mutations can be held
//! in flight per key, so tests can observe the cache between the optimistic
//! edit and the server's answer.

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Map;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

use voxdesk::domain::models::{
    AgentListPage, AgentPatch, AgentRecord, AgentStatus, CreateAgentRequest, CreateAgentResponse,
    LlmSettings, MutationConfirmation, Notification, SttSettings, TtsSettings,
};
use voxdesk::domain::ports::{AgentApi, NotificationSink};
use voxdesk::services::AgentService;
use voxdesk::{AgentCache, AgentCacheMutator, ApiError, ApiResult};

/// Gate key used for create requests, which have no agent id yet.
pub const CREATE_KEY: &str = "<create>";

/// Gate key used for list requests.
pub const LIST_KEY: &str = "<list>";

pub fn record(id: &str, name: &str) -> AgentRecord {
    AgentRecord {
        ai_agent_id: id.to_string(),
        agent_name: name.to_string(),
        agent_status: AgentStatus::Active,
        language_code: "en-US".to_string(),
        created_at: 1_700_000_000,
        modified_at: 1_700_000_100,
        welcome_message: "Hello, How Can I help you today?".to_string(),
        llm: LlmSettings {
            llm_type: "simple".to_string(),
            model_provider: "openai".to_string(),
            model_name: "gpt-4o-mini".to_string(),
            system_prompt: "You are a simple friendly AI assistant".to_string(),
            model_temperature: 0.0,
            max_tokens: Some(4096),
            extra: Map::new(),
        },
        stt: SttSettings {
            provider: "pia".to_string(),
            model: "pia_bangla_v1".to_string(),
        },
        tts: TtsSettings {
            provider: "pia".to_string(),
            voice_id: "maria".to_string(),
            voice_name: "Maria".to_string(),
            model_name: None,
            voice_temperature: Some(0.0),
        },
        extra: Map::new(),
    }
}

/// In-memory calling platform.
#[derive(Default)]
pub struct FakePlatform {
    agents: Mutex<Vec<AgentRecord>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, VecDeque<ApiError>>>,
    gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    once_gates: Mutex<HashMap<String, Arc<Semaphore>>>,
    entered: Mutex<Vec<String>>,
    next_id: AtomicUsize,
}

impl FakePlatform {
    pub fn with_agents(agents: Vec<AgentRecord>) -> Arc<Self> {
        let platform = Self::default();
        *platform.agents.lock() = agents;
        Arc::new(platform)
    }

    /// Server-side state, bypassing any cache.
    pub fn stored(&self) -> Vec<AgentRecord> {
        self.agents.lock().clone()
    }

    pub fn insert(&self, record: AgentRecord) {
        self.agents.lock().push(record);
    }

    /// Requests seen so far, e.g. `"DELETE 1"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Mutations that have reached the server (passed the queue) for `key`.
    pub fn entered(&self, key: &str) -> usize {
        self.entered.lock().iter().filter(|k| *k == key).count()
    }

    /// Fail the next mutation targeting `key` with `err`.
    pub fn fail_next(&self, key: &str, err: ApiError) {
        self.failures
            .lock()
            .entry(key.to_string())
            .or_default()
            .push_back(err);
    }

    /// Hold mutations for `key` until [`release`](Self::release) is called.
    pub fn hold(&self, key: &str) {
        self.gates
            .lock()
            .insert(key.to_string(), Arc::new(Semaphore::new(0)));
    }

    /// Hold only the next request for `key`. Add a permit to the returned
    /// gate to let it finish.
    pub fn hold_next(&self, key: &str) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.once_gates
            .lock()
            .insert(key.to_string(), Arc::clone(&gate));
        gate
    }

    /// Let one held mutation for `key` proceed.
    pub fn release(&self, key: &str) {
        if let Some(gate) = self.gates.lock().get(key) {
            gate.add_permits(1);
        }
    }

    /// Wait until `count` mutations for `key` are in flight or done.
    pub async fn wait_entered(&self, key: &str, count: usize) {
        for _ in 0..400 {
            if self.entered(key) >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("mutation for {key} never reached the platform");
    }

    async fn pass(&self, key: &str, call: String) -> ApiResult<()> {
        self.enter(key, call);
        self.wait_turn(key).await
    }

    fn enter(&self, key: &str, call: String) {
        self.calls.lock().push(call);
        self.entered.lock().push(key.to_string());
    }

    async fn wait_turn(&self, key: &str) -> ApiResult<()> {
        let once = self.once_gates.lock().remove(key);
        let gate = once.or_else(|| self.gates.lock().get(key).cloned());
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|e| ApiError::Transport(e.to_string()))?
                .forget();
        }

        match self.failures.lock().get_mut(key).and_then(VecDeque::pop_front) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AgentApi for FakePlatform {
    async fn list_agents(&self, _page_token: Option<&str>) -> ApiResult<AgentListPage> {
        // Read before waiting: a held list answers with what the server had when it was asked.
        self.enter(LIST_KEY, "LIST".to_string());
        let data = self.stored();
        self.wait_turn(LIST_KEY).await?;
        Ok(AgentListPage {
            data,
            next_page_token: None,
        })
    }

    async fn get_agent(&self, agent_id: &str) -> ApiResult<AgentRecord> {
        self.calls.lock().push(format!("GET {agent_id}"));
        self.agents
            .lock()
            .iter()
            .find(|a| a.ai_agent_id == agent_id)
            .cloned()
            .ok_or_else(|| ApiError::rejected(404, "AI agent not found"))
    }

    async fn create_agent(&self, request: &CreateAgentRequest) -> ApiResult<CreateAgentResponse> {
        self.pass(CREATE_KEY, format!("POST {}", request.agent_name))
            .await?;

        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut created = record(&id, &request.agent_name);
        created.welcome_message.clone_from(&request.welcome_message);
        self.insert(created);

        Ok(CreateAgentResponse {
            ai_agent_id: id,
            status: "SUCCESS".to_string(),
            message: "AI agent created successfully".to_string(),
            extra: Map::new(),
        })
    }

    async fn update_agent(&self, agent_id: &str, patch: &AgentPatch) -> ApiResult<MutationConfirmation> {
        self.pass(agent_id, format!("PATCH {agent_id}")).await?;

        let mut agents = self.agents.lock();
        let target = agents
            .iter_mut()
            .find(|a| a.ai_agent_id == agent_id)
            .ok_or_else(|| ApiError::rejected(404, "AI agent not found"))?;
        patch.apply_to(target);
        target.modified_at += 1;

        Ok(MutationConfirmation {
            status: "SUCCESS".to_string(),
            message: "AI agent updated successfully".to_string(),
            ai_agent_id: Some(agent_id.to_string()),
            extra: Map::new(),
        })
    }

    async fn delete_agent(&self, agent_id: &str) -> ApiResult<MutationConfirmation> {
        self.pass(agent_id, format!("DELETE {agent_id}")).await?;

        let mut agents = self.agents.lock();
        let before = agents.len();
        agents.retain(|a| a.ai_agent_id != agent_id);
        if agents.len() == before {
            return Err(ApiError::rejected(404, "AI agent not found"));
        }
        Ok(MutationConfirmation::deleted(agent_id))
    }
}

/// Sink that keeps every notification in arrival order.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<Notification> {
        self.events.lock().clone()
    }

    pub fn terminal(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter(Notification::is_terminal)
            .collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notification: Notification) {
        self.events.lock().push(notification);
    }
}

pub type TestMutator = AgentCacheMutator<FakePlatform, Arc<RecordingSink>>;

/// A mutator over `platform` whose cache is already loaded from it.
pub async fn loaded_mutator(platform: &Arc<FakePlatform>) -> (Arc<TestMutator>, Arc<RecordingSink>) {
    let cache = Arc::new(AgentCache::default());
    let agents = AgentService::new(Arc::clone(platform), cache);
    agents.refresh().await.expect("initial load");

    let sink = Arc::new(RecordingSink::default());
    let mutator = AgentCacheMutator::new(agents, Arc::clone(&sink));
    (Arc::new(mutator), sink)
}

pub fn ids(records: &[AgentRecord]) -> Vec<String> {
    records.iter().map(|r| r.ai_agent_id.clone()).collect()
}
