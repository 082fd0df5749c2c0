//! Shared in-memory agent cache.
//!
//! The cache keeps the last authoritative agent list (the *baseline*) and a
//! stack of optimistic overlays, one per in-flight mutation. Readers always
//! see the baseline with every overlay applied in order. An authoritative
//! refresh only replaces the baseline, so it never wipes out a mutation that
//! is still waiting on the network.
//!
//! Every operation is synchronous and holds the lock for a bounded amount of
//! work; nothing awaits while holding it.

use parking_lot::RwLock;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::debug;

use crate::domain::models::{Agent, AgentPatch, AgentRecord, CacheSnapshot, IntentId};

/// Default freshness window for a fetched list.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
enum Overlay {
    Patch { agent_id: String, patch: AgentPatch },
    Remove { agent_id: String },
}

impl Overlay {
    fn apply(&self, records: &mut Vec<AgentRecord>) {
        match self {
            Self::Patch { agent_id, patch } => {
                if let Some(record) = records.iter_mut().find(|r| r.ai_agent_id == *agent_id) {
                    patch.apply_to(record);
                }
            }
            Self::Remove { agent_id } => records.retain(|r| r.ai_agent_id != *agent_id),
        }
    }
}

#[derive(Debug)]
struct PendingOverlay {
    intent: IntentId,
    overlay: Overlay,
    /// Cache generation right after this overlay was applied.
    applied_at: u64,
}

#[derive(Debug, Default)]
struct CacheState {
    baseline: Vec<AgentRecord>,
    overlays: Vec<PendingOverlay>,
    view: Vec<AgentRecord>,
    generation: u64,
    /// Count of optimistic edits folded into the baseline.
    commits: u64,
    loaded: bool,
    stale: bool,
    fetched_at: Option<Instant>,
}

impl CacheState {
    fn recompute(&mut self) {
        let mut view = self.baseline.clone();
        for pending in &self.overlays {
            pending.overlay.apply(&mut view);
        }
        self.view = view;
    }

    fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    fn take_overlay(&mut self, intent: IntentId) -> Option<PendingOverlay> {
        let idx = self.overlays.iter().position(|p| p.intent == intent)?;
        Some(self.overlays.remove(idx))
    }

    fn push_overlay(&mut self, intent: IntentId, overlay: Overlay) -> u64 {
        overlay.apply(&mut self.view);
        let applied_at = self.bump();
        self.overlays.push(PendingOverlay {
            intent,
            overlay,
            applied_at,
        });
        applied_at
    }
}

/// Read-through cache of the platform's agent list.
///
/// Share it by `Arc`; the mutator is the only writer of optimistic state.
#[derive(Debug)]
pub struct AgentCache {
    state: RwLock<CacheState>,
    stale_after: Duration,
    changes: watch::Sender<u64>,
}

impl AgentCache {
    pub fn new(stale_after: Duration) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            state: RwLock::new(CacheState::default()),
            stale_after,
            changes,
        }
    }

    fn publish(&self, generation: u64) {
        self.changes.send_replace(generation);
    }

    // Reads

    /// Current visible collection, in server order.
    pub fn get_all(&self) -> Vec<AgentRecord> {
        self.state.read().view.clone()
    }

    pub fn get(&self, agent_id: &str) -> Option<AgentRecord> {
        self.state
            .read()
            .view
            .iter()
            .find(|r| r.ai_agent_id == agent_id)
            .cloned()
    }

    pub fn contains(&self, agent_id: &str) -> bool {
        self.state.read().view.iter().any(|r| r.ai_agent_id == agent_id)
    }

    /// Display rows for the visible collection.
    pub fn rows(&self) -> Vec<Agent> {
        self.state.read().view.iter().map(Agent::from).collect()
    }

    pub fn len(&self) -> usize {
        self.state.read().view.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().view.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Number of commits so far. Read it before fetching and pass it to
    /// [`replace_all_since`](Self::replace_all_since) or
    /// [`upsert_since`](Self::upsert_since).
    pub fn commit_epoch(&self) -> u64 {
        self.state.read().commits
    }

    /// Number of optimistic edits currently applied.
    pub fn pending(&self) -> usize {
        self.state.read().overlays.len()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    /// Loaded, not invalidated, and fetched within the freshness window.
    pub fn is_fresh(&self) -> bool {
        let state = self.state.read();
        state.loaded
            && !state.stale
            && state
                .fetched_at
                .is_some_and(|at| at.elapsed() < self.stale_after)
    }

    /// Subscribe to change notifications. The value is the cache generation.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        let state = self.state.read();
        CacheSnapshot {
            records: state.view.clone(),
            generation: state.generation,
        }
    }

    // Authoritative writes

    /// Replace the baseline with a fresh server list. Pending overlays stay applied.
    pub fn replace_all(&self, records: Vec<AgentRecord>) {
        self.write_baseline(None, true, |baseline| *baseline = records);
    }

    /// Replace the baseline unless an edit was committed after `epoch`.
    ///
    /// `epoch` is the [`commit_epoch`](Self::commit_epoch) read before the
    /// fetch started. A list fetched before a commit predates that change on
    /// the server and is dropped. Returns whether the list was applied.
    pub fn replace_all_since(&self, records: Vec<AgentRecord>, epoch: u64) -> bool {
        self.write_baseline(Some(epoch), true, |baseline| *baseline = records)
    }

    /// Insert or replace one record in the baseline.
    pub fn upsert(&self, record: AgentRecord) {
        self.write_baseline(None, false, |baseline| upsert_into(baseline, record));
    }

    /// [`upsert`](Self::upsert) guarded like [`replace_all_since`](Self::replace_all_since).
    pub fn upsert_since(&self, record: AgentRecord, epoch: u64) -> bool {
        self.write_baseline(Some(epoch), false, |baseline| upsert_into(baseline, record))
    }

    /// `full_list` marks the baseline as a complete, freshly fetched list.
    fn write_baseline(
        &self,
        epoch: Option<u64>,
        full_list: bool,
        write: impl FnOnce(&mut Vec<AgentRecord>),
    ) -> bool {
        let generation = {
            let mut state = self.state.write();
            if epoch.is_some_and(|e| e != state.commits) {
                debug!(epoch, commits = state.commits, "fetched data predates a commit, dropped");
                return false;
            }
            write(&mut state.baseline);
            if full_list {
                state.loaded = true;
                state.stale = false;
                state.fetched_at = Some(Instant::now());
            }
            state.recompute();
            state.bump()
        };
        debug!(generation, "agent cache baseline written");
        self.publish(generation);
        true
    }

    /// Mark the list stale so the next read refetches it.
    pub fn invalidate(&self) {
        self.state.write().stale = true;
        debug!("agent cache invalidated");
    }

    // Optimistic writes

    /// Overlay `patch` onto the cached copy of `agent_id`.
    ///
    /// Returns `false` without touching the cache when the agent is not cached.
    pub fn apply_patch(&self, intent: IntentId, agent_id: &str, patch: &AgentPatch) -> bool {
        let generation = {
            let mut state = self.state.write();
            if !state.view.iter().any(|r| r.ai_agent_id == agent_id) {
                return false;
            }
            state.push_overlay(
                intent,
                Overlay::Patch {
                    agent_id: agent_id.to_string(),
                    patch: patch.clone(),
                },
            )
        };
        debug!(%intent, agent_id, "optimistic patch applied");
        self.publish(generation);
        true
    }

    /// Hide `agent_id` from readers until the mutation settles.
    ///
    /// Returns `false` without touching the cache when the agent is not cached.
    pub fn remove(&self, intent: IntentId, agent_id: &str) -> bool {
        let generation = {
            let mut state = self.state.write();
            if !state.view.iter().any(|r| r.ai_agent_id == agent_id) {
                return false;
            }
            state.push_overlay(
                intent,
                Overlay::Remove {
                    agent_id: agent_id.to_string(),
                },
            )
        };
        debug!(%intent, agent_id, "optimistic removal applied");
        self.publish(generation);
        true
    }

    /// Fold a confirmed overlay into the baseline.
    pub fn commit(&self, intent: IntentId) -> bool {
        let generation = {
            let mut state = self.state.write();
            let Some(pending) = state.take_overlay(intent) else {
                return false;
            };
            pending.overlay.apply(&mut state.baseline);
            state.commits += 1;
            state.recompute();
            state.bump()
        };
        debug!(%intent, "optimistic edit committed");
        self.publish(generation);
        true
    }

    /// Undo the overlay of a failed mutation.
    ///
    /// When the edit was the only change since `snapshot` was taken, the
    /// snapshot is reinstated verbatim. Otherwise only this mutation's overlay
    /// is dropped and the view is rebuilt, keeping newer authoritative data and
    /// other mutations' edits.
    pub fn restore(&self, intent: IntentId, snapshot: &CacheSnapshot) -> bool {
        let generation = {
            let mut state = self.state.write();
            let Some(pending) = state.take_overlay(intent) else {
                return false;
            };
            let untouched =
                pending.applied_at == state.generation && pending.applied_at == snapshot.generation + 1;
            if untouched {
                state.view = snapshot.records.clone();
            } else {
                state.recompute();
            }
            state.bump()
        };
        debug!(%intent, "optimistic edit rolled back");
        self.publish(generation);
        true
    }
}

impl AgentCache {
    /// Drop an overlay without a snapshot, e.g. when its mutation was abandoned.
    pub fn discard(&self, intent: IntentId) -> bool {
        let generation = {
            let mut state = self.state.write();
            if state.take_overlay(intent).is_none() {
                return false;
            }
            state.recompute();
            state.bump()
        };
        debug!(%intent, "optimistic edit discarded");
        self.publish(generation);
        true
    }
}

fn upsert_into(baseline: &mut Vec<AgentRecord>, record: AgentRecord) {
    match baseline.iter_mut().find(|r| r.ai_agent_id == record.ai_agent_id) {
        Some(existing) => *existing = record,
        None => baseline.push(record),
    }
}

impl Default for AgentCache {
    fn default() -> Self {
        Self::new(DEFAULT_STALE_AFTER)
    }
}
