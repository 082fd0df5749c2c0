//! Mutation intents and their lifecycle.
//!
//! Every create/update/delete walks the same state machine:
//!
//! ```text
//! idle -> requested -> (optimistic-applied | no-op) -> in-flight
//!      -> settled-success -> cache-reconciled
//!      -> settled-failure -> cache-rolled-back
//! ```
//!
//! There is no retry state; a rolled-back mutation has to be invoked again.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::agent::AgentRecord;
use crate::domain::errors::{DomainError, DomainResult};

/// Identifier of one in-flight mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntentId(pub Uuid);

impl IntentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IntentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    Idle,
    Requested,
    OptimisticApplied,
    NoOp,
    InFlight,
    SettledSuccess,
    SettledFailure,
    Reconciled,
    RolledBack,
}

impl MutationPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Requested => "requested",
            Self::OptimisticApplied => "optimistic-applied",
            Self::NoOp => "no-op",
            Self::InFlight => "in-flight",
            Self::SettledSuccess => "settled-success",
            Self::SettledFailure => "settled-failure",
            Self::Reconciled => "cache-reconciled",
            Self::RolledBack => "cache-rolled-back",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Reconciled | Self::RolledBack)
    }

    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Requested)
                | (Self::Requested, Self::OptimisticApplied | Self::NoOp)
                | (Self::OptimisticApplied | Self::NoOp, Self::InFlight)
                | (Self::InFlight, Self::SettledSuccess | Self::SettledFailure)
                | (Self::SettledSuccess, Self::Reconciled)
                | (Self::SettledFailure, Self::RolledBack)
        )
    }
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copy of the visible cache taken right before an optimistic edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub records: Vec<AgentRecord>,
    /// Cache generation when the snapshot was taken.
    pub generation: u64,
}

/// Transient record of one create/update/delete. Never persisted.
#[derive(Debug, Clone)]
pub struct MutationIntent {
    pub id: IntentId,
    pub kind: MutationKind,
    /// Target agent for update and delete.
    pub target: Option<String>,
    pub snapshot: CacheSnapshot,
    phase: MutationPhase,
}

impl MutationIntent {
    pub fn new(kind: MutationKind, target: Option<String>, snapshot: CacheSnapshot) -> Self {
        Self {
            id: IntentId::new(),
            kind,
            target,
            snapshot,
            phase: MutationPhase::Idle,
        }
    }

    pub const fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Move to `next`, rejecting transitions the lifecycle does not allow.
    pub fn advance(&mut self, next: MutationPhase) -> DomainResult<()> {
        if !self.phase.can_transition_to(next) {
            return Err(DomainError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        tracing::trace!(intent = %self.id, kind = %self.kind, from = %self.phase, to = %next, "mutation phase");
        self.phase = next;
        Ok(())
    }
}
