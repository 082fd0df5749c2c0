//! Generic optimistic mutation helper.
//!
//! [`run`] applies an edit to the cache, awaits the remote operation and then
//! either commits the edit or reverts it. Callers supply only what differs per
//! mutation: the edit, the revert and the request future.

use std::future::Future;
use tracing::{debug, warn};

use crate::adapters::cache::AgentCache;
use crate::domain::errors::{ApiResult, DomainResult};
use crate::domain::models::{IntentId, MutationIntent, MutationPhase};

/// Revert that reinstates the intent's snapshot.
pub fn restore_snapshot(cache: &AgentCache, intent: &MutationIntent) {
    cache.restore(intent.id, &intent.snapshot);
}

/// Discards an overlay left behind by a future that was dropped mid-flight.
struct InFlightEdit<'a> {
    cache: &'a AgentCache,
    intent: IntentId,
    armed: bool,
}

impl Drop for InFlightEdit<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!(intent = %self.intent, "mutation abandoned mid-flight, discarding optimistic edit");
            self.cache.discard(self.intent);
        }
    }
}

/// Drive `intent` from `idle` to `settled-success` or `cache-rolled-back`.
///
/// `apply` returns `true` when it changed the cache. On success the edit is
/// committed into the baseline and the intent is left in `settled-success`
/// for the caller to reconcile. On failure `revert` runs and the error is
/// returned unchanged.
pub async fn run<T, A, R, F>(
    cache: &AgentCache,
    intent: &mut MutationIntent,
    apply: A,
    revert: R,
    op: F,
) -> DomainResult<T>
where
    A: FnOnce(&AgentCache, IntentId) -> bool,
    R: FnOnce(&AgentCache, &MutationIntent),
    F: Future<Output = ApiResult<T>>,
{
    intent.advance(MutationPhase::Requested)?;
    let applied = apply(cache, intent.id);
    let mut edit = InFlightEdit {
        cache,
        intent: intent.id,
        armed: applied,
    };
    intent.advance(if applied {
        MutationPhase::OptimisticApplied
    } else {
        MutationPhase::NoOp
    })?;
    intent.advance(MutationPhase::InFlight)?;

    let outcome = op.await;
    edit.armed = false;

    match outcome {
        Ok(value) => {
            intent.advance(MutationPhase::SettledSuccess)?;
            if applied {
                cache.commit(intent.id);
            }
            debug!(intent = %intent.id, kind = %intent.kind, "mutation settled");
            Ok(value)
        }
        Err(err) => {
            intent.advance(MutationPhase::SettledFailure)?;
            revert(cache, intent);
            intent.advance(MutationPhase::RolledBack)?;
            warn!(intent = %intent.id, kind = %intent.kind, error = %err, "mutation rolled back");
            Err(err.into())
        }
    }
}
