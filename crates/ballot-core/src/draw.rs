// Lottery draw engine
//
// Reads a snapshot of the waiting set, shuffles it uniformly through the
// injected DrawRng and promotes the first `count` entrants to Selected,
// one atomic transition per winner. Losers are left untouched; notifying
// them is an explicit caller-side step, never a draw side effect.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::entrant::EntrantState;
use crate::error::{reasons, LifecycleError, Result};
use crate::event::CounterDeltas;
use crate::traits::{DrawRng, EntrantRepository};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A winner whose Waiting -> Selected transition did not commit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DrawError {
    pub user_id: Uuid,
    pub reason: String,
}

/// Result of one draw: committed winners plus per-item failures.
/// Committed winners are never rolled back on a later item's failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DrawOutcome {
    pub selected: Vec<Uuid>,
    pub errors: Vec<DrawError>,
}

/// Random promotion of waiting entrants to Selected
#[derive(Clone)]
pub struct LotteryDraw {
    repo: Arc<dyn EntrantRepository>,
    rng: Arc<dyn DrawRng>,
}

impl LotteryDraw {
    pub fn new(repo: Arc<dyn EntrantRepository>, rng: Arc<dyn DrawRng>) -> Self {
        Self { repo, rng }
    }

    /// Draw `count` winners from the event's waiting set
    ///
    /// Requires `0 < count <= |waiting set|`. Each winner is moved by one
    /// atomic transition; a stale or failed transition lands in
    /// `DrawOutcome::errors` and already-committed winners stay committed.
    pub async fn draw(&self, event_id: Uuid, count: usize) -> Result<DrawOutcome> {
        self.repo
            .get_event(event_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found(format!("event {event_id}")))?;

        let waiting = self.repo.list_waiting(event_id).await?;
        if count == 0 || count > waiting.len() {
            return Err(LifecycleError::validation(reasons::INVALID_DRAW_SIZE));
        }

        let mut pool: Vec<Uuid> = waiting.iter().map(|r| r.user_id).collect();
        self.rng.shuffle(&mut pool);
        pool.truncate(count);

        let mut outcome = DrawOutcome::default();
        for user_id in pool {
            let result = self
                .repo
                .transition(
                    event_id,
                    user_id,
                    EntrantState::Waiting,
                    EntrantState::Selected,
                    CounterDeltas::selection(),
                )
                .await;
            match result {
                Ok(true) => outcome.selected.push(user_id),
                Ok(false) => {
                    warn!(%event_id, %user_id, "draw winner left waiting state before promotion");
                    outcome.errors.push(DrawError {
                        user_id,
                        reason: "no longer on waiting list".into(),
                    });
                }
                Err(e) => {
                    warn!(%event_id, %user_id, error = %e, "draw promotion failed");
                    outcome.errors.push(DrawError {
                        user_id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            %event_id,
            requested = count,
            selected = outcome.selected.len(),
            failed = outcome.errors.len(),
            "lottery draw completed"
        );
        Ok(outcome)
    }

    /// Ids of entrants still Waiting after a draw (the losers), for an
    /// explicit caller-side notification step.
    pub async fn remaining_waiting(&self, event_id: Uuid) -> Result<Vec<Uuid>> {
        let waiting = self.repo.list_waiting(event_id).await?;
        Ok(waiting.into_iter().map(|r| r.user_id).collect())
    }
}
