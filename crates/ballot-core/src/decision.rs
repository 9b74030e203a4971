// Decision handler
//
// Processes an entrant's accept/decline response to a selection offer.
// This is the only path by which user action reaches the Cancelled
// terminal state.

use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::entrant::{Decision, EntrantState};
use crate::error::{reasons, LifecycleError, Result};
use crate::event::CounterDeltas;
use crate::traits::EntrantRepository;

/// Handles accept/decline responses from selected entrants
#[derive(Clone)]
pub struct DecisionHandler {
    repo: Arc<dyn EntrantRepository>,
}

impl DecisionHandler {
    pub fn new(repo: Arc<dyn EntrantRepository>) -> Self {
        Self { repo }
    }

    /// Apply an entrant's response to their selection
    ///
    /// Accept moves Selected -> Enrolled, Decline moves Selected ->
    /// Cancelled; either way the pending selection-offer notification is
    /// removed afterwards. Responding from any other state is a conflict,
    /// as is losing the transition race to a concurrent responder.
    pub async fn respond(&self, event_id: Uuid, user_id: Uuid, decision: Decision) -> Result<()> {
        let record = self
            .repo
            .get_entrant(event_id, user_id)
            .await?
            .ok_or_else(|| LifecycleError::conflict(reasons::NOT_SELECTED))?;
        if record.state != EntrantState::Selected {
            return Err(LifecycleError::conflict(reasons::NOT_SELECTED));
        }

        let (to, deltas) = match decision {
            Decision::Accept => (EntrantState::Enrolled, CounterDeltas::acceptance()),
            Decision::Decline => (EntrantState::Cancelled, CounterDeltas::declination()),
        };

        let moved = self
            .repo
            .transition(event_id, user_id, EntrantState::Selected, to, deltas)
            .await?;
        if !moved {
            return Err(LifecycleError::conflict(reasons::NOT_SELECTED));
        }

        let deleted = self.repo.delete_selection_notices(event_id, user_id).await?;
        debug!(%event_id, %user_id, deleted, "cleared pending selection notices");

        info!(%event_id, %user_id, state = %to, "entrant responded to selection");
        Ok(())
    }
}
