// Eligibility gate
//
// Validates a join request against current membership, event capacity and
// the event's geolocation requirement before admission to Waiting.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::entrant::{EntrantRecord, EntrantState};
use crate::error::{reasons, LifecycleError, Result};
use crate::traits::{EntrantRepository, LocationProvider};

/// Gatekeeper for joining and leaving the waiting list
#[derive(Clone)]
pub struct EligibilityGate {
    repo: Arc<dyn EntrantRepository>,
    locations: Arc<dyn LocationProvider>,
}

impl EligibilityGate {
    pub fn new(repo: Arc<dyn EntrantRepository>, locations: Arc<dyn LocationProvider>) -> Self {
        Self { repo, locations }
    }

    /// Admit a user to the waiting list
    ///
    /// Preconditions are checked in order, first failure wins:
    /// 1. the event exists;
    /// 2. the user is not Enrolled or Selected;
    /// 3. the user is not Cancelled (terminal, re-joining is rejected);
    /// 4. the user is not already Waiting;
    /// 5. the waiting list has a free slot when capacity is bounded;
    /// 6. a location resolves when the event requires one.
    ///
    /// The capacity check re-derives the waiting-set size from the
    /// authoritative records, not the denormalized counter.
    pub async fn join(&self, event_id: Uuid, user_id: Uuid) -> Result<EntrantRecord> {
        let event = self
            .repo
            .get_event(event_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found(format!("event {event_id}")))?;

        if let Some(existing) = self.repo.get_entrant(event_id, user_id).await? {
            let reason = match existing.state {
                EntrantState::Enrolled | EntrantState::Selected => reasons::ALREADY_ENGAGED,
                EntrantState::Cancelled => reasons::CANNOT_REJOIN,
                EntrantState::Waiting => reasons::ALREADY_WAITING,
            };
            return Err(LifecycleError::conflict(reason));
        }

        if event.max_entrants > 0 {
            let waiting = self.repo.waiting_count(event_id).await?;
            if waiting >= event.max_entrants as i64 {
                return Err(LifecycleError::conflict(reasons::WAITING_LIST_FULL));
            }
        }

        let location = if event.require_geolocation {
            match self.locations.resolve(user_id).await? {
                Some(point) => Some(point),
                None => return Err(LifecycleError::conflict(reasons::LOCATION_REQUIRED)),
            }
        } else {
            None
        };

        let record = EntrantRecord::waiting(event_id, user_id, location);
        let admitted = self
            .repo
            .insert_waiting(record.clone(), event.max_entrants)
            .await?;
        if !admitted {
            // Lost a race between the check above and the conditional write
            return Err(LifecycleError::conflict(reasons::WAITING_LIST_FULL));
        }

        info!(%event_id, %user_id, "entrant admitted to waiting list");
        Ok(record)
    }

    /// Remove a Waiting entrant from the waiting list
    ///
    /// Only valid from Waiting; selected and enrolled entrants go through
    /// the decision handler instead. Repeated calls keep returning
    /// NotFound and never double-decrement the counter.
    pub async fn leave(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let removed = self.repo.remove_waiting(event_id, user_id).await?;
        if !removed {
            return Err(LifecycleError::not_found(format!(
                "no waiting entrant {user_id} for event {event_id}"
            )));
        }
        info!(%event_id, %user_id, "entrant left waiting list");
        Ok(())
    }
}
