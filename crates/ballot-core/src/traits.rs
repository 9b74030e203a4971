// Core traits for pluggable backends
//
// These traits allow the lifecycle components to be used with different
// backends:
// - In-memory implementations for examples and testing
// - Postgres implementations for production
//
// Every state transition goes through EntrantRepository so the atomicity
// unit (state move + counter delta, or notification batch + audit log)
// lives in exactly one place.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entrant::{EntrantRecord, EntrantState, GeoPoint, Profile};
use crate::error::Result;
use crate::event::{CounterDeltas, CreateEvent, EventRecord};
use crate::notification::{NotificationLog, NotificationRecord};

// ============================================================================
// EntrantRepository - canonical event / entrant / notification storage
// ============================================================================

/// Storage interface for the entrant lifecycle
///
/// Implementations must guarantee that each method is atomic: a transition
/// is never partially visible (record moved but counter not, or the other
/// way around), and a broadcast commits all recipient records and the log
/// together or not at all.
#[async_trait]
pub trait EntrantRepository: Send + Sync {
    /// Create an event with zeroed counters
    async fn create_event(&self, input: CreateEvent) -> Result<EventRecord>;

    /// Fetch an event by id
    async fn get_event(&self, event_id: Uuid) -> Result<Option<EventRecord>>;

    /// Fetch the one entrant record for (event_id, user_id), if any
    async fn get_entrant(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<EntrantRecord>>;

    /// Authoritative count of Waiting records. Gating decisions use this,
    /// never the denormalized counter on the event.
    async fn waiting_count(&self, event_id: Uuid) -> Result<i64>;

    /// Snapshot of the Waiting set (not a live cursor)
    async fn list_waiting(&self, event_id: Uuid) -> Result<Vec<EntrantRecord>>;

    /// Admit a new Waiting record and increment the waitlisted counter,
    /// atomically, conditional on no record existing for the pair and -
    /// when `capacity > 0` - on a fresh waiting count below capacity.
    /// Returns false when the condition failed at commit time.
    async fn insert_waiting(&self, record: EntrantRecord, capacity: i32) -> Result<bool>;

    /// Remove a Waiting record and decrement the waitlisted counter,
    /// atomically. Returns false when the user holds no Waiting record;
    /// repeats never double-decrement.
    async fn remove_waiting(&self, event_id: Uuid, user_id: Uuid) -> Result<bool>;

    /// The transition atomicity unit: move the record from `from` to `to`
    /// and apply the counter deltas in one commit. Returns false when the
    /// record is not currently in `from` (stale state); nothing is written
    /// in that case.
    async fn transition(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        from: EntrantState,
        to: EntrantState,
        deltas: CounterDeltas,
    ) -> Result<bool>;

    /// Commit a broadcast: all recipient notification records plus the one
    /// audit log entry, as a single atomic batch.
    async fn append_broadcast(
        &self,
        records: Vec<NotificationRecord>,
        log: NotificationLog,
    ) -> Result<()>;

    /// Delete pending selection-offer notifications for a responder.
    /// Returns the number deleted.
    async fn delete_selection_notices(&self, event_id: Uuid, user_id: Uuid) -> Result<u64>;

    /// List a recipient's inbox, newest first
    async fn list_notifications(&self, recipient_id: Uuid) -> Result<Vec<NotificationRecord>>;

    /// Set the read flag on one notification. Returns false when missing.
    async fn mark_notification_read(&self, id: Uuid) -> Result<bool>;

    /// List the audit log for an event, newest first
    async fn list_logs(&self, event_id: Uuid) -> Result<Vec<NotificationLog>>;
}

// ============================================================================
// ProfileStore - external profile collaborator
// ============================================================================

/// Read-only access to user profiles
///
/// A missing profile is "unknown", never an error; callers fall back to a
/// masked identifier when they need a display name.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;

    /// Resolve a display name, falling back to the masked identifier
    async fn display_name(&self, user_id: Uuid) -> Result<String> {
        let name = self
            .get_profile(user_id)
            .await?
            .and_then(|p| p.full_name)
            .filter(|n| !n.is_empty());
        Ok(name.unwrap_or_else(|| crate::notification::masked_name(user_id)))
    }
}

// ============================================================================
// LocationProvider - external geolocation collaborator
// ============================================================================

/// Supplies a resolved location or an explicit failure signal. This core
/// never drives the sensor or permission flows itself.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Ok(Some(point)) when resolved, Ok(None) when the provider could not
    /// produce a fix
    async fn resolve(&self, user_id: Uuid) -> Result<Option<GeoPoint>>;
}

// ============================================================================
// DrawRng - randomness seam for the lottery draw
// ============================================================================

/// Uniform shuffle used by the lottery draw
///
/// Production implementations are non-deterministic; tests inject a seeded
/// implementation for reproducibility.
pub trait DrawRng: Send + Sync {
    fn shuffle(&self, ids: &mut Vec<Uuid>);
}
