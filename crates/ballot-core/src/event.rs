// Event domain types
//
// An event is the parent scope for entrant records. It never transitions
// its own state; its counters are mutated as a side effect of every
// entrant-state transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// EventRecord - a capacity-limited occasion
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EventRecord {
    pub id: Uuid,
    pub name: String,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    /// Maximum waiting-list capacity; 0 means unlimited
    pub max_entrants: i32,
    pub require_geolocation: bool,
    /// Denormalized counters for fast display. Never a source of truth for
    /// gating decisions - those re-derive from the authoritative records.
    pub waitlisted: i32,
    pub selected: i32,
    pub enrolled: i32,
    pub cancelled: i32,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateEvent {
    pub name: String,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    #[serde(default)]
    pub max_entrants: i32,
    #[serde(default)]
    pub require_geolocation: bool,
}

/// Per-transition counter deltas, applied inside the same atomic operation
/// as the state change they accompany.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterDeltas {
    pub waitlisted: i32,
    pub selected: i32,
    pub enrolled: i32,
    pub cancelled: i32,
}

impl CounterDeltas {
    /// Waiting -> Selected
    pub fn selection() -> Self {
        Self {
            waitlisted: -1,
            selected: 1,
            ..Default::default()
        }
    }

    /// Selected -> Enrolled
    pub fn acceptance() -> Self {
        Self {
            selected: -1,
            enrolled: 1,
            ..Default::default()
        }
    }

    /// Selected -> Cancelled
    pub fn declination() -> Self {
        Self {
            selected: -1,
            cancelled: 1,
            ..Default::default()
        }
    }
}
