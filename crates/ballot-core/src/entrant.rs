// Entrant domain types
//
// An EntrantRecord is the canonical per-event, per-user state. The four
// lifecycle states are mutually exclusive partitions of the same logical
// entity: at most one record exists per (event_id, user_id).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Entrant lifecycle state
///
/// Legal transitions are Waiting -> Selected, Selected -> Enrolled and
/// Selected -> Cancelled. Enrolled and Cancelled are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum EntrantState {
    Waiting,
    Selected,
    Enrolled,
    Cancelled,
}

impl EntrantState {
    /// Whether this state admits no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntrantState::Enrolled | EntrantState::Cancelled)
    }
}

impl std::fmt::Display for EntrantState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntrantState::Waiting => write!(f, "waiting"),
            EntrantState::Selected => write!(f, "selected"),
            EntrantState::Enrolled => write!(f, "enrolled"),
            EntrantState::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl From<&str> for EntrantState {
    fn from(s: &str) -> Self {
        match s {
            "selected" => EntrantState::Selected,
            "enrolled" => EntrantState::Enrolled,
            "cancelled" => EntrantState::Cancelled,
            _ => EntrantState::Waiting,
        }
    }
}

/// A resolved geolocation captured at join time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// EntrantRecord - one user's position in one event's lifecycle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct EntrantRecord {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub state: EntrantState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EntrantRecord {
    /// Create a fresh Waiting record for a join
    pub fn waiting(event_id: Uuid, user_id: Uuid, location: Option<GeoPoint>) -> Self {
        let now = Utc::now();
        Self {
            event_id,
            user_id,
            state: EntrantState::Waiting,
            latitude: location.map(|p| p.latitude),
            longitude: location.map(|p| p.longitude),
            joined_at: now,
            updated_at: now,
        }
    }
}

/// An entrant's response to a selection offer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Decline,
}

/// Minimal profile view supplied by the external profile store
///
/// A missing profile is treated as "unknown", not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Profile {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub notifications_enabled: bool,
}
