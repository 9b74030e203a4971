// Notification domain types
//
// NotificationRecord is one message in one recipient's inbox; the
// NotificationLog is the append-only audit entry for the whole broadcast.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Maximum number of resolved display names recorded in an audit entry.
/// The full recipient count is always recorded regardless of this cap.
pub const RECIPIENT_SAMPLE_LIMIT: usize = 10;

/// Notification type tag
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Actionable: the recipient won a draw and must accept or decline
    SelectionOffer,
    /// The recipient was not selected in a draw
    NotSelected,
    /// Plain organizer announcement
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::SelectionOffer => write!(f, "selection_offer"),
            NotificationKind::NotSelected => write!(f, "not_selected"),
            NotificationKind::Info => write!(f, "info"),
        }
    }
}

impl From<&str> for NotificationKind {
    fn from(s: &str) -> Self {
        match s {
            "selection_offer" => NotificationKind::SelectionOffer,
            "not_selected" => NotificationKind::NotSelected,
            _ => NotificationKind::Info,
        }
    }
}

/// NotificationRecord - one message addressed to one recipient
///
/// Never mutated except the read flag; deleted when the recipient acts on
/// an actionable notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotificationRecord {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    pub fn new(
        recipient_id: Uuid,
        event_id: Uuid,
        message: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            recipient_id,
            event_id,
            message: message.into(),
            kind,
            read: false,
            created_at: Utc::now(),
        }
    }
}

/// NotificationLog - immutable audit entry for one broadcast
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotificationLog {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub message: String,
    /// Full recipient count, not just the sampled names below
    pub recipient_count: i32,
    pub recipient_ids: Vec<Uuid>,
    /// Resolved display names for the first RECIPIENT_SAMPLE_LIMIT
    /// recipients, in input order
    pub recipient_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Masked identifier for a recipient whose display name could not be
/// resolved, derived from the user id.
pub fn masked_name(user_id: Uuid) -> String {
    let simple = user_id.simple().to_string();
    format!("entrant-{}", &simple[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masked_name_is_stable_and_short() {
        let id = Uuid::now_v7();
        let a = masked_name(id);
        let b = masked_name(id);
        assert_eq!(a, b);
        assert!(a.starts_with("entrant-"));
        assert_eq!(a.len(), "entrant-".len() + 8);
    }

    #[test]
    fn kind_round_trips_through_wire_strings() {
        for kind in [
            NotificationKind::SelectionOffer,
            NotificationKind::NotSelected,
            NotificationKind::Info,
        ] {
            assert_eq!(NotificationKind::from(kind.to_string().as_str()), kind);
        }
    }
}
