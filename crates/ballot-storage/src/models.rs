// Database models (internal, may differ from public DTOs)

use ballot_core::{
    EntrantRecord, EntrantState, EventRecord, NotificationKind, NotificationLog,
    NotificationRecord, Profile,
};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub name: String,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub max_entrants: i32,
    pub require_geolocation: bool,
    pub waitlisted: i32,
    pub selected: i32,
    pub enrolled: i32,
    pub cancelled: i32,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for EventRecord {
    fn from(row: EventRow) -> Self {
        EventRecord {
            id: row.id,
            name: row.name,
            organizer_id: row.organizer_id,
            organizer_name: row.organizer_name,
            max_entrants: row.max_entrants,
            require_geolocation: row.require_geolocation,
            waitlisted: row.waitlisted,
            selected: row.selected,
            enrolled: row.enrolled,
            cancelled: row.cancelled,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct EntrantRow {
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub state: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub joined_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EntrantRow> for EntrantRecord {
    fn from(row: EntrantRow) -> Self {
        EntrantRecord {
            event_id: row.event_id,
            user_id: row.user_id,
            state: EntrantState::from(row.state.as_str()),
            latitude: row.latitude,
            longitude: row.longitude,
            joined_at: row.joined_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub notifications_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Profile {
            user_id: row.user_id,
            full_name: row.full_name,
            email: row.email,
            notifications_enabled: row.notifications_enabled,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub event_id: Uuid,
    pub message: String,
    pub kind: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for NotificationRecord {
    fn from(row: NotificationRow) -> Self {
        NotificationRecord {
            id: row.id,
            recipient_id: row.recipient_id,
            event_id: row.event_id,
            message: row.message,
            kind: NotificationKind::from(row.kind.as_str()),
            read: row.read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct NotificationLogRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub organizer_id: Uuid,
    pub organizer_name: String,
    pub message: String,
    pub recipient_count: i32,
    pub recipient_ids: Vec<Uuid>,
    pub recipient_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationLogRow> for NotificationLog {
    fn from(row: NotificationLogRow) -> Self {
        NotificationLog {
            id: row.id,
            event_id: row.event_id,
            event_name: row.event_name,
            organizer_id: row.organizer_id,
            organizer_name: row.organizer_name,
            message: row.message,
            recipient_count: row.recipient_count,
            recipient_ids: row.recipient_ids,
            recipient_names: row.recipient_names,
            created_at: row.created_at,
        }
    }
}
