// In-memory implementations for examples and testing
//
// These implementations keep all data in memory, making them perfect for:
// - Unit tests and the scenario suite
// - Standalone examples that don't need a database
//
// All collections live behind one RwLock so each repository method is
// naturally atomic: a transition mutates the entrant record and the event
// counters under the same write guard.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entrant::{EntrantRecord, EntrantState, GeoPoint, Profile};
use crate::error::{LifecycleError, Result};
use crate::event::{CounterDeltas, CreateEvent, EventRecord};
use crate::notification::{NotificationKind, NotificationLog, NotificationRecord};
use crate::traits::{EntrantRepository, LocationProvider, ProfileStore};

#[derive(Debug, Default)]
struct MemoryState {
    events: HashMap<Uuid, EventRecord>,
    entrants: HashMap<(Uuid, Uuid), EntrantRecord>,
    notifications: Vec<NotificationRecord>,
    logs: Vec<NotificationLog>,
}

impl MemoryState {
    fn apply_deltas(&mut self, event_id: Uuid, deltas: CounterDeltas) {
        if let Some(event) = self.events.get_mut(&event_id) {
            event.waitlisted += deltas.waitlisted;
            event.selected += deltas.selected;
            event.enrolled += deltas.enrolled;
            event.cancelled += deltas.cancelled;
        }
    }
}

// ============================================================================
// InMemoryRepository
// ============================================================================

/// In-memory entrant repository
#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    state: Arc<RwLock<MemoryState>>,
    fail_broadcasts: Arc<AtomicBool>,
    stale_users: Arc<RwLock<HashSet<Uuid>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent append_broadcast calls fail before writing anything
    /// (for exercising broadcast atomicity in tests)
    pub fn set_fail_broadcasts(&self, fail: bool) {
        self.fail_broadcasts.store(fail, Ordering::SeqCst);
    }

    /// Force transitions for this user to report stale state (for
    /// exercising partial-failure paths in tests)
    pub async fn mark_stale(&self, user_id: Uuid) {
        self.stale_users.write().await.insert(user_id);
    }

    /// Pre-populate an entrant record (useful for testing)
    pub async fn seed_entrant(&self, record: EntrantRecord) {
        let mut state = self.state.write().await;
        state
            .entrants
            .insert((record.event_id, record.user_id), record);
    }

    /// All notification records currently held, across every inbox
    pub async fn all_notifications(&self) -> Vec<NotificationRecord> {
        self.state.read().await.notifications.clone()
    }
}

#[async_trait]
impl EntrantRepository for InMemoryRepository {
    async fn create_event(&self, input: CreateEvent) -> Result<EventRecord> {
        let event = EventRecord {
            id: Uuid::now_v7(),
            name: input.name,
            organizer_id: input.organizer_id,
            organizer_name: input.organizer_name,
            max_entrants: input.max_entrants,
            require_geolocation: input.require_geolocation,
            waitlisted: 0,
            selected: 0,
            enrolled: 0,
            cancelled: 0,
            created_at: chrono::Utc::now(),
        };
        self.state.write().await.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Option<EventRecord>> {
        Ok(self.state.read().await.events.get(&event_id).cloned())
    }

    async fn get_entrant(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<EntrantRecord>> {
        Ok(self
            .state
            .read()
            .await
            .entrants
            .get(&(event_id, user_id))
            .cloned())
    }

    async fn waiting_count(&self, event_id: Uuid) -> Result<i64> {
        Ok(self
            .state
            .read()
            .await
            .entrants
            .values()
            .filter(|r| r.event_id == event_id && r.state == EntrantState::Waiting)
            .count() as i64)
    }

    async fn list_waiting(&self, event_id: Uuid) -> Result<Vec<EntrantRecord>> {
        let mut waiting: Vec<EntrantRecord> = self
            .state
            .read()
            .await
            .entrants
            .values()
            .filter(|r| r.event_id == event_id && r.state == EntrantState::Waiting)
            .cloned()
            .collect();
        waiting.sort_by_key(|r| r.joined_at);
        Ok(waiting)
    }

    async fn insert_waiting(&self, record: EntrantRecord, capacity: i32) -> Result<bool> {
        let mut state = self.state.write().await;
        let key = (record.event_id, record.user_id);
        if state.entrants.contains_key(&key) {
            return Ok(false);
        }
        if capacity > 0 {
            let waiting = state
                .entrants
                .values()
                .filter(|r| r.event_id == record.event_id && r.state == EntrantState::Waiting)
                .count() as i32;
            if waiting >= capacity {
                return Ok(false);
            }
        }
        let event_id = record.event_id;
        state.entrants.insert(key, record);
        state.apply_deltas(
            event_id,
            CounterDeltas {
                waitlisted: 1,
                ..Default::default()
            },
        );
        Ok(true)
    }

    async fn remove_waiting(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        let is_waiting = matches!(
            state.entrants.get(&(event_id, user_id)),
            Some(record) if record.state == EntrantState::Waiting
        );
        if !is_waiting {
            return Ok(false);
        }
        state.entrants.remove(&(event_id, user_id));
        state.apply_deltas(
            event_id,
            CounterDeltas {
                waitlisted: -1,
                ..Default::default()
            },
        );
        Ok(true)
    }

    async fn transition(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        from: EntrantState,
        to: EntrantState,
        deltas: CounterDeltas,
    ) -> Result<bool> {
        if self.stale_users.read().await.contains(&user_id) {
            return Ok(false);
        }
        let mut state = self.state.write().await;
        match state.entrants.get_mut(&(event_id, user_id)) {
            Some(record) if record.state == from => {
                record.state = to;
                record.updated_at = chrono::Utc::now();
            }
            _ => return Ok(false),
        }
        state.apply_deltas(event_id, deltas);
        Ok(true)
    }

    async fn append_broadcast(
        &self,
        records: Vec<NotificationRecord>,
        log: NotificationLog,
    ) -> Result<()> {
        if self.fail_broadcasts.load(Ordering::SeqCst) {
            return Err(LifecycleError::storage("broadcast commit failed"));
        }
        let mut state = self.state.write().await;
        state.notifications.extend(records);
        state.logs.push(log);
        Ok(())
    }

    async fn delete_selection_notices(&self, event_id: Uuid, user_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.notifications.len();
        state.notifications.retain(|n| {
            !(n.event_id == event_id
                && n.recipient_id == user_id
                && n.kind == NotificationKind::SelectionOffer)
        });
        Ok((before - state.notifications.len()) as u64)
    }

    async fn list_notifications(&self, recipient_id: Uuid) -> Result<Vec<NotificationRecord>> {
        let mut inbox: Vec<NotificationRecord> = self
            .state
            .read()
            .await
            .notifications
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(inbox)
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        let mut state = self.state.write().await;
        match state.notifications.iter_mut().find(|n| n.id == id) {
            Some(record) => {
                record.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_logs(&self, event_id: Uuid) -> Result<Vec<NotificationLog>> {
        let mut logs: Vec<NotificationLog> = self
            .state
            .read()
            .await
            .logs
            .iter()
            .filter(|l| l.event_id == event_id)
            .cloned()
            .collect();
        logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(logs)
    }
}

// ============================================================================
// InMemoryProfileStore
// ============================================================================

/// In-memory profile store keyed by user id
#[derive(Debug, Default, Clone)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<Uuid, Profile>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a profile to the store
    pub async fn add_profile(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.user_id, profile);
    }

    /// Convenience: register a named user and return their id
    pub async fn add_named(&self, name: &str) -> Uuid {
        let user_id = Uuid::now_v7();
        self.add_profile(Profile {
            user_id,
            full_name: Some(name.to_string()),
            email: None,
            notifications_enabled: true,
        })
        .await;
        user_id
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(&user_id).cloned())
    }
}

// ============================================================================
// FixedLocationProvider
// ============================================================================

/// Location provider returning the same answer for every user
///
/// `FixedLocationProvider::none()` models a failed resolution.
#[derive(Debug, Default, Clone)]
pub struct FixedLocationProvider {
    point: Option<GeoPoint>,
}

impl FixedLocationProvider {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            point: Some(GeoPoint {
                latitude,
                longitude,
            }),
        }
    }

    pub fn none() -> Self {
        Self { point: None }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn resolve(&self, _user_id: Uuid) -> Result<Option<GeoPoint>> {
        Ok(self.point)
    }
}
