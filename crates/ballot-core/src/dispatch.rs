// Notification dispatcher
//
// Fans one message out to a set of recipient inboxes and appends the
// audit log entry for the broadcast, committed together as one atomic
// batch. Delivery is at-least-once: retries are the caller's problem and
// produce duplicate inbox entries plus a second log entry.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::{reasons, LifecycleError, Result};
use crate::notification::{
    NotificationKind, NotificationLog, NotificationRecord, RECIPIENT_SAMPLE_LIMIT,
};
use crate::traits::{EntrantRepository, ProfileStore};

/// Organizer-initiated notification fan-out with audit logging
#[derive(Clone)]
pub struct NotificationDispatcher {
    repo: Arc<dyn EntrantRepository>,
    profiles: Arc<dyn ProfileStore>,
}

impl NotificationDispatcher {
    pub fn new(repo: Arc<dyn EntrantRepository>, profiles: Arc<dyn ProfileStore>) -> Self {
        Self { repo, profiles }
    }

    /// Deliver `message` to every recipient and append one audit entry
    ///
    /// Fails fast with "no recipients" on an empty list. The log records
    /// the full recipient count plus display names for the first
    /// RECIPIENT_SAMPLE_LIMIT recipients in input order; an unresolvable
    /// name renders as a masked identifier. Either all recipient records
    /// and the log commit, or none do.
    pub async fn broadcast(
        &self,
        event_id: Uuid,
        recipients: &[Uuid],
        message: &str,
        kind: NotificationKind,
    ) -> Result<NotificationLog> {
        if recipients.is_empty() {
            return Err(LifecycleError::validation(reasons::NO_RECIPIENTS));
        }

        let event = self
            .repo
            .get_event(event_id)
            .await?
            .ok_or_else(|| LifecycleError::not_found(format!("event {event_id}")))?;

        let organizer_name = self
            .profiles
            .get_profile(event.organizer_id)
            .await?
            .and_then(|p| p.full_name)
            .filter(|n| !n.is_empty())
            .unwrap_or(event.organizer_name);

        let records: Vec<NotificationRecord> = recipients
            .iter()
            .map(|&recipient_id| NotificationRecord::new(recipient_id, event_id, message, kind))
            .collect();

        let mut recipient_names = Vec::with_capacity(RECIPIENT_SAMPLE_LIMIT.min(recipients.len()));
        for &recipient_id in recipients.iter().take(RECIPIENT_SAMPLE_LIMIT) {
            recipient_names.push(self.profiles.display_name(recipient_id).await?);
        }

        let log = NotificationLog {
            id: Uuid::now_v7(),
            event_id,
            event_name: event.name,
            organizer_id: event.organizer_id,
            organizer_name,
            message: message.to_string(),
            recipient_count: recipients.len() as i32,
            recipient_ids: recipients.to_vec(),
            recipient_names,
            created_at: chrono::Utc::now(),
        };

        self.repo.append_broadcast(records, log.clone()).await?;

        info!(
            %event_id,
            log_id = %log.id,
            recipients = log.recipient_count,
            kind = %kind,
            "broadcast delivered"
        );
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CreateEvent;
    use crate::memory::{InMemoryProfileStore, InMemoryRepository};
    use crate::notification::masked_name;

    async fn setup() -> (
        InMemoryRepository,
        InMemoryProfileStore,
        NotificationDispatcher,
        Uuid,
    ) {
        let repo = InMemoryRepository::new();
        let profiles = InMemoryProfileStore::new();
        let organizer_id = profiles.add_named("Alex Organizer").await;
        let event = repo
            .create_event(CreateEvent {
                name: "Art Class".into(),
                organizer_id,
                organizer_name: "Alex".into(),
                max_entrants: 0,
                require_geolocation: false,
            })
            .await
            .unwrap();
        let dispatcher =
            NotificationDispatcher::new(Arc::new(repo.clone()), Arc::new(profiles.clone()));
        (repo, profiles, dispatcher, event.id)
    }

    #[tokio::test]
    async fn broadcast_delivers_to_every_inbox_and_logs_once() {
        let (repo, profiles, dispatcher, event_id) = setup().await;
        let a = profiles.add_named("Ada").await;
        let b = profiles.add_named("Ben").await;

        let log = dispatcher
            .broadcast(event_id, &[a, b], "Update", NotificationKind::Info)
            .await
            .unwrap();

        assert_eq!(log.recipient_count, 2);
        assert_eq!(log.recipient_names, vec!["Ada", "Ben"]);
        assert_eq!(log.organizer_name, "Alex Organizer");

        for user in [a, b] {
            let inbox = repo.list_notifications(user).await.unwrap();
            assert_eq!(inbox.len(), 1);
            assert_eq!(inbox[0].message, "Update");
            assert_eq!(inbox[0].kind, NotificationKind::Info);
            assert!(!inbox[0].read);
        }
        assert_eq!(repo.list_logs(event_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_recipient_list_fails_fast_with_zero_writes() {
        let (repo, _, dispatcher, event_id) = setup().await;

        let err = dispatcher
            .broadcast(event_id, &[], "Update", NotificationKind::Info)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Validation(ref r) if r == reasons::NO_RECIPIENTS));
        assert!(repo.all_notifications().await.is_empty());
        assert!(repo.list_logs(event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_commit_leaves_no_partial_state() {
        let (repo, profiles, dispatcher, event_id) = setup().await;
        let a = profiles.add_named("Ada").await;
        repo.set_fail_broadcasts(true);

        let err = dispatcher
            .broadcast(event_id, &[a], "Update", NotificationKind::Info)
            .await
            .unwrap_err();
        assert!(matches!(err, LifecycleError::Storage(_)));
        assert!(repo.all_notifications().await.is_empty());
        assert!(repo.list_logs(event_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sample_names_cap_at_ten_with_masked_fallback() {
        let (_, profiles, dispatcher, event_id) = setup().await;

        let mut recipients = Vec::new();
        for i in 0..12 {
            if i % 2 == 0 {
                recipients.push(profiles.add_named(&format!("User {i}")).await);
            } else {
                // No profile: name must render masked
                recipients.push(Uuid::now_v7());
            }
        }

        let log = dispatcher
            .broadcast(event_id, &recipients, "Hello", NotificationKind::Info)
            .await
            .unwrap();

        assert_eq!(log.recipient_count, 12);
        assert_eq!(log.recipient_ids.len(), 12);
        assert_eq!(log.recipient_names.len(), RECIPIENT_SAMPLE_LIMIT);
        assert_eq!(log.recipient_names[0], "User 0");
        assert_eq!(log.recipient_names[1], masked_name(recipients[1]));
    }

    #[tokio::test]
    async fn duplicate_broadcasts_are_not_deduplicated() {
        let (repo, profiles, dispatcher, event_id) = setup().await;
        let a = profiles.add_named("Ada").await;

        for _ in 0..2 {
            dispatcher
                .broadcast(event_id, &[a], "Same message", NotificationKind::Info)
                .await
                .unwrap();
        }

        assert_eq!(repo.list_notifications(a).await.unwrap().len(), 2);
        assert_eq!(repo.list_logs(event_id).await.unwrap().len(), 2);
    }
}
