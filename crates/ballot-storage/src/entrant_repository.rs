// Database-backed EntrantRepository implementation
//
// Thin adapter mapping the core repository trait onto Database queries.
// The atomicity contract lives in the Database transactions; this layer
// only converts rows and errors.

use async_trait::async_trait;
use ballot_core::{
    CounterDeltas, CreateEvent, EntrantRecord, EntrantRepository, EntrantState, EventRecord,
    LifecycleError, NotificationLog, NotificationRecord, Result,
};
use uuid::Uuid;

use crate::repositories::Database;

/// Postgres-backed entrant repository
#[derive(Clone)]
pub struct DbEntrantRepository {
    db: Database,
}

impl DbEntrantRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn storage_err(e: anyhow::Error) -> LifecycleError {
    LifecycleError::Storage(e)
}

#[async_trait]
impl EntrantRepository for DbEntrantRepository {
    async fn create_event(&self, input: CreateEvent) -> Result<EventRecord> {
        let row = self.db.create_event(input).await.map_err(storage_err)?;
        Ok(row.into())
    }

    async fn get_event(&self, event_id: Uuid) -> Result<Option<EventRecord>> {
        let row = self.db.get_event(event_id).await.map_err(storage_err)?;
        Ok(row.map(Into::into))
    }

    async fn get_entrant(&self, event_id: Uuid, user_id: Uuid) -> Result<Option<EntrantRecord>> {
        let row = self
            .db
            .get_entrant(event_id, user_id)
            .await
            .map_err(storage_err)?;
        Ok(row.map(Into::into))
    }

    async fn waiting_count(&self, event_id: Uuid) -> Result<i64> {
        self.db.count_waiting(event_id).await.map_err(storage_err)
    }

    async fn list_waiting(&self, event_id: Uuid) -> Result<Vec<EntrantRecord>> {
        let rows = self.db.list_waiting(event_id).await.map_err(storage_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert_waiting(&self, record: EntrantRecord, _capacity: i32) -> Result<bool> {
        // The capacity hint is ignored here: the transaction re-reads
        // max_entrants under a row lock, so the check cannot go stale.
        self.db.insert_waiting(&record).await.map_err(storage_err)
    }

    async fn remove_waiting(&self, event_id: Uuid, user_id: Uuid) -> Result<bool> {
        self.db
            .remove_waiting(event_id, user_id)
            .await
            .map_err(storage_err)
    }

    async fn transition(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        from: EntrantState,
        to: EntrantState,
        deltas: CounterDeltas,
    ) -> Result<bool> {
        self.db
            .transition(event_id, user_id, from, to, deltas)
            .await
            .map_err(storage_err)
    }

    async fn append_broadcast(
        &self,
        records: Vec<NotificationRecord>,
        log: NotificationLog,
    ) -> Result<()> {
        self.db
            .append_broadcast(&records, &log)
            .await
            .map_err(storage_err)
    }

    async fn delete_selection_notices(&self, event_id: Uuid, user_id: Uuid) -> Result<u64> {
        self.db
            .delete_selection_notices(event_id, user_id)
            .await
            .map_err(storage_err)
    }

    async fn list_notifications(&self, recipient_id: Uuid) -> Result<Vec<NotificationRecord>> {
        let rows = self
            .db
            .list_notifications(recipient_id)
            .await
            .map_err(storage_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn mark_notification_read(&self, id: Uuid) -> Result<bool> {
        self.db
            .mark_notification_read(id)
            .await
            .map_err(storage_err)
    }

    async fn list_logs(&self, event_id: Uuid) -> Result<Vec<NotificationLog>> {
        let rows = self.db.list_logs(event_id).await.map_err(storage_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
