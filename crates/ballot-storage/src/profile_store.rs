// Database-backed ProfileStore implementation
//
// Read path for the notification dispatcher's display-name resolution.
// A missing row maps to None, which callers render as a masked identifier.

use async_trait::async_trait;
use ballot_core::{LifecycleError, Profile, ProfileStore, Result};
use uuid::Uuid;

use crate::repositories::Database;

/// Database-backed profile store
#[derive(Clone)]
pub struct DbProfileStore {
    db: Database,
}

impl DbProfileStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileStore for DbProfileStore {
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let row = self
            .db
            .get_profile(user_id)
            .await
            .map_err(LifecycleError::Storage)?;
        Ok(row.map(Into::into))
    }
}
