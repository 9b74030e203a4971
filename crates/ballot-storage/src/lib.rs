// Postgres storage layer with sqlx
//
// This crate provides database implementations for core traits:
// - DbEntrantRepository: implements EntrantRepository with transactional
//   state transitions (state move + counter delta commit together)
// - DbProfileStore: implements ProfileStore for display-name resolution

pub mod entrant_repository;
pub mod models;
pub mod profile_store;
pub mod repositories;

pub use entrant_repository::DbEntrantRepository;
pub use models::*;
pub use profile_store::DbProfileStore;
pub use repositories::Database;
