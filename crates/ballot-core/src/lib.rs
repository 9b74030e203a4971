// Entrant Lifecycle Abstraction
//
// This crate provides a DB-agnostic implementation of the entrant
// lifecycle for capacity-limited events: waiting -> selected ->
// enrolled | cancelled, plus the lottery draw that promotes waiting
// entrants and the notification fan-out that accompanies transitions.
//
// Key design decisions:
// - Uses traits (EntrantRepository, ProfileStore, LocationProvider) for pluggable backends
// - Every state transition flows through one repository atomicity unit
//   (state move + counter delta committed together, never independently)
// - The denormalized event counters are display caches; gating decisions
//   re-derive sizes from the authoritative records
// - Draw randomness is injected via DrawRng (thread_rng in production,
//   seeded in tests)
// - Broadcast commits recipient records and the audit log as one batch
// - Error handling distinguishes validation, state conflicts and storage
//   failures, with stable reason strings for user-visible rejections

// Domain entity types
// These are DB-agnostic entity types used by both storage and API
pub mod entrant;
pub mod event;
pub mod notification;

pub mod decision;
pub mod dispatch;
pub mod draw;
pub mod error;
pub mod gate;
pub mod rng;
pub mod traits;

// In-memory implementations for examples and testing
pub mod memory;

// Re-exports for convenience
pub use decision::DecisionHandler;
pub use dispatch::NotificationDispatcher;
pub use draw::{DrawError, DrawOutcome, LotteryDraw};
pub use entrant::{Decision, EntrantRecord, EntrantState, GeoPoint, Profile};
pub use error::{LifecycleError, Result};
pub use event::{CounterDeltas, CreateEvent, EventRecord};
pub use gate::EligibilityGate;
pub use notification::{
    masked_name, NotificationKind, NotificationLog, NotificationRecord, RECIPIENT_SAMPLE_LIMIT,
};
pub use rng::{SeededRng, SystemRng};
pub use traits::{DrawRng, EntrantRepository, LocationProvider, ProfileStore};
