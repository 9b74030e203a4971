// Integration tests for the entrant lifecycle
//
// These tests run the full gate -> draw -> decision -> dispatch flow over
// the in-memory repository and verify the lifecycle invariants: state
// exclusivity, monotonic transitions, capacity bounds and broadcast
// atomicity.

use ballot_core::{
    memory::{FixedLocationProvider, InMemoryProfileStore, InMemoryRepository},
    CreateEvent, Decision, DecisionHandler, EligibilityGate, EntrantRepository, EntrantState,
    LifecycleError, LotteryDraw, NotificationDispatcher, NotificationKind, SeededRng,
};
use std::sync::Arc;
use uuid::Uuid;

struct Harness {
    repo: InMemoryRepository,
    profiles: InMemoryProfileStore,
    gate: EligibilityGate,
    draw: LotteryDraw,
    decisions: DecisionHandler,
    dispatcher: NotificationDispatcher,
}

impl Harness {
    fn new(seed: u64) -> Self {
        let repo = InMemoryRepository::new();
        let profiles = InMemoryProfileStore::new();
        let repo_arc: Arc<InMemoryRepository> = Arc::new(repo.clone());
        Self {
            gate: EligibilityGate::new(
                repo_arc.clone(),
                Arc::new(FixedLocationProvider::at(53.52, -113.53)),
            ),
            draw: LotteryDraw::new(repo_arc.clone(), Arc::new(SeededRng::new(seed))),
            decisions: DecisionHandler::new(repo_arc.clone()),
            dispatcher: NotificationDispatcher::new(repo_arc, Arc::new(profiles.clone())),
            repo,
            profiles,
        }
    }

    async fn make_event(&self, max_entrants: i32) -> Uuid {
        let organizer_id = self.profiles.add_named("Olive Organizer").await;
        self.repo
            .create_event(CreateEvent {
                name: "Community Dinner".into(),
                organizer_id,
                organizer_name: "Olive".into(),
                max_entrants,
                require_geolocation: false,
            })
            .await
            .unwrap()
            .id
    }
}

// Scenario 1: capacity = 2, third join is rejected
#[tokio::test]
async fn capacity_bound_holds_after_joins() {
    let h = Harness::new(1);
    let event_id = h.make_event(2).await;
    let (a, b, c) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());

    h.gate.join(event_id, a).await.unwrap();
    h.gate.join(event_id, b).await.unwrap();

    let event = h.repo.get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.waitlisted, 2);

    let err = h.gate.join(event_id, c).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Conflict(ref r) if r == "waiting list full"));
    assert_eq!(h.repo.waiting_count(event_id).await.unwrap(), 2);
}

// Scenario 2: draw(1) over {A, B} selects exactly one
#[tokio::test]
async fn draw_selects_one_and_leaves_the_other_waiting() {
    let h = Harness::new(7);
    let event_id = h.make_event(0).await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
    h.gate.join(event_id, a).await.unwrap();
    h.gate.join(event_id, b).await.unwrap();

    let outcome = h.draw.draw(event_id, 1).await.unwrap();
    assert_eq!(outcome.selected.len(), 1);

    let winner = outcome.selected[0];
    let loser = if winner == a { b } else { a };
    assert!(winner == a || winner == b);

    let winner_rec = h.repo.get_entrant(event_id, winner).await.unwrap().unwrap();
    let loser_rec = h.repo.get_entrant(event_id, loser).await.unwrap().unwrap();
    assert_eq!(winner_rec.state, EntrantState::Selected);
    assert_eq!(loser_rec.state, EntrantState::Waiting);

    let event = h.repo.get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.selected, 1);
    assert_eq!(event.waitlisted, 1);
}

// Scenarios 3 and 4: accept enrolls, decline cancels terminally
#[tokio::test]
async fn responses_move_selected_to_terminal_states() {
    let h = Harness::new(11);
    let event_id = h.make_event(0).await;
    let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
    h.gate.join(event_id, a).await.unwrap();
    h.gate.join(event_id, b).await.unwrap();

    let outcome = h.draw.draw(event_id, 2).await.unwrap();
    assert_eq!(outcome.selected.len(), 2);

    // Selection offers land in both inboxes
    h.dispatcher
        .broadcast(
            event_id,
            &outcome.selected,
            "You were selected! Accept or decline.",
            NotificationKind::SelectionOffer,
        )
        .await
        .unwrap();

    h.decisions.respond(event_id, a, Decision::Accept).await.unwrap();
    h.decisions.respond(event_id, b, Decision::Decline).await.unwrap();

    let event = h.repo.get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.enrolled, 1);
    assert_eq!(event.cancelled, 1);
    assert_eq!(event.selected, 0);

    // Acting on the offer deleted it from the inbox
    assert!(h.repo.list_notifications(a).await.unwrap().is_empty());
    assert!(h.repo.list_notifications(b).await.unwrap().is_empty());

    // Cancelled is terminal: rejoin is rejected
    let err = h.gate.join(event_id, b).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Conflict(ref r) if r == "cannot rejoin after cancellation"));

    // Enrolled cannot be moved anywhere either
    let err = h.decisions.respond(event_id, a, Decision::Decline).await.unwrap_err();
    assert!(matches!(err, LifecycleError::Conflict(_)));
    let record = h.repo.get_entrant(event_id, a).await.unwrap().unwrap();
    assert_eq!(record.state, EntrantState::Enrolled);
}

// Scenario 5: broadcast to two resolvable profiles
#[tokio::test]
async fn broadcast_writes_two_records_and_one_log() {
    let h = Harness::new(13);
    let event_id = h.make_event(0).await;
    let a = h.profiles.add_named("Ada Lovelace").await;
    let b = h.profiles.add_named("Ben Franklin").await;

    let log = h
        .dispatcher
        .broadcast(event_id, &[a, b], "Update", NotificationKind::Info)
        .await
        .unwrap();

    assert_eq!(log.recipient_count, 2);
    assert_eq!(log.recipient_names, vec!["Ada Lovelace", "Ben Franklin"]);
    assert_eq!(h.repo.list_notifications(a).await.unwrap().len(), 1);
    assert_eq!(h.repo.list_notifications(b).await.unwrap().len(), 1);
    assert_eq!(h.repo.list_logs(event_id).await.unwrap().len(), 1);
}

// Scenario 6: empty broadcast writes nothing
#[tokio::test]
async fn empty_broadcast_fails_with_zero_writes() {
    let h = Harness::new(17);
    let event_id = h.make_event(0).await;

    let err = h
        .dispatcher
        .broadcast(event_id, &[], "Update", NotificationKind::Info)
        .await
        .unwrap_err();
    assert!(matches!(err, LifecycleError::Validation(ref r) if r == "no recipients"));
    assert!(h.repo.all_notifications().await.is_empty());
    assert!(h.repo.list_logs(event_id).await.unwrap().is_empty());
}

// Exclusivity: one record per (event, user) through the whole lifecycle
#[tokio::test]
async fn exclusivity_invariant_holds_across_the_lifecycle() {
    let h = Harness::new(23);
    let event_id = h.make_event(0).await;
    let users: Vec<Uuid> = (0..6).map(|_| Uuid::now_v7()).collect();
    for &u in &users {
        h.gate.join(event_id, u).await.unwrap();
    }

    h.draw.draw(event_id, 3).await.unwrap();

    // Every user still holds exactly one record in exactly one state
    let mut by_state = std::collections::HashMap::new();
    for &u in &users {
        let record = h.repo.get_entrant(event_id, u).await.unwrap().unwrap();
        *by_state.entry(record.state).or_insert(0) += 1;
    }
    assert_eq!(by_state.get(&EntrantState::Waiting), Some(&3));
    assert_eq!(by_state.get(&EntrantState::Selected), Some(&3));

    // Counters agree with the authoritative records
    let event = h.repo.get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.waitlisted as i64, h.repo.waiting_count(event_id).await.unwrap());
    assert_eq!(event.selected, 3);
}

// Loser notification is an explicit caller step, never a draw side effect
#[tokio::test]
async fn losers_can_be_notified_explicitly_after_a_draw() {
    let h = Harness::new(29);
    let event_id = h.make_event(0).await;
    for _ in 0..4 {
        h.gate.join(event_id, Uuid::now_v7()).await.unwrap();
    }

    h.draw.draw(event_id, 1).await.unwrap();
    assert!(h.repo.all_notifications().await.is_empty());

    let losers = h.draw.remaining_waiting(event_id).await.unwrap();
    assert_eq!(losers.len(), 3);
    let log = h
        .dispatcher
        .broadcast(
            event_id,
            &losers,
            "You were not selected this time.",
            NotificationKind::NotSelected,
        )
        .await
        .unwrap();
    assert_eq!(log.recipient_count, 3);
    for user_id in losers {
        let inbox = h.repo.list_notifications(user_id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationKind::NotSelected);
    }
}
