// Integration tests for Ballot API
// Run with: cargo test --test integration_test -- --ignored
// Requires a running server (DATABASE_URL configured, migrations applied).

use serde_json::{json, Value};
use uuid::Uuid;

const API_BASE_URL: &str = "http://localhost:9000";

#[tokio::test]
#[ignore] // Run with: cargo test --test integration_test -- --ignored
async fn test_full_lifecycle_workflow() {
    let client = reqwest::Client::new();

    println!("🧪 Testing full entrant lifecycle...");

    // Step 1: Create an event with capacity 2
    println!("\n📝 Step 1: Creating event...");
    let organizer_id = Uuid::now_v7();
    let create_response = client
        .post(format!("{}/v1/events", API_BASE_URL))
        .json(&json!({
            "name": "Pottery Workshop",
            "organizer_id": organizer_id,
            "organizer_name": "Morgan",
            "max_entrants": 2,
            "require_geolocation": false
        }))
        .send()
        .await
        .expect("Failed to create event");
    assert_eq!(create_response.status(), 201);
    let event: Value = create_response.json().await.expect("Failed to parse event");
    let event_id = event["id"].as_str().unwrap().to_string();
    println!("✅ Created event: {}", event_id);

    // Step 2: Register profiles for two entrants
    println!("\n👤 Step 2: Creating profiles...");
    let user_a = Uuid::now_v7();
    let user_b = Uuid::now_v7();
    for (user, name) in [(user_a, "Ada"), (user_b, "Ben")] {
        let response = client
            .put(format!("{}/v1/users/{}/profile", API_BASE_URL, user))
            .json(&json!({ "full_name": name }))
            .send()
            .await
            .expect("Failed to upsert profile");
        assert_eq!(response.status(), 200);
    }

    // Step 3: Both join; a third join bounces off the capacity limit
    println!("\n🚪 Step 3: Joining waiting list...");
    for user in [user_a, user_b] {
        let response = client
            .post(format!("{}/v1/events/{}/entrants", API_BASE_URL, event_id))
            .json(&json!({ "user_id": user }))
            .send()
            .await
            .expect("Failed to join");
        assert_eq!(response.status(), 201);
    }
    let response = client
        .post(format!("{}/v1/events/{}/entrants", API_BASE_URL, event_id))
        .json(&json!({ "user_id": Uuid::now_v7() }))
        .send()
        .await
        .expect("Failed to send join");
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["reason"], "waiting list full");
    println!("✅ Capacity limit enforced");

    // Step 4: Draw one winner with notifications
    println!("\n🎲 Step 4: Running draw...");
    let response = client
        .post(format!("{}/v1/events/{}/draw", API_BASE_URL, event_id))
        .json(&json!({ "count": 1, "notify_winners": true, "notify_losers": true }))
        .send()
        .await
        .expect("Failed to draw");
    assert_eq!(response.status(), 200);
    let draw: Value = response.json().await.expect("Failed to parse draw");
    let selected = draw["selected"].as_array().unwrap();
    assert_eq!(selected.len(), 1);
    assert!(draw["winner_log_id"].is_string());
    assert!(draw["loser_log_id"].is_string());
    let winner: Uuid = selected[0].as_str().unwrap().parse().unwrap();
    println!("✅ Winner: {}", winner);

    // Step 5: Winner's inbox holds the selection offer
    println!("\n📬 Step 5: Checking inbox...");
    let response = client
        .get(format!("{}/v1/users/{}/notifications", API_BASE_URL, winner))
        .send()
        .await
        .expect("Failed to list inbox");
    assert_eq!(response.status(), 200);
    let inbox: Value = response.json().await.unwrap();
    let offers: Vec<&Value> = inbox["data"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|n| n["kind"] == "selection_offer")
        .collect();
    assert!(!offers.is_empty());

    // Step 6: Winner accepts; counters move and the offer disappears
    println!("\n✅ Step 6: Accepting selection...");
    let response = client
        .post(format!(
            "{}/v1/events/{}/entrants/{}/response",
            API_BASE_URL, event_id, winner
        ))
        .json(&json!({ "decision": "accept" }))
        .send()
        .await
        .expect("Failed to respond");
    assert_eq!(response.status(), 204);

    let response = client
        .get(format!("{}/v1/events/{}", API_BASE_URL, event_id))
        .send()
        .await
        .expect("Failed to get event");
    let event: Value = response.json().await.unwrap();
    assert_eq!(event["enrolled"], 1);
    assert_eq!(event["selected"], 0);
    assert_eq!(event["waitlisted"], 1);

    // Step 7: Audit log recorded both broadcasts
    println!("\n📜 Step 7: Checking audit log...");
    let response = client
        .get(format!("{}/v1/events/{}/broadcasts", API_BASE_URL, event_id))
        .send()
        .await
        .expect("Failed to list broadcasts");
    let logs: Value = response.json().await.unwrap();
    assert_eq!(logs["data"].as_array().unwrap().len(), 2);

    // Step 8: Empty broadcast is rejected with zero writes
    let response = client
        .post(format!("{}/v1/events/{}/broadcasts", API_BASE_URL, event_id))
        .json(&json!({ "recipient_ids": [], "message": "Update" }))
        .send()
        .await
        .expect("Failed to send broadcast");
    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["reason"], "no recipients");

    println!("\n🎉 Full lifecycle workflow passed!");
}
