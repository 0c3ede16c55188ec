use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tripdesk_services::notify::{
    EmailMessage, EmailSender, NotifyError, PushOutcome, PushPayload, PushSender, PushStatus,
};

use crate::fixtures::test_app::TestApp;

/// Fake push transport: records every send and reports tokens containing
/// "stale" as unregistered.
struct MockPushSender {
    sends: Mutex<Vec<Vec<String>>>,
}

impl MockPushSender {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sends: Mutex::new(Vec::new()),
        })
    }

    fn sent_batches(&self) -> Vec<Vec<String>> {
        self.sends.lock().unwrap().clone()
    }
}

#[async_trait]
impl PushSender for MockPushSender {
    async fn send(
        &self,
        tokens: &[String],
        _payload: &PushPayload,
    ) -> Result<Vec<PushOutcome>, NotifyError> {
        self.sends.lock().unwrap().push(tokens.to_vec());
        Ok(tokens
            .iter()
            .map(|token| PushOutcome {
                token: token.clone(),
                status: if token.contains("stale") {
                    PushStatus::InvalidToken
                } else {
                    PushStatus::Delivered
                },
            })
            .collect())
    }
}

struct MockEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailSender {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            sent: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl EmailSender for MockEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

async fn spawn_with_mocks() -> (TestApp, Arc<MockPushSender>, Arc<MockEmailSender>) {
    let push = MockPushSender::new();
    let email = MockEmailSender::new();
    let app = TestApp::spawn_with_senders(
        |settings| {
            settings.push.enabled = true;
            settings.email.enabled = true;
        },
        push.clone(),
        email.clone(),
    )
    .await;
    (app, push, email)
}

fn seeded_offer_body(slug: &str) -> Value {
    serde_json::json!({
        "code": format!("PKG-{}", slug.to_uppercase()),
        "name": "Athens Getaway",
        "slug": slug,
        "offer_type": "package",
        "pricing": {
            "currency": "EUR",
            "base": { "adult": 340.0, "child": 340.0, "infant": 0.0 },
            "base_price": null,
            "final_price": null,
        },
    })
}

async fn create_booking(app: &TestApp, token: &str, offer_id: &Value) -> Value {
    let resp = app
        .auth_post("/api/bookings", token)
        .json(&serde_json::json!({
            "offer_id": offer_id,
            "contact": { "name": "Maria", "email": "maria@example.com" },
            "passengers": [{ "full_name": "Maria", "passenger_type": "adult" }],
        }))
        .send()
        .await
        .expect("Create booking failed");
    let status = resp.status().as_u16();
    let json: Value = resp.json().await.expect("Failed to parse booking");
    assert_eq!(status, 201, "Create booking failed: {}", json);
    json["data"].clone()
}

/// Poll `/api/auth/me` until the predicate holds or a deadline passes.
/// Push fan-out runs in a detached task, so assertions on its side
/// effects need to wait for it.
async fn wait_for_me(app: &TestApp, token: &str, predicate: impl Fn(&Value) -> bool) -> Value {
    for _ in 0..50 {
        let resp = app.auth_get("/api/auth/me", token).send().await.unwrap();
        let json: Value = resp.json().await.unwrap();
        if predicate(&json["data"]) {
            return json["data"].clone();
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("Condition not reached within deadline");
}

#[tokio::test]
async fn booking_creates_an_in_app_notification() {
    let (app, _push, _email) = spawn_with_mocks().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app.seed_offer(token, seeded_offer_body("notify-1")).await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    create_booking(&app, token, &offer["id"]).await;

    let resp = app.auth_get("/api/notifications", token).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"], "booking");
    assert_eq!(items[0]["is_read"], false);
    assert_eq!(items[0]["sent_via"]["in_app"], true);
    assert!(items[0]["action"]["url"].as_str().unwrap().starts_with("/bookings/BK-"));
}

#[tokio::test]
async fn stale_push_tokens_are_pruned_after_fan_out() {
    let (app, push, _email) = spawn_with_mocks().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    for device in ["device-live", "device-stale"] {
        app.auth_post("/api/auth/fcm-token", token)
            .json(&serde_json::json!({ "token": device }))
            .send()
            .await
            .unwrap();
    }

    let offer = app.seed_offer(token, seeded_offer_body("notify-2")).await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    create_booking(&app, token, &offer["id"]).await;

    let me = wait_for_me(&app, token, |data| {
        data["fcm_tokens"] == serde_json::json!(["device-live"])
    })
    .await;
    assert_eq!(me["fcm_tokens"], serde_json::json!(["device-live"]));

    let batches = push.sent_batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0], vec!["device-live", "device-stale"]);
}

#[tokio::test]
async fn confirmation_sends_the_booking_email() {
    let (app, _push, email) = spawn_with_mocks().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app.seed_offer(token, seeded_offer_body("notify-3")).await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    let booking = create_booking(&app, token, &offer["id"]).await;

    let resp = app
        .auth_post(
            &format!("/api/bookings/{}/confirm", booking["id"].as_str().unwrap()),
            token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let sent = email.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "maria@example.com");
    assert!(sent[0].subject.contains(booking["booking_number"].as_str().unwrap()));
}

#[tokio::test]
async fn mark_read_and_unread_count() {
    let (app, _push, _email) = spawn_with_mocks().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app.seed_offer(token, seeded_offer_body("notify-4")).await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    create_booking(&app, token, &offer["id"]).await;
    create_booking(&app, token, &offer["id"]).await;

    let resp = app
        .auth_get("/api/notifications/unread-count", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["unread"], 2);

    let resp = app.auth_get("/api/notifications", token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    let first_id = json["data"][0]["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_put(&format!("/api/notifications/{}/read", first_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get("/api/notifications/unread-count", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["unread"], 1);

    let resp = app
        .auth_get("/api/notifications?unread_only=true", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let resp = app
        .auth_put("/api/notifications/read-all", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["updated"], 1);

    let resp = app
        .auth_get("/api/notifications/unread-count", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["unread"], 0);
}

#[tokio::test]
async fn notifications_are_private_to_their_owner() {
    let (app, _push, _email) = spawn_with_mocks().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app.seed_offer(token, seeded_offer_body("notify-5")).await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    create_booking(&app, token, &offer["id"]).await;

    let resp = app.auth_get("/api/notifications", token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    let notification_id = json["data"][0]["id"].as_str().unwrap().to_string();

    // The viewer sees an empty list and cannot touch the admin's entries
    let resp = app
        .auth_get("/api/notifications", &staff.viewer.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["data"].as_array().unwrap().is_empty());

    let resp = app
        .auth_put(
            &format!("/api/notifications/{}/read", notification_id),
            &staff.viewer.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);

    let resp = app
        .auth_delete(
            &format!("/api/notifications/{}", notification_id),
            &staff.viewer.access_token,
        )
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 404);
}

#[tokio::test]
async fn pin_and_delete_notification() {
    let (app, _push, _email) = spawn_with_mocks().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app.seed_offer(token, seeded_offer_body("notify-6")).await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    create_booking(&app, token, &offer["id"]).await;

    let resp = app.auth_get("/api/notifications", token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    let id = json["data"][0]["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_put(&format!("/api/notifications/{}/pin", id), token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["is_pinned"], true);

    let resp = app
        .auth_put(&format!("/api/notifications/{}/pin", id), token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["is_pinned"], false);

    let resp = app
        .auth_delete(&format!("/api/notifications/{}", id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.auth_get("/api/notifications", token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["data"].as_array().unwrap().is_empty());
}
