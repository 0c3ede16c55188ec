use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn register_creates_user_and_returns_tokens() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "alice@agency.test",
            "full_name": "Alice",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["success"], true);
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"]["refresh_token"].is_string());
    assert_eq!(json["data"]["user"]["email"], "alice@agency.test");
}

#[tokio::test]
async fn first_user_is_super_admin_later_users_are_viewers() {
    let app = TestApp::spawn().await;

    let first = app
        .register_user("first@agency.test", "First", "Password123!")
        .await;
    let second = app
        .register_user("second@agency.test", "Second", "Password123!")
        .await;

    let resp = app
        .auth_get("/api/auth/me", &first.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["role"], "super_admin");

    let resp = app
        .auth_get("/api/auth/me", &second.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["role"], "viewer");
}

#[tokio::test]
async fn register_duplicate_email_fails() {
    let app = TestApp::spawn().await;

    app.register_user("dup@agency.test", "User One", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "dup@agency.test",
            "full_name": "User Two",
            "password": "Password123!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({
            "email": "short@agency.test",
            "full_name": "Shorty",
            "password": "short",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn login_with_wrong_password_fails() {
    let app = TestApp::spawn().await;

    app.register_user("bob@agency.test", "Bob", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": "bob@agency.test",
            "password": "WrongPassword!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn refresh_returns_new_token_pair() {
    let app = TestApp::spawn().await;

    let user = app
        .register_user("carol@agency.test", "Carol", "Password123!")
        .await;

    let resp = app
        .client
        .post(app.url("/api/auth/refresh"))
        .json(&serde_json::json!({ "refresh_token": user.refresh_token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    let new_access = json["data"]["access_token"].as_str().unwrap();

    let resp = app.auth_get("/api/auth/me", new_access).send().await.unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn deactivated_user_cannot_login() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;

    let resp = app
        .auth_put(
            &format!("/api/users/{}/active", staff.viewer.id),
            &staff.admin.access_token,
        )
        .json(&serde_json::json!({ "is_active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({
            "email": staff.viewer.email,
            "password": "Viewer123!",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn me_requires_authentication() {
    let app = TestApp::spawn().await;

    let resp = app
        .client
        .get(app.url("/api/auth/me"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 401);
}

#[tokio::test]
async fn viewer_cannot_manage_users() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;

    let resp = app
        .auth_get("/api/users", &staff.viewer.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn admin_can_promote_a_viewer() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;

    let resp = app
        .auth_put(
            &format!("/api/users/{}/role", staff.viewer.id),
            &staff.admin.access_token,
        )
        .json(&serde_json::json!({ "role": "agent" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["role"], "agent");

    // Role change takes effect after the viewer refreshes their token
    let refreshed = app
        .login_user(&staff.viewer.email, "Viewer123!")
        .await;
    let resp = app
        .auth_get("/api/bookings", &refreshed.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn fcm_token_registration_roundtrip() {
    let app = TestApp::spawn().await;
    let user = app
        .register_user("push@agency.test", "Push User", "Password123!")
        .await;

    let resp = app
        .auth_post("/api/auth/fcm-token", &user.access_token)
        .json(&serde_json::json!({ "token": "device-token-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Adding the same token twice is a no-op
    app.auth_post("/api/auth/fcm-token", &user.access_token)
        .json(&serde_json::json!({ "token": "device-token-1" }))
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get("/api/auth/me", &user.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["fcm_tokens"], serde_json::json!(["device-token-1"]));

    let resp = app
        .auth_delete("/api/auth/fcm-token", &user.access_token)
        .json(&serde_json::json!({ "token": "device-token-1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get("/api/auth/me", &user.access_token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["fcm_tokens"], serde_json::json!([]));
}
