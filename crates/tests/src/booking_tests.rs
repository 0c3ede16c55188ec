use crate::fixtures::test_app::TestApp;
use serde_json::Value;

fn published_package_body(slug: &str, flight_id: &str, transport_id: &str) -> Value {
    serde_json::json!({
        "code": format!("PKG-{}", slug.to_uppercase()),
        "name": "Athens Getaway",
        "slug": slug,
        "offer_type": "package",
        "destination": "Athens",
        "nights": 4,
        "items": [
            {
                "resource_id": flight_id,
                "resource_type": "flight",
                "mandatory": true,
                "flight_details": {
                    "pricing": { "adult": 300.0 },
                },
            },
            {
                "resource_id": transport_id,
                "resource_type": "transport",
                "transport_details": {
                    "pricing": { "adult": 40.0 },
                },
            },
        ],
    })
}

/// Seed a published 340-per-adult package and return its offer JSON.
async fn seed_published_package(app: &TestApp, token: &str, slug: &str) -> Value {
    let flight = app.seed_flight(token, 300.0).await;
    let transport = app.seed_transport(token, 40.0).await;
    let offer = app
        .seed_offer(
            token,
            published_package_body(
                slug,
                flight["id"].as_str().unwrap(),
                transport["id"].as_str().unwrap(),
            ),
        )
        .await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;
    offer
}

fn family_passengers() -> Value {
    serde_json::json!([
        { "full_name": "Maria Papadopoulou", "passenger_type": "adult" },
        { "full_name": "Nikos Papadopoulos", "passenger_type": "adult" },
        { "full_name": "Eleni Papadopoulou", "passenger_type": "child" },
        { "full_name": "Baby Papadopoulou", "passenger_type": "infant" },
    ])
}

#[tokio::test]
async fn public_booking_snapshots_the_quoted_price() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;
    let offer = seed_published_package(&app, token, "athens-snap").await;

    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "athens-snap",
            "contact": {
                "name": "Maria Papadopoulou",
                "email": "maria@example.com",
                "phone": "+30 69 1234 5678",
            },
            "passengers": family_passengers(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    let booking = &json["data"];
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["pricing"]["unit_price"], 340.0);
    assert_eq!(booking["pricing"]["adults"], 2);
    assert_eq!(booking["pricing"]["children"], 1);
    assert_eq!(booking["pricing"]["infants"], 1);
    // 2 adults + 1 child at the unit price, infants free
    assert_eq!(booking["pricing"]["total"], 1020.0);

    // Raise the flight price in the offer; the booking keeps its snapshot
    let resp = app
        .auth_put(
            &format!("/api/offers/{}", offer["id"].as_str().unwrap()),
            token,
        )
        .json(&serde_json::json!({
            "items": [{
                "resource_id": offer["items"][0]["resource_id"],
                "resource_type": "flight",
                "flight_details": { "pricing": { "adult": 999.0 } },
            }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app
        .auth_get(
            &format!("/api/bookings/{}", booking["id"].as_str().unwrap()),
            token,
        )
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["pricing"]["total"], 1020.0);
}

#[tokio::test]
async fn base_price_table_takes_precedence() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app
        .seed_offer(
            token,
            serde_json::json!({
                "code": "PKG-BASE",
                "name": "Fixed-price escape",
                "slug": "fixed-escape",
                "offer_type": "package",
                "pricing": {
                    "currency": "EUR",
                    "base": { "adult": 500.0, "child": 300.0, "infant": 50.0 },
                    "base_price": null,
                    "final_price": null,
                },
            }),
        )
        .await;
    app.publish_offer(token, offer["id"].as_str().unwrap())
        .await;

    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "fixed-escape",
            "contact": { "name": "Ana", "email": "ana@example.com" },
            "passengers": family_passengers(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    // 2 * 500 + 1 * 300 + 1 * 50
    assert_eq!(json["data"]["pricing"]["total"], 1350.0);
}

#[tokio::test]
async fn cached_final_price_never_prices_a_checkout() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let offer = app
        .seed_offer(
            token,
            serde_json::json!({
                "code": "PKG-SEASIDE",
                "name": "Seaside room",
                "slug": "seaside",
                "offer_type": "package",
                "items": [{
                    "resource_id": bson::oid::ObjectId::new().to_hex(),
                    "resource_type": "hotel",
                    "hotel_details": {
                        "pricing": { "adult": 100.0 },
                        "capacity_adjustments": { "triple": 20.0 },
                        "feature_adjustments": { "ocean_view": 30.0 },
                    },
                }],
            }),
        )
        .await;
    let offer_id = offer["id"].as_str().unwrap();
    app.publish_offer(token, offer_id).await;

    // An operator refreshes the cache with an upgraded selection
    let resp = app
        .auth_post(&format!("/api/offers/{}/price", offer_id), token)
        .json(&serde_json::json!({
            "capacity": "triple",
            "features": ["ocean_view"],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["total"], 150.0);

    // A buyer selecting nothing pays the plain quote, not the cache
    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "seaside",
            "contact": { "name": "Maria", "email": "maria@example.com" },
            "passengers": [{ "full_name": "Maria", "passenger_type": "adult" }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["pricing"]["unit_price"], 100.0);
    assert_eq!(json["data"]["pricing"]["total"], 100.0);

    // A buyer selecting the upgrades pays for them
    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "seaside",
            "contact": { "name": "Nikos", "email": "nikos@example.com" },
            "passengers": [{ "full_name": "Nikos", "passenger_type": "adult" }],
            "selected": { "capacity": "triple", "features": ["ocean_view"] },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["pricing"]["total"], 150.0);
}

#[tokio::test]
async fn booking_requires_an_adult_passenger() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;
    seed_published_package(&app, token, "athens-adult").await;

    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "athens-adult",
            "contact": { "name": "Kid", "email": "kid@example.com" },
            "passengers": [
                { "full_name": "Eleni", "passenger_type": "child" },
            ],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "athens-adult",
            "contact": { "name": "Nobody", "email": "nobody@example.com" },
            "passengers": [],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn booking_number_is_prefixed_and_unambiguous() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;
    seed_published_package(&app, token, "athens-num").await;

    let resp = app
        .client
        .post(app.url("/api/public/bookings"))
        .json(&serde_json::json!({
            "offer_slug": "athens-num",
            "contact": { "name": "Maria", "email": "maria@example.com" },
            "passengers": [{ "full_name": "Maria", "passenger_type": "adult" }],
        }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let number = json["data"]["booking_number"].as_str().unwrap();

    assert!(number.starts_with("BK-"));
    assert_eq!(number.len(), 11);
    // Ambiguous characters are excluded from the alphabet
    let suffix = &number[3..];
    assert!(suffix.chars().all(|c| !"01IO".contains(c)));
}

#[tokio::test]
async fn status_transitions_follow_the_table() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;
    let offer = seed_published_package(&app, token, "athens-flow").await;

    let resp = app
        .auth_post("/api/bookings", token)
        .json(&serde_json::json!({
            "offer_id": offer["id"],
            "contact": { "name": "Maria", "email": "maria@example.com" },
            "passengers": [{ "full_name": "Maria", "passenger_type": "adult" }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    let booking_id = json["data"]["id"].as_str().unwrap().to_string();
    // Internal intake records the handling agent
    assert_eq!(json["data"]["status"], "pending");

    // Pending -> Completed is not allowed
    let resp = app
        .auth_post(&format!("/api/bookings/{}/complete", booking_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);

    // Pending -> Confirmed
    let resp = app
        .auth_post(&format!("/api/bookings/{}/confirm", booking_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["status"], "confirmed");

    // Confirmed -> Completed
    let resp = app
        .auth_post(&format!("/api/bookings/{}/complete", booking_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    // Completed is terminal
    let resp = app
        .auth_post(&format!("/api/bookings/{}/cancel", booking_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 422);
}

#[tokio::test]
async fn payment_status_update() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;
    let offer = seed_published_package(&app, token, "athens-pay").await;

    let resp = app
        .auth_post("/api/bookings", token)
        .json(&serde_json::json!({
            "offer_id": offer["id"],
            "contact": { "name": "Maria", "email": "maria@example.com" },
            "passengers": [{ "full_name": "Maria", "passenger_type": "adult" }],
        }))
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    let booking_id = json["data"]["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_put(&format!("/api/bookings/{}/payment", booking_id), token)
        .json(&serde_json::json!({ "payment_status": "paid" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["payment_status"], "paid");
}

#[tokio::test]
async fn viewer_cannot_create_internal_bookings() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let offer = seed_published_package(&app, &staff.admin.access_token, "athens-deny").await;

    let resp = app
        .auth_post("/api/bookings", &staff.viewer.access_token)
        .json(&serde_json::json!({
            "offer_id": offer["id"],
            "contact": { "name": "Maria", "email": "maria@example.com" },
            "passengers": [{ "full_name": "Maria", "passenger_type": "adult" }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);
}

#[tokio::test]
async fn bookings_can_be_filtered_by_status() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;
    let offer = seed_published_package(&app, token, "athens-filter").await;

    let mut ids = Vec::new();
    for i in 0..2 {
        let resp = app
            .auth_post("/api/bookings", token)
            .json(&serde_json::json!({
                "offer_id": offer["id"],
                "contact": { "name": format!("Guest {i}"), "email": format!("g{i}@example.com") },
                "passengers": [{ "full_name": format!("Guest {i}"), "passenger_type": "adult" }],
            }))
            .send()
            .await
            .unwrap();
        let json: Value = resp.json().await.unwrap();
        ids.push(json["data"]["id"].as_str().unwrap().to_string());
    }

    app.auth_post(&format!("/api/bookings/{}/confirm", ids[0]), token)
        .send()
        .await
        .unwrap();

    let resp = app
        .auth_get("/api/bookings?status=confirmed", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
    assert_eq!(json["pagination"]["total"], 1);
}
