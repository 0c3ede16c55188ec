use crate::fixtures::test_app::TestApp;
use serde_json::Value;

#[tokio::test]
async fn hotel_crud_roundtrip() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let resp = app
        .auth_post("/api/hotels", token)
        .json(&serde_json::json!({
            "name": "Hotel Acropolis View",
            "slug": "acropolis-view",
            "city": "Athens",
            "country": "Greece",
            "stars": 4,
            "amenities": ["wifi", "pool"],
            "room_types": [{
                "name": "Standard",
                "capacity_costs": { "double": 80.0, "single": 60.0 },
                "capacity_prices": { "double": 110.0, "single": 85.0 },
                "features": ["balcony"],
            }],
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    let hotel_id = json["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["is_active"], true);

    // Listing filters by city
    let resp = app
        .auth_get("/api/hotels?city=Athens", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let resp = app
        .auth_get("/api/hotels?city=Thessaloniki", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["data"].as_array().unwrap().is_empty());

    // Update stars
    let resp = app
        .auth_put(&format!("/api/hotels/{}", hotel_id), token)
        .json(&serde_json::json!({ "stars": 5 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["stars"], 5);

    // Delete deactivates instead of removing
    let resp = app
        .auth_delete(&format!("/api/hotels/{}", hotel_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);

    let resp = app.auth_get("/api/hotels", token).send().await.unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["data"].as_array().unwrap().is_empty());

    // Still addressable directly
    let resp = app
        .auth_get(&format!("/api/hotels/{}", hotel_id), token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["is_active"], false);
}

#[tokio::test]
async fn duplicate_hotel_slug_conflicts() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let body = serde_json::json!({
        "name": "Hotel One",
        "slug": "same-slug",
        "city": "Athens",
        "country": "Greece",
    });
    let resp = app
        .auth_post("/api/hotels", token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let resp = app
        .auth_post("/api/hotels", token)
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);
}

#[tokio::test]
async fn viewer_cannot_manage_inventory() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;

    let resp = app
        .auth_post("/api/hotels", &staff.viewer.access_token)
        .json(&serde_json::json!({
            "name": "Nope",
            "slug": "nope",
            "city": "Athens",
            "country": "Greece",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 403);

    // Read access is still allowed
    let resp = app
        .auth_get("/api/hotels", &staff.viewer.access_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 200);
}

#[tokio::test]
async fn transport_price_derives_from_markup_when_omitted() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let resp = app
        .auth_post("/api/transports", token)
        .json(&serde_json::json!({
            "name": "City transfer",
            "transport_type": "bus",
            "cost": 100.0,
            "markup": { "markup_type": "percentage", "value": 20.0 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["cost"], 100.0);
    assert_eq!(json["data"]["price"], 120.0);
}

#[tokio::test]
async fn explicit_transport_price_wins_over_markup() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let resp = app
        .auth_post("/api/transports", token)
        .json(&serde_json::json!({
            "name": "Ferry crossing",
            "transport_type": "ferry",
            "cost": 100.0,
            "price": 145.0,
            "markup": { "markup_type": "percentage", "value": 20.0 },
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);

    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["price"], 145.0);
}

#[tokio::test]
async fn flights_filter_by_route() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    app.seed_flight(token, 300.0).await; // SKP -> ATH

    let resp = app
        .auth_get("/api/flights?from=SKP&to=ATH", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let resp = app
        .auth_get("/api/flights?from=VIE", token)
        .send()
        .await
        .unwrap();
    let json: Value = resp.json().await.unwrap();
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn supplier_create_list_and_duplicate_code() {
    let app = TestApp::spawn().await;
    let staff = app.seed_staff().await;
    let token = &staff.admin.access_token;

    let resp = app
        .auth_post("/api/suppliers", token)
        .json(&serde_json::json!({
            "name": "Hellenic Hotels Group",
            "code": "HHG",
            "contact_email": "sales@hhg.example",
            "payment_terms": "net 30",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    let supplier_id = json["data"]["id"].as_str().unwrap().to_string();

    let resp = app
        .auth_post("/api/suppliers", token)
        .json(&serde_json::json!({
            "name": "Another Group",
            "code": "HHG",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 409);

    // Hotels can reference the supplier
    let resp = app
        .auth_post("/api/hotels", token)
        .json(&serde_json::json!({
            "name": "Hotel Poseidon",
            "slug": "poseidon",
            "city": "Athens",
            "country": "Greece",
            "supplier_id": supplier_id,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 201);
    let json: Value = resp.json().await.unwrap();
    assert_eq!(json["data"]["supplier_id"], supplier_id.as_str());
}
