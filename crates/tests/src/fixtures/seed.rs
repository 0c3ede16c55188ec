use serde_json::Value;

use super::test_app::TestApp;

/// Result of seeding the standard staff accounts.
pub struct SeededStaff {
    pub admin: SeededUser,
    pub viewer: SeededUser,
}

pub struct SeededUser {
    pub id: String,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestApp {
    /// Register a user and return their auth info.
    pub async fn register_user(&self, email: &str, full_name: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/register"))
            .json(&serde_json::json!({
                "email": email,
                "full_name": full_name,
                "password": password,
            }))
            .send()
            .await
            .expect("Register request failed");

        let status = resp.status().as_u16();
        let json: Value = resp.json().await.expect("Failed to parse register response");
        assert_eq!(status, 201, "Register failed: {}", json);

        SeededUser {
            id: json["data"]["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            access_token: json["data"]["access_token"].as_str().unwrap().to_string(),
            refresh_token: json["data"]["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Login a user and return their auth info.
    pub async fn login_user(&self, email: &str, password: &str) -> SeededUser {
        let resp = self
            .client
            .post(self.url("/api/auth/login"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Login request failed");

        assert!(
            resp.status().is_success(),
            "Login failed: {}",
            resp.text().await.unwrap_or_default()
        );

        let json: Value = resp.json().await.expect("Failed to parse login response");

        SeededUser {
            id: json["data"]["user"]["id"].as_str().unwrap().to_string(),
            email: email.to_string(),
            access_token: json["data"]["access_token"].as_str().unwrap().to_string(),
            refresh_token: json["data"]["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    /// Create an authenticated request with the given token.
    pub fn auth_get(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_post(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_put(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    pub fn auth_delete(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {}", token))
    }

    /// Seed the standard staff pair: the first registration becomes the
    /// super admin, the second stays a viewer.
    pub async fn seed_staff(&self) -> SeededStaff {
        let admin = self
            .register_user("admin@agency.test", "Agency Admin", "Admin123!")
            .await;
        let viewer = self
            .register_user("viewer@agency.test", "Agency Viewer", "Viewer123!")
            .await;
        SeededStaff { admin, viewer }
    }

    /// Create a flight with a single economy cabin priced at `price_adult`.
    pub async fn seed_flight(&self, token: &str, price_adult: f64) -> Value {
        let resp = self
            .auth_post("/api/flights", token)
            .json(&serde_json::json!({
                "airline": "Aegean",
                "flight_number": "A3 972",
                "route": { "from": "SKP", "to": "ATH" },
                "schedule": {
                    "departure_time": "08:40",
                    "arrival_time": "10:05",
                    "days_of_week": [1, 3, 5],
                },
                "cabins": [{
                    "class": "economy",
                    "cost_adult": price_adult * 0.8,
                    "price_adult": price_adult,
                    "cost_child": price_adult * 0.6,
                    "price_child": price_adult * 0.75,
                    "seats": 180,
                }],
            }))
            .send()
            .await
            .expect("Create flight failed");
        let status = resp.status().as_u16();
        let json: Value = resp.json().await.expect("Failed to parse flight response");
        assert_eq!(status, 201, "Create flight failed: {}", json);
        json["data"].clone()
    }

    /// Create an airport transfer priced at `price`.
    pub async fn seed_transport(&self, token: &str, price: f64) -> Value {
        let resp = self
            .auth_post("/api/transports", token)
            .json(&serde_json::json!({
                "name": "Athens airport transfer",
                "transport_type": "van",
                "route": { "from": "ATH", "to": "Athens center" },
                "cost": price * 0.7,
                "price": price,
                "capacity": 8,
            }))
            .send()
            .await
            .expect("Create transport failed");
        let status = resp.status().as_u16();
        let json: Value = resp
            .json()
            .await
            .expect("Failed to parse transport response");
        assert_eq!(status, 201, "Create transport failed: {}", json);
        json["data"].clone()
    }

    /// Create a draft offer from the given request body.
    pub async fn seed_offer(&self, token: &str, body: Value) -> Value {
        let resp = self
            .auth_post("/api/offers", token)
            .json(&body)
            .send()
            .await
            .expect("Create offer failed");
        let status = resp.status().as_u16();
        let json: Value = resp.json().await.expect("Failed to parse offer response");
        assert_eq!(status, 201, "Create offer failed: {}", json);
        json["data"].clone()
    }

    /// Publish an offer by id.
    pub async fn publish_offer(&self, token: &str, offer_id: &str) {
        let resp = self
            .auth_post(&format!("/api/offers/{}/publish", offer_id), token)
            .send()
            .await
            .expect("Publish offer failed");
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        assert_eq!(status, 200, "Publish offer failed: {}", body);
    }
}
