use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tripdesk_config::PushSettings;

use super::NotifyError;

#[derive(Debug, Clone, Serialize)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PushStatus {
    Delivered,
    /// Token rejected as invalid or unregistered; prune it.
    InvalidToken,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct PushOutcome {
    pub token: String,
    pub status: PushStatus,
}

/// Multicast push delivery to a set of device tokens. One outcome per
/// token, in input order.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send(&self, tokens: &[String], payload: &PushPayload)
    -> Result<Vec<PushOutcome>, NotifyError>;
}

/// FCM over its HTTP send endpoint with server-key auth.
pub struct FcmClient {
    client: reqwest::Client,
    settings: PushSettings,
}

#[derive(Debug, Serialize)]
struct FcmRequest<'a> {
    registration_ids: &'a [String],
    notification: &'a PushPayload,
    data: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct FcmResponse {
    results: Vec<FcmResult>,
}

#[derive(Debug, Deserialize)]
struct FcmResult {
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl FcmClient {
    pub fn new(settings: PushSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl PushSender for FcmClient {
    async fn send(
        &self,
        tokens: &[String],
        payload: &PushPayload,
    ) -> Result<Vec<PushOutcome>, NotifyError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }

        let request = FcmRequest {
            registration_ids: tokens,
            notification: payload,
            data: &payload.data,
        };

        let response = self
            .client
            .post(&self.settings.endpoint)
            .header(
                "Authorization",
                format!("key={}", self.settings.server_key),
            )
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<FcmResponse>()
            .await?;

        let outcomes = tokens
            .iter()
            .zip(response.results)
            .map(|(token, result)| {
                let status = match (&result.message_id, result.error.as_deref()) {
                    (Some(_), _) => PushStatus::Delivered,
                    (None, Some("NotRegistered")) | (None, Some("InvalidRegistration")) => {
                        PushStatus::InvalidToken
                    }
                    (None, Some(other)) => PushStatus::Failed(other.to_string()),
                    (None, None) => PushStatus::Failed("no result".to_string()),
                };
                PushOutcome {
                    token: token.clone(),
                    status,
                }
            })
            .collect();

        Ok(outcomes)
    }
}
