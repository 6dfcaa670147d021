//! External response-provider collaborator.
//!
//! HTTP client for the `{message, conversationHistory}` →
//! `{success, data, error, fallbackToLocal}` contract. The client never
//! panics on provider misbehavior; every failure surfaces as
//! [`BrainError::Provider`] with a flag saying whether the local generation
//! path should take over.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::error::BrainError;
use crate::models::{Message, Sender};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// How many trailing turns are sent as context.
const HISTORY_WINDOW: usize = 8;

/// One history entry in the provider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Request body of the provider contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    pub message: String,
    pub conversation_history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ProviderData {
    response: String,
}

/// Response body of the provider contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderResponse {
    success: bool,
    #[serde(default)]
    data: Option<ProviderData>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    fallback_to_local: Option<bool>,
}

/// HTTP client for one provider endpoint.
pub struct ProviderClient {
    client: Client,
    endpoint: Url,
    id: String,
}

impl ProviderClient {
    /// Create a client for a provider endpoint.
    pub fn new(id: impl Into<String>, endpoint: &str) -> Result<Self, BrainError> {
        let endpoint = Url::parse(endpoint)?;
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(BrainError::from)?;

        Ok(Self {
            client,
            endpoint,
            id: id.into(),
        })
    }

    /// Identifier recorded on messages produced through this provider.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Send a message with trailing conversation context and return the
    /// provider's reply text.
    pub async fn send(&self, message: &str, history: &[Message]) -> Result<String, BrainError> {
        let conversation_history: Vec<HistoryEntry> = history
            .iter()
            .rev()
            .take(HISTORY_WINDOW)
            .rev()
            .filter(|msg| !msg.content.trim().is_empty())
            .map(|msg| HistoryEntry {
                content: msg.content.trim().to_string(),
                sender: msg.sender,
                timestamp: msg.timestamp,
            })
            .collect();

        let request = ProviderRequest {
            message: message.trim().to_string(),
            conversation_history,
        };

        info!(provider = %self.id, "sending message to provider");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let body: ProviderResponse = response.json().await.map_err(|e| BrainError::Provider {
            message: format!("malformed provider response: {}", e),
            fallback_to_local: true,
        })?;

        if !body.success {
            let message = body
                .error
                .unwrap_or_else(|| "provider reported failure".to_string());
            warn!(provider = %self.id, error = %message, "provider request failed");
            return Err(BrainError::Provider {
                message,
                fallback_to_local: body.fallback_to_local.unwrap_or(false),
            });
        }

        match body.data {
            Some(data) if !data.response.is_empty() => Ok(data.response),
            _ => Err(BrainError::Provider {
                message: "provider returned success without a response".to_string(),
                fallback_to_local: true,
            }),
        }
    }
}
