use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::brain::Sentiment;

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// Analysis subset embedded in an AI message for later inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningData {
    /// Lowercased tokens of the user input that produced this reply.
    pub context: Vec<String>,
    /// Sentiment detected in the user input.
    pub sentiment: Sentiment,
    /// Topics the analyzer matched for the turn.
    pub topics: Vec<String>,
}

/// A single turn in a conversation. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Who sent the message.
    pub sender: Sender,
    /// The message text.
    pub content: String,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
    /// Heuristic confidence for AI replies, in [0, 0.95].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    /// Which provider produced the reply ("local" or an external id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Analysis snapshot attached to AI replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learning_data: Option<LearningData>,
}

impl Message {
    /// Create a user message for raw input.
    pub fn from_user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::User,
            content: content.into(),
            timestamp: Utc::now(),
            confidence: None,
            provider: None,
            learning_data: None,
        }
    }

    /// Create an AI reply with its confidence and provenance.
    pub fn from_ai(
        content: impl Into<String>,
        confidence: f32,
        provider: impl Into<String>,
        learning_data: Option<LearningData>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender: Sender::Ai,
            content: content.into(),
            timestamp: Utc::now(),
            confidence: Some(confidence),
            provider: Some(provider.into()),
            learning_data,
        }
    }
}
