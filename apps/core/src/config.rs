//! Engine configuration.
//!
//! Thresholds and reply wording live here so the same engine code serves
//! every deployment; wording variants are data, not forked code paths.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// All user-visible wording the engine can emit.
///
/// Strings containing `{topic}` are filled in at use; everything else is
/// appended or emitted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseTemplates {
    /// Reply used when no topic matches the input.
    pub fallback: String,
    /// Appended when the input sentiment is positive.
    pub positive_remark: String,
    /// Appended when the input sentiment is negative.
    pub negative_remark: String,
    /// Appended when the input intent is a question.
    pub question_remark: String,
    /// Appended when the input intent is a request.
    pub request_remark: String,
    /// Sole response of a freshly coined topic (`{topic}` placeholder).
    pub new_topic_ack: String,
    /// Candidate responses learned for reinforced topics (`{topic}` placeholder).
    pub contextual_responses: Vec<String>,
    /// First message of a fresh session.
    pub welcome: String,
    /// Message emitted after the history is cleared.
    pub cleared: String,
}

impl Default for ResponseTemplates {
    fn default() -> Self {
        Self {
            fallback: "That's an interesting question! Let me think about it...".to_string(),
            positive_remark: " I'm glad this topic interests you!".to_string(),
            negative_remark: " I understand your concern, let me help you work through it."
                .to_string(),
            question_remark: " Would you like to know more about this topic?".to_string(),
            request_remark: " I'll do my best to help you.".to_string(),
            new_topic_ack: "From what I understood about {topic}, this is an interesting subject."
                .to_string(),
            contextual_responses: vec![
                "Based on what I've learned about {topic}, I understand it better now."
                    .to_string(),
                "{topic} is an important subject, thanks for sharing what you know about it."
                    .to_string(),
                "The more we talk about {topic}, the better my grasp of it gets.".to_string(),
            ],
            welcome: "Hello! I'm a learning assistant: I analyze what you write and improve \
                      with every conversation. What would you like to talk about today?"
                .to_string(),
            cleared: "Chat cleared! I still remember everything you taught me. How can I help \
                      you today?"
                .to_string(),
        }
    }
}

impl ResponseTemplates {
    /// Fill the `{topic}` placeholder of a template.
    pub fn with_topic(template: &str, topic: &str) -> String {
        template.replace("{topic}", topic)
    }
}

/// Tunable parameters for a chat engine instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    /// Whether the learning loop runs after each turn.
    pub learning_enabled: bool,

    /// Minimum shared-substring length for fuzzy topic/keyword containment.
    /// Tokens or patterns shorter than this must match exactly, which keeps
    /// two-letter patterns from firing inside unrelated words.
    #[validate(range(min = 1, max = 8))]
    pub min_overlap: usize,

    /// Fixed part of the simulated thinking delay, in milliseconds.
    pub think_base_ms: u64,
    /// Upper bound of the random jitter added to the delay.
    pub think_jitter_ms: u64,
    /// Extra delay per input token.
    pub think_per_token_ms: u64,

    /// Probability that session notes get appended to a reply.
    #[validate(range(min = 0.0, max = 1.0))]
    pub note_probability: f64,

    /// Ceiling on learned responses per topic.
    #[validate(range(min = 1))]
    pub max_responses_per_topic: usize,

    /// Reply wording.
    pub templates: ResponseTemplates,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            learning_enabled: true,
            min_overlap: 3,
            think_base_ms: 1000,
            think_jitter_ms: 2000,
            think_per_token_ms: 50,
            note_probability: 0.3,
            max_responses_per_topic: 10,
            templates: ResponseTemplates::default(),
        }
    }
}

impl EngineConfig {
    /// Configuration suitable for tests: no artificial delay, no note jitter.
    pub fn instant() -> Self {
        Self {
            think_base_ms: 0,
            think_jitter_ms: 0,
            think_per_token_ms: 0,
            note_probability: 0.0,
            ..Self::default()
        }
    }
}
