//! Knowledge store.
//!
//! Maps topic names to their trigger patterns, canned responses, and usage
//! frequency, and keeps the bounded history of raw user inputs plus the
//! session-global learning scalars. Owned by a single session; construct as
//! many independent stores as needed.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use tracing::{debug, info};

use crate::brain::Sentiment;
use crate::error::BrainError;
use crate::learning::Feedback;

/// Retained raw input patterns (FIFO eviction past this).
pub const MAX_PATTERN_HISTORY: usize = 1000;
/// Topic count above which stale topics are pruned.
pub const TOPIC_RETENTION_CEILING: usize = 50;
/// Topics below this frequency are prune candidates.
pub const MIN_RETAINED_FREQUENCY: u32 = 2;

const LEARNING_RATE_RANGE: (f32, f32) = (0.05, 0.2);
const CONFIDENCE_RANGE: (f32, f32) = (0.3, 0.9);
const FEEDBACK_RATE_STEP: f32 = 0.01;
const FEEDBACK_CONFIDENCE_STEP: f32 = 0.05;

/// One recognized subject area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicEntry {
    /// Trigger keywords, deduplicated, in insertion order.
    pub patterns: Vec<String>,
    /// Candidate replies.
    pub responses: Vec<String>,
    /// Times this topic was matched.
    pub frequency: u32,
}

impl TopicEntry {
    fn new(patterns: Vec<String>, responses: Vec<String>, frequency: u32) -> Self {
        Self {
            patterns,
            responses,
            frequency,
        }
    }

    /// Union a pattern in, skipping duplicates.
    pub fn add_pattern(&mut self, pattern: &str) {
        if !self.patterns.iter().any(|p| p == pattern) {
            self.patterns.push(pattern.to_string());
        }
    }
}

/// Per-session sentiment counters, part of the export contract.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentTally {
    pub positive: u64,
    pub negative: u64,
    pub neutral: u64,
}

impl SentimentTally {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
        }
    }
}

/// Full serialized form of a store, for persistence and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeSnapshot {
    pub topics: BTreeMap<String, TopicEntry>,
    pub conversation_patterns: Vec<String>,
    pub user_preferences: BTreeMap<String, u32>,
    pub sentiment: SentimentTally,
    pub learning_rate: f32,
    pub confidence: f32,
}

/// Frequency of one topic, used in statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicFrequency {
    pub topic: String,
    pub frequency: u32,
}

/// Point-in-time learning statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub knowledge_topics: usize,
    pub patterns: usize,
    pub learning_rate: f32,
    pub confidence: f32,
    pub top_topics: Vec<TopicFrequency>,
}

/// The session's topic knowledge and learning state.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeStore {
    topics: BTreeMap<String, TopicEntry>,
    conversation_patterns: VecDeque<String>,
    user_preferences: BTreeMap<String, u32>,
    sentiment_tally: SentimentTally,
    learning_rate: f32,
    confidence: f32,
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KnowledgeStore {
    /// Create an empty store with neutral learning scalars.
    pub fn new() -> Self {
        Self {
            topics: BTreeMap::new(),
            conversation_patterns: VecDeque::new(),
            user_preferences: BTreeMap::new(),
            sentiment_tally: SentimentTally::default(),
            learning_rate: 0.1,
            confidence: 0.5,
        }
    }

    /// Create a store populated with the fixed seed topics.
    pub fn seeded() -> Self {
        let mut store = Self::new();
        store.seed();
        store
    }

    /// Populate the seed topics. Intended to run once at startup; re-running
    /// over an untouched store produces the same contents.
    pub fn seed(&mut self) {
        let seed_topics: [(&str, &[&str], &[&str]); 3] = [
            (
                "greeting",
                &["hello", "hi", "hey", "good morning", "good evening", "greetings"],
                &[
                    "Hello! How can I help you today?",
                    "Hi there! I'm here to answer your questions.",
                    "Welcome! What would you like to know?",
                ],
            ),
            (
                "ai_topics",
                &["intelligence", "artificial", "ai", "learning", "machine", "robot"],
                &[
                    "Artificial intelligence is a fascinating field! What would you like to know about it?",
                    "I'm an example of AI myself, and I learn from every conversation with you.",
                    "AI is evolving at an amazing pace. Do you have a specific question?",
                ],
            ),
            (
                "thanks",
                &["thanks", "thank", "grateful", "appreciate"],
                &[
                    "You're welcome! I'm glad I could help.",
                    "No need to thank me! This is what I love doing.",
                    "I'm always here to help you!",
                ],
            ),
        ];

        for (name, patterns, responses) in seed_topics {
            self.topics.insert(
                name.to_string(),
                TopicEntry::new(
                    patterns.iter().map(|p| p.to_string()).collect(),
                    responses.iter().map(|r| r.to_string()).collect(),
                    0,
                ),
            );
        }

        info!(topics = self.topics.len(), "knowledge store seeded");
    }

    /// Iterate topics in name order.
    pub fn topics(&self) -> impl Iterator<Item = (&String, &TopicEntry)> {
        self.topics.iter()
    }

    /// Look up one topic.
    pub fn topic(&self, name: &str) -> Option<&TopicEntry> {
        self.topics.get(name)
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// The bounded history of lowercased raw inputs, oldest first.
    pub fn pattern_history(&self) -> &VecDeque<String> {
        &self.conversation_patterns
    }

    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// The global trust scalar, distinct from per-message confidence.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn sentiment_tally(&self) -> SentimentTally {
        self.sentiment_tally
    }

    pub fn user_preferences(&self) -> &BTreeMap<String, u32> {
        &self.user_preferences
    }

    /// Append a raw input to the pattern history, evicting oldest past the cap.
    pub fn record_pattern(&mut self, input: &str) {
        self.conversation_patterns.push_back(input.to_lowercase());
        while self.conversation_patterns.len() > MAX_PATTERN_HISTORY {
            self.conversation_patterns.pop_front();
        }
    }

    /// Reinforce a matched topic with this turn's keywords, or create it.
    ///
    /// A new topic starts at frequency 1 with `ack_response` as its only
    /// reply; an existing one gains a use and unions the keywords into its
    /// patterns.
    pub fn reinforce_topic(&mut self, topic: &str, keywords: &[String], ack_response: String) {
        if let Some(entry) = self.topics.get_mut(topic) {
            entry.frequency += 1;
            for keyword in keywords {
                entry.add_pattern(keyword);
            }
        } else {
            let mut patterns: Vec<String> = Vec::new();
            for keyword in keywords {
                if !patterns.iter().any(|p| p == keyword) {
                    patterns.push(keyword.clone());
                }
            }
            debug!(topic, "learned new topic");
            self.topics.insert(
                topic.to_string(),
                TopicEntry::new(patterns, vec![ack_response], 1),
            );
        }
    }

    /// Add a learned response to an existing topic, up to `cap` per topic.
    /// Returns whether the response was added.
    pub fn add_topic_response(&mut self, topic: &str, response: String, cap: usize) -> bool {
        match self.topics.get_mut(topic) {
            Some(entry) if entry.responses.len() < cap => {
                if entry.responses.iter().any(|r| *r == response) {
                    false
                } else {
                    entry.responses.push(response);
                    true
                }
            }
            _ => false,
        }
    }

    /// Drop rarely used topics, but only once the store has outgrown the
    /// retention ceiling. Soft policy: while the store is small, everything
    /// survives.
    pub fn prune_stale_topics(&mut self) {
        if self.topics.len() <= TOPIC_RETENTION_CEILING {
            return;
        }

        let before = self.topics.len();
        self.topics
            .retain(|_, entry| entry.frequency >= MIN_RETAINED_FREQUENCY);

        let removed = before - self.topics.len();
        if removed > 0 {
            debug!(removed, remaining = self.topics.len(), "pruned stale topics");
        }
    }

    /// Count a turn's sentiment in the tally.
    pub fn note_sentiment(&mut self, sentiment: Sentiment) {
        self.sentiment_tally.record(sentiment);
    }

    /// Bump the preference counter for a topic.
    pub fn bump_preference(&mut self, topic: &str) {
        *self.user_preferences.entry(topic.to_string()).or_insert(0) += 1;
    }

    /// Adjust the learning scalars from explicit user feedback, clamped to
    /// their ranges.
    pub fn apply_feedback(&mut self, feedback: Feedback) {
        let (rate_step, confidence_step) = match feedback {
            Feedback::Positive => (FEEDBACK_RATE_STEP, FEEDBACK_CONFIDENCE_STEP),
            Feedback::Negative => (-FEEDBACK_RATE_STEP, -FEEDBACK_CONFIDENCE_STEP),
        };

        self.learning_rate = (self.learning_rate + rate_step)
            .clamp(LEARNING_RATE_RANGE.0, LEARNING_RATE_RANGE.1);
        self.confidence =
            (self.confidence + confidence_step).clamp(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1);
    }

    /// Serialize the full store state.
    pub fn export_snapshot(&self) -> KnowledgeSnapshot {
        KnowledgeSnapshot {
            topics: self.topics.clone(),
            conversation_patterns: self.conversation_patterns.iter().cloned().collect(),
            user_preferences: self.user_preferences.clone(),
            sentiment: self.sentiment_tally,
            learning_rate: self.learning_rate,
            confidence: self.confidence,
        }
    }

    /// Replace store contents from a snapshot value.
    ///
    /// Tolerates missing keys (the corresponding state is left untouched) but
    /// rejects malformed present keys with [`BrainError::DataFormat`]. Fields
    /// decoded before the failure stay applied.
    pub fn import_snapshot(&mut self, data: &serde_json::Value) -> Result<(), BrainError> {
        let object = data
            .as_object()
            .ok_or_else(|| BrainError::DataFormat("snapshot must be a JSON object".to_string()))?;

        if let Some(value) = object.get("topics") {
            let topics: BTreeMap<String, TopicEntry> = serde_json::from_value(value.clone())
                .map_err(|e| BrainError::DataFormat(format!("topics: {}", e)))?;
            self.topics = topics;
        }

        if let Some(value) = object.get("conversationPatterns") {
            let patterns: Vec<String> = serde_json::from_value(value.clone())
                .map_err(|e| BrainError::DataFormat(format!("conversationPatterns: {}", e)))?;
            self.conversation_patterns = patterns.into_iter().collect();
            while self.conversation_patterns.len() > MAX_PATTERN_HISTORY {
                self.conversation_patterns.pop_front();
            }
        }

        if let Some(value) = object.get("userPreferences") {
            self.user_preferences = serde_json::from_value(value.clone())
                .map_err(|e| BrainError::DataFormat(format!("userPreferences: {}", e)))?;
        }

        if let Some(value) = object.get("sentiment") {
            self.sentiment_tally = serde_json::from_value(value.clone())
                .map_err(|e| BrainError::DataFormat(format!("sentiment: {}", e)))?;
        }

        if let Some(value) = object.get("learningRate") {
            let rate: f32 = serde_json::from_value(value.clone())
                .map_err(|e| BrainError::DataFormat(format!("learningRate: {}", e)))?;
            self.learning_rate = rate.clamp(LEARNING_RATE_RANGE.0, LEARNING_RATE_RANGE.1);
        }

        if let Some(value) = object.get("confidence") {
            let confidence: f32 = serde_json::from_value(value.clone())
                .map_err(|e| BrainError::DataFormat(format!("confidence: {}", e)))?;
            self.confidence = confidence.clamp(CONFIDENCE_RANGE.0, CONFIDENCE_RANGE.1);
        }

        Ok(())
    }

    /// Current learning statistics with the ten most used topics.
    pub fn stats(&self) -> LearningStats {
        let mut top_topics: Vec<TopicFrequency> = self
            .topics
            .iter()
            .filter(|(_, entry)| entry.frequency > 0)
            .map(|(topic, entry)| TopicFrequency {
                topic: topic.clone(),
                frequency: entry.frequency,
            })
            .collect();
        top_topics.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.topic.cmp(&b.topic)));
        top_topics.truncate(10);

        LearningStats {
            knowledge_topics: self.topics.len(),
            patterns: self.conversation_patterns.len(),
            learning_rate: self.learning_rate,
            confidence: self.confidence,
            top_topics,
        }
    }
}
