//! Chat engine - session-level orchestrator.
//!
//! Owns the knowledge store, conversation history, and notes for one
//! session, and drives the turn pipeline: analyze → simulated thinking
//! delay → generate → learn → persist. Turns are strictly sequential within
//! a session; the engine holds no locks and shares nothing.
//!
//! Storage is optional and failures are never fatal: a failed write logs a
//! warning and switches the session to memory-only mode.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use validator::Validate;

use crate::brain::{Analysis, TextAnalyzer};
use crate::config::EngineConfig;
use crate::error::BrainError;
use crate::knowledge::{KnowledgeStore, LearningStats, SentimentTally, TopicEntry};
use crate::learning::{Feedback, LearningLoop};
use crate::models::{LearningData, Message};
use crate::provider::ProviderClient;
use crate::responder::ResponseGenerator;
use crate::storage::{Storage, KEY_KNOWLEDGE, KEY_MESSAGES, KEY_NOTES, KEY_PROVIDER};

/// Provider tag recorded on locally generated replies.
pub const PROVIDER_LOCAL: &str = "local";

/// Knowledge section of the exchange document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiKnowledgeExport {
    /// Topic name → usage frequency.
    pub topics: BTreeMap<String, u32>,
    /// Topic name → candidate replies.
    pub responses: BTreeMap<String, Vec<String>>,
    pub user_preferences: BTreeMap<String, u32>,
    pub conversation_patterns: Vec<String>,
    pub sentiment: SentimentTally,
}

/// Summary block of the exchange document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStatsSummary {
    pub topics_learned: usize,
    pub conversation_patterns: usize,
    pub sentiment_distribution: SentimentTally,
}

/// Full session export, the interoperability contract between export and
/// import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatExport {
    pub messages: Vec<Message>,
    pub ai_knowledge: AiKnowledgeExport,
    pub notes: String,
    pub export_date: DateTime<Utc>,
    pub total_messages: usize,
    pub learning_stats: LearningStatsSummary,
}

/// One session's brain: store, history, and the turn pipeline.
pub struct ChatEngine {
    config: EngineConfig,
    analyzer: TextAnalyzer,
    generator: ResponseGenerator,
    learner: LearningLoop,
    store: KnowledgeStore,
    messages: Vec<Message>,
    notes: String,
    provider_tag: String,
    storage: Option<Arc<dyn Storage>>,
    rng: StdRng,
}

impl ChatEngine {
    /// Create an engine with seeded knowledge and a welcome message.
    pub fn new(config: EngineConfig) -> Result<Self, BrainError> {
        config.validate()?;

        let generator =
            ResponseGenerator::new(config.templates.clone(), config.min_overlap);
        Ok(Self::build(config, generator, StdRng::from_entropy()))
    }

    /// Create a fully deterministic engine for tests.
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self, BrainError> {
        config.validate()?;

        let generator =
            ResponseGenerator::with_seed(config.templates.clone(), config.min_overlap, seed);
        Ok(Self::build(
            config,
            generator,
            StdRng::seed_from_u64(seed.wrapping_add(1)),
        ))
    }

    fn build(config: EngineConfig, generator: ResponseGenerator, rng: StdRng) -> Self {
        let welcome = Message::from_ai(
            config.templates.welcome.clone(),
            0.95,
            PROVIDER_LOCAL,
            None,
        );
        let learner = LearningLoop::from_config(&config);
        let analyzer = TextAnalyzer::new(config.min_overlap);

        Self {
            config,
            analyzer,
            generator,
            learner,
            store: KnowledgeStore::seeded(),
            messages: vec![welcome],
            notes: String::new(),
            provider_tag: PROVIDER_LOCAL.to_string(),
            storage: None,
            rng,
        }
    }

    /// Attach a persistence collaborator.
    pub fn with_storage(mut self, storage: Arc<dyn Storage>) -> Self {
        self.storage = Some(storage);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn provider(&self) -> &str {
        &self.provider_tag
    }

    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.provider_tag = provider.into();
    }

    /// Analyze input without running a turn.
    pub fn analyze(&self, input: &str) -> Analysis {
        self.analyzer.analyze(input, &self.store)
    }

    /// Current learning statistics.
    pub fn stats(&self) -> LearningStats {
        self.store.stats()
    }

    /// Load persisted session state, falling back to in-memory defaults on
    /// any failure.
    pub async fn restore(&mut self) {
        let Some(storage) = self.storage.clone() else {
            return;
        };

        match storage.get(KEY_MESSAGES).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Message>>(&raw) {
                Ok(messages) if !messages.is_empty() => self.messages = messages,
                Ok(_) => {}
                Err(e) => warn!("ignoring unreadable saved messages: {}", e),
            },
            Ok(None) => {}
            Err(e) => {
                warn!("storage read failed, continuing memory-only: {}", e);
                self.storage = None;
                return;
            }
        }

        if let Ok(Some(raw)) = storage.get(KEY_KNOWLEDGE).await {
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(value) => {
                    if let Err(e) = self.store.import_snapshot(&value) {
                        warn!("ignoring unreadable saved knowledge: {}", e);
                    }
                }
                Err(e) => warn!("ignoring unreadable saved knowledge: {}", e),
            }
        }

        if let Ok(Some(notes)) = storage.get(KEY_NOTES).await {
            self.notes = notes;
        }

        if let Ok(Some(provider)) = storage.get(KEY_PROVIDER).await {
            self.provider_tag = provider;
        }

        info!(
            messages = self.messages.len(),
            topics = self.store.topic_count(),
            "session state restored"
        );
    }

    /// Simulated thinking time for an input of `token_count` tokens.
    fn thinking_delay(&mut self, token_count: usize) -> Duration {
        let jitter = if self.config.think_jitter_ms == 0 {
            0
        } else {
            self.rng.gen_range(0..=self.config.think_jitter_ms)
        };
        let ms = self.config.think_base_ms
            + jitter
            + token_count as u64 * self.config.think_per_token_ms;
        Duration::from_millis(ms)
    }

    /// Run the local pipeline for input already appended to the history.
    async fn local_reply(&mut self, input: &str, feedback: Option<Feedback>) -> Message {
        let analysis = self.analyzer.analyze(input, &self.store);

        let delay = self.thinking_delay(analysis.context.len());
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut response = self.generator.generate(&analysis, &self.store);

        if !self.notes.is_empty()
            && self.config.note_probability > 0.0
            && self.rng.gen_range(0.0..1.0) < self.config.note_probability
        {
            response.text.push_str(&format!(" (note: {})", self.notes));
        }

        self.learner
            .apply(&mut self.store, input, &analysis, feedback, &mut self.rng);

        let learning_data = LearningData {
            context: analysis.context.clone(),
            sentiment: analysis.sentiment,
            topics: analysis.topics.clone(),
        };
        let reply = Message::from_ai(
            response.text,
            response.confidence,
            PROVIDER_LOCAL,
            Some(learning_data),
        );
        self.messages.push(reply.clone());

        self.persist().await;
        reply
    }

    /// Process one user turn through the local brain.
    ///
    /// Never fails: analysis and generation are total, and storage trouble
    /// only degrades persistence.
    pub async fn process_turn(&mut self, input: &str, feedback: Option<Feedback>) -> Message {
        self.messages.push(Message::from_user(input));
        self.local_reply(input, feedback).await
    }

    /// Process one user turn through an external provider, falling back to
    /// the local brain when the provider asks for it or cannot be reached.
    pub async fn process_turn_with_provider(
        &mut self,
        client: &ProviderClient,
        input: &str,
    ) -> Message {
        let history: Vec<Message> = self.messages.clone();
        self.messages.push(Message::from_user(input));

        match client.send(input, &history).await {
            Ok(text) => {
                // Keep learning locally even when an external provider answers.
                let analysis = self.analyzer.analyze(input, &self.store);
                self.learner
                    .apply(&mut self.store, input, &analysis, None, &mut self.rng);

                let learning_data = LearningData {
                    context: analysis.context.clone(),
                    sentiment: analysis.sentiment,
                    topics: analysis.topics.clone(),
                };
                let reply = Message::from_ai(text, 0.95, client.id(), Some(learning_data));
                self.messages.push(reply.clone());
                self.persist().await;
                reply
            }
            Err(e) => {
                warn!(provider = client.id(), "provider failed, using local path: {}", e);
                self.local_reply(input, None).await
            }
        }
    }

    /// Clear the history, keeping learned knowledge, and greet again.
    pub async fn clear_chat(&mut self) {
        let cleared = Message::from_ai(
            self.config.templates.cleared.clone(),
            0.9,
            self.provider_tag.clone(),
            None,
        );
        self.messages = vec![cleared];
        self.persist().await;
    }

    /// Produce the full session export document.
    pub fn export_data(&self) -> ChatExport {
        let mut topics = BTreeMap::new();
        let mut responses = BTreeMap::new();
        for (name, entry) in self.store.topics() {
            topics.insert(name.clone(), entry.frequency);
            responses.insert(name.clone(), entry.responses.clone());
        }

        let snapshot = self.store.export_snapshot();
        ChatExport {
            messages: self.messages.clone(),
            ai_knowledge: AiKnowledgeExport {
                topics,
                responses,
                user_preferences: snapshot.user_preferences,
                conversation_patterns: snapshot.conversation_patterns,
                sentiment: snapshot.sentiment,
            },
            notes: self.notes.clone(),
            export_date: Utc::now(),
            total_messages: self.messages.len(),
            learning_stats: LearningStatsSummary {
                topics_learned: self.store.topic_count(),
                conversation_patterns: self.store.pattern_history().len(),
                sentiment_distribution: self.store.sentiment_tally(),
            },
        }
    }

    /// Replace session state from an export document.
    pub fn import_data(&mut self, raw: &str) -> Result<(), BrainError> {
        let export: ChatExport = serde_json::from_str(raw)?;

        // Rebuild a snapshot value so the store's tolerant import applies.
        let mut topics: BTreeMap<String, TopicEntry> = BTreeMap::new();
        for (name, frequency) in &export.ai_knowledge.topics {
            topics.insert(
                name.clone(),
                TopicEntry {
                    patterns: vec![],
                    responses: export
                        .ai_knowledge
                        .responses
                        .get(name)
                        .cloned()
                        .unwrap_or_default(),
                    frequency: *frequency,
                },
            );
        }

        let snapshot = serde_json::json!({
            "topics": topics,
            "conversationPatterns": export.ai_knowledge.conversation_patterns,
            "userPreferences": export.ai_knowledge.user_preferences,
            "sentiment": export.ai_knowledge.sentiment,
        });
        self.store.import_snapshot(&snapshot)?;

        self.messages = export.messages;
        self.notes = export.notes;
        Ok(())
    }

    async fn persist(&mut self) {
        let Some(storage) = self.storage.clone() else {
            return;
        };

        if let Err(e) = self.persist_inner(storage.as_ref()).await {
            warn!("storage write failed, continuing memory-only: {}", e);
            self.storage = None;
        }
    }

    async fn persist_inner(&self, storage: &dyn Storage) -> Result<(), BrainError> {
        let messages = serde_json::to_string(&self.messages)?;
        let snapshot = serde_json::to_string(&self.store.export_snapshot())?;

        storage.set(KEY_MESSAGES, &messages).await?;
        storage.set(KEY_KNOWLEDGE, &snapshot).await?;
        storage.set(KEY_NOTES, &self.notes).await?;
        storage.set(KEY_PROVIDER, &self.provider_tag).await?;
        Ok(())
    }
}
