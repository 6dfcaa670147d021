//! Learning/feedback loop.
//!
//! Stateless transformation applied to the knowledge store once per
//! completed turn: records the raw input, reinforces matched topics with the
//! turn's keywords, folds in explicit feedback, and prunes stale topics.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brain::{Analysis, Sentiment};
use crate::config::{EngineConfig, ResponseTemplates};
use crate::knowledge::KnowledgeStore;

/// Explicit user feedback on a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

/// Post-turn knowledge update.
pub struct LearningLoop {
    enabled: bool,
    max_responses_per_topic: usize,
    new_topic_ack: String,
    contextual_responses: Vec<String>,
}

impl LearningLoop {
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            enabled: config.learning_enabled,
            max_responses_per_topic: config.max_responses_per_topic,
            new_topic_ack: config.templates.new_topic_ack.clone(),
            contextual_responses: config.templates.contextual_responses.clone(),
        }
    }

    /// Mutate the store from one completed turn. No-op when learning is
    /// disabled by configuration.
    pub fn apply<R: Rng>(
        &self,
        store: &mut KnowledgeStore,
        input: &str,
        analysis: &Analysis,
        feedback: Option<Feedback>,
        rng: &mut R,
    ) {
        if !self.enabled {
            return;
        }

        store.record_pattern(input);

        for topic in &analysis.topics {
            let ack = ResponseTemplates::with_topic(&self.new_topic_ack, topic);
            store.reinforce_topic(topic, &analysis.keywords, ack);

            // Occasionally grow the response pool of a reinforced topic.
            if analysis.context.len() > 3 {
                if let Some(template) = self.contextual_responses.choose(rng) {
                    let learned = ResponseTemplates::with_topic(template, topic);
                    store.add_topic_response(topic, learned, self.max_responses_per_topic);
                }
            }
        }

        // A turn matching nothing still teaches us a candidate topic.
        if analysis.topics.is_empty() && analysis.context.len() > 2 {
            let coined = analysis.context[..2].join(" ");
            let ack = ResponseTemplates::with_topic(&self.new_topic_ack, &coined);
            store.reinforce_topic(&coined, &analysis.keywords, ack);
            debug!(topic = %coined, "coined topic from unmatched input");
        }

        store.note_sentiment(analysis.sentiment);
        if analysis.sentiment == Sentiment::Positive {
            for topic in &analysis.topics {
                store.bump_preference(topic);
            }
        }

        if let Some(feedback) = feedback {
            store.apply_feedback(feedback);
            debug!(
                learning_rate = store.learning_rate(),
                confidence = store.confidence(),
                "applied feedback"
            );
        }

        store.prune_stale_topics();
    }
}
