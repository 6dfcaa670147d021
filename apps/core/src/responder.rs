//! Response generation.
//!
//! Selects a reply from the knowledge store for an analyzed input and scores
//! it: best-scoring matched topic wins, a uniformly random reply is picked
//! from its pool, and a sentiment/intent-conditioned remark is appended.
//! Total over any analysis; the output text is never empty and the
//! confidence always lands in [0, 0.95].

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::brain::{fuzzy_match, Analysis, Intent, Sentiment};
use crate::config::ResponseTemplates;
use crate::knowledge::{KnowledgeStore, TopicEntry};

/// Confidence of the fallback reply.
const DEFAULT_CONFIDENCE: f32 = 0.3;
/// Base confidence of any matched topic.
const TOPIC_BASE_CONFIDENCE: f32 = 0.5;
/// Bonus per keyword matching the topic's patterns.
const KEYWORD_BONUS: f32 = 0.1;
/// Sentiment bonuses.
const POSITIVE_BONUS: f32 = 0.1;
const NEGATIVE_BONUS: f32 = 0.05;
/// Per-topic confidence ceiling.
const TOPIC_CONFIDENCE_CAP: f32 = 0.9;
/// Overall confidence ceiling.
const CONFIDENCE_CAP: f32 = 0.95;

/// A generated reply with its heuristic confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResponse {
    pub text: String,
    pub confidence: f32,
}

/// Reply selector with an injectable random source.
pub struct ResponseGenerator {
    templates: ResponseTemplates,
    min_overlap: usize,
    rng: StdRng,
}

impl ResponseGenerator {
    /// Create a generator using entropy-seeded randomness.
    pub fn new(templates: ResponseTemplates, min_overlap: usize) -> Self {
        Self {
            templates,
            min_overlap,
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a generator with a fixed seed, for deterministic selection.
    pub fn with_seed(templates: ResponseTemplates, min_overlap: usize, seed: u64) -> Self {
        Self {
            templates,
            min_overlap,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Confidence that a topic's reply fits this analysis.
    fn topic_confidence(&self, entry: &TopicEntry, analysis: &Analysis) -> f32 {
        let matching_keywords = analysis
            .keywords
            .iter()
            .filter(|keyword| {
                entry
                    .patterns
                    .iter()
                    .any(|pattern| fuzzy_match(keyword, pattern, self.min_overlap))
            })
            .count();

        let mut confidence = TOPIC_BASE_CONFIDENCE + matching_keywords as f32 * KEYWORD_BONUS;
        confidence += match analysis.sentiment {
            Sentiment::Positive => POSITIVE_BONUS,
            Sentiment::Negative => NEGATIVE_BONUS,
            Sentiment::Neutral => 0.0,
        };

        confidence.min(TOPIC_CONFIDENCE_CAP)
    }

    /// Append the sentiment- and intent-conditioned remarks.
    fn customize(&self, response: &mut String, analysis: &Analysis) {
        match analysis.sentiment {
            Sentiment::Positive => response.push_str(&self.templates.positive_remark),
            Sentiment::Negative => response.push_str(&self.templates.negative_remark),
            Sentiment::Neutral => {}
        }

        match analysis.intent {
            Intent::Question => response.push_str(&self.templates.question_remark),
            Intent::Request => response.push_str(&self.templates.request_remark),
            _ => {}
        }
    }

    /// Produce the reply and confidence for an analysis.
    pub fn generate(&mut self, analysis: &Analysis, store: &KnowledgeStore) -> GeneratedResponse {
        let mut best_response = self.templates.fallback.clone();
        let mut max_confidence = DEFAULT_CONFIDENCE;

        for topic in &analysis.topics {
            let Some(entry) = store.topic(topic) else {
                continue;
            };
            if entry.responses.is_empty() {
                continue;
            }

            let confidence = self.topic_confidence(entry, analysis);
            if confidence > max_confidence {
                if let Some(candidate) = entry.responses.choose(&mut self.rng) {
                    best_response = candidate.clone();
                    max_confidence = confidence;
                }
            }
        }

        self.customize(&mut best_response, analysis);

        let confidence = max_confidence.min(CONFIDENCE_CAP);
        debug!(confidence, topics = analysis.topics.len(), "generated response");

        GeneratedResponse {
            text: best_response,
            confidence,
        }
    }
}
