//! Text analyzer - main orchestrator for the brain module.
//!
//! Pure function from raw text to an [`Analysis`]: topic detection against
//! the knowledge store, sentiment, keywords, intent, and complexity. No
//! persisted side effects and no failure mode, including for empty input.

use tracing::debug;

use super::analysis::Analysis;
use super::complexity::ComplexityScorer;
use super::intent::IntentClassifier;
use super::keywords::KeywordExtractor;
use super::sentiment::SentimentAnalyzer;
use crate::knowledge::KnowledgeStore;

/// Bidirectional fuzzy containment between a token and a pattern.
///
/// The shorter string must appear inside the longer one, but only when it is
/// at least `min_overlap` characters long; shorter strings must match
/// exactly. The guard keeps tiny patterns (e.g. "ai") from firing inside
/// unrelated words ("maintain").
pub fn fuzzy_match(word: &str, pattern: &str, min_overlap: usize) -> bool {
    let (short, long) = if word.len() <= pattern.len() {
        (word, pattern)
    } else {
        (pattern, word)
    };

    if short.is_empty() {
        return false;
    }

    if short.chars().count() < min_overlap {
        word == pattern
    } else {
        long.contains(short)
    }
}

/// Analyzer coordinating all per-concern components.
pub struct TextAnalyzer {
    intent_classifier: IntentClassifier,
    keyword_extractor: KeywordExtractor,
    complexity_scorer: ComplexityScorer,
    sentiment_analyzer: SentimentAnalyzer,
    min_overlap: usize,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(3)
    }
}

impl TextAnalyzer {
    /// Create an analyzer with the given fuzzy-containment guard.
    pub fn new(min_overlap: usize) -> Self {
        Self {
            intent_classifier: IntentClassifier::new(),
            keyword_extractor: KeywordExtractor::new(),
            complexity_scorer: ComplexityScorer::new(),
            sentiment_analyzer: SentimentAnalyzer::new(),
            min_overlap,
        }
    }

    /// Lowercase whitespace tokenization with edge punctuation stripped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split_whitespace()
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|word| !word.is_empty())
            .map(|word| word.to_string())
            .collect()
    }

    /// Detect which known topics the tokens match.
    fn detect_topics(&self, tokens: &[String], store: &KnowledgeStore) -> Vec<String> {
        let mut topics = Vec::new();

        for (name, entry) in store.topics() {
            let matched = entry.patterns.iter().any(|pattern| {
                tokens
                    .iter()
                    .any(|word| fuzzy_match(word, pattern, self.min_overlap))
            });
            if matched {
                topics.push(name.clone());
            }
        }

        topics
    }

    /// Analyze raw input against the current knowledge store.
    pub fn analyze(&self, text: &str, store: &KnowledgeStore) -> Analysis {
        let tokens = self.tokenize(text);
        if tokens.is_empty() {
            return Analysis::empty();
        }

        let analysis = Analysis {
            topics: self.detect_topics(&tokens, store),
            sentiment: self.sentiment_analyzer.classify(&tokens),
            keywords: self.keyword_extractor.extract(&tokens),
            intent: self.intent_classifier.classify(text),
            complexity: self.complexity_scorer.score(text),
            context: tokens,
        };

        debug!(
            topics = analysis.topics.len(),
            keywords = analysis.keywords.len(),
            intent = %analysis.intent,
            sentiment = %analysis.sentiment,
            "analyzed input"
        );

        analysis
    }
}
