//! Analysis - Output structure for one analyzed input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse sentiment of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
        };
        write!(f, "{}", label)
    }
}

/// Coarse communicative purpose of an input.
///
/// Categories are tested in declaration order; `Statement` is the default
/// when no marker matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Question,
    Request,
    Complaint,
    Compliment,
    Statement,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Intent::Question => "question",
            Intent::Request => "request",
            Intent::Complaint => "complaint",
            Intent::Compliment => "compliment",
            Intent::Statement => "statement",
        };
        write!(f, "{}", label)
    }
}

/// Everything the analyzer derives from one input string.
///
/// Derived, never persisted; all fields default to empty/neutral so the
/// empty input is a valid analysis, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// Names of the knowledge topics the input matched (order irrelevant).
    pub topics: Vec<String>,
    /// Detected sentiment.
    pub sentiment: Sentiment,
    /// Content words in input order (stopwords and numerics removed).
    pub keywords: Vec<String>,
    /// Detected intent.
    pub intent: Intent,
    /// All lowercased tokens of the input.
    pub context: Vec<String>,
    /// Complexity heuristic from word and sentence lengths.
    pub complexity: f32,
}

impl Analysis {
    /// The analysis of an empty input.
    pub fn empty() -> Self {
        Self {
            topics: vec![],
            sentiment: Sentiment::Neutral,
            keywords: vec![],
            intent: Intent::Statement,
            context: vec![],
            complexity: 0.0,
        }
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self::empty()
    }
}
