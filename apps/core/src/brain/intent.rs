//! Intent detection using literal marker phrases.
//!
//! Fixed ordered categories tested against the raw (non-tokenized) text;
//! the first category with any matching marker wins, `Statement` is the
//! default. Pure regex matching, no model.

use regex::Regex;
use std::sync::LazyLock;

use super::analysis::Intent;

// Compile marker patterns once at startup. The patterns are literal phrase
// alternations; an invalid one is a programming error, hence expect().
static QUESTION_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"\?").expect("Invalid regex: question mark marker"),
        Regex::new(r"(?i)\b(what|how|why|when|where|who|which)\b")
            .expect("Invalid regex: question words"),
        Regex::new(r"(?i)\b(is it|are there|are you|do you|does it)\b")
            .expect("Invalid regex: question phrases"),
    ]
});

static REQUEST_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(i want|i need|i would like)\b").expect("Invalid regex: want phrases"),
        Regex::new(r"(?i)\b(please|could you|would you|can you)\b")
            .expect("Invalid regex: polite phrases"),
    ]
});

static COMPLAINT_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(problem|issue|error|bug)\b").expect("Invalid regex: complaint nouns"),
        Regex::new(r"(?i)\b(doesn't work|does not work|not working|broken|difficult)\b")
            .expect("Invalid regex: complaint phrases"),
    ]
});

static COMPLIMENT_MARKERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![
        Regex::new(r"(?i)\b(great|excellent|awesome|amazing|wonderful)\b")
            .expect("Invalid regex: compliment adjectives"),
        Regex::new(r"(?i)\b(thank you|thanks|well done|i liked it|love it)\b")
            .expect("Invalid regex: compliment phrases"),
    ]
});

/// Marker-based intent classifier.
pub struct IntentClassifier {
    categories: Vec<(Intent, &'static LazyLock<Vec<Regex>>)>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier with the fixed category order.
    pub fn new() -> Self {
        Self {
            categories: vec![
                (Intent::Question, &QUESTION_MARKERS),
                (Intent::Request, &REQUEST_MARKERS),
                (Intent::Complaint, &COMPLAINT_MARKERS),
                (Intent::Compliment, &COMPLIMENT_MARKERS),
            ],
        }
    }

    /// Classify raw text. First matching category wins.
    pub fn classify(&self, text: &str) -> Intent {
        let text = text.trim();
        if text.is_empty() {
            return Intent::Statement;
        }

        for (intent, markers) in &self.categories {
            if markers.iter().any(|marker| marker.is_match(text)) {
                return *intent;
            }
        }

        Intent::Statement
    }
}
