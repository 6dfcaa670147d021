//! Keyword extraction with stopword filtering.
//!
//! Keeps content words in input order: longer than two characters, not a
//! stopword, not purely numeric.

use std::collections::HashSet;

/// English stopwords.
const STOPWORDS_EN: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "for", "yet", "so", "i", "you", "he", "she", "it",
    "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "its", "our", "their",
    "mine", "yours", "hers", "ours", "theirs", "this", "that", "these", "those", "who", "whom",
    "which", "what", "whose", "is", "am", "are", "was", "were", "be", "been", "being", "have",
    "has", "had", "having", "do", "does", "did", "doing", "will", "would", "shall", "should",
    "can", "could", "may", "might", "must", "in", "on", "at", "to", "from", "by", "with", "about",
    "against", "between", "into", "through", "during", "before", "after", "above", "below", "up",
    "down", "out", "off", "over", "under", "again", "further", "here", "there", "where", "when",
    "why", "how", "all", "each", "every", "both", "few", "more", "most", "other", "some", "any",
    "no", "not", "only", "own", "same", "than", "too", "very", "just", "also", "now", "then",
    "once", "always", "never", "if", "because", "as", "until", "while", "although", "though",
    "yes", "maybe",
];

/// Stopword-filtering keyword extractor.
pub struct KeywordExtractor {
    stopwords: HashSet<&'static str>,
    min_word_length: usize,
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordExtractor {
    /// Create an extractor with the default word-length floor (3).
    pub fn new() -> Self {
        Self::with_min_length(3)
    }

    /// Create an extractor keeping only words of at least `min_word_length`.
    pub fn with_min_length(min_word_length: usize) -> Self {
        Self {
            stopwords: STOPWORDS_EN.iter().copied().collect(),
            min_word_length,
        }
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Extract keywords from already-lowercased tokens, preserving order.
    pub fn extract(&self, tokens: &[String]) -> Vec<String> {
        tokens
            .iter()
            .filter(|word| {
                word.chars().count() >= self.min_word_length
                    && !self.is_stopword(word)
                    && !word.chars().all(|c| c.is_numeric())
            })
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_stopwords_removed() {
        let extractor = KeywordExtractor::new();

        let keywords = extractor.extract(&tokens(&["the", "model", "is", "learning"]));
        assert_eq!(keywords, vec!["model", "learning"]);
    }

    #[test]
    fn test_short_and_numeric_removed() {
        let extractor = KeywordExtractor::new();

        let keywords = extractor.extract(&tokens(&["ai", "42", "2024", "neural", "ml"]));
        assert_eq!(keywords, vec!["neural"]);
    }

    #[test]
    fn test_order_preserved() {
        let extractor = KeywordExtractor::new();

        let keywords = extractor.extract(&tokens(&["robots", "learn", "from", "conversations"]));
        assert_eq!(keywords, vec!["robots", "learn", "conversations"]);
    }

    #[test]
    fn test_empty_input() {
        let extractor = KeywordExtractor::new();

        assert!(extractor.extract(&[]).is_empty());
    }
}
