//! Lexicon-based sentiment detection.
//!
//! Counts tokens containing a positive- vs. negative-lexicon substring;
//! ties resolve to neutral.

use super::analysis::Sentiment;

const POSITIVE_WORDS: &[&str] = &[
    "great",
    "excellent",
    "good",
    "love",
    "happy",
    "thank",
    "helpful",
    "clear",
    "nice",
    "amazing",
    "wonderful",
    "awesome",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad",
    "hate",
    "problem",
    "difficult",
    "frustrat",
    "error",
    "unclear",
    "boring",
    "terrible",
    "awful",
    "broken",
    "wrong",
];

/// Substring-containment sentiment analyzer.
#[derive(Debug, Default)]
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Classify already-lowercased tokens.
    pub fn classify(&self, tokens: &[String]) -> Sentiment {
        let positive = tokens
            .iter()
            .filter(|word| POSITIVE_WORDS.iter().any(|pos| word.contains(pos)))
            .count();
        let negative = tokens
            .iter()
            .filter(|word| NEGATIVE_WORDS.iter().any(|neg| word.contains(neg)))
            .count();

        if positive > negative {
            Sentiment::Positive
        } else if negative > positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_positive() {
        let analyzer = SentimentAnalyzer::new();

        let sentiment = analyzer.classify(&tokens(&["this", "was", "really", "helpful"]));
        assert_eq!(sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_negative() {
        let analyzer = SentimentAnalyzer::new();

        let sentiment = analyzer.classify(&tokens(&["the", "export", "is", "broken"]));
        assert_eq!(sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_tie_is_neutral() {
        let analyzer = SentimentAnalyzer::new();

        let sentiment = analyzer.classify(&tokens(&["great", "but", "broken"]));
        assert_eq!(sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_substring_containment() {
        let analyzer = SentimentAnalyzer::new();

        // "thankful" contains "thank", "frustrating" contains "frustrat"
        assert_eq!(
            analyzer.classify(&tokens(&["thankful"])),
            Sentiment::Positive
        );
        assert_eq!(
            analyzer.classify(&tokens(&["frustrating"])),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_empty_is_neutral() {
        let analyzer = SentimentAnalyzer::new();

        assert_eq!(analyzer.classify(&[]), Sentiment::Neutral);
    }
}
