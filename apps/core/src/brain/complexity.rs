//! Text complexity scoring.
//!
//! Score is `(average word length + average sentence length) / 10`, with the
//! sentence count floored at 1 so empty or unterminated input never divides
//! by zero.

/// Complexity scorer over whitespace tokens and `.!?` sentence breaks.
#[derive(Debug, Default)]
pub struct ComplexityScorer;

impl ComplexityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Count sentences by splitting on terminal punctuation, minimum 1.
    fn count_sentences(&self, text: &str) -> usize {
        let count = text
            .split(['.', '!', '?'])
            .filter(|segment| !segment.trim().is_empty())
            .count();

        count.max(1)
    }

    /// Score raw text. Empty input scores 0.0.
    pub fn score(&self, text: &str) -> f32 {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() {
            return 0.0;
        }

        let word_count = words.len() as f32;
        let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
        let avg_word_length = total_chars as f32 / word_count;

        let sentence_count = self.count_sentences(text) as f32;
        let avg_sentence_length = word_count / sentence_count;

        (avg_word_length + avg_sentence_length) / 10.0
    }
}
