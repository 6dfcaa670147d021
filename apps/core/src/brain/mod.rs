//! # Brain Module
//!
//! Rule-based analysis of user input. Runs before response generation to
//! produce a structured [`Analysis`] of the raw text.
//!
//! ## Components
//! - `intent`: Intent detection over literal marker phrases
//! - `sentiment`: Lexicon-based sentiment counting
//! - `keywords`: Stopword-filtered keyword extraction
//! - `complexity`: Word/sentence-length complexity heuristic
//! - `analysis`: Output data structure
//! - `analyzer`: Main orchestrator and fuzzy containment helper

pub mod analysis;
pub mod analyzer;
pub mod complexity;
pub mod intent;
pub mod keywords;
pub mod sentiment;

pub use analysis::{Analysis, Intent, Sentiment};
pub use analyzer::{fuzzy_match, TextAnalyzer};
pub use complexity::ComplexityScorer;
pub use intent::IntentClassifier;
pub use keywords::KeywordExtractor;
pub use sentiment::SentimentAnalyzer;
