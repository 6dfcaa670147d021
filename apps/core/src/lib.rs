//! # EchoMind Core
//!
//! Rule-based chat brain with browser-style local persistence: a keyword
//! analyzer, a knowledge store that learns from every turn, a confidence-
//! scored response generator, and an optional external provider with
//! guaranteed local fallback.
//!
//! The core is a library driven by an interactive UI. Everything runs
//! within one session: construct a [`ChatEngine`], optionally attach a
//! [`storage::Storage`] collaborator, and feed it user turns.

pub mod brain;
pub mod config;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod learning;
pub mod models;
pub mod provider;
pub mod responder;
pub mod storage;
pub mod telemetry;

pub use brain::{Analysis, Intent, Sentiment, TextAnalyzer};
pub use config::{EngineConfig, ResponseTemplates};
pub use engine::{ChatEngine, ChatExport, PROVIDER_LOCAL};
pub use error::BrainError;
pub use knowledge::{KnowledgeSnapshot, KnowledgeStore, LearningStats, TopicEntry};
pub use learning::Feedback;
pub use models::{Message, Sender};
pub use provider::ProviderClient;
pub use responder::{GeneratedResponse, ResponseGenerator};

#[cfg(test)]
mod tests;
