//! Test Module
//!
//! Test suite for the EchoMind core.
//!
//! ## Test Categories
//! - `brain_tests`: Analyzer, intent, keywords, sentiment, complexity
//! - `knowledge_tests`: Store mutation, pruning, snapshots, feedback clamps
//! - `responder_tests`: Response selection, confidence bounds, customization
//! - `engine_tests`: Full turn pipeline, persistence, export/import
//! - `storage_tests`: SQLite and in-memory key-value storage
//! - `provider_tests`: External provider contract and fallback flags

pub mod knowledge_tests;
pub mod provider_tests;
