//! Knowledge Store Tests
//!
//! Store mutation, retention policies, snapshot round-trips, and the
//! feedback clamps.

use crate::error::BrainError;
use crate::knowledge::{KnowledgeStore, MAX_PATTERN_HISTORY};
use crate::learning::Feedback;

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod seed_tests {
    use super::*;

    #[test]
    fn test_seed_topics_present() {
        let store = KnowledgeStore::seeded();

        for name in ["greeting", "ai_topics", "thanks"] {
            let entry = store.topic(name).expect("seed topic missing");
            assert!(!entry.patterns.is_empty());
            assert!(entry.responses.len() >= 3);
        }
    }

    #[test]
    fn test_fresh_store_scalars() {
        let store = KnowledgeStore::new();

        assert!((store.learning_rate() - 0.1).abs() < 1e-6);
        assert!((store.confidence() - 0.5).abs() < 1e-6);
        assert_eq!(store.topic_count(), 0);
    }
}

#[cfg(test)]
mod pattern_history_tests {
    use super::*;

    #[test]
    fn test_patterns_lowercased() {
        let mut store = KnowledgeStore::new();
        store.record_pattern("Hello World");

        assert_eq!(store.pattern_history().front().unwrap(), "hello world");
    }

    #[test]
    fn test_history_cap_keeps_most_recent() {
        let mut store = KnowledgeStore::new();
        for i in 0..1050 {
            store.record_pattern(&format!("input {}", i));
        }

        let history = store.pattern_history();
        assert_eq!(history.len(), MAX_PATTERN_HISTORY);
        assert_eq!(history.front().unwrap(), "input 50");
        assert_eq!(history.back().unwrap(), "input 1049");
    }
}

#[cfg(test)]
mod reinforcement_tests {
    use super::*;

    #[test]
    fn test_reinforce_existing_topic() {
        let mut store = KnowledgeStore::seeded();
        let before = store.topic("greeting").unwrap().clone();

        store.reinforce_topic("greeting", &keywords(&["howdy", "hello"]), "ack".to_string());

        let after = store.topic("greeting").unwrap();
        assert_eq!(after.frequency, before.frequency + 1);
        assert!(after.patterns.contains(&"howdy".to_string()));
        // Existing pattern is not duplicated.
        let hello_count = after.patterns.iter().filter(|p| *p == "hello").count();
        assert_eq!(hello_count, 1);
        // Responses untouched by reinforcement.
        assert_eq!(after.responses, before.responses);
    }

    #[test]
    fn test_reinforce_creates_novel_topic() {
        let mut store = KnowledgeStore::new();

        store.reinforce_topic(
            "astronomy",
            &keywords(&["stars", "planets"]),
            "Interesting subject!".to_string(),
        );

        let entry = store.topic("astronomy").unwrap();
        assert_eq!(entry.frequency, 1);
        assert_eq!(entry.patterns, vec!["stars", "planets"]);
        assert_eq!(entry.responses, vec!["Interesting subject!"]);
    }

    #[test]
    fn test_learned_responses_capped() {
        let mut store = KnowledgeStore::new();
        store.reinforce_topic("music", &keywords(&["guitar"]), "ack".to_string());

        for i in 0..20 {
            store.add_topic_response("music", format!("learned {}", i), 10);
        }

        assert_eq!(store.topic("music").unwrap().responses.len(), 10);
    }
}

#[cfg(test)]
mod pruning_tests {
    use super::*;

    #[test]
    fn test_small_store_is_never_pruned() {
        let mut store = KnowledgeStore::new();
        for i in 0..10 {
            store.reinforce_topic(&format!("topic {}", i), &[], "ack".to_string());
        }

        store.prune_stale_topics();
        assert_eq!(store.topic_count(), 10);
    }

    #[test]
    fn test_prune_drops_rare_topics_past_ceiling() {
        let mut store = KnowledgeStore::new();
        for i in 0..55 {
            store.reinforce_topic(&format!("topic {}", i), &[], "ack".to_string());
        }
        // Reinforce five of them a second time.
        for i in 0..5 {
            store.reinforce_topic(&format!("topic {}", i), &[], "ack".to_string());
        }
        assert_eq!(store.topic_count(), 55);

        store.prune_stale_topics();
        assert_eq!(store.topic_count(), 5);
        assert!(store.topic("topic 0").is_some());
        assert!(store.topic("topic 54").is_none());
    }

    #[test]
    fn test_prune_is_idempotent() {
        let mut store = KnowledgeStore::new();
        for i in 0..60 {
            store.reinforce_topic(&format!("topic {}", i), &[], "ack".to_string());
        }
        for i in 0..8 {
            store.reinforce_topic(&format!("topic {}", i), &[], "ack".to_string());
        }

        store.prune_stale_topics();
        let once = store.clone();
        store.prune_stale_topics();

        assert_eq!(store, once);
    }
}

#[cfg(test)]
mod snapshot_tests {
    use super::*;

    #[test]
    fn test_export_import_round_trip() {
        let mut original = KnowledgeStore::seeded();
        original.record_pattern("hello there");
        original.record_pattern("tell me about ai");
        original.reinforce_topic("greeting", &keywords(&["howdy"]), "ack".to_string());
        original.bump_preference("greeting");
        original.apply_feedback(Feedback::Positive);

        let value = serde_json::to_value(original.export_snapshot()).unwrap();

        let mut restored = KnowledgeStore::new();
        restored.import_snapshot(&value).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_partial_import_leaves_rest_untouched() {
        let mut store = KnowledgeStore::seeded();
        let topics_before = store.topic_count();

        store
            .import_snapshot(&serde_json::json!({ "learningRate": 0.15 }))
            .unwrap();

        assert!((store.learning_rate() - 0.15).abs() < 1e-6);
        assert_eq!(store.topic_count(), topics_before);
        assert!((store.confidence() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_imported_scalars_are_clamped() {
        let mut store = KnowledgeStore::new();

        store
            .import_snapshot(&serde_json::json!({ "learningRate": 0.9, "confidence": 0.05 }))
            .unwrap();

        assert!((store.learning_rate() - 0.2).abs() < 1e-6);
        assert!((store.confidence() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_malformed_import_is_rejected() {
        let mut store = KnowledgeStore::seeded();

        let err = store
            .import_snapshot(&serde_json::json!({ "topics": "not a map" }))
            .unwrap_err();
        assert!(matches!(err, BrainError::DataFormat(_)));

        let err = store
            .import_snapshot(&serde_json::json!("just a string"))
            .unwrap_err();
        assert!(matches!(err, BrainError::DataFormat(_)));
    }
}

#[cfg(test)]
mod feedback_tests {
    use super::*;

    #[test]
    fn test_negative_feedback_steps_down() {
        let mut store = KnowledgeStore::new();

        store.apply_feedback(Feedback::Negative);

        assert!((store.learning_rate() - 0.09).abs() < 1e-6);
        assert!((store.confidence() - 0.45).abs() < 1e-6);
    }

    #[test]
    fn test_positive_feedback_steps_up() {
        let mut store = KnowledgeStore::new();

        store.apply_feedback(Feedback::Positive);

        assert!((store.learning_rate() - 0.11).abs() < 1e-6);
        assert!((store.confidence() - 0.55).abs() < 1e-6);
    }

    #[test]
    fn test_feedback_clamps_at_bounds() {
        let mut store = KnowledgeStore::new();

        for _ in 0..50 {
            store.apply_feedback(Feedback::Positive);
        }
        assert!((store.learning_rate() - 0.2).abs() < 1e-6);
        assert!((store.confidence() - 0.9).abs() < 1e-6);

        for _ in 0..50 {
            store.apply_feedback(Feedback::Negative);
        }
        assert!((store.learning_rate() - 0.05).abs() < 1e-6);
        assert!((store.confidence() - 0.3).abs() < 1e-6);
    }
}

#[cfg(test)]
mod stats_tests {
    use super::*;

    #[test]
    fn test_top_topics_sorted_by_frequency() {
        let mut store = KnowledgeStore::new();
        for _ in 0..3 {
            store.reinforce_topic("popular", &[], "ack".to_string());
        }
        store.reinforce_topic("rare", &[], "ack".to_string());

        let stats = store.stats();
        assert_eq!(stats.knowledge_topics, 2);
        assert_eq!(stats.top_topics[0].topic, "popular");
        assert_eq!(stats.top_topics[0].frequency, 3);
        assert_eq!(stats.top_topics[1].topic, "rare");
    }

    #[test]
    fn test_unused_seed_topics_not_in_top() {
        let store = KnowledgeStore::seeded();

        // Seed topics start at frequency 0 and are not reported as "top".
        assert!(store.stats().top_topics.is_empty());
    }
}
