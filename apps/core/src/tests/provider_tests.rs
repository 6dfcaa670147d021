//! Provider Client Tests
//!
//! Contract handling against a mock HTTP provider, including the fallback
//! signaling the engine relies on.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::EngineConfig;
use crate::engine::{ChatEngine, PROVIDER_LOCAL};
use crate::error::BrainError;
use crate::provider::ProviderClient;

async fn mock_provider(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn client_for(server: &MockServer) -> ProviderClient {
    ProviderClient::new("remote", &format!("{}/api/chat", server.uri())).unwrap()
}

#[cfg(test)]
mod client_tests {
    use super::*;
    use crate::models::Message;

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        assert!(matches!(
            ProviderClient::new("remote", "not a url"),
            Err(BrainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_successful_reply() {
        let server = MockServer::start().await;
        mock_provider(
            &server,
            json!({ "success": true, "data": { "response": "Hello from afar!" } }),
        )
        .await;

        let reply = client_for(&server).send("hello", &[]).await.unwrap();

        assert_eq!(reply, "Hello from afar!");
    }

    #[tokio::test]
    async fn test_reported_failure_carries_fallback_flag() {
        let server = MockServer::start().await;
        mock_provider(
            &server,
            json!({ "success": false, "error": "model overloaded", "fallbackToLocal": true }),
        )
        .await;

        let err = client_for(&server).send("hello", &[]).await.unwrap_err();

        assert!(err.should_fallback());
        assert!(err.to_string().contains("model overloaded"));
    }

    #[tokio::test]
    async fn test_failure_without_flag_does_not_fall_back() {
        let server = MockServer::start().await;
        mock_provider(&server, json!({ "success": false, "error": "bad request" })).await;

        let err = client_for(&server).send("hello", &[]).await.unwrap_err();

        assert!(!err.should_fallback());
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = client_for(&server).send("hello", &[]).await.unwrap_err();

        assert!(err.should_fallback());
    }

    #[tokio::test]
    async fn test_success_without_response_falls_back() {
        let server = MockServer::start().await;
        mock_provider(&server, json!({ "success": true })).await;

        let err = client_for(&server).send("hello", &[]).await.unwrap_err();

        assert!(err.should_fallback());
    }

    #[tokio::test]
    async fn test_history_is_windowed_and_trimmed() {
        let server = MockServer::start().await;
        mock_provider(
            &server,
            json!({ "success": true, "data": { "response": "ok" } }),
        )
        .await;

        let mut history: Vec<Message> = (0..10)
            .map(|i| Message::from_user(format!("turn {}", i)))
            .collect();
        history.push(Message::from_user("   "));

        client_for(&server).send("  hello  ", &history).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["message"], "hello");

        // Last eight entries, with the blank one dropped after windowing.
        let sent = body["conversationHistory"].as_array().unwrap();
        assert_eq!(sent.len(), 7);
        assert_eq!(sent[0]["content"], "turn 3");
        assert_eq!(sent.last().unwrap()["content"], "turn 9");
    }
}

#[cfg(test)]
mod engine_fallback_tests {
    use super::*;

    #[tokio::test]
    async fn test_provider_reply_is_recorded_with_its_id() {
        let server = MockServer::start().await;
        mock_provider(
            &server,
            json!({ "success": true, "data": { "response": "Hello from afar!" } }),
        )
        .await;
        let mut engine = ChatEngine::with_seed(EngineConfig::instant(), 42).unwrap();

        let reply = engine
            .process_turn_with_provider(&client_for(&server), "hello how are you")
            .await;

        assert_eq!(reply.content, "Hello from afar!");
        assert_eq!(reply.provider.as_deref(), Some("remote"));
        // The local learner still saw the turn.
        assert_eq!(engine.store().topic("greeting").unwrap().frequency, 1);
    }

    #[tokio::test]
    async fn test_provider_failure_falls_back_to_local() {
        let server = MockServer::start().await;
        mock_provider(
            &server,
            json!({ "success": false, "error": "down", "fallbackToLocal": true }),
        )
        .await;
        let mut engine = ChatEngine::with_seed(EngineConfig::instant(), 42).unwrap();

        let reply = engine
            .process_turn_with_provider(&client_for(&server), "hello how are you")
            .await;

        assert_eq!(reply.provider.as_deref(), Some(PROVIDER_LOCAL));
        assert!(!reply.content.is_empty());
        assert!(reply.confidence.unwrap() >= 0.5);
    }
}
