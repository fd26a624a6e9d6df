//! Integration tests for the service clients against mock HTTP servers.
//!
//! Covers the success path for each endpoint and the mapping of non-2xx statuses,
//! refused connections, malformed payloads and stalled servers to absent results.

use std::time::{Duration, Instant};

use mockito::Matcher;
use reply_core::{LearnType, SentimentLabel, ServiceResult, Urgency};
use serde_json::json;
use service_client::{
    ContactSource, HttpContactService, HttpSentimentService, HttpStyleService, SentimentSource,
    ServiceClient, StyleSource,
};
use tokio::net::TcpListener;

fn sentiment_service(url: &str) -> HttpSentimentService {
    HttpSentimentService::new(ServiceClient::new("sentiment", url))
}

#[tokio::test]
async fn test_analyze_success_clamps_scores() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/analyze")
        .match_body(Matcher::Json(json!({"message": "I can't believe it!"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "sentiment": "negative",
                "confidence": 1.4,
                "emotions": [{"emotion": "anger", "score": 0.9}],
                "urgency": "high",
                "keyPoints": ["upset about delay"],
                "suggestedApproach": "Acknowledge the frustration"
            }"#,
        )
        .create_async()
        .await;

    let result = sentiment_service(&server.url())
        .analyze("I can't believe it!")
        .await;

    mock.assert_async().await;
    let verdict = result.success().expect("expected Success");
    assert_eq!(verdict.sentiment, SentimentLabel::Negative);
    assert_eq!(verdict.confidence, 1.0);
    assert_eq!(verdict.urgency, Urgency::High);
    assert_eq!(verdict.key_points, vec!["upset about delay"]);
}

#[tokio::test]
async fn test_non_success_status_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/analyze")
        .with_status(503)
        .with_body("overloaded")
        .create_async()
        .await;

    let result = sentiment_service(&server.url()).analyze("hello").await;
    assert_eq!(result, ServiceResult::Unavailable);
}

#[tokio::test]
async fn test_malformed_payload_is_unavailable() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/api/analyze")
        .with_status(200)
        .with_body("<html>not json</html>")
        .create_async()
        .await;

    let result = sentiment_service(&server.url()).analyze("hello").await;
    assert_eq!(result, ServiceResult::Unavailable);
}

#[tokio::test]
async fn test_refused_connection_is_unavailable() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = sentiment_service(&format!("http://{}", addr))
        .analyze("hello")
        .await;
    assert_eq!(result, ServiceResult::Unavailable);
}

#[tokio::test]
async fn test_stalled_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // Accept connections and never answer.
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let service = HttpSentimentService::new(
        ServiceClient::new("sentiment", format!("http://{}", addr))
            .with_timeout(Duration::from_millis(150)),
    );
    let started = Instant::now();
    let result = service.analyze("hello").await;

    assert_eq!(result, ServiceResult::Timeout);
    assert!(started.elapsed() < Duration::from_secs(2));
    server.abort();
}

#[tokio::test]
async fn test_contact_match_and_null_match() {
    let mut server = mockito::Server::new_async().await;
    let _matched = server
        .mock("POST", "/api/contacts/match")
        .match_body(Matcher::Json(json!({"message": "Sam says hi"})))
        .with_status(200)
        .with_body(
            r#"{"match": {
                "contact": {"id": "c1", "name": "Sam", "relationship": "coworker"},
                "confidence": 0.95,
                "matchedOn": "Sam"
            }}"#,
        )
        .create_async()
        .await;
    let _unmatched = server
        .mock("POST", "/api/contacts/match")
        .match_body(Matcher::Json(json!({"message": "who is this"})))
        .with_status(200)
        .with_body(r#"{"match": null}"#)
        .create_async()
        .await;

    let service = HttpContactService::new(ServiceClient::new("contacts", server.url()));

    let matched = service.match_contact("Sam says hi").await.success().unwrap();
    let contact_match = matched.expect("expected a contact");
    assert_eq!(contact_match.contact.name, "Sam");
    assert_eq!(contact_match.contact.relationship, "coworker");

    let unmatched = service.match_contact("who is this").await;
    assert_eq!(unmatched, ServiceResult::Success(None));
}

#[tokio::test]
async fn test_style_profile_and_learn() {
    let mut server = mockito::Server::new_async().await;
    let _profile = server
        .mock("GET", "/api/profile")
        .with_status(200)
        .with_body(
            r#"{"totalSamples": 5, "greetings": ["Hey"], "signoffs": ["Cheers"],
                "vocabularyLevel": "casual", "emojiFrequency": 0.4,
                "commonPhrases": ["sounds good"]}"#,
        )
        .create_async()
        .await;
    let learn = server
        .mock("POST", "/api/learn")
        .match_body(Matcher::Json(
            json!({"content": "Sounds good!", "type": "selected_reply"}),
        ))
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create_async()
        .await;

    let service = HttpStyleService::new(ServiceClient::new("style", server.url()));

    let profile = service.profile().await.success().unwrap();
    assert_eq!(profile.total_samples, 5);
    assert_eq!(profile.greetings, vec!["Hey"]);
    assert_eq!(profile.emoji_frequency, Some(0.4));

    let accepted = service.learn("Sounds good!", LearnType::SelectedReply).await;
    learn.assert_async().await;
    assert_eq!(accepted, ServiceResult::Success(true));
}
