//! Integration tests for the remote classifier against a mock endpoint

use cringeguard_classifiers::{Classifier, ClassifierConfig, CringeClassifier};
use cringeguard_core::{ClassificationResult, Error};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const COMPLETIONS_PATH: &str = "/openai/v1/chat/completions";

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("cringeguard=debug")
        .with_test_writer()
        .try_init();
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "gemma2-9b-it",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn classifier_for(server: &MockServer) -> CringeClassifier {
    init_tracing();
    let config = ClassifierConfig {
        endpoint: format!("{}{}", server.uri(), COMPLETIONS_PATH),
        retry_delay_ms: 5,
        ..ClassifierConfig::default()
    };
    CringeClassifier::new(config).unwrap().with_api_key("gsk_test")
}

#[tokio::test]
async fn test_flags_post_and_serves_repeat_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("true: ad")))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);

    let first = classifier.classify("Buy my course now!").await.unwrap();
    assert_eq!(first, ClassificationResult::cringe(["ad"]));

    let second = classifier.classify("Buy my course now!").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_request_carries_auth_prompt_and_sanitized_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("authorization", "Bearer gsk_test"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("false")))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let result = classifier
        .classify("  <script>Shipped a new parser\u{0007}</script>  ")
        .await
        .unwrap();
    assert_eq!(result, ClassificationResult::clean());

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["model"], "gemma2-9b-it");
    assert_eq!(body["messages"][0]["role"], "system");
    assert!(body["messages"][0]["content"]
        .as_str()
        .unwrap()
        .contains("- Engagement bait (\"Comment interested\", \"Tag 3 people\")"));
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(
        body["messages"][1]["content"],
        "scriptShipped a new parser/script"
    );
    assert!((body["temperature"].as_f64().unwrap() - 0.1).abs() < 1e-6);
}

#[tokio::test]
async fn test_rate_limited_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("true: engagement bait")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let result = classifier.classify("Comment INTERESTED below").await.unwrap();

    assert_eq!(result, ClassificationResult::cringe(["engagement bait"]));
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_rate_limit_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let err = classifier.classify("Tag 3 people").await.unwrap_err();

    assert!(matches!(err, Error::RateLimited));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    let err = classifier.classify("Agree?").await.unwrap_err();

    assert!(matches!(err, Error::Remote { status: 503 }));
}

#[tokio::test]
async fn test_missing_choices_is_malformed_and_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .expect(2)
        .mount(&server)
        .await;

    let classifier = classifier_for(&server);
    for _ in 0..2 {
        let err = classifier.classify("Humbled to announce").await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }
    assert!(classifier.cache().is_empty());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    init_tracing();
    let config = ClassifierConfig {
        endpoint: "http://127.0.0.1:9/openai/v1/chat/completions".to_string(),
        request_timeout_secs: 2,
        ..ClassifierConfig::default()
    };
    let classifier = CringeClassifier::new(config).unwrap().with_api_key("gsk_test");

    let err = classifier.classify("Hello").await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn test_without_key_no_request_is_made() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("true: ad")))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClassifierConfig {
        endpoint: format!("{}{}", server.uri(), COMPLETIONS_PATH),
        ..ClassifierConfig::default()
    };
    let classifier = CringeClassifier::new(config).unwrap();

    let err = classifier.classify("Buy my course now!").await.unwrap_err();
    assert!(matches!(err, Error::NotInitialized));
}
