//! HTTP collaborator clients against a mock server.

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use huginn::providers::{
    EmbeddingProvider, EntityProvider, HttpEmbeddingClient, HttpEntityClient,
};
use huginn::HuginnError;

// ============================================================================
// Embedding client
// ============================================================================

#[tokio::test]
async fn embed_parses_vector_and_tags_model() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "vectors": [[0.1, 0.2, 0.3]] })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpEmbeddingClient::new(mock_server.uri(), "all-MiniLM-L6-v2");
    let vector = client.embed("hello world").await.unwrap();

    assert_eq!(vector.values, vec![0.1, 0.2, 0.3]);
    assert_eq!(vector.dimensions, 3);
    assert_eq!(vector.model, "all-MiniLM-L6-v2");
}

#[tokio::test]
async fn embed_sends_bearer_token_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .and(header("Authorization", "Bearer test_key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vectors": [[1.0]] })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client =
        HttpEmbeddingClient::new(mock_server.uri(), "all-MiniLM-L6-v2").with_api_key("test_key");
    client.embed("hello").await.unwrap();
}

#[tokio::test]
async fn embed_batch_preserves_input_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "vectors": [[1.0, 0.0], [0.0, 1.0]] })),
        )
        .mount(&mock_server)
        .await;

    let client = HttpEmbeddingClient::new(mock_server.uri(), "all-MiniLM-L6-v2");
    let vectors = client.embed_batch(&["first", "second"]).await.unwrap();

    assert_eq!(vectors.len(), 2);
    assert_eq!(vectors[0].values, vec![1.0, 0.0]);
    assert_eq!(vectors[1].values, vec![0.0, 1.0]);
}

#[tokio::test]
async fn embed_count_mismatch_is_embedding_failure() {
    let mock_server = MockServer::start().await;

    // Two inputs, one vector back
    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "vectors": [[1.0]] })))
        .mount(&mock_server)
        .await;

    let client = HttpEmbeddingClient::new(mock_server.uri(), "all-MiniLM-L6-v2");
    let result = client.embed_batch(&["first", "second"]).await;

    assert!(matches!(result, Err(HuginnError::Embedding(_))));
}

#[tokio::test]
async fn embed_auth_failure_is_typed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let client = HttpEmbeddingClient::new(mock_server.uri(), "all-MiniLM-L6-v2");
    let result = client.embed("hello").await;

    assert!(matches!(result, Err(HuginnError::AuthenticationFailed)));
}

#[tokio::test]
async fn embed_server_error_carries_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = HttpEmbeddingClient::new(mock_server.uri(), "all-MiniLM-L6-v2");
    let result = client.embed("hello").await;

    assert!(matches!(
        result,
        Err(HuginnError::Api { status: 503, .. })
    ));
}

// ============================================================================
// Entity client
// ============================================================================

#[tokio::test]
async fn entities_parse_typed_spans() {
    let mock_server = MockServer::start().await;

    let body = json!({
        "entities": [
            { "type": "person", "value": "John", "start": 30, "end": 34, "confidence": 0.97 },
            { "type": "datetime", "value": "tomorrow at 3pm", "start": 35, "end": 50, "confidence": 0.91 }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpEntityClient::new(mock_server.uri());
    let entities = client
        .extract_entities("Remember I have a meeting with John tomorrow at 3pm")
        .await
        .unwrap();

    assert_eq!(entities.len(), 2);
    assert!(entities[0].is_type("person"));
    assert_eq!(entities[1].value, "tomorrow at 3pm");
}

#[tokio::test]
async fn entity_service_failure_is_non_fatal_error_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let client = HttpEntityClient::new(mock_server.uri());
    let result = client.extract_entities("anything").await;

    // The classifier swallows this class of error; the client itself
    // still reports it faithfully
    assert!(matches!(result, Err(HuginnError::EntityExtraction(_))));
}

// ============================================================================
// Engine over HTTP collaborators
// ============================================================================

/// Responds to any embed request with one constant vector per input, so
/// seed-cache builds of arbitrary batch sizes succeed.
struct EchoCountResponder;

impl Respond for EchoCountResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let count = body["inputs"].as_array().map(Vec::len).unwrap_or(0);
        let vectors: Vec<Vec<f32>> = (0..count).map(|_| vec![0.6, 0.8]).collect();
        ResponseTemplate::new(200).set_body_json(json!({ "vectors": vectors }))
    }
}

#[tokio::test]
async fn engine_classifies_through_http_collaborators() {
    use huginn::{Huginn, ParseOptions};
    use std::sync::Arc;

    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/embed"))
        .respond_with(EchoCountResponder)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/entities"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "entities": [] })))
        .mount(&mock_server)
        .await;

    let engine = Huginn::builder()
        .embedding_provider(Arc::new(HttpEmbeddingClient::new(
            mock_server.uri(),
            "all-MiniLM-L6-v2",
        )))
        .entity_provider(Arc::new(HttpEntityClient::new(mock_server.uri())))
        .build()
        .unwrap();

    let result = engine
        .parse("What's the weather today?", &ParseOptions::default())
        .await
        .unwrap();

    // Identical vectors make raw similarities uniform; the lexical rules
    // still break the tie toward web_search
    assert_eq!(result.intent.label(), "web_search");
    for (_, value) in result.scores.iter() {
        assert!((0.0..=1.0).contains(&value));
    }
}
