//! HTTP clients for remote embedding and NER collaborators.
//!
//! Both clients speak a small JSON contract and are pointed at a base URL,
//! so they work against any service exposing the endpoints (and against
//! wiremock in tests):
//!
//! - `POST {base}/embed` with `{"model": ..., "inputs": [...]}` returns
//!   `{"vectors": [[f32, ...], ...]}` in input order.
//! - `POST {base}/entities` with `{"text": ...}` returns
//!   `{"entities": [{"type", "value", "start", "end", "confidence"}, ...]}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{EmbeddingProvider, EntityProvider};
use crate::error::{HuginnError, Result};
use crate::types::{EmbeddingVector, Entity};

/// HTTP request timeout. The engine applies its own (shorter) collaborator
/// timeout per call; this is a backstop against hung connections.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    inputs: &'a [&'a str],
}

#[derive(Deserialize)]
struct EmbedResponse {
    vectors: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct EntitiesRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EntitiesResponse {
    entities: Vec<Entity>,
}

/// Client for a remote embedding service.
#[derive(Clone)]
pub struct HttpEmbeddingClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
}

impl HttpEmbeddingClient {
    /// Create a client for the given service URL and model identifier.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            api_key: None,
            model: model.into(),
        }
    }

    /// Attach a bearer token sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    async fn request_vectors(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embed", self.base_url);

        let mut request = self.http.post(&url).json(&EmbedRequest {
            model: &self.model,
            inputs: texts,
        });
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        handle_response_errors(&response)?;

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        if body.vectors.len() != texts.len() {
            return Err(HuginnError::Embedding(format!(
                "service returned {} vectors for {} inputs",
                body.vectors.len(),
                texts.len()
            )));
        }
        Ok(body.vectors)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingClient {
    fn name(&self) -> &str {
        "http-embedding"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn embed(&self, text: &str) -> Result<EmbeddingVector> {
        let values = self
            .request_vectors(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| HuginnError::Embedding("empty response from service".to_string()))?;
        Ok(EmbeddingVector::new(values, &self.model))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<EmbeddingVector>> {
        let vectors = self.request_vectors(texts).await?;
        Ok(vectors
            .into_iter()
            .map(|values| EmbeddingVector::new(values, &self.model))
            .collect())
    }
}

/// Client for a remote named-entity-recognition service.
#[derive(Clone)]
pub struct HttpEntityClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpEntityClient {
    /// Create a client for the given service URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Attach a bearer token sent with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl EntityProvider for HttpEntityClient {
    fn name(&self) -> &str {
        "http-entities"
    }

    async fn extract_entities(&self, text: &str) -> Result<Vec<Entity>> {
        let url = format!("{}/entities", self.base_url);

        let mut request = self.http.post(&url).json(&EntitiesRequest { text });
        if let Some(ref key) = self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| HuginnError::EntityExtraction(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HuginnError::EntityExtraction(format!(
                "NER service returned {status}"
            )));
        }

        let body: EntitiesResponse = response
            .json()
            .await
            .map_err(|e| HuginnError::EntityExtraction(e.to_string()))?;

        Ok(body.entities)
    }
}

/// Check response status and map to the appropriate error.
fn handle_response_errors(response: &reqwest::Response) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        401 | 403 => Err(HuginnError::AuthenticationFailed),
        code => Err(HuginnError::Api {
            status: code,
            message: format!("embedding service error: {status}"),
        }),
    }
}
