//! HTTP embedding client for OpenAI-compatible `/embeddings` endpoints.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::provider::{EmbedError, EmbedResult, EmbeddingProvider};

/// Default request deadline. A timeout is treated like any other transport
/// failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);
/// Default endpoint base.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default embedding model.
pub const DEFAULT_MODEL: &str = "text-embedding-3-small";

/// Async embeddings client with a bounded timeout. No retries: a single
/// failed attempt is terminal for that product's rerank attempt.
#[derive(Debug, Clone)]
pub struct HttpEmbeddingClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl HttpEmbeddingClient {
    pub fn new(
        api_key: &str,
        base_url: &str,
        model: &str,
        timeout: Duration,
    ) -> EmbedResult<Self> {
        if api_key.trim().is_empty() {
            return Err(EmbedError::Config("missing API key".to_string()));
        }
        let mut headers = HeaderMap::new();
        let auth = format!("Bearer {}", api_key.trim());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth)
                .map_err(|e| EmbedError::Config(format!("invalid API key: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| EmbedError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    /// Client with default endpoint, model and timeout.
    pub fn from_api_key(api_key: &str) -> EmbedResult<Self> {
        Self::new(api_key, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }
}

impl EmbeddingProvider for HttpEmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> EmbedResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| EmbedError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(EmbedError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let mut parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| EmbedError::Malformed(e.to_string()))?;
        parsed.data.sort_by_key(|entry| entry.index);

        if parsed.data.len() != texts.len() {
            return Err(EmbedError::Malformed(format!(
                "{} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }
        let dim = parsed.data[0].embedding.len();
        if dim == 0 || parsed.data.iter().any(|entry| entry.embedding.len() != dim) {
            return Err(EmbedError::Malformed(
                "embeddings have inconsistent dimensionality".to_string(),
            ));
        }

        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_config_error() {
        assert!(matches!(
            HttpEmbeddingClient::from_api_key("  "),
            Err(EmbedError::Config(_))
        ));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client =
            HttpEmbeddingClient::new("key", "https://example.test/v1/", "model", DEFAULT_TIMEOUT)
                .unwrap();
        assert_eq!(client.endpoint, "https://example.test/v1/embeddings");
    }

    #[tokio::test]
    async fn test_empty_batch_short_circuits() {
        let client = HttpEmbeddingClient::from_api_key("key").unwrap();
        let out = client.embed_batch(&[]).await.unwrap();
        assert!(out.is_empty());
    }
}
