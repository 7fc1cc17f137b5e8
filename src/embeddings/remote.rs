//! Remote embedding backend - OpenAI-compatible `/embeddings` endpoint
//!
//! Costs money per call. No validation happens at construction time; a bad
//! key or unreachable endpoint surfaces on the first `embed`.

use super::{EmbedError, Embedder, EmbeddingVector};
use crate::config::EmbeddingsConfig;
use reqwest::blocking::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    input: [&'a str; 1],
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    #[serde(default)]
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: EmbeddingVector,
}

/// Embedder backed by a hosted embeddings API
pub struct RemoteEmbedder {
    base_url: String,
    model: String,
    api_key: String,
    http: HttpClient,
}

impl RemoteEmbedder {
    pub fn new(config: &EmbeddingsConfig, api_key: &str) -> Result<Self, EmbedError> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.remote_base_url.trim_end_matches('/').to_string(),
            model: config.remote_model.clone(),
            api_key: api_key.to_string(),
            http,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

impl Embedder for RemoteEmbedder {
    fn embed(&self, text: &str) -> Result<Option<EmbeddingVector>, EmbedError> {
        let url = format!("{}/embeddings", self.base_url);
        tracing::debug!(%url, model = %self.model, "requesting remote embedding");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingRequest {
                input: [text],
                model: &self.model,
            })
            .send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(EmbedError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EmbeddingResponse = serde_json::from_str(&body)?;
        let vector = parsed.data.into_iter().next().map(|d| d.embedding);
        if vector.is_none() {
            tracing::warn!(model = %self.model, "embeddings API returned no data");
        }
        Ok(vector)
    }
}
