use crate::error::{AppError, Result};
use crate::services::mood_index::RAW_DIM;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// External collaborator that turns query text into a raw embedding
/// vector. Behind a trait so handlers can run against a stub in tests.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// HTTP client for the sentence-embedding sidecar.
pub struct EmbeddingClient {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl TextEmbedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/embed", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&EmbedRequest { text })
            .send()
            .await
            .map_err(|e| {
                AppError::EmbeddingProvider(format!("Failed to call embedding service: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::EmbeddingProvider(format!(
                "Embedding service returned {}",
                response.status()
            )));
        }

        let body: EmbedResponse = response.json().await.map_err(|e| {
            AppError::EmbeddingProvider(format!("Failed to parse embedding response: {}", e))
        })?;

        if body.embedding.len() != RAW_DIM {
            return Err(AppError::EmbeddingProvider(format!(
                "Unexpected query embedding dimension: {}",
                body.embedding.len()
            )));
        }

        Ok(body.embedding)
    }
}
