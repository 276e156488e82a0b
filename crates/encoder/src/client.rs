use async_trait::async_trait;
use reqwest::Client;
use scholarlink_common::Result;
use tracing::debug;

use crate::encoder_trait::TextEncoder;
use crate::types::{EmbedRequest, EmbedResponse};

/// Ollama embeddings API client
#[derive(Debug, Clone)]
pub struct OllamaEncoder {
    base_url: String,
    model: String,
    client: Client,
}

impl OllamaEncoder {
    /// Create new Ollama encoder
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        let model = model.into();
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(300)) // 5 minutes for large batches
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        tracing::info!("Ollama encoder initialized: {} (model: {})", base_url, model);
        Ok(Self { base_url, model, client })
    }

    /// Model name used for embedding
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate embedding for a single text (with retry logic)
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_with_retry(text, 3).await
    }

    /// Generate embedding with custom retry count
    async fn embed_with_retry(&self, text: &str, max_retries: u32) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.base_url);

        debug!(
            "Generating embedding - Model: {}, Text length: {}",
            self.model,
            text.len()
        );

        let request = EmbedRequest {
            model: self.model.clone(),
            prompt: text.to_string(),
        };

        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.try_embed(&url, &request).await {
                Ok(embedding) => {
                    debug!("Received embedding - Dimension: {}", embedding.len());
                    return Ok(embedding);
                }
                Err(e) => {
                    last_error = Some(e);
                    if attempt < max_retries {
                        let delay = std::time::Duration::from_secs(2u64.pow(attempt - 1));
                        tracing::warn!(
                            "Embedding request failed (attempt {}/{}). Retrying in {:?}...",
                            attempt,
                            max_retries,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("All retries failed").into()))
    }

    /// Single attempt to generate embedding
    async fn try_embed(&self, url: &str, request: &EmbedRequest) -> Result<Vec<f32>> {
        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send embedding request: {}", e))?
            .error_for_status()
            .map_err(|e| anyhow::anyhow!("Ollama embedding API error: {}", e))?;

        let result: EmbedResponse = response.json().await
            .map_err(|e| anyhow::anyhow!("Failed to parse embedding response: {}", e))?;

        if result.embedding.is_empty() {
            return Err(anyhow::anyhow!("Empty embedding from Ollama").into());
        }

        Ok(result.embedding)
    }
}

#[async_trait]
impl TextEncoder for OllamaEncoder {
    /// Encode a batch of texts, one embeddings call per text
    ///
    /// The Ollama embeddings endpoint takes one prompt per request, so a
    /// batch is a sequential series of calls. Any single failure fails the
    /// whole batch; the caller abandons that reload cycle.
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for text in texts {
            let embedding = self.embed(text).await?;

            // All rows of one batch must agree on dimensionality
            if let Some(first) = vectors.first() {
                let expected: &Vec<f32> = first;
                if embedding.len() != expected.len() {
                    return Err(scholarlink_common::ScholarlinkError::encoding(format!(
                        "Inconsistent embedding dimension: expected {}, got {}",
                        expected.len(),
                        embedding.len()
                    )));
                }
            }

            vectors.push(embedding);
        }

        Ok(vectors)
    }

    async fn test_connection(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().await
            .map_err(|e| anyhow::anyhow!("Failed to connect to Ollama: {}", e))?;
        Ok(response.status().is_success())
    }
}
