use async_trait::async_trait;
use scholarlink_common::Result;

/// Common trait for text-to-vector encoders
///
/// The returned vectors must all share one dimensionality; that
/// dimensionality defines `D` for the snapshot built from them.
#[async_trait]
pub trait TextEncoder: Send + Sync {
    /// Encode a batch of texts into embedding vectors, one per input
    async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Test connection/availability
    async fn test_connection(&self) -> Result<bool>;
}
