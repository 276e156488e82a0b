//! Scholarlink Similarity Engine
//!
//! In-memory cosine-similarity search over student/professor interest
//! embeddings, with live snapshot reload from the source tables.

pub mod artifacts;
pub mod normalize;
pub mod recommender;
pub mod reload;
pub mod similarity;
pub mod store;
pub mod types;

pub use recommender::Recommender;
pub use reload::{ReloadStatus, Reloader};
pub use similarity::{cosine_similarity, search, DEFAULT_THRESHOLD, DEFAULT_TOP_N};
pub use store::EmbeddingStore;
pub use types::{Collection, EmbeddingSnapshot, Recommendation};
