use ndarray::ArrayView1;
use std::cmp::Ordering;

use crate::types::{Collection, Recommendation};

/// Default number of results per query
pub const DEFAULT_TOP_N: usize = 10;

/// Default similarity threshold; entries must score strictly above it
pub const DEFAULT_THRESHOLD: f32 = 0.90;

/// Norm below which a vector is treated as zero
const NORM_EPSILON: f32 = 1e-12;

/// Compute cosine similarity between two vectors
///
/// Returns 0.0 when either vector has (near) zero norm.
pub fn cosine_similarity(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a <= NORM_EPSILON || norm_b <= NORM_EPSILON {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Rank a target collection against one query vector
///
/// Scores every row, keeps the `top_n` most similar (ties resolve toward
/// the lower original row index), then drops entries whose similarity is
/// not strictly greater than `threshold`. Returned scores are cosine
/// similarity scaled by 100, in descending order.
pub fn search(
    query: ArrayView1<'_, f32>,
    target: &Collection,
    top_n: usize,
    threshold: f32,
) -> Vec<Recommendation> {
    let mut scored: Vec<(usize, f32)> = (0..target.len())
        .map(|i| (i, cosine_similarity(query, target.row(i))))
        .collect();

    scored.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });

    // Top-N selection happens before threshold filtering, so the filter
    // can only shrink the ranked window, never pull in lower-ranked rows.
    scored
        .into_iter()
        .take(top_n)
        .filter(|(_, similarity)| *similarity > threshold)
        .map(|(index, similarity)| Recommendation {
            id: target.ids()[index].clone(),
            score: similarity * 100.0,
        })
        .collect()
}
