use scholarlink_common::{Result, ScholarlinkError};
use std::sync::Arc;

use crate::similarity;
use crate::store::EmbeddingStore;
use crate::types::{Collection, Recommendation};

/// The four symmetric recommendation operations over the current snapshot
///
/// Each call binds to one snapshot reference for its whole duration, so a
/// swap landing mid-call never mixes old and new data. An unknown
/// identifier is a `NotFound` error here; the HTTP boundary downgrades it
/// to an empty result list.
pub struct Recommender {
    store: Arc<EmbeddingStore>,
}

impl Recommender {
    /// Create a recommender over a store
    pub fn new(store: Arc<EmbeddingStore>) -> Self {
        Self { store }
    }

    /// Recommend professors for a student
    pub async fn recommend_professors(
        &self,
        student_id: &str,
        top_n: usize,
        threshold: f32,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.store.current().await;
        recommend(snapshot.students(), snapshot.professors(), student_id, top_n, threshold)
    }

    /// Recommend students for a professor
    pub async fn recommend_students(
        &self,
        professor_id: &str,
        top_n: usize,
        threshold: f32,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.store.current().await;
        recommend(snapshot.professors(), snapshot.students(), professor_id, top_n, threshold)
    }

    /// Recommend students with similar interests to a student
    ///
    /// The query entity is itself a candidate and, with a threshold below
    /// 1.0, appears in its own results with a score of ~100.
    pub async fn recommend_students_to_students(
        &self,
        student_id: &str,
        top_n: usize,
        threshold: f32,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.store.current().await;
        recommend(snapshot.students(), snapshot.students(), student_id, top_n, threshold)
    }

    /// Recommend professors with similar interests to a professor
    pub async fn recommend_professors_to_professors(
        &self,
        professor_id: &str,
        top_n: usize,
        threshold: f32,
    ) -> Result<Vec<Recommendation>> {
        let snapshot = self.store.current().await;
        recommend(snapshot.professors(), snapshot.professors(), professor_id, top_n, threshold)
    }
}

/// Resolve the query identifier in its owning collection and rank the target
fn recommend(
    source: &Collection,
    target: &Collection,
    id: &str,
    top_n: usize,
    threshold: f32,
) -> Result<Vec<Recommendation>> {
    let index = source
        .index_of(id)
        .ok_or_else(|| ScholarlinkError::not_found(format!("Identifier '{}' not in collection", id)))?;

    Ok(similarity::search(source.row(index), target, top_n, threshold))
}
