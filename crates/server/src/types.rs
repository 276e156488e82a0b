use scholarlink_engine::{ReloadStatus, Recommendation};
use serde::{Deserialize, Serialize};

/// Query parameters for student-keyed recommendation routes
#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    /// Student identifier
    pub student_id: String,

    /// Maximum results (default 10)
    pub top_n: Option<usize>,

    /// Similarity threshold, exclusive (default 0.90)
    pub threshold: Option<f32>,
}

/// Query parameters for professor-keyed recommendation routes
#[derive(Debug, Deserialize)]
pub struct ProfessorQuery {
    /// Professor identifier
    pub professor_id: String,

    /// Maximum results (default 10)
    pub top_n: Option<usize>,

    /// Similarity threshold, exclusive (default 0.90)
    pub threshold: Option<f32>,
}

/// Ranked recommendation list for one query identifier
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    /// Identifier the query was keyed on
    pub query_id: String,

    /// Number of results
    pub count: usize,

    /// Ranked results, descending score
    pub results: Vec<Recommendation>,
}

/// Snapshot and reload state for the status route
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Students in the served snapshot
    pub students: usize,

    /// Professors in the served snapshot
    pub professors: usize,

    /// Embedding dimensionality
    pub dim: usize,

    /// Embedding model in use
    pub embedding_model: String,

    /// Reload loop state
    pub reload: ReloadStatus,
}
