use ndarray::{Array2, ArrayView1};
use scholarlink_common::{Result, ScholarlinkError};
use serde::Serialize;

/// Ordered identifier list with its parallel embedding matrix
///
/// Identifier order defines the positional index into the matrix, so the
/// invariant `ids.len() == vectors.nrows()` is enforced at construction and
/// the fields stay private.
#[derive(Debug, Clone)]
pub struct Collection {
    ids: Vec<String>,
    vectors: Array2<f32>,
}

impl Collection {
    /// Create a collection, validating identifier count against row count
    pub fn new(ids: Vec<String>, vectors: Array2<f32>) -> Result<Self> {
        if ids.len() != vectors.nrows() {
            return Err(ScholarlinkError::schema(format!(
                "Identifier count {} does not match embedding row count {}",
                ids.len(),
                vectors.nrows()
            )));
        }
        Ok(Self { ids, vectors })
    }

    /// Build a collection from per-entity embedding rows
    pub fn from_rows(ids: Vec<String>, rows: Vec<Vec<f32>>) -> Result<Self> {
        if ids.len() != rows.len() {
            return Err(ScholarlinkError::schema(format!(
                "Identifier count {} does not match embedding row count {}",
                ids.len(),
                rows.len()
            )));
        }

        let dim = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut flat = Vec::with_capacity(rows.len() * dim);
        for row in &rows {
            if row.len() != dim {
                return Err(ScholarlinkError::schema(format!(
                    "Inconsistent embedding dimension: expected {}, got {}",
                    dim,
                    row.len()
                )));
            }
            flat.extend_from_slice(row);
        }

        let vectors = Array2::from_shape_vec((rows.len(), dim), flat)
            .map_err(|e| ScholarlinkError::schema(format!("Malformed embedding matrix: {}", e)))?;

        Self::new(ids, vectors)
    }

    /// Empty collection (zero rows, zero dimensionality)
    pub fn empty() -> Self {
        Self {
            ids: Vec::new(),
            vectors: Array2::zeros((0, 0)),
        }
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// True when the collection holds no entities
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Embedding dimensionality (0 for an empty collection)
    pub fn dim(&self) -> usize {
        self.vectors.ncols()
    }

    /// Ordered identifiers
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Embedding matrix, one row per identifier
    pub fn vectors(&self) -> &Array2<f32> {
        &self.vectors
    }

    /// Positional index of an identifier, if present
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|g| g == id)
    }

    /// Embedding row at a positional index
    pub fn row(&self, index: usize) -> ArrayView1<'_, f32> {
        self.vectors.row(index)
    }
}

/// Immutable pair of collections served to readers as one unit
///
/// Replaced wholesale by the reloader behind an `Arc`; never mutated in
/// place, so a query binding one snapshot never observes a mixed state.
#[derive(Debug, Clone)]
pub struct EmbeddingSnapshot {
    students: Collection,
    professors: Collection,
    dim: usize,
}

impl EmbeddingSnapshot {
    /// Create a snapshot, validating that both collections agree on
    /// dimensionality (an empty collection is compatible with any)
    pub fn new(students: Collection, professors: Collection) -> Result<Self> {
        let dim = match (students.is_empty(), professors.is_empty()) {
            (false, false) => {
                if students.dim() != professors.dim() {
                    return Err(ScholarlinkError::schema(format!(
                        "Student embedding dimension {} does not match professor embedding dimension {}",
                        students.dim(),
                        professors.dim()
                    )));
                }
                students.dim()
            }
            (false, true) => students.dim(),
            (true, false) => professors.dim(),
            (true, true) => 0,
        };

        Ok(Self {
            students,
            professors,
            dim,
        })
    }

    /// Build a snapshot directly from raw identifier lists and matrices
    ///
    /// Fails with a schema error when either collection's identifier count
    /// disagrees with its row count, or the two dimensionalities differ.
    pub fn load(
        student_ids: Vec<String>,
        student_vectors: Array2<f32>,
        professor_ids: Vec<String>,
        professor_vectors: Array2<f32>,
    ) -> Result<Self> {
        Self::new(
            Collection::new(student_ids, student_vectors)?,
            Collection::new(professor_ids, professor_vectors)?,
        )
    }

    /// Empty snapshot served before the first successful reload
    pub fn empty() -> Self {
        Self {
            students: Collection::empty(),
            professors: Collection::empty(),
            dim: 0,
        }
    }

    /// Student collection
    pub fn students(&self) -> &Collection {
        &self.students
    }

    /// Professor collection
    pub fn professors(&self) -> &Collection {
        &self.professors
    }

    /// Embedding dimensionality shared by both collections
    pub fn dim(&self) -> usize {
        self.dim
    }
}

/// One ranked query result: an identifier and its similarity score
/// scaled to the 0-100 range (never clamped, so a negative cosine
/// yields a negative score)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// Matched identifier
    pub id: String,

    /// Cosine similarity x 100
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_collection_rejects_count_mismatch() {
        let result = Collection::new(
            vec!["S1".to_string()],
            array![[1.0, 0.0], [0.0, 1.0]],
        );
        assert!(matches!(result, Err(ScholarlinkError::Schema(_))));
    }

    #[test]
    fn test_collection_from_rows_rejects_ragged_rows() {
        let result = Collection::from_rows(
            vec!["S1".to_string(), "S2".to_string()],
            vec![vec![1.0, 0.0], vec![0.0]],
        );
        assert!(matches!(result, Err(ScholarlinkError::Schema(_))));
    }

    #[test]
    fn test_collection_index_of() {
        let collection = Collection::from_rows(
            vec!["S1".to_string(), "S2".to_string()],
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
        )
        .unwrap();

        assert_eq!(collection.index_of("S2"), Some(1));
        assert_eq!(collection.index_of("UNKNOWN"), None);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.dim(), 2);
    }

    #[test]
    fn test_snapshot_rejects_dimension_mismatch() {
        let students = Collection::from_rows(
            vec!["S1".to_string()],
            vec![vec![1.0, 0.0]],
        )
        .unwrap();
        let professors = Collection::from_rows(
            vec!["P1".to_string()],
            vec![vec![1.0, 0.0, 0.0]],
        )
        .unwrap();

        let result = EmbeddingSnapshot::new(students, professors);
        assert!(matches!(result, Err(ScholarlinkError::Schema(_))));
    }

    #[test]
    fn test_snapshot_load_from_raw_parts() {
        let snapshot = EmbeddingSnapshot::load(
            vec!["S1".to_string()],
            array![[1.0, 0.0]],
            vec!["P1".to_string()],
            array![[0.0, 1.0]],
        )
        .unwrap();
        assert_eq!(snapshot.dim(), 2);

        let result = EmbeddingSnapshot::load(
            vec!["S1".to_string(), "S2".to_string()],
            array![[1.0, 0.0]],
            vec!["P1".to_string()],
            array![[0.0, 1.0]],
        );
        assert!(matches!(result, Err(ScholarlinkError::Schema(_))));
    }

    #[test]
    fn test_snapshot_allows_empty_side() {
        let students = Collection::from_rows(
            vec!["S1".to_string()],
            vec![vec![1.0, 0.0, 0.0]],
        )
        .unwrap();

        let snapshot = EmbeddingSnapshot::new(students, Collection::empty()).unwrap();
        assert_eq!(snapshot.dim(), 3);
        assert!(snapshot.professors().is_empty());
    }
}
