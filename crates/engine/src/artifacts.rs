//! Persisted embedding artifacts
//!
//! Two matrix files and two ordered identifier list files, paired 1:1 by
//! row position. Written after every successful rebuild and read back at
//! startup so the engine can serve before the first reload cycle.

use ndarray::Array2;
use scholarlink_common::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::types::{Collection, EmbeddingSnapshot};

pub const STUDENT_EMBEDDINGS_FILE: &str = "student_embeddings.json";
pub const PROFESSOR_EMBEDDINGS_FILE: &str = "professor_embeddings.json";
pub const STUDENT_GUIDS_FILE: &str = "student_guids.json";
pub const PROFESSOR_GUIDS_FILE: &str = "professor_guids.json";

/// Staging path for one artifact file
fn tmp_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.tmp", name))
}

/// Persist all four artifact files for a snapshot
///
/// All four files are staged as temp files before any rename, so a failed
/// save leaves the previous generation fully intact. The files pair by row
/// position; replacing only some of them could mispair ids with vectors.
pub async fn save_snapshot(dir: &Path, snapshot: &EmbeddingSnapshot) -> Result<()> {
    tokio::fs::create_dir_all(dir).await?;

    let files = [
        (
            STUDENT_EMBEDDINGS_FILE,
            serde_json::to_string(snapshot.students().vectors())?,
        ),
        (
            PROFESSOR_EMBEDDINGS_FILE,
            serde_json::to_string(snapshot.professors().vectors())?,
        ),
        (
            STUDENT_GUIDS_FILE,
            serde_json::to_string(snapshot.students().ids())?,
        ),
        (
            PROFESSOR_GUIDS_FILE,
            serde_json::to_string(snapshot.professors().ids())?,
        ),
    ];

    for (name, data) in &files {
        tokio::fs::write(tmp_path(dir, name), data).await?;
    }
    for (name, _) in &files {
        tokio::fs::rename(tmp_path(dir, name), dir.join(name)).await?;
    }

    info!(
        "Saved embedding artifacts to {} ({} students, {} professors)",
        dir.display(),
        snapshot.students().len(),
        snapshot.professors().len()
    );
    Ok(())
}

/// Load a snapshot from persisted artifacts
///
/// Returns `Ok(None)` when any of the four files is missing (nothing has
/// been persisted yet); malformed or mismatched files are an error.
pub async fn load_snapshot(dir: &Path) -> Result<Option<EmbeddingSnapshot>> {
    let student_embeddings_path = dir.join(STUDENT_EMBEDDINGS_FILE);
    let professor_embeddings_path = dir.join(PROFESSOR_EMBEDDINGS_FILE);
    let student_guids_path = dir.join(STUDENT_GUIDS_FILE);
    let professor_guids_path = dir.join(PROFESSOR_GUIDS_FILE);

    let all_present = student_embeddings_path.exists()
        && professor_embeddings_path.exists()
        && student_guids_path.exists()
        && professor_guids_path.exists();
    if !all_present {
        return Ok(None);
    }

    let student_vectors: Array2<f32> =
        serde_json::from_str(&tokio::fs::read_to_string(&student_embeddings_path).await?)?;
    let professor_vectors: Array2<f32> =
        serde_json::from_str(&tokio::fs::read_to_string(&professor_embeddings_path).await?)?;
    let student_ids: Vec<String> =
        serde_json::from_str(&tokio::fs::read_to_string(&student_guids_path).await?)?;
    let professor_ids: Vec<String> =
        serde_json::from_str(&tokio::fs::read_to_string(&professor_guids_path).await?)?;

    let students = Collection::new(student_ids, student_vectors)?;
    let professors = Collection::new(professor_ids, professor_vectors)?;
    let snapshot = EmbeddingSnapshot::new(students, professors)?;

    info!(
        "Loaded embedding artifacts from {} ({} students, {} professors, dim={})",
        dir.display(),
        snapshot.students().len(),
        snapshot.professors().len(),
        snapshot.dim()
    );
    Ok(Some(snapshot))
}
