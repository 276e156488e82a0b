//! Background reload of the embedding store from the source tables
//!
//! A fixed-interval poll compares the two source files' modification
//! times; on change it re-reads both tables, re-encodes every current
//! row, persists the artifacts, and swaps the served snapshot. A failed
//! cycle leaves the previous snapshot and on-disk state authoritative
//! and is retried on the next tick with no backoff.

use chrono::{DateTime, Utc};
use scholarlink_common::{AppConfig, Result, ScholarlinkError};
use scholarlink_encoder::TextEncoder;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use crate::artifacts;
use crate::normalize::normalize_interests;
use crate::store::EmbeddingStore;
use crate::types::{Collection, EmbeddingSnapshot};

/// Identifier column of the student source table
pub const STUDENT_ID_COLUMN: &str = "Student GUID";

/// Identifier column of the professor source table
pub const PROFESSOR_ID_COLUMN: &str = "Professor GUID";

/// Free-text interest column, shared by both tables
pub const INTERESTS_COLUMN: &str = "Research Interests";

/// Per-source modification instants, compared as a pair so two different
/// timestamp combinations can never collide the way a sum can
type Watermark = (SystemTime, SystemTime);

/// Observable state of the reload loop
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReloadStatus {
    /// When the loop last polled the sources
    pub last_checked: Option<DateTime<Utc>>,

    /// When a rebuilt snapshot was last installed
    pub last_reloaded: Option<DateTime<Utc>>,

    /// Completed poll cycles
    pub cycles: u64,

    /// Error from the most recent cycle, cleared on success
    pub last_error: Option<String>,
}

/// One source table reduced to parallel identifier/interest lists
struct SourceTable {
    ids: Vec<String>,
    interests: Vec<String>,
}

/// Polls the source tables and rebuilds the embedding store
pub struct Reloader {
    students_csv: PathBuf,
    professors_csv: PathBuf,
    artifacts_dir: PathBuf,
    interval: Duration,
    encoder: Arc<dyn TextEncoder>,
    store: Arc<EmbeddingStore>,
    status: Arc<RwLock<ReloadStatus>>,
    last_watermark: Option<Watermark>,
}

impl Reloader {
    /// Create a reloader bound to an encoder and a store
    pub fn new(
        config: &AppConfig,
        encoder: Arc<dyn TextEncoder>,
        store: Arc<EmbeddingStore>,
    ) -> Self {
        Self {
            students_csv: config.students_csv.clone(),
            professors_csv: config.professors_csv.clone(),
            artifacts_dir: config.artifacts_dir.clone(),
            interval: Duration::from_secs(config.reload_interval_secs),
            encoder,
            store,
            status: Arc::new(RwLock::new(ReloadStatus::default())),
            last_watermark: None,
        }
    }

    /// Shared handle to the loop's observable status
    pub fn status_handle(&self) -> Arc<RwLock<ReloadStatus>> {
        self.status.clone()
    }

    /// Current modification-time pair of the two source files
    fn watermark(&self) -> Result<Watermark> {
        Ok((
            file_modified(&self.students_csv)?,
            file_modified(&self.professors_csv)?,
        ))
    }

    /// Run one poll cycle; returns whether a new snapshot was installed
    ///
    /// The watermark is only recorded after a fully successful rebuild,
    /// so a failed cycle is retried unconditionally on the next tick.
    pub async fn run_cycle(&mut self) -> Result<bool> {
        {
            let mut status = self.status.write().await;
            status.last_checked = Some(Utc::now());
            status.cycles += 1;
        }

        let watermark = self.watermark()?;
        if self.last_watermark == Some(watermark) {
            debug!("Source tables unchanged; skipping rebuild");
            return Ok(false);
        }

        info!("Source tables updated. Rebuilding embeddings...");
        let snapshot = self.rebuild().await?;

        artifacts::save_snapshot(&self.artifacts_dir, &snapshot).await?;
        self.store.swap(snapshot).await;
        self.last_watermark = Some(watermark);

        let mut status = self.status.write().await;
        status.last_reloaded = Some(Utc::now());
        status.last_error = None;
        Ok(true)
    }

    /// Read both tables, encode every current row, and build a snapshot
    async fn rebuild(&self) -> Result<EmbeddingSnapshot> {
        let students = load_source(&self.students_csv, STUDENT_ID_COLUMN)?;
        let professors = load_source(&self.professors_csv, PROFESSOR_ID_COLUMN)?;

        info!(
            "Encoding {} student and {} professor interest rows",
            students.ids.len(),
            professors.ids.len()
        );

        let student_vectors = self.encoder.encode_batch(&students.interests).await?;
        let professor_vectors = self.encoder.encode_batch(&professors.interests).await?;

        let students = Collection::from_rows(students.ids, student_vectors)?;
        let professors = Collection::from_rows(professors.ids, professor_vectors)?;

        EmbeddingSnapshot::new(students, professors)
    }

    /// Poll forever at the configured interval
    ///
    /// Each cycle runs to completion before the next tick is honored, so
    /// a reload is never concurrent with itself.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        info!(
            "Reload loop started: polling every {:?} ({} / {})",
            self.interval,
            self.students_csv.display(),
            self.professors_csv.display()
        );

        loop {
            ticker.tick().await;

            match self.run_cycle().await {
                Ok(true) => info!("Embedding snapshot reloaded"),
                Ok(false) => {}
                Err(e) => {
                    error!("Reload cycle failed: {}. Previous snapshot keeps serving", e);
                    self.status.write().await.last_error = Some(e.to_string());
                }
            }
        }
    }
}

/// Modification instant of one source file
fn file_modified(path: &Path) -> Result<SystemTime> {
    Ok(std::fs::metadata(path)?.modified()?)
}

/// Parse one source table, normalizing the interest text of every row
fn load_source(path: &Path, id_column: &str) -> Result<SourceTable> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let id_index = headers
        .iter()
        .position(|h| h == id_column)
        .ok_or_else(|| {
            ScholarlinkError::schema(format!(
                "Column '{}' missing from {}",
                id_column,
                path.display()
            ))
        })?;
    let interests_index = headers
        .iter()
        .position(|h| h == INTERESTS_COLUMN)
        .ok_or_else(|| {
            ScholarlinkError::schema(format!(
                "Column '{}' missing from {}",
                INTERESTS_COLUMN,
                path.display()
            ))
        })?;

    let mut ids = Vec::new();
    let mut interests = Vec::new();

    for record in reader.records() {
        let record = record?;
        let id = record.get(id_index).ok_or_else(|| {
            ScholarlinkError::schema(format!("Row missing '{}' in {}", id_column, path.display()))
        })?;
        let raw_interests = record.get(interests_index).unwrap_or("");

        ids.push(id.to_string());
        interests.push(normalize_interests(raw_interests));
    }

    Ok(SourceTable { ids, interests })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic encoder: one-hot vector keyed by a text hash
    struct MockEncoder {
        dim: usize,
        calls: AtomicUsize,
    }

    impl MockEncoder {
        fn new(dim: usize) -> Self {
            Self {
                dim,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TextEncoder for MockEncoder {
        async fn encode_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|text| {
                    let hash = text
                        .bytes()
                        .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize));
                    let mut vector = vec![0.0; self.dim];
                    vector[hash % self.dim] = 1.0;
                    vector
                })
                .collect())
        }

        async fn test_connection(&self) -> Result<bool> {
            Ok(true)
        }
    }

    /// Encoder that always fails, for abandoned-cycle tests
    struct FailingEncoder;

    #[async_trait]
    impl TextEncoder for FailingEncoder {
        async fn encode_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(ScholarlinkError::encoding("model unavailable"))
        }

        async fn test_connection(&self) -> Result<bool> {
            Ok(false)
        }
    }

    fn write_sources(dir: &Path, student_rows: &[(&str, &str)], professor_rows: &[(&str, &str)]) {
        let mut students = format!("{},{}\n", STUDENT_ID_COLUMN, INTERESTS_COLUMN);
        for (id, interests) in student_rows {
            students.push_str(&format!("{},\"{}\"\n", id, interests));
        }
        std::fs::write(dir.join("students.csv"), students).unwrap();

        let mut professors = format!("{},{}\n", PROFESSOR_ID_COLUMN, INTERESTS_COLUMN);
        for (id, interests) in professor_rows {
            professors.push_str(&format!("{},\"{}\"\n", id, interests));
        }
        std::fs::write(dir.join("professors.csv"), professors).unwrap();
    }

    fn test_config(dir: &Path) -> AppConfig {
        AppConfig {
            data_dir: dir.to_path_buf(),
            students_csv: dir.join("students.csv"),
            professors_csv: dir.join("professors.csv"),
            artifacts_dir: dir.join("recommender_data"),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn test_first_cycle_builds_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(
            dir.path(),
            &[("S1", "machine learning, robotics"), ("S2", "databases")],
            &[("P1", "robotics")],
        );

        let store = Arc::new(EmbeddingStore::empty());
        let mut reloader = Reloader::new(
            &test_config(dir.path()),
            Arc::new(MockEncoder::new(8)),
            store.clone(),
        );

        assert!(reloader.run_cycle().await.unwrap());

        let snapshot = store.current().await;
        assert_eq!(snapshot.students().len(), 2);
        assert_eq!(snapshot.professors().len(), 1);
        assert_eq!(snapshot.dim(), 8);

        // Artifacts were persisted alongside the swap
        let reloaded = artifacts::load_snapshot(&dir.path().join("recommender_data"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reloaded.students().ids(), snapshot.students().ids());
    }

    #[tokio::test]
    async fn test_unchanged_sources_are_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), &[("S1", "nlp")], &[("P1", "nlp")]);

        let store = Arc::new(EmbeddingStore::empty());
        let encoder = Arc::new(MockEncoder::new(4));
        let mut reloader = Reloader::new(&test_config(dir.path()), encoder.clone(), store.clone());

        assert!(reloader.run_cycle().await.unwrap());
        let first = store.current().await;

        // Second poll without a source change must not touch the snapshot
        assert!(!reloader.run_cycle().await.unwrap());
        assert!(Arc::ptr_eq(&first, &store.current().await));
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2); // one per table, first cycle only
    }

    #[tokio::test]
    async fn test_repeated_reloads_never_grow_the_store() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), &[("S1", "nlp"), ("S2", "vision")], &[("P1", "nlp")]);

        let store = Arc::new(EmbeddingStore::empty());
        let mut reloader = Reloader::new(
            &test_config(dir.path()),
            Arc::new(MockEncoder::new(4)),
            store.clone(),
        );

        reloader.run_cycle().await.unwrap();
        assert_eq!(store.current().await.students().len(), 2);

        // Touch the files until the watermark actually moves, so coarse
        // filesystem timestamp granularity cannot mask the rewrite
        let before = file_modified(&dir.path().join("students.csv")).unwrap();
        loop {
            std::thread::sleep(Duration::from_millis(20));
            write_sources(dir.path(), &[("S1", "nlp"), ("S2", "vision")], &[("P1", "nlp")]);
            if file_modified(&dir.path().join("students.csv")).unwrap() != before {
                break;
            }
        }

        assert!(reloader.run_cycle().await.unwrap());
        assert_eq!(store.current().await.students().len(), 2);
        assert_eq!(store.current().await.professors().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_cycle_leaves_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        write_sources(dir.path(), &[("S1", "nlp")], &[("P1", "nlp")]);

        let store = Arc::new(EmbeddingStore::empty());
        let config = test_config(dir.path());

        let mut good = Reloader::new(&config, Arc::new(MockEncoder::new(4)), store.clone());
        good.run_cycle().await.unwrap();
        let served = store.current().await;

        // A fresh reloader sees a changed watermark but its encoder fails
        let mut bad = Reloader::new(&config, Arc::new(FailingEncoder), store.clone());
        assert!(bad.run_cycle().await.is_err());
        assert!(Arc::ptr_eq(&served, &store.current().await));

        // Failure did not record the watermark: the next cycle retries
        assert!(bad.last_watermark.is_none());
    }

    #[tokio::test]
    async fn test_missing_source_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        // No CSVs written

        let store = Arc::new(EmbeddingStore::empty());
        let mut reloader = Reloader::new(
            &test_config(dir.path()),
            Arc::new(MockEncoder::new(4)),
            store.clone(),
        );

        assert!(reloader.run_cycle().await.is_err());
        assert_eq!(store.current().await.students().len(), 0);
    }

    #[tokio::test]
    async fn test_interest_text_is_normalized_before_encoding() {
        let dir = tempfile::tempdir().unwrap();
        // Same interest set, different spacing/order/duplication
        write_sources(
            dir.path(),
            &[("S1", "robotics, nlp , nlp"), ("S2", "nlp,robotics")],
            &[("P1", "x")],
        );

        let store = Arc::new(EmbeddingStore::empty());
        let mut reloader = Reloader::new(
            &test_config(dir.path()),
            Arc::new(MockEncoder::new(16)),
            store.clone(),
        );
        reloader.run_cycle().await.unwrap();

        // Identical normalized text encodes to identical vectors
        let snapshot = store.current().await;
        assert_eq!(
            snapshot.students().row(0).to_vec(),
            snapshot.students().row(1).to_vec()
        );
    }

    #[test]
    fn test_load_source_rejects_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("students.csv");
        std::fs::write(&path, "Wrong Column,Research Interests\nS1,nlp\n").unwrap();

        let result = load_source(&path, STUDENT_ID_COLUMN);
        assert!(matches!(result, Err(ScholarlinkError::Schema(_))));
    }
}
