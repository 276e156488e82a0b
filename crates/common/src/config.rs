use crate::error::ScholarlinkError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scholarlink application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Data base path
    pub data_dir: PathBuf,

    /// Student source table (CSV)
    pub students_csv: PathBuf,

    /// Professor source table (CSV)
    pub professors_csv: PathBuf,

    /// Directory for persisted embedding artifacts
    pub artifacts_dir: PathBuf,

    /// Ollama API base URL
    pub ollama_base_url: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Reload poll interval in seconds
    pub reload_interval_secs: u64,

    /// Server bind address
    pub server_host: String,

    /// Server port
    pub server_port: u16,

    /// Log directory
    pub log_dir: PathBuf,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            students_csv: PathBuf::from("./data/raw/students.csv"),
            professors_csv: PathBuf::from("./data/raw/professors.csv"),
            artifacts_dir: PathBuf::from("./data/recommender_data"),
            ollama_base_url: "http://localhost:11434".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            reload_interval_secs: 5,
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            log_dir: PathBuf::from("./data/log"),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self, ScholarlinkError> {
        // Load .env file (ignore if not exists)
        let _ = dotenv::dotenv();

        let config = Self {
            data_dir: Self::get_env_path("DATA_DIR")
                .unwrap_or_else(|| PathBuf::from("./data")),
            students_csv: Self::get_env_path("STUDENTS_CSV")
                .unwrap_or_else(|| PathBuf::from("./data/raw/students.csv")),
            professors_csv: Self::get_env_path("PROFESSORS_CSV")
                .unwrap_or_else(|| PathBuf::from("./data/raw/professors.csv")),
            artifacts_dir: Self::get_env_path("ARTIFACTS_DIR")
                .unwrap_or_else(|| PathBuf::from("./data/recommender_data")),
            ollama_base_url: std::env::var("OLLAMA_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "nomic-embed-text".to_string()),
            reload_interval_secs: std::env::var("RELOAD_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            server_host: std::env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            log_dir: Self::get_env_path("LOG_DIR")
                .unwrap_or_else(|| PathBuf::from("./data/log")),
            log_level: std::env::var("LOG_LEVEL")
                .unwrap_or_else(|_| "info".to_string()),
        };

        // Ensure required directories exist
        config.ensure_directories()?;

        Ok(config)
    }

    /// Get PathBuf from environment variable
    fn get_env_path(key: &str) -> Option<PathBuf> {
        std::env::var(key).ok().map(PathBuf::from)
    }

    /// Ensure required directories exist, create if not
    pub fn ensure_directories(&self) -> Result<(), ScholarlinkError> {
        let dirs = vec![
            &self.data_dir,
            &self.artifacts_dir,
            &self.log_dir,
        ];

        for dir in dirs {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    ScholarlinkError::config(format!(
                        "Failed to create directory {}: {}",
                        dir.display(),
                        e
                    ))
                })?;
            }
        }

        Ok(())
    }

    /// Get full path for a persisted artifact file
    pub fn artifact_path(&self, filename: &str) -> PathBuf {
        self.artifacts_dir.join(filename)
    }

    /// Get server bind address (host:port)
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ScholarlinkError> {
        // Validate embedding model name
        if self.embedding_model.is_empty() {
            return Err(ScholarlinkError::config(
                "Embedding model name cannot be empty",
            ));
        }

        // Validate Ollama URL
        if !self.ollama_base_url.starts_with("http://")
            && !self.ollama_base_url.starts_with("https://") {
            return Err(ScholarlinkError::config(
                "Ollama base URL must start with http:// or https://"
            ));
        }

        // Validate poll interval
        if self.reload_interval_secs == 0 {
            return Err(ScholarlinkError::config(
                "Reload interval cannot be 0",
            ));
        }

        // Validate port range
        if self.server_port == 0 {
            return Err(ScholarlinkError::config("Server port cannot be 0"));
        }

        Ok(())
    }
}
