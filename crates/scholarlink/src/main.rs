use anyhow::Result;
use clap::{Parser, Subcommand};
use scholarlink_common::{logger, AppConfig};
use scholarlink_encoder::OllamaEncoder;
use scholarlink_engine::{EmbeddingStore, Reloader};
use std::path::PathBuf;
use std::sync::Arc;

/// Find project root by looking for .git directory
fn find_project_root() -> Option<PathBuf> {
    let mut current_dir = std::env::current_dir().ok()?;

    loop {
        if current_dir.join(".git").exists() {
            return Some(current_dir);
        }

        if !current_dir.pop() {
            break;
        }
    }

    None
}

/// Load .env file from project root
fn load_dotenv_from_project_root() {
    if let Some(root) = find_project_root() {
        let env_path = root.join(".env");
        if env_path.exists() {
            dotenv::from_path(&env_path).ok();
        }
    } else {
        // Fallback to default dotenv behavior
        dotenv::dotenv().ok();
    }
}

#[derive(Parser)]
#[command(name = "scholarlink")]
#[command(about = "Scholarlink - research-interest recommendation engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the background reload loop
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Data base path
        #[arg(long)]
        data_dir: Option<String>,
    },

    /// Rebuild embeddings from the source tables once and exit
    Rebuild,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env at project root
    // Note: AppConfig::from_env() also loads .env, but we do it here early
    // to ensure any CLI argument overrides work correctly
    load_dotenv_from_project_root();

    match cli.command {
        Some(Commands::Serve { host, port, data_dir }) => {
            // Override with CLI arguments
            std::env::set_var("SERVER_HOST", &host);
            std::env::set_var("SERVER_PORT", &port.to_string());
            if let Some(dir) = &data_dir {
                std::env::set_var("DATA_DIR", dir);
            }

            // Load config with updated env vars
            let config = AppConfig::from_env()?;

            // Setup logging
            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("Scholarlink starting...");
            tracing::info!("Configuration loaded:");
            tracing::info!("  Host: {}", host);
            tracing::info!("  Port: {}", port);
            tracing::info!("  Students table: {}", config.students_csv.display());
            tracing::info!("  Professors table: {}", config.professors_csv.display());
            tracing::info!("  Artifacts: {}", config.artifacts_dir.display());

            println!("Server listening on http://{}:{}", host, port);

            scholarlink_server::start_server(config).await?;
        }
        Some(Commands::Rebuild) => {
            let config = AppConfig::from_env()?;
            logger::setup_console_logging(&config.log_level)?;

            tracing::info!("One-shot rebuild of embedding artifacts...");

            let encoder = Arc::new(OllamaEncoder::new(
                &config.ollama_base_url,
                &config.embedding_model,
            )?);
            let store = Arc::new(EmbeddingStore::empty());

            let mut reloader = Reloader::new(&config, encoder, store.clone());
            reloader.run_cycle().await?;

            let snapshot = store.current().await;
            tracing::info!(
                "Rebuild complete: {} students, {} professors, dim={}",
                snapshot.students().len(),
                snapshot.professors().len(),
                snapshot.dim()
            );
        }
        None => {
            // Default: start server with default config
            let config = AppConfig::from_env()?;
            logger::setup_logging(&config.log_dir, &config.log_level)?;

            tracing::info!("Scholarlink starting with default configuration...");

            let bind_addr = config.server_bind_address();
            println!("Server listening on http://{}", bind_addr);

            scholarlink_server::start_server(config).await?;
        }
    }

    Ok(())
}
