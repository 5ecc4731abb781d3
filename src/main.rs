use std::{path::PathBuf, process::ExitCode};

use colored::Colorize;
use log::{error, info};
use noclip_collab::{Collab, DatabaseError, SqliteDatabase};
use noclip_server::{ConfigError, ServerConfig};
use thiserror::Error;
use tokio::runtime;

mod logging;

#[derive(Debug, Error)]
enum NoclipError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Could not read .env file: {0}")]
    EnvFile(#[from] dotenvy::Error),

    #[error("Could not initialize database: {0}")]
    Database(#[from] DatabaseError),

    #[error("Server stopped: {0}")]
    Server(std::io::Error),

    #[error("Fatal error: {0}")]
    Fatal(String),
}

impl NoclipError {
    fn hint(&self) -> String {
        match self {
            NoclipError::Config(_) => format!(
                "Set {} and check the other NOCLIP_* environment variables.",
                ServerConfig::SECRET_KEY
            ),
            NoclipError::EnvFile(_) => {
                "Fix the offending line in .env, or remove the file and use the environment."
                    .to_string()
            }
            NoclipError::Database(_) => format!(
                "This is a database error. Make sure {} points to a writable SQLite database.",
                ServerConfig::DATABASE_URL
            ),
            NoclipError::Server(_) => format!(
                "Make sure nothing else is listening on the address given by {} and {}.",
                ServerConfig::HOST,
                ServerConfig::PORT
            ),
            NoclipError::Fatal(_) => "This error is fatal, and should not happen.".to_string(),
        }
    }
}

fn run(config: ServerConfig) -> Result<(), NoclipError> {
    info!("Building async runtime...");
    let runtime = runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("noclip-async")
        .build()
        .map_err(|e| NoclipError::Fatal(e.to_string()))?;

    runtime.block_on(async {
        info!("Connecting to database...");
        let database = SqliteDatabase::new(&config.database_url).await?;
        let collab = Collab::new(database);

        info!("Initialized successfully.");

        noclip_server::run_server(&config, collab)
            .await
            .map_err(NoclipError::Server)
    })
}

/// Loads `.env` from the working directory or one of its parents.
/// Variables already set in the environment take precedence.
fn load_env_file() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn main() -> ExitCode {
    let env_file = load_env_file();
    let config = ServerConfig::from_env();
    let debug = config.as_ref().map(|c| c.debug).unwrap_or(false);

    logging::init_logger(debug);

    let result = env_file
        .map_err(NoclipError::from)
        .and_then(|path| {
            if let Some(path) = path {
                info!("Loaded environment from {}", path.display());
            }

            config.map_err(NoclipError::from)
        })
        .and_then(run);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(
                "{} Read the error below to troubleshoot the issue.",
                "noclipd failed to start!".bold().red()
            );
            error!("{}", error);
            error!("{}", format!("Hint: {}", error.hint()).dimmed().italic());

            ExitCode::FAILURE
        }
    }
}
