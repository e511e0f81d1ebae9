// src/state.rs
use crate::chat::Answerer;
use crate::config::AppConfig;
use crate::dataset::PlanningDataset;
use crate::db::connection::Database;
use crate::errors::ServerError;
use crate::speech::SpeechClient;

/// Everything a request handler may touch. Built once before the server
/// binds and shared read-only across worker threads.
pub struct AppState {
    pub dataset: PlanningDataset,
    pub answerer: Answerer,
    pub speech: SpeechClient,
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// Load and validate the dataset, then build the outbound clients.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ServerError> {
        let db = Database::new(&cfg.db_path);
        let dataset = PlanningDataset::load(&db)?;
        Self::with_dataset(dataset, cfg)
    }

    pub fn with_dataset(dataset: PlanningDataset, cfg: &AppConfig) -> Result<Self, ServerError> {
        Ok(Self {
            dataset,
            answerer: Answerer::new(&cfg.gemini)?,
            speech: SpeechClient::new(&cfg.speech)?,
            cors_origins: cfg.cors_origins.clone(),
        })
    }
}
