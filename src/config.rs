// src/config.rs
use crate::errors::ServerError;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "data/planning.sqlite3";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_WORKERS: usize = 8;
pub const DEFAULT_CORS_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_key: String,
    pub voice_id: String,
    pub model_id: String,
    pub base_url: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            voice_id: String::new(),
            model_id: "eleven_multilingual_v2".to_string(),
            base_url: "https://api.elevenlabs.io".to_string(),
        }
    }
}

/// Process configuration. Everything is optional; defaults match a local
/// dev setup with the frontend on port 3000.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub cors_origins: Vec<String>,
    pub gemini: GeminiConfig,
    pub speech: SpeechConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            max_workers: DEFAULT_MAX_WORKERS,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            gemini: GeminiConfig::default(),
            speech: SpeechConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut cfg = AppConfig::default();

        if let Some(path) = get("PLANNING_DB_PATH") {
            cfg.db_path = PathBuf::from(path);
        }

        let bind = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        cfg.bind_addr = bind
            .parse()
            .map_err(|e| ServerError::Config(format!("invalid BIND_ADDR '{bind}': {e}")))?;

        if let Some(raw) = get("MAX_WORKERS") {
            cfg.max_workers = raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ServerError::Config(format!("invalid MAX_WORKERS '{raw}'")))?;
        }

        if let Some(raw) = get("CORS_ORIGINS") {
            cfg.cors_origins = raw
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(key) = get("GEMINI_API_KEY") {
            cfg.gemini.api_key = key;
        }
        if let Some(model) = get("GEMINI_MODEL") {
            cfg.gemini.model = model;
        }
        if let Some(base) = get("GEMINI_BASE_URL") {
            cfg.gemini.base_url = base.trim_end_matches('/').to_string();
        }

        if let Some(key) = get("ELEVEN_API_KEY") {
            cfg.speech.api_key = key;
        }
        if let Some(voice) = get("ELEVEN_VOICE_ID") {
            cfg.speech.voice_id = voice;
        }
        if let Some(model) = get("ELEVEN_MODEL_ID") {
            cfg.speech.model_id = model;
        }
        if let Some(base) = get("ELEVEN_BASE_URL") {
            cfg.speech.base_url = base.trim_end_matches('/').to_string();
        }

        Ok(cfg)
    }
}
