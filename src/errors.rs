use astra::Response;
// errors.rs
use crate::domain::overview::OverviewError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, validation) or downstream layers
/// (SQLite dataset, Gemini, ElevenLabs).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Validation(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Schema Error: {0}")]
    Schema(String),
    #[error("Config Error: {0}")]
    Config(String),
    #[error("Upstream Error: {0}")]
    Upstream(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl ServerError {
    pub fn not_found(what: &str) -> Self {
        ServerError::NotFound(format!("{what} not found"))
    }

    pub fn status(&self) -> u16 {
        match self {
            ServerError::NotFound(_) => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Validation(_) => 422,
            ServerError::Upstream(_) => 502,
            ServerError::DbError(_)
            | ServerError::Schema(_)
            | ServerError::Config(_)
            | ServerError::InternalError => 500,
        }
    }
}

impl From<OverviewError> for ServerError {
    fn from(e: OverviewError) -> Self {
        match e {
            OverviewError::EmptyBundle => ServerError::not_found("bundle"),
        }
    }
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
