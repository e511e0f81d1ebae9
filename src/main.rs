use crate::config::AppConfig;
use crate::router::respond;
use crate::state::AppState;
use astra::Server;
use std::sync::Arc;
use tracing::{error, info};

mod chat;
mod config;
mod dataset;
mod db;
mod diff;
mod domain;
mod errors;
mod logging;
mod responses;
mod retrieval;
mod router;
mod speech;
mod state;

#[cfg(test)]
mod tests;

fn main() {
    if let Err(e) = logging::init_logging() {
        eprintln!("Logging setup failed: {e}");
    }

    // 1️⃣ Read configuration
    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration failed: {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Load and validate the dataset before anything is served
    let state = match AppState::from_config(&cfg) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!("Dataset load failed: {e}");
            std::process::exit(1);
        }
    };

    if !state.answerer.is_configured() {
        info!("GEMINI_API_KEY not set; chat answers use the offline fallback");
    }

    // 3️⃣ Start the server
    info!(addr = %cfg.bind_addr, workers = cfg.max_workers, "starting server");
    let server = Server::bind(&cfg.bind_addr).max_workers(cfg.max_workers);

    // 4️⃣ Serve requests, every worker shares the same immutable state
    let result = server.serve(move |req, _info| respond(req, &state));

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
