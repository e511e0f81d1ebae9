use std::sync::OnceLock;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::ServerError;

static LOGGER_INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_LOG_DIRECTIVES: &str = "info,planning_repo=info";

/// Install the global subscriber once. `RUST_LOG` wins over the defaults.
pub fn init_logging() -> Result<(), ServerError> {
    if LOGGER_INIT.get().is_some() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_DIRECTIVES))
        .map_err(|err| ServerError::Config(format!("invalid log directives: {err}")))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .map_err(|err| ServerError::Config(format!("logger already installed: {err}")))?;

    let _ = LOGGER_INIT.set(());
    Ok(())
}
