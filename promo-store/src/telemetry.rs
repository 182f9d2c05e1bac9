use crate::app_config::LoggingConfig;
use crate::StoreError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber. `RUST_LOG` wins over the
/// configured filter.
pub fn init_tracing(logging: &LoggingConfig) -> Result<(), StoreError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into()))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| StoreError::Tracing(e.to_string()))
}
