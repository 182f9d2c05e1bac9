pub mod app_config;
pub mod source;
pub mod telemetry;

pub use app_config::Config;
pub use source::{FileSource, MemorySource};
pub use telemetry::init_tracing;

/// Load configuration and install the tracing subscriber.
pub fn bootstrap() -> Result<Config, StoreError> {
    let config = Config::load()?;
    init_tracing(&config.logging)?;
    tracing::info!(
        definitions_path = ?config.promos.definitions_path,
        load_on_start = config.promos.load_on_start,
        "Promo configuration loaded"
    );
    Ok(config)
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error("Failed to install tracing subscriber: {0}")]
    Tracing(String),
}
