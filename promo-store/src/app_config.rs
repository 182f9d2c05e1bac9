use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub logging: LoggingConfig,
    pub promos: PromoSourceConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    #[serde(default = "default_filter")]
    pub filter: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PromoSourceConfig {
    /// JSON file holding promo records, used in place of session data
    pub definitions_path: Option<PathBuf>,
    #[serde(default)]
    pub load_on_start: bool,
}

fn default_filter() -> String {
    "promo_display=info,promo_offer=info,promo_store=info".to_string()
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::builder()?
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // PROMO__PROMOS__DEFINITIONS_PATH=... sets promos.definitions_path
            .add_source(config::Environment::with_prefix("PROMO").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Load from one explicit file on top of the built-in defaults
    pub fn from_file(path: &Path) -> Result<Self, config::ConfigError> {
        Self::builder()?
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()
    }

    fn builder(
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("logging.filter", default_filter())?
            .set_default("promos.load_on_start", false)
    }
}
