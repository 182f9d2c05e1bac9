use crate::app_config::PromoSourceConfig;
use async_trait::async_trait;
use promo_core::{PromoError, PromoResult, PromoSource};
use serde_json::Value;
use std::path::PathBuf;

const PROMO_VIEWS_KEY: &str = "promo_views";

/// Reads promo records from a JSON file.
///
/// The file holds either an array of records or an object with a
/// `promo_views` array, the shape of the session payload.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The source to load at startup, if the configuration asks for one
    pub fn from_config(config: &PromoSourceConfig) -> Option<Self> {
        match (&config.definitions_path, config.load_on_start) {
            (Some(path), true) => Some(Self::new(path.clone())),
            _ => None,
        }
    }
}

#[async_trait]
impl PromoSource for FileSource {
    async fn fetch_definitions(&self) -> PromoResult<Vec<Value>> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let document: Value = serde_json::from_str(&raw)?;

        let records = match document {
            Value::Array(records) => records,
            Value::Object(mut fields) => match fields.remove(PROMO_VIEWS_KEY) {
                Some(Value::Array(records)) => records,
                _ => {
                    return Err(PromoError::Source(format!(
                        "{} has no '{}' array",
                        self.path.display(),
                        PROMO_VIEWS_KEY
                    )))
                }
            },
            _ => {
                return Err(PromoError::Source(format!(
                    "{} does not contain promo records",
                    self.path.display()
                )))
            }
        };

        tracing::debug!(path = %self.path.display(), count = records.len(), "Read promo records");
        Ok(records)
    }
}

/// Serves a fixed set of records, e.g. promo data already held by the session.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<Value>,
}

impl MemorySource {
    pub fn new(records: Vec<Value>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl PromoSource for MemorySource {
    async fn fetch_definitions(&self) -> PromoResult<Vec<Value>> {
        Ok(self.records.clone())
    }
}
