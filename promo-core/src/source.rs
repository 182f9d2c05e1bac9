use async_trait::async_trait;
use crate::PromoResult;

/// Supplies raw promo definition records, e.g. from the session response.
///
/// Records are loosely typed; the registry parses and validates them.
#[async_trait]
pub trait PromoSource: Send + Sync {
    async fn fetch_definitions(&self) -> PromoResult<Vec<serde_json::Value>>;
}
