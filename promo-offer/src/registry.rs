use crate::definition::PromoDefinition;
use promo_core::{Clock, SystemClock};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub skipped: usize,
}

/// Known promo offers keyed by action
pub struct PromoRegistry {
    promos: RwLock<HashMap<String, PromoDefinition>>,
    clock: Arc<dyn Clock>,
}

impl PromoRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            promos: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Parse and upsert raw records. A bad record is logged and skipped
    /// without affecting the rest of the batch.
    pub fn load(&self, records: &[Value]) -> LoadSummary {
        let mut summary = LoadSummary::default();

        for (index, record) in records.iter().enumerate() {
            match PromoDefinition::from_record(record) {
                Ok(definition) => {
                    self.upsert(definition);
                    summary.loaded += 1;
                }
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping promo record");
                    summary.skipped += 1;
                }
            }
        }

        tracing::debug!(
            loaded = summary.loaded,
            skipped = summary.skipped,
            "Promo definitions loaded"
        );
        summary
    }

    /// Insert or replace the definition for its action
    pub fn upsert(&self, definition: PromoDefinition) {
        self.write().insert(definition.action.clone(), definition);
    }

    /// Get the promo for `action` if it can currently be shown
    pub fn lookup(&self, action: &str) -> Option<PromoDefinition> {
        self.read()
            .get(action)
            .filter(|d| self.is_available(d))
            .cloned()
    }

    /// Get the stored promo for `action` regardless of eligibility
    pub fn get(&self, action: &str) -> Option<PromoDefinition> {
        self.read().get(action).cloned()
    }

    pub fn is_available(&self, definition: &PromoDefinition) -> bool {
        definition.is_available_at(self.clock.now_millis())
    }

    /// Current time according to the registry's clock
    pub fn now_millis(&self) -> i64 {
        self.clock.now_millis()
    }

    /// Take one use of an eligible promo, returning it after the use
    pub fn claim(&self, action: &str) -> Option<PromoDefinition> {
        let now = self.clock.now_millis();
        let mut promos = self.write();
        let definition = promos.get_mut(action).filter(|d| d.is_available_at(now))?;
        definition.record_use();
        Some(definition.clone())
    }

    /// Take one use of a stored promo without checking eligibility
    pub fn record_use(&self, action: &str) -> Option<PromoDefinition> {
        let mut promos = self.write();
        let definition = promos.get_mut(action)?;
        definition.record_use();
        Some(definition.clone())
    }

    pub fn actions(&self) -> Vec<String> {
        let mut actions: Vec<String> = self.read().keys().cloned().collect();
        actions.sort();
        actions
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, PromoDefinition>> {
        self.promos.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, PromoDefinition>> {
        self.promos.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for PromoRegistry {
    fn default() -> Self {
        Self::new()
    }
}
