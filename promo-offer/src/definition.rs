use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `uses_remaining` value for a promo that can be shown any number of times.
pub const UNLIMITED_USES: i32 = -1;

const DEFAULT_USES: i32 = 1;

const KEY_ID: &str = "app_promo_id";
const KEY_ACTION: &str = "app_promo_action";
const KEY_USES: &str = "num_of_use";
const KEY_EXPIRY: &str = "expiry";
const KEY_CONTENT: &str = "promo_view_url";

/// A promotional view offer bound to a trigger action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromoDefinition {
    pub id: String,
    pub action: String,
    pub uses_remaining: i32,
    pub expiry_epoch_millis: i64,
    pub content_reference: String,
}

impl PromoDefinition {
    /// Create a definition for `action` with every other field defaulted
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            action: action.into(),
            uses_remaining: DEFAULT_USES,
            expiry_epoch_millis: 0,
            content_reference: String::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_uses(mut self, uses_remaining: i32) -> Self {
        self.uses_remaining = uses_remaining;
        self
    }

    pub fn with_expiry(mut self, expiry_epoch_millis: i64) -> Self {
        self.expiry_epoch_millis = expiry_epoch_millis;
        self
    }

    pub fn with_content(mut self, content_reference: impl Into<String>) -> Self {
        self.content_reference = content_reference.into();
        self
    }

    /// Parse a raw session record.
    ///
    /// Only a non-object record or a missing action rejects the record. Any
    /// other missing or mistyped field keeps its default.
    pub fn from_record(record: &Value) -> Result<Self, OfferError> {
        let fields = record
            .as_object()
            .ok_or_else(|| OfferError::NotAnObject(json_type(record)))?;

        let action = string_field(fields, KEY_ACTION).unwrap_or_default();
        if action.is_empty() {
            return Err(OfferError::MissingAction);
        }

        let mut definition = PromoDefinition::new(action);
        if let Some(id) = string_field(fields, KEY_ID) {
            definition.id = id;
        }
        if let Some(uses) = integer_field(fields, KEY_USES) {
            match i32::try_from(uses) {
                Ok(uses) => definition.uses_remaining = uses,
                Err(_) => tracing::debug!(
                    key = KEY_USES,
                    value = uses,
                    "Use count out of range, keeping default"
                ),
            }
        }
        if let Some(expiry) = integer_field(fields, KEY_EXPIRY) {
            definition.expiry_epoch_millis = expiry;
        }
        if let Some(content) = string_field(fields, KEY_CONTENT) {
            definition.content_reference = content;
        }

        Ok(definition)
    }

    pub fn is_unlimited(&self) -> bool {
        self.uses_remaining == UNLIMITED_USES
    }

    /// Check whether the promo may be shown at `now_millis`.
    ///
    /// The expiry test is `now > expiry`: a promo with the default expiry of
    /// zero always passes, a promo whose expiry lies in the future does not.
    pub fn is_available_at(&self, now_millis: i64) -> bool {
        now_millis > self.expiry_epoch_millis
            && (self.uses_remaining > 0 || self.uses_remaining == UNLIMITED_USES)
    }

    /// Consume one use. Unlimited and exhausted promos are left unchanged.
    pub fn record_use(&mut self) {
        if self.uses_remaining > 0 {
            self.uses_remaining -= 1;
        }
    }
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => {
            tracing::debug!(key, found = json_type(other), "Ignoring non-string promo field");
            None
        }
    }
}

fn integer_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    let parsed = match fields.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    };

    if parsed.is_none() {
        tracing::debug!(key, "Ignoring non-integer promo field");
    }
    parsed
}

fn truncate(value: f64) -> Option<i64> {
    if value.is_finite() && value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value.trunc() as i64)
    } else {
        None
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfferError {
    #[error("Promo record must be an object, found {0}")]
    NotAnObject(&'static str),

    #[error("Promo record has no action")]
    MissingAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_use_defaults() {
        let definition = PromoDefinition::from_record(&json!({
            "app_promo_action": "open_offer"
        }))
        .unwrap();

        assert_eq!(definition.id, "");
        assert_eq!(definition.action, "open_offer");
        assert_eq!(definition.uses_remaining, 1);
        assert_eq!(definition.expiry_epoch_millis, 0);
        assert_eq!(definition.content_reference, "");
    }

    #[test]
    fn test_full_record() {
        let definition = PromoDefinition::from_record(&json!({
            "app_promo_id": "promo-42",
            "app_promo_action": "install_offer",
            "num_of_use": -1,
            "expiry": 1_700_000_000_000_i64,
            "promo_view_url": "https://example.com/promo"
        }))
        .unwrap();

        assert_eq!(definition.id, "promo-42");
        assert!(definition.is_unlimited());
        assert_eq!(definition.expiry_epoch_millis, 1_700_000_000_000);
        assert_eq!(definition.content_reference, "https://example.com/promo");
    }

    #[test]
    fn test_malformed_field_keeps_other_fields() {
        let definition = PromoDefinition::from_record(&json!({
            "app_promo_id": {"nested": true},
            "app_promo_action": "open_offer",
            "num_of_use": "lots",
            "expiry": null,
            "promo_view_url": "https://example.com/p"
        }))
        .unwrap();

        assert_eq!(definition.id, "");
        assert_eq!(definition.uses_remaining, 1);
        assert_eq!(definition.expiry_epoch_millis, 0);
        assert_eq!(definition.content_reference, "https://example.com/p");
    }

    #[test]
    fn test_numeric_coercion() {
        let definition = PromoDefinition::from_record(&json!({
            "app_promo_id": 77,
            "app_promo_action": "open_offer",
            "num_of_use": "3",
            "expiry": 12.9
        }))
        .unwrap();

        assert_eq!(definition.id, "77");
        assert_eq!(definition.uses_remaining, 3);
        assert_eq!(definition.expiry_epoch_millis, 12);
    }

    #[test]
    fn test_out_of_range_uses_falls_back() {
        let definition = PromoDefinition::from_record(&json!({
            "app_promo_action": "open_offer",
            "num_of_use": 10_000_000_000_i64
        }))
        .unwrap();

        assert_eq!(definition.uses_remaining, 1);
    }

    #[test]
    fn test_invalid_records() {
        assert_eq!(
            PromoDefinition::from_record(&json!(["open_offer"])),
            Err(OfferError::NotAnObject("array"))
        );
        assert_eq!(
            PromoDefinition::from_record(&json!({"num_of_use": 2})),
            Err(OfferError::MissingAction)
        );
        assert_eq!(
            PromoDefinition::from_record(&json!({"app_promo_action": ""})),
            Err(OfferError::MissingAction)
        );
    }

    #[test]
    fn test_availability() {
        let now = 1_700_000_000_000;

        assert!(PromoDefinition::new("a").is_available_at(now));
        assert!(PromoDefinition::new("a").with_uses(UNLIMITED_USES).is_available_at(now));
        assert!(!PromoDefinition::new("a").with_uses(0).is_available_at(now));
        assert!(!PromoDefinition::new("a").with_uses(-5).is_available_at(now));

        // Expiry comparison is `now > expiry`
        assert!(PromoDefinition::new("a").with_expiry(now - 1).is_available_at(now));
        assert!(!PromoDefinition::new("a").with_expiry(now).is_available_at(now));
        assert!(!PromoDefinition::new("a").with_expiry(now + 60_000).is_available_at(now));
    }

    #[test]
    fn test_record_use() {
        let mut limited = PromoDefinition::new("a").with_uses(2);
        limited.record_use();
        assert_eq!(limited.uses_remaining, 1);
        limited.record_use();
        limited.record_use();
        assert_eq!(limited.uses_remaining, 0);

        let mut unlimited = PromoDefinition::new("a").with_uses(UNLIMITED_USES);
        unlimited.record_use();
        assert_eq!(unlimited.uses_remaining, UNLIMITED_USES);
    }
}
