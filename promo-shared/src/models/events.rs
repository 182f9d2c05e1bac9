use uuid::Uuid;

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PromoShownEvent {
    pub presentation_id: Uuid,
    pub promo_id: String,
    pub action: String,
    pub uses_remaining: i32,
    pub from_pending: bool,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PromoVisibleEvent {
    pub presentation_id: Uuid,
    pub action: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PromoDismissedEvent {
    pub presentation_id: Uuid,
    pub action: String,
    pub timestamp: i64,
    pub shown_for_ms: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct PromoRejectedEvent {
    pub requested_action: String,
    pub active_action: Option<String>,
    pub error_code: i32,
    pub timestamp: i64,
}

/// Every transition the display coordinator reports to its observer.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PromoLifecycleEvent {
    Shown(PromoShownEvent),
    Visible(PromoVisibleEvent),
    Dismissed(PromoDismissedEvent),
    Rejected(PromoRejectedEvent),
}

impl PromoLifecycleEvent {
    /// Key used when the event is published or logged.
    pub fn kind(&self) -> &'static str {
        match self {
            PromoLifecycleEvent::Shown(_) => "promo_shown",
            PromoLifecycleEvent::Visible(_) => "promo_visible",
            PromoLifecycleEvent::Dismissed(_) => "promo_dismissed",
            PromoLifecycleEvent::Rejected(_) => "promo_rejected",
        }
    }

    pub fn action(&self) -> &str {
        match self {
            PromoLifecycleEvent::Shown(e) => &e.action,
            PromoLifecycleEvent::Visible(e) => &e.action,
            PromoLifecycleEvent::Dismissed(e) => &e.action,
            PromoLifecycleEvent::Rejected(e) => &e.requested_action,
        }
    }

    pub fn timestamp(&self) -> i64 {
        match self {
            PromoLifecycleEvent::Shown(e) => e.timestamp,
            PromoLifecycleEvent::Visible(e) => e.timestamp,
            PromoLifecycleEvent::Dismissed(e) => e.timestamp,
            PromoLifecycleEvent::Rejected(e) => e.timestamp,
        }
    }
}
