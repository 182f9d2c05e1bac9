use promo_shared::PromoLifecycleEvent;

/// Receives every lifecycle transition of the display coordinator.
pub trait LifecycleObserver: Send + Sync {
    fn record(&self, event: &PromoLifecycleEvent);
}

/// Writes lifecycle events as structured tracing events with a JSON payload.
#[derive(Debug, Clone, Default)]
pub struct TracingObserver {
    channel: Option<String>,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every event with a channel name, e.g. the host application's id.
    pub fn with_channel(channel: impl Into<String>) -> Self {
        Self {
            channel: Some(channel.into()),
        }
    }
}

impl LifecycleObserver for TracingObserver {
    fn record(&self, event: &PromoLifecycleEvent) {
        let channel = self.channel.as_deref().unwrap_or("promo");
        match serde_json::to_string(event) {
            Ok(payload) => tracing::info!(
                channel,
                kind = event.kind(),
                action = event.action(),
                timestamp = event.timestamp(),
                %payload,
                "Promo lifecycle event"
            ),
            Err(e) => tracing::warn!(
                kind = event.kind(),
                error = %e,
                "Failed to serialize promo lifecycle event"
            ),
        }
    }
}
