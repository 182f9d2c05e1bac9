use crate::telemetry::LifecycleObserver;
use promo_core::{
    PresentationHost, PresentationRequest, PresentationSession, PresentationSink, PromoResult,
    PromoSource, PromoViewError, PromoViewEvents,
};
use promo_offer::{LoadSummary, PromoDefinition, PromoRegistry};
use promo_shared::{
    PromoDismissedEvent, PromoLifecycleEvent, PromoRejectedEvent, PromoShownEvent,
    PromoVisibleEvent,
};
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

/// Snapshot of the coordinator's display state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayPhase {
    Idle,
    Showing { presentation_id: Uuid, action: String },
}

struct ActivePresentation {
    presentation_id: Uuid,
    action: String,
    listener: Option<Arc<dyn PromoViewEvents>>,
    shown_at: i64,
    visible: bool,
}

#[derive(Default)]
struct DisplayState {
    /// `Some` for the whole interval between an accepted show and its dismissal.
    active: Option<ActivePresentation>,
    /// Action of the deferred promo; its entry is read from the registry.
    pending: Option<String>,
}

impl DisplayState {
    fn active_action(&self) -> Option<String> {
        self.active.as_ref().map(|a| a.action.clone())
    }
}

struct CoordinatorInner {
    registry: PromoRegistry,
    state: Mutex<DisplayState>,
    observer: Option<Arc<dyn LifecycleObserver>>,
}

/// Serializes promo presentation so that at most one promo is on screen.
///
/// The host application creates one coordinator and hands clones of it to
/// whatever needs to show promos; clones share the same state.
#[derive(Clone)]
pub struct DisplayCoordinator {
    inner: Arc<CoordinatorInner>,
}

impl DisplayCoordinator {
    pub fn new(registry: PromoRegistry) -> Self {
        Self::build(registry, None)
    }

    pub fn with_observer(registry: PromoRegistry, observer: Arc<dyn LifecycleObserver>) -> Self {
        Self::build(registry, Some(observer))
    }

    fn build(registry: PromoRegistry, observer: Option<Arc<dyn LifecycleObserver>>) -> Self {
        Self {
            inner: Arc::new(CoordinatorInner {
                registry,
                state: Mutex::new(DisplayState::default()),
                observer,
            }),
        }
    }

    pub fn registry(&self) -> &PromoRegistry {
        &self.inner.registry
    }

    pub fn load_definitions(&self, records: &[Value]) -> LoadSummary {
        self.inner.registry.load(records)
    }

    /// Pull the latest promo records from `source` into the registry
    pub async fn refresh_from(&self, source: &dyn PromoSource) -> PromoResult<LoadSummary> {
        let records = source.fetch_definitions().await?;
        let summary = self.load_definitions(&records);
        tracing::info!(
            loaded = summary.loaded,
            skipped = summary.skipped,
            "Promo definitions refreshed"
        );
        Ok(summary)
    }

    /// Show the promo registered for `action`.
    ///
    /// Returns `false` when a promo is already showing (the listener gets an
    /// `ALREADY_SHOWING` error), when no host is given, or when the action has
    /// no eligible promo. The last two cases produce no callback.
    pub fn request(
        &self,
        action: &str,
        host: Option<&dyn PresentationHost>,
        listener: Option<Arc<dyn PromoViewEvents>>,
    ) -> bool {
        let mut state = self.inner.lock();
        if let Some(active_action) = state.active_action() {
            drop(state);
            self.inner.reject(action, active_action, listener.as_deref());
            return false;
        }

        let Some(host) = host else {
            tracing::debug!(action, "No presentation host, promo not shown");
            return false;
        };
        let Some(definition) = self.inner.registry.claim(action) else {
            tracing::debug!(action, "No eligible promo for action");
            return false;
        };

        let request = self.inner.begin(&mut state, &definition, listener);
        drop(state);

        self.hand_off(host, request, &definition, false);
        true
    }

    /// Defer the promo for `action` until a later open or install event.
    /// Replaces any previously deferred promo, also when `action` has no
    /// eligible promo.
    pub fn mark_pending(&self, action: &str) {
        let pending = self.inner.registry.lookup(action).map(|d| d.action);
        if pending.is_none() {
            tracing::debug!(action, "No eligible promo to defer");
        }
        self.inner.lock().pending = pending;
    }

    /// Whether a deferred promo with uses left is waiting.
    ///
    /// Reads the live registry entry, so uses taken by [`request`](Self::request)
    /// count. Only a positive use count counts, so an unlimited promo is
    /// reported as not pending.
    pub fn has_pending_promo(&self) -> bool {
        let state = self.inner.lock();
        state
            .pending
            .as_deref()
            .and_then(|action| self.inner.registry.get(action))
            .is_some_and(|p| p.uses_remaining > 0)
    }

    pub fn pending_action(&self) -> Option<String> {
        self.inner.lock().pending.clone()
    }

    pub fn clear_pending(&self) -> Option<String> {
        self.inner.lock().pending.take()
    }

    /// Show the deferred promo without a listener.
    ///
    /// Takes one use from the registry entry for the deferred action, so a
    /// promo whose uses are gone is not shown again.
    pub fn show_pending(&self, host: Option<&dyn PresentationHost>) -> bool {
        let mut state = self.inner.lock();
        let Some(pending_action) = state.pending.clone() else {
            return false;
        };
        if let Some(active_action) = state.active_action() {
            drop(state);
            self.inner.reject(&pending_action, active_action, None);
            return false;
        }
        let Some(host) = host else {
            tracing::debug!(
                action = %pending_action,
                "No presentation host, pending promo not shown"
            );
            return false;
        };
        let Some(definition) = self.inner.registry.claim(&pending_action) else {
            tracing::debug!(action = %pending_action, "Pending promo no longer eligible");
            return false;
        };

        let request = self.inner.begin(&mut state, &definition, None);
        drop(state);

        self.hand_off(host, request, &definition, true);
        true
    }

    pub fn is_showing(&self) -> bool {
        self.inner.lock().active.is_some()
    }

    pub fn active_action(&self) -> Option<String> {
        self.inner.lock().active_action()
    }

    pub fn phase(&self) -> DisplayPhase {
        match &self.inner.lock().active {
            Some(active) => DisplayPhase::Showing {
                presentation_id: active.presentation_id,
                action: active.action.clone(),
            },
            None => DisplayPhase::Idle,
        }
    }

    fn hand_off(
        &self,
        host: &dyn PresentationHost,
        request: PresentationRequest,
        definition: &PromoDefinition,
        from_pending: bool,
    ) {
        tracing::info!(
            presentation_id = %request.presentation_id,
            action = %request.action,
            uses_remaining = definition.uses_remaining,
            from_pending,
            "Showing promo"
        );
        self.inner.emit(PromoLifecycleEvent::Shown(PromoShownEvent {
            presentation_id: request.presentation_id,
            promo_id: definition.id.clone(),
            action: definition.action.clone(),
            uses_remaining: definition.uses_remaining,
            from_pending,
            timestamp: self.inner.registry.now_millis(),
        }));

        let sink: Arc<dyn PresentationSink> = self.inner.clone();
        let session =
            PresentationSession::new(request.presentation_id, request.action.clone(), sink);
        host.present(request, session);
    }
}

impl CoordinatorInner {
    fn lock(&self) -> MutexGuard<'_, DisplayState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(
        &self,
        state: &mut DisplayState,
        definition: &PromoDefinition,
        listener: Option<Arc<dyn PromoViewEvents>>,
    ) -> PresentationRequest {
        let presentation_id = Uuid::new_v4();
        state.active = Some(ActivePresentation {
            presentation_id,
            action: definition.action.clone(),
            listener,
            shown_at: self.registry.now_millis(),
            visible: false,
        });

        PresentationRequest {
            presentation_id,
            promo_id: definition.id.clone(),
            action: definition.action.clone(),
            content_reference: definition.content_reference.clone(),
        }
    }

    fn reject(
        &self,
        requested_action: &str,
        active_action: String,
        listener: Option<&dyn PromoViewEvents>,
    ) {
        let error = PromoViewError::AlreadyShowing;
        tracing::info!(
            requested_action,
            active_action = %active_action,
            "Promo request rejected, another promo is showing"
        );
        if let Some(listener) = listener {
            error.notify(listener);
        }
        self.emit(PromoLifecycleEvent::Rejected(PromoRejectedEvent {
            requested_action: requested_action.to_string(),
            active_action: Some(active_action),
            error_code: error.code(),
            timestamp: self.registry.now_millis(),
        }));
    }

    fn emit(&self, event: PromoLifecycleEvent) {
        if let Some(observer) = &self.observer {
            observer.record(&event);
        }
    }
}

impl PresentationSink for CoordinatorInner {
    fn presentation_visible(&self, presentation_id: Uuid) {
        let notify = {
            let mut state = self.lock();
            match state.active.as_mut() {
                Some(active) if active.presentation_id == presentation_id && !active.visible => {
                    active.visible = true;
                    Some((active.action.clone(), active.listener.clone()))
                }
                _ => None,
            }
        };

        let Some((action, listener)) = notify else {
            tracing::warn!(
                %presentation_id,
                "Visibility reported for a presentation that is not active"
            );
            return;
        };

        if let Some(listener) = listener {
            listener.on_visible(&action);
        }
        self.emit(PromoLifecycleEvent::Visible(PromoVisibleEvent {
            presentation_id,
            action,
            timestamp: self.registry.now_millis(),
        }));
    }

    fn presentation_dismissed(&self, presentation_id: Uuid) {
        let finished = {
            let mut state = self.lock();
            if state
                .active
                .as_ref()
                .is_some_and(|a| a.presentation_id == presentation_id)
            {
                state.active.take()
            } else {
                None
            }
        };

        let Some(active) = finished else {
            tracing::warn!(
                %presentation_id,
                "Dismissal reported for a presentation that is not active"
            );
            return;
        };

        let now = self.registry.now_millis();
        tracing::info!(%presentation_id, action = %active.action, "Promo dismissed");
        if let Some(listener) = &active.listener {
            listener.on_dismissed(&active.action);
        }
        self.emit(PromoLifecycleEvent::Dismissed(PromoDismissedEvent {
            presentation_id,
            action: active.action,
            timestamp: now,
            shown_for_ms: now - active.shown_at,
        }));
    }
}
