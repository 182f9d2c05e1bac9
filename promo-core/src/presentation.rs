use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// What a presentation host needs to render one promo.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PresentationRequest {
    pub presentation_id: Uuid,
    pub promo_id: String,
    pub action: String,
    pub content_reference: String,
}

/// Renders promo content. UI hosting lives entirely behind this trait.
///
/// The host owns the session it is handed and must eventually dismiss it
/// (or drop it) exactly once, otherwise no other promo can be shown.
pub trait PresentationHost: Send + Sync {
    fn present(&self, request: PresentationRequest, session: PresentationSession);
}

/// Receives visibility and dismissal reports for presentations it started.
pub trait PresentationSink: Send + Sync {
    fn presentation_visible(&self, presentation_id: Uuid);
    fn presentation_dismissed(&self, presentation_id: Uuid);
}

/// Handle for one accepted presentation.
pub struct PresentationSession {
    presentation_id: Uuid,
    action: String,
    sink: Arc<dyn PresentationSink>,
    visible: bool,
    dismissed: bool,
}

impl PresentationSession {
    pub fn new(
        presentation_id: Uuid,
        action: impl Into<String>,
        sink: Arc<dyn PresentationSink>,
    ) -> Self {
        Self {
            presentation_id,
            action: action.into(),
            sink,
            visible: false,
            dismissed: false,
        }
    }

    pub fn presentation_id(&self) -> Uuid {
        self.presentation_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Report that the promo is on screen. Only the first call is forwarded.
    pub fn confirm_visible(&mut self) {
        if self.visible || self.dismissed {
            return;
        }
        self.visible = true;
        self.sink.presentation_visible(self.presentation_id);
    }

    /// Report that the promo was closed.
    pub fn dismiss(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if !self.dismissed {
            self.dismissed = true;
            self.sink.presentation_dismissed(self.presentation_id);
        }
    }
}

impl Drop for PresentationSession {
    fn drop(&mut self) {
        if !self.dismissed {
            tracing::warn!(
                presentation_id = %self.presentation_id,
                action = %self.action,
                "Presentation session dropped without dismissal, releasing promo"
            );
            self.finish();
        }
    }
}

impl fmt::Debug for PresentationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationSession")
            .field("presentation_id", &self.presentation_id)
            .field("action", &self.action)
            .field("visible", &self.visible)
            .field("dismissed", &self.dismissed)
            .finish()
    }
}
