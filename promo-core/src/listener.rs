/// Error code reported when a promo is requested while another is on screen.
pub const PROMO_VIEW_ERR_ALREADY_SHOWING: i32 = -200;

/// Callbacks for the promo view lifecycle.
///
/// Callbacks are never invoked while the coordinator holds its lock, so an
/// implementation may call back into the coordinator.
pub trait PromoViewEvents: Send + Sync {
    /// The promo for `action` is on screen.
    fn on_visible(&self, action: &str);

    /// The promo for `action` was closed.
    fn on_dismissed(&self, action: &str);

    /// The promo could not be created or shown.
    fn on_error(&self, error_code: i32, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PromoViewError {
    #[error("Unable to create a promo view. A promo view is already showing")]
    AlreadyShowing,
}

impl PromoViewError {
    pub fn code(&self) -> i32 {
        match self {
            PromoViewError::AlreadyShowing => PROMO_VIEW_ERR_ALREADY_SHOWING,
        }
    }

    /// Deliver this error through a listener's `on_error` callback.
    pub fn notify(&self, listener: &dyn PromoViewEvents) {
        listener.on_error(self.code(), &self.to_string());
    }
}
