pub mod clock;
pub mod listener;
pub mod presentation;
pub mod source;

pub use clock::{Clock, FixedClock, SystemClock};
pub use listener::{PromoViewError, PromoViewEvents, PROMO_VIEW_ERR_ALREADY_SHOWING};
pub use presentation::{
    PresentationHost, PresentationRequest, PresentationSession, PresentationSink,
};
pub use source::PromoSource;

#[derive(Debug, thiserror::Error)]
pub enum PromoError {
    #[error("Promo source failed: {0}")]
    Source(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type PromoResult<T> = Result<T, PromoError>;
