pub mod models;

pub use models::events::{
    PromoDismissedEvent, PromoLifecycleEvent, PromoRejectedEvent, PromoShownEvent,
    PromoVisibleEvent,
};
