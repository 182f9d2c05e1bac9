pub mod definition;
pub mod registry;

pub use definition::{OfferError, PromoDefinition, UNLIMITED_USES};
pub use registry::{LoadSummary, PromoRegistry};
