pub mod coordinator;
pub mod telemetry;

pub use coordinator::{DisplayCoordinator, DisplayPhase};
pub use telemetry::{LifecycleObserver, TracingObserver};
