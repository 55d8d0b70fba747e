//! Runtime shell for the MotorGuard health engine
//!
//! Hosts `motorguard-core`'s [`HealthEngine`](motorguard_core::HealthEngine)
//! as a long-running service: hardware adapters push readings in, two
//! periodic tasks keep freshness and health current, and transport
//! collaborators subscribe to the alert/timeout event stream. Persistence
//! is a trait ([`HealthStore`]); the schema behind it is someone else's
//! concern.
//!
//! ```no_run
//! use std::sync::Arc;
//! use motorguard_service::{MemoryStore, Monitor, MonitorConfig};
//! use motorguard_ml::EnvelopeDetector;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let monitor = Monitor::new(
//!         Arc::new(MemoryStore::new()),
//!         Some(Arc::new(EnvelopeDetector)),
//!         MonitorConfig::default(),
//!     );
//!     let _tasks = monitor.start();
//!
//!     let mut events = monitor.subscribe();
//!     while let Ok(event) = events.recv().await {
//!         println!("{event:?}");
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod monitor;
pub mod store;

pub use monitor::{
    AlertStatistics, CycleOutcome, EngineEvent, Monitor, MonitorConfig, MonitorError,
};
pub use store::{
    resolve_controller_fallback, resolve_node_fallback, HealthStore, MemoryStore, StoreError,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
