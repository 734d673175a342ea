//! # wheelhub-session
//!
//! Session coordination core for a personal EUC (electric unicycle)
//! telemetry hub.
//!
//! The crate owns the lifecycle of a single wireless link to a wheel:
//! it tracks link state, applies the configured auto-actions (auto-log,
//! auto-watch, beep capture), selects and resets the per-family protocol
//! adapter, and fans out status and telemetry to the dependent
//! subsystems. The subsystems themselves — BLE transport, frame decoders,
//! persistent logger, notification layer, wearable companion — live in
//! the host and are reached through the traits in [`subsystems`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wheelhub_session::{
//!     AppSettings, InMemorySettings, LinkTransition, SessionCoordinator, SessionDeps,
//!     SessionEvent, VehicleFamily,
//! };
//! # use wheelhub_session::{GarageResolver, LoggerSubsystem, StatusNotifier,
//! #     Transport, VolumeKeyBeeper, WearableMirror};
//! # fn collaborators() -> (Arc<dyn LoggerSubsystem>, Arc<dyn WearableMirror>,
//! #     Arc<dyn StatusNotifier>, Arc<dyn VolumeKeyBeeper>, Arc<dyn Transport>,
//! #     Arc<dyn GarageResolver>) { unimplemented!() }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (logger, mirror, notifier, beeper, transport, garage) = collaborators();
//!     let coordinator = SessionCoordinator::new(SessionDeps {
//!         settings: Arc::new(InMemorySettings::new(AppSettings {
//!             auto_log: true,
//!             ..Default::default()
//!         })),
//!         logger,
//!         mirror,
//!         notifier,
//!         beeper,
//!         transport,
//!         garage,
//!     });
//!
//!     // The transport pushes link events through this sender.
//!     let events = coordinator.sender();
//!     events
//!         .send(SessionEvent::LinkStateChanged(LinkTransition::connected(
//!             "AA:BB:CC:DD:EE:FF",
//!             VehicleFamily::Gotway,
//!         )))
//!         .unwrap();
//!
//!     coordinator.run().await;
//! }
//! ```
//!
//! ## Event model
//!
//! All events — link transitions, telemetry ticks, user commands, remote
//! callbacks — are serialized through one coordinator. Each event runs to
//! completion before the next is processed; remote calls are spawned
//! fire-and-forget and report back as typed events on the same stream.
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for settings and data
//!   enums

// Public modules
pub mod adapter;
pub mod error;
pub mod link;
pub mod policy;
pub mod session;
pub mod settings;
pub mod subsystems;

// Re-exports for convenience
pub use adapter::{AdapterFactory, AdapterRegistry, GenericAdapter, ProtocolAdapter, VehicleFamily};
pub use error::{Error, Result};
pub use link::{LinkState, LinkTransition};
pub use session::{SessionCoordinator, SessionDeps, SessionEvent, SessionRuntime, UserCommand};
pub use settings::{AppSettings, InMemorySettings, MiBandMode, SettingsStore};
pub use subsystems::{
    GarageResolver, LoggerSubsystem, SessionStatus, StatusNotifier, Transport, VolumeKeyBeeper,
    WearableMirror,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that key types are exported
        let _ = std::any::TypeId::of::<SessionCoordinator>();
        let _ = std::any::TypeId::of::<SessionRuntime>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<LinkState>();
        let _ = std::any::TypeId::of::<VehicleFamily>();
        let _ = std::any::TypeId::of::<AppSettings>();
        let _ = std::any::TypeId::of::<SessionStatus>();
    }

    #[test]
    fn test_default_runtime_is_idle() {
        let runtime = SessionRuntime::default();
        assert_eq!(runtime.link_state, LinkState::Disconnected);
        assert_eq!(runtime.vehicle_family, VehicleFamily::Unknown);
        assert!(!runtime.logger_running);
    }
}
