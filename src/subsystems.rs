//! Collaborator interfaces for the dependent subsystems.
//!
//! The session core drives these but implements none of them: BLE I/O,
//! persistent storage, notification rendering and the wearable transport
//! all live in the host. Every trait here is object-safe so the
//! coordinator can hold them as `Arc<dyn …>`.

use async_trait::async_trait;

use crate::error::Result;

/// Status shown by the notification/presentation layer.
///
/// Status signals are idempotent: re-signaling the current status simply
/// refreshes the presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionStatus {
    /// Explicit user-initiated connection attempt in progress.
    Connecting,
    /// Automatic scan for the last paired wheel in progress.
    Searching,
    /// Link is up.
    Connected,
    /// Link is down.
    Disconnected,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connecting => write!(f, "Connecting"),
            Self::Searching => write!(f, "Searching"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
        }
    }
}

/// The persistent telemetry logger.
pub trait LoggerSubsystem: Send + Sync {
    /// Start recording.
    fn start(&self);

    /// Stop recording.
    fn stop(&self);

    /// Whether a recording is in progress.
    fn is_running(&self) -> bool;
}

/// The companion wearable telemetry relay.
pub trait WearableMirror: Send + Sync {
    /// Start a mirror session.
    fn start(&self);

    /// Stop the mirror session.
    fn stop(&self);

    /// Push the latest telemetry to the wearable.
    fn push_telemetry(&self, speed: f64);
}

/// The visual/haptic notification layer.
pub trait StatusNotifier: Send + Sync {
    /// Set the session status to present.
    fn set_status(&self, status: SessionStatus);

    /// Refresh the presentation with current runtime values.
    fn refresh(&self);
}

/// Volume-key beep capture and one-shot beep playback.
pub trait VolumeKeyBeeper: Send + Sync {
    /// Enable or disable volume-up-key beep capture.
    fn set_active(&self, active: bool);

    /// Play a single beep now.
    fn play_beep(&self);
}

/// The wireless transport owning the physical link.
///
/// Connection outcomes are never returned through these calls; they arrive
/// later as link state events on the coordinator's event stream.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Request a connection to the paired wheel.
    async fn connect(&self) -> Result<()>;

    /// Request a disconnect.
    async fn disconnect(&self) -> Result<()>;

    /// Whether the link is currently up at the transport level.
    fn is_connected(&self) -> bool;
}

/// Remote ride-upload service (ElectroClub).
#[async_trait]
pub trait GarageResolver: Send + Sync {
    /// Resolve the remote garage entry for a wheel address.
    ///
    /// Returns the garage identifier selected for the address.
    async fn resolve_garage(&self, address: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_display() {
        assert_eq!(format!("{}", SessionStatus::Searching), "Searching");
        assert_eq!(format!("{}", SessionStatus::Connected), "Connected");
    }
}
