//! Application settings consumed by the session core.
//!
//! The core only reads settings; mutation happens in the host application.
//! The two exceptions are the last paired device address and the companion
//! band mode, which the coordinator persists through [`SettingsStore`].

use parking_lot::RwLock;

/// Display mode for the companion fitness band.
///
/// `Alarm` owns the notification display exclusively while active, so the
/// coordinator suppresses telemetry-driven status refreshes in that mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MiBandMode {
    /// Minimal data pushed to the band.
    #[default]
    Min,
    /// Speed and battery.
    Medium,
    /// Full telemetry set.
    Max,
    /// Alarm-only mode.
    Alarm,
}

impl MiBandMode {
    /// Advance to the next mode, wrapping around after `Alarm`.
    pub fn next(&self) -> Self {
        match self {
            Self::Min => Self::Medium,
            Self::Medium => Self::Max,
            Self::Max => Self::Alarm,
            Self::Alarm => Self::Min,
        }
    }

    /// Get a human-readable name for this mode.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Min => "Min",
            Self::Medium => "Medium",
            Self::Max => "Max",
            Self::Alarm => "Alarm",
        }
    }
}

/// Read-only snapshot of the settings the session core evaluates.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AppSettings {
    /// Start the persistent logger automatically.
    pub auto_log: bool,
    /// Defer auto-logging until the wheel is actually moving.
    pub start_auto_logging_when_is_moving: bool,
    /// Start the wearable mirror automatically on connect.
    pub auto_watch: bool,
    /// Capture the volume-up key as a beep trigger while connected.
    pub use_beep_on_volume_up: bool,
    /// Companion band display mode.
    pub miband_mode: MiBandMode,
    /// Upload rides to the ElectroClub garage automatically.
    pub auto_upload_ec: bool,
    /// ElectroClub auth token, if the user is signed in.
    pub ec_token: Option<String>,
    /// Address of the last successfully paired wheel.
    pub last_address: Option<String>,
}

/// Accessor interface for settings.
///
/// The coordinator reads a fresh snapshot per event and writes back only
/// the fields it owns (last paired address, band mode).
pub trait SettingsStore: Send + Sync {
    /// Get a snapshot of the current settings.
    fn snapshot(&self) -> AppSettings;

    /// Persist the address of the wheel that just connected.
    fn set_last_address(&self, address: &str);

    /// Persist a new companion band mode.
    fn set_miband_mode(&self, mode: MiBandMode);
}

/// In-memory settings store.
///
/// Hosts with real persistence implement [`SettingsStore`] themselves;
/// this one backs tests and single-process tools.
#[derive(Debug, Default)]
pub struct InMemorySettings {
    inner: RwLock<AppSettings>,
}

impl InMemorySettings {
    /// Create a store seeded with the given settings.
    pub fn new(settings: AppSettings) -> Self {
        Self {
            inner: RwLock::new(settings),
        }
    }

    /// Replace the whole settings snapshot.
    pub fn update(&self, settings: AppSettings) {
        *self.inner.write() = settings;
    }
}

impl SettingsStore for InMemorySettings {
    fn snapshot(&self) -> AppSettings {
        self.inner.read().clone()
    }

    fn set_last_address(&self, address: &str) {
        self.inner.write().last_address = Some(address.to_string());
    }

    fn set_miband_mode(&self, mode: MiBandMode) {
        self.inner.write().miband_mode = mode;
    }
}
