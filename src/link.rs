//! Link state types.
//!
//! The link is the single wireless connection to the paired wheel. Its
//! state is driven entirely by events reported from the transport
//! collaborator; the session core never transitions it on its own.

use crate::adapter::VehicleFamily;

/// Connection state of the wheel link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LinkState {
    /// Not connected to the wheel.
    #[default]
    Disconnected,
    /// Currently attempting to connect.
    Connecting,
    /// Connected to the wheel.
    Connected,
}

impl LinkState {
    /// Check if connected.
    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl std::fmt::Display for LinkState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
        }
    }
}

/// A link state transition as reported by the transport.
///
/// Carries the metadata that accompanies the raw state: the device address
/// and recognized protocol family when the link comes up, and whether an
/// entry into `Connecting` was an automatic scan rather than an explicit
/// user connect (affects only the status label shown to the user).
#[derive(Debug, Clone, PartialEq)]
pub struct LinkTransition {
    /// The new link state.
    pub state: LinkState,
    /// Device MAC address, present when the link became connected.
    pub device_address: Option<String>,
    /// Whether entry into `Connecting` came from the auto-connect scanner.
    pub auto_connect: bool,
    /// Protocol family recognized for the connected wheel.
    pub family: VehicleFamily,
}

impl LinkTransition {
    /// Transition into `Connected` with the device address and the
    /// protocol family the transport recognized during negotiation.
    pub fn connected(device_address: impl Into<String>, family: VehicleFamily) -> Self {
        Self {
            state: LinkState::Connected,
            device_address: Some(device_address.into()),
            auto_connect: false,
            family,
        }
    }

    /// Transition into `Connecting`.
    pub fn connecting(auto_connect: bool) -> Self {
        Self {
            state: LinkState::Connecting,
            device_address: None,
            auto_connect,
            family: VehicleFamily::Unknown,
        }
    }

    /// Transition into `Disconnected`.
    pub fn disconnected() -> Self {
        Self {
            state: LinkState::Disconnected,
            device_address: None,
            auto_connect: false,
            family: VehicleFamily::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_state_predicates() {
        assert!(LinkState::Connected.is_connected());
        assert!(!LinkState::Connecting.is_connected());
        assert!(!LinkState::Disconnected.is_connected());
    }

    #[test]
    fn test_link_state_display() {
        assert_eq!(format!("{}", LinkState::Connected), "Connected");
        assert_eq!(format!("{}", LinkState::Disconnected), "Disconnected");
    }

    #[test]
    fn test_transition_constructors() {
        let t = LinkTransition::connected("AA:BB:CC:DD:EE:FF", VehicleFamily::Gotway);
        assert_eq!(t.state, LinkState::Connected);
        assert_eq!(t.device_address.as_deref(), Some("AA:BB:CC:DD:EE:FF"));
        assert_eq!(t.family, VehicleFamily::Gotway);

        let t = LinkTransition::connecting(true);
        assert_eq!(t.state, LinkState::Connecting);
        assert!(t.auto_connect);
        assert_eq!(t.family, VehicleFamily::Unknown);

        let t = LinkTransition::disconnected();
        assert_eq!(t.state, LinkState::Disconnected);
        assert!(t.device_address.is_none());
    }
}
