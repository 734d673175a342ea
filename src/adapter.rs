//! Protocol adapter registry.
//!
//! Each wheel protocol family has one live adapter instance that owns the
//! family's decode and negotiation state. The registry creates adapters
//! lazily, hands out the instance matching the current family, and applies
//! the disconnect-time reset cascade.
//!
//! The cascade exists because related protocol variants share negotiation
//! state: dropping a link negotiated as one variant invalidates the
//! partially-accumulated state of every variant downstream of it in the
//! recognition chain. Resetting a family always constructs fresh instances
//! for itself and its cascade targets; families outside the row are never
//! touched.

use std::collections::HashMap;
use tracing::debug;

/// Protocol family of the paired wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VehicleFamily {
    /// InMotion first-generation protocol.
    Inmotion,
    /// InMotion V2 protocol.
    InmotionV2,
    /// Ninebot Z-series protocol.
    NinebotZ,
    /// Ninebot legacy protocol.
    Ninebot,
    /// KingSong protocol.
    Kingsong,
    /// Gotway/Begode protocol.
    Gotway,
    /// No wheel recognized yet.
    #[default]
    Unknown,
}

impl VehicleFamily {
    /// All modeled families, cascade order.
    pub const ALL: [VehicleFamily; 6] = [
        Self::Inmotion,
        Self::InmotionV2,
        Self::NinebotZ,
        Self::Ninebot,
        Self::Kingsong,
        Self::Gotway,
    ];

    /// Families whose adapters must be re-created when a link negotiated
    /// as `self` drops, `self` included.
    ///
    /// The chain follows the recognition order: the InMotion handshake
    /// falls through to InMotion V2 and the Ninebot variants, so a reset
    /// cascades from the most specific variant through everything
    /// downstream of it. KingSong and Gotway keep no cross-family
    /// negotiation state and reset nothing.
    pub fn reset_cascade(&self) -> &'static [VehicleFamily] {
        match self {
            Self::Inmotion => &[
                Self::Inmotion,
                Self::InmotionV2,
                Self::NinebotZ,
                Self::Ninebot,
            ],
            Self::InmotionV2 => &[Self::InmotionV2, Self::NinebotZ, Self::Ninebot],
            Self::NinebotZ => &[Self::NinebotZ, Self::Ninebot],
            Self::Ninebot => &[Self::Ninebot],
            Self::Kingsong | Self::Gotway | Self::Unknown => &[],
        }
    }

    /// Whether this family requires an explicit identification handshake
    /// after the link comes up.
    pub fn requires_identification(&self) -> bool {
        matches!(self, Self::Kingsong)
    }

    /// Get a human-readable name for this family.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inmotion => "InMotion",
            Self::InmotionV2 => "InMotion V2",
            Self::NinebotZ => "Ninebot Z",
            Self::Ninebot => "Ninebot",
            Self::Kingsong => "KingSong",
            Self::Gotway => "Gotway",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for VehicleFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A per-family protocol adapter.
///
/// Frame decoding itself lives outside this crate; implementations of this
/// trait wrap a decoder and expose the operations the session core drives.
/// Instances are owned exclusively by the [`AdapterRegistry`] and replaced
/// wholesale on reset, never mutated back to a clean state.
pub trait ProtocolAdapter: Send + Sync {
    /// The family this adapter decodes.
    fn family(&self) -> VehicleFamily;

    /// Issue the one-shot identification request for families that need
    /// it (KingSong name/serial query).
    fn request_identification(&self);

    /// Toggle the wheel's flashlight, where the protocol supports it.
    fn switch_flashlight(&self);
}

/// Default adapter used when the host has not injected a real decoder.
///
/// Holds no decode state; it logs the operations so the session flow is
/// observable in tools and tests.
pub struct GenericAdapter {
    family: VehicleFamily,
}

impl GenericAdapter {
    /// Create a generic adapter for the given family.
    pub fn new(family: VehicleFamily) -> Self {
        Self { family }
    }
}

impl ProtocolAdapter for GenericAdapter {
    fn family(&self) -> VehicleFamily {
        self.family
    }

    fn request_identification(&self) {
        debug!("Identification requested for {}", self.family);
    }

    fn switch_flashlight(&self) {
        debug!("Flashlight toggle requested for {}", self.family);
    }
}

/// Factory producing a fresh adapter for a family.
pub type AdapterFactory = Box<dyn Fn(VehicleFamily) -> Box<dyn ProtocolAdapter> + Send + Sync>;

/// Owns the live adapter instances, one slot per family.
///
/// Slots are created lazily on first access. `reset` replaces the slot of
/// the given family and of every family in its cascade with fresh
/// instances from the factory.
pub struct AdapterRegistry {
    slots: HashMap<VehicleFamily, Box<dyn ProtocolAdapter>>,
    factory: AdapterFactory,
}

impl AdapterRegistry {
    /// Create a registry backed by [`GenericAdapter`]s.
    pub fn new() -> Self {
        Self::with_factory(Box::new(|family| Box::new(GenericAdapter::new(family))))
    }

    /// Create a registry with a custom adapter factory.
    ///
    /// Hosts wire their real per-family decoders in here.
    pub fn with_factory(factory: AdapterFactory) -> Self {
        Self {
            slots: HashMap::new(),
            factory,
        }
    }

    /// Get the adapter for a family, creating it if needed.
    pub fn adapter(&mut self, family: VehicleFamily) -> &dyn ProtocolAdapter {
        &**self
            .slots
            .entry(family)
            .or_insert_with(|| (self.factory)(family))
    }

    /// Apply the disconnect-time reset cascade for a family.
    ///
    /// Fresh instances are constructed for the family and its cascade
    /// targets, discarding any partially-accumulated decode state. An
    /// unmodeled family resets nothing.
    pub fn reset(&mut self, family: VehicleFamily) {
        let cascade = family.reset_cascade();
        if cascade.is_empty() {
            debug!("No adapter reset for {}", family);
            return;
        }

        for target in cascade {
            debug!("Resetting {} adapter", target);
            self.slots.insert(*target, (self.factory)(*target));
        }
    }
}

impl Default for AdapterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Registry whose factory records every construction.
    fn recording_registry() -> (AdapterRegistry, Arc<Mutex<Vec<VehicleFamily>>>) {
        let created = Arc::new(Mutex::new(Vec::new()));
        let log = created.clone();
        let registry = AdapterRegistry::with_factory(Box::new(move |family| {
            log.lock().push(family);
            Box::new(GenericAdapter::new(family))
        }));
        (registry, created)
    }

    #[test]
    fn test_adapter_created_lazily_once() {
        let (mut registry, created) = recording_registry();

        assert_eq!(registry.adapter(VehicleFamily::Gotway).family(), VehicleFamily::Gotway);
        assert_eq!(registry.adapter(VehicleFamily::Gotway).family(), VehicleFamily::Gotway);

        assert_eq!(*created.lock(), vec![VehicleFamily::Gotway]);
    }

    #[test]
    fn test_reset_ninebot_z_cascades_to_ninebot_only() {
        let (mut registry, created) = recording_registry();

        registry.reset(VehicleFamily::NinebotZ);

        let created = created.lock();
        assert_eq!(*created, vec![VehicleFamily::NinebotZ, VehicleFamily::Ninebot]);
        assert!(!created.contains(&VehicleFamily::Inmotion));
        assert!(!created.contains(&VehicleFamily::InmotionV2));
    }

    #[test]
    fn test_reset_inmotion_cascades_through_whole_chain() {
        let (mut registry, created) = recording_registry();

        registry.reset(VehicleFamily::Inmotion);

        assert_eq!(
            *created.lock(),
            vec![
                VehicleFamily::Inmotion,
                VehicleFamily::InmotionV2,
                VehicleFamily::NinebotZ,
                VehicleFamily::Ninebot,
            ]
        );
    }

    #[test]
    fn test_reset_replaces_existing_instances() {
        let (mut registry, created) = recording_registry();

        registry.adapter(VehicleFamily::Ninebot);
        registry.reset(VehicleFamily::Ninebot);

        // One lazy construction plus one replacement.
        assert_eq!(
            *created.lock(),
            vec![VehicleFamily::Ninebot, VehicleFamily::Ninebot]
        );
    }

    #[test]
    fn test_reset_unknown_and_unchained_families_is_noop() {
        let (mut registry, created) = recording_registry();

        registry.reset(VehicleFamily::Unknown);
        registry.reset(VehicleFamily::Gotway);
        registry.reset(VehicleFamily::Kingsong);

        assert!(created.lock().is_empty());
    }

    #[test]
    fn test_cascade_table_shape() {
        assert_eq!(VehicleFamily::Inmotion.reset_cascade().len(), 4);
        assert_eq!(VehicleFamily::InmotionV2.reset_cascade().len(), 3);
        assert_eq!(VehicleFamily::NinebotZ.reset_cascade().len(), 2);
        assert_eq!(VehicleFamily::Ninebot.reset_cascade(), &[VehicleFamily::Ninebot]);
        assert!(VehicleFamily::Unknown.reset_cascade().is_empty());

        // Every row contains its own family first.
        for family in [
            VehicleFamily::Inmotion,
            VehicleFamily::InmotionV2,
            VehicleFamily::NinebotZ,
            VehicleFamily::Ninebot,
        ] {
            assert_eq!(family.reset_cascade()[0], family);
        }
    }

    #[test]
    fn test_only_kingsong_requires_identification() {
        for family in VehicleFamily::ALL {
            assert_eq!(
                family.requires_identification(),
                family == VehicleFamily::Kingsong
            );
        }
    }
}
