//! Session coordinator and connection state machine.
//!
//! This module owns the single wheel session: it consumes link-state
//! transitions, telemetry ticks and user commands, applies the auto-action
//! policy, drives the adapter registry, and dispatches side effects to the
//! dependent subsystems.
//!
//! All events are serialized through one coordinator instance. Each event
//! runs to completion, including its side-effect dispatches, before the
//! next is processed. Remote calls are spawned fire-and-forget and report
//! back through the same event channel as typed events, so state is never
//! mutated from another task.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::adapter::{AdapterRegistry, VehicleFamily};
use crate::error::Result;
use crate::link::{LinkState, LinkTransition};
use crate::policy;
use crate::settings::{MiBandMode, SettingsStore};
use crate::subsystems::{
    GarageResolver, LoggerSubsystem, SessionStatus, StatusNotifier, Transport, VolumeKeyBeeper,
    WearableMirror,
};

/// An inbound event for the session coordinator.
#[derive(Debug)]
pub enum SessionEvent {
    /// The transport reported a link state transition.
    LinkStateChanged(LinkTransition),
    /// A decoded telemetry frame is available.
    TelemetryAvailable {
        /// Latest reported speed.
        speed: f64,
    },
    /// A user-triggered command (notification button, UI action).
    User(UserCommand),
    /// The logger subsystem started or stopped outside our control.
    LoggerLifecycleChanged {
        /// Whether the logger is now running.
        started: bool,
    },
    /// A spawned garage resolution finished.
    GarageResolved {
        /// The wheel address that was resolved.
        address: String,
        /// The resolution outcome. Failures are logged and dropped.
        result: Result<String>,
    },
    /// Stop the event loop and release the link.
    Shutdown,
}

/// User-triggerable commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserCommand {
    /// Request a transport connection.
    Connect,
    /// Request a transport disconnect.
    Disconnect,
    /// Toggle the persistent logger.
    ToggleLogger,
    /// Toggle the wearable mirror session.
    ToggleMirror,
    /// Play a one-shot beep.
    ToggleBeep,
    /// Toggle the wheel flashlight through the active adapter.
    ToggleLight,
    /// Advance the companion band mode.
    ToggleCompanionBandMode,
}

/// Mutable session state owned by the coordinator.
///
/// Updated exclusively by the event handlers; the auto-action policy and
/// hosts read it through [`SessionCoordinator::runtime`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionRuntime {
    /// Current link state.
    pub link_state: LinkState,
    /// Protocol family of the connected wheel, `Unknown` while down.
    pub vehicle_family: VehicleFamily,
    /// Whether the persistent logger is recording.
    ///
    /// Stays true across disconnects; logging is only started
    /// conditionally, never auto-stopped.
    pub logger_running: bool,
    /// Whether a wearable mirror session is active.
    pub wearable_mirror_active: bool,
    /// Whether volume-key beep capture is active.
    pub beep_capture_active: bool,
    /// Latest reported speed.
    pub speed: f64,
}

/// Collaborator subsystems injected into the coordinator.
pub struct SessionDeps {
    /// Settings accessor.
    pub settings: Arc<dyn SettingsStore>,
    /// Persistent telemetry logger.
    pub logger: Arc<dyn LoggerSubsystem>,
    /// Wearable telemetry mirror.
    pub mirror: Arc<dyn WearableMirror>,
    /// Notification/status layer.
    pub notifier: Arc<dyn StatusNotifier>,
    /// Volume-key beep capture.
    pub beeper: Arc<dyn VolumeKeyBeeper>,
    /// Wireless transport.
    pub transport: Arc<dyn Transport>,
    /// Remote garage resolution service.
    pub garage: Arc<dyn GarageResolver>,
}

/// Owns the session state machine and its event stream.
pub struct SessionCoordinator {
    runtime: SessionRuntime,
    registry: AdapterRegistry,
    settings: Arc<dyn SettingsStore>,
    logger: Arc<dyn LoggerSubsystem>,
    mirror: Arc<dyn WearableMirror>,
    notifier: Arc<dyn StatusNotifier>,
    beeper: Arc<dyn VolumeKeyBeeper>,
    transport: Arc<dyn Transport>,
    garage: Arc<dyn GarageResolver>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
    event_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl SessionCoordinator {
    /// Create a coordinator with the default adapter registry.
    pub fn new(deps: SessionDeps) -> Self {
        Self::with_registry(deps, AdapterRegistry::new())
    }

    /// Create a coordinator with a custom adapter registry.
    ///
    /// Hosts use this to wire real per-family decoders through an adapter
    /// factory.
    pub fn with_registry(deps: SessionDeps, registry: AdapterRegistry) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        Self {
            runtime: SessionRuntime::default(),
            registry,
            settings: deps.settings,
            logger: deps.logger,
            mirror: deps.mirror,
            notifier: deps.notifier,
            beeper: deps.beeper,
            transport: deps.transport,
            garage: deps.garage,
            event_tx,
            event_rx,
        }
    }

    /// Get a sender for feeding events into the coordinator.
    ///
    /// The transport, decoders and UI all push through clones of this.
    pub fn sender(&self) -> mpsc::UnboundedSender<SessionEvent> {
        self.event_tx.clone()
    }

    /// Get the current session runtime state.
    pub fn runtime(&self) -> &SessionRuntime {
        &self.runtime
    }

    /// Drain the event stream until [`SessionEvent::Shutdown`] arrives.
    pub async fn run(mut self) {
        info!("Session coordinator started");

        while let Some(event) = self.event_rx.recv().await {
            if matches!(event, SessionEvent::Shutdown) {
                self.shutdown().await;
                break;
            }
            self.handle_event(event);
        }

        debug!("Session coordinator event loop ended");
    }

    /// Process a single event to completion.
    ///
    /// This is the only place session state is mutated.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::LinkStateChanged(transition) => self.on_link_state_changed(transition),
            SessionEvent::TelemetryAvailable { speed } => self.on_telemetry_available(speed),
            SessionEvent::User(command) => self.on_user_command(command),
            SessionEvent::LoggerLifecycleChanged { started } => {
                debug!("Logger lifecycle changed, running = {}", started);
                self.runtime.logger_running = started;
                self.notifier.refresh();
            }
            SessionEvent::GarageResolved { address, result } => match result {
                Ok(garage) => info!("Garage {} selected for {}", garage, address),
                Err(e) => warn!("Garage resolution for {} failed: {}", address, e),
            },
            SessionEvent::Shutdown => {}
        }
    }

    /// Toggle the persistent logger.
    ///
    /// Stops it when running. Starts it only while the link is connected;
    /// otherwise this is a no-op returning false.
    pub fn toggle_logger(&mut self) -> bool {
        if self.runtime.logger_running {
            self.logger.stop();
            self.runtime.logger_running = false;
            info!("Logger stopped");
            false
        } else if self.runtime.link_state.is_connected() {
            self.logger.start();
            self.runtime.logger_running = true;
            info!("Logger started");
            true
        } else {
            debug!("Logger start skipped, link is not connected");
            false
        }
    }

    /// Toggle the wearable mirror session. No link precondition.
    pub fn toggle_mirror(&mut self) -> bool {
        if self.runtime.wearable_mirror_active {
            self.mirror.stop();
            self.runtime.wearable_mirror_active = false;
            info!("Wearable mirror stopped");
            false
        } else {
            self.mirror.start();
            self.runtime.wearable_mirror_active = true;
            info!("Wearable mirror started");
            true
        }
    }

    /// Advance the companion band mode, persist it and refresh the status
    /// display. Returns the new mode.
    pub fn toggle_miband_mode(&mut self) -> MiBandMode {
        let mode = self.settings.snapshot().miband_mode.next();
        self.settings.set_miband_mode(mode);
        self.notifier.refresh();
        mode
    }

    fn on_link_state_changed(&mut self, transition: LinkTransition) {
        info!("Link state = {}", transition.state);
        self.runtime.link_state = transition.state;

        match transition.state {
            LinkState::Connected => self.on_connected(transition),
            LinkState::Disconnected => self.on_disconnected(),
            LinkState::Connecting => {
                let status = if transition.auto_connect {
                    SessionStatus::Searching
                } else {
                    SessionStatus::Connecting
                };
                self.notifier.set_status(status);
            }
        }

        self.notifier.refresh();
    }

    fn on_connected(&mut self, transition: LinkTransition) {
        let settings = self.settings.snapshot();
        self.runtime.vehicle_family = transition.family;

        if let Some(address) = transition.device_address.filter(|a| !a.is_empty()) {
            self.settings.set_last_address(&address);
            if settings.auto_upload_ec && settings.ec_token.is_some() {
                self.spawn_garage_resolution(address);
            }
        }

        if settings.use_beep_on_volume_up {
            self.beeper.set_active(true);
            self.runtime.beep_capture_active = true;
        }

        if !self.runtime.logger_running && policy::should_start_logger_on_connect(&settings) {
            self.toggle_logger();
        }

        if self.runtime.vehicle_family.requires_identification() {
            self.registry
                .adapter(self.runtime.vehicle_family)
                .request_identification();
        }

        if !self.runtime.wearable_mirror_active && policy::should_auto_mirror(&settings) {
            self.toggle_mirror();
        }

        self.notifier.set_status(SessionStatus::Connected);
    }

    fn on_disconnected(&mut self) {
        if self.runtime.beep_capture_active {
            self.beeper.set_active(false);
            self.runtime.beep_capture_active = false;
        }

        // Cascade keyed by the family the dropped link was negotiated as.
        self.registry.reset(self.runtime.vehicle_family);
        self.runtime.vehicle_family = VehicleFamily::Unknown;

        self.notifier.set_status(SessionStatus::Disconnected);
    }

    fn on_telemetry_available(&mut self, speed: f64) {
        self.runtime.speed = speed;

        if self.runtime.wearable_mirror_active {
            self.mirror.push_telemetry(speed);
        }

        let settings = self.settings.snapshot();

        // Alarm mode owns the display exclusively while active.
        if settings.miband_mode != MiBandMode::Alarm {
            self.notifier.refresh();
        }

        if !self.runtime.logger_running && policy::should_start_logger_on_move(&settings, speed) {
            self.toggle_logger();
        }
    }

    fn on_user_command(&mut self, command: UserCommand) {
        debug!("User command: {:?}", command);

        match command {
            UserCommand::Connect => {
                let transport = self.transport.clone();
                tokio::spawn(async move {
                    if let Err(e) = transport.connect().await {
                        warn!("Connect request failed: {}", e);
                    }
                });
            }
            UserCommand::Disconnect => {
                let transport = self.transport.clone();
                tokio::spawn(async move {
                    if let Err(e) = transport.disconnect().await {
                        warn!("Disconnect request failed: {}", e);
                    }
                });
            }
            UserCommand::ToggleLogger => {
                self.toggle_logger();
                self.notifier.refresh();
            }
            UserCommand::ToggleMirror => {
                self.toggle_mirror();
                self.notifier.refresh();
            }
            UserCommand::ToggleBeep => self.beeper.play_beep(),
            UserCommand::ToggleLight => {
                let family = self.runtime.vehicle_family;
                if family != VehicleFamily::Unknown {
                    self.registry.adapter(family).switch_flashlight();
                }
            }
            UserCommand::ToggleCompanionBandMode => {
                self.toggle_miband_mode();
            }
        }
    }

    /// Spawn the fire-and-forget garage resolution for a wheel address.
    ///
    /// The outcome returns as a [`SessionEvent::GarageResolved`] on the
    /// coordinator's own event stream; a failure never touches link state.
    fn spawn_garage_resolution(&self, address: String) {
        let garage = self.garage.clone();
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            let result = garage.resolve_garage(&address).await;
            let _ = event_tx.send(SessionEvent::GarageResolved { address, result });
        });
    }

    async fn shutdown(&mut self) {
        info!("Session coordinator shutting down");

        if self.runtime.wearable_mirror_active {
            self.toggle_mirror();
        }
        if self.runtime.beep_capture_active {
            self.beeper.set_active(false);
            self.runtime.beep_capture_active = false;
        }
        if let Err(e) = self.transport.disconnect().await {
            warn!("Disconnect on shutdown failed: {}", e);
        }
    }
}
