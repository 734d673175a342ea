//! Scripted session walkthrough against in-process fake subsystems
//!
//! Run with: cargo run --example session_demo

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use wheelhub_session::{
    AppSettings, GarageResolver, InMemorySettings, LinkTransition, LoggerSubsystem, Result,
    SessionCoordinator, SessionDeps, SessionEvent, SessionStatus, StatusNotifier, Transport,
    UserCommand, VehicleFamily, VolumeKeyBeeper, WearableMirror,
};

/// Console-printing stand-ins for the host subsystems.
struct ConsoleLogger;
struct ConsoleMirror;
struct ConsoleNotifier;
struct ConsoleBeeper;

/// Transport that immediately acknowledges by emitting link events.
struct ScriptedTransport {
    events: mpsc::UnboundedSender<SessionEvent>,
}

struct DemoGarage;

impl LoggerSubsystem for ConsoleLogger {
    fn start(&self) {
        println!("[logger]   recording started");
    }

    fn stop(&self) {
        println!("[logger]   recording stopped");
    }

    fn is_running(&self) -> bool {
        false
    }
}

impl WearableMirror for ConsoleMirror {
    fn start(&self) {
        println!("[mirror]   wearable session started");
    }

    fn stop(&self) {
        println!("[mirror]   wearable session stopped");
    }

    fn push_telemetry(&self, speed: f64) {
        println!("[mirror]   pushed speed {speed:.1}");
    }
}

impl StatusNotifier for ConsoleNotifier {
    fn set_status(&self, status: SessionStatus) {
        println!("[notify]   status = {status}");
    }

    fn refresh(&self) {}
}

impl VolumeKeyBeeper for ConsoleBeeper {
    fn set_active(&self, active: bool) {
        println!("[beeper]   volume-key capture active = {active}");
    }

    fn play_beep(&self) {
        println!("[beeper]   beep!");
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self) -> Result<()> {
        println!("[transport] connect requested");
        let _ = self
            .events
            .send(SessionEvent::LinkStateChanged(LinkTransition::connecting(false)));
        let _ = self
            .events
            .send(SessionEvent::LinkStateChanged(LinkTransition::connected(
                "AA:BB:CC:DD:EE:FF",
                VehicleFamily::Kingsong,
            )));
        Ok(())
    }

    async fn disconnect(&self) -> Result<()> {
        println!("[transport] disconnect requested");
        let _ = self
            .events
            .send(SessionEvent::LinkStateChanged(LinkTransition::disconnected()));
        Ok(())
    }

    fn is_connected(&self) -> bool {
        false
    }
}

#[async_trait]
impl GarageResolver for DemoGarage {
    async fn resolve_garage(&self, address: &str) -> Result<String> {
        Ok(format!("demo-garage-for-{address}"))
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_env_filter("info").init();

    println!("Session Demo");
    println!("============\n");

    // Build the coordinator first so the scripted transport can feed link
    // events back into its stream.
    let (seed_tx, mut seed_rx) = mpsc::unbounded_channel();

    let coordinator = SessionCoordinator::new(SessionDeps {
        settings: Arc::new(InMemorySettings::new(AppSettings {
            auto_log: true,
            auto_watch: true,
            use_beep_on_volume_up: true,
            ..Default::default()
        })),
        logger: Arc::new(ConsoleLogger),
        mirror: Arc::new(ConsoleMirror),
        notifier: Arc::new(ConsoleNotifier),
        beeper: Arc::new(ConsoleBeeper),
        transport: Arc::new(ScriptedTransport { events: seed_tx }),
        garage: Arc::new(DemoGarage),
    });

    let events = coordinator.sender();
    let loop_task = tokio::spawn(coordinator.run());

    // Forward the transport's scripted link events into the coordinator.
    let forward = events.clone();
    tokio::spawn(async move {
        while let Some(event) = seed_rx.recv().await {
            let _ = forward.send(event);
        }
    });

    // Scripted session: connect, ride, toggle the band mode, disconnect.
    events.send(SessionEvent::User(UserCommand::Connect)).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    for speed in [0.0, 2.5, 12.8, 18.3] {
        events
            .send(SessionEvent::TelemetryAvailable { speed })
            .unwrap();
    }

    events
        .send(SessionEvent::User(UserCommand::ToggleCompanionBandMode))
        .unwrap();
    events.send(SessionEvent::User(UserCommand::Disconnect)).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;

    events.send(SessionEvent::Shutdown).unwrap();
    let _ = loop_task.await;

    println!("\nDone.");
}
