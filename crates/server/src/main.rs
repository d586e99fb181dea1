use std::sync::Arc;
use std::time::Duration;

use engine::gate::GestureGate;
use engine::interaction::{Engine, EngineConfig};
use engine::registry::Registry;
use engine::timedial::TimeDial;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tracing::info;

mod config;
mod controller;
mod hub;
mod intake;
mod net;

use config::load_settings;
use controller::{ChannelSource, Controller};
use hub::Hub;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();

    let gate = GestureGate::new();
    let engine = Arc::new(Engine::new(
        Arc::new(Registry::new()),
        gate.clone(),
        EngineConfig {
            symbols: settings.symbols,
            medications: settings.medications.clone(),
            proximity_threshold: settings.proximity_threshold,
        },
    ));
    let hub = Arc::new(Hub::new());

    let listener = net::bind_listener(&settings.listen_addr, settings.backlog)?;
    info!(addr = %settings.listen_addr, "event stream listening");

    let intake_socket = UdpSocket::bind(&settings.intake_addr).await?;
    info!(addr = %settings.intake_addr, "collaborator intake listening");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (hand_tx, hand_rx) = mpsc::channel(64);

    tokio::spawn(net::run_acceptor(
        listener,
        Arc::clone(&hub),
        Duration::from_millis(settings.read_timeout_ms),
        shutdown_rx.clone(),
    ));
    tokio::spawn(intake::run_intake(
        intake_socket,
        Arc::clone(&engine),
        Arc::clone(&hub),
        hand_tx,
        shutdown_rx.clone(),
    ));

    let dial = TimeDial::new(settings.base_minutes, settings.max_adjustment_minutes);
    let time_controller = Controller::new(
        dial,
        gate,
        Arc::clone(&hub),
        Duration::from_millis(settings.update_interval_ms),
        Duration::from_secs(settings.retry_backoff_secs),
    );
    tokio::spawn(time_controller.run(ChannelSource::new(hand_rx), shutdown_rx));

    tokio::signal::ctrl_c().await?;
    info!("shutting down");
    let _ = shutdown_tx.send(true);
    // Let subscriber tasks flush and close before the process exits.
    tokio::time::sleep(Duration::from_millis(300)).await;
    Ok(())
}
