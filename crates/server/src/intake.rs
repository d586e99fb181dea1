use std::sync::Arc;

use engine::interaction::Engine;
use serde::Deserialize;
use shared::domain::{HandSample, MarkerEvent, MarkerEventKind, SessionId, SymbolId, TrackedObject};
use shared::error::IntakeError;
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, watch};
use tracing::warn;

use crate::hub::Hub;

/// One datagram line from a collaborator, before canonicalization.
#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum IntakeRecord {
    Tracker(RawMarkerRecord),
    Hand(RawHandRecord),
}

/// The tracking collaborator's record, with every field-name variant the
/// upstream decoders are known to produce. Name resolution happens here,
/// once; the core only ever sees the canonical shape.
#[derive(Debug, Deserialize)]
pub struct RawMarkerRecord {
    pub event: MarkerEventKind,
    #[serde(
        alias = "fiducial_id",
        alias = "class_id",
        alias = "pattern_id"
    )]
    pub symbol_id: i32,
    pub session_id: i64,
    #[serde(default = "center", alias = "xpos", alias = "x_pos")]
    pub x: f64,
    #[serde(default = "center", alias = "ypos", alias = "y_pos")]
    pub y: f64,
    #[serde(default)]
    pub angle: f64,
}

fn center() -> f64 {
    0.5
}

impl RawMarkerRecord {
    pub fn canonical(&self) -> MarkerEvent {
        MarkerEvent {
            kind: self.event,
            object: TrackedObject {
                symbol: SymbolId(self.symbol_id),
                session: SessionId(self.session_id),
                x: self.x,
                y: self.y,
                angle: self.angle,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawHandRecord {
    pub x: f64,
    #[serde(default)]
    pub fist: bool,
}

pub fn parse_record(line: &str) -> Result<IntakeRecord, IntakeError> {
    Ok(serde_json::from_str(line)?)
}

/// Receive loop for the collaborator datagram socket. Tracker records run
/// through the engine and their emissions publish in order; hand records
/// feed the controller. Malformed records are logged and dropped without
/// touching registry state or any subscriber.
pub async fn run_intake(
    socket: UdpSocket,
    engine: Arc<Engine>,
    hub: Arc<Hub>,
    hands: mpsc::Sender<HandSample>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut buf = vec![0u8; 4096];
    loop {
        tokio::select! {
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, _peer)) => {
                    let Ok(text) = std::str::from_utf8(&buf[..len]) else {
                        warn!(error = %IntakeError::Encoding, "dropping datagram");
                        continue;
                    };
                    for line in text.lines().filter(|l| !l.trim().is_empty()) {
                        dispatch(line, &engine, &hub, &hands);
                    }
                }
                Err(error) => warn!(%error, "intake receive failed"),
            },
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
        if *shutdown.borrow() {
            break;
        }
    }
}

fn dispatch(line: &str, engine: &Engine, hub: &Hub, hands: &mpsc::Sender<HandSample>) {
    match parse_record(line) {
        Ok(IntakeRecord::Tracker(raw)) => {
            for event in engine.handle(&raw.canonical()) {
                hub.publish(&event);
            }
        }
        Ok(IntakeRecord::Hand(raw)) => {
            let sample = HandSample {
                x: raw.x,
                fist: raw.fist,
            };
            // Frame samples are disposable; a full queue just drops this one.
            let _ = hands.try_send(sample);
        }
        Err(error) => warn!(%error, "dropping malformed intake record"),
    }
}

#[cfg(test)]
#[path = "tests/intake_tests.rs"]
mod tests;
