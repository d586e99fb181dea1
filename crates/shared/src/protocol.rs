use serde::{Deserialize, Serialize};

use crate::domain::MarkerEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelMarker {
    Patient,
}

/// Everything the server ever writes to a subscriber, one record per line.
/// Emission order at a single callsite defines the order subscribers observe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TuioObj {
        payload: MarkerEvent,
    },
    WheelOpen {
        x: f64,
        y: f64,
        marker: WheelMarker,
    },
    WheelHover {
        sector: usize,
        angle: f64,
        x: f64,
        y: f64,
        medication: String,
        marker: WheelMarker,
    },
    WheelSelectConfirm {
        sector: usize,
        medication: String,
        marker: WheelMarker,
    },
    NurseWheelOpen {
        x: f64,
        y: f64,
    },
    NurseWheelHover {
        sector: usize,
        angle: f64,
        x: f64,
        y: f64,
        medication: String,
    },
    NurseWheelSelectConfirm {
        sector: usize,
        item: String,
    },
    NurseEditMedSelect {
        sector: usize,
        medication: String,
    },
    BackPressed,
    GestureModeToggled {
        enabled: bool,
    },
    GestureTimeUpdate {
        time: String,
        minutes: i32,
    },
    GestureTimeFinal {
        time: String,
        minutes: i32,
    },
}
