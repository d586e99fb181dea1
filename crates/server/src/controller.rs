use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use engine::gate::GestureGate;
use engine::timedial::{format_hhmm, TimeDial};
use shared::domain::HandSample;
use shared::error::PipelineError;
use shared::protocol::Event;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::hub::Hub;

/// Per-frame hand samples from the camera collaborator. Frames without a
/// visible hand never surface here.
#[async_trait]
pub trait HandSource: Send {
    async fn next(&mut self) -> Result<HandSample, PipelineError>;
}

pub struct ChannelSource {
    samples: mpsc::Receiver<HandSample>,
}

impl ChannelSource {
    pub fn new(samples: mpsc::Receiver<HandSample>) -> Self {
        Self { samples }
    }
}

#[async_trait]
impl HandSource for ChannelSource {
    async fn next(&mut self) -> Result<HandSample, PipelineError> {
        self.samples.recv().await.ok_or(PipelineError::Disconnected)
    }
}

/// Maps the hand-position signal to a time of day and reports it while the
/// gesture gate is open. Non-commit updates are rate limited to one per
/// interval, computed from the most recent sample; a fist (or the gate
/// closing externally) reports the final time immediately, exactly once
/// per active phase.
pub struct Controller {
    dial: TimeDial,
    gate: GestureGate,
    hub: Arc<Hub>,
    update_interval: Duration,
    retry_backoff: Duration,
}

impl Controller {
    pub fn new(
        dial: TimeDial,
        gate: GestureGate,
        hub: Arc<Hub>,
        update_interval: Duration,
        retry_backoff: Duration,
    ) -> Self {
        Self {
            dial,
            gate,
            hub,
            update_interval,
            retry_backoff,
        }
    }

    pub async fn run(self, mut source: impl HandSource, mut shutdown: watch::Receiver<bool>) {
        let mut enabled = self.gate.subscribe();

        'outer: loop {
            // Gate closed: discard incoming frames and wait for a change.
            // Biased so an opening gate wins over a frame arriving with it.
            while !*enabled.borrow() {
                tokio::select! {
                    biased;
                    changed = enabled.changed() => {
                        if changed.is_err() {
                            break 'outer;
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break 'outer;
                        }
                    }
                    discarded = source.next() => {
                        if let Err(error) = discarded {
                            warn!(%error, "hand pipeline unavailable");
                            tokio::time::sleep(self.retry_backoff).await;
                        }
                    }
                }
                if *shutdown.borrow() {
                    break 'outer;
                }
            }

            info!("time adjustment active");
            let mut current = self.dial.base_minutes();
            let mut dirty = false;
            let mut ticker = interval(self.update_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    sample = source.next() => match sample {
                        Ok(sample) if sample.fist => {
                            self.finish(current);
                            break;
                        }
                        Ok(sample) => {
                            current = self.dial.minutes_for(sample.x);
                            dirty = true;
                        }
                        Err(error) => {
                            warn!(%error, "hand pipeline unavailable, backing off");
                            tokio::time::sleep(self.retry_backoff).await;
                        }
                    },
                    _ = ticker.tick() => {
                        if dirty {
                            dirty = false;
                            self.hub.publish(&Event::GestureTimeUpdate {
                                time: format_hhmm(current),
                                minutes: current,
                            });
                        }
                    }
                    changed = enabled.changed() => {
                        if changed.is_err() || !*enabled.borrow() {
                            self.finish(current);
                            break;
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break 'outer;
                        }
                    }
                }
                if *shutdown.borrow() {
                    break 'outer;
                }
            }
        }
    }

    fn finish(&self, minutes: i32) {
        self.hub.publish(&Event::GestureTimeFinal {
            time: format_hhmm(minutes),
            minutes,
        });
        self.hub.publish(&Event::GestureModeToggled { enabled: false });
        self.gate.disable();
        info!(minutes, "time adjustment finished");
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
