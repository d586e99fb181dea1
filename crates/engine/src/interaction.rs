use std::f64::consts::TAU;
use std::sync::Arc;

use shared::domain::{MarkerEvent, MarkerEventKind, MedicationTable, SymbolMap, TrackedObject};
use shared::protocol::{Event, WheelMarker};

use crate::gate::GestureGate;
use crate::registry::Registry;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub symbols: SymbolMap,
    pub medications: MedicationTable,
    /// Two markers closer than this (strictly) count as a placed-together
    /// confirm gesture, in normalized table coordinates.
    pub proximity_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            symbols: SymbolMap::default(),
            medications: MedicationTable::default(),
            proximity_threshold: 0.08,
        }
    }
}

/// Normalize an angle into `[0, 2π)` and map it onto one of `sectors`
/// equal arcs, sector 0 starting at angle 0.
pub fn sector_for(angle: f64, sectors: usize) -> (f64, usize) {
    let theta = angle.rem_euclid(TAU);
    let sector = ((theta / TAU) * sectors as f64) as usize % sectors;
    (theta, sector)
}

/// Translates canonical marker events into semantic events. Each call
/// applies the registry mutation for the event, then evaluates every
/// per-symbol reaction rule; the returned vector is the emission order
/// the caller must publish in.
pub struct Engine {
    registry: Arc<Registry>,
    gate: GestureGate,
    config: EngineConfig,
}

impl Engine {
    pub fn new(registry: Arc<Registry>, gate: GestureGate, config: EngineConfig) -> Self {
        Self {
            registry,
            gate,
            config,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn handle(&self, event: &MarkerEvent) -> Vec<Event> {
        match event.kind {
            MarkerEventKind::Add | MarkerEventKind::Update => self.registry.upsert(event.object),
            MarkerEventKind::Remove => {
                self.registry.remove(event.object.session);
            }
        }

        let mut out = vec![Event::TuioObj { payload: *event }];

        let object = &event.object;
        let symbols = &self.config.symbols;
        let added = event.kind == MarkerEventKind::Add;
        let moved = added || event.kind == MarkerEventKind::Update;

        if object.symbol == symbols.rotate_wheel {
            if added {
                out.push(Event::WheelOpen {
                    x: object.x,
                    y: object.y,
                    marker: WheelMarker::Patient,
                });
            }
            if moved {
                self.patient_wheel(object, &mut out);
            }
        }

        if object.symbol == symbols.nurse_mode {
            if added {
                out.push(Event::NurseWheelOpen {
                    x: object.x,
                    y: object.y,
                });
            }
            if moved {
                self.nurse_wheel(object, &mut out);
            }
        }

        if object.symbol == symbols.back && added {
            self.gate.disable();
            out.push(Event::BackPressed);
        }

        if object.symbol == symbols.edit_medications && added {
            let nurse_nearby = self
                .registry
                .snapshot()
                .iter()
                .any(|other| other.symbol == symbols.nurse_mode && self.nearby(other, object));
            if !nurse_nearby {
                self.gate.enable();
                out.push(Event::GestureModeToggled { enabled: true });
            }
        }

        out
    }

    fn patient_wheel(&self, wheel: &TrackedObject, out: &mut Vec<Event>) {
        let (theta, sector) = sector_for(wheel.angle, self.config.medications.sectors());
        let medication = self.config.medications.name(sector);
        out.push(Event::WheelHover {
            sector,
            angle: theta,
            x: wheel.x,
            y: wheel.y,
            medication: medication.to_string(),
            marker: WheelMarker::Patient,
        });

        for other in self.registry.snapshot() {
            if other.symbol == self.config.symbols.selector && self.nearby(&other, wheel) {
                out.push(Event::WheelSelectConfirm {
                    sector,
                    medication: medication.to_string(),
                    marker: WheelMarker::Patient,
                });
            }
        }
    }

    fn nurse_wheel(&self, wheel: &TrackedObject, out: &mut Vec<Event>) {
        let (theta, sector) = sector_for(wheel.angle, self.config.medications.sectors());
        let medication = self.config.medications.name(sector);
        out.push(Event::NurseWheelHover {
            sector,
            angle: theta,
            x: wheel.x,
            y: wheel.y,
            medication: medication.to_string(),
        });

        for other in self.registry.snapshot() {
            if other.symbol == self.config.symbols.view_patient_info && self.nearby(&other, wheel) {
                out.push(Event::NurseWheelSelectConfirm {
                    sector,
                    item: medication.to_string(),
                });
            } else if other.symbol == self.config.symbols.edit_medications
                && self.nearby(&other, wheel)
            {
                out.push(Event::NurseEditMedSelect {
                    sector,
                    medication: medication.to_string(),
                });
            }
        }
    }

    fn nearby(&self, a: &TrackedObject, b: &TrackedObject) -> bool {
        a.distance_to(b) < self.config.proximity_threshold
    }
}

#[cfg(test)]
#[path = "tests/interaction_tests.rs"]
mod tests;
