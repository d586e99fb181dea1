use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident, $repr:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub $repr);
    };
}

id_newtype!(SessionId, i64);
id_newtype!(SymbolId, i32);

/// Latest reported pose of one physical marker on the sensing surface.
/// Identity is the transient `session`; `symbol` names the marker's role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedObject {
    #[serde(rename = "symbol_id")]
    pub symbol: SymbolId,
    #[serde(rename = "session_id")]
    pub session: SessionId,
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl TrackedObject {
    pub fn distance_to(&self, other: &TrackedObject) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerEventKind {
    Add,
    Update,
    Remove,
}

/// Canonical inbound record from the tracking collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarkerEvent {
    #[serde(rename = "event")]
    pub kind: MarkerEventKind,
    #[serde(flatten)]
    pub object: TrackedObject,
}

/// One frame's worth of output from the camera collaborator. Frames without
/// a visible hand produce no sample at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandSample {
    pub x: f64,
    pub fist: bool,
}

/// The closed command vocabulary: which symbol id plays which role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolMap {
    pub rotate_wheel: SymbolId,
    pub selector: SymbolId,
    pub back: SymbolId,
    pub nurse_mode: SymbolId,
    pub view_patient_info: SymbolId,
    pub edit_medications: SymbolId,
}

impl Default for SymbolMap {
    fn default() -> Self {
        Self {
            rotate_wheel: SymbolId(0),
            selector: SymbolId(1),
            back: SymbolId(12),
            nurse_mode: SymbolId(13),
            view_patient_info: SymbolId(14),
            edit_medications: SymbolId(15),
        }
    }
}

/// Ordered sector labels for the rotation wheels. The table length defines
/// the number of sectors; an empty table falls back to the default set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationTable(Vec<String>);

impl Default for MedicationTable {
    fn default() -> Self {
        Self(
            [
                "Paracetamol",
                "Amoxicillin",
                "Aspirin",
                "Metformin",
                "Lisinopril",
                "Atorvastatin",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        )
    }
}

impl MedicationTable {
    pub fn new(entries: Vec<String>) -> Self {
        if entries.is_empty() {
            Self::default()
        } else {
            Self(entries)
        }
    }

    pub fn sectors(&self) -> usize {
        self.0.len()
    }

    pub fn name(&self, sector: usize) -> &str {
        &self.0[sector % self.0.len()]
    }
}
