use std::fs;

use serde::Deserialize;
use shared::domain::{MedicationTable, SymbolMap};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Settings {
    pub listen_addr: String,
    pub intake_addr: String,
    pub backlog: u32,
    pub proximity_threshold: f64,
    pub base_minutes: i32,
    pub max_adjustment_minutes: i32,
    pub update_interval_ms: u64,
    pub read_timeout_ms: u64,
    pub retry_backoff_secs: u64,
    pub symbols: SymbolMap,
    pub medications: MedicationTable,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8765".into(),
            intake_addr: "0.0.0.0:3333".into(),
            backlog: 8,
            proximity_threshold: 0.08,
            base_minutes: 450,
            max_adjustment_minutes: 240,
            update_interval_ms: 500,
            read_timeout_ms: 500,
            retry_backoff_secs: 5,
            symbols: SymbolMap::default(),
            medications: MedicationTable::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    listen_addr: Option<String>,
    intake_addr: Option<String>,
    backlog: Option<u32>,
    proximity_threshold: Option<f64>,
    base_minutes: Option<i32>,
    max_adjustment_minutes: Option<i32>,
    update_interval_ms: Option<u64>,
    read_timeout_ms: Option<u64>,
    retry_backoff_secs: Option<u64>,
    symbols: Option<SymbolMap>,
    medications: Option<Vec<String>>,
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file) => apply_file(&mut settings, file),
            Err(error) => warn!(%error, "ignoring unreadable server.toml"),
        }
    }

    if let Ok(v) = std::env::var("LISTEN_ADDR") {
        settings.listen_addr = v;
    }
    if let Ok(v) = std::env::var("APP__LISTEN_ADDR") {
        settings.listen_addr = v;
    }

    if let Ok(v) = std::env::var("INTAKE_ADDR") {
        settings.intake_addr = v;
    }
    if let Ok(v) = std::env::var("APP__INTAKE_ADDR") {
        settings.intake_addr = v;
    }

    settings
}

fn apply_file(settings: &mut Settings, file: FileSettings) {
    if let Some(v) = file.listen_addr {
        settings.listen_addr = v;
    }
    if let Some(v) = file.intake_addr {
        settings.intake_addr = v;
    }
    if let Some(v) = file.backlog {
        settings.backlog = v;
    }
    if let Some(v) = file.proximity_threshold {
        settings.proximity_threshold = v;
    }
    if let Some(v) = file.base_minutes {
        settings.base_minutes = v;
    }
    if let Some(v) = file.max_adjustment_minutes {
        settings.max_adjustment_minutes = v;
    }
    if let Some(v) = file.update_interval_ms {
        settings.update_interval_ms = v;
    }
    if let Some(v) = file.read_timeout_ms {
        settings.read_timeout_ms = v;
    }
    if let Some(v) = file.retry_backoff_secs {
        settings.retry_backoff_secs = v;
    }
    if let Some(v) = file.symbols {
        settings.symbols = v;
    }
    if let Some(v) = file.medications {
        settings.medications = MedicationTable::new(v);
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
