//! JSON event files: module geometry plus the activated cells.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;
use spacepix_core::glam::{DMat3, DVec3};
use spacepix_core::{sort_cells, Cell, Module};

use crate::Result;

/// Module entry of an event file.
///
/// `rotation` is row-major; omitted fields fall back to an identity
/// placement, a zero origin and a zero threshold.
#[derive(Debug, Deserialize)]
struct ModuleRecord {
    pitch: [f64; 2],
    #[serde(default)]
    origin: [f64; 2],
    #[serde(default)]
    threshold: f64,
    #[serde(default = "identity_rotation")]
    rotation: [[f64; 3]; 3],
    #[serde(default)]
    translation: [f64; 3],
}

fn identity_rotation() -> [[f64; 3]; 3] {
    [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
}

impl From<ModuleRecord> for Module {
    fn from(record: ModuleRecord) -> Self {
        let rotation = DMat3::from_cols_array_2d(&record.rotation).transpose();
        Module::new(record.pitch[0], record.pitch[1])
            .with_origin(record.origin[0], record.origin[1])
            .with_threshold(record.threshold)
            .with_placement(rotation, DVec3::from_array(record.translation))
    }
}

#[derive(Debug, Deserialize)]
struct EventRecord {
    modules: Vec<ModuleRecord>,
    cells: Vec<Cell>,
}

/// A loaded event, cells sorted for clustering.
#[derive(Debug, Clone)]
pub struct Event {
    pub modules: Vec<Module>,
    pub cells: Vec<Cell>,
}

impl Event {
    /// Parses an event from a JSON string.
    #[cfg(test)]
    pub fn from_json(json: &str) -> Result<Self> {
        let record: EventRecord = serde_json::from_str(json)?;
        Ok(Self::from_record(record))
    }

    /// Loads an event from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let record: EventRecord = serde_json::from_reader(BufReader::new(file))?;
        Ok(Self::from_record(record))
    }

    fn from_record(record: EventRecord) -> Self {
        let modules = record.modules.into_iter().map(Module::from).collect();
        let mut cells = record.cells;
        sort_cells(&mut cells);
        Self { modules, cells }
    }
}
