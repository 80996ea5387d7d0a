//! Serialization utilities with robust error handling.
//!
//! JSON export of snapshots and statistics.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to JSON with error handling.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from JSON string. Empty input is a validation error.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    Ok(serde_json::from_str(json)?)
}

/// Writes pretty JSON to `path`, replacing any existing file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })?;
    Ok(())
}

pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mycora_core::config::AppConfig;
    use mycora_core::snapshot::SimulationSnapshot;
    use mycora_core::Simulation;
    use mycora_data::{Coord, Extent};

    #[test]
    fn test_empty_json_rejected() {
        let result: Result<SimulationSnapshot> = from_json("   ");
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result: Result<SimulationSnapshot> = from_json("{\"tick\": ");
        assert!(matches!(result, Err(IoError::Json(_))));
    }

    #[test]
    fn test_snapshot_file_export() {
        let mut config = AppConfig::default();
        config.arena.width = 20;
        config.arena.height = 5;
        config.clock.seed = Some(1);
        let mut sim = Simulation::new(config).unwrap();
        sim.seed_genome(&[vec!['@', 'C', '$']], Coord::ZERO).unwrap();
        sim.run(5);
        let snapshot = sim.snapshot(Some((Coord::ZERO, Extent::new(6, 1))));

        let path = std::env::temp_dir().join(format!("mycora_snapshot_{}.json", std::process::id()));
        write_json_file(&snapshot, &path).unwrap();
        let restored: SimulationSnapshot = read_json_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(restored.tick, 5);
        assert_eq!(restored.organisms, snapshot.organisms);
        assert_eq!(restored.viewport, snapshot.viewport);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_json_file::<SimulationSnapshot, _>("/nonexistent/mycora.json").unwrap_err();
        assert!(err.to_string().contains("reading JSON"));
    }
}
