use std::path::Path;

use crate::common::ImportResult;

use super::types::SimulationData;

/// Port trait the import pipeline depends on for reading trajectory sources.
/// Implementations (adapters) provide SQLite or in-memory backed stores.
pub trait TrajectoryStore: Send + Sync {
    /// Probe that the reading backend is usable in this environment.
    /// Surfaced before any read is attempted, so a missing backend is
    /// reported distinctly from an unreadable source.
    fn ensure_available(&self) -> ImportResult<()>;

    /// Extract all agent tracks and boundary geometry from the source.
    /// Must not mutate any state beyond opening and closing the source.
    fn read(&self, source: &Path) -> ImportResult<SimulationData>;
}
