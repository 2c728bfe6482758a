use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orientation2D {
    pub angle: f64, // Angle in radians
}

/// One observation of one agent. Immutable once read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    pub frame: i64,
    pub position: Position3D,
    pub orientation: Option<Orientation2D>,
}

/// The full frame-indexed position history of one agent, ordered by frame.
/// Frames are strictly increasing within a track; a duplicate or backwards
/// frame is a data error of the source, not something to deduplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentTrack {
    pub agent_id: i64,
    samples: Vec<TrajectorySample>,
}

impl AgentTrack {
    pub fn new(agent_id: i64, samples: Vec<TrajectorySample>) -> DomainResult<Self> {
        for pair in samples.windows(2) {
            if pair[1].frame <= pair[0].frame {
                return Err(DomainError::NonMonotonicTrack {
                    agent_id,
                    frame: pair[1].frame,
                });
            }
        }
        Ok(Self { agent_id, samples })
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Static polygon or polyline boundary from the simulated environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryGeometry {
    pub vertices: Vec<Position3D>,
    /// Closed for room polygons, open for wall polylines.
    pub closed: bool,
}

/// Everything a trajectory source yields: per-agent tracks and the static
/// boundary geometry. Tracks may cover differing frame ranges, agents enter
/// and leave the simulation at different times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationData {
    pub tracks: Vec<AgentTrack>,
    pub boundaries: Vec<BoundaryGeometry>,
}

impl SimulationData {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty() && self.boundaries.is_empty()
    }
}
