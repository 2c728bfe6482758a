use std::path::Path;

use rusqlite::{Connection, OpenFlags, OptionalExtension};

use crate::common::{ImportError, ImportResult};
use crate::domains::trajectory::{
    AgentTrack, BoundaryGeometry, Orientation2D, Position3D, SimulationData, TrajectorySample,
    TrajectoryStore,
};

/// Reads JuPedSim trajectory databases: a `trajectory_data` table with one
/// row per agent per frame, plus an optional `geometry` table of WKT
/// boundary strings. The source is opened read-only and never mutated.
pub struct SqliteTrajectoryStore {
    elevation: f64,
}

impl SqliteTrajectoryStore {
    /// `elevation` becomes the z coordinate of every imported position;
    /// the source format is two-dimensional.
    pub fn new(elevation: f64) -> Self {
        Self { elevation }
    }

    fn read_tracks(&self, conn: &Connection) -> ImportResult<Vec<AgentTrack>> {
        let with_orientation = has_column(conn, "trajectory_data", "ori_x")?
            && has_column(conn, "trajectory_data", "ori_y")?;
        let sql = if with_orientation {
            "SELECT id, frame, pos_x, pos_y, ori_x, ori_y FROM trajectory_data ORDER BY id, frame"
        } else {
            "SELECT id, frame, pos_x, pos_y, NULL, NULL FROM trajectory_data ORDER BY id, frame"
        };
        let mut stmt = conn.prepare(sql).map_err(unreadable)?;
        let mut rows = stmt.query([]).map_err(unreadable)?;

        let mut tracks = Vec::new();
        let mut current_id: Option<i64> = None;
        let mut samples: Vec<TrajectorySample> = Vec::new();
        while let Some(row) = rows.next().map_err(unreadable)? {
            let agent_id: i64 = row.get(0).map_err(unreadable)?;
            let frame: i64 = row.get(1).map_err(unreadable)?;
            let pos_x: f64 = row.get(2).map_err(unreadable)?;
            let pos_y: f64 = row.get(3).map_err(unreadable)?;
            let ori_x: Option<f64> = row.get(4).map_err(unreadable)?;
            let ori_y: Option<f64> = row.get(5).map_err(unreadable)?;

            if current_id != Some(agent_id) {
                if let Some(id) = current_id {
                    tracks.push(finish_track(id, std::mem::take(&mut samples))?);
                }
                current_id = Some(agent_id);
            }
            samples.push(TrajectorySample {
                frame,
                position: Position3D {
                    x: pos_x,
                    y: pos_y,
                    z: self.elevation,
                },
                orientation: match (ori_x, ori_y) {
                    (Some(x), Some(y)) => Some(Orientation2D { angle: y.atan2(x) }),
                    _ => None,
                },
            });
        }
        if let Some(id) = current_id {
            tracks.push(finish_track(id, samples)?);
        }
        Ok(tracks)
    }

    fn read_boundaries(&self, conn: &Connection) -> ImportResult<Vec<BoundaryGeometry>> {
        // Walls are optional in the source format.
        if !has_table(conn, "geometry")? {
            return Ok(Vec::new());
        }
        let mut stmt = conn.prepare("SELECT wkt FROM geometry").map_err(unreadable)?;
        let mut rows = stmt.query([]).map_err(unreadable)?;

        let mut boundaries = Vec::new();
        let mut index = 0usize;
        while let Some(row) = rows.next().map_err(unreadable)? {
            let wkt: String = row.get(0).map_err(unreadable)?;
            let boundary = parse_wkt(&wkt, self.elevation).map_err(|reason| {
                ImportError::SourceUnreadable {
                    reason: format!("geometry row {}: {}", index, reason),
                }
            })?;
            boundaries.push(boundary);
            index += 1;
        }
        Ok(boundaries)
    }
}

impl TrajectoryStore for SqliteTrajectoryStore {
    fn ensure_available(&self) -> ImportResult<()> {
        // The bundled SQLite library is linked at build time; an
        // unexpectedly old runtime version means an unusable backend.
        if rusqlite::version_number() < 3_007_016 {
            return Err(ImportError::DependencyMissing {
                reason: format!("SQLite {} is too old", rusqlite::version()),
            });
        }
        Ok(())
    }

    fn read(&self, source: &Path) -> ImportResult<SimulationData> {
        if !source.is_file() {
            return Err(ImportError::SourceUnreadable {
                reason: format!("no such file: {}", source.display()),
            });
        }
        let conn = Connection::open_with_flags(source, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(unreadable)?;

        let tracks = self.read_tracks(&conn)?;
        let boundaries = self.read_boundaries(&conn)?;
        if tracks.is_empty() && boundaries.is_empty() {
            return Err(ImportError::SourceEmpty {
                path: source.display().to_string(),
            });
        }
        Ok(SimulationData { tracks, boundaries })
    }
}

fn unreadable(err: rusqlite::Error) -> ImportError {
    ImportError::SourceUnreadable {
        reason: err.to_string(),
    }
}

fn finish_track(agent_id: i64, samples: Vec<TrajectorySample>) -> ImportResult<AgentTrack> {
    AgentTrack::new(agent_id, samples).map_err(|e| ImportError::SourceUnreadable {
        reason: e.to_string(),
    })
}

fn has_table(conn: &Connection, name: &str) -> ImportResult<bool> {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [name],
        |_| Ok(()),
    )
    .optional()
    .map(|found| found.is_some())
    .map_err(unreadable)
}

fn has_column(conn: &Connection, table: &str, column: &str) -> ImportResult<bool> {
    let mut stmt = conn
        .prepare(&format!("PRAGMA table_info({})", table))
        .map_err(unreadable)?;
    let mut rows = stmt.query([]).map_err(unreadable)?;
    while let Some(row) = rows.next().map_err(unreadable)? {
        let name: String = row.get(1).map_err(unreadable)?;
        if name == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Minimal parser for the two WKT shapes the source format emits.
/// `POLYGON ((x y, ...))` becomes a closed boundary with the repeated
/// closing vertex dropped; `LINESTRING (x y, ...)` an open one. Only the
/// exterior ring of a polygon is used.
fn parse_wkt(text: &str, elevation: f64) -> Result<BoundaryGeometry, String> {
    let upper = text.trim().to_ascii_uppercase();
    if let Some(rest) = upper.strip_prefix("POLYGON") {
        let mut vertices = parse_coordinates(exterior_ring(rest)?, elevation)?;
        if vertices.len() > 1 && vertices.first() == vertices.last() {
            vertices.pop();
        }
        Ok(BoundaryGeometry {
            vertices,
            closed: true,
        })
    } else if let Some(rest) = upper.strip_prefix("LINESTRING") {
        let vertices = parse_coordinates(coordinate_list(rest)?, elevation)?;
        Ok(BoundaryGeometry {
            vertices,
            closed: false,
        })
    } else {
        Err(format!("unsupported WKT shape: {}", text.trim()))
    }
}

fn exterior_ring(rest: &str) -> Result<&str, String> {
    let open = rest
        .find("((")
        .ok_or_else(|| "missing '((' in POLYGON".to_string())?;
    let body = &rest[open + 2..];
    let close = body
        .find(')')
        .ok_or_else(|| "missing ')' in POLYGON".to_string())?;
    Ok(&body[..close])
}

fn coordinate_list(rest: &str) -> Result<&str, String> {
    let open = rest
        .find('(')
        .ok_or_else(|| "missing '(' in LINESTRING".to_string())?;
    let body = &rest[open + 1..];
    let close = body
        .find(')')
        .ok_or_else(|| "missing ')' in LINESTRING".to_string())?;
    Ok(&body[..close])
}

fn parse_coordinates(body: &str, elevation: f64) -> Result<Vec<Position3D>, String> {
    let mut vertices = Vec::new();
    for chunk in body.split(',') {
        let coords: Vec<&str> = chunk.split_whitespace().collect();
        if coords.len() < 2 || coords.len() > 3 {
            return Err(format!("bad coordinate: '{}'", chunk.trim()));
        }
        let x = parse_number(coords[0])?;
        let y = parse_number(coords[1])?;
        let z = if coords.len() == 3 {
            parse_number(coords[2])?
        } else {
            elevation
        };
        vertices.push(Position3D { x, y, z });
    }
    Ok(vertices)
}

fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|e| format!("bad number '{}': {}", text, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polygon_drops_repeated_closing_vertex() {
        let boundary = parse_wkt("POLYGON ((0 0, 10 0, 5 8, 0 0))", 0.0).unwrap();
        assert!(boundary.closed);
        assert_eq!(boundary.vertices.len(), 3);
        assert_eq!(boundary.vertices[2], Position3D { x: 5.0, y: 8.0, z: 0.0 });
    }

    #[test]
    fn test_polygon_with_hole_uses_exterior_ring() {
        let boundary = parse_wkt(
            "POLYGON ((0 0, 4 0, 4 4, 0 4, 0 0), (1 1, 2 1, 2 2, 1 1))",
            0.0,
        )
        .unwrap();
        assert!(boundary.closed);
        assert_eq!(boundary.vertices.len(), 4);
    }

    #[test]
    fn test_linestring_stays_open() {
        let boundary = parse_wkt("LINESTRING (0 0, 3.5 -1.25)", 0.5).unwrap();
        assert!(!boundary.closed);
        assert_eq!(boundary.vertices.len(), 2);
        assert_eq!(
            boundary.vertices[1],
            Position3D { x: 3.5, y: -1.25, z: 0.5 }
        );
    }

    #[test]
    fn test_explicit_z_coordinate_wins_over_elevation() {
        let boundary = parse_wkt("LINESTRING (0 0 1, 1 1 2)", 9.0).unwrap();
        assert_eq!(boundary.vertices[0].z, 1.0);
        assert_eq!(boundary.vertices[1].z, 2.0);
    }

    #[test]
    fn test_unsupported_shape_is_rejected() {
        assert!(parse_wkt("POINT (1 2)", 0.0).is_err());
        assert!(parse_wkt("POLYGON ((0 0, banana 1))", 0.0).is_err());
        assert!(parse_wkt("", 0.0).is_err());
    }
}
