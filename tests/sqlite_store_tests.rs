use std::path::PathBuf;

use rusqlite::Connection;
use tempfile::TempDir;

use jupedsim_scene::adapters::inbound::SqliteTrajectoryStore;
use jupedsim_scene::common::ImportError;
use jupedsim_scene::domains::trajectory::TrajectoryStore;

fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("trajectories.sqlite")
}

fn create_trajectory_table(conn: &Connection, with_orientation: bool) {
    let sql = if with_orientation {
        "CREATE TABLE trajectory_data (frame INTEGER, id INTEGER, pos_x REAL, pos_y REAL, ori_x REAL, ori_y REAL)"
    } else {
        "CREATE TABLE trajectory_data (frame INTEGER, id INTEGER, pos_x REAL, pos_y REAL)"
    };
    conn.execute(sql, []).unwrap();
}

fn insert_sample(conn: &Connection, frame: i64, id: i64, x: f64, y: f64) {
    conn.execute(
        "INSERT INTO trajectory_data (frame, id, pos_x, pos_y) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![frame, id, x, y],
    )
    .unwrap();
}

fn insert_oriented_sample(
    conn: &Connection,
    frame: i64,
    id: i64,
    x: f64,
    y: f64,
    ori: Option<(f64, f64)>,
) {
    conn.execute(
        "INSERT INTO trajectory_data (frame, id, pos_x, pos_y, ori_x, ori_y) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![frame, id, x, y, ori.map(|o| o.0), ori.map(|o| o.1)],
    )
    .unwrap();
}

fn create_geometry_table(conn: &Connection, rows: &[&str]) {
    conn.execute("CREATE TABLE geometry (wkt TEXT)", []).unwrap();
    for wkt in rows {
        conn.execute("INSERT INTO geometry (wkt) VALUES (?1)", [wkt])
            .unwrap();
    }
}

#[test]
fn test_reads_tracks_grouped_by_agent() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    // Frame-major insertion order; agents enter and leave at different times.
    insert_sample(&conn, 0, 1, 0.0, 0.0);
    insert_sample(&conn, 0, 2, 5.0, 5.0);
    insert_sample(&conn, 1, 1, 0.5, 0.0);
    insert_sample(&conn, 1, 2, 5.0, 5.5);
    insert_sample(&conn, 2, 1, 1.0, 0.0);
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    let data = store.read(&path).unwrap();

    assert_eq!(data.tracks.len(), 2);
    assert_eq!(data.tracks[0].agent_id, 1);
    assert_eq!(data.tracks[0].len(), 3);
    assert_eq!(data.tracks[1].agent_id, 2);
    assert_eq!(data.tracks[1].len(), 2);

    let frames: Vec<i64> = data.tracks[0].samples().iter().map(|s| s.frame).collect();
    assert_eq!(frames, vec![0, 1, 2]);
    assert!(data.boundaries.is_empty());
    assert!(data.tracks[0].samples()[0].orientation.is_none());
}

#[test]
fn test_elevation_is_applied_to_positions() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    insert_sample(&conn, 0, 1, 2.0, 3.0);
    drop(conn);

    let store = SqliteTrajectoryStore::new(1.5);
    let data = store.read(&path).unwrap();
    let position = &data.tracks[0].samples()[0].position;
    assert_eq!(position.x, 2.0);
    assert_eq!(position.y, 3.0);
    assert_eq!(position.z, 1.5);
}

#[test]
fn test_orientation_angle_from_direction_vector() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, true);
    insert_oriented_sample(&conn, 0, 1, 0.0, 0.0, Some((0.0, 1.0)));
    insert_oriented_sample(&conn, 1, 1, 0.0, 1.0, None);
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    let data = store.read(&path).unwrap();
    let samples = data.tracks[0].samples();

    let angle = samples[0].orientation.as_ref().unwrap().angle;
    assert!((angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    assert!(samples[1].orientation.is_none());
}

#[test]
fn test_duplicate_frame_is_a_source_error() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    insert_sample(&conn, 0, 1, 0.0, 0.0);
    insert_sample(&conn, 1, 1, 0.5, 0.0);
    insert_sample(&conn, 1, 1, 0.6, 0.0);
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    match store.read(&path) {
        Err(ImportError::SourceUnreadable { reason }) => {
            assert!(reason.contains("agent 1"), "unexpected reason: {}", reason)
        }
        other => panic!("Expected SourceUnreadable, got {:?}", other),
    }
}

#[test]
fn test_missing_file_is_unreadable() {
    let store = SqliteTrajectoryStore::new(0.0);
    match store.read(&PathBuf::from("/nonexistent/trajectories.sqlite")) {
        Err(ImportError::SourceUnreadable { .. }) => {}
        other => panic!("Expected SourceUnreadable, got {:?}", other),
    }
}

#[test]
fn test_garbage_file_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    std::fs::write(&path, "this is not a database").unwrap();

    let store = SqliteTrajectoryStore::new(0.0);
    match store.read(&path) {
        Err(ImportError::SourceUnreadable { .. }) => {}
        other => panic!("Expected SourceUnreadable, got {:?}", other),
    }
}

#[test]
fn test_wrong_schema_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    conn.execute("CREATE TABLE something_else (a INTEGER)", [])
        .unwrap();
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    match store.read(&path) {
        Err(ImportError::SourceUnreadable { .. }) => {}
        other => panic!("Expected SourceUnreadable, got {:?}", other),
    }
}

#[test]
fn test_no_agents_and_no_geometry_is_empty() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    match store.read(&path) {
        Err(ImportError::SourceEmpty { .. }) => {}
        other => panic!("Expected SourceEmpty, got {:?}", other),
    }
}

#[test]
fn test_geometry_only_source_is_readable() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    create_geometry_table(&conn, &["LINESTRING (0 0, 4 0)"]);
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    let data = store.read(&path).unwrap();
    assert!(data.tracks.is_empty());
    assert_eq!(data.boundaries.len(), 1);
    assert!(!data.boundaries[0].closed);
}

#[test]
fn test_polygon_and_linestring_boundaries() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    insert_sample(&conn, 0, 1, 0.0, 0.0);
    create_geometry_table(
        &conn,
        &[
            "POLYGON ((0 0, 10 0, 5 8, 0 0))",
            "LINESTRING (0 0, 0 10, 10 10)",
        ],
    );
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.25);
    let data = store.read(&path).unwrap();

    assert_eq!(data.boundaries.len(), 2);
    let polygon = &data.boundaries[0];
    assert!(polygon.closed);
    assert_eq!(polygon.vertices.len(), 3);
    assert_eq!(polygon.vertices[0].z, 0.25);

    let wall = &data.boundaries[1];
    assert!(!wall.closed);
    assert_eq!(wall.vertices.len(), 3);
}

#[test]
fn test_bad_wkt_is_unreadable() {
    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let conn = Connection::open(&path).unwrap();
    create_trajectory_table(&conn, false);
    insert_sample(&conn, 0, 1, 0.0, 0.0);
    create_geometry_table(&conn, &["CIRCLE (1 2 3)"]);
    drop(conn);

    let store = SqliteTrajectoryStore::new(0.0);
    match store.read(&path) {
        Err(ImportError::SourceUnreadable { reason }) => {
            assert!(reason.contains("geometry row 0"), "unexpected reason: {}", reason)
        }
        other => panic!("Expected SourceUnreadable, got {:?}", other),
    }
}

#[test]
fn test_backend_probe_succeeds() {
    let store = SqliteTrajectoryStore::new(0.0);
    assert!(store.ensure_available().is_ok());
}
