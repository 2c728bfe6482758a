use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use jupedsim_scene::adapters::inbound::SqliteTrajectoryStore;
use jupedsim_scene::adapters::outbound::{MemoryScene, TracingProgress};
use jupedsim_scene::application::ImportService;
use jupedsim_scene::domains::import::ImportRequest;
use jupedsim_scene::domains::scene::{NameScheme, SceneRegistry};
use jupedsim_scene::Config;

/// Import a JuPedSim trajectory database and emit the animated scene as JSON.
#[derive(Parser)]
#[command(name = "jps-import", version, about)]
struct Cli {
    /// Path to the trajectory SQLite file.
    source: PathBuf,

    /// Load every Nth frame (1 = all frames). Defaults to the configured
    /// stride.
    #[arg(long)]
    frame_stride: Option<usize>,

    /// Path to a TOML configuration file (uses defaults if not provided).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the scene snapshot to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Hide the per-agent path curves after the import.
    #[arg(long, default_value_t = false)]
    hide_paths: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let request = ImportRequest::new(
        cli.source.clone(),
        cli.frame_stride.unwrap_or(config.import.frame_stride),
    )?;

    let store = Arc::new(SqliteTrajectoryStore::new(config.import.agent_elevation));
    let registry = SceneRegistry::new(
        config.scene.agents_collection.clone(),
        config.scene.geometry_collection.clone(),
        NameScheme::new(
            config.scene.marker_prefix.clone(),
            config.scene.path_prefix.clone(),
            config.scene.boundary_prefix.clone(),
        ),
    );
    let service = ImportService::new(store, registry);
    let mut scene = MemoryScene::new();

    let summary = service.import_with_progress(&mut scene, request, &TracingProgress::new(100))?;

    if cli.hide_paths {
        service.set_paths_visible(&mut scene, false)?;
    }

    let counts = service.counts(&scene);
    info!(
        "Agents loaded: {} ({} failed)",
        summary.agents_imported, summary.agents_failed
    );
    info!(
        "Geometry curves: {} ({} failed)",
        summary.geometry_imported, summary.geometry_failed
    );
    info!(
        "Scene objects: {} agent, {} geometry",
        counts.agents, counts.geometry
    );
    if let Some((start, end)) = summary.frame_range {
        info!("Frame range: {} - {}", start, end);
    }

    let snapshot = serde_json::to_string_pretty(&scene)?;
    match &cli.output {
        Some(path) => std::fs::write(path, snapshot)?,
        None => println!("{}", snapshot),
    }

    Ok(())
}
