use std::collections::HashSet;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::adapters::outbound::NoopProgress;
use crate::common::{ApplicationResult, ImportResult};
use crate::domains::import::{ImportProgress, ImportRequest, ImportSession, ImportSummary};
use crate::domains::scene::{synthesize_agent, synthesize_boundary, SceneCounts, SceneGraph, SceneRegistry};
use crate::domains::trajectory::{decimate, SimulationData, TrajectoryStore};

/// Orchestrates one import run: read, decimate, synthesize agents and
/// geometry, update the playback frame range, report counts. Holds no
/// state across invocations; each run is independent and safe to repeat
/// with a different source or stride.
pub struct ImportService {
    store: Arc<dyn TrajectoryStore>,
    registry: SceneRegistry,
}

impl ImportService {
    pub fn new(store: Arc<dyn TrajectoryStore>, registry: SceneRegistry) -> Self {
        Self { store, registry }
    }

    pub fn import(
        &self,
        scene: &mut dyn SceneGraph,
        request: ImportRequest,
    ) -> ApplicationResult<ImportSummary> {
        self.import_with_progress(scene, request, &NoopProgress)
    }

    pub fn import_with_progress(
        &self,
        scene: &mut dyn SceneGraph,
        request: ImportRequest,
        progress: &dyn ImportProgress,
    ) -> ApplicationResult<ImportSummary> {
        let mut session = ImportSession::new(request.clone());

        // Fatal errors below abort before any scene mutation, so a failed
        // read never destroys a previously successful import.
        session.begin_reading()?;
        let data = match self.read_source(&session) {
            Ok(data) => data,
            Err(e) => {
                error!("Import of {} aborted: {}", request.source.display(), e);
                session.fail();
                return Err(e.into());
            }
        };
        info!(
            "Read {} tracks and {} boundaries from {}",
            data.tracks.len(),
            data.boundaries.len(),
            request.source.display()
        );

        session.begin_synthesizing()?;
        self.registry.ensure_collections(scene)?;
        self.synthesize_geometry(scene, &mut session, &data)?;
        let keep = self.synthesize_agents(scene, &mut session, &data, progress)?;

        session.begin_finalizing()?;
        let pruned = self.registry.prune_agents(scene, &keep)?;
        if pruned > 0 {
            info!("Pruned {} stale agent objects", pruned);
        }
        if let Some((start, end)) = session.frame_range() {
            scene.set_frame_range(start, end);
        }

        let summary = session.succeed()?;
        info!(
            "Import finished: {} agents ({} failed), {} boundaries ({} failed)",
            summary.agents_imported,
            summary.agents_failed,
            summary.geometry_imported,
            summary.geometry_failed
        );
        Ok(summary)
    }

    /// Show or hide the per-agent path curves without re-running the
    /// import, returning the number of curves toggled.
    pub fn set_paths_visible(
        &self,
        scene: &mut dyn SceneGraph,
        visible: bool,
    ) -> ApplicationResult<usize> {
        let toggled = self.registry.set_paths_visible(scene, visible)?;
        info!("Set visible={} on {} path curves", visible, toggled);
        Ok(toggled)
    }

    pub fn counts(&self, scene: &dyn SceneGraph) -> SceneCounts {
        self.registry.counts(scene)
    }

    fn read_source(&self, session: &ImportSession) -> ImportResult<SimulationData> {
        self.store.ensure_available()?;
        self.store.read(&session.request.source)
    }

    /// Geometry does not change between re-imports of differing stride, so
    /// the collection is cleared and rebuilt wholesale.
    fn synthesize_geometry(
        &self,
        scene: &mut dyn SceneGraph,
        session: &mut ImportSession,
        data: &SimulationData,
    ) -> ApplicationResult<()> {
        self.registry
            .clear(scene, self.registry.geometry_collection())?;
        for (index, boundary) in data.boundaries.iter().enumerate() {
            match synthesize_boundary(
                scene,
                self.registry.geometry_collection(),
                self.registry.names(),
                index,
                boundary,
            ) {
                Ok(()) => session.record_boundary(),
                Err(e) => {
                    warn!("Skipping boundary {}: {}", index, e);
                    session.record_boundary_failure();
                }
            }
        }
        Ok(())
    }

    /// Synthesizes every track, accumulating per-agent failures instead of
    /// aborting the run. Returns the names of the objects belonging to the
    /// agents that imported successfully, for pruning.
    fn synthesize_agents(
        &self,
        scene: &mut dyn SceneGraph,
        session: &mut ImportSession,
        data: &SimulationData,
        progress: &dyn ImportProgress,
    ) -> ApplicationResult<HashSet<String>> {
        let names = self.registry.names();
        let total = data.tracks.len();
        let mut keep = HashSet::new();

        for (done, track) in data.tracks.iter().enumerate() {
            let retained = decimate(track.samples(), session.request.frame_stride);
            match synthesize_agent(
                scene,
                self.registry.agents_collection(),
                names,
                track.agent_id,
                &retained,
            ) {
                Ok(()) => {
                    keep.insert(names.marker_name(track.agent_id));
                    keep.insert(names.path_name(track.agent_id));
                    if let (Some(first), Some(last)) = (retained.first(), retained.last()) {
                        session.record_agent(first.frame, last.frame);
                    }
                }
                Err(e) => {
                    warn!("Skipping agent {}: {}", track.agent_id, e);
                    session.record_agent_failure();
                }
            }
            progress.agent_synthesized(done + 1, total);
        }
        Ok(keep)
    }
}
