use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::common::DomainResult;

use super::graph::SceneGraph;
use super::names::NameScheme;

/// Object counts per collection, for status display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneCounts {
    pub agents: usize,
    pub geometry: usize,
}

/// Owns the two collections the importer is allowed to mutate. All scene
/// writes go through the collections named here; everything else in the
/// host scene is foreign and left alone.
#[derive(Debug, Clone)]
pub struct SceneRegistry {
    agents_collection: String,
    geometry_collection: String,
    names: NameScheme,
}

impl SceneRegistry {
    pub fn new(agents_collection: String, geometry_collection: String, names: NameScheme) -> Self {
        Self {
            agents_collection,
            geometry_collection,
            names,
        }
    }

    pub fn agents_collection(&self) -> &str {
        &self.agents_collection
    }

    pub fn geometry_collection(&self) -> &str {
        &self.geometry_collection
    }

    pub fn names(&self) -> &NameScheme {
        &self.names
    }

    /// Create both collections if absent. Safe to call on every import.
    pub fn ensure_collections(&self, scene: &mut dyn SceneGraph) -> DomainResult<()> {
        scene.ensure_collection(&self.agents_collection)?;
        scene.ensure_collection(&self.geometry_collection)?;
        Ok(())
    }

    /// Delete every object currently inside the collection, returning how
    /// many were removed.
    pub fn clear(&self, scene: &mut dyn SceneGraph, collection: &str) -> DomainResult<usize> {
        let handles = scene.list_objects(collection)?;
        let removed = handles.len();
        for handle in handles {
            scene.delete_object(handle)?;
        }
        Ok(removed)
    }

    /// Delete agent objects whose names are not in the keep set. This is
    /// what removes orphaned markers and paths when a re-import yields
    /// fewer agents than the previous one.
    pub fn prune_agents(
        &self,
        scene: &mut dyn SceneGraph,
        keep: &HashSet<String>,
    ) -> DomainResult<usize> {
        let mut removed = 0;
        for handle in scene.list_objects(&self.agents_collection)? {
            let name = scene.object_name(handle)?;
            if !keep.contains(&name) {
                scene.delete_object(handle)?;
                removed += 1;
            }
        }
        Ok(removed)
    }

    pub fn counts(&self, scene: &dyn SceneGraph) -> SceneCounts {
        SceneCounts {
            agents: scene
                .list_objects(&self.agents_collection)
                .map(|handles| handles.len())
                .unwrap_or(0),
            geometry: scene
                .list_objects(&self.geometry_collection)
                .map(|handles| handles.len())
                .unwrap_or(0),
        }
    }

    /// Show or hide every path curve in the agents collection, returning
    /// the number of objects toggled.
    pub fn set_paths_visible(
        &self,
        scene: &mut dyn SceneGraph,
        visible: bool,
    ) -> DomainResult<usize> {
        let mut toggled = 0;
        for handle in scene.list_objects(&self.agents_collection)? {
            let name = scene.object_name(handle)?;
            if self.names.is_path_name(&name) {
                scene.set_visibility(handle, visible)?;
                toggled += 1;
            }
        }
        Ok(toggled)
    }
}

impl Default for SceneRegistry {
    fn default() -> Self {
        Self {
            agents_collection: "JuPedSim_Agents".to_string(),
            geometry_collection: "JuPedSim_Geometry".to_string(),
            names: NameScheme::default(),
        }
    }
}
