use crate::common::{DomainError, DomainResult};
use crate::domains::trajectory::{BoundaryGeometry, Position3D, TrajectorySample};

use super::graph::{ObjectHandle, ObjectKind, SceneGraph};
use super::names::NameScheme;

/// Creates or updates the marker and path curve for one agent from its
/// decimated track. Existing objects are reused by name, and the marker's
/// keyframes are cleared before the new set is inserted, so animation data
/// from a previous import at a different stride cannot linger.
///
/// The path curve gets the same retained samples as the marker keyframes.
/// The duplication is intentional: the path is a static visual trace, the
/// marker is the moving point.
pub fn synthesize_agent(
    scene: &mut dyn SceneGraph,
    collection: &str,
    names: &NameScheme,
    agent_id: i64,
    retained: &[TrajectorySample],
) -> DomainResult<()> {
    if retained.is_empty() {
        return Err(DomainError::EmptyTrack { agent_id });
    }

    let marker = find_or_create(scene, collection, ObjectKind::Marker, &names.marker_name(agent_id))?;
    let path = find_or_create(scene, collection, ObjectKind::Curve, &names.path_name(agent_id))?;

    scene.clear_keyframes(marker)?;
    for sample in retained {
        scene.insert_keyframe(marker, sample.frame, sample.position.clone())?;
    }

    let points: Vec<Position3D> = retained.iter().map(|s| s.position.clone()).collect();
    scene.set_curve_points(path, &points, false)?;

    Ok(())
}

/// Converts one static boundary into a curve object. Degenerate geometry
/// (fewer than 2 vertices) is an error the caller counts, not fatal.
pub fn synthesize_boundary(
    scene: &mut dyn SceneGraph,
    collection: &str,
    names: &NameScheme,
    index: usize,
    boundary: &BoundaryGeometry,
) -> DomainResult<()> {
    if boundary.vertices.len() < 2 {
        return Err(DomainError::DegenerateBoundary {
            index,
            vertex_count: boundary.vertices.len(),
        });
    }

    let handle = scene.create_object(collection, ObjectKind::Curve, &names.boundary_name(index))?;
    scene.set_curve_points(handle, &boundary.vertices, boundary.closed)?;
    Ok(())
}

/// Reuse the object with this name if it is ours, create it otherwise.
/// A name held by an object of another kind or in another collection is a
/// collision with a foreign object; the entity being synthesized is then
/// skipped by the caller rather than clobbering the stranger.
fn find_or_create(
    scene: &mut dyn SceneGraph,
    collection: &str,
    kind: ObjectKind,
    name: &str,
) -> DomainResult<ObjectHandle> {
    match scene.find_object(name) {
        Some(handle) => {
            if scene.object_kind(handle)? != kind || scene.object_collection(handle)? != collection
            {
                return Err(DomainError::NameCollision {
                    name: name.to_string(),
                });
            }
            Ok(handle)
        }
        None => scene.create_object(collection, kind, name),
    }
}
