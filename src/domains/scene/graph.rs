use serde::{Deserialize, Serialize};

use crate::common::DomainResult;
use crate::domains::trajectory::Position3D;

/// Handle to one object owned by the host scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Point-like object carrying position keyframes.
    Marker,
    /// Curve object holding a static vertex list.
    Curve,
}

/// Capability interface over the host application's object graph
/// (object and collection creation, keyframe insertion, curve data).
/// The engine depends only on this trait, never on a concrete scene
/// implementation, so it can run against an in-memory scene in tests.
///
/// Scene mutation is cooperative with the host's main thread; the entire
/// import runs synchronously on the invoking thread.
pub trait SceneGraph {
    /// Create the named collection if absent. Idempotent.
    fn ensure_collection(&mut self, name: &str) -> DomainResult<()>;

    fn create_object(
        &mut self,
        collection: &str,
        kind: ObjectKind,
        name: &str,
    ) -> DomainResult<ObjectHandle>;

    /// Object names are global across collections, as in the host.
    fn find_object(&self, name: &str) -> Option<ObjectHandle>;

    fn object_kind(&self, object: ObjectHandle) -> DomainResult<ObjectKind>;

    fn object_name(&self, object: ObjectHandle) -> DomainResult<String>;

    fn object_collection(&self, object: ObjectHandle) -> DomainResult<String>;

    /// Remove the object and free its owned data blocks.
    fn delete_object(&mut self, object: ObjectHandle) -> DomainResult<()>;

    fn list_objects(&self, collection: &str) -> DomainResult<Vec<ObjectHandle>>;

    fn clear_keyframes(&mut self, object: ObjectHandle) -> DomainResult<()>;

    /// Keyframes are interpolated between frames by the host's default
    /// curve interpolation.
    fn insert_keyframe(
        &mut self,
        object: ObjectHandle,
        frame: i64,
        position: Position3D,
    ) -> DomainResult<()>;

    fn set_curve_points(
        &mut self,
        object: ObjectHandle,
        points: &[Position3D],
        closed: bool,
    ) -> DomainResult<()>;

    fn set_visibility(&mut self, object: ObjectHandle, visible: bool) -> DomainResult<()>;

    /// The host's global playback frame range.
    fn set_frame_range(&mut self, start: i64, end: i64);

    fn frame_range(&self) -> Option<(i64, i64)>;
}
