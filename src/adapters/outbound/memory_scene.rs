use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::{DomainError, DomainResult};
use crate::domains::scene::{ObjectHandle, ObjectKind, SceneGraph};
use crate::domains::trajectory::Position3D;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i64,
    pub position: Position3D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveData {
    pub points: Vec<Position3D>,
    pub closed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub collection: String,
    pub keyframes: Vec<Keyframe>,
    pub curve: Option<CurveData>,
    pub visible: bool,
}

/// In-memory scene graph. Stands in for the host 3D application: the
/// importer drives it through the `SceneGraph` port, tests inspect it
/// directly, and the CLI serializes it as the observable result of a run.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    collections: BTreeMap<String, Vec<ObjectHandle>>,
    objects: BTreeMap<u64, SceneObject>,
    frame_range: Option<(i64, i64)>,
    next_id: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct lookup for tests and snapshot consumers.
    pub fn object(&self, handle: ObjectHandle) -> Option<&SceneObject> {
        self.objects.get(&handle.0)
    }

    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.values().find(|object| object.name == name)
    }

    fn get(&self, handle: ObjectHandle) -> DomainResult<&SceneObject> {
        self.objects
            .get(&handle.0)
            .ok_or(DomainError::StaleHandle { id: handle.0 })
    }

    fn get_mut(&mut self, handle: ObjectHandle) -> DomainResult<&mut SceneObject> {
        self.objects
            .get_mut(&handle.0)
            .ok_or(DomainError::StaleHandle { id: handle.0 })
    }
}

impl SceneGraph for MemoryScene {
    fn ensure_collection(&mut self, name: &str) -> DomainResult<()> {
        self.collections.entry(name.to_string()).or_default();
        Ok(())
    }

    fn create_object(
        &mut self,
        collection: &str,
        kind: ObjectKind,
        name: &str,
    ) -> DomainResult<ObjectHandle> {
        if self.objects.values().any(|object| object.name == name) {
            return Err(DomainError::NameCollision {
                name: name.to_string(),
            });
        }
        let members = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| DomainError::UnknownCollection {
                name: collection.to_string(),
            })?;

        self.next_id += 1;
        let handle = ObjectHandle(self.next_id);
        members.push(handle);
        self.objects.insert(
            handle.0,
            SceneObject {
                name: name.to_string(),
                kind,
                collection: collection.to_string(),
                keyframes: Vec::new(),
                curve: None,
                visible: true,
            },
        );
        Ok(handle)
    }

    fn find_object(&self, name: &str) -> Option<ObjectHandle> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| ObjectHandle(*id))
    }

    fn object_kind(&self, object: ObjectHandle) -> DomainResult<ObjectKind> {
        Ok(self.get(object)?.kind)
    }

    fn object_name(&self, object: ObjectHandle) -> DomainResult<String> {
        Ok(self.get(object)?.name.clone())
    }

    fn object_collection(&self, object: ObjectHandle) -> DomainResult<String> {
        Ok(self.get(object)?.collection.clone())
    }

    fn delete_object(&mut self, object: ObjectHandle) -> DomainResult<()> {
        let removed = self
            .objects
            .remove(&object.0)
            .ok_or(DomainError::StaleHandle { id: object.0 })?;
        if let Some(members) = self.collections.get_mut(&removed.collection) {
            members.retain(|member| *member != object);
        }
        Ok(())
    }

    fn list_objects(&self, collection: &str) -> DomainResult<Vec<ObjectHandle>> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| DomainError::UnknownCollection {
                name: collection.to_string(),
            })
    }

    fn clear_keyframes(&mut self, object: ObjectHandle) -> DomainResult<()> {
        let object = self.get_mut(object)?;
        if object.kind != ObjectKind::Marker {
            return Err(DomainError::KindMismatch {
                name: object.name.clone(),
            });
        }
        object.keyframes.clear();
        Ok(())
    }

    fn insert_keyframe(
        &mut self,
        object: ObjectHandle,
        frame: i64,
        position: Position3D,
    ) -> DomainResult<()> {
        let object = self.get_mut(object)?;
        if object.kind != ObjectKind::Marker {
            return Err(DomainError::KindMismatch {
                name: object.name.clone(),
            });
        }
        // Keep the track sorted; a keyframe at an existing frame replaces
        // it, matching host keyframe-insert semantics.
        match object
            .keyframes
            .binary_search_by_key(&frame, |keyframe| keyframe.frame)
        {
            Ok(at) => object.keyframes[at].position = position,
            Err(at) => object.keyframes.insert(at, Keyframe { frame, position }),
        }
        Ok(())
    }

    fn set_curve_points(
        &mut self,
        object: ObjectHandle,
        points: &[Position3D],
        closed: bool,
    ) -> DomainResult<()> {
        let object = self.get_mut(object)?;
        if object.kind != ObjectKind::Curve {
            return Err(DomainError::KindMismatch {
                name: object.name.clone(),
            });
        }
        object.curve = Some(CurveData {
            points: points.to_vec(),
            closed,
        });
        Ok(())
    }

    fn set_visibility(&mut self, object: ObjectHandle, visible: bool) -> DomainResult<()> {
        self.get_mut(object)?.visible = visible;
        Ok(())
    }

    fn set_frame_range(&mut self, start: i64, end: i64) {
        self.frame_range = Some((start, end));
    }

    fn frame_range(&self) -> Option<(i64, i64)> {
        self.frame_range
    }
}
