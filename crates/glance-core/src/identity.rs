//! Identity allocation: dense pick IDs and ID-scene twins.
//!
//! [`IdAllocator::allocate`] registers one pickable object: it inserts the
//! visible mesh into the main scene and a flat-colored twin into the
//! ID-scene. The twin shares the visible geometry and copies its transform
//! at creation time (not live-linked). IDs are minted sequentially starting
//! at 1; 0 is reserved for background.

use std::collections::HashMap;

use crate::error::{GlanceError, Result};
use crate::geometry::GeometryHandle;
use crate::material::Material;
use crate::pick::{PickId, MAX_PICK_ID};
use crate::scene::{Mesh, MeshKey, Scene, Transform};

/// A registered pickable object: its ID and the keys of its two meshes.
#[derive(Debug, Clone, Copy)]
pub struct PickableObject {
    pub id: PickId,
    /// Key of the display mesh in the visible scene.
    pub visible: MeshKey,
    /// Key of the flat-colored twin in the ID-scene.
    pub twin: MeshKey,
}

/// Mints sequential pick IDs and builds ID-scene twins.
#[derive(Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        // 0 is reserved for background
        Self { next: 1 }
    }

    /// Number of IDs allocated so far.
    #[must_use]
    pub fn allocated(&self) -> u32 {
        self.next - 1
    }

    /// Registers a pickable object.
    ///
    /// Inserts the visible mesh into `scene` and its ID twin into
    /// `id_scene`, and records the pair in `index`. The visible material
    /// must be highlightable; anything else is rejected here rather than
    /// failing on the first hover.
    pub fn allocate(
        &mut self,
        scene: &mut Scene,
        id_scene: &mut Scene,
        index: &mut IdentityIndex,
        geometry: GeometryHandle,
        material: Material,
        transform: Transform,
    ) -> Result<PickableObject> {
        if material.as_highlightable().is_none() {
            return Err(GlanceError::NotHighlightable);
        }
        if self.next > MAX_PICK_ID {
            return Err(GlanceError::IdSpaceExhausted(self.allocated()));
        }

        let id = PickId::new(self.next).expect("sequential IDs stay in range");
        self.next += 1;

        let visible = scene.insert(Mesh::new(geometry.clone(), material, transform));
        let twin = id_scene.insert(Mesh::new(geometry, Material::id_material(id), transform));

        let object = PickableObject { id, visible, twin };
        index.insert(object);
        log::debug!("allocated pickable object {id}");
        Ok(object)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Mapping from pick ID to registered object.
///
/// Built at scene setup, read on every pick. Entries are removed when an
/// object is deleted so stale IDs decode to "nothing picked".
#[derive(Debug, Default)]
pub struct IdentityIndex {
    objects: HashMap<PickId, PickableObject>,
}

impl IdentityIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: PickableObject) {
        self.objects.insert(object.id, object);
    }

    /// Looks up a raw decoded ID. 0 and unknown IDs return `None`.
    #[must_use]
    pub fn get(&self, raw_id: u32) -> Option<&PickableObject> {
        PickId::new(raw_id).and_then(|id| self.objects.get(&id))
    }

    /// Looks up an ID that the caller expects to be registered.
    ///
    /// Unlike [`IdentityIndex::get`], which treats unknown IDs as "nothing
    /// picked", this is for API paths where a missing ID is a caller error.
    pub fn require(&self, id: PickId) -> Result<&PickableObject> {
        self.objects
            .get(&id)
            .ok_or(GlanceError::ObjectNotFound(id.get()))
    }

    pub fn remove(&mut self, id: PickId) -> Option<PickableObject> {
        self.objects.remove(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PickableObject> {
        self.objects.values()
    }
}

/// Removes a pickable object from both scenes and the index.
///
/// Both representations are released together so no orphaned twin keeps
/// responding to picks after the visible mesh is gone. Returns the removed
/// registration, or `None` if the ID was already gone.
pub fn remove_object(
    id: PickId,
    index: &mut IdentityIndex,
    scene: &mut Scene,
    id_scene: &mut Scene,
) -> Option<PickableObject> {
    let object = index.remove(id)?;
    scene.remove(object.visible);
    id_scene.remove(object.twin);
    log::debug!("removed pickable object {id}");
    Some(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::material::{Color, TexturedMaterial};

    fn setup() -> (Scene, Scene, IdentityIndex, IdAllocator) {
        (
            Scene::new(),
            Scene::id_scene(),
            IdentityIndex::new(),
            IdAllocator::new(),
        )
    }

    #[test]
    fn ids_are_sequential_from_one() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        for expected in 1..=5u32 {
            let obj = alloc
                .allocate(
                    &mut scene,
                    &mut id_scene,
                    &mut index,
                    Geometry::cuboid(1.0, 1.0, 1.0),
                    Material::standard(Color::WHITE),
                    Transform::default(),
                )
                .unwrap();
            assert_eq!(obj.id.get(), expected);
        }
        assert_eq!(index.len(), 5);
        assert_eq!(scene.len(), 5);
        assert_eq!(id_scene.len(), 5);
    }

    #[test]
    fn twin_copies_transform_and_encodes_id() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        let transform = Transform::at(glam::Vec3::new(3.0, -1.0, 2.0));
        let obj = alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::standard(Color::WHITE),
                transform,
            )
            .unwrap();

        let twin = id_scene.get(obj.twin).unwrap();
        assert_eq!(twin.transform, transform);
        assert_eq!(twin.material, Material::id_material(obj.id));
        // Geometry is shared, not copied.
        let visible = scene.get(obj.visible).unwrap();
        assert_eq!(visible.geometry.id(), twin.geometry.id());
    }

    #[test]
    fn require_reports_missing_ids() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        let obj = alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::standard(Color::WHITE),
                Transform::default(),
            )
            .unwrap();

        assert_eq!(index.require(obj.id).unwrap().visible, obj.visible);

        let missing = PickId::new(99).unwrap();
        let err = index.require(missing).unwrap_err();
        assert!(matches!(err, GlanceError::ObjectNotFound(99)));
    }

    #[test]
    fn rejects_non_highlightable_materials() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        let err = alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::Textured(TexturedMaterial::composite()),
                Transform::default(),
            )
            .unwrap_err();
        assert!(matches!(err, GlanceError::NotHighlightable));
        assert!(scene.is_empty());
        assert!(id_scene.is_empty());
    }

    #[test]
    fn exhaustion_is_a_hard_error() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        alloc.next = MAX_PICK_ID; // one ID left
        assert!(alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::standard(Color::WHITE),
                Transform::default(),
            )
            .is_ok());
        let err = alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::standard(Color::WHITE),
                Transform::default(),
            )
            .unwrap_err();
        assert!(matches!(err, GlanceError::IdSpaceExhausted(_)));
    }

    #[test]
    fn index_lookup_ignores_zero_and_unknown() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::standard(Color::WHITE),
                Transform::default(),
            )
            .unwrap();
        assert!(index.get(0).is_none());
        assert!(index.get(1).is_some());
        assert!(index.get(2).is_none());
        assert!(index.get(MAX_PICK_ID + 1).is_none());
    }

    #[test]
    fn remove_object_releases_both_representations() {
        let (mut scene, mut id_scene, mut index, mut alloc) = setup();
        let obj = alloc
            .allocate(
                &mut scene,
                &mut id_scene,
                &mut index,
                Geometry::cuboid(1.0, 1.0, 1.0),
                Material::standard(Color::WHITE),
                Transform::default(),
            )
            .unwrap();

        let removed = remove_object(obj.id, &mut index, &mut scene, &mut id_scene).unwrap();
        assert_eq!(removed.id, obj.id);
        assert!(scene.is_empty());
        assert!(id_scene.is_empty());
        assert!(index.get(obj.id.get()).is_none());
        assert!(remove_object(obj.id, &mut index, &mut scene, &mut id_scene).is_none());
    }
}
