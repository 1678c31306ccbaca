//! The retained scene model.
//!
//! A [`Scene`] is a flat registry of [`Mesh`] instances keyed by [`MeshKey`].
//! The viewer keeps two of them: the visible scene and the parallel ID-scene
//! holding the flat-colored pick twins. Scenes own no GPU state; the
//! renderer caches GPU resources keyed by `(SceneId, MeshKey)`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::geometry::GeometryHandle;
use crate::material::{Color, Material};

static NEXT_SCENE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique scene identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

/// Key of a mesh within one scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshKey(u64);

/// Position / rotation / scale of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    #[must_use]
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn to_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

/// A renderable mesh instance: shared geometry, a material, and a transform.
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: GeometryHandle,
    pub material: Material,
    pub transform: Transform,
}

impl Mesh {
    #[must_use]
    pub fn new(geometry: GeometryHandle, material: Material, transform: Transform) -> Self {
        Self {
            geometry,
            material,
            transform,
        }
    }
}

/// A retained set of meshes plus a background clear color.
pub struct Scene {
    id: SceneId,
    meshes: HashMap<MeshKey, Mesh>,
    next_key: u64,
    /// Clear color for this scene's render passes. The ID-scene uses black
    /// so that empty background decodes to pick ID 0.
    pub background: Color,
}

impl Scene {
    /// Creates an empty scene with a white background.
    #[must_use]
    pub fn new() -> Self {
        Self::with_background(Color::WHITE)
    }

    /// Creates an empty scene with the given background color.
    #[must_use]
    pub fn with_background(background: Color) -> Self {
        Self {
            id: SceneId(NEXT_SCENE_ID.fetch_add(1, Ordering::Relaxed)),
            meshes: HashMap::new(),
            next_key: 1,
            background,
        }
    }

    /// An ID-scene: black background, so unoccupied pixels decode to 0.
    #[must_use]
    pub fn id_scene() -> Self {
        Self::with_background(Color::BLACK)
    }

    /// Returns this scene's process-unique id.
    #[must_use]
    pub fn id(&self) -> SceneId {
        self.id
    }

    /// Inserts a mesh, returning its key.
    pub fn insert(&mut self, mesh: Mesh) -> MeshKey {
        let key = MeshKey(self.next_key);
        self.next_key += 1;
        self.meshes.insert(key, mesh);
        key
    }

    #[must_use]
    pub fn get(&self, key: MeshKey) -> Option<&Mesh> {
        self.meshes.get(&key)
    }

    pub fn get_mut(&mut self, key: MeshKey) -> Option<&mut Mesh> {
        self.meshes.get_mut(&key)
    }

    #[must_use]
    pub fn contains(&self, key: MeshKey) -> bool {
        self.meshes.contains_key(&key)
    }

    /// Removes a mesh. Returns the removed mesh, or `None` if the key is
    /// stale.
    pub fn remove(&mut self, key: MeshKey) -> Option<Mesh> {
        self.meshes.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MeshKey, &Mesh)> {
        self.meshes.iter().map(|(k, m)| (*k, m))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (MeshKey, &mut Mesh)> {
        self.meshes.iter_mut().map(|(k, m)| (*k, m))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn clear(&mut self) {
        self.meshes.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;

    fn test_mesh() -> Mesh {
        Mesh::new(
            Geometry::cuboid(1.0, 1.0, 1.0),
            Material::standard(Color::WHITE),
            Transform::default(),
        )
    }

    #[test]
    fn insert_get_remove() {
        let mut scene = Scene::new();
        let key = scene.insert(test_mesh());
        assert!(scene.contains(key));
        assert_eq!(scene.len(), 1);

        assert!(scene.remove(key).is_some());
        assert!(!scene.contains(key));
        assert!(scene.remove(key).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn keys_are_not_reused() {
        let mut scene = Scene::new();
        let a = scene.insert(test_mesh());
        scene.remove(a);
        let b = scene.insert(test_mesh());
        assert_ne!(a, b);
    }

    #[test]
    fn scene_ids_are_unique() {
        assert_ne!(Scene::new().id(), Scene::new().id());
    }

    #[test]
    fn transform_matrix_translation() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        let m = t.to_matrix();
        let p = m.transform_point3(Vec3::ZERO);
        assert!((p - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-6);
    }

    #[test]
    fn id_scene_background_is_black() {
        assert_eq!(Scene::id_scene().background, Color::BLACK);
    }
}
