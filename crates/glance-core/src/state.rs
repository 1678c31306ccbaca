//! The pick highlight state machine.
//!
//! A [`PickState`] is a single-slot record of "which object is currently
//! highlighted, and what color do we owe it back". It is an explicit value
//! owned by the caller's frame loop rather than a hidden global, which makes
//! the transition logic testable without a renderer.
//!
//! Transitions, driven by [`PickState::resolve`] with a decoded pick ID:
//! - Idle -> Highlighted: a non-zero ID present in the index.
//! - Highlighted -> Highlighted (other object): restore previous, save new.
//! - Highlighted -> Idle: ID 0 or unknown; restore and clear.
//! - Idle -> Idle: ID 0; no-op.
//! - Same ID again: no save/restore cycle, only the time-varying color is
//!   re-applied.

use crate::highlight::HighlightPolicy;
use crate::identity::IdentityIndex;
use crate::material::Color;
use crate::pick::PickId;
use crate::scene::Scene;

/// Transient single-slot highlight state. At most one object is highlighted
/// at a time.
#[derive(Debug, Clone, Copy)]
pub struct PickState {
    highlighted: Option<PickId>,
    saved_color: Color,
}

impl PickState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            highlighted: None,
            saved_color: Color::BLACK,
        }
    }

    /// The currently highlighted object, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<PickId> {
        self.highlighted
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.highlighted.is_none()
    }

    /// Drives the state machine with a freshly decoded pick ID.
    ///
    /// Mutates at most one material's highlight color in `scene`. Safe to
    /// call every frame: re-resolving the unchanged ID only refreshes the
    /// animated color, it does not re-save or restore anything.
    ///
    /// Returns the object highlighted after the transition, if any.
    pub fn resolve(
        &mut self,
        raw_id: u32,
        index: &IdentityIndex,
        scene: &mut Scene,
        policy: &HighlightPolicy,
        time: f32,
    ) -> Option<PickId> {
        let hit = index.get(raw_id).map(|object| *object);

        if let (Some(prev), Some(object)) = (self.highlighted, hit) {
            if prev == object.id {
                // Unchanged target: idempotent aside from the animation term.
                self.apply(object.visible, scene, policy.color_at(time));
                return self.highlighted;
            }
        }

        if let Some(prev) = self.highlighted.take() {
            self.restore(prev, index, scene);
        }

        if let Some(object) = hit {
            if let Some(saved) = self.save_and_apply(object.visible, scene, policy.color_at(time))
            {
                self.highlighted = Some(object.id);
                self.saved_color = saved;
            }
        }

        self.highlighted
    }

    /// Restores the saved color and empties the slot.
    ///
    /// Equivalent to resolving ID 0; provided for callers that know the
    /// cursor has left the viewport.
    pub fn clear(&mut self, index: &IdentityIndex, scene: &mut Scene) {
        if let Some(prev) = self.highlighted.take() {
            self.restore(prev, index, scene);
        }
    }

    /// Empties the slot without restoring.
    ///
    /// Used when the highlighted object itself has been deleted; there is
    /// nothing left to restore and the reference must not dangle.
    pub fn forget(&mut self) {
        self.highlighted = None;
    }

    fn restore(&self, id: PickId, index: &IdentityIndex, scene: &mut Scene) {
        // The object may have been removed while highlighted; in that case
        // drop the reference silently rather than touch released resources.
        let Some(object) = index.get(id.get()) else {
            log::debug!("highlighted object {id} vanished before restore");
            return;
        };
        self.apply(object.visible, scene, self.saved_color);
    }

    fn apply(&self, key: crate::scene::MeshKey, scene: &mut Scene, color: Color) {
        if let Some(mesh) = scene.get_mut(key) {
            if let Some(mat) = mesh.material.as_highlightable_mut() {
                mat.set_highlight_color(color);
            }
        }
    }

    fn save_and_apply(
        &self,
        key: crate::scene::MeshKey,
        scene: &mut Scene,
        color: Color,
    ) -> Option<Color> {
        let mesh = scene.get_mut(key)?;
        let mat = mesh.material.as_highlightable_mut()?;
        let saved = mat.highlight_color();
        mat.set_highlight_color(color);
        Some(saved)
    }
}

impl Default for PickState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::identity::{remove_object, IdAllocator, PickableObject};
    use crate::material::Material;
    use crate::scene::Transform;

    struct Fixture {
        scene: Scene,
        id_scene: Scene,
        index: IdentityIndex,
        objects: Vec<PickableObject>,
        policy: HighlightPolicy,
    }

    fn fixture(count: u32) -> Fixture {
        let mut scene = Scene::new();
        let mut id_scene = Scene::id_scene();
        let mut index = IdentityIndex::new();
        let mut alloc = IdAllocator::new();
        let geometry = Geometry::cuboid(1.0, 1.0, 1.0);
        let objects = (0..count)
            .map(|i| {
                alloc
                    .allocate(
                        &mut scene,
                        &mut id_scene,
                        &mut index,
                        geometry.clone(),
                        Material::standard(Color::from_hex(0x101010 + i)),
                        Transform::default(),
                    )
                    .unwrap()
            })
            .collect();
        Fixture {
            scene,
            id_scene,
            index,
            objects,
            policy: HighlightPolicy::default(),
        }
    }

    fn emissive_of(fx: &Fixture, object: &PickableObject) -> Color {
        fx.scene
            .get(object.visible)
            .unwrap()
            .material
            .as_highlightable()
            .unwrap()
            .highlight_color()
    }

    #[test]
    fn idle_to_highlighted_and_back() {
        let mut fx = fixture(3);
        let mut state = PickState::new();
        let obj = fx.objects[1];

        let hit = state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.15);
        assert_eq!(hit, Some(obj.id));
        assert_eq!(emissive_of(&fx, &obj), fx.policy.color_at(0.15));

        let hit = state.resolve(0, &fx.index, &mut fx.scene, &fx.policy, 0.3);
        assert_eq!(hit, None);
        assert!(state.is_idle());
        // Original emissive (black) restored exactly.
        assert_eq!(emissive_of(&fx, &obj), Color::BLACK);
    }

    #[test]
    fn idle_on_zero_is_a_noop() {
        let mut fx = fixture(1);
        let mut state = PickState::new();
        assert_eq!(
            state.resolve(0, &fx.index, &mut fx.scene, &fx.policy, 0.0),
            None
        );
        assert!(state.is_idle());
    }

    #[test]
    fn switching_objects_restores_the_first_exactly() {
        let mut fx = fixture(2);
        let mut state = PickState::new();
        let (a, b) = (fx.objects[0], fx.objects[1]);

        state.resolve(a.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.0);
        state.resolve(b.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.15);

        assert_eq!(state.highlighted(), Some(b.id));
        assert_eq!(emissive_of(&fx, &a), Color::BLACK);
        assert_eq!(emissive_of(&fx, &b), fx.policy.color_at(0.15));
    }

    #[test]
    fn unchanged_target_does_not_cycle_save_restore() {
        let mut fx = fixture(1);
        let mut state = PickState::new();
        let obj = fx.objects[0];

        state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.15);
        // Re-resolve while the animated color is applied. A naive
        // save/restore cycle would capture the highlight as the "original".
        state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.15);
        state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.3);

        state.resolve(0, &fx.index, &mut fx.scene, &fx.policy, 0.45);
        assert_eq!(emissive_of(&fx, &obj), Color::BLACK);
    }

    #[test]
    fn unknown_id_behaves_like_background() {
        let mut fx = fixture(1);
        let mut state = PickState::new();
        let obj = fx.objects[0];

        state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.0);
        let hit = state.resolve(999, &fx.index, &mut fx.scene, &fx.policy, 0.1);
        assert_eq!(hit, None);
        assert!(state.is_idle());
        assert_eq!(emissive_of(&fx, &obj), Color::BLACK);
    }

    #[test]
    fn restore_on_vanished_object_is_silent() {
        let mut fx = fixture(1);
        let mut state = PickState::new();
        let obj = fx.objects[0];

        state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.0);
        remove_object(obj.id, &mut fx.index, &mut fx.scene, &mut fx.id_scene);

        // The next resolve must not panic or touch released resources.
        let hit = state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.1);
        assert_eq!(hit, None);
        assert!(state.is_idle());
    }

    #[test]
    fn clear_restores_and_empties() {
        let mut fx = fixture(1);
        let mut state = PickState::new();
        let obj = fx.objects[0];

        state.resolve(obj.id.get(), &fx.index, &mut fx.scene, &fx.policy, 0.15);
        state.clear(&fx.index, &mut fx.scene);
        assert!(state.is_idle());
        assert_eq!(emissive_of(&fx, &obj), Color::BLACK);
    }
}
