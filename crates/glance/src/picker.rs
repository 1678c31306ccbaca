//! GPU ID-buffer picking.
//!
//! Every object eligible for picking is mirrored in a parallel ID-scene by
//! a twin mesh whose flat color encodes the object's 24-bit ID. To find out
//! what is under the cursor, the picker narrows the camera frustum to the
//! single pixel at the cursor, renders the ID-scene into a 1x1 offscreen
//! target, reads the pixel back, and decodes it. No ray casting, and the
//! cost per frame is one pixel's worth of rasterization plus a 4-byte copy.

use glance_core::{
    color_to_id, remove_object, HighlightPolicy, IdentityIndex, PickId, PickState, Scene,
};
use glance_render::{Camera, CameraBinding, OffscreenTarget, PassKind, RenderEngine, RenderResult};

/// Cursor position used while the pointer is outside the window. Far enough
/// out that the 1x1 pick window can never cover scene content, so picks
/// resolve to background.
const CURSOR_AWAY: (f64, f64) = (-100_000.0, -100_000.0);

/// The picking engine. Owns the 1x1 pick target, the cursor position, and
/// the single-slot highlight state.
pub struct GpuPicker {
    state: PickState,
    target: OffscreenTarget,
    camera_binding: CameraBinding,
    cursor: (f64, f64),
    pixel_ratio: f64,
}

impl GpuPicker {
    /// Creates a picker against the given engine.
    #[must_use]
    pub fn new(engine: &RenderEngine) -> Self {
        Self {
            state: PickState::new(),
            target: OffscreenTarget::pick_target(&engine.device),
            camera_binding: engine.create_camera_binding(),
            cursor: CURSOR_AWAY,
            pixel_ratio: 1.0,
        }
    }

    /// Updates the cursor position in logical window coordinates.
    pub fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    /// Marks the cursor as outside the window.
    pub fn clear_cursor(&mut self) {
        self.cursor = CURSOR_AWAY;
    }

    /// Sets the device pixel ratio used to convert logical cursor
    /// coordinates to physical pixels.
    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    /// The currently highlighted object, if any.
    #[must_use]
    pub fn highlighted(&self) -> Option<PickId> {
        self.state.highlighted()
    }

    /// Performs one pick: renders the ID-scene through a 1-pixel frustum at
    /// the cursor, reads the pixel back, and drives the highlight state.
    ///
    /// Returns the object highlighted after the transition, if any. `time`
    /// feeds the highlight animation.
    #[allow(clippy::too_many_arguments)]
    pub fn pick(
        &mut self,
        engine: &mut RenderEngine,
        camera: &mut Camera,
        id_scene: &Scene,
        scene: &mut Scene,
        index: &IdentityIndex,
        policy: &HighlightPolicy,
        time: f32,
    ) -> RenderResult<Option<PickId>> {
        let full_width = engine.width as f32;
        let full_height = engine.height as f32;
        let px = (self.cursor.0 * self.pixel_ratio).floor() as f32;
        let py = (self.cursor.1 * self.pixel_ratio).floor() as f32;

        // Narrow the frustum to the cursor pixel for this one pass. The
        // offset is cleared before anything else renders with this camera.
        camera.set_view_offset(full_width, full_height, px, py, 1.0, 1.0);
        engine.update_camera(&self.camera_binding, camera);
        camera.clear_view_offset();

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Pick Encoder"),
            });
        engine.render_scene_pass(
            &mut encoder,
            id_scene,
            &self.camera_binding,
            self.target.view(),
            self.target.depth_view(),
            PassKind::PickId,
            None,
        );
        engine.queue.submit(std::iter::once(encoder.finish()));

        let pixel = self.target.read_pixel(&engine.device, &engine.queue, 0, 0)?;
        let raw_id = color_to_id(pixel[0], pixel[1], pixel[2]);

        Ok(self.state.resolve(raw_id, index, scene, policy, time))
    }

    /// Deletes the currently highlighted object, if any.
    ///
    /// Removes the visible mesh and its ID twin from both scenes, drops the
    /// renderer's cached resources for them, and empties the highlight slot
    /// without a restore (there is nothing left to restore into).
    pub fn click(
        &mut self,
        engine: &mut RenderEngine,
        scene: &mut Scene,
        id_scene: &mut Scene,
        index: &mut IdentityIndex,
    ) -> Option<PickId> {
        let id = self.state.highlighted()?;
        let object = remove_object(id, index, scene, id_scene)?;
        engine.release_mesh(scene.id(), object.visible);
        engine.release_mesh(id_scene.id(), object.twin);
        engine.prune_geometry();
        self.state.forget();
        log::info!("deleted object {id}");
        Some(id)
    }

    /// Restores any active highlight and empties the slot.
    pub fn reset(&mut self, index: &IdentityIndex, scene: &mut Scene) {
        self.state.clear(index, scene);
    }
}
