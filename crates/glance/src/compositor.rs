//! Render-to-texture compositing.
//!
//! A [`Compositor`] owns an independent sub-scene and a fixed-size square
//! offscreen target. Each frame the sub-scene is advanced and rendered into
//! the target, whose color buffer is then sampled as a texture by materials
//! in the primary scene. The composite render must be submitted before the
//! primary pass samples it, otherwise the primary scene shows last frame's
//! image.

use glance_core::{MeshKey, Scene};
use glance_render::{Camera, CameraBinding, OffscreenTarget, PassKind, RenderEngine, TextureBinding};

struct CompositorGpu {
    target: OffscreenTarget,
    binding: CameraBinding,
    texture_binding: TextureBinding,
}

/// An offscreen sub-scene rendered to a texture once per frame.
///
/// The sub-scene and camera are plain CPU state and can be populated before
/// a graphics device exists; GPU resources are created on first render.
pub struct Compositor {
    /// The sub-scene. Callers populate it like any other scene.
    pub scene: Scene,
    /// Camera for the sub-scene. Aspect ratio is fixed at 1.0 to match the
    /// square target.
    pub camera: Camera,
    resolution: u32,
    /// Meshes spun by [`Compositor::advance`], with per-mesh rates in
    /// radians per second.
    spinning: Vec<(MeshKey, f32)>,
    gpu: Option<CompositorGpu>,
}

impl Compositor {
    /// Creates a compositor with a square target of the given resolution.
    #[must_use]
    pub fn new(resolution: u32) -> Self {
        let mut camera = Camera::new(1.0);
        camera.position = glam::Vec3::new(0.0, 0.0, 4.0);

        Self {
            scene: Scene::new(),
            camera,
            resolution,
            spinning: Vec::new(),
            gpu: None,
        }
    }

    /// Registers a mesh to be spun by [`Compositor::advance`].
    pub fn spin(&mut self, key: MeshKey, rate: f32) {
        self.spinning.push((key, rate));
    }

    /// Advances the sub-scene's animation to the given time in seconds.
    pub fn advance(&mut self, time: f32) {
        for &(key, rate) in &self.spinning {
            if let Some(mesh) = self.scene.get_mut(key) {
                mesh.transform.rotation.x = time * rate;
                mesh.transform.rotation.y = time * rate * 0.7;
            }
        }
    }

    /// Renders the sub-scene into the composite target and submits it.
    ///
    /// Must run before the primary pass that samples the target. The target
    /// uses the engine's display format so the sub-scene renders with the
    /// same pipelines as the primary scene.
    pub fn render(&mut self, engine: &mut RenderEngine) {
        if self.gpu.is_none() {
            let target = OffscreenTarget::new(
                &engine.device,
                self.resolution,
                self.resolution,
                engine.surface_config.format,
                false,
            );
            let texture_binding = engine.create_texture_binding(target.view());
            self.gpu = Some(CompositorGpu {
                target,
                binding: engine.create_camera_binding(),
                texture_binding,
            });
        }
        let Some(gpu) = &self.gpu else { return };

        engine.update_camera(&gpu.binding, &self.camera);

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Composite Encoder"),
            });
        engine.render_scene_pass(
            &mut encoder,
            &self.scene,
            &gpu.binding,
            gpu.target.view(),
            gpu.target.depth_view(),
            PassKind::Display,
            None,
        );
        engine.queue.submit(std::iter::once(encoder.finish()));
    }

    /// The bind group sampling this compositor's color buffer. `None` until
    /// the first render.
    #[must_use]
    pub fn texture_binding(&self) -> Option<&TextureBinding> {
        self.gpu.as_ref().map(|gpu| &gpu.texture_binding)
    }

    /// Target resolution in pixels (square).
    #[must_use]
    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}
