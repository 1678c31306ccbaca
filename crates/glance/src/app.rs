//! Application window and event loop management.

use std::sync::Arc;
use std::time::Instant;

use pollster::FutureExt;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use glance_core::{
    remove_object, GeometryHandle, GlanceError, HighlightPolicy, IdAllocator, IdentityIndex,
    Material, Mesh, MeshKey, Options, PickId, PickableObject, Result, Scene, Transform,
};
use glance_render::{Camera, CameraBinding, PassKind, RenderEngine, RenderError};

use crate::compositor::Compositor;
use crate::picker::GpuPicker;

/// Left-button presses that move less than this (logical pixels, summed per
/// axis) count as clicks rather than drags.
const CLICK_DRAG_LIMIT: f64 = 5.0;

/// The viewer: scenes, camera, registered pickables, and options.
///
/// All of this is CPU state, so a full scene can be assembled before a
/// window or graphics device exists. [`Viewer::run`] opens the window and
/// hands everything to the event loop.
pub struct Viewer {
    pub options: Options,
    /// The visible scene.
    pub scene: Scene,
    /// The parallel ID-scene holding the flat-colored pick twins.
    pub id_scene: Scene,
    /// Pick ID to object mapping.
    pub index: IdentityIndex,
    /// Allocates pick IDs and keeps the two scenes in step.
    pub allocator: IdAllocator,
    /// The primary camera.
    pub camera: Camera,
    /// Highlight animation parameters.
    pub policy: HighlightPolicy,
    /// Optional render-to-texture sub-scene.
    pub compositor: Option<Compositor>,
}

impl Viewer {
    /// Creates a viewer from options.
    #[must_use]
    pub fn new(options: Options) -> Self {
        let mut camera = Camera::new(16.0 / 9.0);
        camera.fov = options.camera_fov;
        camera.near = options.camera_near;
        camera.far = options.camera_far;

        Self {
            scene: Scene::with_background(options.background()),
            id_scene: Scene::id_scene(),
            index: IdentityIndex::new(),
            allocator: IdAllocator::new(),
            camera,
            policy: options.highlight_policy(),
            compositor: None,
            options,
        }
    }

    /// Registers a pickable object: inserts the visible mesh, creates its
    /// ID twin, and returns the registration.
    pub fn add_pickable(
        &mut self,
        geometry: GeometryHandle,
        material: Material,
        transform: Transform,
    ) -> Result<PickableObject> {
        self.allocator.allocate(
            &mut self.scene,
            &mut self.id_scene,
            &mut self.index,
            geometry,
            material,
            transform,
        )
    }

    /// Inserts a mesh that does not participate in picking.
    pub fn add_mesh(&mut self, mesh: Mesh) -> MeshKey {
        self.scene.insert(mesh)
    }

    /// Removes a registered pickable object by ID: the visible mesh, its
    /// ID twin, and the index entry.
    ///
    /// # Errors
    ///
    /// Returns [`GlanceError::ObjectNotFound`] if no object is registered
    /// under `id`.
    pub fn remove_pickable(&mut self, id: PickId) -> Result<PickableObject> {
        remove_object(id, &mut self.index, &mut self.scene, &mut self.id_scene)
            .ok_or(GlanceError::ObjectNotFound(id.get()))
    }

    /// Attaches a compositor whose target the primary scene can sample.
    pub fn set_compositor(&mut self, compositor: Compositor) {
        self.compositor = Some(compositor);
    }

    /// Opens the window and runs the event loop until the user quits.
    pub fn run(self) -> Result<()> {
        let event_loop =
            EventLoop::new().map_err(|e| GlanceError::Render(format!("event loop: {e}")))?;
        let mut app = App::new(self);
        event_loop
            .run_app(&mut app)
            .map_err(|e| GlanceError::Render(format!("event loop: {e}")))?;
        Ok(())
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

/// The running application: the viewer plus window-lifetime GPU state.
struct App {
    viewer: Viewer,
    window: Option<Arc<Window>>,
    engine: Option<RenderEngine>,
    picker: Option<GpuPicker>,
    main_camera_binding: Option<CameraBinding>,
    start: Instant,
    close_requested: bool,
    // Mouse state for camera control, in logical coordinates.
    mouse_pos: (f64, f64),
    left_mouse_down: bool,
    shift_down: bool,
    // Accumulated movement since the left button went down.
    drag_distance: f64,
}

impl App {
    fn new(viewer: Viewer) -> Self {
        Self {
            viewer,
            window: None,
            engine: None,
            picker: None,
            main_camera_binding: None,
            start: Instant::now(),
            close_requested: false,
            mouse_pos: (0.0, 0.0),
            left_mouse_down: false,
            shift_down: false,
            drag_distance: 0.0,
        }
    }

    /// Renders one frame.
    ///
    /// The order is load-bearing: the composite pass must be submitted
    /// before the primary pass samples its target, and the pick must run
    /// before the primary pass so this frame already shows the highlight
    /// transition it caused.
    fn render_frame(&mut self) {
        let (Some(engine), Some(picker), Some(binding)) = (
            self.engine.as_mut(),
            self.picker.as_mut(),
            self.main_camera_binding.as_ref(),
        ) else {
            return;
        };
        let time = self.start.elapsed().as_secs_f32();

        // 1. Composite sub-scene.
        if let Some(compositor) = &mut self.viewer.compositor {
            compositor.advance(time);
            compositor.render(engine);
        }

        // 2. Pick and highlight.
        if let Err(e) = picker.pick(
            engine,
            &mut self.viewer.camera,
            &self.viewer.id_scene,
            &mut self.viewer.scene,
            &self.viewer.index,
            &self.viewer.policy,
            time,
        ) {
            log::warn!("pick failed: {e}");
        }

        // 3. Primary scene to the surface.
        let frame = match engine.acquire_frame() {
            Ok(frame) => frame,
            Err(RenderError::SurfaceAcquireFailed(
                wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated,
            )) => {
                engine.resize(engine.width, engine.height);
                return;
            }
            Err(e) => {
                log::error!("failed to acquire frame: {e}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        engine.update_camera(binding, &self.viewer.camera);
        let depth_view = engine.depth_view.clone();

        let mut encoder = engine
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        let composite_binding = self
            .viewer
            .compositor
            .as_ref()
            .and_then(Compositor::texture_binding);
        engine.render_scene_pass(
            &mut encoder,
            &self.viewer.scene,
            binding,
            &view,
            &depth_view,
            PassKind::Display,
            composite_binding,
        );
        engine.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
    }

    fn handle_click(&mut self) {
        let (Some(engine), Some(picker)) = (self.engine.as_mut(), self.picker.as_mut()) else {
            return;
        };
        picker.click(
            engine,
            &mut self.viewer.scene,
            &mut self.viewer.id_scene,
            &mut self.viewer.index,
        );
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.viewer.options.window_title.clone())
            .with_inner_size(LogicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(window_attributes)
                .expect("failed to create window"),
        );

        let engine = RenderEngine::new_windowed(window.clone())
            .block_on()
            .expect("failed to create render engine");

        self.viewer
            .camera
            .set_aspect_ratio(engine.width as f32 / engine.height as f32);

        let mut picker = GpuPicker::new(&engine);
        picker.set_pixel_ratio(window.scale_factor());

        self.main_camera_binding = Some(engine.create_camera_binding());
        self.picker = Some(picker);
        self.engine = Some(engine);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                if let Some(engine) = &mut self.engine {
                    engine.resize(size.width, size.height);
                    self.viewer
                        .camera
                        .set_aspect_ratio(size.width as f32 / size.height.max(1) as f32);
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(picker) = &mut self.picker {
                    picker.set_pixel_ratio(scale_factor);
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self
                    .window
                    .as_ref()
                    .map_or(1.0, |window| window.scale_factor());
                let logical = position.to_logical::<f64>(scale);

                let delta_x = logical.x - self.mouse_pos.0;
                let delta_y = logical.y - self.mouse_pos.1;
                self.mouse_pos = (logical.x, logical.y);

                if self.left_mouse_down {
                    self.drag_distance += delta_x.abs() + delta_y.abs();
                    if self.shift_down {
                        let scale = self
                            .viewer
                            .camera
                            .position
                            .distance(self.viewer.camera.target)
                            * 0.002;
                        self.viewer
                            .camera
                            .pan(-delta_x as f32 * scale, delta_y as f32 * scale);
                    } else {
                        self.viewer
                            .camera
                            .orbit(delta_x as f32 * 0.01, delta_y as f32 * 0.01);
                    }
                }

                if let Some(picker) = &mut self.picker {
                    picker.set_cursor(logical.x, logical.y);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                // Park the cursor far outside the window so the next pick
                // resolves to background and the highlight is restored.
                if let Some(picker) = &mut self.picker {
                    picker.clear_cursor();
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match (button, state) {
                (MouseButton::Left, ElementState::Pressed) => {
                    self.left_mouse_down = true;
                    self.drag_distance = 0.0;
                }
                (MouseButton::Left, ElementState::Released) => {
                    self.left_mouse_down = false;
                    if self.drag_distance < CLICK_DRAG_LIMIT {
                        self.handle_click();
                    }
                }
                _ => {}
            },
            WindowEvent::ModifiersChanged(modifiers) => {
                self.shift_down = modifiers.state().shift_key();
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    winit::event::MouseScrollDelta::LineDelta(_, y) => y,
                    winit::event::MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.1,
                };
                let scale = self
                    .viewer
                    .camera
                    .position
                    .distance(self.viewer.camera.target)
                    * 0.1;
                self.viewer.camera.zoom(scroll * scale);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && event.physical_key
                        == winit::keyboard::PhysicalKey::Code(winit::keyboard::KeyCode::Escape)
                {
                    self.close_requested = true;
                }
            }
            _ => {}
        }

        if self.close_requested {
            event_loop.exit();
        }
    }
}
