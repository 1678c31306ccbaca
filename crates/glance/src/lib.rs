//! glance: a small 3D viewer with GPU ID-buffer picking and
//! render-to-texture compositing.
//!
//! Objects registered as pickable get a 24-bit ID encoded as a flat RGB
//! color in a parallel ID-scene. Hovering renders that scene through a
//! one-pixel frustum at the cursor, reads the pixel back, and highlights
//! the decoded object; clicking deletes it. An optional [`Compositor`]
//! renders an independent sub-scene to a texture that materials in the
//! primary scene can sample.
//!
//! # Quick Start
//!
//! ```no_run
//! use glance::*;
//!
//! fn main() -> Result<()> {
//!     init();
//!
//!     let mut viewer = Viewer::new(Options::default());
//!     viewer.camera.position = Vec3::new(4.0, 4.0, 4.0);
//!
//!     let cube = Geometry::cuboid(1.0, 1.0, 1.0);
//!     viewer.add_pickable(
//!         cube,
//!         Material::standard(Color::from_hex(0x4488CC)),
//!         Transform::default(),
//!     )?;
//!
//!     viewer.run()
//! }
//! ```

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod app;
mod compositor;
mod picker;

pub use app::Viewer;
pub use compositor::Compositor;
pub use picker::GpuPicker;

// Re-export core types
pub use glance_core::{
    color_to_id, id_to_color, remove_object, Color, FlatMaterial, Geometry, GeometryHandle,
    GlanceError, HighlightPolicy, Highlightable, IdAllocator, IdentityIndex, Material, Mesh,
    MeshKey, Options, PickId, PickState, PickableObject, Result, Scene, SceneId, StandardMaterial,
    TextureSource, TexturedMaterial, Transform, Vertex, MAX_PICK_ID,
};

// Re-export render types
pub use glance_render::{Camera, OffscreenTarget, ProjectionMode, RenderEngine, RenderError};

// Re-export glam types for convenience
pub use glance_core::{Mat4, Quat, Vec2, Vec3, Vec4};

/// Initializes logging.
///
/// Call once at startup; controlled by the `RUST_LOG` environment variable.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
    log::info!("glance initialized");
}
