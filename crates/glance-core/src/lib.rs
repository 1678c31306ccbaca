//! Core abstractions for glance.
//!
//! This crate provides the CPU-side model shared by the renderer and the
//! viewer application:
//! - 24-bit pick ID encoding and the [`IdAllocator`]
//! - the retained [`Scene`] / [`Mesh`] model and geometry primitives
//! - the [`Highlightable`] material capability and the [`PickState`] machine
//! - configuration options and error types
//!
//! Nothing in this crate talks to the GPU; everything here is testable
//! without a graphics adapter.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Builder patterns return Self which doesn't need must_use
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod geometry;
pub mod highlight;
pub mod identity;
pub mod material;
pub mod options;
pub mod pick;
pub mod scene;
pub mod state;

pub use error::{GlanceError, Result};
pub use geometry::{Geometry, GeometryHandle, Vertex};
pub use highlight::HighlightPolicy;
pub use identity::{remove_object, IdAllocator, IdentityIndex, PickableObject};
pub use material::{
    Color, FlatMaterial, Highlightable, Material, StandardMaterial, TextureSource,
    TexturedMaterial,
};
pub use options::Options;
pub use pick::{color_to_id, id_to_color, PickId, MAX_PICK_ID};
pub use scene::{Mesh, MeshKey, Scene, SceneId, Transform};
pub use state::PickState;

// Re-export glam types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
