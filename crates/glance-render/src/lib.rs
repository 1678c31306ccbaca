//! Rendering backend for glance.
//!
//! This crate provides the wgpu-based engine:
//! - device/surface setup (windowed or headless)
//! - the [`Camera`] with asymmetric-frustum view-offset support
//! - [`OffscreenTarget`]s: the 1x1 pick target and the composite target
//! - scene render passes and single-pixel readback

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod camera;
pub mod engine;
pub mod error;
pub mod target;

pub use camera::{Camera, ProjectionMode, ViewOffset};
pub use engine::{
    CameraBinding, CameraUniforms, MeshUniforms, PassKind, RenderEngine, TextureBinding,
};
pub use error::{RenderError, RenderResult};
pub use target::OffscreenTarget;
