//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Failed to create surface.
    #[error("failed to create surface: {0}")]
    SurfaceCreationFailed(#[from] wgpu::CreateSurfaceError),

    /// Failed to acquire the next surface frame.
    #[error("failed to acquire surface frame: {0}")]
    SurfaceAcquireFailed(#[from] wgpu::SurfaceError),

    /// A surface operation was requested on a headless engine.
    #[error("engine has no surface")]
    NoSurface,

    /// Pixel readback from an offscreen target failed.
    #[error("pixel readback failed: {0}")]
    ReadbackFailed(String),

    /// Readback coordinates outside the target.
    #[error("readback position ({x}, {y}) outside {width}x{height} target")]
    ReadbackOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
