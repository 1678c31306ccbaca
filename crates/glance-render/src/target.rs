//! Offscreen render targets.

use crate::error::{RenderError, RenderResult};

/// A color + depth texture pair that can be rendered to and, when created
/// with readback enabled, read back to the CPU.
///
/// Two configurations are used: a 1x1 `Rgba8Unorm` target with readback for
/// picking, and a larger target without readback that other passes sample as
/// a texture.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    staging_buffer: Option<wgpu::Buffer>,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Creates an offscreen target of the given size and format.
    ///
    /// When `readback` is set, a staging buffer is allocated so single
    /// pixels can be read with [`OffscreenTarget::read_pixel`].
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        readback: bool,
    ) -> Self {
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        if readback {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Color Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth24Plus,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());

        // Single pixel readback needs 4 bytes; buffer rows must be aligned
        // to COPY_BYTES_PER_ROW_ALIGNMENT (256).
        let staging_buffer = readback.then(|| {
            device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Offscreen Staging Buffer"),
                size: 256,
                usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
                mapped_at_creation: false,
            })
        });

        Self {
            texture,
            view,
            depth_view,
            staging_buffer,
            format,
            width,
            height,
        }
    }

    /// Creates the 1x1 picking target.
    #[must_use]
    pub fn pick_target(device: &wgpu::Device) -> Self {
        Self::new(device, 1, 1, wgpu::TextureFormat::Rgba8Unorm, true)
    }

    /// The color texture view, for use as a render attachment or sampled
    /// texture.
    #[must_use]
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    /// The depth texture view.
    #[must_use]
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// The color texture format.
    #[must_use]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Target width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Target height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reads back a single pixel as RGBA bytes, blocking until the GPU copy
    /// completes.
    ///
    /// The target must have been created with readback enabled.
    pub fn read_pixel(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        x: u32,
        y: u32,
    ) -> RenderResult<[u8; 4]> {
        let staging_buffer = self
            .staging_buffer
            .as_ref()
            .ok_or_else(|| RenderError::ReadbackFailed("target has no staging buffer".into()))?;

        if x >= self.width || y >= self.height {
            return Err(RenderError::ReadbackOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Pixel Readback Encoder"),
        });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(256),
                    rows_per_image: Some(1),
                },
            },
            wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
        );

        queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..4);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        let _ = device.poll(wgpu::PollType::wait());
        if let Err(e) = rx
            .recv()
            .map_err(|_| RenderError::ReadbackFailed("map callback dropped".into()))?
        {
            log::error!("pixel readback map failed: {e}");
            return Err(RenderError::ReadbackFailed(e.to_string()));
        }

        let data = buffer_slice.get_mapped_range();
        let pixel: [u8; 4] = [data[0], data[1], data[2], data[3]];
        drop(data);
        staging_buffer.unmap();

        Ok(pixel)
    }
}
