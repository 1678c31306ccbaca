//! Scene rendering passes.

use wgpu::util::DeviceExt;

use glance_core::{Material, Mesh, Scene, TextureSource};

use super::{CameraBinding, GeometryGpu, MeshGpu, MeshUniforms, PassKind, RenderEngine, TextureBinding};

fn mesh_uniforms(mesh: &Mesh) -> MeshUniforms {
    let (base_color, emissive, alpha_test) = match &mesh.material {
        Material::Standard(m) => (
            m.base_color.to_array4(1.0),
            m.emissive.to_array4(0.0),
            m.alpha_test,
        ),
        Material::Flat(m) => (m.color.to_array4(1.0), [0.0; 4], m.alpha_test),
        Material::Textured(m) => {
            let base = match m.source {
                TextureSource::Composite => m.tint.to_array4(1.0),
                TextureSource::Solid(color) => color.to_array4(1.0),
            };
            (base, [0.0; 4], None)
        }
    };
    MeshUniforms {
        model: mesh.transform.to_matrix().to_cols_array_2d(),
        base_color,
        emissive,
        params: [alpha_test.unwrap_or(-1.0), 0.0, 0.0, 0.0],
    }
}

impl RenderEngine {
    /// Uploads or refreshes GPU resources for every mesh in the scene.
    ///
    /// Geometry buffers are created once per geometry; per-mesh uniforms are
    /// rewritten every call since transforms and highlight colors change
    /// between frames.
    pub fn prepare_scene(&mut self, scene: &Scene) {
        let scene_id = scene.id();
        for (key, mesh) in scene.iter() {
            let geometry_id = mesh.geometry.id();
            self.geometry_cache.entry(geometry_id).or_insert_with(|| {
                let vertex_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Mesh Vertex Buffer"),
                            contents: bytemuck::cast_slice(&mesh.geometry.vertices),
                            usage: wgpu::BufferUsages::VERTEX,
                        });
                let index_buffer =
                    self.device
                        .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                            label: Some("Mesh Index Buffer"),
                            contents: bytemuck::cast_slice(&mesh.geometry.indices),
                            usage: wgpu::BufferUsages::INDEX,
                        });
                GeometryGpu {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.geometry.indices.len() as u32,
                    geometry: std::sync::Arc::downgrade(&mesh.geometry),
                }
            });

            let uniforms = mesh_uniforms(mesh);
            let entry = self
                .mesh_cache
                .entry((scene_id, key))
                .or_insert_with(|| {
                    let uniform_buffer =
                        self.device
                            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                                label: Some("Mesh Uniform Buffer"),
                                contents: bytemuck::cast_slice(&[uniforms]),
                                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                            });
                    let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                        label: Some("Mesh Bind Group"),
                        layout: &self.mesh_layout,
                        entries: &[wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform_buffer.as_entire_binding(),
                        }],
                    });
                    MeshGpu {
                        uniform_buffer,
                        bind_group,
                    }
                });
            self.queue
                .write_buffer(&entry.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));
        }
    }

    /// Records one full render pass of a scene into the given attachments.
    ///
    /// `composite` supplies the sampled texture for materials bound to the
    /// composite target; passes whose scenes contain no such material may
    /// pass `None`.
    pub fn render_scene_pass(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        scene: &Scene,
        camera: &CameraBinding,
        color_view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        kind: PassKind,
        composite: Option<&TextureBinding>,
    ) {
        self.prepare_scene(scene);

        let bg = scene.background;
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(match kind {
                PassKind::Display => "Display Pass",
                PassKind::PickId => "Pick ID Pass",
            }),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: f64::from(bg.r),
                        g: f64::from(bg.g),
                        b: f64::from(bg.b),
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });

        pass.set_bind_group(0, &camera.bind_group, &[]);

        let scene_id = scene.id();
        for (key, mesh) in scene.iter() {
            let Some(geometry) = self.geometry_cache.get(&mesh.geometry.id()) else {
                continue;
            };
            let Some(mesh_gpu) = self.mesh_cache.get(&(scene_id, key)) else {
                continue;
            };

            match kind {
                PassKind::PickId => pass.set_pipeline(&self.id_pipeline),
                PassKind::Display => match &mesh.material {
                    Material::Standard(_) => pass.set_pipeline(&self.mesh_pipeline),
                    Material::Flat(_) => pass.set_pipeline(&self.flat_pipeline),
                    Material::Textured(m) => {
                        match (m.source, composite) {
                            (TextureSource::Composite, Some(binding)) => {
                                pass.set_pipeline(&self.textured_pipeline);
                                pass.set_bind_group(2, &binding.bind_group, &[]);
                            }
                            // Solid source or missing composite input: render
                            // as a lit surface with the fallback color.
                            _ => pass.set_pipeline(&self.mesh_pipeline),
                        }
                    }
                },
            }

            pass.set_bind_group(1, &mesh_gpu.bind_group, &[]);
            pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            pass.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..geometry.index_count, 0, 0..1);
        }
    }
}
