//! Render pipeline construction.

use glance_core::Vertex;

pub(crate) struct Pipelines {
    pub mesh: wgpu::RenderPipeline,
    pub flat: wgpu::RenderPipeline,
    pub textured: wgpu::RenderPipeline,
    pub id: wgpu::RenderPipeline,
}

fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 0,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: 12,
                shader_location: 1,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x2,
                offset: 24,
                shader_location: 2,
            },
        ],
    }
}

struct PipelineDescriptor<'a> {
    label: &'a str,
    shader: &'a wgpu::ShaderModule,
    layout: &'a wgpu::PipelineLayout,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
}

fn build_pipeline(device: &wgpu::Device, desc: &PipelineDescriptor) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: desc.shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_buffer_layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: desc.shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: desc.format,
                blend: desc.blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..wgpu::PrimitiveState::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

pub(crate) fn build_pipelines(
    device: &wgpu::Device,
    display_format: wgpu::TextureFormat,
    camera_layout: &wgpu::BindGroupLayout,
    mesh_layout: &wgpu::BindGroupLayout,
    texture_layout: &wgpu::BindGroupLayout,
) -> Pipelines {
    let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Mesh Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/mesh.wgsl").into()),
    });
    let flat_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Flat Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/flat.wgsl").into()),
    });
    let textured_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Textured Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/textured.wgsl").into()),
    });

    let basic_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Basic Pipeline Layout"),
        bind_group_layouts: &[camera_layout, mesh_layout],
        push_constant_ranges: &[],
    });
    let textured_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Textured Pipeline Layout"),
        bind_group_layouts: &[camera_layout, mesh_layout, texture_layout],
        push_constant_ranges: &[],
    });

    let mesh = build_pipeline(
        device,
        &PipelineDescriptor {
            label: "Mesh Pipeline",
            shader: &mesh_shader,
            layout: &basic_layout,
            format: display_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        },
    );

    let flat = build_pipeline(
        device,
        &PipelineDescriptor {
            label: "Flat Pipeline",
            shader: &flat_shader,
            layout: &basic_layout,
            format: display_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        },
    );

    let textured = build_pipeline(
        device,
        &PipelineDescriptor {
            label: "Textured Pipeline",
            shader: &textured_shader,
            layout: &textured_pipeline_layout,
            format: display_format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
        },
    );

    // ID colors must reach the target unmodified, so no blending.
    let id = build_pipeline(
        device,
        &PipelineDescriptor {
            label: "ID Pipeline",
            shader: &flat_shader,
            layout: &basic_layout,
            format: wgpu::TextureFormat::Rgba8Unorm,
            blend: None,
        },
    );

    Pipelines {
        mesh,
        flat,
        textured,
        id,
    }
}
