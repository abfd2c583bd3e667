#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct BlitVertex {
    /// Clip-space position.
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl BlitVertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x2,  // position
        1 => Float32x2,  // uv
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<BlitVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Two triangles covering the whole viewport. The viewport itself does the
/// letterboxing, so the quad never changes.
pub const QUAD: [BlitVertex; 6] = [
    BlitVertex { position: [-1.0,  1.0], uv: [0.0, 0.0] },
    BlitVertex { position: [-1.0, -1.0], uv: [0.0, 1.0] },
    BlitVertex { position: [ 1.0, -1.0], uv: [1.0, 1.0] },
    BlitVertex { position: [-1.0,  1.0], uv: [0.0, 0.0] },
    BlitVertex { position: [ 1.0, -1.0], uv: [1.0, 1.0] },
    BlitVertex { position: [ 1.0,  1.0], uv: [1.0, 0.0] },
];

pub struct BlitPipeline {
    pub render_pipeline: wgpu::RenderPipeline,
    /// group 0: frame texture + sampler
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
}

pub fn create_blit_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
) -> BlitPipeline {
    let shader = device.create_shader_module(wgpu::include_wgsl!("shaders/blit.wgsl"));

    let frame_bind_group_layout =
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("blit_pipeline_layout"),
        bind_group_layouts: &[&frame_bind_group_layout],
        ..Default::default()
    });

    let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("blit_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[BlitVertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            // The frame is already composited and opaque.
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    BlitPipeline { render_pipeline, frame_bind_group_layout }
}
