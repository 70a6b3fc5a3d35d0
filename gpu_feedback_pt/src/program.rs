use std::borrow::Cow;
use wgpu::{Device, PipelineLayout, RenderPipeline, ShaderModule, TextureFormat};
use feedback_common::error::RenderError;
use feedback_common::shader_source::ShaderSource;
use feedback_common::vertex::Vertex;

/// A compiled vertex/fragment pair. Entry points are `vs_main` and `fs_main`.
pub struct ShaderProgram {
    name: String,
    vertex: ShaderModule,
    fragment: ShaderModule,
}

impl ShaderProgram {
    pub fn compile(device: &Device, source: &ShaderSource) -> Result<Self, RenderError> {
        let (vertex, fragment) = validated(device, &source.name, || {
            let vertex = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{} vertex shader", source.name)),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&source.vertex)),
            });
            let fragment = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&format!("{} fragment shader", source.name)),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(&source.fragment)),
            });
            (vertex, fragment)
        })?;

        Ok(Self {
            name: source.name.clone(),
            vertex,
            fragment,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Links both stages into a pipeline that draws the full-screen quad into
    /// a single color target. Interface mismatches between the stages and the
    /// layout surface here.
    pub fn render_pipeline(&self, device: &Device, layout: &PipelineLayout, format: TextureFormat)
        -> Result<RenderPipeline, RenderError> {
        validated(device, &self.name, || {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&format!("{} pipeline", self.name)),
                layout: Some(layout),
                vertex: wgpu::VertexState {
                    module: &self.vertex,
                    entry_point: "vs_main",
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.fragment,
                    entry_point: "fs_main",
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState {
                    count: 1,
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
                cache: None,
            })
        })
    }
}

// wgpu reports compile and link problems as validation errors on the device
fn validated<T>(device: &Device, name: &str, create: impl FnOnce() -> T) -> Result<T, RenderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    match pollster::block_on(device.pop_error_scope()) {
        Some(error) => Err(RenderError::ShaderCompile {
            name: name.to_string(),
            message: error.to_string(),
        }),
        None => Ok(value),
    }
}
