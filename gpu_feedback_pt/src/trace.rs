use wgpu::{BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor, BindingResource, Device, Queue, RenderPipeline, Sampler, ShaderStages};
use feedback_common::error::RenderError;
use feedback_common::gpu_buffer::GPUBuffer;
use crate::mesh::Mesh;
use crate::program::ShaderProgram;
use crate::render_target::{sampler_layout, texture_layout, FeedbackTexture, NoiseTexture, RenderTarget, HDR_FORMAT};

/// Clear color of the offscreen target, only visible where the shader writes nothing.
const CLEAR_COLOR: wgpu::Color = wgpu::Color { r: 0.0, g: 0.15, b: 0.3, a: 1.0 };

/// The path tracer: draws the quad into the render target, reading the noise
/// texture (binding 0), the feedback texture (binding 1) and the frame
/// uniforms (binding 3).
pub struct TraceKernel {
    bind_group: BindGroup,
    pipeline: RenderPipeline,
}

impl TraceKernel {
    pub fn new(device: &Device,
               program: &ShaderProgram,
               noise_texture: &NoiseTexture,
               feedback_texture: &FeedbackTexture,
               sampler: &Sampler,
               uniform_buffer: &GPUBuffer) -> Result<Self, RenderError> {
        let bind_group_layout = device.create_bind_group_layout(
            &BindGroupLayoutDescriptor {
                label: Some("trace bind group layout"),
                entries: &[
                    texture_layout(0, ShaderStages::FRAGMENT),
                    texture_layout(1, ShaderStages::FRAGMENT),
                    sampler_layout(2, ShaderStages::FRAGMENT),
                    uniform_buffer.layout(ShaderStages::FRAGMENT),
                ],
            });

        let bind_group = device.create_bind_group(&BindGroupDescriptor {
            label: Some("trace bind group"),
            layout: &bind_group_layout,
            entries: &[
                BindGroupEntry { binding: 0, resource: BindingResource::TextureView(noise_texture.view()) },
                BindGroupEntry { binding: 1, resource: BindingResource::TextureView(feedback_texture.view()) },
                BindGroupEntry { binding: 2, resource: BindingResource::Sampler(sampler) },
                uniform_buffer.binding(),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(
            &wgpu::PipelineLayoutDescriptor {
                label: Some("trace pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = program.render_pipeline(device, &pipeline_layout, HDR_FORMAT)?;

        Ok(Self {
            bind_group,
            pipeline,
        })
    }

    pub fn run(&self, device: &Device, queue: &Queue, target: &RenderTarget, mesh: &Mesh) {
        let mut encoder = device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("trace kernel encoder"),
            });

        {
            let mut trace_pass = encoder.begin_render_pass(
                &wgpu::RenderPassDescriptor {
                    label: Some("trace render pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target.view(),
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None
                });
            trace_pass.set_pipeline(&self.pipeline);
            trace_pass.set_bind_group(0, &self.bind_group, &[]);
            mesh.draw(&mut trace_pass);
        }
        queue.submit(Some(encoder.finish()));
    }
}
