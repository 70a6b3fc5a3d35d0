use wgpu::{BindGroup, BindGroupDescriptor, BindGroupEntry, BindGroupLayoutDescriptor, BindingResource, Device, RenderPipeline, Sampler, ShaderStages, TextureFormat};
use feedback_common::error::RenderError;
use feedback_common::wgpu_state::WgpuState;
use crate::mesh::Mesh;
use crate::program::ShaderProgram;
use crate::render_target::{sampler_layout, texture_layout, RenderTarget};

/// Filters the trace output onto the window surface and presents it.
pub struct DenoiseKernel {
    bind_group: BindGroup,
    pipeline: RenderPipeline,
}

impl DenoiseKernel {
    pub fn new(device: &Device,
               program: &ShaderProgram,
               render_target: &RenderTarget,
               sampler: &Sampler,
               surface_format: TextureFormat) -> Result<Self, RenderError> {
        let bind_group_layout = device.create_bind_group_layout(
            &BindGroupLayoutDescriptor {
                label: Some("denoise bind group layout"),
                entries: &[
                    texture_layout(0, ShaderStages::FRAGMENT),
                    sampler_layout(1, ShaderStages::FRAGMENT),
                ],
            }
        );

        let bind_group = device.create_bind_group(
            &BindGroupDescriptor {
                label: Some("denoise bind group"),
                layout: &bind_group_layout,
                entries: &[
                    BindGroupEntry { binding: 0, resource: BindingResource::TextureView(render_target.view()) },
                    BindGroupEntry { binding: 1, resource: BindingResource::Sampler(sampler) },
                ],
            }
        );

        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("denoise pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipeline = program.render_pipeline(device, &pipeline_layout, surface_format)?;

        Ok(Self {
            bind_group,
            pipeline
        })
    }

    /// A lost or outdated surface is reconfigured and the frame is simply not
    /// presented; only running out of memory is an error.
    pub fn run(&self, wgpu_state: &WgpuState, mesh: &Mesh) -> Result<(), RenderError> {
        let output = match wgpu_state.surface().get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::SurfaceOutOfMemory),
            Err(err) => {
                log::warn!("skipping present: {err}");
                wgpu_state.reconfigure();
                return Ok(());
            }
        };
        let view = output.texture.create_view(
            &wgpu::TextureViewDescriptor::default());

        let device = wgpu_state.device();
        let queue = wgpu_state.queue();
        let mut encoder = device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("denoise kernel encoder"),
            });

        {
            let mut denoise_pass = encoder.begin_render_pass(
                &wgpu::RenderPassDescriptor {
                    label: Some("denoise render pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None
                });
            denoise_pass.set_pipeline(&self.pipeline);
            denoise_pass.set_bind_group(0, &self.bind_group, &[]);
            mesh.draw(&mut denoise_pass);
        }
        queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }
}
