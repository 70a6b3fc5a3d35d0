use std::sync::Arc;
use wgpu::{BufferUsages, Sampler};
use winit::window::Window;
use feedback_common::config::AppConfig;
use feedback_common::error::RenderError;
use feedback_common::frame_loop::FrameBackend;
use feedback_common::gpu_buffer::GPUBuffer;
use feedback_common::gpu_structs::{FrameUniforms, GPUFrameUniforms};
use feedback_common::noise::NoiseImage;
use feedback_common::shader_source::ShaderSource;
use feedback_common::wgpu_state::WgpuState;
use crate::denoise::DenoiseKernel;
use crate::mesh::Mesh;
use crate::program::ShaderProgram;
use crate::render_target::{nearest_sampler, FeedbackTexture, NoiseTexture, RenderTarget};
use crate::trace::TraceKernel;

/// Binding index of the frame uniforms in the trace bind group.
const UNIFORM_BINDING: u32 = 3;

/// Owns every GPU resource of the two-pass pipeline. All of it is created
/// here once and lives until the application exits.
pub struct PathTracer {
    wgpu_state: WgpuState,
    render_target: RenderTarget,
    feedback_texture: FeedbackTexture,
    _noise_texture: NoiseTexture,
    _sampler: Sampler,
    uniform_buffer: GPUBuffer,
    mesh: Mesh,
    trace_kernel: TraceKernel,
    denoise_kernel: DenoiseKernel,
}

impl PathTracer {
    pub fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, RenderError> {
        // read the sources before touching the GPU so a typo fails fast
        let trace_source = ShaderSource::load(&config.shaders.trace_stem())?;
        let denoise_source = ShaderSource::load(&config.shaders.denoise_stem())?;

        let wgpu_state = WgpuState::new(window, config.window.vsync)?;
        let device = wgpu_state.device();
        let queue = wgpu_state.queue();

        let trace_program = ShaderProgram::compile(device, &trace_source)?;
        let denoise_program = ShaderProgram::compile(device, &denoise_source)?;

        // the offscreen targets match the surface at startup and are never reallocated
        let resolution = {
            let surface_config = wgpu_state.surface_config();
            (surface_config.width, surface_config.height)
        };
        let render_target = RenderTarget::new(device, resolution);
        let feedback_texture = FeedbackTexture::new(device, resolution);
        let noise_texture = NoiseTexture::new(device, queue,
                                              &NoiseImage::load_or_placeholder(&config.noise_texture));
        let sampler = nearest_sampler(device);

        let uniform_buffer = GPUBuffer::new(device,
                                            BufferUsages::UNIFORM,
                                            GPUFrameUniforms::SIZE,
                                            UNIFORM_BINDING,
                                            Some("frame uniforms buffer"));

        let mesh = Mesh::full_screen_quad(device);

        let trace_kernel = TraceKernel::new(device,
                                            &trace_program,
                                            &noise_texture,
                                            &feedback_texture,
                                            &sampler,
                                            &uniform_buffer)?;
        log::info!("compiled `{}` into the trace kernel", trace_program.name());

        let denoise_kernel = DenoiseKernel::new(device,
                                                &denoise_program,
                                                &render_target,
                                                &sampler,
                                                wgpu_state.surface_format())?;
        log::info!("compiled `{}` into the denoise kernel", denoise_program.name());
        log::info!("render targets {}x{}", resolution.0, resolution.1);

        Ok(Self {
            wgpu_state,
            render_target,
            feedback_texture,
            _noise_texture: noise_texture,
            _sampler: sampler,
            uniform_buffer,
            mesh,
            trace_kernel,
            denoise_kernel,
        })
    }

    /// Only the surface follows the window; the denoise pass stretches the
    /// fixed size trace output over it.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        self.wgpu_state.resize(new_size);
    }
}

impl FrameBackend for PathTracer {
    fn resolution(&self) -> (u32, u32) {
        self.render_target.size()
    }

    fn trace(&mut self, uniforms: &FrameUniforms) {
        let device = self.wgpu_state.device();
        let queue = self.wgpu_state.queue();
        self.uniform_buffer.queue_for_gpu(queue, bytemuck::bytes_of(&GPUFrameUniforms::from(uniforms)));
        self.trace_kernel.run(device, queue, &self.render_target, &self.mesh);
    }

    fn copy_feedback(&mut self) {
        let device = self.wgpu_state.device();
        let mut encoder = device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("feedback copy encoder"),
            });
        self.feedback_texture.copy_from(&mut encoder, &self.render_target);
        self.wgpu_state.queue().submit(Some(encoder.finish()));
    }

    fn denoise(&mut self) -> Result<(), RenderError> {
        self.denoise_kernel.run(&self.wgpu_state, &self.mesh)
    }
}
