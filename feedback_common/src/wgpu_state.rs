use std::sync::Arc;
use winit::window::Window;
use crate::error::RenderError;

/// The connection to the GPU: surface, device and queue.
pub struct WgpuState {
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuState {
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<WgpuState, RenderError> {
        pollster::block_on(WgpuState::new_async(window, vsync))
    }

    async fn new_async(window: Arc<Window>, vsync: bool) -> Result<WgpuState, RenderError> {
        let size = {
            let viewport = window.inner_size();
            (viewport.width.max(1), viewport.height.max(1))
        };

        let instance = wgpu::Instance::new(
            wgpu::InstanceDescriptor {
                backends: wgpu::Backends::PRIMARY,
                ..Default::default()
            }
        );

        let surface = instance.create_surface(Arc::clone(&window))?;

        let adapter = instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            }
        ).await.ok_or(RenderError::NoAdapter)?;
        let info = adapter.get_info();
        log::info!("using {} ({:?}, {:?})", info.name, info.device_type, info.backend);

        let (device, queue) = adapter.request_device(
            &wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: Some("feedback path tracer device"),
                memory_hints: Default::default(),
            },
            None,
        ).await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = choose_surface_format(&surface_capabilities.formats)
            .ok_or(RenderError::NoAdapter)?;
        let present_mode = if vsync {
            wgpu::PresentMode::Fifo
        } else {
            surface_capabilities.present_modes[0]
        };
        log::info!("surface {}x{} {:?} {:?}", size.0, size.1, format, present_mode);

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.0,
            height: size.1,
            present_mode,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &surface_config);

        Ok(Self {
            surface,
            surface_config,
            device,
            queue,
        })
    }

    pub fn surface_config(&self) -> &wgpu::SurfaceConfiguration {
        &self.surface_config
    }
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
    pub fn surface(&self) -> &wgpu::Surface<'static> {
        &self.surface
    }

    /// Zero sized windows (minimized) keep the previous configuration.
    pub fn resize(&mut self, new_size: (u32, u32))
    {
        if new_size.0 == 0 || new_size.1 == 0 {
            return;
        }
        self.surface_config.width = new_size.0;
        self.surface_config.height = new_size.1;
        self.reconfigure();
    }

    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.surface_config);
    }
}

/// The denoise shader applies its own gamma, so a linear format is preferred.
/// An sRGB-only surface is still used, but the image comes out too bright.
fn choose_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    if let Some(linear) = formats.iter().copied().find(|format| !format.is_srgb()) {
        return Some(linear);
    }
    let fallback = formats.first().copied()?;
    log::warn!("surface only offers sRGB formats, using {fallback:?}; gamma is applied twice");
    Some(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn linear_format_wins_over_earlier_srgb() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn srgb_only_surface_falls_back_to_first() {
        let formats = [TextureFormat::Rgba8UnormSrgb, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(choose_surface_format(&formats), Some(TextureFormat::Rgba8UnormSrgb));
        assert_eq!(choose_surface_format(&[]), None);
    }
}
