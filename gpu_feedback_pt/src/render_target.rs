use wgpu::{BindGroupLayoutEntry, BindingType, CommandEncoder, Device, Extent3d, Queue, SamplerBindingType, ShaderStages, Texture, TextureDimension, TextureFormat, TextureSampleType, TextureUsages, TextureView, TextureViewDimension};
use feedback_common::noise::NoiseImage;

/// Both the offscreen target and the feedback texture use this so the copy
/// between them is a plain texel copy.
pub const HDR_FORMAT: TextureFormat = TextureFormat::Rgba16Float;

fn extent((width, height): (u32, u32)) -> Extent3d {
    Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    }
}

fn create_texture(device: &Device, label: &str, size: (u32, u32),
                  format: TextureFormat, usage: TextureUsages) -> (Texture, TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: extent(size),
        mip_level_count: 1,
        sample_count: 1,
        dimension: TextureDimension::D2,
        format,
        usage,
        view_formats: &[],
    });
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    (texture, view)
}

pub fn texture_layout(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Texture {
            sample_type: TextureSampleType::Float { filterable: true },
            view_dimension: TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

pub fn sampler_layout(binding: u32, visibility: ShaderStages) -> BindGroupLayoutEntry {
    BindGroupLayoutEntry {
        binding,
        visibility,
        ty: BindingType::Sampler(SamplerBindingType::Filtering),
        count: None,
    }
}

/// Texel exact reads, used by both passes.
pub fn nearest_sampler(device: &Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("nearest clamp sampler"),
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Nearest,
        min_filter: wgpu::FilterMode::Nearest,
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// The color buffer the trace pass renders into.
pub struct RenderTarget {
    texture: Texture,
    view: TextureView,
    size: (u32, u32),
}

impl RenderTarget {
    pub fn new(device: &Device, size: (u32, u32)) -> Self {
        let (texture, view) = create_texture(
            device,
            "trace render target",
            size,
            HDR_FORMAT,
            TextureUsages::RENDER_ATTACHMENT | TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_SRC,
        );
        Self { texture, view, size }
    }

    pub fn view(&self) -> &TextureView { &self.view }
    pub fn size(&self) -> (u32, u32) { self.size }
}

/// Last frame's trace output, read by the next trace pass.
pub struct FeedbackTexture {
    texture: Texture,
    view: TextureView,
    size: (u32, u32),
}

impl FeedbackTexture {
    pub fn new(device: &Device, size: (u32, u32)) -> Self {
        let (texture, view) = create_texture(
            device,
            "feedback texture",
            size,
            HDR_FORMAT,
            TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        );
        Self { texture, view, size }
    }

    pub fn view(&self) -> &TextureView { &self.view }

    pub fn copy_from(&self, encoder: &mut CommandEncoder, target: &RenderTarget) {
        debug_assert_eq!(self.size, target.size);
        encoder.copy_texture_to_texture(
            target.texture.as_image_copy(),
            self.texture.as_image_copy(),
            extent(self.size),
        );
    }
}

pub struct NoiseTexture {
    _texture: Texture,
    view: TextureView,
}

impl NoiseTexture {
    pub fn new(device: &Device, queue: &Queue, image: &NoiseImage) -> Self {
        let size = (image.width, image.height);
        let (texture, view) = create_texture(
            device,
            "noise texture",
            size,
            TextureFormat::Rgba8Unorm,
            TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
        );
        queue.write_texture(
            texture.as_image_copy(),
            &image.rgba,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(image.bytes_per_row()),
                rows_per_image: Some(image.height),
            },
            extent(size),
        );
        Self { _texture: texture, view }
    }

    pub fn view(&self) -> &TextureView { &self.view }
}
