use wgpu::{BindGroupEntry, BindGroupLayoutEntry, BindingType, Buffer, BufferAddress, BufferBindingType, BufferSize, BufferUsages, Device, Queue, ShaderStages};
use wgpu::util::{BufferInitDescriptor, DeviceExt};

/// A buffer that remembers how it is bound.
pub struct GPUBuffer {
    buffer: Buffer,
    binding_idx: u32,
}

impl GPUBuffer {
    pub fn new(device: &Device, usage: BufferUsages, size: BufferAddress, binding_idx: u32, label: Option<&str>)
               -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size,
            usage: usage | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Self {
            buffer,
            binding_idx
        }
    }

    pub fn new_from_bytes(device: &Device,
                          usage: BufferUsages,
                          binding_idx: u32,
                          data: &[u8],
                          label: Option<&str>) -> Self {
        let buffer = device.create_buffer_init(&BufferInitDescriptor {
            label,
            contents: data,
            usage: usage | BufferUsages::COPY_DST,
        });
        Self {
            buffer,
            binding_idx
        }
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn size(&self) -> BufferAddress {
        self.buffer.size()
    }

    pub fn queue_for_gpu(&self, queue: &Queue, data: &[u8]) {
        queue.write_buffer(&self.buffer, 0, data);
    }

    /// Layout entry for binding this buffer as a uniform.
    pub fn layout(&self, visibility: ShaderStages) -> BindGroupLayoutEntry {
        BindGroupLayoutEntry {
            binding: self.binding_idx,
            visibility,
            ty: BindingType::Buffer {
                ty: BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: BufferSize::new(self.size()),
            },
            count: None,
        }
    }

    pub fn binding(&self) -> BindGroupEntry<'_> {
        BindGroupEntry {
            binding: self.binding_idx,
            resource: self.buffer.as_entire_binding(),
        }
    }
}
