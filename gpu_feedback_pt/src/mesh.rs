use wgpu::{BufferUsages, Device};
use feedback_common::gpu_buffer::GPUBuffer;
use feedback_common::vertex::{Vertex, FULL_SCREEN_QUAD};

/// Static vertex data, uploaded once.
pub struct Mesh {
    vertex_buffer: GPUBuffer,
    vertex_count: u32,
}

impl Mesh {
    pub fn new(device: &Device, vertices: &[Vertex], label: &str) -> Self {
        let vertex_buffer = GPUBuffer::new_from_bytes(device,
                                                      BufferUsages::VERTEX,
                                                      0,
                                                      bytemuck::cast_slice(vertices),
                                                      Some(label));
        Self {
            vertex_buffer,
            vertex_count: vertices.len() as u32,
        }
    }

    pub fn full_screen_quad(device: &Device) -> Self {
        Self::new(device, &FULL_SCREEN_QUAD, "full screen quad")
    }

    pub fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        pass.set_vertex_buffer(0, self.vertex_buffer.buffer().slice(..));
        pass.draw(0..self.vertex_count, 0..1);
    }
}
