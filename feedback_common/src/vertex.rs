use wgpu::{BufferAddress, VertexAttribute, VertexBufferLayout, VertexStepMode};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

    pub const fn new(position: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self { position, tex_coord }
    }

    pub fn layout() -> VertexBufferLayout<'static> {
        VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as BufferAddress,
            step_mode: VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Covers clip space as a triangle strip; uv (0,0) is the top left corner.
pub const FULL_SCREEN_QUAD: [Vertex; 4] = [
    Vertex::new([-1.0, 1.0, 0.0], [0.0, 0.0]),
    Vertex::new([1.0, 1.0, 0.0], [1.0, 0.0]),
    Vertex::new([-1.0, -1.0, 0.0], [0.0, 1.0]),
    Vertex::new([1.0, -1.0, 0.0], [1.0, 1.0]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_uvs_follow_positions() {
        for v in FULL_SCREEN_QUAD {
            assert_eq!(v.tex_coord[0], (v.position[0] + 1.0) * 0.5);
            assert_eq!(v.tex_coord[1], (1.0 - v.position[1]) * 0.5);
        }
    }

    #[test]
    fn layout_matches_struct() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].offset, 12);
    }
}
