use glam::Vec3;
use crate::camera::Camera;
use crate::parameters::FrameTiming;

/// Everything the trace pass reads besides its two textures, rebuilt every frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FrameUniforms {
    pub camera_position: Vec3,
    pub camera_up: Vec3,
    pub camera_forward: Vec3,
    pub fov: f32,
    pub time_ms: f32,
    pub scene_changed: bool,
    pub frames_since_change: u32,
    pub resolution: (u32, u32),
}

impl FrameUniforms {
    pub fn new(camera: &Camera,
               timing: &FrameTiming,
               scene_changed: bool,
               frames_since_change: u32,
               resolution: (u32, u32)) -> Self {
        Self {
            camera_position: camera.position(),
            camera_up: camera.up(),
            camera_forward: camera.forward(),
            fov: camera.fov(),
            time_ms: timing.time_ms,
            scene_changed,
            frames_since_change,
            resolution,
        }
    }
}

// layout mirrors `FrameUniforms` in trace.fs, 80 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GPUFrameUniforms {
    camera_position: [f32; 4],
    camera_up: [f32; 4],
    camera_forward: [f32; 4],
    resolution: [f32; 2],
    fov: f32,
    time: f32,
    scene_changed: f32,
    frames_since_change: u32,
    _buffer: [u32; 2],
}

impl From<&FrameUniforms> for GPUFrameUniforms {
    fn from(uniforms: &FrameUniforms) -> Self {
        Self {
            camera_position: uniforms.camera_position.extend(1.0).to_array(),
            camera_up: uniforms.camera_up.extend(0.0).to_array(),
            camera_forward: uniforms.camera_forward.extend(0.0).to_array(),
            resolution: [uniforms.resolution.0 as f32, uniforms.resolution.1 as f32],
            fov: uniforms.fov,
            time: uniforms.time_ms,
            scene_changed: if uniforms.scene_changed { 1.0 } else { 0.0 },
            frames_since_change: uniforms.frames_since_change,
            _buffer: [0; 2],
        }
    }
}

impl GPUFrameUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    #[cfg(test)]
    fn scene_changed(&self) -> bool { self.scene_changed > 0.5 }
}
