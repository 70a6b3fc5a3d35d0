pub mod camera;
pub mod camera_controller;
pub mod config;
pub mod error;
pub mod frame_loop;
pub mod frames_per_second;
pub mod gpu_buffer;
pub mod gpu_structs;
pub mod input;
pub mod noise;
pub mod parameters;
pub mod shader_source;
pub mod vertex;
pub mod wgpu_state;
