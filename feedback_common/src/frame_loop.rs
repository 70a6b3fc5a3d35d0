//! The two-pass render loop.
//!
//! Every frame runs the trace pass into the offscreen render target, copies
//! that target into the feedback texture the next trace pass reads, and then
//! runs the denoise pass onto the screen. The feedback texture holds exactly
//! one frame of history; the trace shader decides how much of it to keep
//! based on the scene-changed flag.
//!
//! The stages can only be driven in that order: `TracedFrame` can only be
//! copied, `FedBackFrame` can only be denoised, and both are built here.

use std::time::Instant;
use crate::camera::Camera;
use crate::error::RenderError;
use crate::gpu_structs::FrameUniforms;
use crate::parameters::{FrameClock, FrameTiming};

/// GPU side of the loop. Implementations own the render target, the
/// feedback texture and both programs.
pub trait FrameBackend {
    fn resolution(&self) -> (u32, u32);

    /// Render the path tracer into the offscreen target.
    fn trace(&mut self, uniforms: &FrameUniforms);

    /// Copy the offscreen target into the feedback texture.
    fn copy_feedback(&mut self);

    /// Filter the offscreen target onto the screen and present it.
    fn denoise(&mut self) -> Result<(), RenderError>;
}

/// A frame whose trace pass has been recorded.
pub struct TracedFrame<'a, B: FrameBackend> {
    backend: &'a mut B,
    uniforms: FrameUniforms,
}

/// A frame whose output is already the next frame's history.
pub struct FedBackFrame<'a, B: FrameBackend> {
    backend: &'a mut B,
    uniforms: FrameUniforms,
}

impl<'a, B: FrameBackend> TracedFrame<'a, B> {
    fn trace(backend: &'a mut B, uniforms: FrameUniforms) -> Self {
        backend.trace(&uniforms);
        Self { backend, uniforms }
    }

    pub fn copy_feedback(self) -> FedBackFrame<'a, B> {
        self.backend.copy_feedback();
        FedBackFrame {
            backend: self.backend,
            uniforms: self.uniforms,
        }
    }
}

impl<'a, B: FrameBackend> FedBackFrame<'a, B> {
    pub fn denoise(self) -> Result<FrameUniforms, RenderError> {
        self.backend.denoise()?;
        Ok(self.uniforms)
    }
}

pub struct FrameLoop {
    clock: FrameClock,
}

impl FrameLoop {
    pub fn new(start: Instant) -> Self {
        Self {
            clock: FrameClock::new(start),
        }
    }

    /// Starts a frame. The returned timing drives the camera update that
    /// has to happen before `render`.
    pub fn tick(&mut self, now: Instant) -> FrameTiming {
        self.clock.tick(now)
    }

    pub fn frame(&self) -> u64 {
        self.clock.frame()
    }

    /// Runs trace, feedback copy and denoise for the current frame and
    /// returns the uniforms the trace pass saw.
    pub fn render<B: FrameBackend>(&mut self,
                                   backend: &mut B,
                                   camera: &Camera,
                                   changed: bool,
                                   timing: &FrameTiming) -> Result<FrameUniforms, RenderError> {
        let frames_since_change = self.clock.record(changed);
        let uniforms = FrameUniforms::new(camera,
                                          timing,
                                          changed,
                                          frames_since_change,
                                          backend.resolution());
        log::trace!("frame {}: changed={} history={}", timing.frame, changed, frames_since_change);

        TracedFrame::trace(backend, uniforms)
            .copy_feedback()
            .denoise()
    }
}
