use std::time::Duration;
use crate::camera::Camera;
use crate::config::CameraConfig;
use crate::input::CameraCommand;

/// Turns per-frame camera commands into camera motion that doesn't depend
/// on the frame rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraController {
    camera: Camera,
    move_speed: f32,
    sensitivity: f32,
    zoom_factor: f32,
}

impl CameraController {
    /// Frame deltas longer than this (window drags, breakpoints) are capped
    pub const MAX_FRAME_TIME: Duration = Duration::from_millis(250);

    pub fn new(camera: Camera, move_speed: f32, sensitivity: f32, zoom_factor: f32) -> Self {
        Self {
            camera,
            move_speed: move_speed.max(0.0),
            sensitivity,
            zoom_factor,
        }
    }

    /// The configured forward and up are replaced by the basis yaw and pitch
    /// describe, so the first mouse look continues from the startup view.
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = config.camera();
        camera.update_orientation(0.0, 0.0, config.sensitivity);
        Self::new(camera, config.move_speed, config.sensitivity, config.zoom_factor)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Speed is rescaled before the commands run, so a zero `dt` simply
    /// leaves the position alone for this frame.
    pub fn update_camera(&mut self, commands: &[CameraCommand], dt: Duration) {
        let dt = dt.min(Self::MAX_FRAME_TIME).as_secs_f32();
        self.camera.update_speed(self.move_speed * dt);

        for &command in commands {
            self.camera.apply(command, self.sensitivity, self.zoom_factor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn controller() -> CameraController {
        let camera = Camera::new(Vec3::ZERO, Vec3::Z, Vec3::Y, 90.0, 0.0, 90.0, 0.0);
        CameraController::new(camera, 2.0, 0.1, 5.0)
    }

    #[test]
    fn movement_scales_with_frame_time() {
        let mut cc = controller();
        cc.update_camera(&[CameraCommand::MoveForward], Duration::from_millis(100));
        assert!(cc.camera().position().abs_diff_eq(Vec3::new(0.0, 0.0, 0.2), 1e-5));

        let mut slow = controller();
        for _ in 0..10 {
            slow.update_camera(&[CameraCommand::MoveForward], Duration::from_millis(10));
        }
        assert!(slow.camera().position().abs_diff_eq(cc.camera().position(), 1e-5));
    }

    #[test]
    fn zero_frame_time_does_not_move() {
        let mut cc = controller();
        cc.update_camera(&[CameraCommand::MoveForward, CameraCommand::MoveUp], Duration::ZERO);
        assert_eq!(cc.camera().position(), Vec3::ZERO);
        assert_eq!(cc.camera().speed(), 0.0);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut cc = controller();
        cc.update_camera(&[CameraCommand::MoveForward], Duration::from_secs(5));
        assert!((cc.camera().position().z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn small_look_after_startup_does_not_flip_view() {
        let mut cc = CameraController::from_config(&CameraConfig::default());
        let start = cc.camera().forward();
        assert!(cc.camera().forward().dot(cc.camera().up()).abs() < 1e-5);

        cc.update_camera(&[CameraCommand::Look { dx: 1.0, dy: 0.0 }], Duration::from_millis(16));
        let turned = start.angle_between(cc.camera().forward()).to_degrees();
        assert!(turned < 1.0, "one pixel of mouse turned the view {turned} degrees");
    }

    #[test]
    fn look_and_zoom_ignore_frame_time() {
        let mut cc = controller();
        cc.update_camera(&[CameraCommand::Look { dx: 0.0, dy: -100.0 }, CameraCommand::Zoom(1.0)],
                         Duration::ZERO);
        assert_eq!(cc.camera().pitch(), 10.0);
        assert_eq!(cc.camera().fov(), 85.0);
    }
}
