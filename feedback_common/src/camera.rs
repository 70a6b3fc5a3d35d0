use glam::{Mat4, Vec3};
use crate::input::CameraCommand;

/// First person camera. Angles are kept in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    speed: f32,
    last_mouse_delta: (f32, f32),
}

impl Camera {
    pub const PITCH_LIMIT: f32 = 89.0;
    pub const MIN_FOV: f32 = 1.0;
    pub const MAX_FOV: f32 = 179.0;

    pub fn new(position: Vec3, forward: Vec3, up: Vec3,
               yaw: f32, pitch: f32, fov: f32, speed: f32) -> Self {
        Self {
            position,
            forward,
            up,
            yaw,
            pitch: pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT),
            fov: fov.clamp(Self::MIN_FOV, Self::MAX_FOV),
            speed: speed.max(0.0),
            last_mouse_delta: (0.0, 0.0),
        }
    }

    pub fn position(&self) -> Vec3 { self.position }
    pub fn forward(&self) -> Vec3 { self.forward }
    pub fn up(&self) -> Vec3 { self.up }
    pub fn yaw(&self) -> f32 { self.yaw }
    pub fn pitch(&self) -> f32 { self.pitch }
    pub fn fov(&self) -> f32 { self.fov }
    pub fn speed(&self) -> f32 { self.speed }
    pub fn last_mouse_delta(&self) -> (f32, f32) { self.last_mouse_delta }

    fn right(&self) -> Vec3 {
        self.forward.cross(self.up).normalize()
    }

    pub fn move_forward(&mut self) {
        self.position += self.forward * self.speed;
    }

    pub fn move_back(&mut self) {
        self.position -= self.forward * self.speed;
    }

    pub fn move_right(&mut self) {
        self.position += self.right() * self.speed;
    }

    pub fn move_left(&mut self) {
        self.position -= self.right() * self.speed;
    }

    pub fn move_up(&mut self) {
        self.position += self.up * self.speed;
    }

    pub fn move_down(&mut self) {
        self.position -= self.up * self.speed;
    }

    /// Positive `direction` (wheel away from the user) narrows the view.
    pub fn zoom(&mut self, direction: f32, factor: f32) {
        self.fov = (self.fov - direction * factor).clamp(Self::MIN_FOV, Self::MAX_FOV);
    }

    pub fn update_orientation(&mut self, mouse_dx: f32, mouse_dy: f32, sensitivity: f32) {
        self.last_mouse_delta = (mouse_dx, mouse_dy);

        self.yaw += mouse_dx * sensitivity;
        self.pitch -= mouse_dy * sensitivity;
        self.pitch = self.pitch.clamp(-Self::PITCH_LIMIT, Self::PITCH_LIMIT);

        let (sin_yaw, cos_yaw) = self.yaw.to_radians().sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.to_radians().sin_cos();

        self.forward = Vec3::new(cos_yaw * cos_pitch, sin_pitch, sin_yaw * cos_pitch).normalize();
        // right depends on yaw alone; swapping the cross operands flips handedness
        let right = Vec3::new(sin_yaw, 0.0, -cos_yaw);
        self.up = self.forward.cross(right).normalize();
    }

    pub fn update_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    pub fn apply(&mut self, command: CameraCommand, sensitivity: f32, zoom_factor: f32) {
        match command {
            CameraCommand::MoveForward => self.move_forward(),
            CameraCommand::MoveBack => self.move_back(),
            CameraCommand::MoveLeft => self.move_left(),
            CameraCommand::MoveRight => self.move_right(),
            CameraCommand::MoveUp => self.move_up(),
            CameraCommand::MoveDown => self.move_down(),
            CameraCommand::Look { dx, dy } => self.update_orientation(dx, dy, sensitivity),
            CameraCommand::Zoom(direction) => self.zoom(direction, zoom_factor),
        }
    }

    pub fn view_matrix(&self) -> [[f32; 4]; 4] {
        Mat4::look_at_rh(self.position, self.position + self.forward, self.up)
            .to_cols_array_2d()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn start_camera() -> Camera {
        Camera::new(Vec3::new(1.0, 0.5, 2.0),
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    -90.0,
                    0.0,
                    120.0,
                    0.01)
    }

    #[test]
    fn move_forward_from_start() {
        let mut camera = start_camera();
        camera.move_forward();

        assert!(camera.position().abs_diff_eq(Vec3::new(1.0, 0.5, 2.01), EPS));
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.up(), Vec3::Y);
    }

    #[test]
    fn forward_and_back_sum_along_forward() {
        let mut camera = start_camera();
        let start = camera.position();
        let moves = [true, true, false, true, true, true, false];
        for forward in moves {
            if forward { camera.move_forward() } else { camera.move_back() }
        }
        let net = moves.iter().map(|&f| if f { 1.0 } else { -1.0 }).sum::<f32>();
        let expected = start + net * camera.speed() * camera.forward().normalize();
        assert!(camera.position().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn strafe_uses_forward_cross_up() {
        let mut camera = start_camera();
        camera.update_speed(1.0);
        camera.move_right();
        // forward +z, up +y -> right is -x
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.5, 2.0), EPS));
        camera.move_left();
        camera.move_up();
        camera.move_down();
        camera.move_down();
        assert!(camera.position().abs_diff_eq(Vec3::new(1.0, -0.5, 2.0), EPS));
    }

    #[test]
    fn pitch_clamps_at_limit() {
        let mut camera = start_camera();
        camera.update_orientation(0.0, -800.0, 0.1);
        assert_eq!(camera.pitch(), 80.0);
        camera.update_orientation(0.0, -200.0, 0.1);
        assert_eq!(camera.pitch(), 89.0);

        camera.update_orientation(0.0, 1.0e6, 0.1);
        assert_eq!(camera.pitch(), -89.0);
        assert_eq!(camera.last_mouse_delta(), (0.0, 1.0e6));
    }

    #[test]
    fn orientation_basis_is_unit_and_orthogonal() {
        let mut camera = start_camera();
        for step in 0..50 {
            let dx = (step as f32 * 37.0) % 113.0 - 56.0;
            let dy = (step as f32 * 53.0) % 97.0 - 48.0;
            camera.update_orientation(dx, dy, 0.7);

            assert!(camera.pitch() >= -89.0 && camera.pitch() <= 89.0);
            assert!((camera.forward().length() - 1.0).abs() < EPS);
            assert!((camera.up().length() - 1.0).abs() < EPS);
            assert!(camera.forward().dot(camera.up()).abs() < EPS);
        }
    }

    #[test]
    fn orientation_at_start_angles_looks_down_negative_z() {
        let mut camera = start_camera();
        camera.update_orientation(0.0, 0.0, 0.1);
        assert!(camera.forward().abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPS));
        assert!(camera.up().abs_diff_eq(Vec3::Y, EPS));
    }

    #[test]
    fn zoom_is_clamped() {
        let mut camera = start_camera();
        camera.zoom(1.0, 5.0);
        assert_eq!(camera.fov(), 115.0);
        camera.zoom(-20.0, 5.0);
        assert_eq!(camera.fov(), Camera::MAX_FOV);
        camera.zoom(100.0, 5.0);
        assert_eq!(camera.fov(), Camera::MIN_FOV);
    }

    #[test]
    fn speed_never_negative() {
        let mut camera = start_camera();
        camera.update_speed(-3.0);
        assert_eq!(camera.speed(), 0.0);
        camera.move_forward();
        assert_eq!(camera.position(), Vec3::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn commands_dispatch_to_methods() {
        let mut by_command = start_camera();
        let mut by_method = start_camera();

        by_command.apply(CameraCommand::Look { dx: 10.0, dy: -4.0 }, 0.1, 5.0);
        by_command.apply(CameraCommand::MoveForward, 0.1, 5.0);
        by_command.apply(CameraCommand::Zoom(2.0), 0.1, 5.0);

        by_method.update_orientation(10.0, -4.0, 0.1);
        by_method.move_forward();
        by_method.zoom(2.0, 5.0);

        assert_eq!(by_command, by_method);
    }

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let camera = start_camera();
        let view = Mat4::from_cols_array_2d(&camera.view_matrix());
        let eye = view.transform_point3(camera.position());
        assert!(eye.abs_diff_eq(Vec3::ZERO, EPS));
    }
}
