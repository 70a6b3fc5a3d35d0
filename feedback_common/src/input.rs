use std::collections::HashSet;
use winit::event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixel scroll deltas (touchpads) are converted to wheel notches with this.
const PIXELS_PER_LINE: f64 = 40.0;

/// What the input layer asks the camera to do this frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CameraCommand {
    MoveForward,
    MoveBack,
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Look { dx: f32, dy: f32 },
    Zoom(f32),
}

const KEY_BINDINGS: [(KeyCode, CameraCommand); 6] = [
    (KeyCode::KeyW, CameraCommand::MoveForward),
    (KeyCode::KeyS, CameraCommand::MoveBack),
    (KeyCode::KeyA, CameraCommand::MoveLeft),
    (KeyCode::KeyD, CameraCommand::MoveRight),
    (KeyCode::Space, CameraCommand::MoveUp),
    (KeyCode::ControlLeft, CameraCommand::MoveDown),
];

/// Collects window and device events between two polls.
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    mouse_delta: (f64, f64),
    scroll: f32,
    close_requested: bool,
}

/// The state of the input devices for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    pub keys_down: HashSet<KeyCode>,
    pub mouse_delta: (f32, f32),
    pub scroll: f32,
    pub close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the event was consumed.
    pub fn window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.close_requested = true;
                true
            }
            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, .. },
                ..
            } => {
                self.key(*code, *state);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => (position.y / PIXELS_PER_LINE) as f32,
                };
                self.scroll_lines(lines);
                true
            }
            WindowEvent::Focused(false) => {
                // key releases are not delivered to an unfocused window
                self.keys_down.clear();
                false
            }
            _ => false,
        }
    }

    pub fn device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse_motion(delta.0, delta.1);
        }
    }

    pub fn key(&mut self, code: KeyCode, state: ElementState) {
        match (code, state) {
            (KeyCode::Escape, ElementState::Pressed) => self.close_requested = true,
            (_, ElementState::Pressed) => { self.keys_down.insert(code); }
            (_, ElementState::Released) => { self.keys_down.remove(&code); }
        }
    }

    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.mouse_delta.0 += dx;
        self.mouse_delta.1 += dy;
    }

    pub fn scroll_lines(&mut self, lines: f32) {
        self.scroll += lines;
    }

    /// Hands out everything gathered since the last poll. Held keys stay held,
    /// mouse and wheel deltas start over at zero.
    pub fn poll(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot {
            keys_down: self.keys_down.clone(),
            mouse_delta: (self.mouse_delta.0 as f32, self.mouse_delta.1 as f32),
            scroll: self.scroll,
            close_requested: self.close_requested,
        };
        self.mouse_delta = (0.0, 0.0);
        self.scroll = 0.0;
        snapshot
    }
}

impl InputSnapshot {
    /// Looking comes first so this frame's moves follow the new forward.
    pub fn commands(&self) -> Vec<CameraCommand> {
        let mut commands = Vec::new();

        let (dx, dy) = self.mouse_delta;
        if dx != 0.0 || dy != 0.0 {
            commands.push(CameraCommand::Look { dx, dy });
        }
        commands.extend(KEY_BINDINGS
            .iter()
            .filter(|(code, _)| self.keys_down.contains(code))
            .map(|(_, command)| *command));

        if self.scroll != 0.0 {
            commands.push(CameraCommand::Zoom(self.scroll));
        }
        commands
    }

    /// Whether the camera moved this frame, i.e. the accumulated history is stale.
    pub fn changed(&self) -> bool {
        !self.commands().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_input_changes_nothing() {
        let mut input = InputState::new();
        let snapshot = input.poll();
        assert!(snapshot.commands().is_empty());
        assert!(!snapshot.changed());
        assert!(!snapshot.close_requested);
    }

    #[test]
    fn held_keys_persist_across_polls() {
        let mut input = InputState::new();
        input.key(KeyCode::KeyW, ElementState::Pressed);
        input.key(KeyCode::ControlLeft, ElementState::Pressed);

        let first = input.poll();
        assert_eq!(first.commands(), vec![CameraCommand::MoveForward, CameraCommand::MoveDown]);
        let second = input.poll();
        assert!(second.changed());

        input.key(KeyCode::KeyW, ElementState::Released);
        input.key(KeyCode::ControlLeft, ElementState::Released);
        assert!(!input.poll().changed());
    }

    #[test]
    fn unbound_keys_do_not_count_as_change() {
        let mut input = InputState::new();
        input.key(KeyCode::KeyP, ElementState::Pressed);
        assert!(!input.poll().changed());
    }

    #[test]
    fn mouse_and_scroll_reset_after_poll() {
        let mut input = InputState::new();
        input.mouse_motion(3.0, -1.0);
        input.mouse_motion(2.0, -1.0);

        let snapshot = input.poll();
        assert_eq!(snapshot.commands(), vec![CameraCommand::Look { dx: 5.0, dy: -2.0 }]);
        assert!(snapshot.changed());

        let next = input.poll();
        assert_eq!(next.mouse_delta, (0.0, 0.0));
        assert!(!next.changed());
    }

    #[test]
    fn look_precedes_moves_in_the_same_frame() {
        let mut input = InputState::new();
        input.key(KeyCode::KeyW, ElementState::Pressed);
        input.mouse_motion(4.0, 0.0);
        input.scroll_lines(1.0);

        assert_eq!(input.poll().commands(), vec![
            CameraCommand::Look { dx: 4.0, dy: 0.0 },
            CameraCommand::MoveForward,
            CameraCommand::Zoom(1.0),
        ]);
    }

    #[test]
    fn wheel_becomes_zoom() {
        let mut input = InputState::new();
        input.scroll_lines(1.0);
        input.scroll_lines(-0.5);
        assert_eq!(input.poll().commands(), vec![CameraCommand::Zoom(0.5)]);
        assert!(input.poll().commands().is_empty());
    }

    #[test]
    fn escape_and_close_request_close() {
        let mut input = InputState::new();
        input.key(KeyCode::Escape, ElementState::Pressed);
        assert!(input.poll().close_requested);

        let mut input = InputState::new();
        assert!(input.window_event(&WindowEvent::CloseRequested));
        let snapshot = input.poll();
        assert!(snapshot.close_requested);
        assert!(!snapshot.changed());
    }

    #[test]
    fn losing_focus_releases_keys() {
        let mut input = InputState::new();
        input.key(KeyCode::KeyA, ElementState::Pressed);
        input.window_event(&WindowEvent::Focused(false));
        assert!(!input.poll().changed());
    }
}
