use crate::path_tracer::PathTracer;

use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{CursorGrabMode, Window, WindowId};
use feedback_common::camera_controller::CameraController;
use feedback_common::config::AppConfig;
use feedback_common::error::RenderError;
use feedback_common::frame_loop::FrameLoop;
use feedback_common::frames_per_second::FramesPerSecond;
use feedback_common::input::InputState;


pub struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    path_tracer: Option<PathTracer>,
    camera_controller: CameraController,
    input: InputState,
    frame_loop: FrameLoop,
    frames_per_second: FramesPerSecond,
    error: Option<RenderError>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let camera_controller = CameraController::from_config(&config.camera);
        Self {
            config,
            window: None,
            path_tracer: None,
            camera_controller,
            input: InputState::new(),
            frame_loop: FrameLoop::new(Instant::now()),
            frames_per_second: FramesPerSecond::new(),
            error: None,
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<RenderError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        log::error!("{err}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let window_config = &self.config.window;
        let win_attr = Window::default_attributes()
            .with_inner_size(winit::dpi::PhysicalSize::new(window_config.width, window_config.height))
            .with_resizable(false)
            .with_title(window_config.title.as_str());
        let window = Arc::new(event_loop.create_window(win_attr)?);

        // relative mouse mode: hidden cursor that stays in the window
        if let Err(err) = window
            .set_cursor_grab(CursorGrabMode::Locked)
            .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined)) {
            log::warn!("could not grab the cursor: {err}");
        }
        window.set_cursor_visible(false);

        let path_tracer = PathTracer::new(window.clone(), &self.config)?;
        self.window = Some(window);
        self.path_tracer = Some(path_tracer);
        Ok(())
    }

    /// One iteration of the render loop: poll input, move the camera, run the passes.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) -> Result<(), RenderError> {
        let snapshot = self.input.poll();
        if snapshot.close_requested {
            log::info!("close requested after {} frames", self.frame_loop.frame());
            event_loop.exit();
            return Ok(());
        }
        let Some(path_tracer) = self.path_tracer.as_mut() else {
            return Ok(());
        };

        let timing = self.frame_loop.tick(Instant::now());
        let changed = snapshot.changed();
        self.camera_controller.update_camera(&snapshot.commands(), timing.dt);

        self.frame_loop.render(path_tracer, self.camera_controller.camera(), changed, &timing)?;

        if let Some(fps) = self.frames_per_second.update(timing.dt) {
            log::debug!("{fps:.1} fps at frame {}", timing.frame);
            if let Some(window) = &self.window {
                window.set_title(&format!("{} - {fps:.1} fps", self.config.window.title));
            }
        }
        Ok(())
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop,
                    window_id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else { return };
        if window.id() != window_id { return; }

        match event {
            WindowEvent::Resized(new_size) => {
                if let Some(path_tracer) = self.path_tracer.as_mut() {
                    path_tracer.resize((new_size.width, new_size.height));
                }
            }

            WindowEvent::RedrawRequested => {
                if let Err(err) = self.redraw(event_loop) {
                    self.fail(event_loop, err);
                }
            }

            event => {
                self.input.window_event(&event);
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop,
                    _device_id: DeviceId, event: DeviceEvent) {
        self.input.device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
