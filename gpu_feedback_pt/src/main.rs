mod app;
mod denoise;
mod mesh;
mod path_tracer;
mod program;
mod render_target;
mod trace;

use std::path::PathBuf;
use winit::event_loop::{ControlFlow, EventLoop};
use feedback_common::config::AppConfig;
use feedback_common::error::RenderError;

use crate::app::App;

fn main() -> Result<(), RenderError> {
    env_logger::init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
