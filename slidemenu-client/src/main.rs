use std::time::Duration;

use sdl2::event::{Event, WindowEvent};
use slidemenu::{atlas::Atlas, config::Config};

use crate::{
    abs::{App, ShaderProgram, Texture},
    client::Client,
    error::InitError,
    input::MouseState,
    render::GlBackend,
};

mod abs;
mod client;
mod error;
mod input;
mod render;

/// Compiles and links the vertex and fragment shader found under
/// `render/shaders/<name>/`. Evaluates to `Result<ShaderProgram, String>`.
#[macro_export]
macro_rules! shader_program {
    ($name:ident, $gl:expr, $path_prefix:literal) => {{
        let vert = $crate::abs::Shader::new(
            &$gl,
            glow::VERTEX_SHADER,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/vert.glsl"
            )),
        );
        let frag = $crate::abs::Shader::new(
            &$gl,
            glow::FRAGMENT_SHADER,
            include_str!(concat!(
                $path_prefix,
                "/render/shaders/",
                stringify!($name),
                "/frag.glsl"
            )),
        );
        match (vert, frag) {
            (Ok(vert), Ok(frag)) => ShaderProgram::new(&$gl, &[&vert, &frag]),
            (Err(e), _) | (_, Err(e)) => Err(e),
        }
    }};
}

fn setup_logger() -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(log::LevelFilter::Trace)
        .chain(std::io::stderr())
        .apply()
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("Could not install logger: {e}");
    }

    let config = Config::load_or_default();
    log::set_max_level(config.level_filter());

    if let Err(e) = run(&config) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &Config) -> Result<(), InitError> {
    let mut app = App::new(
        &config.title,
        config.window_width as u32,
        config.window_height as u32,
    )?;

    let program = shader_program!(quad, app.gl, ".").map_err(InitError::Shader)?;
    let atlas = Atlas::builtin();
    let texture = Texture::from_gray(&app.gl, atlas.image())
        .map_err(|e| InitError::resource("atlas texture", e))?;
    let backend = GlBackend::new(&app.gl, app.window.clone(), program, texture)
        .map_err(|e| InitError::resource("quad mesh", e))?;

    let mut client = Client::new(
        backend,
        atlas,
        config.ui_state(),
        config.batch_capacity,
        app.drawable_size(),
    );
    let mut mouse = MouseState::default();
    let frame_delay = Duration::from_millis(config.frame_delay_ms);

    'running: loop {
        let scale = app.scale_factor();

        for event in app.event_pump.poll_iter() {
            mouse.handle_event(&event, scale);
            match event {
                Event::Quit { .. } => break 'running,
                Event::Window {
                    win_event: WindowEvent::Resized(..) | WindowEvent::SizeChanged(..) | WindowEvent::Moved(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    if client.resize(width as i32, height as i32) {
                        client.frame(mouse.current());
                    }
                }
                _ => {}
            }
        }

        client.frame(mouse.take_frame());
        std::thread::sleep(frame_delay);
    }

    let batch = client.renderer().batch();
    log::info!(
        "Shutting down after {} batches, {} quads dropped",
        batch.flush_count(),
        batch.dropped_count()
    );
    Ok(())
}
