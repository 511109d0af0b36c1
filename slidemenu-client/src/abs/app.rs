//! SDL2 and OpenGL application management.
//!
//! This module defines the [`App`] struct which owns the SDL2 window and the
//! OpenGL context the renderer draws into.

use std::sync::Arc;

use crate::error::InitError;

/// The [`App`] struct encapsulates the SDL2 and OpenGL context.
pub struct App {
    pub sdl: sdl2::Sdl,
    pub video_subsystem: sdl2::VideoSubsystem,
    pub window: sdl2::video::Window,
    pub gl_context: sdl2::video::GLContext,
    pub gl: Arc<glow::Context>,
    pub event_pump: sdl2::EventPump,
}

impl App {
    /// Creates a resizable, high-DPI aware window of `width` x `height`
    /// logical pixels with an OpenGL 3.3 core context made current.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, InitError> {
        let sdl = sdl2::init().map_err(InitError::Sdl)?;
        let video_subsystem = sdl.video().map_err(InitError::Video)?;
        let gl_attr = video_subsystem.gl_attr();
        gl_attr.set_context_profile(sdl2::video::GLProfile::Core);
        gl_attr.set_context_version(3, 3);
        gl_attr.set_double_buffer(true);

        let window = video_subsystem
            .window(title, width, height)
            .opengl()
            .resizable()
            .allow_highdpi()
            .position_centered()
            .build()?;
        let gl_context = window.gl_create_context().map_err(InitError::GlContext)?;
        window
            .gl_make_current(&gl_context)
            .map_err(InitError::GlContext)?;
        let gl = unsafe {
            glow::Context::from_loader_function(|s| {
                video_subsystem.gl_get_proc_address(s) as *const _
            })
        };
        let event_pump = sdl.event_pump().map_err(InitError::Sdl)?;

        Ok(Self {
            sdl,
            video_subsystem,
            window,
            gl_context,
            gl: Arc::new(gl),
            event_pump,
        })
    }

    /// Size of the backing framebuffer in physical pixels.
    pub fn drawable_size(&self) -> (i32, i32) {
        let (w, h) = self.window.drawable_size();
        (w as i32, h as i32)
    }

    /// Ratio of physical to logical pixels. Mouse events arrive in logical
    /// pixels and are multiplied by this before reaching the UI.
    pub fn scale_factor(&self) -> f32 {
        let (logical, _) = self.window.size();
        let (physical, _) = self.window.drawable_size();
        if logical == 0 {
            1.0
        } else {
            physical as f32 / logical as f32
        }
    }
}
