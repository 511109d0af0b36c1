//! Startup failures.

use thiserror::Error;

/// Everything that can go wrong before the first frame. None of these are
/// recoverable; `main` reports them and exits.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("SDL initialization failed: {0}")]
    Sdl(String),

    #[error("Could not open the video subsystem: {0}")]
    Video(String),

    #[error("Could not create the window: {0}")]
    Window(#[from] sdl2::video::WindowBuildError),

    #[error("Could not create the OpenGL context: {0}")]
    GlContext(String),

    #[error("Shader error: {0}")]
    Shader(String),

    #[error("Could not create {what}: {message}")]
    Resource { what: &'static str, message: String },
}

impl InitError {
    pub(crate) fn resource(what: &'static str, message: impl ToString) -> Self {
        Self::Resource {
            what,
            message: message.to_string(),
        }
    }
}
