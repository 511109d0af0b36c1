//! Thin wrappers over SDL2 and OpenGL objects: the window and context, shader
//! programs, the streaming quad mesh and the atlas texture.

pub mod app;
pub mod mesh;
pub mod shader;
pub mod texture;

pub use app::*;
pub use mesh::*;
pub use shader::*;
pub use texture::*;
