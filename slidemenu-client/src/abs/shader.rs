//! OpenGL shaders
//!
//! [`Shader`] wraps one compiled stage and [`ShaderProgram`] a linked program.
//! Uniforms are written through the [`Uniform`] trait so a program can take
//! any supported value by name.

use std::sync::Arc;

use glam::Mat4;
use glow::HasContext;

/// One compiled shader stage.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles `source` as a shader of `shader_type`. On failure the
    /// compiler log is returned.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// A value that can be written to a uniform variable.
pub trait Uniform {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            if let Some(loc) = gl.get_uniform_location(program, name) {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

/// A linked shader program.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links the given stages into a program. On failure the linker log is
    /// returned.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, String> {
        unsafe {
            let program = gl.create_program()?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(log);
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Writes a uniform of the currently bound program.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        value.set_uniform(&self.gl, self.id, name);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}
