//! The OpenGL implementation of [`RenderBackend`].
//!
//! Every batch is uploaded into one persistent streaming mesh and drawn with a
//! single `glDrawElements` call. The bindings that were active before the
//! batch (program, vertex array, array buffer, texture) are captured first and
//! put back afterwards, so drawing a batch leaves no trace on whatever else
//! uses the context.

use std::{num::NonZeroU32, sync::Arc};

use glow::HasContext;
use slidemenu::{
    batch::{BatchDraw, QuadVertex, RenderBackend},
    geometry::{Color, ScissorRect},
};

use crate::abs::{Mesh, ShaderProgram, Texture, Vertex};

const ATLAS_UNIT: u32 = 0;

impl Vertex for QuadVertex {
    fn vertex_attribs(gl: &glow::Context) {
        unsafe {
            let stride = std::mem::size_of::<QuadVertex>() as i32;
            let float = std::mem::size_of::<f32>() as i32;
            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 2, glow::FLOAT, false, stride, 0);
            // UV attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, 2 * float);
            // Color attribute, normalized from bytes
            gl.enable_vertex_attrib_array(2);
            gl.vertex_attrib_pointer_f32(2, 4, glow::UNSIGNED_BYTE, true, stride, 4 * float);
        }
    }
}

/// GL object bindings captured before a batch and restored after it.
struct SavedBindings {
    program: Option<glow::Program>,
    vertex_array: Option<glow::VertexArray>,
    array_buffer: Option<glow::Buffer>,
    texture: Option<glow::Texture>,
    active_texture: u32,
}

impl SavedBindings {
    fn capture(gl: &glow::Context) -> Self {
        unsafe {
            let name = |pname| NonZeroU32::new(gl.get_parameter_i32(pname) as u32);
            let active_texture = gl.get_parameter_i32(glow::ACTIVE_TEXTURE) as u32;
            gl.active_texture(glow::TEXTURE0 + ATLAS_UNIT);
            Self {
                program: name(glow::CURRENT_PROGRAM).map(glow::NativeProgram),
                vertex_array: name(glow::VERTEX_ARRAY_BINDING).map(glow::NativeVertexArray),
                array_buffer: name(glow::ARRAY_BUFFER_BINDING).map(glow::NativeBuffer),
                texture: name(glow::TEXTURE_BINDING_2D).map(glow::NativeTexture),
                active_texture,
            }
        }
    }

    fn restore(self, gl: &glow::Context) {
        unsafe {
            gl.use_program(self.program);
            gl.bind_vertex_array(self.vertex_array);
            gl.bind_buffer(glow::ARRAY_BUFFER, self.array_buffer);
            gl.active_texture(glow::TEXTURE0 + ATLAS_UNIT);
            gl.bind_texture(glow::TEXTURE_2D, self.texture);
            gl.active_texture(self.active_texture);
        }
    }
}

/// Draws batches into the window's default framebuffer.
pub struct GlBackend {
    gl: Arc<glow::Context>,
    window: sdl2::video::Window,
    program: ShaderProgram,
    mesh: Mesh,
    atlas: Texture,
    viewport: (i32, i32),
}

impl GlBackend {
    /// Creates the backend. `window` is the window whose buffers
    /// [`RenderBackend::present`] swaps.
    pub fn new(
        gl: &Arc<glow::Context>,
        window: sdl2::video::Window,
        program: ShaderProgram,
        atlas: Texture,
    ) -> Result<Self, String> {
        let mesh = Mesh::new::<QuadVertex>(gl, glow::TRIANGLES)?;
        unsafe {
            gl.enable(glow::BLEND);
            gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            gl.disable(glow::DEPTH_TEST);
            gl.disable(glow::CULL_FACE);
            gl.enable(glow::SCISSOR_TEST);
        }
        log::debug!("Atlas texture uploaded ({}x{})", atlas.width(), atlas.height());

        Ok(Self {
            gl: Arc::clone(gl),
            window,
            program,
            mesh,
            atlas,
            viewport: (0, 0),
        })
    }
}

impl RenderBackend for GlBackend {
    fn draw_batch(&mut self, batch: BatchDraw<'_>) {
        let saved = SavedBindings::capture(&self.gl);

        unsafe {
            if batch.viewport != self.viewport {
                self.viewport = batch.viewport;
                self.gl.viewport(0, 0, batch.viewport.0, batch.viewport.1);
            }
            self.gl.enable(glow::BLEND);
            self.gl.blend_func(glow::SRC_ALPHA, glow::ONE_MINUS_SRC_ALPHA);
            self.gl.disable(glow::DEPTH_TEST);
            self.gl.disable(glow::CULL_FACE);
        }

        self.program.use_program();
        self.program.set_uniform("u_projection", batch.projection);
        self.program.set_uniform("u_atlas", ATLAS_UNIT as i32);
        self.atlas.bind(ATLAS_UNIT);

        self.mesh.update(batch.vertices, batch.indices);
        self.mesh.draw();

        saved.restore(&self.gl);
    }

    fn set_scissor(&mut self, scissor: ScissorRect) {
        unsafe {
            self.gl.enable(glow::SCISSOR_TEST);
            self.gl.scissor(scissor.x, scissor.y, scissor.w, scissor.h);
        }
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_f32();
        unsafe {
            // The clear would otherwise be limited to the last clip rect.
            self.gl.disable(glow::SCISSOR_TEST);
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
            self.gl.enable(glow::SCISSOR_TEST);
        }
    }

    fn present(&mut self) {
        self.window.gl_swap_window();
    }
}
