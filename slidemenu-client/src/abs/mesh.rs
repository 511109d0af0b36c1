//! Streaming mesh storage.
//!
//! [`Mesh`] owns one vertex array with its vertex and element buffers. The
//! buffers are created once and refilled with [`Mesh::update`] for every
//! draw, which suits geometry rebuilt from scratch each frame.

use std::sync::Arc;

use glow::HasContext;

/// Describes the attribute layout of a vertex type.
pub trait Vertex {
    /// Sets up the vertex attribute pointers while the vertex array is bound.
    fn vertex_attribs(gl: &glow::Context);
}

/// A vertex array plus its buffers, refilled on every update.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: glow::Buffer,
    index_count: usize,
}

impl Mesh {
    /// Creates an empty mesh whose vertices have the layout of `V`.
    pub fn new<V: Vertex>(gl: &Arc<glow::Context>, draw_mode: u32) -> Result<Self, String> {
        unsafe {
            let vao = gl.create_vertex_array()?;
            let vbo = gl.create_buffer()?;
            let ebo = gl.create_buffer()?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                draw_mode,
                vao,
                vbo,
                ebo,
                index_count: 0,
            })
        }
    }

    /// Replaces the contents of both buffers.
    ///
    /// The element buffer binding is part of the vertex array state, so the
    /// vertex array is bound while uploading and unbound afterwards.
    pub fn update<V: Vertex>(&mut self, vertices: &[V], indices: &[u32]) {
        unsafe {
            self.index_count = indices.len();

            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                std::slice::from_raw_parts(
                    vertices.as_ptr() as *const u8,
                    std::mem::size_of_val(vertices),
                ),
                glow::STREAM_DRAW,
            );

            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.ebo));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                std::slice::from_raw_parts(indices.as_ptr() as *const u8, std::mem::size_of_val(indices)),
                glow::STREAM_DRAW,
            );

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    /// Draws the whole mesh with one call.
    pub fn draw(&self) {
        if self.index_count == 0 {
            return;
        }
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl
                .draw_elements(self.draw_mode, self.index_count as i32, glow::UNSIGNED_INT, 0);
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_buffer(self.ebo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
