//! GPU textures.
//!
//! The only texture the client needs is the single-channel atlas, uploaded
//! once as an `R8` image and sampled with nearest filtering so glyph edges
//! stay sharp.

use std::sync::Arc;

use glow::HasContext;
use image::GrayImage;

/// A texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Uploads a coverage image as a single-channel texture.
    pub fn from_gray(gl: &Arc<glow::Context>, image: &GrayImage) -> Result<Self, String> {
        let (width, height) = image.dimensions();
        unsafe {
            let texture = gl.create_texture()?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // Rows of an R8 image are not 4-byte aligned in general.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::R8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RED,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.as_raw().as_slice())),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::NEAREST as i32,
            );
            gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::NEAREST as i32,
            );
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width,
                height,
            })
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds the texture to the specified texture unit.
    pub fn bind(&self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
            self.gl.bind_texture(glow::TEXTURE_2D, Some(self.id));
        }
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
