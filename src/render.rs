//! The renderer: atlas lookups on top of the batch buffer.
//!
//! [`Renderer`] turns rectangles, text runs and icons into atlas quads and
//! owns the clip state. Every operation that changes what the GPU does outside
//! of quad submission (scissor, clear, present) flushes pending quads first so
//! paint order is preserved.

use glam::IVec2;

use crate::{
    atlas::{Atlas, Icon, glyph_bytes},
    batch::{BatchBuffer, RenderBackend},
    geometry::{Color, Rect},
};

/// Batched quad renderer over a [`RenderBackend`].
pub struct Renderer<B: RenderBackend> {
    batch: BatchBuffer<B>,
    atlas: Atlas,
    clip: Option<Rect>,
}

impl<B: RenderBackend> Renderer<B> {
    /// Creates a renderer for a window of `width` x `height` pixels.
    pub fn new(backend: B, atlas: Atlas, capacity: usize, width: i32, height: i32) -> Self {
        log::info!(
            "Renderer ready: {}x{} atlas, {} quads per batch",
            atlas.width(),
            atlas.height(),
            capacity
        );
        let batch = BatchBuffer::new(backend, capacity, (atlas.width(), atlas.height()), (width, height));
        Self {
            batch,
            atlas,
            clip: None,
        }
    }

    pub fn atlas(&self) -> &Atlas {
        &self.atlas
    }

    pub fn batch(&self) -> &BatchBuffer<B> {
        &self.batch
    }

    pub fn backend(&self) -> &B {
        self.batch.backend()
    }

    pub fn backend_mut(&mut self) -> &mut B {
        self.batch.backend_mut()
    }

    /// The clip rectangle set by the last [`Renderer::set_clip_rect`] call.
    pub fn clip_rect(&self) -> Option<Rect> {
        self.clip
    }

    /// Updates the window size. Pending quads are drawn with the old size.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.batch.flush();
        self.batch.set_viewport(width, height);
        log::debug!("Renderer resized to {width}x{height}");
    }

    /// Draws a solid rectangle.
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        let white = self.atlas.white();
        self.batch.push_quad(rect, white, color);
    }

    /// Draws `text` with its top-left corner at `pos`, one quad per glyph.
    pub fn draw_text(&mut self, text: &str, pos: IVec2, color: Color) {
        let mut dst = Rect::new(pos.x, pos.y, 0, 0);
        for byte in glyph_bytes(text) {
            let src = self.atlas.glyph(byte);
            dst.w = src.w;
            dst.h = src.h;
            self.batch.push_quad(dst, src, color);
            dst.x = dst.x.saturating_add(dst.w);
        }
    }

    /// Draws `icon` centered inside `rect` at its natural size.
    pub fn draw_icon(&mut self, icon: Icon, rect: Rect, color: Color) {
        let src = self.atlas.icon(icon);
        let x = rect.x.saturating_add(rect.w.saturating_sub(src.w) / 2);
        let y = rect.y.saturating_add(rect.h.saturating_sub(src.h) / 2);
        self.batch.push_quad(Rect::new(x, y, src.w, src.h), src, color);
    }

    /// Restricts drawing to `rect`. Quads recorded under the previous clip are
    /// flushed first.
    pub fn set_clip_rect(&mut self, rect: Rect) {
        self.batch.flush();
        let (_, height) = self.batch.viewport();
        self.batch.backend_mut().set_scissor(rect.to_scissor(height));
        self.clip = Some(rect);
    }

    /// Clears the window to `color`.
    pub fn clear(&mut self, color: Color) {
        self.batch.flush();
        self.batch.backend_mut().clear(color);
    }

    /// Draws everything still pending and presents the frame.
    pub fn present(&mut self) {
        self.batch.flush();
        self.batch.backend_mut().present();
    }
}
