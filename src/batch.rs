//! The quad batch buffer.
//!
//! Quads are accumulated into a fixed-capacity vertex/index arena and handed
//! to a [`RenderBackend`] as one indexed triangle list per flush. A flush
//! happens when the arena is full, when the clip rectangle changes and at the
//! end of every frame; the caller decides the latter two.

use glam::Mat4;

use crate::geometry::{Color, Rect, ScissorRect};

/// Default number of quads a batch can hold before it is flushed.
pub const DEFAULT_CAPACITY: usize = 16384;

/// Largest accepted capacity. The arena is allocated up front, so this keeps
/// it near 100 MiB; vertex indices stay far below `u32::MAX`.
pub const MAX_CAPACITY: usize = 1 << 20;

const VERTICES_PER_QUAD: usize = 4;
const INDICES_PER_QUAD: usize = 6;

/// One vertex of a quad: pixel position, normalized atlas coordinate and the
/// tint color replicated on every corner.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

/// Everything a backend needs to rasterize one batch.
#[derive(Debug)]
pub struct BatchDraw<'a> {
    /// Maps window pixels (top-left origin, y down) to clip space.
    pub projection: Mat4,
    pub viewport: (i32, i32),
    pub vertices: &'a [QuadVertex],
    pub indices: &'a [u32],
}

impl BatchDraw<'_> {
    pub fn quad_count(&self) -> usize {
        self.indices.len() / INDICES_PER_QUAD
    }
}

/// The GPU side of the renderer.
///
/// Implementations must leave unrelated GPU state as they found it after
/// [`RenderBackend::draw_batch`] returns.
pub trait RenderBackend {
    /// Rasterizes one batch with a single draw call.
    fn draw_batch(&mut self, batch: BatchDraw<'_>);

    /// Replaces the active scissor box.
    fn set_scissor(&mut self, scissor: ScissorRect);

    /// Clears the color buffer.
    fn clear(&mut self, color: Color);

    /// Shows the finished frame.
    fn present(&mut self);
}

/// Returns the orthographic projection for a `width` x `height` pixel window
/// with the origin in the top-left corner.
pub fn pixel_projection(width: i32, height: i32) -> Mat4 {
    Mat4::orthographic_rh_gl(0.0, width as f32, height as f32, 0.0, -1.0, 1.0)
}

/// Fixed-capacity accumulator of quads in submission order.
pub struct BatchBuffer<B: RenderBackend> {
    backend: B,
    capacity: usize,
    len: usize,
    vertices: Vec<QuadVertex>,
    indices: Vec<u32>,
    atlas_size: (u32, u32),
    viewport: (i32, i32),
    flushes: u64,
    dropped: u64,
}

impl<B: RenderBackend> BatchBuffer<B> {
    /// Creates a buffer holding up to `capacity` quads whose texture
    /// coordinates are normalized against an atlas of `atlas_size` pixels.
    ///
    /// Capacities above [`MAX_CAPACITY`] are lowered to it.
    pub fn new(backend: B, capacity: usize, atlas_size: (u32, u32), viewport: (i32, i32)) -> Self {
        let capacity = if capacity > MAX_CAPACITY {
            log::warn!("Batch capacity {capacity} lowered to {MAX_CAPACITY}");
            MAX_CAPACITY
        } else {
            capacity
        };

        Self {
            backend,
            capacity,
            len: 0,
            vertices: vec![QuadVertex::default(); capacity * VERTICES_PER_QUAD],
            indices: vec![0; capacity * INDICES_PER_QUAD],
            atlas_size,
            viewport,
            flushes: 0,
            dropped: 0,
        }
    }

    /// Number of quads waiting for the next flush.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of flushes that reached the backend.
    pub fn flush_count(&self) -> u64 {
        self.flushes
    }

    /// Number of quads that could not be recorded.
    pub fn dropped_count(&self) -> u64 {
        self.dropped
    }

    pub fn viewport(&self) -> (i32, i32) {
        self.viewport
    }

    /// Sets the window size used for the projection of subsequent flushes.
    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.viewport = (width, height);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The vertices recorded since the last flush.
    pub fn pending_vertices(&self) -> &[QuadVertex] {
        &self.vertices[..self.len * VERTICES_PER_QUAD]
    }

    /// The indices recorded since the last flush.
    pub fn pending_indices(&self) -> &[u32] {
        &self.indices[..self.len * INDICES_PER_QUAD]
    }

    /// Appends one quad drawing the `src` atlas area into `dst`.
    ///
    /// Flushes first when the buffer is full. Returns `false` if the quad was
    /// dropped because no room could be made.
    pub fn push_quad(&mut self, dst: Rect, src: Rect, color: Color) -> bool {
        if self.len >= self.capacity {
            self.flush();
            if self.len >= self.capacity {
                self.dropped += 1;
                log::error!("Batch buffer has no room (capacity {}), quad dropped", self.capacity);
                return false;
            }
        }

        let Some(base) = self
            .len
            .checked_mul(VERTICES_PER_QUAD)
            .and_then(|v| u32::try_from(v).ok())
            .filter(|base| base.checked_add(3).is_some())
        else {
            self.dropped += 1;
            log::error!("Vertex index overflow at slot {}, quad dropped", self.len);
            return false;
        };

        let vertex_start = self.len * VERTICES_PER_QUAD;
        let index_start = self.len * INDICES_PER_QUAD;
        let (Some(vertices), Some(indices)) = (
            self.vertices.get_mut(vertex_start..vertex_start + VERTICES_PER_QUAD),
            self.indices.get_mut(index_start..index_start + INDICES_PER_QUAD),
        ) else {
            self.dropped += 1;
            log::error!("Batch slot {} out of bounds, quad dropped", self.len);
            return false;
        };

        let (atlas_w, atlas_h) = (self.atlas_size.0 as f32, self.atlas_size.1 as f32);
        let u0 = src.x as f32 / atlas_w;
        let v0 = src.y as f32 / atlas_h;
        let u1 = (src.x as f32 + src.w as f32) / atlas_w;
        let v1 = (src.y as f32 + src.h as f32) / atlas_h;

        let x0 = dst.x as f32;
        let y0 = dst.y as f32;
        let x1 = dst.x as f32 + dst.w as f32;
        let y1 = dst.y as f32 + dst.h as f32;

        let color = color.to_array();
        vertices[0] = QuadVertex { position: [x0, y0], uv: [u0, v0], color };
        vertices[1] = QuadVertex { position: [x1, y0], uv: [u1, v0], color };
        vertices[2] = QuadVertex { position: [x0, y1], uv: [u0, v1], color };
        vertices[3] = QuadVertex { position: [x1, y1], uv: [u1, v1], color };

        indices.copy_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base + 1]);

        self.len += 1;
        true
    }

    /// Sends every pending quad to the backend as one draw call and empties
    /// the buffer. Does nothing when no quad is pending.
    pub fn flush(&mut self) {
        if self.len == 0 {
            return;
        }

        let (width, height) = self.viewport;
        self.backend.draw_batch(BatchDraw {
            projection: pixel_projection(width, height),
            viewport: self.viewport,
            vertices: &self.vertices[..self.len * VERTICES_PER_QUAD],
            indices: &self.indices[..self.len * INDICES_PER_QUAD],
        });

        self.flushes += 1;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4;

    use super::*;
    use crate::testing::{BackendEvent, RecordingBackend};

    fn buffer(capacity: usize) -> BatchBuffer<RecordingBackend> {
        BatchBuffer::new(RecordingBackend::default(), capacity, (128, 128), (800, 600))
    }

    #[test]
    fn test_no_flush_until_capacity_exceeded() {
        let capacity = 64;
        let mut batch = buffer(capacity);
        for i in 0..capacity {
            assert!(batch.push_quad(Rect::new(i as i32, 0, 4, 4), Rect::new(0, 0, 3, 3), Color::WHITE));
        }
        assert_eq!(batch.len(), capacity);
        assert_eq!(batch.backend().batches().count(), 0);

        assert!(batch.push_quad(Rect::new(0, 0, 4, 4), Rect::new(0, 0, 3, 3), Color::WHITE));
        let batches: Vec<_> = batch.backend().batches().collect();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].quads, capacity);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_default_capacity_boundary() {
        let mut batch = buffer(DEFAULT_CAPACITY);
        for _ in 0..DEFAULT_CAPACITY {
            batch.push_quad(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 1, 1), Color::WHITE);
        }
        assert_eq!(batch.flush_count(), 0);
        batch.push_quad(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 1, 1), Color::WHITE);
        assert_eq!(batch.flush_count(), 1);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_degenerate_rect_occupies_slot() {
        let mut batch = buffer(8);
        assert!(batch.push_quad(Rect::new(5, 5, 0, 10), Rect::new(0, 0, 3, 3), Color::WHITE));
        assert!(batch.push_quad(Rect::new(5, 5, 10, 0), Rect::new(0, 0, 3, 3), Color::WHITE));
        assert!(batch.push_quad(Rect::new(5, 5, 0, 0), Rect::new(0, 0, 3, 3), Color::WHITE));
        assert_eq!(batch.len(), 3);

        let vertex_count = batch.pending_vertices().len() as u32;
        assert_eq!(vertex_count, 12);
        assert!(batch.pending_indices().iter().all(|i| *i < vertex_count));
    }

    #[test]
    fn test_indices_stay_in_bounds_across_flushes() {
        let mut batch = buffer(3);
        for i in 0..10 {
            batch.push_quad(Rect::new(i, i, i, 0), Rect::new(0, 0, 1, 1), Color::WHITE);
            let vertex_count = batch.pending_vertices().len() as u32;
            assert!(batch.pending_indices().iter().all(|idx| *idx < vertex_count));
        }
        for draw in batch.backend().batches() {
            assert!(draw.indices.iter().all(|idx| (*idx as usize) < draw.vertices.len()));
        }
    }

    #[test]
    fn test_index_pattern() {
        let mut batch = buffer(4);
        batch.push_quad(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 1, 1), Color::WHITE);
        batch.push_quad(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 1, 1), Color::WHITE);
        assert_eq!(batch.pending_indices(), &[0, 1, 2, 2, 3, 1, 4, 5, 6, 6, 7, 5]);
    }

    #[test]
    fn test_zero_capacity_drops_without_corruption() {
        let mut batch = buffer(0);
        assert!(!batch.push_quad(Rect::new(0, 0, 10, 10), Rect::new(0, 0, 3, 3), Color::WHITE));
        assert!(!batch.push_quad(Rect::new(0, 0, 10, 10), Rect::new(0, 0, 3, 3), Color::WHITE));
        assert_eq!(batch.len(), 0);
        assert_eq!(batch.dropped_count(), 2);
        assert!(batch.pending_indices().is_empty());
        assert!(batch.backend().events.is_empty());
    }

    #[test]
    fn test_whole_atlas_texcoords_are_exact() {
        let mut batch = buffer(1);
        batch.push_quad(Rect::new(10, 20, 30, 40), Rect::new(0, 0, 128, 128), Color::WHITE);
        let uvs: Vec<[f32; 2]> = batch.pending_vertices().iter().map(|v| v.uv).collect();
        assert_eq!(uvs, vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]);
    }

    #[test]
    fn test_texcoords_match_source_cell() {
        let mut batch = buffer(1);
        batch.push_quad(Rect::new(0, 0, 8, 12), Rect::new(64, 32, 8, 12), Color::WHITE);
        let v = batch.pending_vertices();
        assert_eq!(v[0].uv, [0.5, 0.25]);
        assert_eq!(v[3].uv, [72.0 / 128.0, 44.0 / 128.0]);
    }

    #[test]
    fn test_vertices_and_colors() {
        let mut batch = buffer(1);
        let color = Color::rgba(1, 2, 3, 4);
        batch.push_quad(Rect::new(10, 20, 30, 40), Rect::new(0, 0, 1, 1), color);
        let v = batch.pending_vertices();
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[1].position, [40.0, 20.0]);
        assert_eq!(v[2].position, [10.0, 60.0]);
        assert_eq!(v[3].position, [40.0, 60.0]);
        assert!(v.iter().all(|vertex| vertex.color == [1, 2, 3, 4]));
    }

    #[test]
    fn test_extreme_rects_are_recorded() {
        let mut batch = buffer(2);
        assert!(batch.push_quad(Rect::new(i32::MAX, 0, 1, 1), Rect::new(i32::MAX, 0, 1, 1), Color::WHITE));
        assert!(batch.push_quad(
            Rect::new(i32::MAX, i32::MAX, i32::MAX, i32::MAX),
            Rect::new(0, 0, 1, 1),
            Color::WHITE
        ));
        assert_eq!(batch.len(), 2);

        let v = batch.pending_vertices();
        assert_eq!(v[3].position, [i32::MAX as f32 + 1.0, 1.0]);
        assert_eq!(v[7].position, [i32::MAX as f32 * 2.0, i32::MAX as f32 * 2.0]);
        assert!(v.iter().all(|vertex| vertex.position.iter().all(|c| c.is_finite())));
        assert_eq!(batch.dropped_count(), 0);
    }

    #[test]
    fn test_flush_empty_is_noop() {
        let mut batch = buffer(4);
        batch.flush();
        assert_eq!(batch.flush_count(), 0);
        assert!(batch.backend().events.is_empty());
    }

    #[test]
    fn test_flush_resets_and_uses_pixel_projection() {
        let mut batch = buffer(4);
        batch.push_quad(Rect::new(0, 0, 1, 1), Rect::new(0, 0, 1, 1), Color::WHITE);
        batch.flush();
        assert!(batch.is_empty());

        let BackendEvent::Batch(draw) = &batch.backend().events[0] else {
            panic!("expected a batch");
        };
        assert_eq!(draw.viewport, (800, 600));
        let top_left = draw.projection * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let bottom_right = draw.projection * Vec4::new(800.0, 600.0, 0.0, 1.0);
        assert!((top_left.x + 1.0).abs() < 1e-6 && (top_left.y - 1.0).abs() < 1e-6);
        assert!((bottom_right.x - 1.0).abs() < 1e-6 && (bottom_right.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_capacity_is_capped() {
        let batch = BatchBuffer::new(RecordingBackend::default(), 0, (1, 1), (1, 1));
        assert_eq!(batch.capacity(), 0);
        assert!(MAX_CAPACITY as u64 * VERTICES_PER_QUAD as u64 <= u32::MAX as u64);
    }
}
