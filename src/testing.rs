//! A [`RenderBackend`] that records what it is asked to do.

use glam::Mat4;

use crate::{
    batch::{BatchDraw, QuadVertex, RenderBackend},
    geometry::{Color, ScissorRect},
};

#[derive(Clone, Debug)]
pub struct RecordedBatch {
    pub projection: Mat4,
    pub viewport: (i32, i32),
    pub vertices: Vec<QuadVertex>,
    pub indices: Vec<u32>,
    pub quads: usize,
}

#[derive(Clone, Debug)]
pub enum BackendEvent {
    Batch(RecordedBatch),
    Scissor(ScissorRect),
    Clear(Color),
    Present,
}

#[derive(Default)]
pub struct RecordingBackend {
    pub events: Vec<BackendEvent>,
}

impl RecordingBackend {
    pub fn batches(&self) -> impl Iterator<Item = &RecordedBatch> {
        self.events.iter().filter_map(|event| match event {
            BackendEvent::Batch(batch) => Some(batch),
            _ => None,
        })
    }
}

impl RenderBackend for RecordingBackend {
    fn draw_batch(&mut self, batch: BatchDraw<'_>) {
        self.events.push(BackendEvent::Batch(RecordedBatch {
            projection: batch.projection,
            viewport: batch.viewport,
            vertices: batch.vertices.to_vec(),
            indices: batch.indices.to_vec(),
            quads: batch.quad_count(),
        }));
    }

    fn set_scissor(&mut self, scissor: ScissorRect) {
        self.events.push(BackendEvent::Scissor(scissor));
    }

    fn clear(&mut self, color: Color) {
        self.events.push(BackendEvent::Clear(color));
    }

    fn present(&mut self) {
        self.events.push(BackendEvent::Present);
    }
}
