mod batch;
mod pipeline;

use std::collections::HashMap;

use easygpu::{prelude::*, wgpu::TextureFormat};

use self::batch::GpuBatch;
pub use self::pipeline::{
    ControlPointUniform, SplinePipeline, SplineShader, Uniforms, WidthUniform,
};
use crate::{
    backend::RenderBackend, batch::BatchId, capacity::Capacity, math::Point, mesh::BatchMesh,
};

/// Owns the device resources of every batch and draws them.
///
/// Each frame, pass [`uploader`](Self::uploader) to
/// [`SplineBatcher::update`](crate::SplineBatcher::update), then call
/// [`render`](Self::render) inside a render pass.
pub struct SplineRenderer<S> {
    pipeline: SplinePipeline<S>,
    batches: HashMap<BatchId, GpuBatch>,
    queued: Vec<BatchId>,
    max_control_points: usize,
}

impl<S> SplineRenderer<S>
where
    S: SplineShader,
{
    /// Creates the pipeline for rendering into `format`. `capacity` must match
    /// the batcher's so each parameter block can hold a full batch.
    #[must_use]
    pub fn new(renderer: &Renderer, format: TextureFormat, capacity: &Capacity) -> Self {
        Self {
            pipeline: renderer.pipeline(Blending::default(), format),
            batches: HashMap::new(),
            queued: Vec::new(),
            max_control_points: capacity.max_control_points,
        }
    }

    /// Updates the projection shared by every batch.
    pub fn set_projection(&self, renderer: &mut Renderer, ortho: ScreenTransformation<f32>) {
        renderer.update_pipeline(&self.pipeline, ortho);
    }

    /// Returns the [`RenderBackend`] for this frame.
    pub fn uploader<'a>(&'a mut self, renderer: &'a Renderer) -> Uploader<'a, S> {
        Uploader {
            renderer,
            target: self,
        }
    }

    /// Issues the draws queued during the last update.
    pub fn render<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>) {
        if self.queued.is_empty() {
            return;
        }

        pass.set_easy_pipeline(&self.pipeline);
        for id in &self.queued {
            if let Some(batch) = self.batches.get(id) {
                pass.easy_draw(&batch.buffers, &batch.binding);
            }
        }
    }

    /// The number of batches with device resources.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}

/// Uploads into a [`SplineRenderer`] during one frame.
pub struct Uploader<'a, S> {
    renderer: &'a Renderer,
    target: &'a mut SplineRenderer<S>,
}

impl<'a, S> RenderBackend for Uploader<'a, S>
where
    S: SplineShader,
{
    fn begin_frame(&mut self) {
        self.target.queued.clear();
    }

    fn create_batch(&mut self, batch: BatchId, mesh: &BatchMesh) {
        let gpu_batch = GpuBatch::new(
            self.renderer,
            &self.target.pipeline,
            mesh,
            self.target.max_control_points,
        );
        self.target.batches.insert(batch, gpu_batch);
    }

    fn upload_control_points(&mut self, batch: BatchId, control_points: &[Point]) {
        if let Some(gpu_batch) = self.target.batches.get(&batch) {
            let len = control_points.len().min(self.target.max_control_points);
            gpu_batch.write_control_points(self.renderer, &control_points[..len]);
        }
    }

    fn upload_width(&mut self, batch: BatchId, width: f32) {
        if let Some(gpu_batch) = self.target.batches.get(&batch) {
            gpu_batch.write_width(self.renderer, width);
        }
    }

    fn draw(&mut self, batch: BatchId) {
        self.target.queued.push(batch);
    }
}
