use std::collections::HashMap;

use crate::{backend::RenderBackend, batch::BatchId, math::Point, mesh::BatchMesh};

/// A call received by a [`HeadlessBackend`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// A mesh was created.
    CreateBatch {
        /// The batch the mesh belongs to.
        batch: BatchId,
        /// The number of vertices in the mesh.
        vertices: usize,
        /// The number of indices in the mesh.
        indices: usize,
    },
    /// A control point array was uploaded.
    UploadControlPoints {
        /// The receiving batch.
        batch: BatchId,
        /// The length of the uploaded array.
        len: usize,
    },
    /// A width was uploaded.
    UploadWidth {
        /// The receiving batch.
        batch: BatchId,
        /// The uploaded width.
        width: f32,
    },
    /// A draw was submitted.
    Draw(BatchId),
}

/// The device-side state of one batch as seen by a [`HeadlessBackend`].
#[derive(Default, Clone, Debug)]
pub struct UploadedBatch {
    /// The mesh passed to `create_batch`.
    pub mesh: BatchMesh,
    /// The last uploaded control point array.
    pub control_points: Vec<Point>,
    /// The last uploaded width.
    pub width: Option<f32>,
    /// The number of draws submitted over the backend's lifetime.
    pub draws: usize,
}

/// A [`RenderBackend`] that keeps everything in memory. Useful for tests,
/// benchmarks, and running without a device.
#[derive(Default, Debug)]
pub struct HeadlessBackend {
    batches: HashMap<BatchId, UploadedBatch>,
    commands: Vec<Command>,
    frames: usize,
}

impl HeadlessBackend {
    /// The commands received since the current frame began.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The state uploaded for `batch`.
    #[must_use]
    pub fn batch(&self, batch: BatchId) -> Option<&UploadedBatch> {
        self.batches.get(&batch)
    }

    /// The number of batches created.
    #[must_use]
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// The number of frames begun.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    /// The draws submitted in the current frame, in order.
    pub fn draws(&self) -> impl Iterator<Item = BatchId> + '_ {
        self.commands.iter().filter_map(|command| match command {
            Command::Draw(batch) => Some(*batch),
            _ => None,
        })
    }
}

impl RenderBackend for HeadlessBackend {
    fn begin_frame(&mut self) {
        self.commands.clear();
        self.frames += 1;
    }

    fn create_batch(&mut self, batch: BatchId, mesh: &BatchMesh) {
        self.commands.push(Command::CreateBatch {
            batch,
            vertices: mesh.vertices().len(),
            indices: mesh.indices().len(),
        });
        self.batches.entry(batch).or_default().mesh = mesh.clone();
    }

    fn upload_control_points(&mut self, batch: BatchId, control_points: &[Point]) {
        self.commands.push(Command::UploadControlPoints {
            batch,
            len: control_points.len(),
        });
        let uploaded = self.batches.entry(batch).or_default();
        uploaded.control_points.clear();
        uploaded.control_points.extend_from_slice(control_points);
    }

    fn upload_width(&mut self, batch: BatchId, width: f32) {
        self.commands.push(Command::UploadWidth { batch, width });
        self.batches.entry(batch).or_default().width = Some(width);
    }

    fn draw(&mut self, batch: BatchId) {
        self.commands.push(Command::Draw(batch));
        self.batches.entry(batch).or_default().draws += 1;
    }
}
