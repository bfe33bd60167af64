use crate::{batch::BatchId, math::Point, mesh::BatchMesh};

/// Receives the uploads and draw submissions of the frame updater.
///
/// The updater calls [`create_batch`](Self::create_batch) once per batch,
/// before any other call naming that batch. Parameter uploads for a batch
/// always precede its [`draw`](Self::draw) within a frame.
pub trait RenderBackend {
    /// Called at the start of every frame, before any other call.
    fn begin_frame(&mut self) {}

    /// Creates the static mesh and an empty parameter block for `batch`.
    fn create_batch(&mut self, batch: BatchId, mesh: &BatchMesh);

    /// Replaces the control point array of `batch`'s parameter block.
    fn upload_control_points(&mut self, batch: BatchId, control_points: &[Point]);

    /// Replaces the ribbon width of `batch`'s parameter block.
    fn upload_width(&mut self, batch: BatchId, width: f32);

    /// Submits one draw of `batch`'s mesh with its parameter block.
    fn draw(&mut self, batch: BatchId);
}
