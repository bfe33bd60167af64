use tracing::instrument;

use crate::{
    backend::RenderBackend,
    batch::{BatchId, BatchStore},
    curve::CurveRegistry,
};

/// Which parts of a batch's parameter block are stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DirtyFlags {
    /// The control point values changed since the last upload.
    pub control_points: bool,
    /// The ribbon width changed since the last upload.
    pub width: bool,
}

impl Default for DirtyFlags {
    /// A batch that was never uploaded is entirely dirty.
    fn default() -> Self {
        Self {
            control_points: true,
            width: true,
        }
    }
}

impl DirtyFlags {
    /// Flags with nothing left to upload.
    #[must_use]
    pub const fn clean() -> Self {
        Self {
            control_points: false,
            width: false,
        }
    }

    /// Returns true if nothing needs to be uploaded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        !self.control_points && !self.width
    }
}

/// What a single [`FrameUpdater::update`] call did.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    /// Batches that had to be finalized during the frame.
    pub finalized: usize,
    /// Meshes handed to the backend for the first time.
    pub created: usize,
    /// Control point arrays uploaded.
    pub control_point_uploads: usize,
    /// Width values uploaded.
    pub width_uploads: usize,
    /// Draw calls submitted.
    pub draws: usize,
}

#[derive(Default, Debug)]
struct BatchState {
    dirty: DirtyFlags,
    created: bool,
}

/// Tracks what each batch's parameter block needs and submits one draw per
/// batch every frame.
#[derive(Default, Debug)]
pub struct FrameUpdater {
    states: Vec<BatchState>,
}

impl FrameUpdater {
    /// Returns what `batch` will upload on the next frame.
    #[must_use]
    pub fn dirty(&self, batch: BatchId) -> DirtyFlags {
        self.states
            .get(batch.index())
            .map(|state| state.dirty)
            .unwrap_or_default()
    }

    pub(crate) fn mark_control_points(&mut self, batch: BatchId) {
        // Batches without state have never been uploaded and are dirty already.
        if let Some(state) = self.states.get_mut(batch.index()) {
            state.dirty.control_points = true;
        }
    }

    pub(crate) fn mark_all_control_points(&mut self) {
        for state in &mut self.states {
            state.dirty.control_points = true;
        }
    }

    pub(crate) fn mark_all_width(&mut self) {
        for state in &mut self.states {
            state.dirty.width = true;
        }
    }

    /// Finalizes any batch that has no mesh yet, uploads stale parameters,
    /// and draws every batch in order.
    #[instrument(
        name = "FrameUpdater::update",
        level = "trace",
        skip(self, batches, curves, backend)
    )]
    pub fn update<B: RenderBackend>(
        &mut self,
        batches: &mut BatchStore,
        curves: &CurveRegistry,
        width: f32,
        backend: &mut B,
    ) -> FrameStats {
        let mut stats = FrameStats::default();
        backend.begin_frame();
        self.states.resize_with(batches.len(), BatchState::default);

        for (batch, state) in batches.iter_mut().zip(&mut self.states) {
            let owned_curves = batch.curves();
            if batch.finalize(curves.slice(owned_curves)) {
                tracing::trace!(batch = batch.id().index(), "finalized during frame");
                stats.finalized += 1;
            }

            if !state.created {
                if let Some(mesh) = batch.mesh() {
                    backend.create_batch(batch.id(), mesh);
                    state.created = true;
                    stats.created += 1;
                }
            }

            if state.dirty.control_points {
                backend.upload_control_points(batch.id(), batch.control_point_buffer());
                stats.control_point_uploads += 1;
            }

            if state.dirty.width {
                backend.upload_width(batch.id(), width);
                stats.width_uploads += 1;
            }

            backend.draw(batch.id());
            stats.draws += 1;
            state.dirty = DirtyFlags::clean();
        }

        stats
    }
}
