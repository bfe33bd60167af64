use std::ops::Range;

use crate::{
    capacity::{Capacity, Reservation},
    curve::{Curve, CurveRegistry},
    math::Point,
    mesh::BatchMesh,
};

/// Identifies a batch by its position in the [`BatchStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BatchId(pub(crate) usize);

impl BatchId {
    /// The position of the batch in creation order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A fixed-capacity group of curves that is drawn with a single draw call.
#[derive(Debug)]
pub struct Batch {
    id: BatchId,
    control_points: Vec<Point>,
    filled: Reservation,
    curves: Range<usize>,
    mesh: Option<BatchMesh>,
}

impl Batch {
    pub(crate) fn new(id: BatchId, first_curve: usize, capacity: &Capacity) -> Self {
        Self {
            id,
            control_points: vec![Point::origin(); capacity.max_control_points],
            filled: Reservation::default(),
            curves: first_curve..first_curve,
            mesh: None,
        }
    }

    /// The id of this batch.
    #[must_use]
    pub const fn id(&self) -> BatchId {
        self.id
    }

    /// The occupied part of the control point buffer.
    #[must_use]
    pub fn control_points(&self) -> &[Point] {
        &self.control_points[..self.filled.control_points]
    }

    /// The whole control point buffer, including unoccupied slots. This is
    /// what gets uploaded to the evaluation stage.
    #[must_use]
    pub fn control_point_buffer(&self) -> &[Point] {
        &self.control_points
    }

    /// The number of occupied control point slots.
    #[must_use]
    pub const fn control_point_fill(&self) -> usize {
        self.filled.control_points
    }

    /// The number of vertices committed to this batch.
    #[must_use]
    pub const fn vertex_fill(&self) -> usize {
        self.filled.vertices
    }

    /// Everything committed to this batch so far.
    #[must_use]
    pub const fn filled(&self) -> Reservation {
        self.filled
    }

    /// The handles of the curves owned by this batch.
    #[must_use]
    pub fn curves(&self) -> Range<usize> {
        self.curves.clone()
    }

    /// The generated topology, once the batch is finalized.
    #[must_use]
    pub const fn mesh(&self) -> Option<&BatchMesh> {
        self.mesh.as_ref()
    }

    /// Returns true once the mesh has been generated. Finalized batches never
    /// accept another curve.
    #[must_use]
    pub const fn is_finalized(&self) -> bool {
        self.mesh.is_some()
    }

    /// Copies `points` into the buffer and takes ownership of the curve with
    /// handle `handle`. Returns the control point offset.
    pub(crate) fn append(&mut self, handle: usize, points: &[Point], sample_count: usize) -> usize {
        debug_assert!(!self.is_finalized());
        debug_assert_eq!(handle, self.curves.end);
        let offset = self.filled.control_points;
        self.control_points[offset..offset + points.len()].copy_from_slice(points);
        self.filled = self
            .filled
            .plus(Reservation::for_curve(points.len(), sample_count));
        self.curves.end = handle + 1;
        offset
    }

    /// Generates the mesh from `curves`, which must be this batch's curves.
    /// Returns false if the batch was already finalized.
    pub(crate) fn finalize(&mut self, curves: &[Curve]) -> bool {
        if self.is_finalized() {
            return false;
        }

        debug_assert_eq!(curves.len(), self.curves.len());
        let mesh = BatchMesh::generate(curves);
        tracing::debug!(
            batch = self.id.0,
            curves = curves.len(),
            control_points = self.filled.control_points,
            vertices = mesh.vertices().len(),
            triangles = mesh.triangle_count(),
            "finalized batch"
        );
        self.mesh = Some(mesh);
        true
    }

    /// Overwrites the occupied slots starting at `offset` with `values`.
    pub(crate) fn overwrite(&mut self, offset: usize, values: &[Point]) {
        debug_assert!(offset + values.len() <= self.filled.control_points);
        self.control_points[offset..offset + values.len()].copy_from_slice(values);
    }
}

/// The ordered, append-only collection of batches.
#[derive(Debug, Default)]
pub struct BatchStore {
    batches: Vec<Batch>,
}

impl BatchStore {
    /// The most recent batch, if it still accepts curves.
    pub(crate) fn open_mut(&mut self) -> Option<&mut Batch> {
        self.batches
            .last_mut()
            .filter(|batch| !batch.is_finalized())
    }

    /// Starts a new batch whose first curve will be `first_curve`.
    pub(crate) fn open_new(&mut self, first_curve: usize, capacity: &Capacity) -> &mut Batch {
        let id = BatchId(self.batches.len());
        tracing::debug!(batch = id.0, first_curve, "opened batch");
        self.batches.push(Batch::new(id, first_curve, capacity));
        &mut self.batches[id.0]
    }

    /// Returns the batch that will receive a curve needing `request`. If the
    /// open batch cannot take it, the open batch is finalized first and a new
    /// batch starting at curve `first_curve` is opened.
    pub(crate) fn reserve(
        &mut self,
        request: Reservation,
        first_curve: usize,
        capacity: &Capacity,
        curves: &CurveRegistry,
    ) -> &mut Batch {
        let fits = self
            .open_mut()
            .map_or(false, |batch| capacity.admits(batch.filled(), request));
        if !fits {
            self.finalize_open(curves);
            return self.open_new(first_curve, capacity);
        }

        let last = self.batches.len() - 1;
        &mut self.batches[last]
    }

    /// Finalizes the most recent batch if it is still open. Returns true if a
    /// mesh was generated.
    pub(crate) fn finalize_open(&mut self, curves: &CurveRegistry) -> bool {
        match self.open_mut() {
            Some(batch) => {
                let owned_curves = batch.curves();
                batch.finalize(curves.slice(owned_curves))
            }
            None => false,
        }
    }

    /// Returns the batch with `id`.
    #[must_use]
    pub fn get(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(id.0)
    }

    pub(crate) fn get_mut(&mut self, id: BatchId) -> Option<&mut Batch> {
        self.batches.get_mut(id.0)
    }

    /// Every batch in creation order.
    #[must_use]
    pub fn as_slice(&self) -> &[Batch] {
        &self.batches
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Batch> {
        self.batches.iter_mut()
    }

    /// The number of batches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Returns true if no batch was opened yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}
