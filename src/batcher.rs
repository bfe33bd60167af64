use crate::{
    backend::RenderBackend,
    batch::{Batch, BatchId, BatchStore},
    capacity::Reservation,
    curve::{Curve, CurveHandle, CurveRegistry},
    frame::{DirtyFlags, FrameStats, FrameUpdater},
    math::Point,
    Config, Error,
};

/// Packs splines into batches and keeps their control point values current.
///
/// Add every curve with [`add`](Self::add), call [`generate`](Self::generate)
/// once, then call [`modify`](Self::modify) whenever the values change and
/// [`update`](Self::update) once per frame.
#[derive(Debug)]
pub struct SplineBatcher {
    config: Config,
    curves: CurveRegistry,
    batches: BatchStore,
    updater: FrameUpdater,
    width: f32,
}

impl Default for SplineBatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SplineBatcher {
    /// Creates a batcher using the default [`Config`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_validated(Config::default())
    }

    /// Creates a batcher using `config`.
    pub fn with_config(config: Config) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: Config) -> Self {
        Self {
            config,
            curves: CurveRegistry::default(),
            batches: BatchStore::default(),
            updater: FrameUpdater::default(),
            width: config.width,
        }
    }

    /// Registers a curve through `points`, emitting `sample_count` samples
    /// along it, and returns its handle.
    ///
    /// The curve goes into the most recent batch if that batch is still open
    /// and has room. Otherwise the open batch is finalized and a new batch is
    /// started.
    pub fn add(&mut self, points: &[Point], sample_count: usize) -> crate::Result<CurveHandle> {
        if points.is_empty() {
            return Err(Error::EmptyCurve);
        } else if sample_count == 0 {
            return Err(Error::InvalidSampleCount);
        }

        let request = Reservation::for_curve(points.len(), sample_count);
        if !self.config.capacity.can_hold(request) {
            return Err(Error::CurveTooLarge {
                control_points: request.control_points,
                vertices: request.vertices,
            });
        }

        let handle = self.curves.next_handle();
        let batch = self.batches.reserve(
            request,
            handle.index(),
            &self.config.capacity,
            &self.curves,
        );
        let control_point_offset = batch.append(handle.index(), points, sample_count);
        let curve = Curve {
            batch: batch.id(),
            control_point_offset,
            control_point_count: points.len(),
            sample_count,
        };
        tracing::trace!(
            curve = handle.index(),
            batch = curve.batch.index(),
            control_point_offset,
            "added curve"
        );

        Ok(self.curves.push(curve))
    }

    /// Finalizes the most recent batch if it is still open. Does nothing if
    /// there are no curves or every batch already has its mesh.
    pub fn generate(&mut self) {
        self.batches.finalize_open(&self.curves);
    }

    /// Overwrites every control point of every curve. `values` must hold
    /// exactly [`total_control_points`](Self::total_control_points) points,
    /// in the order the curves were added.
    pub fn modify(&mut self, values: &[Point]) -> crate::Result<()> {
        let expected = self.total_control_points();
        if values.len() != expected {
            return Err(Error::ControlPointCountMismatch {
                expected,
                actual: values.len(),
            });
        }

        let mut remaining = values;
        for batch in self.batches.iter_mut() {
            let (current, rest) = remaining.split_at(batch.control_point_fill());
            batch.overwrite(0, current);
            remaining = rest;
        }

        self.updater.mark_all_control_points();
        Ok(())
    }

    /// Overwrites the control points of a single curve. Only the batch owning
    /// the curve uploads new values on the next frame.
    pub fn modify_curve(&mut self, handle: CurveHandle, values: &[Point]) -> crate::Result<()> {
        let curve = *self.curves.get(handle).ok_or(Error::UnknownCurve(handle))?;
        if values.len() != curve.control_point_count {
            return Err(Error::ControlPointCountMismatch {
                expected: curve.control_point_count,
                actual: values.len(),
            });
        }

        let batch = self
            .batches
            .get_mut(curve.batch)
            .ok_or(Error::UnknownCurve(handle))?;
        batch.overwrite(curve.control_point_offset, values);
        self.updater.mark_control_points(curve.batch);
        Ok(())
    }

    /// The ribbon width.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Sets the ribbon width. Every batch uploads it on the next frame if it
    /// changed, no matter how small the change.
    pub fn set_width(&mut self, width: f32) {
        if self.width.to_bits() != width.to_bits() {
            self.width = width;
            self.updater.mark_all_width();
        }
    }

    /// Runs one frame: finalizes any batch still missing a mesh, uploads stale
    /// parameters, and submits one draw per batch to `backend`.
    pub fn update<B: RenderBackend>(&mut self, backend: &mut B) -> FrameStats {
        self.updater
            .update(&mut self.batches, &self.curves, self.width, backend)
    }

    /// Returns the curve for `handle`.
    #[must_use]
    pub fn curve(&self, handle: CurveHandle) -> Option<&Curve> {
        self.curves.get(handle)
    }

    /// Returns the current control point values of the curve `handle`.
    #[must_use]
    pub fn curve_control_points(&self, handle: CurveHandle) -> Option<&[Point]> {
        let curve = self.curves.get(handle)?;
        let batch = self.batches.get(curve.batch)?;
        Some(&batch.control_points()[curve.control_point_range()])
    }

    /// Every curve, in creation order.
    #[must_use]
    pub const fn curves(&self) -> &CurveRegistry {
        &self.curves
    }

    /// Every batch, in creation order.
    #[must_use]
    pub fn batches(&self) -> &[Batch] {
        self.batches.as_slice()
    }

    /// Returns the batch with `id`.
    #[must_use]
    pub fn batch(&self, id: BatchId) -> Option<&Batch> {
        self.batches.get(id)
    }

    /// Returns what `batch` will upload on the next frame.
    #[must_use]
    pub fn dirty(&self, batch: BatchId) -> DirtyFlags {
        self.updater.dirty(batch)
    }

    /// The number of curves added.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no curve was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// The number of control points across every curve.
    #[must_use]
    pub fn total_control_points(&self) -> usize {
        self.batches
            .as_slice()
            .iter()
            .map(Batch::control_point_fill)
            .sum()
    }

    /// The configuration this batcher was built with. The width reflects the
    /// initial value, see [`width`](Self::width) for the current one.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}
