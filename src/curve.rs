use std::ops::Range;

use crate::batch::BatchId;

/// A stable reference to a curve, issued in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurveHandle(pub(crate) usize);

impl CurveHandle {
    /// The position of the curve in creation order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Where a curve lives. Curves never change after they are added.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Curve {
    /// The batch that owns this curve.
    pub batch: BatchId,
    /// The first slot of this curve in the batch's control point buffer.
    pub control_point_offset: usize,
    /// The number of control points in this curve.
    pub control_point_count: usize,
    /// The number of parametric samples emitted along this curve.
    pub sample_count: usize,
}

impl Curve {
    /// The slots this curve occupies in its batch's control point buffer.
    #[must_use]
    pub const fn control_point_range(&self) -> Range<usize> {
        self.control_point_offset..self.control_point_offset + self.control_point_count
    }

    /// The number of ribbon vertices this curve contributes to its batch.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.sample_count * 2
    }

    /// The number of triangles this curve contributes to its batch.
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.sample_count.saturating_sub(1) * 2
    }
}

/// Append-only list of every curve ever added.
#[derive(Default, Debug)]
pub struct CurveRegistry {
    curves: Vec<Curve>,
}

impl CurveRegistry {
    pub(crate) fn push(&mut self, curve: Curve) -> CurveHandle {
        self.curves.push(curve);
        CurveHandle(self.curves.len() - 1)
    }

    /// Returns the curve for `handle`, if it was issued by this registry.
    #[must_use]
    pub fn get(&self, handle: CurveHandle) -> Option<&Curve> {
        self.curves.get(handle.0)
    }

    /// Returns the curves with handles in `range`.
    #[must_use]
    pub(crate) fn slice(&self, range: Range<usize>) -> &[Curve] {
        &self.curves[range]
    }

    /// Returns an iterator over every curve in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (CurveHandle, &Curve)> + '_ {
        self.curves
            .iter()
            .enumerate()
            .map(|(index, curve)| (CurveHandle(index), curve))
    }

    /// The next handle [`push`](Self::push) will return.
    #[must_use]
    pub fn next_handle(&self) -> CurveHandle {
        CurveHandle(self.curves.len())
    }

    /// The number of curves registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Returns true if no curve was registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// The sum of every curve's control point count.
    #[must_use]
    pub fn total_control_points(&self) -> usize {
        self.curves.iter().map(|curve| curve.control_point_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn curve(batch: usize, offset: usize, count: usize, samples: usize) -> Curve {
        Curve {
            batch: BatchId(batch),
            control_point_offset: offset,
            control_point_count: count,
            sample_count: samples,
        }
    }

    #[test]
    fn handles_follow_creation_order() {
        let mut registry = CurveRegistry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.next_handle().index(), 0);
        let first = registry.push(curve(0, 0, 4, 10));
        let second = registry.push(curve(0, 4, 6, 3));
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(second).unwrap().control_point_offset, 4);
        assert!(registry.get(CurveHandle(2)).is_none());
        assert_eq!(registry.total_control_points(), 10);
    }

    #[test]
    fn curve_geometry_counts() {
        let entry = curve(0, 4, 6, 3);
        assert_eq!(entry.control_point_range(), 4..10);
        assert_eq!(entry.vertex_count(), 6);
        assert_eq!(entry.triangle_count(), 4);
        assert_eq!(curve(0, 0, 4, 1).triangle_count(), 0);
    }

    #[test]
    fn slices_by_handle_range() {
        let mut registry = CurveRegistry::default();
        registry.push(curve(0, 0, 4, 10));
        registry.push(curve(1, 0, 6, 3));
        registry.push(curve(1, 6, 2, 3));
        let tail = registry.slice(1..3);
        assert_eq!(tail.len(), 2);
        assert!(tail.iter().all(|entry| entry.batch == BatchId(1)));
        assert!(registry.slice(3..3).is_empty());
    }
}
