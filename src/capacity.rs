#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// The default number of control points a single batch can hold. The
/// evaluation stage declares its control point uniform array with this length.
pub const MAX_CONTROL_POINTS: usize = 1000;
/// The default number of vertices a single batch can hold.
pub const MAX_VERTICES: usize = 65000;
/// The most vertices a batch can ever address with 16-bit indices.
pub const MAX_INDEXABLE_VERTICES: usize = u16::MAX as usize + 1;

/// An amount of control points and vertices, either already committed to a
/// batch or requested by a curve.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reservation {
    /// The number of control points.
    pub control_points: usize,
    /// The number of vertices.
    pub vertices: usize,
}

impl Reservation {
    /// Returns the reservation a curve needs. Every sample becomes a pair of
    /// ribbon vertices. Counts saturate at `usize::MAX`, which no capacity
    /// admits.
    #[must_use]
    pub const fn for_curve(control_points: usize, sample_count: usize) -> Self {
        Self {
            control_points,
            vertices: sample_count.saturating_mul(2),
        }
    }

    #[must_use]
    pub(crate) const fn plus(self, other: Self) -> Self {
        Self {
            control_points: self.control_points.saturating_add(other.control_points),
            vertices: self.vertices.saturating_add(other.vertices),
        }
    }
}

/// The hard ceilings of a single batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Capacity {
    /// The length of each batch's control point buffer.
    pub max_control_points: usize,
    /// The most vertices a batch's mesh may contain.
    pub max_vertices: usize,
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_control_points: MAX_CONTROL_POINTS,
            max_vertices: MAX_VERTICES,
        }
    }
}

impl Capacity {
    /// Returns true if a batch that already holds `filled` can also take
    /// `request` without crossing either ceiling.
    #[must_use]
    pub const fn admits(&self, filled: Reservation, request: Reservation) -> bool {
        let total = filled.plus(request);
        total.control_points <= self.max_control_points && total.vertices <= self.max_vertices
    }

    /// Returns true if `request` fits into an empty batch.
    #[must_use]
    pub const fn can_hold(&self, request: Reservation) -> bool {
        let empty = Reservation {
            control_points: 0,
            vertices: 0,
        };
        self.admits(empty, request)
    }

    pub(crate) const fn validate(&self) -> crate::Result<()> {
        if self.max_control_points == 0 {
            Err(crate::Error::InvalidCapacity(
                "max_control_points must be greater than zero",
            ))
        } else if self.max_vertices < 2 {
            Err(crate::Error::InvalidCapacity(
                "max_vertices must allow at least one ribbon pair",
            ))
        } else if self.max_vertices > MAX_INDEXABLE_VERTICES {
            Err(crate::Error::InvalidCapacity(
                "max_vertices exceeds what 16-bit indices can address",
            ))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_point_ceiling_is_inclusive() {
        let capacity = Capacity::default();
        let filled = Reservation {
            control_points: 996,
            vertices: 0,
        };
        assert!(capacity.admits(filled, Reservation::for_curve(4, 1)));
        let filled = Reservation {
            control_points: 999,
            vertices: 0,
        };
        assert!(!capacity.admits(filled, Reservation::for_curve(2, 1)));
    }

    #[test]
    fn vertex_ceiling_counts_ribbon_pairs() {
        let capacity = Capacity::default();
        let filled = Reservation {
            control_points: 0,
            vertices: 64_000,
        };
        assert!(capacity.admits(filled, Reservation::for_curve(4, 500)));
        assert!(!capacity.admits(filled, Reservation::for_curve(4, 501)));
    }

    #[test]
    fn oversized_curves_never_fit() {
        let capacity = Capacity::default();
        assert!(capacity.can_hold(Reservation::for_curve(1000, 32_500)));
        assert!(!capacity.can_hold(Reservation::for_curve(1001, 1)));
        assert!(!capacity.can_hold(Reservation::for_curve(4, 32_501)));
    }

    #[test]
    fn huge_requests_saturate() {
        let capacity = Capacity::default();
        let request = Reservation::for_curve(usize::MAX, usize::MAX);
        assert_eq!(request.vertices, usize::MAX);
        assert!(!capacity.can_hold(request));
        let filled = Reservation {
            control_points: 10,
            vertices: 10,
        };
        assert!(!capacity.admits(filled, request));
    }

    #[test]
    fn validation() {
        assert!(Capacity::default().validate().is_ok());
        assert!(Capacity {
            max_control_points: 0,
            max_vertices: 10,
        }
        .validate()
        .is_err());
        assert!(Capacity {
            max_control_points: 10,
            max_vertices: MAX_INDEXABLE_VERTICES + 1,
        }
        .validate()
        .is_err());
    }
}
