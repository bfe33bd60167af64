use crate::curve::CurveHandle;

/// All errors that `spline-batcher` can return.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A curve was added without any control points.
    #[error("a curve needs at least one control point")]
    EmptyCurve,
    /// A curve was added with a sample count of zero.
    #[error("a curve needs at least one sample")]
    InvalidSampleCount,
    /// A single curve needs more room than an empty batch provides.
    #[error(
        "curve needs {control_points} control points and {vertices} vertices, which exceeds the capacity of a batch"
    )]
    CurveTooLarge {
        /// The number of control points the curve needs.
        control_points: usize,
        /// The number of vertices the curve needs.
        vertices: usize,
    },
    /// The number of values passed to a modification does not match the
    /// number of control points being overwritten.
    #[error("expected {expected} control points but received {actual}")]
    ControlPointCountMismatch {
        /// The number of control points being overwritten.
        expected: usize,
        /// The number of control points received.
        actual: usize,
    },
    /// The handle was not issued by this batcher.
    #[error("unknown curve {0:?}")]
    UnknownCurve(CurveHandle),
    /// The configured capacity is unusable.
    #[error("invalid capacity: {0}")]
    InvalidCapacity(&'static str),
}
