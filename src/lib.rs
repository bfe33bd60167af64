//! Batches many independently animated splines into a small number of GPU
//! draw calls.
//!
//! Curves are packed into fixed-capacity batches. Each batch generates a
//! static ribbon mesh exactly once; afterwards only the control point values
//! change, and they reach the GPU as a uniform array that the vertex stage
//! interpolates.

#![forbid(unsafe_code)]
#![warn(
    clippy::cargo,
    missing_docs,
    clippy::nursery,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms,
)]
#![cfg_attr(doc, deny(rustdoc::all))]
#![allow(
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
)]

/// The device binding seam used by the frame updater.
pub mod backend;
/// Batches and the store that owns them.
pub mod batch;
mod batcher;
/// Capacity limits for a single batch.
pub mod capacity;
mod config;
/// The curve registry.
pub mod curve;
mod error;
/// Per-frame uploads and draw submission.
pub mod frame;
/// An `easygpu` backed renderer for batched splines.
pub mod gpu;
/// A backend that records commands instead of talking to a device.
pub mod headless;
/// Math types.
pub mod math;
/// Ribbon topology generation.
pub mod mesh;
#[cfg(test)]
mod tests;

// Re-exports
pub use easygpu;
pub use euclid;

pub use self::{
    batcher::SplineBatcher,
    config::Config,
    error::Error,
};

/// A collection of commonly used exports provided by this crate.
pub mod prelude {
    pub use super::{
        backend::RenderBackend,
        batch::{Batch, BatchId},
        capacity::{Capacity, Reservation, MAX_CONTROL_POINTS, MAX_VERTICES},
        curve::{Curve, CurveHandle},
        frame::{DirtyFlags, FrameStats},
        headless::HeadlessBackend,
        math::Point,
        mesh::{BatchMesh, SampleEncoding, SplineVertex},
        Config, Error, SplineBatcher,
    };
}

/// Alias for [`std::result::Result`] where the error type is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
