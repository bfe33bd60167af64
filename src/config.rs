#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

use crate::capacity::Capacity;

/// Settings for a [`SplineBatcher`](crate::SplineBatcher).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Config {
    /// The ceilings applied to every batch.
    pub capacity: Capacity,
    /// The initial ribbon width.
    pub width: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: Capacity::default(),
            width: 0.1,
        }
    }
}

impl Config {
    /// Builder-style function. Sets `capacity.max_control_points` and returns
    /// self.
    #[must_use]
    pub const fn with_max_control_points(mut self, max_control_points: usize) -> Self {
        self.capacity.max_control_points = max_control_points;
        self
    }

    /// Builder-style function. Sets `capacity.max_vertices` and returns self.
    #[must_use]
    pub const fn with_max_vertices(mut self, max_vertices: usize) -> Self {
        self.capacity.max_vertices = max_vertices;
        self
    }

    /// Builder-style function. Sets `width` and returns self.
    #[must_use]
    pub const fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Checks that the capacity can be used to build batches.
    pub fn validate(&self) -> crate::Result<()> {
        self.capacity.validate()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::capacity::{MAX_CONTROL_POINTS, MAX_VERTICES};

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.capacity.max_control_points, MAX_CONTROL_POINTS);
        assert_eq!(config.capacity.max_vertices, MAX_VERTICES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder() {
        let config = Config::default()
            .with_max_control_points(16)
            .with_max_vertices(64)
            .with_width(2.5);
        assert_eq!(config.capacity.max_control_points, 16);
        assert_eq!(config.capacity.max_vertices, 64);
        assert_relative_eq!(config.width, 2.5);
    }

    #[test]
    fn rejects_unusable_capacity() {
        assert!(Config::default()
            .with_max_control_points(0)
            .validate()
            .is_err());
        assert!(Config::default().with_max_vertices(1).validate().is_err());
        assert!(Config::default()
            .with_max_vertices(70_000)
            .validate()
            .is_err());
    }
}
