/// A unit-less coordinate space.
pub type Unknown = euclid::UnknownUnit;

/// A type representing an x and y coordinate.
pub type Point<T = f32, Unit = Unknown> = euclid::Point2D<T, Unit>;
