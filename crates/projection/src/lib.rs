//! Coordinate reference system transformations.
//!
//! Implements the viewport Mercator projection from scratch without external
//! dependencies, including the local distortion tensor used to keep wind
//! vectors visually correct under projection.

pub mod mercator;

pub use mercator::Mercator;
