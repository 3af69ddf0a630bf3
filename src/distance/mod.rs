//! Distance matrix shared by both echelons.
//!
//! Provides a dense table indexed by global node id.

mod matrix;

pub use matrix::DistanceMatrix;
