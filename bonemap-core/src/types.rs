//! Core data types for the HU mapping engine.
//!
//! This module defines fundamental types used throughout bonemap:
//! - Geometric primitives (points)
//! - Axis-aligned bounding boxes

use nalgebra::Vector3;

/// A point in 3D space.
pub type Point3 = Vector3<f64>;

/// Axis-aligned bounding box.
///
/// Bounds the integration points of a selection so that bounds validation
/// and slice culling can operate on a single record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl BoundingBox {
    /// Compute the bounding box of a set of points.
    ///
    /// Returns `None` for an empty set.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;

        let mut min = first;
        let mut max = first;

        for p in iter {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some(Self { min, max })
    }

    /// Whether a point lies inside the box, boundary inclusive.
    pub fn contains(&self, p: &Point3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }
}
