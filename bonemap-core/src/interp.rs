//! Trilinear interpolation over a voxel grid.
//!
//! Composes the grid's per-axis bracket lookup with the 8-corner unit-cube
//! shape function. Interpolation is linear per axis, all arithmetic is f64,
//! and source values are never clamped (HU is negative for soft tissue and
//! air). Points outside the sampled extent are errors; there is no
//! extrapolation.

use crate::error::Result;
use crate::types::Point3;
use crate::voxel::{Axis, VoxelGrid};

/// Evaluates the voxel field at arbitrary points.
#[derive(Debug, Clone, Copy)]
pub struct TrilinearSampler<'a> {
    grid: &'a VoxelGrid,
}

impl<'a> TrilinearSampler<'a> {
    /// Create a sampler over a grid.
    pub fn new(grid: &'a VoxelGrid) -> Self {
        Self { grid }
    }

    /// Weights of the 8-corner unit-cube shape function at local (t, u, v).
    ///
    /// Corner order is (lo,lo,lo), (hi,lo,lo), (lo,hi,lo), (hi,hi,lo),
    /// (lo,lo,hi), (hi,lo,hi), (lo,hi,hi), (hi,hi,hi). The gather in
    /// [`sample`](Self::sample) must use exactly this order: any other
    /// permutation still sums to one and produces a plausible-looking but
    /// wrong value.
    fn corner_weights(t: f64, u: f64, v: f64) -> [f64; 8] {
        [
            (1.0 - t) * (1.0 - u) * (1.0 - v),
            t * (1.0 - u) * (1.0 - v),
            (1.0 - t) * u * (1.0 - v),
            t * u * (1.0 - v),
            (1.0 - t) * (1.0 - u) * v,
            t * (1.0 - u) * v,
            (1.0 - t) * u * v,
            t * u * v,
        ]
    }

    /// Interpolate the field at a point.
    ///
    /// Brackets each axis, gathers the 8 surrounding samples and returns
    /// their weighted sum. Fails with `OutOfBounds` if the point lies
    /// beyond the sampled extent on any axis.
    pub fn sample(&self, p: &Point3) -> Result<f64> {
        let (xl, xh, t) = self.grid.bracket(Axis::X, p[0])?;
        let (yl, yh, u) = self.grid.bracket(Axis::Y, p[1])?;
        let (zl, zh, v) = self.grid.bracket(Axis::Z, p[2])?;

        let n = Self::corner_weights(t, u, v);
        // Same corner order as the weights above.
        let f = [
            self.grid.value(xl, yl, zl),
            self.grid.value(xh, yl, zl),
            self.grid.value(xl, yh, zl),
            self.grid.value(xh, yh, zl),
            self.grid.value(xl, yl, zh),
            self.grid.value(xh, yl, zh),
            self.grid.value(xl, yh, zh),
            self.grid.value(xh, yh, zh),
        ];

        Ok(n.iter().zip(f.iter()).map(|(ni, fi)| ni * fi).sum())
    }
}
