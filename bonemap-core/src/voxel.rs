//! Voxel grid assembly from a slice stack.
//!
//! The grid owns the sampled scalar field plus three strictly increasing
//! coordinate axes, and exposes the per-axis bracket lookup the trilinear
//! sampler composes. Built once per run, read-only afterward.
//!
//! Axis conventions: a slice's native pixel array is `[row][col]`, which is
//! `[y][x]` spatially. The assembled field is indexed `[x][y][z]` consistent
//! with the axes, so assembly transposes in-plane indices. Getting that swap
//! wrong produces spatially transposed interpolation with no error, which is
//! why it has a dedicated test.

use crate::error::{Error, Result};
use crate::slice::SliceSource;
use crate::types::{BoundingBox, Point3};
use std::collections::BTreeSet;
use tracing::info;

/// A coordinate axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// In-plane column direction.
    X,
    /// In-plane row direction.
    Y,
    /// Through-plane direction.
    Z,
}

/// Scalar field sampled on a regular orthogonal lattice.
///
/// Sample coordinates are pixel centers: the axis values are the sample
/// positions themselves, not cell boundaries. Spacing may be non-uniform
/// along z (slice positions are taken as-is); only strict monotonicity is
/// required.
#[derive(Debug, Clone)]
pub struct VoxelGrid {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    /// Flattened `[xi][yi][zi]`, zi fastest.
    field: Vec<f64>,
}

impl VoxelGrid {
    /// Create a grid from axes and a flattened `[xi][yi][zi]` field.
    ///
    /// Each axis must be strictly increasing with at least two samples, and
    /// the field length must equal the product of the axis lengths.
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, field: Vec<f64>) -> Result<Self> {
        for (name, axis) in [("x", &x), ("y", &y), ("z", &z)] {
            if axis.len() < 2 {
                return Err(Error::Mesh(format!(
                    "{name} axis needs at least two samples, got {}",
                    axis.len()
                )));
            }
            if axis.windows(2).any(|w| w[0] >= w[1]) {
                return Err(Error::Mesh(format!(
                    "{name} axis is not strictly increasing"
                )));
            }
        }

        let expected = x.len() * y.len() * z.len();
        if field.len() != expected {
            return Err(Error::Mesh(format!(
                "field size mismatch: axes {}x{}x{} need {} samples, got {}",
                x.len(),
                y.len(),
                z.len(),
                expected,
                field.len()
            )));
        }

        Ok(Self { x, y, z, field })
    }

    /// Build a grid from a slice stack.
    ///
    /// Slices are sorted by through-plane position; arrival order carries no
    /// spatial meaning. Row/column counts, pixel spacing and the in-plane
    /// origin are taken from the lowest-z slice and assumed uniform for the
    /// whole stack (accepted simplification; later slices are only checked
    /// for pixel count). `reset_origin` zeroes the in-plane origin so the
    /// slice frame starts at (0,0). When `cull` is given, only slices from
    /// one below its z-range to one above are loaded.
    pub fn from_slices(
        source: &dyn SliceSource,
        reset_origin: bool,
        cull: Option<&BoundingBox>,
    ) -> Result<Self> {
        let entries = source.list()?;
        if entries.is_empty() {
            return Err(Error::Mesh("slice source contains no slices".to_string()));
        }

        // Format uniformity is decided from the listing alone, before any
        // slice is parsed.
        let formats: BTreeSet<&str> = entries.iter().map(|e| e.format.as_str()).collect();
        if formats.len() > 1 {
            return Err(Error::HeterogeneousSliceFormat {
                formats: formats.into_iter().map(str::to_string).collect(),
            });
        }

        let mut slices = Vec::with_capacity(entries.len());
        for entry in &entries {
            let header = source.read_header(&entry.id)?;
            slices.push((header.position.2, entry.id.clone(), header));
        }
        slices.sort_by(|a, b| a.0.total_cmp(&b.0));

        if slices.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::Mesh(
                "slice stack contains duplicate through-plane positions".to_string(),
            ));
        }

        // Geometry from the lowest-z slice.
        let first = slices[0].2;
        let (rows, cols) = (first.rows, first.cols);
        let (dx, dy) = first.pixel_spacing;
        let (mut x0, mut y0, _) = first.position;
        if reset_origin {
            x0 = 0.0;
            y0 = 0.0;
        }
        if dx <= 0.0 || dy <= 0.0 {
            return Err(Error::Mesh(format!(
                "pixel spacing must be positive, got ({dx}, {dy})"
            )));
        }

        // Keep only the slices bracketing the needed z-range.
        if let Some(bbox) = cull {
            let zs: Vec<f64> = slices.iter().map(|s| s.0).collect();
            let lo = zs.partition_point(|&z| z < bbox.min.z).saturating_sub(1);
            let hi = (zs.partition_point(|&z| z < bbox.max.z) + 1).min(slices.len());
            slices.truncate(hi);
            slices.drain(..lo);
        }

        let x: Vec<f64> = (0..cols).map(|i| x0 + i as f64 * dx).collect();
        let y: Vec<f64> = (0..rows).map(|j| y0 + j as f64 * dy).collect();
        let z: Vec<f64> = slices.iter().map(|s| s.0).collect();

        // Assemble [xi][yi][zi] from each slice's native [row][col] = [y][x].
        let (nx, ny, nz) = (cols, rows, slices.len());
        let mut field = vec![0.0; nx * ny * nz];
        for (zi, (_, id, _)) in slices.iter().enumerate() {
            let pixels = source.read_pixels(id)?;
            if pixels.len() != rows * cols {
                return Err(Error::UnreadableSlice {
                    id: id.clone(),
                    reason: format!(
                        "expected {}x{} = {} pixels, got {}",
                        rows,
                        cols,
                        rows * cols,
                        pixels.len()
                    ),
                });
            }
            for yi in 0..ny {
                for xi in 0..nx {
                    field[(xi * ny + yi) * nz + zi] = pixels[yi * cols + xi];
                }
            }
        }

        info!(
            slices = nz,
            z_bottom = z[0],
            z_top = z[nz - 1],
            rows = rows,
            cols = cols,
            pixel_size_x = dx,
            pixel_size_y = dy,
            origin_x = x0,
            origin_y = y0,
            "assembled voxel grid from slice stack"
        );

        Self::new(x, y, z, field)
    }

    /// Grid dimensions (nx, ny, nz).
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.x.len(), self.y.len(), self.z.len())
    }

    /// Sample coordinates along one axis.
    pub fn axis(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Field sample at grid indices.
    pub fn value(&self, xi: usize, yi: usize, zi: usize) -> f64 {
        self.field[(xi * self.y.len() + yi) * self.z.len() + zi]
    }

    /// Sampled extent of the grid.
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox {
            min: Point3::new(self.x[0], self.y[0], self.z[0]),
            max: Point3::new(
                *self.x.last().unwrap(),
                *self.y.last().unwrap(),
                *self.z.last().unwrap(),
            ),
        }
    }

    /// Whether a point lies within the sampled extent, boundary inclusive.
    pub fn contains(&self, p: &Point3) -> bool {
        self.bounds().contains(p)
    }

    /// Bracket a query value on one axis.
    ///
    /// Returns `(lo, hi, t)` where `axis[lo] <= v <= axis[hi]`, `hi = lo+1`,
    /// and `t = (v - axis[lo]) / (axis[hi] - axis[lo])` in [0, 1]. Both
    /// boundary values are accepted: the first cell serves `v == axis[0]`
    /// and the last cell serves `v == axis[len-1]`. Anything beyond either
    /// end is out of bounds; there is no extrapolation.
    pub fn bracket(&self, axis: Axis, v: f64) -> Result<(usize, usize, f64)> {
        let a = self.axis(axis);

        // First index with a[hi] >= v.
        let hi = a.partition_point(|&s| s < v);
        if hi == 0 {
            if v == a[0] {
                return Ok((0, 1, 0.0));
            }
            return Err(Error::OutOfBounds(format!(
                "{v} below {axis:?} axis start {}",
                a[0]
            )));
        }
        if hi == a.len() {
            return Err(Error::OutOfBounds(format!(
                "{v} above {axis:?} axis end {}",
                a[a.len() - 1]
            )));
        }

        let lo = hi - 1;
        let t = (v - a[lo]) / (a[hi] - a[lo]);
        Ok((lo, hi, t))
    }
}
