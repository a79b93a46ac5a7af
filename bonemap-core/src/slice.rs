//! Access to an ordered stack of 2-D image slices.
//!
//! Slice decoding is a host concern; the core only needs per-slice header
//! geometry and a row-major pixel array. [`SliceSource`] splits listing,
//! header reads and pixel reads so that format uniformity can be checked
//! before any slice is parsed, and so that pixels are only decoded for the
//! slices a mapping run actually keeps.

use crate::error::{Error, Result};

/// Identity of one slice in a source, known before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceEntry {
    /// Source-unique identifier (typically the file name).
    pub id: String,
    /// Format tag (typically the file extension, lower-cased).
    pub format: String,
}

/// Spatial geometry of one slice, from its header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceHeader {
    /// Pixel rows.
    pub rows: usize,
    /// Pixel columns.
    pub cols: usize,
    /// In-plane pixel spacing (dx, dy).
    pub pixel_spacing: (f64, f64),
    /// Position of the first pixel: in-plane origin (x0, y0) and
    /// through-plane coordinate z.
    pub position: (f64, f64, f64),
}

/// Read access to a slice stack.
///
/// Implementations wrap a slice directory or archive. Arrival order carries
/// no spatial meaning; the voxel grid builder sorts by through-plane
/// position.
pub trait SliceSource {
    /// Enumerate slices without decoding anything.
    fn list(&self) -> Result<Vec<SliceEntry>>;

    /// Read one slice's header geometry.
    fn read_header(&self, id: &str) -> Result<SliceHeader>;

    /// Read one slice's intensity samples, row-major `[row][col]`.
    fn read_pixels(&self, id: &str) -> Result<Vec<f64>>;
}

/// In-memory slice stack for tests and synthetic data.
#[derive(Debug, Clone, Default)]
pub struct MemorySliceSource {
    slices: Vec<(SliceEntry, SliceHeader, Vec<f64>)>,
}

impl MemorySliceSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slice with the given identity, geometry and pixels.
    ///
    /// Fails if the pixel count does not match `rows * cols`.
    pub fn push(&mut self, entry: SliceEntry, header: SliceHeader, pixels: Vec<f64>) -> Result<()> {
        if pixels.len() != header.rows * header.cols {
            return Err(Error::Mesh(format!(
                "slice {}: {}x{} header needs {} pixels, got {}",
                entry.id,
                header.rows,
                header.cols,
                header.rows * header.cols,
                pixels.len()
            )));
        }
        self.slices.push((entry, header, pixels));
        Ok(())
    }

    /// Convenience: add a `.dcm`-tagged slice named after its index.
    pub fn push_dicom(&mut self, header: SliceHeader, pixels: Vec<f64>) -> Result<()> {
        let entry = SliceEntry {
            id: format!("slice_{:04}.dcm", self.slices.len()),
            format: "dcm".to_string(),
        };
        self.push(entry, header, pixels)
    }

    fn find(&self, id: &str) -> Result<&(SliceEntry, SliceHeader, Vec<f64>)> {
        self.slices
            .iter()
            .find(|(entry, _, _)| entry.id == id)
            .ok_or_else(|| Error::UnreadableSlice {
                id: id.to_string(),
                reason: "no such slice".to_string(),
            })
    }
}

impl SliceSource for MemorySliceSource {
    fn list(&self) -> Result<Vec<SliceEntry>> {
        Ok(self.slices.iter().map(|(entry, _, _)| entry.clone()).collect())
    }

    fn read_header(&self, id: &str) -> Result<SliceHeader> {
        Ok(self.find(id)?.1)
    }

    fn read_pixels(&self, id: &str) -> Result<Vec<f64>> {
        Ok(self.find(id)?.2.clone())
    }
}
