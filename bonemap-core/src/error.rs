//! Error types for bonemap operations.

use thiserror::Error;

/// Result type alias using the bonemap Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a mapping run.
///
/// All failures are detected eagerly at stage boundaries and surfaced as a
/// single terminal outcome; no stage commits partial output. Where several
/// inputs can offend at once (element types, slice formats), the full list
/// is collected in one pass so a single rerun can fix everything.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more selected elements use a type outside the supported set.
    #[error("unsupported element type(s) in selection: {}", .types.join(", "))]
    UnsupportedElementType {
        /// Every distinct offending type name, sorted.
        types: Vec<String>,
    },

    /// The slice source mixes more than one file type/format.
    #[error("slice stack mixes formats: {}", .formats.join(", "))]
    HeterogeneousSliceFormat {
        /// Every distinct format found, sorted.
        formats: Vec<String>,
    },

    /// A slice could not be parsed as the expected format.
    #[error("cannot read slice {id}: {reason}")]
    UnreadableSlice {
        /// Identifier of the offending slice (typically a file name).
        id: String,
        /// What went wrong parsing it.
        reason: String,
    },

    /// An integration point lies outside the sampled voxel range.
    #[error("point outside voxel grid bounds: {0}")]
    OutOfBounds(String),

    /// The selected mesh region contains zero elements.
    #[error("region '{0}' contains no elements")]
    EmptySelection(String),

    /// Mesh or slice data is structurally invalid.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// I/O errors (file operations, output writing).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
