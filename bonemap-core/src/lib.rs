//! bonemap core - CT-to-mesh scalar field mapping
//!
//! Maps a scalar field sampled on a regular 3D voxel grid (a CT scan in
//! Hounsfield Units) onto the integration points of a tetrahedral finite
//! element mesh, producing per-integration-point material input for a
//! downstream solver.
//!
//! # Architecture
//!
//! The engine is designed around these core abstractions:
//!
//! - [`ElementType`] / [`element::ElementDescriptor`]: shape functions and
//!   integration rules per element family
//! - [`MeshSource`]: access to the host application's nodes and elements
//! - [`SliceSource`]: access to the CT slice stack
//! - [`VoxelGrid`] + [`TrilinearSampler`]: the queryable scalar field
//! - [`MappingPipeline`]: the linear extract → build → validate → sample
//!   orchestration
//!
//! # Example
//!
//! ```no_run
//! use bonemap_core::{MappingConfig, MappingPipeline, MeshModel};
//! use bonemap_core::slice::MemorySliceSource;
//!
//! let model = MeshModel::new();
//! let slices = MemorySliceSource::new();
//! // ... populate model and slices from the host application ...
//!
//! let config = MappingConfig::for_region("Femur.ALL");
//! let outcome = MappingPipeline::new().run(&model, &slices, &config)?;
//! outcome.write_results(std::io::stdout())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod element;
pub mod error;
pub mod extract;
pub mod interp;
pub mod mesh;
pub mod output;
pub mod pipeline;
pub mod slice;
pub mod types;
pub mod voxel;

pub use element::ElementType;
pub use error::{Error, Result};
pub use extract::{extract_integration_points, Extraction, IntegrationPoint};
pub use interp::TrilinearSampler;
pub use mesh::{Element, MeshModel, MeshSource, Node, RegionSelector};
pub use output::{write_results, FieldVisualizationSink};
pub use pipeline::{MappingConfig, MappingOutcome, MappingPipeline, PipelineError, Stage};
pub use slice::{SliceHeader, SliceSource};
pub use types::{BoundingBox, Point3};
pub use voxel::{Axis, VoxelGrid};
