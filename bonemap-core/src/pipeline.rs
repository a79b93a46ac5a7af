//! The mapping pipeline.
//!
//! A linear state machine with no branching back:
//! `ExtractGeometry → BuildVoxelGrid → ValidateBounds → Sample → Done`,
//! with `Failed` reachable from any stage. Each stage consumes the prior
//! stage's output; on failure the pipeline halts and reports which stage
//! failed, without attempting partial output.
//!
//! Single-threaded and synchronous throughout: every stage's output is
//! fully computed before the next stage reads it, and the voxel grid and
//! integration-point array are each owned by one stage at a time.

use crate::error::{Error, Result};
use crate::extract::{extract_integration_points, InstanceGeometry, IntegrationPoint};
use crate::interp::TrilinearSampler;
use crate::mesh::{MeshSource, RegionSelector};
use crate::output::{first_point_values, write_results, FieldVisualizationSink};
use crate::slice::SliceSource;
use crate::voxel::VoxelGrid;
use std::fmt;
use std::io::Write;
use thiserror::Error as ThisError;
use tracing::info;

/// Pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Extracting integration points from the mesh.
    ExtractGeometry,
    /// Assembling the voxel grid from the slice stack.
    BuildVoxelGrid,
    /// Checking every integration point against the grid extent.
    ValidateBounds,
    /// Sampling the field at each integration point.
    Sample,
    /// Run completed.
    Done,
    /// Run aborted.
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ExtractGeometry => "extract-geometry",
            Stage::BuildVoxelGrid => "build-voxel-grid",
            Stage::ValidateBounds => "validate-bounds",
            Stage::Sample => "sample",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// A mapping failure, tagged with the stage that raised it.
#[derive(Debug, ThisError)]
#[error("mapping failed during {stage}: {source}")]
pub struct PipelineError {
    /// Stage that failed.
    pub stage: Stage,
    /// Underlying cause.
    #[source]
    pub source: Error,
}

/// Configuration of one mapping run.
#[derive(Debug, Clone)]
pub struct MappingConfig {
    /// Mesh region to map.
    pub region: RegionSelector,
    /// Treat the slice frame as local, ignoring header in-plane origins.
    pub reset_origin: bool,
    /// Load only the slices bracketing the selection's z-range.
    pub cull_slices: bool,
}

impl MappingConfig {
    /// Configuration for a region string with header origins honored and
    /// slice culling on.
    pub fn for_region(region: &str) -> Self {
        Self {
            region: RegionSelector::parse(region),
            reset_origin: false,
            cull_slices: true,
        }
    }
}

/// Product of a completed run.
#[derive(Debug, Clone)]
pub struct MappingOutcome {
    /// Every integration point with its mapped HU value, in extraction
    /// order.
    pub points: Vec<IntegrationPoint>,
    /// Per-instance geometry for visualization sinks.
    pub geometry: Vec<InstanceGeometry>,
}

impl MappingOutcome {
    /// Write the per-point text listing.
    pub fn write_results<W: Write>(&self, writer: W) -> Result<()> {
        write_results(&self.points, writer)
    }

    /// Feed every instance's geometry and first-integration-point values to
    /// a visualization sink.
    pub fn write_visualization(&self, sink: &mut dyn FieldVisualizationSink) -> Result<()> {
        for geometry in &self.geometry {
            let values = first_point_values(&self.points, &geometry.name);
            sink.write_instance(geometry, &values)?;
        }
        Ok(())
    }
}

/// Orchestrates one mapping run.
#[derive(Debug)]
pub struct MappingPipeline {
    stage: Stage,
}

impl MappingPipeline {
    /// Create a pipeline at the first stage.
    pub fn new() -> Self {
        Self {
            stage: Stage::ExtractGeometry,
        }
    }

    /// Current (or final) stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Execute the full pipeline.
    pub fn run(
        &mut self,
        mesh: &dyn MeshSource,
        slices: &dyn SliceSource,
        config: &MappingConfig,
    ) -> std::result::Result<MappingOutcome, PipelineError> {
        self.stage = Stage::ExtractGeometry;
        info!(stage = %self.stage, region = %config.region, "extracting model geometry");
        let extraction = self.check(extract_integration_points(mesh, &config.region))?;

        self.stage = Stage::BuildVoxelGrid;
        info!(stage = %self.stage, "building voxel grid from slice stack");
        let cull = if config.cull_slices {
            Some(&extraction.bbox)
        } else {
            None
        };
        let grid = self.check(VoxelGrid::from_slices(slices, config.reset_origin, cull))?;

        self.stage = Stage::ValidateBounds;
        info!(stage = %self.stage, "validating selection against grid extent");
        // The extraction bbox is componentwise min/max over all points, so
        // containing both corners contains every point.
        let bounds = grid.bounds();
        if !bounds.contains(&extraction.bbox.min) || !bounds.contains(&extraction.bbox.max) {
            return Err(self.fail(Error::OutOfBounds(format!(
                "selection extends to [{:.3}, {:.3}, {:.3}]..[{:.3}, {:.3}, {:.3}] but the \
                 sampled range is [{:.3}, {:.3}, {:.3}]..[{:.3}, {:.3}, {:.3}]; the model may \
                 have been moved from its scanned position",
                extraction.bbox.min[0],
                extraction.bbox.min[1],
                extraction.bbox.min[2],
                extraction.bbox.max[0],
                extraction.bbox.max[1],
                extraction.bbox.max[2],
                bounds.min[0],
                bounds.min[1],
                bounds.min[2],
                bounds.max[0],
                bounds.max[1],
                bounds.max[2],
            ))));
        }

        self.stage = Stage::Sample;
        info!(stage = %self.stage, points = extraction.points.len(), "sampling HU values");
        let sampler = TrilinearSampler::new(&grid);
        let mut points = extraction.points;
        for point in &mut points {
            point.hu = self.check(sampler.sample(&point.coord))?;
        }

        self.stage = Stage::Done;
        info!(stage = %self.stage, "mapping complete");
        Ok(MappingOutcome {
            points,
            geometry: extraction.geometry,
        })
    }

    fn check<T>(&mut self, result: Result<T>) -> std::result::Result<T, PipelineError> {
        result.map_err(|source| self.fail(source))
    }

    fn fail(&mut self, source: Error) -> PipelineError {
        let stage = self.stage;
        self.stage = Stage::Failed;
        PipelineError { stage, source }
    }
}

impl Default for MappingPipeline {
    fn default() -> Self {
        Self::new()
    }
}
