//! Output of mapped integration-point values.
//!
//! The primary product is a plain text listing, one line per integration
//! point, consumable by a downstream solver's field-definition machinery.
//! Persisted host-application result formats are external; the
//! [`FieldVisualizationSink`] trait is the seam they implement.

use crate::error::Result;
use crate::extract::{InstanceGeometry, IntegrationPoint};
use std::io::Write;
use tracing::info;

/// Write mapped results as text, one line per integration point:
/// `instance element ip_num hu`, in pipeline order.
pub fn write_results<W: Write>(points: &[IntegrationPoint], mut writer: W) -> Result<()> {
    for p in points {
        writeln!(
            writer,
            "{} {:7} {:2} {:8.1}",
            p.instance, p.element, p.ip_num, p.hu
        )?;
    }
    info!(points = points.len(), "wrote mapped HU values");
    Ok(())
}

/// Receives per-instance geometry plus one scalar per element for
/// visualization of the mapped field.
///
/// Implementations persist to whatever the host application reads; the core
/// only supplies the tuples.
pub trait FieldVisualizationSink {
    /// Write one instance's geometry and its per-element values
    /// (element label, value at the element's first integration point).
    fn write_instance(
        &mut self,
        geometry: &InstanceGeometry,
        values: &[(u32, f64)],
    ) -> Result<()>;
}

/// Per-element visualization values for one instance: each element's first
/// integration point, in pipeline order.
pub fn first_point_values(points: &[IntegrationPoint], instance: &str) -> Vec<(u32, f64)> {
    points
        .iter()
        .filter(|p| p.instance == instance && p.ip_num == 1)
        .map(|p| (p.element, p.hu))
        .collect()
}
