//! Integration-point extraction from a mesh selection.
//!
//! Walks the selected elements, computes every integration point's physical
//! coordinates from nodal coordinates via the element family's shape
//! function, and records element/point identity for the output stage. Also
//! produces, per instance, the element connectivity re-expressed with
//! absolute node labels; the interpolation itself never needs it, but
//! visualization sinks do.

use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::mesh::{MeshSource, Node, RegionSelector};
use crate::types::{BoundingBox, Point3};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// One integration point of one element, with its sampled value.
///
/// Created with `hu = 0.0`; the sample stage assigns the value exactly
/// once.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationPoint {
    /// Owning part instance.
    pub instance: String,
    /// Element label.
    pub element: u32,
    /// 1-based integration-point number within the element, in the
    /// family's fixed ordering.
    pub ip_num: u32,
    /// Physical coordinates.
    pub coord: Point3,
    /// Mapped HU value.
    pub hu: f64,
}

/// An element with its connectivity re-expressed as node labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledElement {
    /// Element label.
    pub label: u32,
    /// Declared element type.
    pub etype: ElementType,
    /// Node labels in connectivity order.
    pub connectivity: Vec<u32>,
}

/// Geometry of one instance's selected elements, for visualization sinks.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceGeometry {
    /// Instance name.
    pub name: String,
    /// Nodes referenced by the selected elements, sorted by label.
    pub nodes: Vec<Node>,
    /// Selected elements with label connectivity.
    pub elements: Vec<LabeledElement>,
}

/// Result of the extraction stage.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// One record per (element, local integration point), in element
    /// listing order.
    pub points: Vec<IntegrationPoint>,
    /// Bounding box over all integration-point coordinates.
    pub bbox: BoundingBox,
    /// Per-instance geometry byproduct.
    pub geometry: Vec<InstanceGeometry>,
}

/// Extract integration points for a mesh region.
///
/// Element types are validated in one pass before any geometry is computed:
/// if the selection contains unsupported types, the error lists all of them
/// and no integration points are produced for any element.
pub fn extract_integration_points(
    mesh: &dyn MeshSource,
    region: &RegionSelector,
) -> Result<Extraction> {
    let elements = mesh.list_elements(region)?;
    if elements.is_empty() {
        return Err(Error::EmptySelection(region.to_string()));
    }

    let unsupported: BTreeSet<&str> = elements
        .iter()
        .filter(|e| !e.etype.is_supported())
        .map(|e| e.etype.name())
        .collect();
    if !unsupported.is_empty() {
        return Err(Error::UnsupportedElementType {
            types: unsupported.into_iter().map(str::to_string).collect(),
        });
    }

    // Node arrays fetched once per instance.
    let mut instance_nodes: BTreeMap<String, Vec<Node>> = BTreeMap::new();
    for element in &elements {
        if !instance_nodes.contains_key(&element.instance) {
            let nodes = mesh.list_nodes(&element.instance)?;
            instance_nodes.insert(element.instance.clone(), nodes);
        }
    }

    let mut points = Vec::new();
    let mut referenced: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    let mut labeled: BTreeMap<String, Vec<LabeledElement>> = BTreeMap::new();

    for element in &elements {
        let nodes = &instance_nodes[&element.instance];
        let desc = element.etype.descriptor().expect("validated above");

        if element.connectivity.len() != desc.num_nodes {
            return Err(Error::Mesh(format!(
                "element {} declares {} but has {} connectivity entries",
                element.label,
                element.etype,
                element.connectivity.len()
            )));
        }

        let mut coords = Vec::with_capacity(desc.num_nodes);
        let mut labels = Vec::with_capacity(desc.num_nodes);
        for &idx in &element.connectivity {
            let node = nodes.get(idx).ok_or_else(|| {
                Error::Mesh(format!(
                    "element {} references node index {} beyond instance '{}' ({} nodes)",
                    element.label,
                    idx,
                    element.instance,
                    nodes.len()
                ))
            })?;
            coords.push(node.coord);
            labels.push(node.label);
        }

        for (i, coord) in desc.integration_point_coords(&coords).into_iter().enumerate() {
            points.push(IntegrationPoint {
                instance: element.instance.clone(),
                element: element.label,
                ip_num: (i + 1) as u32,
                coord,
                hu: 0.0,
            });
        }

        referenced
            .entry(element.instance.clone())
            .or_default()
            .extend(element.connectivity.iter().copied());
        labeled
            .entry(element.instance.clone())
            .or_default()
            .push(LabeledElement {
                label: element.label,
                etype: element.etype,
                connectivity: labels,
            });
    }

    let geometry = labeled
        .into_iter()
        .map(|(name, elements)| {
            let mut nodes: Vec<Node> = referenced[&name]
                .iter()
                .map(|&idx| instance_nodes[&name][idx])
                .collect();
            nodes.sort_by_key(|n| n.label);
            InstanceGeometry {
                name,
                nodes,
                elements,
            }
        })
        .collect();

    let bbox = BoundingBox::from_points(points.iter().map(|p| &p.coord))
        .expect("selection is non-empty");

    debug!(
        elements = elements.len(),
        points = points.len(),
        "extracted integration points"
    );

    Ok(Extraction {
        points,
        bbox,
        geometry,
    })
}
