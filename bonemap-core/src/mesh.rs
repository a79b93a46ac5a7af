//! Mesh data structures and host-mesh access.
//!
//! Nodes and elements are labeled, as host applications label them, and
//! grouped into named part instances. Selections are expressed as region
//! strings: `"Instance.SetName"` for an instance-scoped element set,
//! `"Instance.ALL"` for every element of an instance, and a bare name for
//! an assembly-scoped set.
//!
//! [`MeshSource`] is the seam to the host application's model; the mapper
//! itself only ever sees [`Node`] and [`Element`] records. [`MeshModel`] is
//! an in-memory implementation used by tests and by callers that already
//! hold the mesh.

use crate::element::ElementType;
use crate::error::{Error, Result};
use crate::types::Point3;
use std::collections::BTreeMap;
use std::fmt;

/// A labeled mesh node.
///
/// Immutable once read from the host model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Host-assigned label, unique within an instance.
    pub label: u32,
    /// Physical coordinates.
    pub coord: Point3,
}

/// A labeled mesh element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Host-assigned label, unique within an instance.
    pub label: u32,
    /// Declared element type.
    pub etype: ElementType,
    /// Owning part instance.
    pub instance: String,
    /// 0-based node indices into the owning instance's node array. Order is
    /// significant: it must match the node ordering assumed by the type's
    /// shape function.
    pub connectivity: Vec<usize>,
}

/// A parsed region selection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSelector {
    /// Every element of one instance (`"Instance.ALL"`).
    Instance(String),
    /// A named element set scoped to one instance (`"Instance.SetName"`).
    InstanceSet {
        /// Instance name.
        instance: String,
        /// Set name within the instance.
        set: String,
    },
    /// A named element set scoped to the whole assembly (bare set name).
    AssemblySet(String),
}

impl RegionSelector {
    /// Parse a region string.
    ///
    /// `"Femur.ALL"` selects the whole `Femur` instance, `"Femur.Bone"`
    /// the instance set `Bone`, and `"Bone"` the assembly set `Bone`.
    pub fn parse(region: &str) -> Self {
        match region.split_once('.') {
            Some((instance, "ALL")) => RegionSelector::Instance(instance.to_string()),
            Some((instance, set)) => RegionSelector::InstanceSet {
                instance: instance.to_string(),
                set: set.to_string(),
            },
            None => RegionSelector::AssemblySet(region.to_string()),
        }
    }
}

impl fmt::Display for RegionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionSelector::Instance(instance) => write!(f, "{instance}.ALL"),
            RegionSelector::InstanceSet { instance, set } => write!(f, "{instance}.{set}"),
            RegionSelector::AssemblySet(set) => f.write_str(set),
        }
    }
}

/// Read access to a host application's mesh.
///
/// Implementations bridge to whatever holds the model; the core only needs
/// these two listings.
pub trait MeshSource {
    /// All nodes of one instance, in index order (element connectivity
    /// refers to positions in this sequence).
    fn list_nodes(&self, instance: &str) -> Result<Vec<Node>>;

    /// All elements selected by a region, with type, label, instance and
    /// ordered connectivity.
    fn list_elements(&self, region: &RegionSelector) -> Result<Vec<Element>>;
}

#[derive(Debug, Clone, Default)]
struct InstanceMesh {
    nodes: Vec<Node>,
    elements: Vec<Element>,
    sets: BTreeMap<String, Vec<u32>>,
}

/// In-memory finite element model.
///
/// Validates element connectivity at construction so that downstream code
/// can index nodes without rechecking.
#[derive(Debug, Clone, Default)]
pub struct MeshModel {
    instances: BTreeMap<String, InstanceMesh>,
    assembly_sets: BTreeMap<String, Vec<(String, u32)>>,
}

impl MeshModel {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty part instance.
    pub fn add_instance(&mut self, name: &str) {
        self.instances.entry(name.to_string()).or_default();
    }

    /// Add a node to an instance, returning its 0-based index.
    pub fn add_node(&mut self, instance: &str, label: u32, coord: Point3) -> Result<usize> {
        let inst = self
            .instances
            .get_mut(instance)
            .ok_or_else(|| Error::Mesh(format!("unknown instance '{instance}'")))?;
        let idx = inst.nodes.len();
        inst.nodes.push(Node { label, coord });
        Ok(idx)
    }

    /// Add an element to an instance.
    ///
    /// Fails if the connectivity length does not match the declared type or
    /// any node index is out of range.
    pub fn add_element(
        &mut self,
        instance: &str,
        label: u32,
        etype: ElementType,
        connectivity: Vec<usize>,
    ) -> Result<()> {
        let inst = self
            .instances
            .get_mut(instance)
            .ok_or_else(|| Error::Mesh(format!("unknown instance '{instance}'")))?;

        if connectivity.len() != etype.num_nodes() {
            return Err(Error::Mesh(format!(
                "element type {} requires {} nodes, got {}",
                etype,
                etype.num_nodes(),
                connectivity.len()
            )));
        }

        for &node_idx in &connectivity {
            if node_idx >= inst.nodes.len() {
                return Err(Error::Mesh(format!(
                    "node index {} out of bounds (instance '{}' has {} nodes)",
                    node_idx,
                    instance,
                    inst.nodes.len()
                )));
            }
        }

        inst.elements.push(Element {
            label,
            etype,
            instance: instance.to_string(),
            connectivity,
        });
        Ok(())
    }

    /// Define an instance-scoped element set by element labels.
    pub fn add_instance_set(&mut self, instance: &str, set: &str, labels: Vec<u32>) -> Result<()> {
        let inst = self
            .instances
            .get_mut(instance)
            .ok_or_else(|| Error::Mesh(format!("unknown instance '{instance}'")))?;
        inst.sets.insert(set.to_string(), labels);
        Ok(())
    }

    /// Define an assembly-scoped element set by (instance, element label)
    /// pairs.
    pub fn add_assembly_set(&mut self, set: &str, members: Vec<(String, u32)>) {
        self.assembly_sets.insert(set.to_string(), members);
    }

    /// Number of nodes in one instance.
    pub fn num_nodes(&self, instance: &str) -> usize {
        self.instances.get(instance).map_or(0, |i| i.nodes.len())
    }

    /// Number of elements in one instance.
    pub fn num_elements(&self, instance: &str) -> usize {
        self.instances.get(instance).map_or(0, |i| i.elements.len())
    }

    fn instance(&self, name: &str) -> Result<&InstanceMesh> {
        self.instances
            .get(name)
            .ok_or_else(|| Error::Mesh(format!("unknown instance '{name}'")))
    }

    fn elements_by_labels(&self, instance: &str, labels: &[u32]) -> Result<Vec<Element>> {
        let inst = self.instance(instance)?;
        labels
            .iter()
            .map(|&label| {
                inst.elements
                    .iter()
                    .find(|e| e.label == label)
                    .cloned()
                    .ok_or_else(|| {
                        Error::Mesh(format!(
                            "element label {label} not found in instance '{instance}'"
                        ))
                    })
            })
            .collect()
    }
}

impl MeshSource for MeshModel {
    fn list_nodes(&self, instance: &str) -> Result<Vec<Node>> {
        Ok(self.instance(instance)?.nodes.clone())
    }

    fn list_elements(&self, region: &RegionSelector) -> Result<Vec<Element>> {
        match region {
            RegionSelector::Instance(instance) => {
                Ok(self.instance(instance)?.elements.clone())
            }
            RegionSelector::InstanceSet { instance, set } => {
                let labels = self
                    .instance(instance)?
                    .sets
                    .get(set)
                    .ok_or_else(|| {
                        Error::Mesh(format!("unknown set '{set}' in instance '{instance}'"))
                    })?
                    .clone();
                self.elements_by_labels(instance, &labels)
            }
            RegionSelector::AssemblySet(set) => {
                let members = self
                    .assembly_sets
                    .get(set)
                    .ok_or_else(|| Error::Mesh(format!("unknown assembly set '{set}'")))?
                    .clone();
                members
                    .iter()
                    .map(|(instance, label)| {
                        Ok(self.elements_by_labels(instance, &[*label])?.remove(0))
                    })
                    .collect()
            }
        }
    }
}
