//! Element types and shape-function dispatch.
//!
//! The element families differ only in constant tables (node count,
//! integration-point locations) and one of two weight formulas, so dispatch
//! is a flat lookup keyed by [`ElementType`] rather than a trait hierarchy:
//! [`ElementType::descriptor`] returns a static [`ElementDescriptor`]
//! holding the family's tables, or `None` for types the mapper does not
//! support.
//!
//! # Submodules
//!
//! - [`quadrature`] - Integration-point location tables
//! - [`tet4`] - Linear tetrahedron shape function
//! - [`tet10`] - Quadratic tetrahedron shape function

use crate::types::Point3;
use nalgebra::DMatrix;
use std::fmt;

pub mod quadrature;
pub mod tet4;
pub mod tet10;

/// Element types a host mesh may declare.
///
/// The mapper supports the tetrahedral family. Hybrid variants (`*H`) use
/// the same integration rule as their parent type but are tagged separately
/// because host meshes declare them separately. The remaining types are
/// representable so that a selection containing them can be rejected with a
/// precise report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 4-node tetrahedron (linear).
    Tet4,
    /// 4-node tetrahedron, hybrid formulation.
    Tet4H,
    /// 10-node tetrahedron (quadratic), standard integration.
    Tet10,
    /// 10-node tetrahedron, hybrid formulation.
    Tet10H,
    /// 10-node tetrahedron, modified integration.
    Tet10M,
    /// 10-node tetrahedron, modified hybrid formulation.
    Tet10MH,
    /// 10-node tetrahedron, surface-stress formulation (nodal sampling).
    Tet10S,
    /// 8-node hexahedron. Not supported by the mapper.
    Hex8,
    /// 20-node hexahedron. Not supported by the mapper.
    Hex20,
    /// 6-node wedge. Not supported by the mapper.
    Wedge6,
}

impl ElementType {
    /// Number of nodes for this element type.
    pub fn num_nodes(self) -> usize {
        match self {
            ElementType::Tet4 | ElementType::Tet4H => 4,
            ElementType::Tet10
            | ElementType::Tet10H
            | ElementType::Tet10M
            | ElementType::Tet10MH
            | ElementType::Tet10S => 10,
            ElementType::Hex8 => 8,
            ElementType::Hex20 => 20,
            ElementType::Wedge6 => 6,
        }
    }

    /// Type name as reported in selections and error messages.
    pub fn name(self) -> &'static str {
        match self {
            ElementType::Tet4 => "TET4",
            ElementType::Tet4H => "TET4H",
            ElementType::Tet10 => "TET10",
            ElementType::Tet10H => "TET10H",
            ElementType::Tet10M => "TET10M",
            ElementType::Tet10MH => "TET10MH",
            ElementType::Tet10S => "TET10S",
            ElementType::Hex8 => "HEX8",
            ElementType::Hex20 => "HEX20",
            ElementType::Wedge6 => "WEDGE6",
        }
    }

    /// Shape-function descriptor for this type, or `None` if the mapper
    /// does not support it.
    pub fn descriptor(self) -> Option<&'static ElementDescriptor> {
        match self {
            ElementType::Tet4 => Some(&TET4),
            ElementType::Tet4H => Some(&TET4H),
            ElementType::Tet10 => Some(&TET10),
            ElementType::Tet10H => Some(&TET10H),
            ElementType::Tet10M => Some(&TET10M),
            ElementType::Tet10MH => Some(&TET10MH),
            ElementType::Tet10S => Some(&TET10S),
            ElementType::Hex8 | ElementType::Hex20 | ElementType::Wedge6 => None,
        }
    }

    /// Whether the mapper can compute integration points for this type.
    pub fn is_supported(self) -> bool {
        self.descriptor().is_some()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Static description of one supported element family.
///
/// Created once at process start; every field is a constant table. The
/// descriptor is the only route from an element type to an integration
/// rule, which keeps the standard/modified rule distinction explicit.
pub struct ElementDescriptor {
    /// Family name.
    pub name: &'static str,
    /// Number of nodes.
    pub num_nodes: usize,
    /// Number of integration points.
    pub num_int_pts: usize,
    /// Isoparametric (g, h, r) location of each integration point, in the
    /// family's fixed 1-based numbering order.
    pub int_pt_coords: &'static [[f64; 3]],
    /// Shape-function weight vector at an isoparametric location.
    shape: fn(f64, f64, f64) -> Vec<f64>,
}

impl ElementDescriptor {
    /// Shape-function weights at an arbitrary isoparametric location.
    pub fn shape_weights(&self, g: f64, h: f64, r: f64) -> Vec<f64> {
        (self.shape)(g, h, r)
    }

    /// Weight matrix evaluated at the integration points.
    ///
    /// One row per integration point, one column per node.
    pub fn weights_at_int_pts(&self) -> DMatrix<f64> {
        let mut w = DMatrix::zeros(self.num_int_pts, self.num_nodes);
        for (i, &[g, h, r]) in self.int_pt_coords.iter().enumerate() {
            let n = self.shape_weights(g, h, r);
            for (j, &nj) in n.iter().enumerate() {
                w[(i, j)] = nj;
            }
        }
        w
    }

    /// Physical coordinates of the integration points from nodal
    /// coordinates: weight matrix times node-coordinate matrix.
    ///
    /// Output order matches the family's fixed integration-point numbering.
    /// Pure; no side effects.
    pub fn integration_point_coords(&self, coords: &[Point3]) -> Vec<Point3> {
        assert_eq!(
            coords.len(),
            self.num_nodes,
            "{} requires exactly {} nodal coordinates",
            self.name,
            self.num_nodes
        );

        let w = self.weights_at_int_pts();
        let c = DMatrix::from_fn(self.num_nodes, 3, |i, j| coords[i][j]);
        let ip = w * c;

        (0..self.num_int_pts)
            .map(|i| Point3::new(ip[(i, 0)], ip[(i, 1)], ip[(i, 2)]))
            .collect()
    }
}

static TET4: ElementDescriptor = ElementDescriptor {
    name: "TET4",
    num_nodes: 4,
    num_int_pts: 1,
    int_pt_coords: &quadrature::TET_CENTROID,
    shape: tet4::shape_dyn,
};

static TET4H: ElementDescriptor = ElementDescriptor {
    name: "TET4H",
    num_nodes: 4,
    num_int_pts: 1,
    int_pt_coords: &quadrature::TET_CENTROID,
    shape: tet4::shape_dyn,
};

static TET10: ElementDescriptor = ElementDescriptor {
    name: "TET10",
    num_nodes: 10,
    num_int_pts: 4,
    int_pt_coords: &quadrature::TET10_STANDARD,
    shape: tet10::shape_dyn,
};

static TET10H: ElementDescriptor = ElementDescriptor {
    name: "TET10H",
    num_nodes: 10,
    num_int_pts: 4,
    int_pt_coords: &quadrature::TET10_STANDARD,
    shape: tet10::shape_dyn,
};

static TET10M: ElementDescriptor = ElementDescriptor {
    name: "TET10M",
    num_nodes: 10,
    num_int_pts: 4,
    int_pt_coords: &quadrature::TET10_MODIFIED,
    shape: tet10::shape_dyn,
};

static TET10MH: ElementDescriptor = ElementDescriptor {
    name: "TET10MH",
    num_nodes: 10,
    num_int_pts: 4,
    int_pt_coords: &quadrature::TET10_MODIFIED,
    shape: tet10::shape_dyn,
};

static TET10S: ElementDescriptor = ElementDescriptor {
    name: "TET10S",
    num_nodes: 10,
    num_int_pts: 11,
    int_pt_coords: &quadrature::TET10_NODAL,
    shape: tet10::shape_dyn,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Regular tet4 vertex coordinates.
    fn unit_tet4() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]
    }

    /// Unit tet10: vertices plus straight-edge midpoints.
    fn unit_tet10() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.0, 0.5, 0.0),
            Point3::new(0.0, 0.0, 0.5),
            Point3::new(0.5, 0.0, 0.5),
            Point3::new(0.0, 0.5, 0.5),
        ]
    }

    #[test]
    fn test_every_supported_type_has_consistent_descriptor() {
        let supported = [
            ElementType::Tet4,
            ElementType::Tet4H,
            ElementType::Tet10,
            ElementType::Tet10H,
            ElementType::Tet10M,
            ElementType::Tet10MH,
            ElementType::Tet10S,
        ];

        for etype in supported {
            let desc = etype.descriptor().unwrap();
            assert_eq!(desc.num_nodes, etype.num_nodes());
            assert_eq!(desc.int_pt_coords.len(), desc.num_int_pts);
        }
    }

    #[test]
    fn test_unsupported_types_have_no_descriptor() {
        assert!(ElementType::Hex8.descriptor().is_none());
        assert!(ElementType::Hex20.descriptor().is_none());
        assert!(ElementType::Wedge6.descriptor().is_none());
    }

    #[test]
    fn test_weights_sum_to_one_at_every_integration_point() {
        // Affine invariance: each weight row must sum to exactly 1.
        let supported = [
            ElementType::Tet4,
            ElementType::Tet10,
            ElementType::Tet10M,
            ElementType::Tet10S,
        ];

        for etype in supported {
            let desc = etype.descriptor().unwrap();
            let w = desc.weights_at_int_pts();
            for i in 0..desc.num_int_pts {
                let sum: f64 = (0..desc.num_nodes).map(|j| w[(i, j)]).sum();
                assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_tet4_integration_point_is_centroid() {
        // The single point of a linear tet is the average of its vertices.
        let coords = unit_tet4();
        let desc = ElementType::Tet4.descriptor().unwrap();

        let ips = desc.integration_point_coords(&coords);
        assert_eq!(ips.len(), 1);

        let centroid = (coords[0] + coords[1] + coords[2] + coords[3]) / 4.0;
        assert_relative_eq!(ips[0][0], centroid[0], epsilon = 1e-14);
        assert_relative_eq!(ips[0][1], centroid[1], epsilon = 1e-14);
        assert_relative_eq!(ips[0][2], centroid[2], epsilon = 1e-14);
    }

    #[test]
    fn test_tet10_integration_point_count() {
        let coords = unit_tet10();

        let ips = ElementType::Tet10
            .descriptor()
            .unwrap()
            .integration_point_coords(&coords);
        assert_eq!(ips.len(), 4);

        let ips = ElementType::Tet10S
            .descriptor()
            .unwrap()
            .integration_point_coords(&coords);
        assert_eq!(ips.len(), 11);
    }

    #[test]
    fn test_standard_and_modified_rules_give_different_points() {
        // Same nodes, different rule: coordinates must differ. Guards
        // against one rule's table being silently substituted.
        let coords = unit_tet10();

        let std_ips = ElementType::Tet10
            .descriptor()
            .unwrap()
            .integration_point_coords(&coords);
        let mod_ips = ElementType::Tet10M
            .descriptor()
            .unwrap()
            .integration_point_coords(&coords);

        for (a, b) in std_ips.iter().zip(mod_ips.iter()) {
            assert!((a - b).norm() > 1e-3);
        }
    }

    #[test]
    fn test_tet10s_points_land_on_nodes_and_centroid() {
        // Straight-edged element: nodal sampling reproduces the node
        // coordinates themselves.
        let coords = unit_tet10();
        let ips = ElementType::Tet10S
            .descriptor()
            .unwrap()
            .integration_point_coords(&coords);

        for (ip, node) in ips.iter().take(10).zip(coords.iter()) {
            assert_relative_eq!((ip - node).norm(), 0.0, epsilon = 1e-12);
        }

        let centroid = (coords[0] + coords[1] + coords[2] + coords[3]) / 4.0;
        assert_relative_eq!((ips[10] - centroid).norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_hybrid_types_share_parent_rule() {
        let tet10 = ElementType::Tet10.descriptor().unwrap();
        let tet10h = ElementType::Tet10H.descriptor().unwrap();
        assert_eq!(tet10.int_pt_coords, tet10h.int_pt_coords);

        let tet10m = ElementType::Tet10M.descriptor().unwrap();
        let tet10mh = ElementType::Tet10MH.descriptor().unwrap();
        assert_eq!(tet10m.int_pt_coords, tet10mh.int_pt_coords);

        let tet4 = ElementType::Tet4.descriptor().unwrap();
        let tet4h = ElementType::Tet4H.descriptor().unwrap();
        assert_eq!(tet4.int_pt_coords, tet4h.int_pt_coords);
    }

    #[test]
    #[should_panic(expected = "requires exactly 10 nodal coordinates")]
    fn test_wrong_node_count_panics() {
        let coords = unit_tet4();
        ElementType::Tet10
            .descriptor()
            .unwrap()
            .integration_point_coords(&coords);
    }
}
