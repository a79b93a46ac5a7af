//! 10-node tetrahedron (Tet10) shape function.
//!
//! The Tet10 is a quadratic 3D solid element with:
//! - 4 nodes at vertices
//! - 6 nodes at edge midpoints
//! - Quadratic interpolation within the element
//!
//! # Shape Functions
//!
//! Quadratic shape functions in isoparametric coordinates (g, h, r) with
//! L0 = 1 - g - h - r:
//! - Corner nodes (1-4): N = L * (2L - 1) for L in {L0, g, h, r}
//! - Mid-edge nodes (5-10): N = 4 * L_i * L_j for the edge's two corners
//!
//! # Node Numbering
//!
//! ```text
//! Vertices:
//!   Node 1: (0, 0, 0) - vertex at parametric origin
//!   Node 2: (1, 0, 0)
//!   Node 3: (0, 1, 0)
//!   Node 4: (0, 0, 1)
//!
//! Edge midpoints:
//!   Node 5:  midpoint of edge 1-2 = (0.5, 0.0, 0.0)
//!   Node 6:  midpoint of edge 2-3 = (0.5, 0.5, 0.0)
//!   Node 7:  midpoint of edge 1-3 = (0.0, 0.5, 0.0)
//!   Node 8:  midpoint of edge 1-4 = (0.0, 0.0, 0.5)
//!   Node 9:  midpoint of edge 2-4 = (0.5, 0.0, 0.5)
//!   Node 10: midpoint of edge 3-4 = (0.0, 0.5, 0.5)
//! ```
//!
//! All three quadratic integration rules (standard, modified, nodal) share
//! this one weight formula; they differ only in where it is evaluated.

/// Evaluate the 10 quadratic shape functions at isoparametric (g, h, r).
pub fn shape(g: f64, h: f64, r: f64) -> [f64; 10] {
    let l0 = 1.0 - g - h - r;

    // Corner nodes: N = L * (2L - 1)
    let n1 = (2.0 * l0 - 1.0) * l0;
    let n2 = (2.0 * g - 1.0) * g;
    let n3 = (2.0 * h - 1.0) * h;
    let n4 = (2.0 * r - 1.0) * r;

    // Mid-edge nodes: N = 4 * L_i * L_j
    let n5 = 4.0 * l0 * g; // edge 1-2
    let n6 = 4.0 * g * h; // edge 2-3
    let n7 = 4.0 * l0 * h; // edge 1-3
    let n8 = 4.0 * l0 * r; // edge 1-4
    let n9 = 4.0 * g * r; // edge 2-4
    let n10 = 4.0 * h * r; // edge 3-4

    [n1, n2, n3, n4, n5, n6, n7, n8, n9, n10]
}

/// [`shape`] with the return type required by descriptor dispatch.
pub(crate) fn shape_dyn(g: f64, h: f64, r: f64) -> Vec<f64> {
    shape(g, h, r).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tet10_shape_functions_sum_to_one() {
        let test_points = [
            (0.25, 0.25, 0.25),                      // centroid
            (0.0, 0.0, 0.0),                         // corner 1
            (0.5, 0.5, 0.0),                         // mid-edge node 6
            (0.1, 0.2, 0.3),                         // arbitrary interior
            (0.138_196_6, 0.138_196_6, 0.138_196_6), // standard rule point
            (0.177_083_333_3, 0.177_083_333_3, 0.468_75), // modified rule point
        ];

        for (g, h, r) in test_points {
            let n = shape(g, h, r);
            let sum: f64 = n.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_tet10_shape_functions_at_corners() {
        let corners = [
            (0.0, 0.0, 0.0), // node 1
            (1.0, 0.0, 0.0), // node 2
            (0.0, 1.0, 0.0), // node 3
            (0.0, 0.0, 1.0), // node 4
        ];

        for (corner_idx, &(g, h, r)) in corners.iter().enumerate() {
            let n = shape(g, h, r);
            for (i, &val) in n.iter().enumerate() {
                let expected = if i == corner_idx { 1.0 } else { 0.0 };
                assert_relative_eq!(val, expected, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_tet10_shape_functions_at_midside() {
        // At mid-edge node 5 (g=0.5, h=r=0), N5 = 4*0.5*0.5 = 1
        let n = shape(0.5, 0.0, 0.0);
        assert_relative_eq!(n[4], 1.0, epsilon = 1e-14);
        assert_relative_eq!(n[0], 0.0, epsilon = 1e-14); // N1 = 0.5*(2*0.5-1) = 0
        assert_relative_eq!(n[1], 0.0, epsilon = 1e-14);

        // At mid-edge node 6 (g=h=0.5)
        let n = shape(0.5, 0.5, 0.0);
        assert_relative_eq!(n[5], 1.0, epsilon = 1e-14);

        // At mid-edge node 10 (h=r=0.5)
        let n = shape(0.0, 0.5, 0.5);
        assert_relative_eq!(n[9], 1.0, epsilon = 1e-14);
    }
}
