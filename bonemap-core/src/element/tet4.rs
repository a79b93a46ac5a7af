//! 4-node tetrahedron (Tet4) shape function.
//!
//! The Tet4 is the simplest 3D solid element:
//! - 4 nodes at vertices
//! - Linear interpolation within the element
//! - Single integration point at the centroid
//!
//! # Shape Functions
//!
//! Linear shape functions in isoparametric coordinates (g, h, r):
//! - N1 = 1 - g - h - r
//! - N2 = g
//! - N3 = h
//! - N4 = r
//!
//! # Node Numbering
//!
//! ```text
//!   Node 1: (0, 0, 0) - vertex at parametric origin
//!   Node 2: (1, 0, 0)
//!   Node 3: (0, 1, 0)
//!   Node 4: (0, 0, 1)
//! ```

/// Evaluate the 4 linear shape functions at isoparametric (g, h, r).
pub fn shape(g: f64, h: f64, r: f64) -> [f64; 4] {
    [1.0 - g - h - r, g, h, r]
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
    fn test_tet4_shape_functions_sum_to_one() {
        let test_points = [
            (0.25, 0.25, 0.25), // centroid
            (0.0, 0.0, 0.0),    // corner 1
            (1.0, 0.0, 0.0),    // corner 2
            (0.1, 0.2, 0.3),    // arbitrary interior
        ];

        for (g, h, r) in test_points {
            let n = shape(g, h, r);
            let sum: f64 = n.iter().sum();
            assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_tet4_shape_functions_at_corners() {
        // At corner nodes, only the corresponding shape function is 1
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
    fn test_tet4_centroid_weights_are_uniform() {
        // At the centroid every node contributes equally, which is what
        // makes the single integration point the average of the 4 nodes.
        let n = shape(0.25, 0.25, 0.25);
        for &val in &n {
            assert_relative_eq!(val, 0.25, epsilon = 1e-14);
        }
    }
}
