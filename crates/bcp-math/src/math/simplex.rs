//! Barycentric projection of the probability simplex onto a triangle.
//!
//! Weights `(a, b, c)` map to an equilateral triangle with base from
//! `(0, 0)` to `(1, 0)` and apex at `(0.5, sqrt(3)/2)`: the first weight pulls
//! towards the left corner, the second towards the right corner, the third
//! towards the apex.

use std::f64::consts::FRAC_PI_6;

pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Height of the unit equilateral triangle.
pub const APEX_Y: f64 = SQRT_3 / 2.0;

/// Triangle corners in drawing order: left, apex, right.
pub const TRIANGLE: [[f64; 2]; 3] = [[0.0, 0.0], [0.5, APEX_Y], [1.0, 0.0]];

/// Project one simplex point.
pub fn project_point(w: [f64; 3]) -> [f64; 2] {
    let [p1, p2, p3] = w.map(|v| v / SQRT_3);
    let x = (p2 - p1) * FRAC_PI_6.cos() + 0.5;
    let y = p3 - (p1 + p2) * FRAC_PI_6.sin() + 1.0 / (2.0 * SQRT_3);
    [x, y]
}

/// Project every row.
pub fn project(rows: &[[f64; 3]]) -> Vec<[f64; 2]> {
    rows.iter().copied().map(project_point).collect()
}

/// Project rows after reordering their columns: output column `k` takes
/// input column `order[k]`.
pub fn project_permuted(rows: &[[f64; 3]], order: [usize; 3]) -> Vec<[f64; 2]> {
    rows.iter()
        .map(|r| project_point([r[order[0]], r[order[1]], r[order[2]]]))
        .collect()
}

/// Image of the simplex centroid.
pub fn centroid() -> [f64; 2] {
    project_point([1.0 / 3.0; 3])
}

/// Whether `p` lies inside (or on the border of) the projected triangle.
pub fn point_in_triangle(p: [f64; 2]) -> bool {
    const EPS: f64 = 1e-12;
    let [a, b, c] = TRIANGLE;
    let d1 = edge_sign(p, a, b);
    let d2 = edge_sign(p, b, c);
    let d3 = edge_sign(p, c, a);
    let has_neg = d1 < -EPS || d2 < -EPS || d3 < -EPS;
    let has_pos = d1 > EPS || d2 > EPS || d3 > EPS;
    !(has_neg && has_pos)
}

fn edge_sign(p: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (p[0] - b[0]) * (a[1] - b[1]) - (a[0] - b[0]) * (p[1] - b[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(p: [f64; 2], q: [f64; 2]) -> bool {
        (p[0] - q[0]).abs() < 1e-12 && (p[1] - q[1]).abs() < 1e-12
    }

    #[test]
    fn vertices_map_to_corners() {
        assert!(close(project_point([1.0, 0.0, 0.0]), [0.0, 0.0]));
        assert!(close(project_point([0.0, 1.0, 0.0]), [1.0, 0.0]));
        assert!(close(project_point([0.0, 0.0, 1.0]), [0.5, APEX_Y]));
    }

    #[test]
    fn centroid_is_triangle_centroid() {
        let expected = [0.5, 1.0 / (2.0 * SQRT_3)];
        assert!(close(centroid(), expected));
        let mean = [
            TRIANGLE.iter().map(|p| p[0]).sum::<f64>() / 3.0,
            TRIANGLE.iter().map(|p| p[1]).sum::<f64>() / 3.0,
        ];
        assert!(close(centroid(), mean));
    }

    #[test]
    fn permutation_moves_rope_to_apex() {
        // (L, ROPE, R) rows; the ternary plot uses order [0, 2, 1].
        let rows = [[0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];
        let pts = project_permuted(&rows, [0, 2, 1]);
        assert!(close(pts[0], [0.5, APEX_Y]));
        assert!(close(pts[1], [1.0, 0.0]));
    }

    #[test]
    fn edge_midpoints() {
        assert!(close(project_point([0.5, 0.5, 0.0]), [0.5, 0.0]));
        assert!(close(project_point([0.5, 0.0, 0.5]), [0.25, APEX_Y / 2.0]));
    }

    #[test]
    fn inside_test() {
        assert!(point_in_triangle(centroid()));
        assert!(point_in_triangle([0.0, 0.0]));
        assert!(point_in_triangle([0.5, 0.0]));
        assert!(!point_in_triangle([0.5, -0.01]));
        assert!(!point_in_triangle([0.1, 0.5]));
        assert!(!point_in_triangle([0.5, 0.9]));
    }
}
