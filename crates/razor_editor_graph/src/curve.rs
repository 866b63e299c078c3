// SPDX-License-Identifier: MIT OR Apache-2.0
//! Link curve sampling.

use egui::{Pos2, Vec2};

/// Tangent used at both ends of a link
pub const CURVE_TANGENT: Vec2 = Vec2::new(80.0, 0.0);

/// Sample count used for links
pub const LINK_CURVE_STEPS: usize = 12;

/// Sample a cubic Hermite curve from `p1` to `p2` with the fixed horizontal tangent.
///
/// Returns `steps + 1` points; the first is `p1` and the last is `p2`.
pub fn hermite(p1: Pos2, p2: Pos2, steps: usize) -> Vec<Pos2> {
    hermite_with_tangent(p1, p2, CURVE_TANGENT, steps)
}

/// Sample a cubic Hermite curve using `tangent` at both ends
pub fn hermite_with_tangent(p1: Pos2, p2: Pos2, tangent: Vec2, steps: usize) -> Vec<Pos2> {
    let steps = steps.max(1);
    let mut points = Vec::with_capacity(steps + 1);

    for step in 0..=steps {
        let t = step as f32 / steps as f32;
        let t2 = t * t;
        let t3 = t2 * t;

        let h1 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h2 = -2.0 * t3 + 3.0 * t2;
        let h3 = t3 - 2.0 * t2 + t;
        let h4 = t3 - t2;

        let x = h1 * p1.x + h2 * p2.x + (h3 + h4) * tangent.x;
        let y = h1 * p1.y + h2 * p2.y + (h3 + h4) * tangent.y;
        points.push(Pos2::new(x, y));
    }

    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_are_exact() {
        let cases = [
            (Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0)),
            (Pos2::new(-13.5, 7.25), Pos2::new(412.0, -96.0)),
            (Pos2::new(300.0, 20.0), Pos2::new(10.0, 280.0)),
        ];
        for (p1, p2) in cases {
            for steps in [1, 2, 7, 12, 64] {
                let points = hermite(p1, p2, steps);
                assert_eq!(points.len(), steps + 1);
                assert_eq!(points[0], p1);
                assert_eq!(points[steps], p2);
            }
        }
    }

    #[test]
    fn test_midpoint_is_biased_by_tangent() {
        let points = hermite(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), 4);
        assert_eq!(points.len(), 5);

        // t = 0.5: h1 = h2 = 0.5, h3 = 0.125, h4 = -0.125
        let mid = points[2];
        assert!(mid.x > 0.0 && mid.x < 100.0);
        assert_eq!(mid.y, 0.0);

        // t = 0.25: 0.15625 * 100 + (0.140625 - 0.046875) * 80, off the straight line
        let quarter = points[1];
        assert!((quarter.x - 23.125).abs() < 1e-4);
        assert!((quarter.x - 25.0).abs() > 1.0);

        // Vertical chord: the tangent pushes samples sideways
        let vertical = hermite(Pos2::new(0.0, 0.0), Pos2::new(0.0, 100.0), 4);
        assert!(vertical[1].x > 0.0);
        assert!(vertical[3].x < 0.0);
    }

    #[test]
    fn test_zero_steps_still_spans_endpoints() {
        let points = hermite(Pos2::new(1.0, 2.0), Pos2::new(3.0, 4.0), 0);
        assert_eq!(points, vec![Pos2::new(1.0, 2.0), Pos2::new(3.0, 4.0)]);
    }

    #[test]
    fn test_sampling_is_pure() {
        let a = hermite(Pos2::new(5.0, 5.0), Pos2::new(50.0, 80.0), LINK_CURVE_STEPS);
        let b = hermite(Pos2::new(5.0, 5.0), Pos2::new(50.0, 80.0), LINK_CURVE_STEPS);
        assert_eq!(a, b);
    }
}
