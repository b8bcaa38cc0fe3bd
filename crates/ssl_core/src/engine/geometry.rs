//! Geometry kernel
//!
//! Point/vector helpers, angle normalisation, finite segment intersection and the
//! tangent construction used to estimate detours around a disc obstacle.
//!
//! All functions are total: degenerate input yields "no intersection" or an empty
//! tangent set instead of an error. `try_construct_tangents` is the one diagnostic
//! entry point that reports why a construction failed.
//!
//! `construct_tangents` and `path_length_avoiding` are planning helpers for
//! callers scoring candidate targets. The tick pipeline does not call them;
//! `DetourTo` steering uses teammate repulsion instead.

use std::f32::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

/// 2D vector / point in field coordinates (mm).
pub type Vec2 = nalgebra::Vector2<f32>;

/// Finite line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn length(&self) -> f32 {
        distance(self.start, self.end)
    }
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).norm()
}

/// z component of the 3D cross product of two planar vectors.
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.x * b.y - a.y * b.x
}

/// Unit vector for a heading angle.
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Angle of the vector from `from` to `to`.
#[inline]
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// Wrap an angle into (-π, π].
pub fn normalize_angle(angle: f32) -> f32 {
    if (-PI..=PI).contains(&angle) && angle != -PI {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Signed rotation (rad) that turns `heading` onto the direction of `towards`.
///
/// Uses `atan2(cross, dot)` so the result is already wrapped and never needs a
/// branch around the ±π seam.
pub fn signed_angle_between(heading: f32, towards: Vec2) -> f32 {
    let h = direction(heading);
    cross(h, towards).atan2(h.dot(&towards))
}

/// Intersection point of segments `p1-p2` and `q1-q2`.
///
/// Parallel and coincident segments never intersect here; callers treat them as
/// "no crossing".
pub fn segment_intersection(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> Option<Vec2> {
    let d1 = p2 - p1;
    let d2 = q2 - q1;

    let determinant = d1.x * d2.y - d2.x * d1.y;
    if determinant == 0.0 {
        return None;
    }

    let start_delta = q1 - p1;
    let t1 = (start_delta.x * d2.y - d2.x * start_delta.y) / determinant;
    let t2 = (start_delta.x * d1.y - d1.x * start_delta.y) / determinant;

    if (0.0..=1.0).contains(&t1) && (0.0..=1.0).contains(&t2) {
        Some(p1 + d1 * t1)
    } else {
        None
    }
}

fn tangent_lines(origin: Vec2, obstacle: Vec2, radius: f32, separation: f32) -> [Line; 2] {
    let angle_to_obstacle = bearing(origin, obstacle);
    let spread = (2.0 * radius / separation).asin();

    [angle_to_obstacle + spread, angle_to_obstacle - spread]
        .map(|angle| Line::new(origin, origin + direction(angle) * radius))
}

/// Tangent rays from `origin` around a disc of the same radius centred on `obstacle`.
///
/// Returns nothing when the discs overlap (distance ≤ 2·radius) or the radius is
/// not positive; otherwise exactly two lines starting at `origin`.
pub fn construct_tangents(origin: Vec2, obstacle: Vec2, radius: f32) -> Vec<Line> {
    try_construct_tangents(origin, obstacle, radius)
        .map(Vec::from)
        .unwrap_or_default()
}

/// Diagnostic form of [`construct_tangents`].
pub fn try_construct_tangents(origin: Vec2, obstacle: Vec2, radius: f32) -> Result<[Line; 2]> {
    if !(radius.is_finite() && radius > 0.0) {
        return Err(SimError::DegenerateGeometry(format!("non-positive radius {radius}")));
    }
    let separation = distance(origin, obstacle);
    if separation == 0.0 {
        return Err(SimError::DegenerateGeometry("zero separation".into()));
    }
    if separation <= 2.0 * radius {
        return Err(SimError::DegenerateGeometry(format!(
            "obstacle overlaps origin (distance {separation} <= {})",
            2.0 * radius
        )));
    }
    Ok(tangent_lines(origin, obstacle, radius, separation))
}

/// Detour-aware distance estimate from `start` to `end`.
///
/// Starts from the straight-line length and, for every obstacle tangent from
/// `start` that crosses the direct segment, keeps the shorter partial distance to
/// the crossing. This is a cost signal, not an executable path.
///
/// Tangents start at `start`, so any obstacle clear of the start disc (farther
/// than `2·radius`) crosses the direct segment at `start` itself and the
/// estimate collapses to zero. Overlapping obstacles leave the direct length.
pub fn path_length_avoiding(start: Vec2, end: Vec2, obstacles: &[Vec2], radius: f32) -> f32 {
    let mut path_length = distance(start, end);

    for &obstacle in obstacles {
        for tangent in construct_tangents(start, obstacle, radius) {
            if let Some(crossing) = segment_intersection(start, end, tangent.start, tangent.end) {
                let partial = distance(start, crossing);
                if partial < path_length {
                    path_length = partial;
                }
            }
        }
    }

    path_length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn test_distance() {
        assert!((distance(v(0.0, 0.0), v(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_segments_crossing_at_known_point() {
        let hit = segment_intersection(v(0.0, 0.0), v(10.0, 10.0), v(0.0, 10.0), v(10.0, 0.0));
        let hit = hit.expect("diagonals must cross");
        assert!((hit.x - 5.0).abs() < 1e-5);
        assert!((hit.y - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_parallel_segments_never_intersect() {
        assert!(segment_intersection(v(0.0, 0.0), v(10.0, 0.0), v(0.0, 1.0), v(10.0, 1.0)).is_none());
        // Coincident segments are reported as no intersection as well
        assert!(segment_intersection(v(0.0, 0.0), v(10.0, 0.0), v(2.0, 0.0), v(8.0, 0.0)).is_none());
    }

    #[test]
    fn test_segments_outside_parameter_range() {
        // Lines cross at (5, 5) but the second segment stops short of it
        assert!(segment_intersection(v(0.0, 0.0), v(10.0, 10.0), v(0.0, 10.0), v(4.0, 6.0)).is_none());
    }

    #[test]
    fn test_tangents_empty_when_overlapping() {
        assert!(construct_tangents(v(0.0, 0.0), v(300.0, 0.0), 180.0).is_empty());
        // Exactly touching counts as unavoidable
        assert!(construct_tangents(v(0.0, 0.0), v(360.0, 0.0), 180.0).is_empty());
    }

    #[test]
    fn test_tangents_two_lines_from_origin() {
        let origin = v(100.0, -50.0);
        let tangents = construct_tangents(origin, v(1100.0, -50.0), 180.0);
        assert_eq!(tangents.len(), 2);
        for line in &tangents {
            assert_eq!(line.start, origin);
            assert!((line.length() - 180.0).abs() < 1e-3);
        }
        let expected_spread = (360.0f32 / 1000.0).asin();
        let a0 = bearing(origin, tangents[0].end);
        let a1 = bearing(origin, tangents[1].end);
        assert!((a0 - expected_spread).abs() < 1e-4);
        assert!((a1 + expected_spread).abs() < 1e-4);
    }

    #[test]
    fn test_try_tangents_diagnostics() {
        assert!(matches!(
            try_construct_tangents(v(0.0, 0.0), v(0.0, 0.0), 10.0),
            Err(SimError::DegenerateGeometry(_))
        ));
        assert!(try_construct_tangents(v(0.0, 0.0), v(100.0, 0.0), 0.0).is_err());
        assert!(try_construct_tangents(v(0.0, 0.0), v(100.0, 0.0), 10.0).is_ok());
        assert!(construct_tangents(v(0.0, 0.0), v(100.0, 0.0), -1.0).is_empty());
    }

    #[test]
    fn test_path_length_without_obstacles_is_straight() {
        let len = path_length_avoiding(v(0.0, 0.0), v(3000.0, 4000.0), &[], 180.0);
        assert!((len - 5000.0).abs() < 1e-2);
    }

    #[test]
    fn test_path_length_never_exceeds_direct_distance() {
        let start = v(0.0, 0.0);
        let end = v(4000.0, 0.0);
        let obstacles = [v(2000.0, 0.0), v(1000.0, 300.0), v(-500.0, 0.0)];
        let len = path_length_avoiding(start, end, &obstacles, 180.0);
        assert!(len <= 4000.0);
        assert!(len >= 0.0);
    }

    #[test]
    fn test_path_length_collapses_for_clear_obstacle() {
        let start = v(0.0, 0.0);
        let end = v(4000.0, 0.0);
        // Clear of the start disc: tangents meet the segment at `start`
        assert_eq!(path_length_avoiding(start, end, &[v(2000.0, 500.0)], 180.0), 0.0);
        // Overlapping the start disc: no tangents, direct length stands
        let len = path_length_avoiding(start, end, &[v(200.0, 100.0)], 180.0);
        assert!((len - 4000.0).abs() < 1e-2);
    }

    #[test]
    fn test_normalize_angle_range() {
        assert!((normalize_angle(2.5 * PI) - PI / 2.0).abs() < 1e-5);
        assert_eq!(normalize_angle(-PI), PI);
        assert_eq!(normalize_angle(PI), PI);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-5);
        assert_eq!(normalize_angle(0.5), 0.5);
    }

    #[test]
    fn test_signed_angle_between_wraps() {
        // Heading just below +π, target just above -π: short turn is positive
        let diff = signed_angle_between(PI - 0.05, direction(-PI + 0.05));
        assert!((diff - 0.1).abs() < 1e-4);

        let diff = signed_angle_between(0.0, v(0.0, -1.0));
        assert!((diff + PI / 2.0).abs() < 1e-5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Normalised angles always land in (-π, π] and keep their direction
            #[test]
            fn prop_normalize_angle_in_range(angle in -100.0f32..100.0f32) {
                let wrapped = normalize_angle(angle);
                prop_assert!(wrapped > -PI - 1e-6 && wrapped <= PI + 1e-6);
                prop_assert!((wrapped.cos() - angle.cos()).abs() < 1e-3);
                prop_assert!((wrapped.sin() - angle.sin()).abs() < 1e-3);
            }

            /// Tangent count depends only on the overlap test
            #[test]
            fn prop_tangent_count(dx in -3000.0f32..3000.0, dy in -3000.0f32..3000.0, r in 1.0f32..400.0) {
                let origin = Vec2::new(0.0, 0.0);
                let obstacle = Vec2::new(dx, dy);
                let tangents = construct_tangents(origin, obstacle, r);
                if obstacle.norm() <= 2.0 * r {
                    prop_assert!(tangents.is_empty());
                } else {
                    prop_assert_eq!(tangents.len(), 2);
                    prop_assert!(tangents.iter().all(|t| t.start == origin));
                }
            }
        }
    }
}
