//! Orthogonal polyline cleanup, smooth SVG path synthesis and midpoint.

use std::fmt::Write;

use super::geometry::{EPSILON, Point};

/// Insert a corner wherever two consecutive points differ in both axes.
/// The inserted corner moves vertically first, then horizontally.
pub fn orthogonalize(points: &[Point]) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len() * 2);

    for (i, &point) in points.iter().enumerate() {
        if i > 0 {
            let prev = points[i - 1];
            let dx = (point.x - prev.x).abs() >= EPSILON;
            let dy = (point.y - prev.y).abs() >= EPSILON;
            if dx && dy {
                result.push(Point::new(prev.x, point.y));
            }
        }
        result.push(point);
    }

    result
}

#[inline]
fn is_collinear(a: Point, b: Point, c: Point) -> bool {
    let vertical = (a.x - b.x).abs() < EPSILON && (b.x - c.x).abs() < EPSILON;
    let horizontal = (a.y - b.y).abs() < EPSILON && (b.y - c.y).abs() < EPSILON;
    vertical || horizontal
}

/// Drop consecutive duplicates and collinear middle points.
pub fn simplify(points: &[Point]) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());

    for &point in points {
        if result.last().is_some_and(|last| last.approx_eq(point)) {
            continue;
        }
        while result.len() >= 2 {
            let n = result.len();
            if is_collinear(result[n - 2], result[n - 1], point) {
                result.pop();
            } else {
                break;
            }
        }
        // Backtracking can land on the point just kept
        if result.last().is_some_and(|last| last.approx_eq(point)) {
            continue;
        }
        result.push(point);
    }

    result
}

/// Format a coordinate for path data: two decimals, no trailing zeros.
pub fn fmt_coord(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// Build an SVG path with straight runs and a circular arc at each corner.
///
/// The arc radius is `radius`, clamped to half of the shorter adjacent
/// segment. Collinear corners and corners next to a zero-length segment are
/// drawn as plain line-to commands.
pub fn build_smooth_path(points: &[Point], radius: f64) -> String {
    if points.len() < 2 {
        return String::new();
    }

    let mut d = String::new();
    let first = points[0];
    write!(d, "M {} {}", fmt_coord(first.x), fmt_coord(first.y)).unwrap();

    for window in points.windows(3) {
        let (prev, curr, next) = (window[0], window[1], window[2]);
        let (in_x, in_y) = (curr.x - prev.x, curr.y - prev.y);
        let (out_x, out_y) = (next.x - curr.x, next.y - curr.y);
        let in_len = in_x.hypot(in_y);
        let out_len = out_x.hypot(out_y);

        if in_len < EPSILON || out_len < EPSILON {
            write!(d, " L {} {}", fmt_coord(curr.x), fmt_coord(curr.y)).unwrap();
            continue;
        }

        let cross = in_x * out_y - in_y * out_x;
        let r = radius.min(in_len / 2.0).min(out_len / 2.0);
        if (cross / (in_len * out_len)).abs() < EPSILON || r < EPSILON {
            write!(d, " L {} {}", fmt_coord(curr.x), fmt_coord(curr.y)).unwrap();
            continue;
        }

        let start = Point::new(curr.x - in_x / in_len * r, curr.y - in_y / in_len * r);
        let end = Point::new(curr.x + out_x / out_len * r, curr.y + out_y / out_len * r);
        let sweep = if cross > 0.0 { 1 } else { 0 };

        write!(
            d,
            " L {} {} A {} {} 0 0 {} {} {}",
            fmt_coord(start.x),
            fmt_coord(start.y),
            fmt_coord(r),
            fmt_coord(r),
            sweep,
            fmt_coord(end.x),
            fmt_coord(end.y)
        )
        .unwrap();
    }

    let last = points[points.len() - 1];
    write!(d, " L {} {}", fmt_coord(last.x), fmt_coord(last.y)).unwrap();
    d
}

/// Total length of a polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// The point halfway along the polyline by arc length.
pub fn path_midpoint(points: &[Point]) -> Option<Point> {
    let first = *points.first()?;
    let total = polyline_length(points);
    if total < EPSILON {
        return Some(first);
    }

    let half = total / 2.0;
    let mut accumulated = 0.0;
    for w in points.windows(2) {
        let seg_len = w[0].distance(w[1]);
        if accumulated + seg_len >= half && seg_len >= EPSILON {
            let t = (half - accumulated) / seg_len;
            return Some(w[0].lerp(w[1], t));
        }
        accumulated += seg_len;
    }

    points.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(spec: &[(f64, f64)]) -> Vec<Point> {
        spec.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_orthogonalize_inserts_vertical_first() {
        let out = orthogonalize(&pts(&[(0.0, 0.0), (50.0, 100.0)]));
        assert_eq!(out, pts(&[(0.0, 0.0), (0.0, 100.0), (50.0, 100.0)]));
    }

    #[test]
    fn test_orthogonalize_keeps_straight_segments() {
        let input = pts(&[(0.0, 0.0), (0.0, 100.0), (50.0, 100.0)]);
        assert_eq!(orthogonalize(&input), input);
    }

    #[test]
    fn test_simplify_drops_duplicates_and_collinear() {
        let input = pts(&[
            (0.0, 0.0),
            (0.0, 0.0),
            (0.0, 50.0),
            (0.0, 100.0),
            (40.0, 100.0),
            (100.0, 100.0),
        ]);
        assert_eq!(simplify(&input), pts(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)]));
    }

    #[test]
    fn test_smooth_path_single_corner() {
        let d = build_smooth_path(&pts(&[(0.0, 0.0), (0.0, 100.0), (100.0, 100.0)]), 8.0);
        assert!(d.starts_with("M 0 0"));
        assert_eq!(d.matches('A').count(), 1);
        assert!(d.ends_with("100 100"));
        assert_eq!(d, "M 0 0 L 0 92 A 8 8 0 0 0 8 100 L 100 100");
    }

    #[test]
    fn test_smooth_path_sweep_direction() {
        // Right then down turns clockwise on screen
        let d = build_smooth_path(&pts(&[(0.0, 0.0), (100.0, 0.0), (100.0, 100.0)]), 8.0);
        assert!(d.contains("A 8 8 0 0 1 100 8"));
    }

    #[test]
    fn test_smooth_path_clamps_radius() {
        let d = build_smooth_path(&pts(&[(0.0, 0.0), (0.0, 10.0), (100.0, 10.0)]), 8.0);
        assert!(d.contains("A 5 5"));
    }

    #[test]
    fn test_smooth_path_degenerate() {
        assert_eq!(build_smooth_path(&[], 8.0), "");
        assert_eq!(build_smooth_path(&pts(&[(1.0, 2.0)]), 8.0), "");
        assert_eq!(build_smooth_path(&pts(&[(0.0, 0.0), (0.0, 50.0)]), 8.0), "M 0 0 L 0 50");
    }

    #[test]
    fn test_smooth_path_collinear_and_zero_length() {
        let d = build_smooth_path(&pts(&[(0.0, 0.0), (0.0, 50.0), (0.0, 100.0)]), 8.0);
        assert_eq!(d, "M 0 0 L 0 50 L 0 100");
        let d = build_smooth_path(&pts(&[(0.0, 0.0), (0.0, 0.0), (50.0, 0.0)]), 8.0);
        assert_eq!(d, "M 0 0 L 0 0 L 50 0");
        assert!(!d.contains("NaN"));
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(92.0), "92");
        assert_eq!(fmt_coord(1.0 / 3.0), "0.33");
        assert_eq!(fmt_coord(-0.001), "0");
    }

    #[test]
    fn test_midpoint_by_arc_length() {
        let path = pts(&[(0.0, 0.0), (0.0, 100.0), (300.0, 100.0)]);
        let mid = path_midpoint(&path).unwrap();
        assert_eq!(mid, Point::new(100.0, 100.0));
    }

    #[test]
    fn test_midpoint_degenerate() {
        assert_eq!(path_midpoint(&[]), None);
        let single = pts(&[(5.0, 5.0)]);
        assert_eq!(path_midpoint(&single), Some(Point::new(5.0, 5.0)));
        let stacked = pts(&[(5.0, 5.0), (5.0, 5.0)]);
        assert_eq!(path_midpoint(&stacked), Some(Point::new(5.0, 5.0)));
    }
}
