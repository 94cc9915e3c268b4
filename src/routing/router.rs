//! Detour synthesis around obstructing node boxes.

use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

use super::geometry::{NodeBox, Point, Rect};
use super::obstruction::find_obstructions;
use super::path::{build_smooth_path, orthogonalize, path_midpoint, simplify};

/// A routed edge ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutedPath {
    /// SVG path data
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
    /// Cleaned orthogonal polyline the path was built from
    pub waypoints: Vec<Point>,
}

/// Side of the merged obstruction the detour passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetourSide {
    Left,
    Right,
}

/// Bounding rectangle of all boxes.
pub fn merged_bounds(boxes: &[NodeBox]) -> Option<Rect> {
    boxes
        .iter()
        .map(NodeBox::rect)
        .reduce(|acc, r| acc.union(&r))
}

/// Pick the side needing the smaller horizontal deviation from the edge's
/// midpoint. Ties go left.
pub fn choose_side(bounds: &Rect, mid_x: f64, gap: f64) -> DetourSide {
    let left_dev = (mid_x - (bounds.x - gap)).abs();
    let right_dev = (bounds.right() + gap - mid_x).abs();
    if left_dev <= right_dev {
        DetourSide::Left
    } else {
        DetourSide::Right
    }
}

/// Four-point detour: source, above/below the merged box on the detour
/// column, past the box on the same column, target.
pub fn detour_waypoints(source: Point, target: Point, bounds: &Rect, gap: f64) -> Vec<Point> {
    let mid_x = (source.x + target.x) / 2.0;
    let detour_x = match choose_side(bounds, mid_x, gap) {
        DetourSide::Left => bounds.x - gap,
        DetourSide::Right => bounds.right() + gap,
    };
    let (entry_y, exit_y) = if target.y >= source.y {
        (bounds.y - gap, bounds.bottom() + gap)
    } else {
        (bounds.bottom() + gap, bounds.y - gap)
    };

    vec![
        source,
        Point::new(detour_x, entry_y),
        Point::new(detour_x, exit_y),
        target,
    ]
}

/// Route around `obstructions` with the configured default corner radius.
///
/// Returns `None` when there is nothing to avoid; the caller draws its own
/// direct connector in that case.
pub fn route_path(
    source: Point,
    target: Point,
    obstructions: &[NodeBox],
    gap: f64,
) -> Option<RoutedPath> {
    let corner_radius = EngineConfig::default().corner_radius;
    route_path_with_radius(source, target, obstructions, gap, corner_radius)
}

/// `route_path` with an explicit corner radius.
pub fn route_path_with_radius(
    source: Point,
    target: Point,
    obstructions: &[NodeBox],
    gap: f64,
    corner_radius: f64,
) -> Option<RoutedPath> {
    let bounds = merged_bounds(obstructions)?;

    let raw = detour_waypoints(source, target, &bounds, gap);
    let waypoints = simplify(&orthogonalize(&raw));
    let path = build_smooth_path(&waypoints, corner_radius);
    let label = path_midpoint(&waypoints).unwrap_or(source);

    tracing::trace!(
        obstructions = obstructions.len(),
        points = waypoints.len(),
        "routed detour"
    );

    Some(RoutedPath {
        path,
        label_x: label.x,
        label_y: label.y,
        waypoints,
    })
}

/// Find obstructions and route around them using the configured padding,
/// gap and corner radius.
pub fn route_edge(
    source: Point,
    target: Point,
    source_id: &str,
    target_id: &str,
    boxes: &[NodeBox],
    config: &EngineConfig,
) -> Option<RoutedPath> {
    let obstructions = find_obstructions(
        source,
        target,
        source_id,
        target_id,
        boxes,
        config.routing_padding,
    );
    route_path_with_radius(
        source,
        target,
        &obstructions,
        config.routing_gap,
        config.corner_radius,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::path::polyline_length;

    fn assert_orthogonal(points: &[Point]) {
        for w in points.windows(2) {
            let dx = (w[0].x - w[1].x).abs() > 1e-9;
            let dy = (w[0].y - w[1].y).abs() > 1e-9;
            assert!(!(dx && dy), "diagonal segment {:?} -> {:?}", w[0], w[1]);
        }
    }

    #[test]
    fn test_no_obstructions_returns_none() {
        assert!(route_path(Point::new(0.0, 0.0), Point::new(0.0, 100.0), &[], 20.0).is_none());
    }

    #[test]
    fn test_detour_left_of_box() {
        // Box center (110) sits right of the edge (100), so the left side is closer
        let boxes = vec![NodeBox::new("mid", 60.0, 150.0, 100.0, 100.0)];
        let routed = route_path(Point::new(100.0, 0.0), Point::new(100.0, 400.0), &boxes, 20.0)
            .unwrap();

        assert_orthogonal(&routed.waypoints);
        assert_eq!(routed.waypoints.first(), Some(&Point::new(100.0, 0.0)));
        assert_eq!(routed.waypoints.last(), Some(&Point::new(100.0, 400.0)));
        assert!(routed.waypoints.iter().any(|p| p.x == 40.0));
        assert!(routed.path.starts_with("M 100 0"));
        assert!(routed.path.ends_with("100 400"));
    }

    #[test]
    fn test_detour_right_of_box() {
        let boxes = vec![NodeBox::new("mid", 40.0, 150.0, 100.0, 100.0)];
        let routed = route_path(Point::new(100.0, 0.0), Point::new(100.0, 400.0), &boxes, 20.0)
            .unwrap();
        assert!(routed.waypoints.iter().any(|p| p.x == 160.0));
    }

    #[test]
    fn test_detour_clears_merged_box() {
        let boxes = vec![
            NodeBox::new("a", 60.0, 100.0, 80.0, 60.0),
            NodeBox::new("b", 80.0, 220.0, 120.0, 60.0),
        ];
        let routed = route_path(Point::new(100.0, 0.0), Point::new(120.0, 400.0), &boxes, 20.0)
            .unwrap();
        assert_orthogonal(&routed.waypoints);

        // The detour column runs outside the merged box [60, 200] x [100, 280]
        let column: Vec<&Point> = routed
            .waypoints
            .iter()
            .filter(|p| p.y > 100.0 && p.y < 280.0)
            .collect();
        assert!(column.is_empty());
        assert!(
            routed
                .waypoints
                .windows(2)
                .filter(|w| w[0].x == w[1].x && w[0].y < 280.0 && w[1].y > 100.0)
                .all(|w| w[0].x <= 40.0 || w[0].x >= 220.0)
        );
    }

    #[test]
    fn test_upward_edge() {
        let boxes = vec![NodeBox::new("mid", 60.0, 150.0, 100.0, 100.0)];
        let routed = route_path(Point::new(100.0, 400.0), Point::new(100.0, 0.0), &boxes, 20.0)
            .unwrap();
        assert_orthogonal(&routed.waypoints);
        assert_eq!(routed.waypoints[1], Point::new(100.0, 270.0));
    }

    #[test]
    fn test_label_on_polyline_midpoint() {
        let boxes = vec![NodeBox::new("mid", 60.0, 150.0, 100.0, 100.0)];
        let routed = route_path(Point::new(100.0, 0.0), Point::new(100.0, 400.0), &boxes, 20.0)
            .unwrap();
        let label = Point::new(routed.label_x, routed.label_y);

        let total = polyline_length(&routed.waypoints);
        let mut walked = 0.0;
        let mut found = false;
        for w in routed.waypoints.windows(2) {
            let seg = w[0].distance(w[1]);
            let to_label = w[0].distance(label);
            if (to_label + label.distance(w[1]) - seg).abs() < 1e-6 {
                assert!((walked + to_label - total / 2.0).abs() < 1e-6);
                found = true;
                break;
            }
            walked += seg;
        }
        assert!(found);
    }

    #[test]
    fn test_route_path_uses_configured_radius() {
        let boxes = vec![NodeBox::new("mid", 60.0, 150.0, 100.0, 100.0)];
        let source = Point::new(100.0, 0.0);
        let target = Point::new(100.0, 400.0);
        let radius = EngineConfig::default().corner_radius;

        let routed = route_path(source, target, &boxes, 20.0).unwrap();
        let explicit = route_path_with_radius(source, target, &boxes, 20.0, radius).unwrap();
        assert_eq!(routed, explicit);
        assert!(routed.path.contains(&format!("A {} {}", radius, radius)));
    }

    #[test]
    fn test_route_edge_skips_clear_line() {
        let config = EngineConfig::default();
        let boxes = vec![
            NodeBox::new("s", 60.0, -30.0, 80.0, 30.0),
            NodeBox::new("t", 60.0, 400.0, 80.0, 30.0),
            NodeBox::new("far", 600.0, 150.0, 80.0, 60.0),
        ];
        let routed = route_edge(
            Point::new(100.0, 0.0),
            Point::new(100.0, 400.0),
            "s",
            "t",
            &boxes,
            &config,
        );
        assert!(routed.is_none());
    }
}
