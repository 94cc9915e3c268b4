//! Detection of node boxes lying between an edge's endpoints.

use super::geometry::{NodeBox, Point};

/// Boxes other than the endpoints that intersect the corridor between
/// `source` and `target`, in the order the edge meets them.
///
/// The corridor spans the endpoints' Y range and their X range widened by
/// `padding` on both sides.
pub fn find_obstructions(
    source: Point,
    target: Point,
    source_id: &str,
    target_id: &str,
    boxes: &[NodeBox],
    padding: f64,
) -> Vec<NodeBox> {
    let min_x = source.x.min(target.x) - padding;
    let max_x = source.x.max(target.x) + padding;
    let min_y = source.y.min(target.y);
    let max_y = source.y.max(target.y);

    let mut found: Vec<NodeBox> = boxes
        .iter()
        .filter(|b| b.id != source_id && b.id != target_id)
        .filter(|b| b.rect().overlaps_span(min_x, max_x, min_y, max_y))
        .cloned()
        .collect();

    if target.y >= source.y {
        found.sort_by(|a, b| a.y.total_cmp(&b.y));
    } else {
        found.sort_by(|a, b| b.y.total_cmp(&a.y));
    }

    tracing::trace!(
        source = source_id,
        target = target_id,
        count = found.len(),
        "obstructions"
    );
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_in_corridor() {
        let boxes = vec![NodeBox::new("mid", 50.0, 150.0, 100.0, 100.0)];
        let found = find_obstructions(
            Point::new(100.0, 0.0),
            Point::new(100.0, 400.0),
            "src",
            "dst",
            &boxes,
            40.0,
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "mid");
    }

    #[test]
    fn test_box_outside_band() {
        let boxes = vec![NodeBox::new("far", 800.0, 150.0, 100.0, 100.0)];
        let found = find_obstructions(
            Point::new(100.0, 0.0),
            Point::new(100.0, 400.0),
            "src",
            "dst",
            &boxes,
            40.0,
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_padding_widens_band() {
        // Left edge at 170 is 70 right of the line
        let boxes = vec![NodeBox::new("side", 170.0, 150.0, 100.0, 100.0)];
        let src = Point::new(100.0, 0.0);
        let dst = Point::new(100.0, 400.0);
        assert!(find_obstructions(src, dst, "s", "t", &boxes, 40.0).is_empty());
        assert_eq!(find_obstructions(src, dst, "s", "t", &boxes, 80.0).len(), 1);
    }

    #[test]
    fn test_endpoints_excluded() {
        let boxes = vec![
            NodeBox::new("src", 50.0, -20.0, 100.0, 60.0),
            NodeBox::new("dst", 50.0, 360.0, 100.0, 60.0),
            NodeBox::new("mid", 50.0, 150.0, 100.0, 100.0),
        ];
        let found = find_obstructions(
            Point::new(100.0, 0.0),
            Point::new(100.0, 400.0),
            "src",
            "dst",
            &boxes,
            40.0,
        );
        assert!(found.iter().all(|b| b.id != "src" && b.id != "dst"));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_order_follows_direction() {
        let boxes = vec![
            NodeBox::new("low", 60.0, 260.0, 80.0, 60.0),
            NodeBox::new("high", 60.0, 80.0, 80.0, 60.0),
        ];
        let top = Point::new(100.0, 0.0);
        let bottom = Point::new(100.0, 400.0);

        let down = find_obstructions(top, bottom, "s", "t", &boxes, 40.0);
        assert_eq!(down[0].id, "high");
        assert_eq!(down[1].id, "low");

        let up = find_obstructions(bottom, top, "s", "t", &boxes, 40.0);
        assert_eq!(up[0].id, "low");
        assert_eq!(up[1].id, "high");
    }
}
