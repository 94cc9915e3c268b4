//! Edge crossing count for a positioned layout.

use std::collections::BTreeMap;

use super::types::{LayoutEdge, Position};

/// Orientation of `c` relative to the directed line `a -> b`.
fn orientation(a: Position, b: Position, c: Position) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// True when segments `p1-p2` and `q1-q2` cross at a single interior point.
fn segments_cross(p1: Position, p2: Position, q1: Position, q2: Position) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}

/// Count pairs of straight edges that cross each other.
///
/// Edges sharing an endpoint, self loops and edges with an unpositioned
/// endpoint are skipped.
pub fn count_crossings(positions: &BTreeMap<String, Position>, edges: &[LayoutEdge]) -> usize {
    let segments: Vec<(&str, &str, Position, Position)> = edges
        .iter()
        .filter(|e| e.from != e.to)
        .filter_map(|e| {
            let from = *positions.get(&e.from)?;
            let to = *positions.get(&e.to)?;
            Some((e.from.as_str(), e.to.as_str(), from, to))
        })
        .collect();

    let mut crossings = 0;
    for (i, a) in segments.iter().enumerate() {
        for b in &segments[i + 1..] {
            let shares_endpoint = a.0 == b.0 || a.0 == b.1 || a.1 == b.0 || a.1 == b.1;
            if !shares_endpoint && segments_cross(a.2, a.3, b.2, b.3) {
                crossings += 1;
            }
        }
    }
    crossings
}
