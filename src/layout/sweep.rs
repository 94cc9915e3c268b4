//! Iterative bidirectional barycenter sweeps.

use crate::config::EngineConfig;

use super::leveling::Adjacency;
use super::placement::{barycenter, order_by_key, x_positions};
use super::types::LevelOrder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Top to bottom, against predecessors
    Down,
    /// Bottom to top, against successors
    Up,
}

/// Run `config.optimize_iterations` down/up sweep pairs.
pub fn optimize_order(
    order: LevelOrder,
    adjacency: &Adjacency<'_>,
    config: &EngineConfig,
) -> LevelOrder {
    (0..config.optimize_iterations).fold(order, |order, _| {
        let order = sweep(order, adjacency, SweepDirection::Down, config);
        sweep(order, adjacency, SweepDirection::Up, config)
    })
}

/// One pass over every level except the first (down) or the last (up).
pub fn sweep(
    order: LevelOrder,
    adjacency: &Adjacency<'_>,
    direction: SweepDirection,
    config: &EngineConfig,
) -> LevelOrder {
    let count = order.len();
    if count < 2 {
        return order;
    }

    let indices: Vec<usize> = match direction {
        SweepDirection::Down => (1..count).collect(),
        SweepDirection::Up => (0..count - 1).rev().collect(),
    };

    indices.into_iter().fold(order, |order, idx| {
        reorder_level(order, idx, adjacency, direction, config)
    })
}

/// Re-sort one level by the barycenter of its neighbours' current X.
/// A node without neighbours keeps its own X as key.
fn reorder_level(
    order: LevelOrder,
    idx: usize,
    adjacency: &Adjacency<'_>,
    direction: SweepDirection,
    config: &EngineConfig,
) -> LevelOrder {
    let keyed: Vec<(f64, String)> = {
        let x_of = x_positions(&order, config);
        order.groups[idx]
            .nodes
            .iter()
            .map(|id| {
                let neighbors = match direction {
                    SweepDirection::Down => adjacency.predecessors(id),
                    SweepDirection::Up => adjacency.successors(id),
                };
                let own = x_of.get(id.as_str()).copied().unwrap_or(config.center_x);
                (barycenter(neighbors, &x_of).unwrap_or(own), id.clone())
            })
            .collect()
    };

    let mut groups = order.groups;
    groups[idx].nodes = order_by_key(keyed);
    LevelOrder { groups }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::{LayoutEdge, LayoutNode, LevelGroup};

    fn order(groups: Vec<(i64, Vec<&str>)>) -> LevelOrder {
        LevelOrder {
            groups: groups
                .into_iter()
                .map(|(level, ids)| LevelGroup {
                    level,
                    nodes: ids.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_down_sweep_follows_parents() {
        // Parents a, b; children listed in the crossing order.
        let nodes: Vec<LayoutNode> = ["a", "b", "x", "y"]
            .iter()
            .map(|id| LayoutNode::new(*id, 3))
            .collect();
        let edges = vec![LayoutEdge::new("a", "x"), LayoutEdge::new("b", "y")];
        let refs: Vec<&LayoutNode> = nodes.iter().collect();
        let adjacency = Adjacency::build(&refs, &edges);
        let config = EngineConfig::default();

        let start = order(vec![(0, vec!["a", "b"]), (1, vec!["y", "x"])]);
        let swept = sweep(start, &adjacency, SweepDirection::Down, &config);
        assert_eq!(swept.groups[1].nodes, vec!["x", "y"]);
    }

    #[test]
    fn test_up_sweep_follows_children() {
        let nodes: Vec<LayoutNode> = ["a", "b", "x", "y"]
            .iter()
            .map(|id| LayoutNode::new(*id, 3))
            .collect();
        let edges = vec![LayoutEdge::new("a", "x"), LayoutEdge::new("b", "y")];
        let refs: Vec<&LayoutNode> = nodes.iter().collect();
        let adjacency = Adjacency::build(&refs, &edges);
        let config = EngineConfig::default();

        let start = order(vec![(0, vec!["b", "a"]), (1, vec!["x", "y"])]);
        let swept = sweep(start, &adjacency, SweepDirection::Up, &config);
        assert_eq!(swept.groups[0].nodes, vec!["a", "b"]);
        assert_eq!(swept.groups[1].nodes, vec!["x", "y"]);
    }

    #[test]
    fn test_isolated_nodes_hold_their_slot() {
        let nodes: Vec<LayoutNode> = ["a", "p", "q", "r"]
            .iter()
            .map(|id| LayoutNode::new(*id, 3))
            .collect();
        let edges: Vec<LayoutEdge> = Vec::new();
        let refs: Vec<&LayoutNode> = nodes.iter().collect();
        let adjacency = Adjacency::build(&refs, &edges);
        let config = EngineConfig::default();

        let start = order(vec![(0, vec!["a"]), (1, vec!["p", "q", "r"])]);
        let optimized = optimize_order(start.clone(), &adjacency, &config);
        assert_eq!(optimized, start);
    }

    #[test]
    fn test_single_level_untouched() {
        let nodes = vec![LayoutNode::new("a", 1)];
        let edges: Vec<LayoutEdge> = Vec::new();
        let refs: Vec<&LayoutNode> = nodes.iter().collect();
        let adjacency = Adjacency::build(&refs, &edges);
        let start = order(vec![(0, vec!["a"])]);
        let swept = sweep(start.clone(), &adjacency, SweepDirection::Up, &EngineConfig::default());
        assert_eq!(swept, start);
    }
}
