//! Layout engine core implementation.

use std::collections::{HashMap, HashSet};

use crate::config::EngineConfig;

use super::crossings::count_crossings;
use super::leveling::{Adjacency, assign_levels};
use super::placement::{group_nodes_by_level, initial_order, place_nodes};
use super::sweep::optimize_order;
use super::types::{Layout, LayoutEdge, LayoutNode, LevelOrder};

/// Layered layout for zone graphs.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) config: EngineConfig,
}

impl LayoutEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute positions with one top-down barycenter pass.
    pub fn compute(&self, nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Layout {
        self.run(nodes, edges, false)
    }

    /// Compute positions, then refine the ordering with bidirectional sweeps.
    pub fn optimize(&self, nodes: &[LayoutNode], edges: &[LayoutEdge]) -> Layout {
        self.run(nodes, edges, true)
    }

    fn run(&self, nodes: &[LayoutNode], edges: &[LayoutEdge], optimize: bool) -> Layout {
        let _span = tracing::debug_span!("layout", nodes = nodes.len(), edges = edges.len(), optimize)
            .entered();

        // Phase 0: Drop repeated ids, first occurrence wins
        let mut seen: HashSet<&str> = HashSet::new();
        let nodes: Vec<&LayoutNode> = nodes.iter().filter(|n| seen.insert(n.id.as_str())).collect();
        if nodes.is_empty() {
            return Layout::empty();
        }

        // Phase 1: Longest-path leveling
        let adjacency = Adjacency::build(&nodes, edges);
        let node_level = assign_levels(&nodes, &adjacency, self.config.top_tier);

        // Phase 2: Level grouping
        let groups = group_nodes_by_level(&nodes, &node_level);

        // Phase 3: Intra-level ordering
        let mut order: LevelOrder = initial_order(&groups, &adjacency, &self.config);
        if optimize {
            order = optimize_order(order, &adjacency, &self.config);
        }

        // Phase 4: Coordinates
        let positions = place_nodes(&order, &self.config);
        let levels = levels_by_id(&node_level);
        if tracing::enabled!(tracing::Level::DEBUG) {
            let crossings = count_crossings(&positions, edges);
            tracing::debug!(levels = order.len(), crossings, "layout complete");
        }

        Layout {
            positions,
            levels,
            order,
        }
    }
}

fn levels_by_id(node_level: &HashMap<&str, i64>) -> std::collections::BTreeMap<String, i64> {
    node_level
        .iter()
        .map(|(&id, &level)| (id.to_string(), level))
        .collect()
}
