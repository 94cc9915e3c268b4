//! Adjacency construction and longest-path level assignment.

use std::collections::{HashMap, HashSet, VecDeque};

use super::types::{LayoutEdge, LayoutNode};

/// Forward and backward adjacency restricted to the given node set.
///
/// Self loops and edges naming unknown nodes are dropped. Parallel edges are
/// kept, so they weigh twice in barycenter averages.
pub struct Adjacency<'a> {
    successors: HashMap<&'a str, Vec<&'a str>>,
    predecessors: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> Adjacency<'a> {
    pub fn build(nodes: &[&'a LayoutNode], edges: &'a [LayoutEdge]) -> Self {
        let known: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
        let mut successors: HashMap<&str, Vec<&str>> = HashMap::new();
        let mut predecessors: HashMap<&str, Vec<&str>> = HashMap::new();

        for edge in edges {
            let (from, to) = (edge.from.as_str(), edge.to.as_str());
            if from == to || !known.contains(from) || !known.contains(to) {
                continue;
            }
            successors.entry(from).or_default().push(to);
            predecessors.entry(to).or_default().push(from);
        }

        Self {
            successors,
            predecessors,
        }
    }

    pub fn successors(&self, id: &str) -> &[&'a str] {
        self.successors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn predecessors(&self, id: &str) -> &[&'a str] {
        self.predecessors.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when the node takes part in at least one edge.
    pub fn is_connected(&self, id: &str) -> bool {
        !self.successors(id).is_empty() || !self.predecessors(id).is_empty()
    }
}

/// Pick the root for a graph where every connected node has a predecessor.
///
/// Highest tier wins; ties go to the smallest identifier.
pub fn synthetic_root<'a>(nodes: &[&'a LayoutNode], adjacency: &Adjacency<'_>) -> Option<&'a str> {
    nodes
        .iter()
        .copied()
        .filter(|n| adjacency.is_connected(&n.id))
        .max_by(|a, b| a.tier.cmp(&b.tier).then_with(|| b.id.cmp(&a.id)))
        .map(|n| n.id.as_str())
}

/// Level used for nodes that propagation never reaches.
pub fn fallback_level(tier: i32, top_tier: i32) -> i64 {
    i64::from(top_tier.saturating_sub(tier).max(0))
}

/// Assign a longest-path level to every node.
pub fn assign_levels<'a>(
    nodes: &[&'a LayoutNode],
    adjacency: &Adjacency<'a>,
    top_tier: i32,
) -> HashMap<&'a str, i64> {
    let mut roots: Vec<&'a str> = nodes
        .iter()
        .copied()
        .filter(|n| adjacency.is_connected(&n.id) && adjacency.predecessors(&n.id).is_empty())
        .map(|n| n.id.as_str())
        .collect();

    if roots.is_empty() {
        if let Some(root) = synthetic_root(nodes, adjacency) {
            tracing::debug!(root, "no root zone found, using synthetic root");
            roots.push(root);
        }
    }

    let root_set: HashSet<&'a str> = roots.iter().copied().collect();
    // A simple path has at most n - 1 edges; capping keeps cycles finite.
    let cap = nodes.len().saturating_sub(1) as i64;

    let mut levels: HashMap<&'a str, i64> = HashMap::new();
    let mut queue: VecDeque<&'a str> = VecDeque::new();
    for &root in &roots {
        levels.insert(root, 0);
        queue.push_back(root);
    }

    while let Some(current) = queue.pop_front() {
        let next = levels[current] + 1;
        if next > cap {
            continue;
        }
        for &succ in adjacency.successors(current) {
            if root_set.contains(succ) {
                continue;
            }
            if levels.get(succ).is_some_and(|&l| l >= next) {
                continue;
            }
            levels.insert(succ, next);
            queue.push_back(succ);
        }
    }

    for &node in nodes {
        levels.entry(node.id.as_str()).or_insert_with(|| {
            let level = fallback_level(node.tier, top_tier);
            tracing::trace!(node = %node.id, level, "unreached node, using tier fallback");
            level
        });
    }

    levels
}
