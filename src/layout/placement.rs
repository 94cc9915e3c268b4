//! Level grouping, intra-level ordering and coordinate assignment.

use std::collections::{BTreeMap, HashMap};

use crate::config::EngineConfig;

use super::leveling::Adjacency;
use super::types::{LayoutNode, LevelGroup, LevelOrder, Position};

/// Group nodes by level, top level first. Members keep input order.
pub fn group_nodes_by_level<'a>(
    nodes: &[&'a LayoutNode],
    node_level: &HashMap<&str, i64>,
) -> Vec<(i64, Vec<&'a LayoutNode>)> {
    let mut levels: BTreeMap<i64, Vec<&LayoutNode>> = BTreeMap::new();

    for &node in nodes {
        let level = *node_level.get(node.id.as_str()).unwrap_or(&0);
        levels.entry(level).or_default().push(node);
    }

    levels.into_iter().collect()
}

/// X coordinate of `rank` in a level of `count` nodes.
#[inline]
pub fn level_x(rank: usize, count: usize, config: &EngineConfig) -> f64 {
    let offset = rank as f64 - count.saturating_sub(1) as f64 / 2.0;
    config.center_x + offset * config.horizontal_spacing
}

/// Y coordinate of a level.
#[inline]
pub fn level_y(level: i64, config: &EngineConfig) -> f64 {
    config.top_margin + level as f64 * config.vertical_spacing
}

/// Mean X of the neighbours present in `x_of`, or `None` when none is.
pub fn barycenter(neighbors: &[&str], x_of: &HashMap<&str, f64>) -> Option<f64> {
    let xs: Vec<f64> = neighbors
        .iter()
        .filter_map(|n| x_of.get(*n).copied())
        .collect();
    if xs.is_empty() {
        None
    } else {
        Some(xs.iter().sum::<f64>() / xs.len() as f64)
    }
}

/// Sort ids by their key; equal keys keep their current order.
pub fn order_by_key(mut keyed: Vec<(f64, String)>) -> Vec<String> {
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, id)| id).collect()
}

/// One top-down pass: the first level by tier, every later level by the
/// barycenter of its already placed predecessors.
pub fn initial_order(
    groups: &[(i64, Vec<&LayoutNode>)],
    adjacency: &Adjacency<'_>,
    config: &EngineConfig,
) -> LevelOrder {
    let mut placed_x: HashMap<&str, f64> = HashMap::new();
    let mut order = LevelOrder::default();

    for (i, (level, members)) in groups.iter().enumerate() {
        let ids: Vec<String> = if i == 0 {
            let mut sorted = members.clone();
            sorted.sort_by(|a, b| b.tier.cmp(&a.tier).then_with(|| a.id.cmp(&b.id)));
            sorted.into_iter().map(|n| n.id.clone()).collect()
        } else {
            let keyed = members
                .iter()
                .map(|n| {
                    let key = barycenter(adjacency.predecessors(&n.id), &placed_x)
                        .unwrap_or(config.center_x);
                    (key, n.id.clone())
                })
                .collect();
            order_by_key(keyed)
        };

        for (rank, id) in ids.iter().enumerate() {
            if let Some(node) = members.iter().find(|n| &n.id == id) {
                placed_x.insert(node.id.as_str(), level_x(rank, ids.len(), config));
            }
        }

        order.groups.push(LevelGroup {
            level: *level,
            nodes: ids,
        });
    }

    order
}

/// Current X of every node in an ordering.
pub fn x_positions<'o>(order: &'o LevelOrder, config: &EngineConfig) -> HashMap<&'o str, f64> {
    order
        .groups
        .iter()
        .flat_map(|group| {
            let count = group.nodes.len();
            group
                .nodes
                .iter()
                .enumerate()
                .map(move |(rank, id)| (id.as_str(), level_x(rank, count, config)))
        })
        .collect()
}

/// Turn an ordering into concrete positions.
pub fn place_nodes(order: &LevelOrder, config: &EngineConfig) -> BTreeMap<String, Position> {
    let mut positions = BTreeMap::new();

    for group in &order.groups {
        let y = level_y(group.level, config);
        for (rank, id) in group.nodes.iter().enumerate() {
            positions.insert(
                id.clone(),
                Position::new(level_x(rank, group.nodes.len(), config), y),
            );
        }
    }

    positions
}

/// Merge computed positions with previously saved ones.
///
/// With `use_persisted`, every node that has a saved position keeps it.
/// Saved entries for nodes no longer in the layout are dropped.
pub fn resolve_positions(
    computed: &BTreeMap<String, Position>,
    persisted: &BTreeMap<String, Position>,
    use_persisted: bool,
) -> BTreeMap<String, Position> {
    computed
        .iter()
        .map(|(id, &pos)| {
            let pos = if use_persisted {
                persisted.get(id).copied().unwrap_or(pos)
            } else {
                pos
            };
            (id.clone(), pos)
        })
        .collect()
}
