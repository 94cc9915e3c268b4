//! Data structures for layout computation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node handed to the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub id: String,
    /// Classification priority; higher tiers rank above lower ones
    #[serde(rename = "priorityTier", alias = "tier", default)]
    pub tier: i32,
}

impl LayoutNode {
    pub fn new(id: impl Into<String>, tier: i32) -> Self {
        Self {
            id: id.into(),
            tier,
        }
    }
}

/// A directed edge between two node ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutEdge {
    pub from: String,
    pub to: String,
}

impl LayoutEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// A 2-D point assigned to a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Nodes sharing one level, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGroup {
    pub level: i64,
    pub nodes: Vec<String>,
}

/// Level groups from top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelOrder {
    pub groups: Vec<LevelGroup>,
}

impl LevelOrder {
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Rank of a node inside its level.
    pub fn rank_of(&self, id: &str) -> Option<usize> {
        self.groups
            .iter()
            .find_map(|g| g.nodes.iter().position(|n| n == id))
    }
}

/// The complete layout result.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Node ID -> position
    pub positions: BTreeMap<String, Position>,
    /// Node ID -> level
    pub levels: BTreeMap<String, i64>,
    pub order: LevelOrder,
}

impl Layout {
    pub fn empty() -> Self {
        Self {
            positions: BTreeMap::new(),
            levels: BTreeMap::new(),
            order: LevelOrder::default(),
        }
    }

    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn level(&self, id: &str) -> Option<i64> {
        self.levels.get(id).copied()
    }
}
