//! Hierarchical zone layout.
//!
//! Nodes are leveled by longest path from the roots, grouped by level,
//! ordered within each level by barycenter and spaced on a fixed grid.

mod crossings;
mod engine;
mod leveling;
mod placement;
mod sweep;
mod types;

pub use crossings::count_crossings;
pub use engine::LayoutEngine;
pub use leveling::fallback_level;
pub use placement::resolve_positions;
pub use types::{Layout, LayoutEdge, LayoutNode, LevelGroup, LevelOrder, Position};
