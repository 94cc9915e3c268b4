//! Engine configuration shared by the layout engine and the edge router.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Error;

/// Spacing, routing and optimization constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Distance between neighbouring node centers in one level
    pub horizontal_spacing: f64,
    /// Distance between consecutive levels
    pub vertical_spacing: f64,
    /// X around which every level is centered
    pub center_x: f64,
    /// Y of level 0
    pub top_margin: f64,
    /// Tier that maps to fallback level 0 for unreached nodes
    pub top_tier: i32,
    /// Horizontal slack around the endpoints when searching obstructions
    pub routing_padding: f64,
    /// Clearance kept between a detour and the obstructing boxes
    pub routing_gap: f64,
    /// Bidirectional sweep rounds run by `optimize`
    pub optimize_iterations: usize,
    /// Default arc radius at path corners
    pub corner_radius: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizontal_spacing: 220.0,
            vertical_spacing: 160.0,
            center_x: 480.0,
            top_margin: 80.0,
            top_tier: 5,
            routing_padding: 40.0,
            routing_gap: 20.0,
            optimize_iterations: 10,
            corner_radius: 8.0,
        }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON config; missing fields keep defaults.
    pub fn from_json(source: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(source)?)
    }

    /// Load config from a file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }
}
