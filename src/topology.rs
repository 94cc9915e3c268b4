use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use crate::error::Error;
use crate::layout::{LayoutEdge, LayoutNode, Position};

/// Reference-model tier of a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Enterprise,
    Dmz,
    #[default]
    Operations,
    Control,
    Safety,
    Field,
    Remote,
}

impl ZoneKind {
    /// Classification priority; higher tiers sit nearer the top.
    pub fn tier(self) -> i32 {
        match self {
            Self::Enterprise => 5,
            Self::Dmz => 4,
            Self::Operations => 3,
            Self::Control | Self::Safety => 2,
            Self::Field => 1,
            Self::Remote => 0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Enterprise => "enterprise",
            Self::Dmz => "dmz",
            Self::Operations => "operations",
            Self::Control => "control",
            Self::Safety => "safety",
            Self::Field => "field",
            Self::Remote => "remote",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: ZoneKind,
    #[serde(default)]
    pub security_level: Option<u8>,
    /// Previously saved position
    #[serde(default)]
    pub position: Option<Position>,
}

impl Zone {
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conduit {
    #[serde(default)]
    pub id: Option<String>,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(default)]
    pub zones: Vec<Zone>,
    #[serde(default)]
    pub conduits: Vec<Conduit>,
    /// `structure_key` at the time positions were saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_key: Option<String>,
}

impl Topology {
    /// Parse and validate a topology document.
    pub fn from_json(source: &str) -> Result<Self, Error> {
        let topology: Topology = serde_json::from_str(source)?;
        topology.validate()?;
        Ok(topology)
    }

    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Reject duplicate zone ids and conduits naming unknown zones.
    pub fn validate(&self) -> Result<(), Error> {
        let mut ids: HashSet<&str> = HashSet::new();
        for zone in &self.zones {
            if !ids.insert(zone.id.as_str()) {
                return Err(Error::DuplicateZone(zone.id.clone()));
            }
        }

        for (idx, conduit) in self.conduits.iter().enumerate() {
            for end in [&conduit.from, &conduit.to] {
                if !ids.contains(end.as_str()) {
                    return Err(Error::UnknownZone {
                        conduit: conduit.id.clone().unwrap_or_else(|| format!("#{}", idx)),
                        zone: end.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    pub fn zone(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn layout_nodes(&self) -> Vec<LayoutNode> {
        self.zones
            .iter()
            .map(|z| LayoutNode::new(z.id.clone(), z.kind.tier()))
            .collect()
    }

    pub fn layout_edges(&self) -> Vec<LayoutEdge> {
        self.conduits
            .iter()
            .map(|c| LayoutEdge::new(c.from.clone(), c.to.clone()))
            .collect()
    }

    /// Saved positions by zone id.
    pub fn persisted_positions(&self) -> BTreeMap<String, Position> {
        self.zones
            .iter()
            .filter_map(|z| z.position.map(|p| (z.id.clone(), p)))
            .collect()
    }

    /// True when saved positions were stored for the current structure.
    pub fn persisted_positions_current(&self) -> bool {
        self.layout_key.as_deref() == Some(self.structure_key().as_str())
    }

    /// Order-independent fingerprint of the zone ids and conduit endpoints.
    ///
    /// Saved positions are only trusted while this key is unchanged.
    pub fn structure_key(&self) -> String {
        let mut zones: Vec<&str> = self.zones.iter().map(|z| z.id.as_str()).collect();
        zones.sort_unstable();
        let mut conduits: Vec<String> = self
            .conduits
            .iter()
            .map(|c| format!("{}>{}", c.from, c.to))
            .collect();
        conduits.sort_unstable();
        format!("{}|{}", zones.join(","), conduits.join(","))
    }
}
