pub mod config;
pub mod error;
pub mod layout;
pub mod measure;
pub mod routing;
pub mod svg;
pub mod topology;

pub use error::Error;

use std::collections::BTreeMap;

use wasm_bindgen::prelude::*;

use config::EngineConfig;
use layout::{LayoutEdge, LayoutEngine, LayoutNode, Position, resolve_positions};
use routing::{NodeBox, Point};
use svg::SvgRenderer;
use topology::Topology;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Config from an optional JSON string; absent or blank means defaults.
fn config_from(config: Option<String>) -> Result<EngineConfig, Error> {
    match config.as_deref().map(str::trim) {
        None | Some("") => Ok(EngineConfig::default()),
        Some(json) => EngineConfig::from_json(json),
    }
}

fn layout_json(
    nodes: &str,
    edges: &str,
    config: Option<String>,
    optimize: bool,
) -> Result<String, Error> {
    let nodes: Vec<LayoutNode> = serde_json::from_str(nodes)?;
    let edges: Vec<LayoutEdge> = serde_json::from_str(edges)?;
    let engine = LayoutEngine::new(config_from(config)?);
    let layout = if optimize {
        engine.optimize(&nodes, &edges)
    } else {
        engine.compute(&nodes, &edges)
    };
    Ok(serde_json::to_string(&layout.positions)?)
}

/// Lay out a topology and render it, honoring persisted positions when the
/// document's layout key still matches its structure.
pub fn render_topology_document(topology: &Topology, config: EngineConfig) -> String {
    let engine = LayoutEngine::new(config);
    let layout = engine.compute(&topology.layout_nodes(), &topology.layout_edges());
    let positions: BTreeMap<String, Position> = resolve_positions(
        &layout.positions,
        &topology.persisted_positions(),
        topology.persisted_positions_current(),
    );
    SvgRenderer::new(engine.config().clone()).render(topology, &positions)
}

/// Node positions keyed by id, as JSON.
#[wasm_bindgen(js_name = "computeLayout")]
pub fn compute_layout(nodes: &str, edges: &str, config: Option<String>) -> Result<String, String> {
    layout_json(nodes, edges, config, false).map_err(|e| e.to_string())
}

/// Like `computeLayout`, with crossing-reduction sweeps.
#[wasm_bindgen(js_name = "optimizeLayout")]
pub fn optimize_layout(nodes: &str, edges: &str, config: Option<String>) -> Result<String, String> {
    layout_json(nodes, edges, config, true).map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "findObstructions")]
#[allow(clippy::too_many_arguments)]
pub fn find_obstructions(
    sx: f64,
    sy: f64,
    tx: f64,
    ty: f64,
    source_id: &str,
    target_id: &str,
    boxes: &str,
    padding: Option<f64>,
) -> Result<String, String> {
    let boxes: Vec<NodeBox> = serde_json::from_str(boxes).map_err(|e| e.to_string())?;
    let padding = padding.unwrap_or(EngineConfig::default().routing_padding);
    let found = routing::find_obstructions(
        Point::new(sx, sy),
        Point::new(tx, ty),
        source_id,
        target_id,
        &boxes,
        padding,
    );
    serde_json::to_string(&found).map_err(|e| e.to_string())
}

/// Routed path as JSON, or `"null"` when nothing obstructs the edge.
#[wasm_bindgen(js_name = "routePath")]
pub fn route_path(
    sx: f64,
    sy: f64,
    tx: f64,
    ty: f64,
    obstructions: &str,
    gap: Option<f64>,
) -> Result<String, String> {
    let obstructions: Vec<NodeBox> = serde_json::from_str(obstructions).map_err(|e| e.to_string())?;
    let gap = gap.unwrap_or(EngineConfig::default().routing_gap);
    let routed = routing::route_path(Point::new(sx, sy), Point::new(tx, ty), &obstructions, gap);
    serde_json::to_string(&routed).map_err(|e| e.to_string())
}

#[wasm_bindgen(js_name = "renderTopology")]
pub fn render_topology(topology: &str, config: Option<String>) -> Result<String, String> {
    let topology = Topology::from_json(topology).map_err(|e| e.to_string())?;
    let config = config_from(config).map_err(|e| e.to_string())?;
    Ok(render_topology_document(&topology, config))
}
