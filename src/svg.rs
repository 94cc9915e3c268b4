use crate::config::EngineConfig;
use crate::layout::Position;
use crate::measure::TextMetrics;
use crate::routing::{
    NodeBox, Point, build_smooth_path, find_obstructions, fmt_coord, merged_bounds, path_midpoint,
    route_edge, simplify,
};
use crate::topology::{Conduit, Topology, Zone};
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write;

const CANVAS_MARGIN: f64 = 40.0;
const SELF_LOOP_OFFSET: f64 = 25.0;

/// Geometry of one conduit as drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct ConduitGeometry {
    pub path: String,
    pub label: Point,
    /// True when the conduit was routed around other zones
    pub detoured: bool,
    /// Polyline behind `path`; empty for curves
    pub waypoints: Vec<Point>,
}

pub struct SvgRenderer {
    metrics: TextMetrics,
    config: EngineConfig,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl SvgRenderer {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            metrics: TextMetrics::default(),
            config,
        }
    }

    /// Zone boxes centered on their positions. Zones without a position are skipped.
    pub fn zone_boxes(&self, topology: &Topology, positions: &BTreeMap<String, Position>) -> Vec<NodeBox> {
        topology
            .zones
            .iter()
            .filter_map(|zone| {
                let pos = positions.get(&zone.id)?;
                let (w, h) = self.metrics.node_size(zone.label(), &caption(zone));
                Some(NodeBox::centered(zone.id.clone(), Point::new(pos.x, pos.y), w, h))
            })
            .collect()
    }

    /// Path and label anchor for a conduit between two rendered boxes.
    pub fn conduit_geometry(&self, from: &NodeBox, to: &NodeBox, boxes: &[NodeBox]) -> ConduitGeometry {
        if from.id == to.id {
            let points = self_loop(from);
            return ConduitGeometry {
                path: build_smooth_path(&points, self.config.corner_radius),
                label: Point::new(from.x + from.width + SELF_LOOP_OFFSET, from.y + from.height / 2.0),
                detoured: false,
                waypoints: points,
            };
        }

        let (source, target, horizontal) = anchor_points(from, to);
        if horizontal {
            // Detours leave vertically, so side-by-side zones bridge over their row instead
            return self
                .row_bridge(source, target, from, to, boxes)
                .unwrap_or_else(|| direct_curve(source, target, true));
        }
        match route_edge(source, target, &from.id, &to.id, boxes, &self.config) {
            Some(routed) => ConduitGeometry {
                path: routed.path,
                label: Point::new(routed.label_x, routed.label_y),
                detoured: true,
                waypoints: routed.waypoints,
            },
            None => direct_curve(source, target, false),
        }
    }

    /// Path from top center to top center passing above every zone between
    /// two side-by-side boxes. `None` when nothing sits between them.
    fn row_bridge(
        &self,
        source: Point,
        target: Point,
        from: &NodeBox,
        to: &NodeBox,
        boxes: &[NodeBox],
    ) -> Option<ConduitGeometry> {
        let between = find_obstructions(source, target, &from.id, &to.id, boxes, 0.0);
        let bounds = merged_bounds(&between)?;

        let top = bounds.y.min(from.y).min(to.y) - self.config.routing_gap;
        let (from_x, to_x) = (from.x + from.width / 2.0, to.x + to.width / 2.0);
        let waypoints = simplify(&[
            Point::new(from_x, from.y),
            Point::new(from_x, top),
            Point::new(to_x, top),
            Point::new(to_x, to.y),
        ]);
        let label = path_midpoint(&waypoints).unwrap_or(source);

        Some(ConduitGeometry {
            path: build_smooth_path(&waypoints, self.config.corner_radius),
            label,
            detoured: true,
            waypoints,
        })
    }

    pub fn render(&self, topology: &Topology, positions: &BTreeMap<String, Position>) -> String {
        let boxes = self.zone_boxes(topology, positions);
        let (min_x, min_y, width, height) = canvas_bounds(&boxes);

        let mut svg = String::new();
        writeln!(
            &mut svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            fmt_coord(width),
            fmt_coord(height),
            fmt_coord(min_x),
            fmt_coord(min_y),
            fmt_coord(width),
            fmt_coord(height)
        )
        .unwrap();

        writeln!(
            &mut svg,
            r#"<style>
  .zone {{ fill: #fff; stroke: #333; stroke-width: 1.5; }}
  .zone-enterprise {{ fill: #e3f2fd; }}
  .zone-dmz {{ fill: #fff3e0; }}
  .zone-operations {{ fill: #e8f5e9; }}
  .zone-control {{ fill: #f3e5f5; }}
  .zone-safety {{ fill: #ffebee; }}
  .zone-field {{ fill: #f1f8e9; }}
  .zone-remote {{ fill: #eceff1; }}
  .zone-name {{ font-family: sans-serif; font-size: 14px; font-weight: bold; }}
  .zone-caption {{ font-family: sans-serif; font-size: 11px; fill: #555; }}
  .conduit {{ stroke: #666; stroke-width: 1.5; fill: none; }}
  .conduit-label {{ font-family: sans-serif; font-size: 11px; fill: #333; }}
</style>"#
        )
        .unwrap();

        let box_map: HashMap<&str, &NodeBox> = boxes.iter().map(|b| (b.id.as_str(), b)).collect();

        // Conduits first (behind zones)
        let mut labels: Vec<(Point, &str)> = Vec::new();
        for conduit in &topology.conduits {
            let (Some(from), Some(to)) = (
                box_map.get(conduit.from.as_str()),
                box_map.get(conduit.to.as_str()),
            ) else {
                continue;
            };
            let geometry = self.conduit_geometry(from, to, &boxes);
            self.render_conduit(&mut svg, conduit, &geometry);
            if let Some(name) = &conduit.name {
                labels.push((geometry.label, name));
            }
        }

        for zone in &topology.zones {
            if let Some(node_box) = box_map.get(zone.id.as_str()) {
                self.render_zone(&mut svg, node_box, zone);
            }
        }

        // Labels last so zones never hide them
        for (at, name) in labels {
            writeln!(
                &mut svg,
                r#"<text class="conduit-label" x="{}" y="{}" text-anchor="middle" dy="-4">{}</text>"#,
                fmt_coord(at.x),
                fmt_coord(at.y),
                escape_xml(name)
            )
            .unwrap();
        }

        writeln!(&mut svg, "</svg>").unwrap();
        svg
    }

    fn render_zone(&self, svg: &mut String, node_box: &NodeBox, zone: &Zone) {
        let cx = node_box.x + node_box.width / 2.0;
        let cy = node_box.y + node_box.height / 2.0;

        writeln!(
            svg,
            r#"<rect class="zone zone-{}" x="{}" y="{}" width="{}" height="{}" rx="6" />"#,
            zone.kind.as_str(),
            fmt_coord(node_box.x),
            fmt_coord(node_box.y),
            fmt_coord(node_box.width),
            fmt_coord(node_box.height)
        )
        .unwrap();

        let caption = caption(zone);
        let name_y = if caption.is_empty() {
            cy + 5.0
        } else {
            cy - self.metrics.line_height / 2.0 + 5.0
        };
        writeln!(
            svg,
            r#"<text class="zone-name" x="{}" y="{}" text-anchor="middle">{}</text>"#,
            fmt_coord(cx),
            fmt_coord(name_y),
            escape_xml(zone.label())
        )
        .unwrap();

        if !caption.is_empty() {
            writeln!(
                svg,
                r#"<text class="zone-caption" x="{}" y="{}" text-anchor="middle">{}</text>"#,
                fmt_coord(cx),
                fmt_coord(name_y + self.metrics.line_height),
                escape_xml(&caption)
            )
            .unwrap();
        }
    }

    fn render_conduit(&self, svg: &mut String, conduit: &Conduit, geometry: &ConduitGeometry) {
        if geometry.path.is_empty() {
            return;
        }
        let id_attr = conduit
            .id
            .as_deref()
            .map(|id| format!(r#" data-conduit="{}""#, escape_xml(id)))
            .unwrap_or_default();
        writeln!(
            svg,
            r#"<path class="conduit"{} d="{}" />"#,
            id_attr, geometry.path
        )
        .unwrap();
    }
}

/// Second text line of a zone box: kind and security level target.
fn caption(zone: &Zone) -> String {
    match zone.security_level {
        Some(sl) => format!("{} · SL {}", zone.kind.as_str(), sl),
        None => zone.kind.as_str().to_string(),
    }
}

/// Connection points on the facing sides of two boxes.
/// Returns `(source, target, horizontal)`.
fn anchor_points(from: &NodeBox, to: &NodeBox) -> (Point, Point, bool) {
    let from_rect = from.rect();
    let to_rect = to.rect();
    let vertical_overlap = from_rect.y < to_rect.bottom() && to_rect.y < from_rect.bottom();

    if vertical_overlap {
        let (sx, tx) = if from_rect.center_x() <= to_rect.center_x() {
            (from_rect.right(), to_rect.x)
        } else {
            (from_rect.x, to_rect.right())
        };
        (
            Point::new(sx, from_rect.center_y()),
            Point::new(tx, to_rect.center_y()),
            true,
        )
    } else if to_rect.center_y() > from_rect.center_y() {
        (
            Point::new(from_rect.center_x(), from_rect.bottom()),
            Point::new(to_rect.center_x(), to_rect.y),
            false,
        )
    } else {
        (
            Point::new(from_rect.center_x(), from_rect.y),
            Point::new(to_rect.center_x(), to_rect.bottom()),
            false,
        )
    }
}

/// Cubic connector used when nothing obstructs the straight line.
fn direct_curve(source: Point, target: Point, horizontal: bool) -> ConduitGeometry {
    let mid = Point::new((source.x + target.x) / 2.0, (source.y + target.y) / 2.0);
    let (c1, c2) = if horizontal {
        (Point::new(mid.x, source.y), Point::new(mid.x, target.y))
    } else {
        (Point::new(source.x, mid.y), Point::new(target.x, mid.y))
    };
    ConduitGeometry {
        path: format!(
            "M {} {} C {} {} {} {} {} {}",
            fmt_coord(source.x),
            fmt_coord(source.y),
            fmt_coord(c1.x),
            fmt_coord(c1.y),
            fmt_coord(c2.x),
            fmt_coord(c2.y),
            fmt_coord(target.x),
            fmt_coord(target.y)
        ),
        label: mid,
        detoured: false,
        waypoints: Vec::new(),
    }
}

/// Loop on the right side of a box.
fn self_loop(node_box: &NodeBox) -> Vec<Point> {
    let x = node_box.x + node_box.width;
    let y_top = node_box.y + node_box.height * 0.3;
    let y_bottom = node_box.y + node_box.height * 0.7;

    vec![
        Point::new(x, y_top),
        Point::new(x + SELF_LOOP_OFFSET, y_top),
        Point::new(x + SELF_LOOP_OFFSET, y_bottom),
        Point::new(x, y_bottom),
    ]
}

/// `(min_x, min_y, width, height)` of the drawing including a margin.
fn canvas_bounds(boxes: &[NodeBox]) -> (f64, f64, f64, f64) {
    let Some(first) = boxes.first() else {
        return (0.0, 0.0, CANVAS_MARGIN * 2.0, CANVAS_MARGIN * 2.0);
    };
    let bounds = boxes
        .iter()
        .skip(1)
        .fold(first.rect(), |acc, b| acc.union(&b.rect()));
    (
        bounds.x - CANVAS_MARGIN,
        bounds.y - CANVAS_MARGIN,
        bounds.width + CANVAS_MARGIN * 2.0 + SELF_LOOP_OFFSET,
        bounds.height + CANVAS_MARGIN * 2.0,
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
