//! Orthogonal, obstacle-avoiding conduit routing.

mod geometry;
mod obstruction;
mod path;
mod router;

pub use geometry::{EPSILON, NodeBox, Point, Rect};
pub use obstruction::find_obstructions;
pub use path::{build_smooth_path, fmt_coord, orthogonalize, path_midpoint, polyline_length, simplify};
pub use router::{
    DetourSide, RoutedPath, choose_side, detour_waypoints, merged_bounds,
    route_edge, route_path, route_path_with_radius,
};
