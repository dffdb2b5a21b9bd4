//! Workspace geometry: grid snapping, automatic placement, hit testing,
//! connection curves, and the pan/zoom view transform.
//!
//! Everything here is pure arithmetic over positions. Nodes are treated as
//! fixed-size boxes (`WorkspaceConfig::component_width` × `component_height`)
//! whose top-left corner is the *snapped* node position.

use crate::config::{WorkspaceConfig, ZoomLimits};
use crate::id::NodeId;
use crate::model::{Graph, Position};
use kurbo::{Affine, CubicBez, Point, Rect, Size, Vec2};
use std::collections::HashSet;

// ─── Grid ────────────────────────────────────────────────────────────────

/// Round `value - offset` to the nearest multiple of `grid_size`, then add
/// `offset` back. Halves round toward positive infinity.
///
/// A non-positive `grid_size` disables snapping.
pub fn snap_to_grid(value: f64, grid_size: f64, offset: f64) -> f64 {
    if !(grid_size > 0.0) {
        return value;
    }
    ((value - offset) / grid_size + 0.5).floor() * grid_size + offset
}

/// Snap both coordinates of a point.
pub fn snap_point(p: Point, grid_size: f64) -> Point {
    Point::new(
        snap_to_grid(p.x, grid_size, 0.0),
        snap_to_grid(p.y, grid_size, 0.0),
    )
}

/// Hashable key for a snapped coordinate pair. `-0.0` folds into `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GridKey(u64, u64);

impl GridKey {
    fn new(x: f64, y: f64) -> Self {
        GridKey((x + 0.0).to_bits(), (y + 0.0).to_bits())
    }
}

// ─── Placement ───────────────────────────────────────────────────────────

/// Find the first free grid slot at or after `base`.
///
/// Scans right in steps of `grid + width + margin`; once `x` passes
/// `boundary_width - width` it wraps to `x = grid` and moves down one row
/// (`grid + height + margin`). A slot is taken when an existing node snaps
/// to the same coordinates.
///
/// Far from the origin a step can round back onto the same coordinate. A
/// column that stops advancing wraps early, and a row that stops advancing
/// restarts the scan at the top row. Between restarts every probe is a new
/// slot, so the search ends for any finite set of occupied positions.
pub fn find_available_position<I>(
    occupied: I,
    base: Point,
    config: &WorkspaceConfig,
    boundary_width: f64,
) -> Point
where
    I: IntoIterator<Item = Position>,
{
    let grid = config.grid_size;
    let snap = |v: f64| snap_to_grid(v, grid, 0.0);

    let taken: HashSet<GridKey> = occupied
        .into_iter()
        .map(|p| GridKey::new(snap(p.x), snap(p.y)))
        .collect();

    let step_x = (grid + config.component_width + config.margin).max(grid.max(1.0));
    let step_y = (grid + config.component_height + config.margin).max(grid.max(1.0));
    let wrap_at = boundary_width - config.component_width;

    let mut x = snap(base.x);
    let mut y = snap(base.y);
    let mut probes = 0usize;
    while taken.contains(&GridKey::new(x, y)) {
        let next_x = snap(x + step_x);
        if next_x > wrap_at || next_x <= x {
            x = snap(grid);
            let next_y = snap(y + step_y);
            y = if next_y > y {
                next_y
            } else {
                log::debug!("placement: row {y} cannot advance, restarting at the top");
                snap(0.0)
            };
        } else {
            x = next_x;
        }
        probes += 1;
    }
    log::trace!("placement: ({x}, {y}) after {probes} probes");
    Point::new(x, y)
}

// ─── Component boxes ─────────────────────────────────────────────────────

/// The on-canvas box of a node at `position`.
pub fn component_rect(position: Position, config: &WorkspaceConfig) -> Rect {
    let origin = snap_point(position.into(), config.grid_size);
    Rect::from_origin_size(
        origin,
        Size::new(config.component_width, config.component_height),
    )
}

/// Center of a node's box, used as the anchor for connections.
pub fn component_center(position: Position, config: &WorkspaceConfig) -> Point {
    component_rect(position, config).center()
}

/// Topmost node whose box contains `point` (canvas coordinates).
pub fn hit_test(graph: &Graph, point: Point, config: &WorkspaceConfig) -> Option<NodeId> {
    // Last in order is painted last, so it wins
    graph
        .nodes()
        .rev()
        .find(|node| component_rect(node.position, config).contains(point))
        .map(|node| node.id)
}

/// Size the canvas must have to show every node and fill the viewport.
///
/// `viewport` is in screen pixels; the result is in canvas units, so a
/// zoomed-out view yields a larger canvas.
pub fn canvas_extent(
    graph: &Graph,
    viewport: Size,
    view: &ViewTransform,
    config: &WorkspaceConfig,
) -> Size {
    let visible = Size::new(viewport.width / view.scale, viewport.height / view.scale);
    let content = graph
        .nodes()
        .map(|node| component_rect(node.position, config))
        .reduce(|acc, r| acc.union(r));
    match content {
        Some(bounds) => Size::new(
            visible.width.max(bounds.x1 + config.margin),
            visible.height.max(bounds.y1 + config.margin),
        ),
        None => visible,
    }
}

// ─── Connections ─────────────────────────────────────────────────────────

/// A connection curve between two component centers.
///
/// Both control points sit on the horizontal midpoint, each at its own
/// endpoint's height, so every link reads as a left-to-right flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPath {
    pub curve: CubicBez,
}

impl ConnectionPath {
    pub fn between(start: Point, end: Point) -> Self {
        let mid_x = (start.x + end.x) / 2.0;
        Self {
            curve: CubicBez::new(
                start,
                Point::new(mid_x, start.y),
                Point::new(mid_x, end.y),
                end,
            ),
        }
    }

    pub fn start(&self) -> Point {
        self.curve.p0
    }

    pub fn end(&self) -> Point {
        self.curve.p3
    }

    /// SVG path data: `M fx fy C c1x c1y, c2x c2y, tx ty`.
    pub fn to_svg(&self) -> String {
        let CubicBez { p0, p1, p2, p3 } = self.curve;
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, p3.x, p3.y
        )
    }
}

/// Curve from the center of the node at `from` to the center of the node at `to`.
pub fn connection_path(from: Position, to: Position, config: &WorkspaceConfig) -> ConnectionPath {
    ConnectionPath::between(
        component_center(from, config),
        component_center(to, config),
    )
}

/// Curves for every edge whose endpoints both exist, in edge order.
pub fn connection_paths(graph: &Graph, config: &WorkspaceConfig) -> Vec<(NodeId, ConnectionPath)> {
    graph
        .edges()
        .filter_map(|edge| {
            let from = graph.get(edge.from)?;
            let to = graph.get(edge.to)?;
            Some((edge.id, connection_path(from.position, to.position, config)))
        })
        .collect()
}

// ─── View transform ──────────────────────────────────────────────────────

/// Pan/zoom state mapping canvas space to screen space:
/// `screen = canvas * scale + translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Step the scale up, clamped to `limits`. Returns the new scale.
    pub fn zoom_in(&mut self, limits: &ZoomLimits) -> f64 {
        self.scale = (self.scale + limits.step).clamp(limits.min, limits.max);
        self.scale
    }

    /// Step the scale down, clamped to `limits`. Returns the new scale.
    pub fn zoom_out(&mut self, limits: &ZoomLimits) -> f64 {
        self.scale = (self.scale - limits.step).clamp(limits.min, limits.max);
        self.scale
    }

    /// Multiply the scale by `factor`, keeping the canvas point under the
    /// screen-space `anchor` fixed.
    pub fn zoom_at(&mut self, anchor: Point, factor: f64, limits: &ZoomLimits) -> f64 {
        let pinned = self.screen_to_canvas(anchor);
        self.scale = (self.scale * factor).clamp(limits.min, limits.max);
        self.translate = anchor.to_vec2() - pinned.to_vec2() * self.scale;
        self.scale
    }

    /// Back to scale 1 with no translation.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    pub fn screen_to_canvas(&self, p: Point) -> Point {
        ((p.to_vec2() - self.translate) / self.scale).to_point()
    }

    pub fn canvas_to_screen(&self, p: Point) -> Point {
        (p.to_vec2() * self.scale + self.translate).to_point()
    }

    /// The canvas → screen transform as an affine map.
    pub fn affine(&self) -> Affine {
        Affine::translate(self.translate) * Affine::scale(self.scale)
    }

    /// Zoom as a whole percentage, e.g. `"125%"`.
    pub fn zoom_label(&self) -> String {
        format!("{}%", (self.scale * 100.0).round())
    }
}
