//! Workspace interaction controller.
//!
//! Translates normalized input into store mutations and view changes:
//! panning, dragging components, palette drops, selection, and connection
//! mode. Input arrives in screen coordinates and is mapped to canvas space
//! through the current `ViewTransform`.
//!
//! ## Gestures
//!
//! | Start | Gesture | End |
//! |-------|---------|-----|
//! | Middle button, Space held, or ⌘ on empty canvas | `Panning` | pointer up |
//! | Primary button on a component | `Dragging` | pointer up commits the snapped position |
//! | `begin_palette_drag` | `Palette` | pointer up inside the workspace places, outside cancels |
//!
//! Connection mode is orthogonal to gestures: `connection_source` is set by
//! `start_connection` (or a secondary click on a component) and ends on the
//! next component click, Escape, or a click on empty canvas.

use crate::fullscreen::{self, Fullscreen};
use crate::input::{InputEvent, Modifiers, PointerButton};
use crate::notify::{Notification, NotificationLog, Notifier};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use fc_core::geometry::{self, ConnectionPath, ViewTransform};
use fc_core::{
    CanvasStore, ImportError, Node, NodeId, NodePatch, Point, Position, Size, Vec2,
    WorkspaceConfig,
};
use serde_json::{Map, Value};

/// Screen distance the pointer must travel before a press on a component
/// becomes a move.
const DRAG_ACTIVATION_DISTANCE: f64 = 10.0;

/// Viewport assumed until the host reports its size.
const DEFAULT_VIEWPORT: Size = Size::new(1280.0, 800.0);

/// The pointer gesture in progress.
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Idle,
    Panning {
        /// Last pointer position, screen space.
        last: Point,
    },
    Dragging {
        id: NodeId,
        /// Pointer offset from the component origin, canvas units.
        grab: Vec2,
        /// Where the press happened, screen space.
        origin: Point,
        /// Unsnapped component origin; `None` until the drag activates.
        at: Option<Point>,
    },
    Palette {
        kind: String,
        data: Map<String, Value>,
    },
}

/// Owns the view state and drives the canvas store from user input.
pub struct WorkspaceController<N: Notifier = NotificationLog> {
    store: CanvasStore,
    config: WorkspaceConfig,
    view: ViewTransform,
    viewport: Size,
    selected: Option<NodeId>,
    connection_source: Option<NodeId>,
    gesture: Gesture,
    space_held: bool,
    notifier: N,
}

impl WorkspaceController<NotificationLog> {
    pub fn new(store: CanvasStore, config: WorkspaceConfig) -> Self {
        Self::with_notifier(store, config, NotificationLog::new())
    }
}

impl<N: Notifier> WorkspaceController<N> {
    pub fn with_notifier(store: CanvasStore, config: WorkspaceConfig, notifier: N) -> Self {
        Self {
            store,
            config,
            view: ViewTransform::default(),
            viewport: DEFAULT_VIEWPORT,
            selected: None,
            connection_source: None,
            gesture: Gesture::Idle,
            space_held: false,
            notifier,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &CanvasStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut CanvasStore {
        &mut self.store
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn connection_source(&self) -> Option<NodeId> {
        self.connection_source
    }

    pub fn is_connecting(&self) -> bool {
        self.connection_source.is_some()
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Canvas size needed to show every component and fill the viewport.
    pub fn canvas_size(&self) -> Size {
        geometry::canvas_extent(self.store.graph(), self.viewport, &self.view, &self.config)
    }

    /// Width of the visible workspace in canvas units. Automatic placement
    /// wraps inside it.
    pub fn visible_width(&self) -> f64 {
        self.viewport.width / self.view.scale
    }

    /// Curves for every connection, in canvas space.
    pub fn connection_paths(&self) -> Vec<(NodeId, ConnectionPath)> {
        geometry::connection_paths(self.store.graph(), &self.config)
    }

    /// The component being dragged and its live (unsnapped) origin.
    pub fn drag_preview(&self) -> Option<(NodeId, Point)> {
        match self.gesture {
            Gesture::Dragging { id, at: Some(at), .. } => Some((id, at)),
            _ => None,
        }
    }

    // ─── Input ───────────────────────────────────────────────────────────

    /// Feed one input event. Returns `true` if the view, selection, or
    /// graph changed and the workspace should be redrawn.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown {
                x,
                y,
                button,
                modifiers,
            } => self.pointer_down(Point::new(*x, *y), *button, *modifiers),
            InputEvent::PointerMove { x, y, .. } => self.pointer_move(Point::new(*x, *y)),
            InputEvent::PointerUp { x, y, .. } => self.pointer_up(Point::new(*x, *y)),
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => self.wheel(Point::new(*x, *y), Vec2::new(*dx, *dy), *modifiers),
            InputEvent::KeyDown { key, modifiers } => {
                match ShortcutMap::resolve(
                    key,
                    modifiers.ctrl,
                    modifiers.shift,
                    modifiers.alt,
                    modifiers.meta,
                ) {
                    Some(action) => self.dispatch(action),
                    None => false,
                }
            }
            InputEvent::KeyUp { key, .. } => {
                ShortcutMap::resolve_release(key).is_some_and(|action| self.dispatch(action))
            }
        }
    }

    /// Run a shortcut action. Returns `true` if anything visible changed.
    pub fn dispatch(&mut self, action: ShortcutAction) -> bool {
        let step = self.config.grid_size;
        match action {
            ShortcutAction::ZoomIn => self.step_zoom(true),
            ShortcutAction::ZoomOut => self.step_zoom(false),
            ShortcutAction::ZoomReset => {
                let changed = self.view != ViewTransform::default();
                self.view.reset();
                changed
            }
            ShortcutAction::PanLeft => self.pan(Vec2::new(step, 0.0)),
            ShortcutAction::PanRight => self.pan(Vec2::new(-step, 0.0)),
            ShortcutAction::PanUp => self.pan(Vec2::new(0.0, step)),
            ShortcutAction::PanDown => self.pan(Vec2::new(0.0, -step)),
            ShortcutAction::PanStart => {
                self.space_held = true;
                false
            }
            ShortcutAction::PanEnd => {
                self.space_held = false;
                false
            }
            ShortcutAction::Delete => self.delete_selected(),
            ShortcutAction::Connect => self.start_connection(),
            ShortcutAction::Cancel => self.cancel(),
        }
    }

    fn pointer_down(&mut self, screen: Point, button: PointerButton, mods: Modifiers) -> bool {
        // Palette drags finish on pointer up
        if matches!(self.gesture, Gesture::Palette { .. }) {
            return false;
        }
        if button == PointerButton::Middle || self.space_held {
            return self.start_pan(screen);
        }

        let canvas = self.view.screen_to_canvas(screen);
        match geometry::hit_test(self.store.graph(), canvas, &self.config) {
            Some(id) if button == PointerButton::Secondary => {
                self.selected = Some(id);
                self.begin_connection_from(id);
                true
            }
            Some(id) => {
                let connecting = self.is_connecting();
                self.select_node(id);
                if !connecting && let Some(node) = self.store.node(id) {
                    self.gesture = Gesture::Dragging {
                        id,
                        grab: canvas - Point::from(node.position),
                        origin: screen,
                        at: None,
                    };
                }
                true
            }
            None if mods.command() => self.start_pan(screen),
            None => self.clear_selection(),
        }
    }

    fn pointer_move(&mut self, screen: Point) -> bool {
        match &mut self.gesture {
            Gesture::Panning { last } => {
                let delta = screen - *last;
                *last = screen;
                self.view.pan_by(delta);
                true
            }
            Gesture::Dragging {
                grab, origin, at, ..
            } => {
                if at.is_none() && (screen - *origin).hypot() < DRAG_ACTIVATION_DISTANCE {
                    return false;
                }
                *at = Some(self.view.screen_to_canvas(screen) - *grab);
                true
            }
            Gesture::Idle | Gesture::Palette { .. } => false,
        }
    }

    fn pointer_up(&mut self, screen: Point) -> bool {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Idle => false,
            Gesture::Panning { .. } => true,
            Gesture::Dragging { id, at, .. } => match at {
                Some(at) => self.finish_drag(id, at),
                None => false,
            },
            Gesture::Palette { kind, data } => self.drop_at(kind, data, screen).is_some(),
        }
    }

    fn wheel(&mut self, screen: Point, delta: Vec2, mods: Modifiers) -> bool {
        if mods.command() {
            let step = self.config.zoom.step;
            let factor = if delta.y < 0.0 {
                1.0 + step
            } else if delta.y > 0.0 {
                1.0 / (1.0 + step)
            } else {
                return false;
            };
            let before = self.view.scale;
            let after = self.view.zoom_at(screen, factor, &self.config.zoom);
            log::trace!("wheel zoom {before} -> {after}");
            after != before
        } else {
            self.pan(-delta)
        }
    }

    fn start_pan(&mut self, screen: Point) -> bool {
        self.gesture = Gesture::Panning { last: screen };
        false
    }

    fn finish_drag(&mut self, id: NodeId, at: Point) -> bool {
        let snapped = Position::from(geometry::snap_point(at, self.config.grid_size));
        match self.store.node(id) {
            Some(node) if node.position != snapped => {
                log::trace!("drop {id} at ({}, {})", snapped.x, snapped.y);
                self.store.update_node(id, NodePatch::position(snapped))
            }
            _ => false,
        }
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Step the zoom, keeping the viewport center fixed.
    fn step_zoom(&mut self, zoom_in: bool) -> bool {
        let center = Point::new(self.viewport.width / 2.0, self.viewport.height / 2.0);
        let pinned = self.view.screen_to_canvas(center);
        let before = self.view.scale;
        let after = if zoom_in {
            self.view.zoom_in(&self.config.zoom)
        } else {
            self.view.zoom_out(&self.config.zoom)
        };
        self.view.translate = center.to_vec2() - pinned.to_vec2() * after;
        after != before
    }

    fn pan(&mut self, delta: Vec2) -> bool {
        if delta == Vec2::ZERO {
            return false;
        }
        self.view.pan_by(delta);
        true
    }

    /// Enter or leave fullscreen. A refusal is reported as a warning and
    /// leaves everything else unchanged. Returns the resulting state.
    pub fn toggle_fullscreen(&mut self, backend: &mut dyn Fullscreen) -> bool {
        match fullscreen::toggle(backend) {
            Ok(state) => {
                log::debug!("fullscreen {}", if state { "on" } else { "off" });
                state
            }
            Err(e) => {
                log::warn!("fullscreen toggle failed: {e}");
                self.notifier
                    .notify(Notification::warning(format!("Fullscreen unavailable: {e}")));
                backend.is_fullscreen()
            }
        }
    }

    // ─── Selection & connections ─────────────────────────────────────────

    /// Select a component. In connection mode, selecting a different
    /// component connects the source to it.
    pub fn select_node(&mut self, id: NodeId) -> bool {
        if !self.store.graph().contains(id) {
            return false;
        }
        if let Some(source) = self.connection_source
            && source != id
        {
            self.connect(source, id);
        }
        self.selected = Some(id);
        true
    }

    /// Click on empty canvas: leaves connection mode if active, otherwise
    /// clears the selection.
    pub fn clear_selection(&mut self) -> bool {
        if self.cancel_connection() {
            return true;
        }
        self.selected.take().is_some()
    }

    /// Enter connection mode from the selected component.
    pub fn start_connection(&mut self) -> bool {
        match self.selected {
            Some(id) if self.store.graph().contains(id) => {
                self.begin_connection_from(id);
                true
            }
            _ => false,
        }
    }

    pub fn cancel_connection(&mut self) -> bool {
        let cancelled = self.connection_source.take();
        if let Some(source) = cancelled {
            log::trace!("connection from {source} cancelled");
        }
        cancelled.is_some()
    }

    /// Escape: connection mode first, then a palette drag, then selection.
    pub fn cancel(&mut self) -> bool {
        if self.cancel_connection() || self.cancel_palette_drag() {
            return true;
        }
        self.selected.take().is_some()
    }

    /// Drop selection, connection mode, and any gesture in progress. Used
    /// whenever the graph is swapped out underneath the controller.
    pub fn clear_interaction(&mut self) {
        self.selected = None;
        self.connection_source = None;
        self.gesture = Gesture::Idle;
    }

    /// Replace the canvas with an imported document. Interaction state is
    /// cleared only when the import succeeds.
    pub fn import_document(&mut self, text: &str) -> Result<(), ImportError> {
        self.store.import(text)?;
        self.clear_interaction();
        Ok(())
    }

    /// Empty the canvas.
    pub fn reset_canvas(&mut self) {
        self.clear_interaction();
        self.store.reset();
    }

    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected.take() else {
            return false;
        };
        if self.connection_source == Some(id) {
            self.connection_source = None;
        }
        if matches!(self.gesture, Gesture::Dragging { id: dragged, .. } if dragged == id) {
            self.gesture = Gesture::Idle;
        }
        self.store.remove_node(id)
    }

    /// Apply an edit from the properties surface.
    pub fn update_node(&mut self, id: NodeId, patch: NodePatch) -> bool {
        self.store.update_node(id, patch)
    }

    fn begin_connection_from(&mut self, id: NodeId) {
        self.connection_source = Some(id);
        log::trace!("connecting from {id}");
        let name = self.name_of(id);
        self.notifier.notify(Notification::info(format!(
            "Select a component to connect {name} to"
        )));
    }

    fn connect(&mut self, source: NodeId, target: NodeId) {
        self.connection_source = None;
        let from = self.name_of(source);
        let to = self.name_of(target);
        match self
            .store
            .add_edge(source, target, Some(self.config.default_edge_kind.as_str()))
        {
            Ok(_) => self
                .notifier
                .notify(Notification::success(format!("Connected {from} to {to}"))),
            Err(e) => {
                log::debug!("connection rejected: {e}");
                self.notifier
                    .notify(Notification::error(format!("Cannot connect {from} to {to}: {e}")));
            }
        }
    }

    fn name_of(&self, id: NodeId) -> String {
        self.store
            .node(id)
            .map_or_else(|| id.to_string(), |n| n.display_name().to_string())
    }

    // ─── Palette ─────────────────────────────────────────────────────────

    /// A palette item started dragging over the workspace.
    pub fn begin_palette_drag(&mut self, kind: impl Into<String>, data: Map<String, Value>) {
        self.gesture = Gesture::Palette {
            kind: kind.into(),
            data,
        };
    }

    /// Drop the palette item at a screen point. Outside the workspace the
    /// drag is cancelled.
    pub fn drop_palette(&mut self, screen: Point) -> Option<NodeId> {
        match std::mem::replace(&mut self.gesture, Gesture::Idle) {
            Gesture::Palette { kind, data } => self.drop_at(kind, data, screen),
            other => {
                self.gesture = other;
                None
            }
        }
    }

    pub fn cancel_palette_drag(&mut self) -> bool {
        if matches!(self.gesture, Gesture::Palette { .. }) {
            self.gesture = Gesture::Idle;
            return true;
        }
        false
    }

    /// Place a palette item without a drop point, starting the search at
    /// the top-left grid cell.
    pub fn place_from_palette(
        &mut self,
        kind: impl Into<String>,
        data: Map<String, Value>,
    ) -> Option<NodeId> {
        let grid = self.config.grid_size;
        self.place(kind.into(), data, Point::new(grid, grid))
    }

    fn drop_at(&mut self, kind: String, data: Map<String, Value>, screen: Point) -> Option<NodeId> {
        let inside = screen.x >= 0.0
            && screen.y >= 0.0
            && screen.x <= self.viewport.width
            && screen.y <= self.viewport.height;
        if !inside {
            log::trace!("palette drop outside the workspace, cancelled");
            return None;
        }
        let seed = self.view.screen_to_canvas(screen);
        self.place(kind, data, seed)
    }

    fn place(&mut self, kind: String, mut data: Map<String, Value>, seed: Point) -> Option<NodeId> {
        let name = default_name(&kind, &data);
        data.insert("name".to_string(), Value::String(name.clone()));

        let at = geometry::find_available_position(
            self.store.graph().positions(),
            seed,
            &self.config,
            self.visible_width(),
        );
        let id = self.store.fresh_node_id(&kind);
        let mut node = Node::new(id, kind, at.into());
        node.data = data;

        match self.store.add_node(node) {
            Ok(()) => {
                self.selected = Some(id);
                self.notifier
                    .notify(Notification::success(format!("Added {name}")));
                Some(id)
            }
            Err(e) => {
                log::warn!("could not place {name}: {e}");
                self.notifier
                    .notify(Notification::error(format!("Could not add {name}: {e}")));
                None
            }
        }
    }
}

/// `displayName`, then `name`, then `New <kind>`.
fn default_name(kind: &str, data: &Map<String, Value>) -> String {
    ["displayName", "name"]
        .into_iter()
        .find_map(|key| match data.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_else(|| format!("New {kind}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn controller() -> WorkspaceController {
        WorkspaceController::new(CanvasStore::new(), WorkspaceConfig::default())
    }

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn default_name_precedence() {
        assert_eq!(
            default_name("metric", &data(json!({ "displayName": "DSCR", "name": "x" }))),
            "DSCR"
        );
        assert_eq!(default_name("metric", &data(json!({ "name": "LTV" }))), "LTV");
        assert_eq!(
            default_name("metric", &data(json!({ "displayName": "" }))),
            "New metric"
        );
    }

    #[test]
    fn drag_below_threshold_does_not_move() {
        let mut c = controller();
        let id = c.place_from_palette("metric", Map::new()).unwrap();
        let before = c.store().node(id).unwrap().position;

        c.handle_event(&InputEvent::pointer_down(
            60.0,
            60.0,
            PointerButton::Primary,
            Modifiers::NONE,
        ));
        assert!(!c.handle_event(&InputEvent::pointer_move(64.0, 62.0, Modifiers::NONE)));
        assert!(!c.handle_event(&InputEvent::pointer_up(64.0, 62.0, Modifiers::NONE)));
        assert_eq!(c.store().node(id).unwrap().position, before);
        assert_eq!(c.selected(), Some(id));
    }

    #[test]
    fn zoom_keys_keep_center_fixed() {
        let mut c = controller();
        c.set_viewport(Size::new(800.0, 600.0));
        let center = Point::new(400.0, 300.0);
        let pinned = c.view().screen_to_canvas(center);
        assert!(c.dispatch(ShortcutAction::ZoomIn));
        let after = c.view().screen_to_canvas(center);
        assert!((after - pinned).hypot() < 1e-9);
    }

    #[test]
    fn delete_without_selection_is_noop() {
        let mut c = controller();
        assert!(!c.dispatch(ShortcutAction::Delete));
    }
}
