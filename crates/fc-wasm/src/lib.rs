//! WASM bridge for Finance Canvas: exposes the workspace controller to
//! JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards DOM
//! events to `FcCanvas` and redraws from the JSON views it returns.

mod browser;
mod views;

pub use browser::{BrowserFullscreen, LocalStorage};

use fc_core::document::CanvasDocument;
use fc_core::persist::{DEFAULT_STORAGE_KEY, MemoryStorage};
use fc_core::{CanvasStore, NodeId, NodePatch, Size, WorkspaceConfig};
use fc_editor::{InputEvent, Modifiers, PointerButton, ShortcutMap, WorkspaceController};
use serde_json::json;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
///
/// Holds the workspace controller (and through it the store). All
/// interaction from the page goes through this struct.
#[wasm_bindgen]
pub struct FcCanvas {
    controller: WorkspaceController,
    fullscreen: BrowserFullscreen,
}

#[wasm_bindgen]
impl FcCanvas {
    /// Create a canvas with the default workspace config, restoring the
    /// document saved in `localStorage`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Self {
        Self::build(width, height, WorkspaceConfig::default())
    }

    /// Create a canvas from a JSON workspace config. Missing fields use
    /// defaults; invalid values throw.
    pub fn with_config(width: f64, height: f64, config_json: &str) -> Result<FcCanvas, JsValue> {
        let config = WorkspaceConfig::from_json(config_json)
            .map_err(|e| JsValue::from(js_sys::Error::new(&e)))?;
        Ok(Self::build(width, height, config))
    }

    /// Resize the visible workspace.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.controller.set_viewport(Size::new(width, height));
    }

    // ─── Pointer & wheel ─────────────────────────────────────────────────

    /// Handle pointer down. `button` is `MouseEvent.button`. Returns true
    /// if the workspace needs a redraw.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        button: i16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::pointer_down(
            x,
            y,
            PointerButton::from_dom(button),
            mods(shift, ctrl, alt, meta),
        );
        self.controller.handle_event(&event)
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::pointer_move(x, y, mods(shift, ctrl, alt, meta));
        self.controller.handle_event(&event)
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::pointer_up(x, y, mods(shift, ctrl, alt, meta));
        self.controller.handle_event(&event)
    }

    /// Handle a wheel event: ⌘/Ctrl zooms around the pointer, otherwise
    /// the workspace pans.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_wheel(
        &mut self,
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        let event = InputEvent::wheel(x, y, dx, dy, mods(shift, ctrl, alt, meta));
        self.controller.handle_event(&event)
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a key press. Returns a JSON string:
    /// `{"changed":bool,"action":"<action_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let Some(action) = ShortcutMap::resolve(key, ctrl, shift, alt, meta) else {
            return json!({ "changed": false, "action": "none" }).to_string();
        };
        let changed = self.controller.dispatch(action);
        json!({ "changed": changed, "action": action.name() }).to_string()
    }

    pub fn handle_key_up(&mut self, key: &str) -> bool {
        ShortcutMap::resolve_release(key).is_some_and(|action| self.controller.dispatch(action))
    }

    // ─── Palette ─────────────────────────────────────────────────────────

    /// A palette item started dragging. `data_json` is the item's default
    /// data object. Returns false if it is not a JSON object.
    pub fn begin_palette_drag(&mut self, kind: &str, data_json: &str) -> bool {
        match views::parse_object(data_json) {
            Some(data) => {
                self.controller.begin_palette_drag(kind, data);
                true
            }
            None => false,
        }
    }

    /// Drop the dragged palette item. Returns the new component id, or an
    /// empty string if the drop was cancelled.
    pub fn drop_palette(&mut self, x: f64, y: f64) -> String {
        self.controller
            .drop_palette(fc_core::Point::new(x, y))
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    pub fn cancel_palette_drag(&mut self) -> bool {
        self.controller.cancel_palette_drag()
    }

    /// Add a palette item at the first free slot (click instead of drag).
    /// Returns the new component id, or an empty string on failure.
    pub fn place_from_palette(&mut self, kind: &str, data_json: &str) -> String {
        let Some(data) = views::parse_object(data_json) else {
            return String::new();
        };
        self.controller
            .place_from_palette(kind, data)
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    // ─── Selection & connections ─────────────────────────────────────────

    /// Get the selected component id (empty string if none).
    pub fn get_selected_id(&self) -> String {
        self.controller
            .selected()
            .map(|id| id.as_str().to_string())
            .unwrap_or_default()
    }

    /// Select a component by id, completing a pending connection.
    pub fn select_by_id(&mut self, node_id: &str) -> bool {
        self.controller.select_node(NodeId::intern(node_id))
    }

    pub fn clear_selection(&mut self) -> bool {
        self.controller.clear_selection()
    }

    pub fn start_connection(&mut self) -> bool {
        self.controller.start_connection()
    }

    pub fn cancel_connection(&mut self) -> bool {
        self.controller.cancel_connection()
    }

    pub fn is_connecting(&self) -> bool {
        self.controller.is_connecting()
    }

    pub fn delete_selected(&mut self) -> bool {
        self.controller.delete_selected()
    }

    pub fn remove_connection(&mut self, connection_id: &str) -> bool {
        self.controller
            .store_mut()
            .remove_edge(NodeId::intern(connection_id))
    }

    /// Apply a properties-panel edit:
    /// `{"position":{"x":..,"y":..},"data":{..}}`, both optional.
    pub fn update_node_json(&mut self, node_id: &str, patch_json: &str) -> bool {
        match serde_json::from_str::<NodePatch>(patch_json) {
            Ok(patch) => self.controller.update_node(NodeId::intern(node_id), patch),
            Err(e) => {
                log::warn!("ignoring malformed patch for {node_id}: {e}");
                false
            }
        }
    }

    // ─── Document ────────────────────────────────────────────────────────

    /// The canvas document as pretty-printed JSON.
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.controller
            .store()
            .export()
            .map_err(|e| js_sys::Error::new(&e.to_string()).into())
    }

    /// Replace the canvas with a document. Throws on invalid input, leaving
    /// the current canvas untouched.
    pub fn import_json(&mut self, text: &str) -> Result<(), JsValue> {
        self.controller
            .import_document(text)
            .map_err(|e| js_sys::Error::new(&e.to_string()).into())
    }

    pub fn reset_canvas(&mut self) {
        self.controller.reset_canvas();
    }

    // ─── Views ───────────────────────────────────────────────────────────

    /// Components with their on-canvas boxes, in paint order.
    pub fn components_json(&self) -> String {
        let selected = self.controller.selected();
        let source = self.controller.connection_source();
        let components = views::components(
            self.controller.store(),
            self.controller.config(),
            selected.as_ref().map(NodeId::as_str),
            source.as_ref().map(NodeId::as_str),
        );
        serde_json::Value::Array(components).to_string()
    }

    /// Connections with SVG path data.
    pub fn connection_paths_json(&self) -> String {
        let paths = views::connections(self.controller.store(), self.controller.config());
        serde_json::Value::Array(paths).to_string()
    }

    /// Current pan/zoom and canvas size.
    pub fn view_json(&self) -> String {
        let view = views::transform(self.controller.view(), self.controller.canvas_size());
        serde_json::to_string(&view).unwrap_or_default()
    }

    pub fn summary_json(&self) -> String {
        serde_json::to_string(&self.controller.store().summary()).unwrap_or_default()
    }

    // ─── Notifications ───────────────────────────────────────────────────

    pub fn notifications_json(&self) -> String {
        serde_json::to_string(self.controller.notifier().entries()).unwrap_or_default()
    }

    pub fn unread_notifications(&self) -> usize {
        self.controller.notifier().unread_count()
    }

    pub fn mark_notification_read(&mut self, id: u64) -> bool {
        self.controller.notifier_mut().mark_read(id)
    }

    pub fn remove_notification(&mut self, id: u64) -> bool {
        self.controller.notifier_mut().remove(id)
    }

    pub fn dismiss_notifications(&mut self) {
        self.controller.notifier_mut().dismiss_all();
    }

    pub fn clear_notifications(&mut self) {
        self.controller.notifier_mut().clear();
    }

    // ─── Fullscreen ──────────────────────────────────────────────────────

    /// Toggle fullscreen. Returns the resulting state; a refusal leaves a
    /// warning notification instead of throwing.
    pub fn toggle_fullscreen(&mut self) -> bool {
        self.controller.toggle_fullscreen(&mut self.fullscreen)
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl FcCanvas {
    fn build(width: f64, height: f64, config: WorkspaceConfig) -> Self {
        console_error_panic_hook_setup();
        browser::console_log_setup();

        let store = match LocalStorage::open() {
            Ok(storage) => CanvasStore::open(storage, DEFAULT_STORAGE_KEY),
            Err(e) => {
                log::warn!("localStorage unavailable, canvas will not persist: {e}");
                CanvasStore::open(MemoryStorage::new(), DEFAULT_STORAGE_KEY)
            }
        };
        let mut controller = WorkspaceController::new(store, config);
        controller.set_viewport(Size::new(width, height));

        Self {
            controller,
            fullscreen: BrowserFullscreen::new(),
        }
    }
}

fn mods(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Finance Canvas WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone functions ────────────────────────────────────────────────

/// Validate document text without touching any canvas. Returns an empty
/// string if it would import, otherwise the error message.
#[wasm_bindgen]
pub fn validate_document(text: &str) -> String {
    match CanvasDocument::parse(text).and_then(CanvasDocument::into_graph) {
        Ok(_) => String::new(),
        Err(e) => e.to_string(),
    }
}
