//! JSON views handed to the page for rendering.

use fc_core::geometry::{self, ViewTransform};
use fc_core::{CanvasStore, Size, WorkspaceConfig};
use serde::Serialize;
use serde_json::{Map, Value};

/// A component as the page draws it: the node plus its snapped box.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentView<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    pub title: String,
    pub name: &'a str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub selected: bool,
    pub connecting: bool,
    pub data: &'a Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct ConnectionView<'a> {
    pub id: &'a str,
    pub from: &'a str,
    pub to: &'a str,
    #[serde(rename = "type")]
    pub kind: &'a str,
    /// SVG path data.
    pub d: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformView {
    pub scale: f64,
    pub x: f64,
    pub y: f64,
    pub zoom_label: String,
    pub canvas_width: f64,
    pub canvas_height: f64,
}

pub fn components(
    store: &CanvasStore,
    config: &WorkspaceConfig,
    selected: Option<&str>,
    source: Option<&str>,
) -> Vec<Value> {
    store
        .nodes()
        .map(|node| {
            let rect = geometry::component_rect(node.position, config);
            let id = node.id.as_str();
            let view = ComponentView {
                id,
                kind: &node.kind,
                title: node.title(),
                name: node.display_name(),
                x: rect.x0,
                y: rect.y0,
                width: rect.width(),
                height: rect.height(),
                selected: selected == Some(id),
                connecting: source == Some(id),
                data: &node.data,
            };
            serde_json::to_value(view).unwrap_or(Value::Null)
        })
        .collect()
}

pub fn connections(store: &CanvasStore, config: &WorkspaceConfig) -> Vec<Value> {
    geometry::connection_paths(store.graph(), config)
        .into_iter()
        .filter_map(|(id, path)| {
            let edge = store.edge(id)?;
            let view = ConnectionView {
                id: edge.id.as_str(),
                from: edge.from.as_str(),
                to: edge.to.as_str(),
                kind: &edge.kind,
                d: path.to_svg(),
            };
            serde_json::to_value(view).ok()
        })
        .collect()
}

pub fn transform(view: &ViewTransform, canvas: Size) -> TransformView {
    TransformView {
        scale: view.scale,
        x: view.translate.x,
        y: view.translate.y,
        zoom_label: view.zoom_label(),
        canvas_width: canvas.width,
        canvas_height: canvas.height,
    }
}

/// Parse a JSON object argument. Anything else yields `None`.
pub fn parse_object(json: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(json) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}
