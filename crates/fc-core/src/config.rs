//! Per-workspace layout and zoom settings.

use serde::{Deserialize, Serialize};

/// Zoom stepping and clamping bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomLimits {
    pub step: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            step: 0.1,
            min: 0.25,
            max: 2.0,
        }
    }
}

/// Workspace constants: grid spacing, component footprint, zoom limits.
///
/// All sizes are in canvas units. Every component is laid out with the
/// same fixed footprint so placement and connection geometry never need
/// to look at the component's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    pub grid_size: f64,
    pub component_width: f64,
    pub component_height: f64,
    /// Gap kept between automatically placed components.
    pub margin: f64,
    pub zoom: ZoomLimits,
    /// Kind assigned to connections created without an explicit kind.
    pub default_edge_kind: String,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            grid_size: 40.0,
            component_width: 280.0,
            component_height: 120.0,
            margin: 40.0,
            zoom: ZoomLimits::default(),
            default_edge_kind: crate::model::DEFAULT_EDGE_KIND.to_string(),
        }
    }
}

impl WorkspaceConfig {
    /// Parse a config from JSON; missing fields fall back to defaults.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(text).map_err(|e| e.to_string())?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants placement and zoom rely on.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.grid_size > 0.0) {
            return Err(format!("grid_size must be positive, got {}", self.grid_size));
        }
        if self.component_width < 0.0 || self.component_height < 0.0 || self.margin < 0.0 {
            return Err("component size and margin must not be negative".to_string());
        }
        let z = &self.zoom;
        if !(z.min > 0.0) || z.min > z.max || !(z.step > 0.0) {
            return Err(format!(
                "invalid zoom limits: step {} min {} max {}",
                z.step, z.min, z.max
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorkspaceConfig::from_json(r#"{ "grid_size": 20, "zoom": { "max": 3 } }"#)
            .unwrap();
        assert_eq!(config.grid_size, 20.0);
        assert_eq!(config.component_width, 280.0);
        assert_eq!(config.zoom.max, 3.0);
        assert_eq!(config.zoom.min, 0.25);
    }

    #[test]
    fn rejects_non_positive_grid() {
        assert!(WorkspaceConfig::from_json(r#"{ "grid_size": 0 }"#).is_err());
    }

    #[test]
    fn rejects_inverted_zoom_limits() {
        assert!(WorkspaceConfig::from_json(r#"{ "zoom": { "min": 3, "max": 2 } }"#).is_err());
    }
}
