//! Canvas configuration.
//!
//! Everything the host wires up at construction: grid pitch, zoom limits,
//! registered element templates, collision rules, and how a component's
//! container sits inside it. Loadable from JSON; every field has a default.

use crate::error::Result;
use crate::registry::{ElementRegistry, ElementTemplate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomConfig {
    pub default: f32,
    pub min: f32,
    pub max: f32,
    /// Zoom change per wheel tick.
    pub step: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            default: 1.0,
            min: 0.25,
            max: 4.0,
            step: 0.25,
        }
    }
}

impl ZoomConfig {
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

/// Space between a component's box and its container area, in canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ContainerInsets {
    #[serde(default)]
    pub top: f32,
    #[serde(default)]
    pub right: f32,
    #[serde(default)]
    pub bottom: f32,
    #[serde(default)]
    pub left: f32,
}

/// Collision rules: component label → labels it must not be dragged onto.
/// An empty list means "every component".
pub type CollisionRules = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Display-only grid cell pitch.
    pub size: f32,
    pub zoom: ZoomConfig,
    pub elements: Vec<ElementTemplate>,
    pub collision: CollisionRules,
    pub container_insets: ContainerInsets,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5.0,
            zoom: ZoomConfig::default(),
            elements: Vec::new(),
            collision: CollisionRules::new(),
            container_insets: ContainerInsets::default(),
        }
    }
}

impl GridConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: GridConfig = serde_json::from_str(text)?;
        log::debug!(
            "loaded grid config: {} element templates, {} collision rules",
            config.elements.len(),
            config.collision.len()
        );
        Ok(config)
    }

    pub fn registry(&self) -> ElementRegistry {
        self.elements.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    #[test]
    fn empty_object_gives_defaults() {
        let config = GridConfig::from_json("{}").unwrap();
        assert_eq!(config, GridConfig::default());
    }

    #[test]
    fn zoom_clamp_respects_limits() {
        let zoom = ZoomConfig::default();
        assert_eq!(zoom.clamp(10.0), 4.0);
        assert_eq!(zoom.clamp(0.0), 0.25);
        assert_eq!(zoom.clamp(1.5), 1.5);
    }

    #[test]
    fn parses_collision_and_insets() {
        let config = GridConfig::from_json(
            r#"{
                "size": 10,
                "zoom": {"default": 5, "min": 1, "max": 50, "step": 1},
                "collision": {"group": ["group"], "block": []},
                "containerInsets": {"top": 20}
            }"#,
        )
        .unwrap();
        assert_eq!(config.size, 10.0);
        assert_eq!(config.zoom.max, 50.0);
        assert_eq!(config.collision["group"], vec!["group".to_string()]);
        assert!(config.collision["block"].is_empty());
        assert_eq!(config.container_insets.top, 20.0);
        assert_eq!(config.container_insets.left, 0.0);
    }

    #[test]
    fn malformed_json_is_a_configuration_error() {
        let err = GridConfig::from_json("{\"size\": \"big\"}").unwrap_err();
        assert!(matches!(err, GridError::InvalidData(_)));
        assert!(err.is_configuration());
    }
}
