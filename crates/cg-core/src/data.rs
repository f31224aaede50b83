//! Host-facing data interchange.
//!
//! The serialized tree is plain JSON with camelCase keys. Connections carry
//! the common element fields plus their anchors and end point; an anchor of 0
//! means "unattached". Module data is opaque to the core.

use crate::error::Result;
use crate::geometry::{Position, Rgb, Size, Vector};
use crate::id::ElementId;
use crate::model::{Element, ElementBody, ElementType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque per-module data.
pub type ModuleData = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementData {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub element_type: ElementType,
    pub label: String,
    pub position: Position,
    pub size: Size,
    pub background_color: Rgb,
    pub text_color: Rgb,
    /// Component whose container holds this element; absent on the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<ElementId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionData {
    #[serde(flatten)]
    pub element: ElementData,
    pub start_anchor_id: u32,
    pub end_anchor_id: u32,
    pub end_position: Position,
    /// Port indices on the anchors, absent for ends that are not on a port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_port: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_port: Option<usize>,
}

/// One entry of `GridData::elements`. Connections are recognised by their
/// anchor fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementRecord {
    Connection(ConnectionData),
    Element(ElementData),
}

impl ElementRecord {
    pub fn element(&self) -> &ElementData {
        match self {
            Self::Connection(c) => &c.element,
            Self::Element(e) => e,
        }
    }

    /// Serialize one live element.
    pub fn from_element(element: &Element, parent_id: Option<ElementId>) -> Self {
        let base = ElementData {
            id: element.id,
            element_type: element.element_type(),
            label: element.label.clone(),
            position: element.position,
            size: element.size,
            background_color: element.background_color,
            text_color: element.text_color,
            parent_id,
        };
        match &element.body {
            ElementBody::Component(_) => Self::Element(base),
            ElementBody::Connection(c) => Self::Connection(ConnectionData {
                element: base,
                start_anchor_id: ElementId::raw_or_zero(c.start_anchor),
                end_anchor_id: ElementId::raw_or_zero(c.end_anchor),
                end_position: c.end_position(),
                start_port: c.start_port,
                end_port: c.end_port,
            }),
        }
    }

    /// Copy the persisted fields onto a freshly instantiated element.
    pub fn apply_to(&self, element: &mut Element) -> Result<()> {
        let data = self.element();
        element.id = data.id;
        element.position = data.position;
        element.size = data.size;
        element.background_color = data.background_color;
        element.text_color = data.text_color;
        if let Self::Connection(c) = self {
            let state = element.connection_mut()?;
            state.start_anchor = ElementId::new(c.start_anchor_id);
            state.end_anchor = ElementId::new(c.end_anchor_id);
            state.start_port = c.start_port;
            state.end_port = c.end_port;
            element.route_to(c.end_position)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    pub current_element_id: u32,
    pub zoom: f32,
    pub offset: Vector,
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub modules: ModuleData,
}

/// The whole application: canvas plus app-level modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppData {
    pub grid: GridData,
    #[serde(default)]
    pub modules: ModuleData,
}

impl AppData {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
