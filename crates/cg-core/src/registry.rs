//! Element templates and the `(type, label)` keyed registry.
//!
//! A template is the configuration of one node kind: default size, colors,
//! resizable edges, container and ports for components; path shape for
//! connections. `ElementRegistry::instantiate` is the only factory for
//! elements, so every element starts from a registered template.

use crate::error::{GridError, Result};
use crate::geometry::{Position, Rgb, Size};
use crate::id::ElementId;
use crate::model::*;
use serde::{Deserialize, Serialize};

fn default_background() -> Rgb {
    Rgb::WHITE
}

fn default_text() -> Rgb {
    Rgb::BLACK
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentTemplate {
    pub label: String,
    pub size: Size,
    #[serde(default)]
    pub min_size: Size,
    #[serde(default)]
    pub resize: Vec<ResizeEdge>,
    #[serde(default)]
    pub container: bool,
    #[serde(default)]
    pub ports: Vec<Port>,
    #[serde(default = "default_background")]
    pub default_background_color: Rgb,
    #[serde(default = "default_text")]
    pub default_text_color: Rgb,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTemplate {
    pub label: String,
    #[serde(default)]
    pub shape: ConnectionShape,
    #[serde(default = "default_background")]
    pub default_background_color: Rgb,
    #[serde(default = "default_text")]
    pub default_text_color: Rgb,
}

/// One registered node kind, tagged by element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementTemplate {
    Component(ComponentTemplate),
    Connection(ConnectionTemplate),
}

impl ElementTemplate {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Component(_) => ElementType::Component,
            Self::Connection(_) => ElementType::Connection,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Component(t) => &t.label,
            Self::Connection(t) => &t.label,
        }
    }

    /// Build a fresh element with id `id` at the origin.
    pub fn build(&self, id: ElementId) -> Element {
        match self {
            Self::Component(t) => Element {
                id,
                label: t.label.clone(),
                position: Position::ORIGIN,
                min_size: t.min_size,
                size: t.size,
                background_color: t.default_background_color,
                text_color: t.default_text_color,
                moving: false,
                body: ElementBody::Component(ComponentState {
                    resizing: None,
                    focused: false,
                    resize_edges: t.resize.iter().copied().collect(),
                    has_container: t.container,
                    ports: t.ports.iter().cloned().collect(),
                }),
            },
            Self::Connection(t) => Element {
                id,
                label: t.label.clone(),
                position: Position::ORIGIN,
                min_size: Size::default(),
                size: Size::default(),
                background_color: t.default_background_color,
                text_color: t.default_text_color,
                moving: false,
                body: ElementBody::Connection(ConnectionState::new(t.shape)),
            },
        }
    }
}

/// Registered templates, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    templates: Vec<ElementTemplate>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. A later registration for the same `(type, label)`
    /// replaces the earlier one.
    pub fn register(&mut self, template: ElementTemplate) {
        let key = (template.element_type(), template.label().to_string());
        if let Some(existing) = self
            .templates
            .iter_mut()
            .find(|t| t.element_type() == key.0 && t.label() == key.1)
        {
            *existing = template;
        } else {
            self.templates.push(template);
        }
    }

    pub fn lookup(&self, element_type: ElementType, label: &str) -> Result<&ElementTemplate> {
        self.templates
            .iter()
            .find(|t| t.element_type() == element_type && t.label() == label)
            .ok_or_else(|| GridError::UnregisteredElement {
                element_type,
                label: label.to_string(),
            })
    }

    pub fn instantiate(
        &self,
        element_type: ElementType,
        label: &str,
        id: ElementId,
    ) -> Result<Element> {
        Ok(self.lookup(element_type, label)?.build(id))
    }

    /// Label of the first registered connection template.
    pub fn first_connection_label(&self) -> Option<&str> {
        self.templates
            .iter()
            .find(|t| t.element_type() == ElementType::Connection)
            .map(ElementTemplate::label)
    }

    pub fn templates(&self) -> &[ElementTemplate] {
        &self.templates
    }
}

impl FromIterator<ElementTemplate> for ElementRegistry {
    fn from_iter<I: IntoIterator<Item = ElementTemplate>>(iter: I) -> Self {
        let mut registry = Self::new();
        for template in iter {
            registry.register(template);
        }
        registry
    }
}
