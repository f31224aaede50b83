//! The rendering collaborator, seen from the engine.
//!
//! The engine never draws. It creates, styles, re-parents, and removes
//! surface nodes, and the only thing it ever reads back is geometry:
//! bounding rects from the surface and container bounds through [`Measure`].

use cg_core::config::ContainerInsets;
use cg_core::geometry::Rect;
use cg_core::id::ElementId;
use cg_core::model::{ElementType, Parent, Scene};
use std::collections::BTreeMap;

/// A node on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SurfaceNode {
    /// The canvas itself (carries view-wide properties like zoom).
    Canvas,
    Element(ElementId),
}

pub trait Surface {
    fn create_node(&mut self, id: ElementId, element_type: ElementType, label: &str);
    fn remove_node(&mut self, id: ElementId);
    fn reparent(&mut self, id: ElementId, parent: Parent);
    fn set_style(&mut self, node: SurfaceNode, property: &str, value: String);
    fn bounding_rect(&self, node: SurfaceNode) -> Option<Rect>;
}

/// Container geometry query. Returns the container area of `owner` relative
/// to the owner's top-left corner, or `None` when it has no container.
pub trait Measure {
    fn container_bounds(&self, scene: &Scene, owner: ElementId) -> Option<Rect>;
}

/// Container = owner box shrunk by fixed insets.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoxMeasure {
    pub insets: ContainerInsets,
}

impl BoxMeasure {
    pub fn new(insets: ContainerInsets) -> Self {
        Self { insets }
    }
}

impl Measure for BoxMeasure {
    fn container_bounds(&self, scene: &Scene, owner: ElementId) -> Option<Rect> {
        scene.container_of(owner)?;
        let size = scene.get(owner).ok()?.size;
        let i = self.insets;
        Some(Rect::new(
            i.left,
            i.top,
            (size.w - i.left - i.right).max(0.0),
            (size.h - i.top - i.bottom).max(0.0),
        ))
    }
}

// ─── Headless surface ────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    pub element_type: ElementType,
    pub label: String,
    pub parent: Parent,
    pub styles: BTreeMap<String, String>,
}

/// In-memory surface for tests and headless hosts. Bounding rects are read
/// back from the `--x/--y/--w/--h` style properties.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub nodes: BTreeMap<ElementId, HeadlessNode>,
    pub canvas_styles: BTreeMap<String, String>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn style(&self, node: SurfaceNode, property: &str) -> Option<&str> {
        let styles = match node {
            SurfaceNode::Canvas => &self.canvas_styles,
            SurfaceNode::Element(id) => &self.nodes.get(&id)?.styles,
        };
        styles.get(property).map(String::as_str)
    }

    fn number(&self, node: SurfaceNode, property: &str) -> Option<f32> {
        self.style(node, property)?.parse().ok()
    }
}

impl Surface for HeadlessSurface {
    fn create_node(&mut self, id: ElementId, element_type: ElementType, label: &str) {
        self.nodes.insert(
            id,
            HeadlessNode {
                element_type,
                label: label.to_string(),
                parent: Parent::Root,
                styles: BTreeMap::new(),
            },
        );
    }

    fn remove_node(&mut self, id: ElementId) {
        self.nodes.remove(&id);
    }

    fn reparent(&mut self, id: ElementId, parent: Parent) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
    }

    fn set_style(&mut self, node: SurfaceNode, property: &str, value: String) {
        let styles = match node {
            SurfaceNode::Canvas => &mut self.canvas_styles,
            SurfaceNode::Element(id) => match self.nodes.get_mut(&id) {
                Some(n) => &mut n.styles,
                None => return,
            },
        };
        styles.insert(property.to_string(), value);
    }

    fn bounding_rect(&self, node: SurfaceNode) -> Option<Rect> {
        Some(Rect::new(
            self.number(node, "--x")?,
            self.number(node, "--y")?,
            self.number(node, "--w")?,
            self.number(node, "--h")?,
        ))
    }
}
