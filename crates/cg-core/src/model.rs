//! Core scene data model.
//!
//! The scene is an arena of elements held in a petgraph `StableDiGraph`.
//! Graph edges encode containment only: root → element, component →
//! its container, container → nested element. Connections always live on the
//! root. Z-order (paint order) is kept per parent in `child_order`; the last
//! child paints on top.
//!
//! Ownership is explicit: elements are looked up through `id_index`,
//! containers through `container_index` (keyed by the owning component), and
//! ports through a [`PortRef`] naming their component.

use crate::error::{GridError, Result};
use crate::geometry::{Position, Rect, Rgb, Size, Vector};
use crate::id::ElementId;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

// ─── Element kinds ───────────────────────────────────────────────────────

/// The element-type tag used by the registry and the data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Component,
    Connection,
}

impl ElementType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Connection => "connection",
        }
    }
}

/// Which edge of a component a resize gesture drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
}

impl ResizeEdge {
    pub const ALL: [ResizeEdge; 4] = [Self::Left, Self::Right, Self::Top, Self::Bottom];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

/// A named, directional attachment point on a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Port {
    pub label: String,
    pub direction: PortDirection,
}

/// Addresses a port through its owning component. Reparenting the component
/// never invalidates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub component: ElementId,
    pub index: usize,
}

// ─── Connection paths ────────────────────────────────────────────────────

/// How a connection is drawn between its two endpoints. Every shape derives
/// its display attributes from the start and end points only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionShape {
    #[default]
    Line,
}

/// Derived display attributes of a connection path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PathGeometry {
    /// Rotation in degrees; 0° points down (top-anchored rotation).
    pub angle: f32,
    pub length: f32,
}

impl ConnectionShape {
    pub fn geometry(self, start: Position, end: Position) -> PathGeometry {
        match self {
            Self::Line => {
                let d = end - start;
                PathGeometry {
                    angle: -d.x.atan2(d.y).to_degrees(),
                    length: d.length(),
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionState {
    pub start_anchor: Option<ElementId>,
    pub end_anchor: Option<ElementId>,
    /// Port index on the start anchor, when the edge was drawn from a port.
    pub start_port: Option<usize>,
    pub end_port: Option<usize>,
    pub shape: ConnectionShape,
    end_position: Position,
    geometry: PathGeometry,
}

impl ConnectionState {
    pub fn new(shape: ConnectionShape) -> Self {
        Self {
            start_anchor: None,
            end_anchor: None,
            start_port: None,
            end_port: None,
            shape,
            end_position: Position::ORIGIN,
            geometry: PathGeometry::default(),
        }
    }

    pub fn end_position(&self) -> Position {
        self.end_position
    }

    pub fn geometry(&self) -> PathGeometry {
        self.geometry
    }

    /// The only way to change the end point: geometry is recomputed with it.
    pub fn route(&mut self, start: Position, end: Position) {
        self.end_position = end;
        self.geometry = self.shape.geometry(start, end);
    }

    pub fn is_anchored_to(&self, id: ElementId) -> bool {
        self.start_anchor == Some(id) || self.end_anchor == Some(id)
    }
}

// ─── Components ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComponentState {
    /// Edge being dragged by an active resize gesture.
    pub resizing: Option<ResizeEdge>,
    pub focused: bool,
    /// Edges that accept resize gestures.
    pub resize_edges: SmallVec<[ResizeEdge; 4]>,
    pub has_container: bool,
    pub ports: SmallVec<[Port; 4]>,
}

impl ComponentState {
    pub fn can_resize(&self, edge: ResizeEdge) -> bool {
        self.resize_edges.contains(&edge)
    }

    pub fn ports_with(&self, direction: PortDirection) -> impl Iterator<Item = (usize, &Port)> {
        self.ports
            .iter()
            .enumerate()
            .filter(move |(_, p)| p.direction == direction)
    }
}

// ─── Elements ────────────────────────────────────────────────────────────

/// Variant-specific state. The element type is derived from the variant, so
/// the tag and the data can never disagree.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementBody {
    Component(ComponentState),
    Connection(ConnectionState),
}

/// A positioned, sized entity on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: ElementId,
    pub label: String,
    /// Parent-relative for components inside a container, canvas-space
    /// otherwise. For connections this is the start point.
    pub position: Position,
    pub min_size: Size,
    pub size: Size,
    pub background_color: Rgb,
    pub text_color: Rgb,
    /// Set while the element follows the pointer.
    pub moving: bool,
    pub body: ElementBody,
}

impl Element {
    pub fn element_type(&self) -> ElementType {
        match self.body {
            ElementBody::Component(_) => ElementType::Component,
            ElementBody::Connection(_) => ElementType::Connection,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(self.body, ElementBody::Component(_))
    }

    pub fn rect(&self) -> Rect {
        Rect::from_parts(self.position, self.size)
    }

    pub fn component(&self) -> Result<&ComponentState> {
        match &self.body {
            ElementBody::Component(c) => Ok(c),
            ElementBody::Connection(_) => Err(GridError::NotAComponent(self.id)),
        }
    }

    pub fn component_mut(&mut self) -> Result<&mut ComponentState> {
        match &mut self.body {
            ElementBody::Component(c) => Ok(c),
            ElementBody::Connection(_) => Err(GridError::NotAComponent(self.id)),
        }
    }

    pub fn connection(&self) -> Result<&ConnectionState> {
        match &self.body {
            ElementBody::Connection(c) => Ok(c),
            ElementBody::Component(_) => Err(GridError::NotAConnection(self.id)),
        }
    }

    pub fn connection_mut(&mut self) -> Result<&mut ConnectionState> {
        match &mut self.body {
            ElementBody::Connection(c) => Ok(c),
            ElementBody::Component(_) => Err(GridError::NotAConnection(self.id)),
        }
    }

    /// Recompute a connection's path from its stored start toward `end`.
    pub fn route_to(&mut self, end: Position) -> Result<()> {
        let start = self.position;
        self.connection_mut()?.route(start, end);
        Ok(())
    }

    /// Resize along `edge` by a drag `delta` (canvas units, `last - current`).
    ///
    /// The delta is clipped so the size lands exactly on `min_size` instead of
    /// undershooting it. For left/top the position moves by the same amount,
    /// keeping the opposite edge fixed. Returns the displacement applied to the
    /// position, in the same `position - delta` convention as a move.
    pub fn resize(&mut self, edge: ResizeEdge, delta: Vector) -> Vector {
        let (size, min) = (self.size, self.min_size);
        match edge {
            ResizeEdge::Left => {
                let dx = delta.x.max(min.w - size.w);
                self.size.w = size.w + dx;
                self.position.x -= dx;
                Vector::new(dx, 0.0)
            }
            ResizeEdge::Right => {
                let dx = delta.x.min(size.w - min.w);
                self.size.w = size.w - dx;
                Vector::ZERO
            }
            ResizeEdge::Top => {
                let dy = delta.y.max(min.h - size.h);
                self.size.h = size.h + dy;
                self.position.y -= dy;
                Vector::new(0.0, dy)
            }
            ResizeEdge::Bottom => {
                let dy = delta.y.min(size.h - min.h);
                self.size.h = size.h - dy;
                Vector::ZERO
            }
        }
    }
}

// ─── Scene arena ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum SceneItem {
    Root,
    Element(Element),
    /// The child area of a component. Positionless: its bounds come from the
    /// renderer's measurement of the owning component.
    Container { owner: ElementId },
}

/// Where an element is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parent {
    Root,
    /// Inside the container owned by this component.
    Container(ElementId),
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub graph: StableDiGraph<SceneItem, ()>,
    pub root: NodeIndex,
    id_index: HashMap<ElementId, NodeIndex>,
    container_index: HashMap<ElementId, NodeIndex>,
    child_order: HashMap<NodeIndex, Vec<NodeIndex>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(SceneItem::Root);
        Self {
            graph,
            root,
            id_index: HashMap::new(),
            container_index: HashMap::new(),
            child_order: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.id_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_index.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.id_index.contains_key(&id)
    }

    pub fn index_of(&self, id: ElementId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    pub fn container_of(&self, owner: ElementId) -> Option<NodeIndex> {
        self.container_index.get(&owner).copied()
    }

    fn parent_node(&self, parent: Parent) -> Result<NodeIndex> {
        match parent {
            Parent::Root => Ok(self.root),
            Parent::Container(owner) => {
                if !self.contains(owner) {
                    return Err(GridError::UnknownElement(owner));
                }
                self.container_of(owner)
                    .ok_or(GridError::NoContainer(owner))
            }
        }
    }

    /// Attach `element` at the top of `parent`'s z-order. Components
    /// configured with a container get their container node here.
    pub fn insert(&mut self, parent: Parent, element: Element) -> Result<NodeIndex> {
        let parent_idx = self.parent_node(parent)?;
        if parent_idx != self.root && !element.is_component() {
            return Err(GridError::NotAComponent(element.id));
        }
        let id = element.id;
        let has_container = matches!(
            &element.body,
            ElementBody::Component(c) if c.has_container
        );

        let idx = self.graph.add_node(SceneItem::Element(element));
        self.graph.add_edge(parent_idx, idx, ());
        self.child_order.entry(parent_idx).or_default().push(idx);
        self.id_index.insert(id, idx);

        if has_container {
            let container = self.graph.add_node(SceneItem::Container { owner: id });
            self.graph.add_edge(idx, container, ());
            self.child_order.entry(idx).or_default().push(container);
            self.container_index.insert(id, container);
        }
        Ok(idx)
    }

    /// Detach and drop an element with everything it owns (container and
    /// nested elements). Returns the ids of all removed elements, the
    /// requested one first.
    pub fn remove(&mut self, id: ElementId) -> Result<Vec<ElementId>> {
        let idx = self.index_of(id).ok_or(GridError::UnknownElement(id))?;
        if let Some(parent) = self.parent_index(idx)
            && let Some(order) = self.child_order.get_mut(&parent)
        {
            order.retain(|&c| c != idx);
        }

        let mut removed = Vec::new();
        let mut stack = vec![idx];
        while let Some(node) = stack.pop() {
            if let Some(children) = self.child_order.remove(&node) {
                stack.extend(children);
            }
            match self.graph.remove_node(node) {
                Some(SceneItem::Element(e)) => {
                    self.id_index.remove(&e.id);
                    removed.push(e.id);
                }
                Some(SceneItem::Container { owner }) => {
                    self.container_index.remove(&owner);
                }
                Some(SceneItem::Root) | None => {}
            }
        }
        Ok(removed)
    }

    /// Remove every element, keeping the root.
    pub fn clear(&mut self) {
        let top: Vec<ElementId> = self.elements_in(Parent::Root);
        for id in top {
            // Ids come straight from the root's child list.
            let _ = self.remove(id);
        }
    }

    pub fn get(&self, id: ElementId) -> Result<&Element> {
        let idx = self.index_of(id).ok_or(GridError::UnknownElement(id))?;
        match &self.graph[idx] {
            SceneItem::Element(e) => Ok(e),
            _ => Err(GridError::UnknownElement(id)),
        }
    }

    pub fn get_mut(&mut self, id: ElementId) -> Result<&mut Element> {
        let idx = self.index_of(id).ok_or(GridError::UnknownElement(id))?;
        match &mut self.graph[idx] {
            SceneItem::Element(e) => Ok(e),
            _ => Err(GridError::UnknownElement(id)),
        }
    }

    /// Get the parent index of a node.
    pub fn parent_index(&self, idx: NodeIndex) -> Option<NodeIndex> {
        self.graph
            .neighbors_directed(idx, petgraph::Direction::Incoming)
            .next()
    }

    /// Where `id` is attached. An element with no parent is a lifecycle bug.
    pub fn parent_of(&self, id: ElementId) -> Result<Parent> {
        let idx = self.index_of(id).ok_or(GridError::UnknownElement(id))?;
        let parent = self.parent_index(idx).ok_or(GridError::Detached(id))?;
        match &self.graph[parent] {
            SceneItem::Root => Ok(Parent::Root),
            SceneItem::Container { owner } => Ok(Parent::Container(*owner)),
            SceneItem::Element(_) => Err(GridError::Detached(id)),
        }
    }

    /// Children of a node in z-order (back to front).
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.child_order.get(&idx).map_or(&[], Vec::as_slice)
    }

    /// Element ids attached directly to `parent`, back to front.
    pub fn elements_in(&self, parent: Parent) -> Vec<ElementId> {
        let Ok(parent_idx) = self.parent_node(parent) else {
            return Vec::new();
        };
        self.children(parent_idx)
            .iter()
            .filter_map(|&c| match &self.graph[c] {
                SceneItem::Element(e) => Some(e.id),
                _ => None,
            })
            .collect()
    }

    /// All elements, depth first in z-order: each component is followed by
    /// the contents of its container.
    pub fn walk(&self) -> Vec<ElementId> {
        let mut out = Vec::with_capacity(self.len());
        self.walk_node(self.root, &mut out);
        out
    }

    fn walk_node(&self, idx: NodeIndex, out: &mut Vec<ElementId>) {
        for &child in self.children(idx) {
            if let SceneItem::Element(e) = &self.graph[child] {
                out.push(e.id);
            }
            self.walk_node(child, out);
        }
    }

    /// Iterate over every element, in no particular order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.graph
            .node_indices()
            .filter_map(move |idx| match &self.graph[idx] {
                SceneItem::Element(e) => Some(e),
                _ => None,
            })
    }

    /// Connections whose start or end anchor is `id`.
    pub fn connections_anchored_to(&self, id: ElementId) -> Vec<ElementId> {
        let mut ids: Vec<ElementId> = self
            .elements()
            .filter(|e| matches!(&e.body, ElementBody::Connection(c) if c.is_anchored_to(id)))
            .map(|e| e.id)
            .collect();
        ids.sort();
        ids
    }

    /// Move `id` under a new parent, on top of its z-order.
    pub fn reparent(&mut self, id: ElementId, new_parent: Parent) -> Result<()> {
        let idx = self.index_of(id).ok_or(GridError::UnknownElement(id))?;
        let new_parent_idx = self.parent_node(new_parent)?;
        if let Parent::Container(owner) = new_parent
            && (owner == id || self.is_ancestor_of(id, owner))
        {
            return Err(GridError::NestingCycle {
                element: id,
                container: owner,
            });
        }

        if let Some(old_parent) = self.parent_index(idx) {
            if let Some(edge) = self.graph.find_edge(old_parent, idx) {
                self.graph.remove_edge(edge);
            }
            if let Some(order) = self.child_order.get_mut(&old_parent) {
                order.retain(|&c| c != idx);
            }
        }
        self.graph.add_edge(new_parent_idx, idx, ());
        self.child_order.entry(new_parent_idx).or_default().push(idx);
        Ok(())
    }

    /// Move a node to the front of its parent's z-order (last child).
    /// Returns true if the z-order changed.
    pub fn bring_to_front(&mut self, idx: NodeIndex) -> bool {
        let Some(parent) = self.parent_index(idx) else {
            return false;
        };
        let Some(order) = self.child_order.get_mut(&parent) else {
            return false;
        };
        let Some(pos) = order.iter().position(|&c| c == idx) else {
            return false;
        };
        if pos == order.len() - 1 {
            return false;
        }
        let child = order.remove(pos);
        order.push(child);
        true
    }

    /// Bring `id` to the front, then every ancestor up to the root, so the
    /// whole container chain paints above its siblings.
    pub fn raise_chain(&mut self, id: ElementId) -> Result<()> {
        let mut idx = self.index_of(id).ok_or(GridError::UnknownElement(id))?;
        while let Some(parent) = self.parent_index(idx) {
            self.bring_to_front(idx);
            if parent == self.root {
                break;
            }
            idx = parent;
        }
        Ok(())
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`
    /// through container nesting.
    pub fn is_ancestor_of(&self, ancestor: ElementId, descendant: ElementId) -> bool {
        if ancestor == descendant {
            return false;
        }
        let Some(mut current) = self.index_of(descendant) else {
            return false;
        };
        while let Some(parent) = self.parent_index(current) {
            if let SceneItem::Element(e) = &self.graph[parent]
                && e.id == ancestor
            {
                return true;
            }
            if parent == self.root {
                break;
            }
            current = parent;
        }
        false
    }

    /// Resolve a port reference through its owning component.
    pub fn port(&self, port: PortRef) -> Result<&Port> {
        let orphan = GridError::OrphanPort {
            component: port.component,
            index: port.index,
        };
        let Ok(element) = self.get(port.component) else {
            return Err(orphan);
        };
        let Ok(component) = element.component() else {
            return Err(orphan);
        };
        component.ports.get(port.index).ok_or(orphan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn component(raw: u32, container: bool) -> Element {
        Element {
            id: ElementId::new(raw).unwrap(),
            label: "block".into(),
            position: Position::ORIGIN,
            min_size: Size::new(20.0, 10.0),
            size: Size::new(100.0, 60.0),
            background_color: Rgb::WHITE,
            text_color: Rgb::BLACK,
            moving: false,
            body: ElementBody::Component(ComponentState {
                has_container: container,
                ports: smallvec![
                    Port {
                        label: "in".into(),
                        direction: PortDirection::Input
                    },
                    Port {
                        label: "out".into(),
                        direction: PortDirection::Output
                    },
                ],
                ..Default::default()
            }),
        }
    }

    fn id(raw: u32) -> ElementId {
        ElementId::new(raw).unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, false)).unwrap();
        assert!(scene.get(id(1)).is_ok());
        assert_eq!(scene.parent_of(id(1)).unwrap(), Parent::Root);
        assert_eq!(scene.elements_in(Parent::Root), vec![id(1)]);
        assert!(matches!(
            scene.get(id(2)),
            Err(GridError::UnknownElement(_))
        ));
    }

    #[test]
    fn containers_nest_and_remove_with_owner() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, true)).unwrap();
        scene.insert(Parent::Container(id(1)), component(2, true)).unwrap();
        scene.insert(Parent::Container(id(2)), component(3, false)).unwrap();

        assert_eq!(scene.parent_of(id(3)).unwrap(), Parent::Container(id(2)));
        assert!(scene.is_ancestor_of(id(1), id(3)));
        assert!(!scene.is_ancestor_of(id(3), id(1)));
        assert_eq!(scene.walk(), vec![id(1), id(2), id(3)]);

        let removed = scene.remove(id(1)).unwrap();
        assert_eq!(removed.len(), 3);
        assert!(scene.is_empty());
        assert!(scene.container_of(id(2)).is_none());
    }

    #[test]
    fn insert_into_component_without_container_fails() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, false)).unwrap();
        let err = scene
            .insert(Parent::Container(id(1)), component(2, false))
            .unwrap_err();
        assert_eq!(err, GridError::NoContainer(id(1)));
    }

    #[test]
    fn reparent_moves_between_parents() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, true)).unwrap();
        scene.insert(Parent::Root, component(2, false)).unwrap();
        scene.reparent(id(2), Parent::Container(id(1))).unwrap();
        assert_eq!(scene.parent_of(id(2)).unwrap(), Parent::Container(id(1)));
        assert_eq!(scene.elements_in(Parent::Root), vec![id(1)]);

        // A component cannot be dropped into itself.
        assert!(scene.reparent(id(1), Parent::Container(id(1))).is_err());
    }

    #[test]
    fn raise_chain_promotes_container_ancestors() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, true)).unwrap();
        scene.insert(Parent::Root, component(2, false)).unwrap();
        scene.insert(Parent::Container(id(1)), component(3, false)).unwrap();
        scene.insert(Parent::Container(id(1)), component(4, false)).unwrap();

        scene.raise_chain(id(3)).unwrap();
        assert_eq!(scene.elements_in(Parent::Container(id(1))), vec![id(4), id(3)]);
        assert_eq!(scene.elements_in(Parent::Root), vec![id(2), id(1)]);
    }

    #[test]
    fn resize_clips_to_min_size() {
        let mut e = component(1, false);
        e.position = Position::new(10.0, 10.0);
        // Dragging the left edge far to the right: width would go negative.
        let shift = e.resize(ResizeEdge::Left, Vector::new(-500.0, 0.0));
        assert_eq!(e.size.w, 20.0);
        assert_eq!(e.position.x, 90.0);
        assert_eq!(shift, Vector::new(-80.0, 0.0));
        // Right edge stays where it was.
        assert_eq!(e.position.x + e.size.w, 110.0);

        e.resize(ResizeEdge::Bottom, Vector::new(0.0, 500.0));
        assert_eq!(e.size.h, 10.0);
    }

    #[test]
    fn line_geometry_points_down_at_zero() {
        let g = ConnectionShape::Line.geometry(Position::ORIGIN, Position::new(0.0, 10.0));
        assert_eq!(g.angle, 0.0);
        assert_eq!(g.length, 10.0);

        let g = ConnectionShape::Line.geometry(Position::ORIGIN, Position::new(3.0, 4.0));
        assert!((g.length - 5.0).abs() < 1e-6);
        let expected = -(3.0f32).atan2(4.0) * 180.0 / std::f32::consts::PI;
        assert!((g.angle - expected).abs() < 1e-4);
    }

    #[test]
    fn port_lookup_goes_through_owner() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, false)).unwrap();
        let port = scene
            .port(PortRef {
                component: id(1),
                index: 1,
            })
            .unwrap();
        assert_eq!(port.direction, PortDirection::Output);

        let missing = scene.port(PortRef {
            component: id(9),
            index: 0,
        });
        assert!(matches!(missing, Err(GridError::OrphanPort { .. })));
    }
}
