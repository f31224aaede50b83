//! Scene → surface style properties.
//!
//! One-way projection: walks the scene in paint order, keeps the surface's
//! node tree in step with the scene's (create, re-parent, remove), and writes
//! every element's display attributes as style properties. Nothing is read
//! back from the surface here.

use crate::surface::{Surface, SurfaceNode};
use cg_core::NodeIndex;
use cg_core::geometry::Vector;
use cg_core::id::ElementId;
use cg_core::model::*;
use std::collections::BTreeMap;

/// View parameters needed to place the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub offset: Vector,
    pub zoom: f32,
    pub grid_size: f32,
}

/// Remembers what the surface currently holds so each projection only
/// creates, moves, or removes the nodes that changed.
#[derive(Debug, Default)]
pub struct Projector {
    attached: BTreeMap<ElementId, Parent>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Project the whole scene. Call after every handled event.
    pub fn project(&mut self, surface: &mut dyn Surface, scene: &Scene, view: ViewParams) {
        project_view(surface, view);

        let mut seen = BTreeMap::new();
        self.project_children(surface, scene, scene.root, Parent::Root, &mut seen);

        for (&id, _) in self.attached.iter().filter(|(id, _)| !seen.contains_key(*id)) {
            log::trace!("surface: remove {id}");
            surface.remove_node(id);
        }
        self.attached = seen;
    }

    fn project_children(
        &self,
        surface: &mut dyn Surface,
        scene: &Scene,
        idx: NodeIndex,
        parent: Parent,
        seen: &mut BTreeMap<ElementId, Parent>,
    ) {
        for &child in scene.children(idx) {
            match &scene.graph[child] {
                SceneItem::Element(e) => {
                    match self.attached.get(&e.id) {
                        None => {
                            surface.create_node(e.id, e.element_type(), &e.label);
                            surface.reparent(e.id, parent);
                        }
                        Some(&old) if old != parent => surface.reparent(e.id, parent),
                        Some(_) => {}
                    }
                    seen.insert(e.id, parent);
                    project_element(surface, e);
                    self.project_children(surface, scene, child, parent, seen);
                }
                SceneItem::Container { owner } => {
                    self.project_children(surface, scene, child, Parent::Container(*owner), seen);
                }
                SceneItem::Root => {}
            }
        }
    }
}

fn project_view(surface: &mut dyn Surface, view: ViewParams) {
    let canvas = SurfaceNode::Canvas;
    surface.set_style(canvas, "--zoom", view.zoom.to_string());
    surface.set_style(canvas, "--offset-x", view.offset.x.to_string());
    surface.set_style(canvas, "--offset-y", view.offset.y.to_string());
    surface.set_style(canvas, "--grid-size", view.grid_size.to_string());
}

fn project_element(surface: &mut dyn Surface, e: &Element) {
    let node = SurfaceNode::Element(e.id);
    surface.set_style(node, "--x", e.position.x.to_string());
    surface.set_style(node, "--y", e.position.y.to_string());
    surface.set_style(node, "--bg-color", e.background_color.to_css_triplet());
    surface.set_style(node, "--text-color", e.text_color.to_css_triplet());
    surface.set_style(node, "--moving", flag(e.moving));

    match &e.body {
        ElementBody::Component(c) => {
            surface.set_style(node, "--w", e.size.w.to_string());
            surface.set_style(node, "--h", e.size.h.to_string());
            surface.set_style(node, "--focused", flag(c.focused));
            surface.set_style(
                node,
                "--resizing",
                c.resizing.map_or("none", ResizeEdge::as_str).to_string(),
            );
        }
        ElementBody::Connection(c) => {
            let end = c.end_position();
            let geometry = c.geometry();
            log::trace!(
                "LINE {} ({}, {}) -> ({}, {}) {}° len {}",
                e.id,
                e.position.x,
                e.position.y,
                end.x,
                end.y,
                geometry.angle,
                geometry.length
            );
            surface.set_style(node, "--x2", end.x.to_string());
            surface.set_style(node, "--y2", end.y.to_string());
            surface.set_style(node, "--deg", geometry.angle.to_string());
            surface.set_style(node, "--dist", geometry.length.to_string());
        }
    }
}

fn flag(on: bool) -> String {
    if on { "1" } else { "0" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::HeadlessSurface;
    use cg_core::geometry::{Position, Rgb, Size};
    use pretty_assertions::assert_eq;

    fn id(raw: u32) -> ElementId {
        ElementId::new(raw).unwrap()
    }

    fn element(raw: u32, body: ElementBody) -> Element {
        Element {
            id: id(raw),
            label: "x".into(),
            position: Position::new(10.0, 20.0),
            min_size: Size::default(),
            size: Size::new(100.0, 50.0),
            background_color: Rgb(255, 0, 0),
            text_color: Rgb::BLACK,
            moving: false,
            body,
        }
    }

    const VIEW: ViewParams = ViewParams {
        offset: Vector::ZERO,
        zoom: 2.0,
        grid_size: 5.0,
    };

    #[test]
    fn projects_nodes_and_tracks_tree_changes() {
        let mut scene = Scene::new();
        let group = ElementBody::Component(ComponentState {
            has_container: true,
            ..Default::default()
        });
        scene.insert(Parent::Root, element(1, group)).unwrap();
        scene
            .insert(Parent::Root, element(2, ElementBody::Component(ComponentState::default())))
            .unwrap();

        let mut surface = HeadlessSurface::new();
        let mut projector = Projector::new();
        projector.project(&mut surface, &scene, VIEW);

        assert_eq!(surface.nodes.len(), 2);
        assert_eq!(surface.style(SurfaceNode::Canvas, "--zoom"), Some("2"));
        assert_eq!(
            surface.style(SurfaceNode::Element(id(2)), "--bg-color"),
            Some("255, 0, 0")
        );

        scene.reparent(id(2), Parent::Container(id(1))).unwrap();
        projector.project(&mut surface, &scene, VIEW);
        assert_eq!(surface.nodes[&id(2)].parent, Parent::Container(id(1)));

        scene.remove(id(1)).unwrap();
        projector.project(&mut surface, &scene, VIEW);
        assert!(surface.nodes.is_empty());
    }

    #[test]
    fn connection_projects_path_attributes() {
        let mut line = element(3, ElementBody::Connection(ConnectionState::new(ConnectionShape::Line)));
        line.position = Position::ORIGIN;
        line.route_to(Position::new(10.0, 0.0)).unwrap();

        let mut scene = Scene::new();
        scene.insert(Parent::Root, line).unwrap();
        let mut surface = HeadlessSurface::new();
        Projector::new().project(&mut surface, &scene, VIEW);

        let node = SurfaceNode::Element(id(3));
        assert_eq!(surface.style(node, "--x2"), Some("10"));
        assert_eq!(surface.style(node, "--dist"), Some("10"));
        let deg: f32 = surface.style(node, "--deg").unwrap().parse().unwrap();
        assert!((deg + 90.0).abs() < 1e-3);
    }
}
