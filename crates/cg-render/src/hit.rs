//! Hit testing: canvas point → target lookup.
//!
//! Reverse-walks the scene (front-to-back) to find what lies under a point
//! in canvas space. Elements that currently follow the pointer are skipped,
//! so a release while dragging lands on whatever is underneath.

use crate::surface::Measure;
use cg_core::NodeIndex;
use cg_core::geometry::{Position, Rect};
use cg_core::id::ElementId;
use cg_core::model::*;

/// Side length of a port's square hit area.
pub const PORT_SIZE: f32 = 10.0;
/// Width of the band along a resizable edge.
pub const RESIZE_BAND: f32 = 6.0;
/// Distance from a connection's segment that still counts as a hit.
pub const CONNECTION_TOLERANCE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    /// Canvas background.
    Canvas,
    Component(ElementId),
    Port(PortRef),
    ResizeHandle { component: ElementId, edge: ResizeEdge },
    /// The container area of a component, outside any nested element.
    Container(ElementId),
    Connection(ElementId),
}

impl HitTarget {
    /// The component this target belongs to, if any.
    pub fn component(self) -> Option<ElementId> {
        match self {
            Self::Component(id) | Self::Container(id) => Some(id),
            Self::ResizeHandle { component, .. } => Some(component),
            Self::Port(port) => Some(port.component),
            Self::Canvas | Self::Connection(_) => None,
        }
    }

    /// The element this target addresses, if any.
    pub fn element(self) -> Option<ElementId> {
        match self {
            Self::Connection(id) => Some(id),
            other => other.component(),
        }
    }
}

/// Find the topmost target at `point` (canvas space).
pub fn hit_test(scene: &Scene, measure: &dyn Measure, point: Position) -> HitTarget {
    hit_test_node(scene, measure, scene.root, Position::ORIGIN, point).unwrap_or(HitTarget::Canvas)
}

fn hit_test_node(
    scene: &Scene,
    measure: &dyn Measure,
    idx: NodeIndex,
    frame: Position,
    point: Position,
) -> Option<HitTarget> {
    // Check children in reverse (topmost first)
    for &child in scene.children(idx).iter().rev() {
        let SceneItem::Element(e) = &scene.graph[child] else {
            continue;
        };
        if e.moving {
            continue;
        }
        let hit = match &e.body {
            ElementBody::Component(c) => hit_component(scene, measure, e, c, frame, point),
            ElementBody::Connection(c) => hit_connection(e, c, frame, point),
        };
        if hit.is_some() {
            return hit;
        }
    }
    None
}

fn hit_component(
    scene: &Scene,
    measure: &dyn Measure,
    e: &Element,
    c: &ComponentState,
    frame: Position,
    point: Position,
) -> Option<HitTarget> {
    let rect = e.rect().offset_by(frame);

    for direction in [PortDirection::Input, PortDirection::Output] {
        if let Some(index) = port_rects(rect, c, direction)
            .find(|(_, r)| r.contains(point))
            .map(|(index, _)| index)
        {
            return Some(HitTarget::Port(PortRef {
                component: e.id,
                index,
            }));
        }
    }

    if !rect.contains(point) {
        return None;
    }

    if let Some(&edge) = c
        .resize_edges
        .iter()
        .find(|&&edge| resize_band(rect, edge).contains(point))
    {
        return Some(HitTarget::ResizeHandle {
            component: e.id,
            edge,
        });
    }

    if c.has_container
        && let Some(bounds) = measure.container_bounds(scene, e.id)
    {
        let area = bounds.offset_by(rect.origin());
        if area.contains(point) {
            let nested = scene
                .container_of(e.id)
                .and_then(|idx| hit_test_node(scene, measure, idx, area.origin(), point));
            return Some(nested.unwrap_or(HitTarget::Container(e.id)));
        }
    }

    Some(HitTarget::Component(e.id))
}

fn hit_connection(
    e: &Element,
    c: &ConnectionState,
    frame: Position,
    point: Position,
) -> Option<HitTarget> {
    let start = Position::new(frame.x + e.position.x, frame.y + e.position.y);
    let end = c.end_position();
    let end = Position::new(frame.x + end.x, frame.y + end.y);
    (distance_to_segment(point, start, end) <= CONNECTION_TOLERANCE)
        .then_some(HitTarget::Connection(e.id))
}

/// Port hit areas of one direction: inputs sit on the left edge, outputs on
/// the right, evenly spaced top to bottom.
pub fn port_rects(
    rect: Rect,
    c: &ComponentState,
    direction: PortDirection,
) -> impl Iterator<Item = (usize, Rect)> + '_ {
    let count = c.ports_with(direction).count();
    let x = match direction {
        PortDirection::Input => rect.x,
        PortDirection::Output => rect.right(),
    };
    c.ports_with(direction).enumerate().map(move |(slot, (index, _))| {
        let y = rect.y + rect.h * (slot + 1) as f32 / (count + 1) as f32;
        let half = PORT_SIZE / 2.0;
        (index, Rect::new(x - half, y - half, PORT_SIZE, PORT_SIZE))
    })
}

/// Centre of a port in the same frame as `rect`.
pub fn port_anchor(rect: Rect, c: &ComponentState, port: usize) -> Option<Position> {
    let direction = c.ports.get(port)?.direction;
    port_rects(rect, c, direction)
        .find(|(index, _)| *index == port)
        .map(|(_, r)| Position::new(r.x + r.w / 2.0, r.y + r.h / 2.0))
}

fn resize_band(rect: Rect, edge: ResizeEdge) -> Rect {
    match edge {
        ResizeEdge::Left => Rect::new(rect.x, rect.y, RESIZE_BAND, rect.h),
        ResizeEdge::Right => Rect::new(rect.right() - RESIZE_BAND, rect.y, RESIZE_BAND, rect.h),
        ResizeEdge::Top => Rect::new(rect.x, rect.y, rect.w, RESIZE_BAND),
        ResizeEdge::Bottom => Rect::new(rect.x, rect.bottom() - RESIZE_BAND, rect.w, RESIZE_BAND),
    }
}

fn distance_to_segment(p: Position, a: Position, b: Position) -> f32 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq == 0.0 {
        return (p - a).length();
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len_sq).clamp(0.0, 1.0);
    let closest = Position::new(a.x + ab.x * t, a.y + ab.y * t);
    (p - closest).length()
}

/// Canvas-space top-left corner of an element, following container nesting.
pub fn absolute_position(scene: &Scene, measure: &dyn Measure, id: ElementId) -> Option<Position> {
    let e = scene.get(id).ok()?;
    match scene.parent_of(id).ok()? {
        Parent::Root => Some(e.position),
        Parent::Container(owner) => {
            let owner_pos = absolute_position(scene, measure, owner)?;
            let area = measure.container_bounds(scene, owner)?.offset_by(owner_pos);
            Some(Position::new(area.x + e.position.x, area.y + e.position.y))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::BoxMeasure;
    use cg_core::config::ContainerInsets;
    use cg_core::geometry::{Rgb, Size};
    use smallvec::smallvec;

    fn id(raw: u32) -> ElementId {
        ElementId::new(raw).unwrap()
    }

    fn component(raw: u32, x: f32, y: f32, container: bool) -> Element {
        Element {
            id: id(raw),
            label: "block".into(),
            position: Position::new(x, y),
            min_size: Size::default(),
            size: Size::new(100.0, 60.0),
            background_color: Rgb::WHITE,
            text_color: Rgb::BLACK,
            moving: false,
            body: ElementBody::Component(ComponentState {
                has_container: container,
                resize_edges: smallvec![ResizeEdge::Right],
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

    fn measure() -> BoxMeasure {
        BoxMeasure::new(ContainerInsets {
            top: 20.0,
            ..Default::default()
        })
    }

    #[test]
    fn hit_topmost_component() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, 0.0, 0.0, false)).unwrap();
        scene.insert(Parent::Root, component(2, 50.0, 0.0, false)).unwrap();
        let m = measure();

        assert_eq!(hit_test(&scene, &m, Position::new(60.0, 10.0)), HitTarget::Component(id(2)));
        assert_eq!(hit_test(&scene, &m, Position::new(20.0, 10.0)), HitTarget::Component(id(1)));
        assert_eq!(hit_test(&scene, &m, Position::new(500.0, 500.0)), HitTarget::Canvas);

        scene.get_mut(id(2)).unwrap().moving = true;
        assert_eq!(hit_test(&scene, &m, Position::new(60.0, 10.0)), HitTarget::Component(id(1)));
    }

    #[test]
    fn ports_and_resize_bands() {
        let mut scene = Scene::new();
        scene.insert(Parent::Root, component(1, 0.0, 0.0, false)).unwrap();
        let m = measure();

        // Input port on the left edge, half height.
        assert_eq!(
            hit_test(&scene, &m, Position::new(-3.0, 30.0)),
            HitTarget::Port(PortRef {
                component: id(1),
                index: 0
            })
        );
        assert_eq!(
            hit_test(&scene, &m, Position::new(102.0, 30.0)),
            HitTarget::Port(PortRef {
                component: id(1),
                index: 1
            })
        );
        assert_eq!(
            hit_test(&scene, &m, Position::new(97.0, 5.0)),
            HitTarget::ResizeHandle {
                component: id(1),
                edge: ResizeEdge::Right
            }
        );
    }

    #[test]
    fn nested_elements_are_hit_through_their_container() {
        let mut scene = Scene::new();
        let mut group = component(1, 100.0, 100.0, true);
        group.size = Size::new(300.0, 200.0);
        scene.insert(Parent::Root, group).unwrap();
        scene.insert(Parent::Container(id(1)), component(2, 10.0, 10.0, false)).unwrap();
        let m = measure();

        // Child box spans (110..210, 130..190) in canvas space.
        assert_eq!(hit_test(&scene, &m, Position::new(150.0, 150.0)), HitTarget::Component(id(2)));
        assert_eq!(hit_test(&scene, &m, Position::new(300.0, 250.0)), HitTarget::Container(id(1)));
        // Title strip above the container area.
        assert_eq!(hit_test(&scene, &m, Position::new(150.0, 105.0)), HitTarget::Component(id(1)));

        assert_eq!(
            absolute_position(&scene, &m, id(2)),
            Some(Position::new(110.0, 130.0))
        );
    }

    #[test]
    fn connection_hit_within_tolerance() {
        let mut line = Element {
            id: id(5),
            label: "line".into(),
            position: Position::new(0.0, 0.0),
            min_size: Size::default(),
            size: Size::default(),
            background_color: Rgb::BLACK,
            text_color: Rgb::BLACK,
            moving: false,
            body: ElementBody::Connection(ConnectionState::new(ConnectionShape::Line)),
        };
        line.route_to(Position::new(100.0, 0.0)).unwrap();
        let mut scene = Scene::new();
        scene.insert(Parent::Root, line).unwrap();
        let m = measure();

        assert_eq!(hit_test(&scene, &m, Position::new(50.0, 3.0)), HitTarget::Connection(id(5)));
        assert_eq!(hit_test(&scene, &m, Position::new(50.0, 10.0)), HitTarget::Canvas);
        assert_eq!(hit_test(&scene, &m, Position::new(110.0, 0.0)), HitTarget::Canvas);
    }
}
