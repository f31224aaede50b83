//! Component routing and collision avoidance.
//!
//! Owns the component side of the pointer state machine: a press focuses
//! the component and, depending on the tool, captures it for a drag or a
//! resize; moves are dispatched to move/resize; a release after a drag may
//! drop the component into the container under the pointer.
//!
//! Collision rules map a component label to the labels it must not be
//! dragged onto (empty list = every component). Only siblings count, and a
//! pair that already overlaps before the move may keep overlapping.

use crate::canvas::CanvasState;
use crate::extensions::CanvasExtension;
use crate::input::PointerEvent;
use cg_core::*;
use cg_render::HitTarget;

pub struct CollisionExtension {
    rules: CollisionRules,
}

impl CollisionExtension {
    pub fn new(rules: CollisionRules) -> Self {
        Self { rules }
    }

    /// Whether moving `id` to `candidate` would newly overlap a partner.
    pub fn collides(&self, canvas: &CanvasState, id: ElementId, candidate: Rect) -> Result<bool> {
        let element = canvas.scene.get(id)?;
        let Some(partners) = self.rules.get(&element.label) else {
            return Ok(false);
        };
        let current = element.rect();

        for sibling in canvas.scene.elements_in(canvas.scene.parent_of(id)?) {
            if sibling == id {
                continue;
            }
            let other = canvas.scene.get(sibling)?;
            if !other.is_component() || !(partners.is_empty() || partners.contains(&other.label)) {
                continue;
            }
            let r = other.rect();
            if candidate.overlaps(&r) && !current.overlaps(&r) {
                log::trace!("{id} would collide with {sibling}");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl CanvasExtension for CollisionExtension {
    fn name(&self) -> &str {
        "components"
    }

    fn on_pointer_down(&mut self, canvas: &mut CanvasState, event: &PointerEvent) -> Result<()> {
        let (id, edge) = match event.hit {
            HitTarget::Component(id) | HitTarget::Container(id) => (id, None),
            HitTarget::ResizeHandle { component, edge } => (component, Some(edge)),
            _ => return Ok(()),
        };
        canvas.set_focused(Some(id))?;

        match (canvas.tool, edge) {
            (tool, Some(edge)) if tool.resizes_components() => {
                canvas.set_pointer_captured(Some(id));
                canvas.scene.get_mut(id)?.component_mut()?.resizing = Some(edge);
                log::debug!("resizing {id} by its {} edge", edge.as_str());
            }
            (tool, _) if tool.drags_components() => {
                canvas.set_pointer_captured(Some(id));
            }
            _ => {}
        }
        Ok(())
    }

    fn on_pointer_move(&mut self, canvas: &mut CanvasState, event: &PointerEvent) -> Result<()> {
        let Some(id) = canvas.pointer_captured() else {
            return Ok(());
        };
        let element = canvas.scene.get(id)?;
        let Ok(component) = element.component() else {
            return Ok(());
        };
        let delta = canvas.view.drag_delta(event.last_position, event.position);
        if component.resizing.is_some() {
            return canvas.resize_component(id, delta);
        }

        let candidate = Rect::from_parts(element.position - delta, element.size);
        canvas.scene.get_mut(id)?.moving = true;
        if self.collides(canvas, id, candidate)? {
            return Ok(());
        }
        canvas.move_component(id, delta)?;
        Ok(())
    }

    fn on_pointer_up(&mut self, canvas: &mut CanvasState, event: &PointerEvent) -> Result<()> {
        let Some(id) = canvas.pointer_captured() else {
            return Ok(());
        };
        let element = canvas.scene.get(id)?;
        let dragged = element.moving
            && element
                .component()
                .is_ok_and(|component| component.resizing.is_none());
        if dragged && let Some(owner) = canvas.drop_target(event.hit) {
            canvas.drop_into_container(id, owner)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn canvas() -> CanvasState {
        let config = GridConfig::from_json(
            r#"{"elements": [
                {"type": "component", "label": "a", "size": {"w": 100, "h": 60}},
                {"type": "component", "label": "b", "size": {"w": 100, "h": 60}},
                {"type": "component", "label": "group", "size": {"w": 400, "h": 300}, "container": true}
            ]}"#,
        )
        .unwrap();
        CanvasState::new(&config, Rect::new(0.0, 0.0, 800.0, 600.0))
    }

    fn rules(pairs: Vec<(&str, Vec<&str>)>) -> CollisionRules {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.into_iter().map(String::from).collect()))
            .collect::<BTreeMap<_, _>>()
    }

    #[test]
    fn rejects_moves_onto_a_partner() {
        let mut c = canvas();
        let a = c.create_element(ElementType::Component, "a", Parent::Root).unwrap();
        let b = c.create_element(ElementType::Component, "b", Parent::Root).unwrap();
        c.scene.get_mut(b).unwrap().position = Position::new(200.0, 0.0);
        let ext = CollisionExtension::new(rules(vec![("b", vec!["a"])]));

        let overlapping = Rect::new(90.0, 50.0, 100.0, 60.0);
        assert!(ext.collides(&c, b, overlapping).unwrap());
        // `a` has no rule of its own.
        assert!(!ext.collides(&c, a, Rect::new(150.0, 0.0, 100.0, 60.0)).unwrap());
        // Touching is not overlapping.
        assert!(!ext.collides(&c, b, Rect::new(100.0, 0.0, 100.0, 60.0)).unwrap());
    }

    #[test]
    fn empty_rule_means_every_component() {
        let mut c = canvas();
        c.create_element(ElementType::Component, "a", Parent::Root).unwrap();
        let b = c.create_element(ElementType::Component, "b", Parent::Root).unwrap();
        c.scene.get_mut(b).unwrap().position = Position::new(200.0, 0.0);
        let ext = CollisionExtension::new(rules(vec![("b", vec![])]));
        assert!(ext.collides(&c, b, Rect::new(50.0, 0.0, 100.0, 60.0)).unwrap());
    }

    #[test]
    fn already_overlapping_pairs_may_stay_overlapped() {
        let mut c = canvas();
        c.create_element(ElementType::Component, "a", Parent::Root).unwrap();
        let b = c.create_element(ElementType::Component, "b", Parent::Root).unwrap();
        c.scene.get_mut(b).unwrap().position = Position::new(50.0, 30.0);
        let ext = CollisionExtension::new(rules(vec![("b", vec!["a"])]));
        assert!(!ext.collides(&c, b, Rect::new(60.0, 30.0, 100.0, 60.0)).unwrap());
    }

    #[test]
    fn only_siblings_collide() {
        let mut c = canvas();
        let group = c.create_element(ElementType::Component, "group", Parent::Root).unwrap();
        let b = c
            .create_element(ElementType::Component, "b", Parent::Container(group))
            .unwrap();
        c.create_element(ElementType::Component, "a", Parent::Root).unwrap();
        let ext = CollisionExtension::new(rules(vec![("b", vec!["a", "group"])]));
        // `a` sits on the root at (0, 0); `b` is inside the group's container.
        assert!(!ext.collides(&c, b, Rect::new(10.0, 10.0, 100.0, 60.0)).unwrap());
    }
}
