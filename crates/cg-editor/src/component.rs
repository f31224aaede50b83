//! Component behavior: move, resize, containment, and edge coupling.
//!
//! Positions of nested components are relative to their container, so a
//! move is checked against the container's measured bounds in that frame.
//! Every geometry change is followed by recomputing the connections
//! anchored to the component and to anything nested inside it.

use crate::canvas::CanvasState;
use cg_core::*;
use cg_render::HitTarget;
use cg_render::hit::port_anchor;

// ─── Drop policy ─────────────────────────────────────────────────────────

/// Decides whether a component released over another component's container
/// is moved into it.
pub trait DropPolicy {
    fn accept(&mut self, scene: &Scene, element: ElementId, container: ElementId) -> bool;
}

/// Always re-parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDrops;

impl DropPolicy for AcceptDrops {
    fn accept(&mut self, _scene: &Scene, _element: ElementId, _container: ElementId) -> bool {
        true
    }
}

/// Never re-parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectDrops;

impl DropPolicy for RejectDrops {
    fn accept(&mut self, _scene: &Scene, _element: ElementId, _container: ElementId) -> bool {
        false
    }
}

/// Ask a closure, e.g. one that shows a confirmation prompt.
pub struct DropWith<F>(pub F);

impl<F> DropPolicy for DropWith<F>
where
    F: FnMut(&Scene, ElementId, ElementId) -> bool,
{
    fn accept(&mut self, scene: &Scene, element: ElementId, container: ElementId) -> bool {
        (self.0)(scene, element, container)
    }
}

// ─── Component operations ────────────────────────────────────────────────

impl CanvasState {
    /// Whether `candidate` (in the component's own parent frame) is a legal
    /// box for `id`: always on the canvas root, inside a container only when
    /// it lies within the container's measured bounds.
    pub fn check_container_bounds(&self, id: ElementId, candidate: Rect) -> Result<bool> {
        match self.scene.parent_of(id)? {
            Parent::Root => Ok(true),
            Parent::Container(owner) => Ok(self
                .measure
                .container_bounds(&self.scene, owner)
                .is_some_and(|bounds| Rect::new(0.0, 0.0, bounds.w, bounds.h).contains_rect(&candidate))),
        }
    }

    /// Move a component to `position - delta` if the container allows it,
    /// then drag its connections along. Returns whether it moved.
    pub fn move_component(&mut self, id: ElementId, delta: Vector) -> Result<bool> {
        let e = self.scene.get(id)?;
        e.component()?;
        let candidate = Rect::from_parts(e.position - delta, e.size);
        if !self.check_container_bounds(id, candidate)? {
            log::trace!("{id}: move to ({}, {}) leaves its container", candidate.x, candidate.y);
            return Ok(false);
        }
        self.scene.get_mut(id)?.position = candidate.origin();
        self.move_connected_edges(id, delta)?;
        Ok(true)
    }

    /// Resize along the edge the component is currently resizing. Its
    /// connections snap to the new port anchors; anything nested inside
    /// moves with the container origin.
    pub fn resize_component(&mut self, id: ElementId, delta: Vector) -> Result<()> {
        let e = self.scene.get_mut(id)?;
        let edge = e.component()?.resizing.ok_or(GridError::NotResizing(id))?;
        let shift = e.resize(edge, delta);
        log::trace!("{id}: resize {} to {}x{}", edge.as_str(), e.size.w, e.size.h);

        let rect = self.absolute_rect(id)?;
        let component = self.scene.get(id)?.component()?.clone();
        let locate = |port: Option<usize>, old: Position| {
            port.and_then(|index| port_anchor(rect, &component, index))
                .unwrap_or(old - shift)
        };
        for link in self.scene.connections_anchored_to(id) {
            let e = self.scene.get_mut(link)?;
            let state = e.connection()?;
            let (start_port, end_port) = (state.start_port, state.end_port);
            let starts_here = state.start_anchor == Some(id);
            let mut end = state.end_position();
            if state.end_anchor == Some(id) {
                end = locate(end_port, end);
            }
            if starts_here {
                e.position = locate(start_port, e.position);
            }
            e.route_to(end)?;
        }

        if shift != Vector::ZERO {
            for nested in self.with_descendants(id).into_iter().skip(1) {
                self.shift_edges_of(nested, shift)?;
            }
        }
        Ok(())
    }

    /// Shift connections anchored to `id` (or to anything nested inside it)
    /// after it moved by `position - delta`.
    pub fn move_connected_edges(&mut self, id: ElementId, delta: Vector) -> Result<()> {
        for anchor in self.with_descendants(id) {
            self.shift_edges_of(anchor, delta)?;
        }
        Ok(())
    }

    fn shift_edges_of(&mut self, anchor: ElementId, delta: Vector) -> Result<()> {
        for edge in self.scene.connections_anchored_to(anchor) {
            let e = self.scene.get_mut(edge)?;
            let state = e.connection()?;
            let end = if state.end_anchor == Some(anchor) {
                state.end_position() - delta
            } else {
                state.end_position()
            };
            if state.start_anchor == Some(anchor) {
                e.position = e.position - delta;
            }
            e.route_to(end)?;
            log::trace!(
                "{edge}: ({}, {}) -> ({}, {})",
                e.position.x,
                e.position.y,
                end.x,
                end.y
            );
        }
        Ok(())
    }

    /// The container a component released on `hit` would be dropped into:
    /// the container under the pointer, or the one holding the component
    /// under it.
    pub fn drop_target(&self, hit: HitTarget) -> Option<ElementId> {
        match hit {
            HitTarget::Container(owner) => Some(owner),
            HitTarget::Canvas | HitTarget::Connection(_) => None,
            other => match self.scene.parent_of(other.component()?).ok()? {
                Parent::Container(owner) => Some(owner),
                Parent::Root => None,
            },
        }
    }

    /// Move `id` into the container owned by `owner`, if the drop policy
    /// agrees. The component lands at the container's origin.
    pub fn drop_into_container(&mut self, id: ElementId, owner: ElementId) -> Result<bool> {
        self.scene.get(id)?.component()?;
        if self.scene.container_of(owner).is_none()
            || owner == id
            || self.scene.is_ancestor_of(id, owner)
            || self.scene.parent_of(id)? == Parent::Container(owner)
        {
            return Ok(false);
        }
        if !self.drop_policy.accept(&self.scene, id, owner) {
            log::debug!("drop of {id} into {owner} declined");
            return Ok(false);
        }

        let before = self.absolute_rect(id)?.origin();
        self.scene.reparent(id, Parent::Container(owner))?;
        self.scene.get_mut(id)?.position = Position::ORIGIN;
        let after = self.absolute_rect(id)?.origin();
        self.move_connected_edges(id, before - after)?;
        log::debug!("moved {id} into the container of {owner}");
        Ok(true)
    }

    /// Copy a component next to the original (one grid cell down and right)
    /// under a fresh id.
    pub fn duplicate_component(&mut self, id: ElementId) -> Result<ElementId> {
        let source = self.scene.get(id)?;
        source.component()?;
        let (label, position, size, background, text) = (
            source.label.clone(),
            source.position,
            source.size,
            source.background_color,
            source.text_color,
        );
        let parent = self.scene.parent_of(id)?;

        let copy_id = self.create_element(ElementType::Component, &label, parent)?;
        let step = Vector::new(self.grid_size, self.grid_size);
        let copy = self.scene.get_mut(copy_id)?;
        copy.position = position + step;
        copy.size = size;
        copy.background_color = background;
        copy.text_color = text;
        Ok(copy_id)
    }

    /// `id` followed by every element nested in its container, recursively.
    fn with_descendants(&self, id: ElementId) -> Vec<ElementId> {
        let mut out = vec![id];
        let mut i = 0;
        while i < out.len() {
            let current = out[i];
            if self.scene.container_of(current).is_some() {
                out.extend(self.scene.elements_in(Parent::Container(current)));
            }
            i += 1;
        }
        out
    }
}
