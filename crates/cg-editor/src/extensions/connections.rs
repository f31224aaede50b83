//! Connection routing.
//!
//! One connection is drawn at a time: a press on an output port creates it
//! (using the first registered connection type) and captures the pointer,
//! moves drag its free end, and the release either commits it to an input
//! port of another component or removes it. A press on an existing
//! connection detaches its end and drags it again.

use crate::canvas::CanvasState;
use crate::extensions::CanvasExtension;
use crate::input::PointerEvent;
use cg_core::*;
use cg_render::HitTarget;
use cg_render::hit::port_anchor;

pub struct ConnectionExtension {
    label: String,
}

impl ConnectionExtension {
    pub fn new(registry: &ElementRegistry) -> Result<Self> {
        let label = registry
            .first_connection_label()
            .ok_or(GridError::NoConnectionType)?;
        Ok(Self {
            label: label.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Canvas-space centre of a port.
    fn anchor(canvas: &CanvasState, port: PortRef) -> Result<Position> {
        let orphan = GridError::OrphanPort {
            component: port.component,
            index: port.index,
        };
        let rect = canvas.absolute_rect(port.component)?;
        let component = canvas.scene.get(port.component)?.component()?;
        port_anchor(rect, component, port.index).ok_or(orphan)
    }

    fn start(&self, canvas: &mut CanvasState, port: PortRef) -> Result<()> {
        let start = Self::anchor(canvas, port)?;
        let id = canvas.create_element(ElementType::Connection, &self.label, Parent::Root)?;
        canvas.set_pointer_captured(Some(id));
        canvas.set_pending_edge(Some(id));

        let edge = canvas.scene.get_mut(id)?;
        edge.position = start;
        edge.moving = true;
        let state = edge.connection_mut()?;
        state.start_anchor = Some(port.component);
        state.start_port = Some(port.index);
        edge.route_to(start)?;
        log::debug!("connection {id} started from {}", port.component);
        Ok(())
    }

    fn redrag(&self, canvas: &mut CanvasState, id: ElementId, event: &PointerEvent) -> Result<()> {
        let end = canvas.view.screen_to_canvas(event.position);
        canvas.set_pointer_captured(Some(id));
        canvas.set_pending_edge(Some(id));

        let edge = canvas.scene.get_mut(id)?;
        edge.moving = true;
        let state = edge.connection_mut()?;
        state.end_anchor = None;
        state.end_port = None;
        edge.route_to(end)?;
        log::debug!("connection {id} detached for re-routing");
        Ok(())
    }
}

impl CanvasExtension for ConnectionExtension {
    fn name(&self) -> &str {
        "connections"
    }

    fn on_pointer_down(&mut self, canvas: &mut CanvasState, event: &PointerEvent) -> Result<()> {
        match event.hit {
            HitTarget::Port(port) if canvas.scene.port(port)?.direction == PortDirection::Output => {
                self.start(canvas, port)
            }
            HitTarget::Connection(id) => self.redrag(canvas, id, event),
            _ => Ok(()),
        }
    }

    fn on_pointer_move(&mut self, canvas: &mut CanvasState, event: &PointerEvent) -> Result<()> {
        if let Some(id) = canvas.pending_edge()
            && canvas.pointer_captured() == Some(id)
        {
            let end = canvas.view.screen_to_canvas(event.position);
            canvas.scene.get_mut(id)?.route_to(end)?;
        }
        Ok(())
    }

    fn on_pointer_up(&mut self, canvas: &mut CanvasState, event: &PointerEvent) -> Result<()> {
        let Some(id) = canvas.pending_edge() else {
            return Ok(());
        };
        let start_anchor = canvas.scene.get(id)?.connection()?.start_anchor;
        let target = match event.hit {
            HitTarget::Port(port)
                if Some(port.component) != start_anchor
                    && canvas.scene.port(port)?.direction == PortDirection::Input =>
            {
                Some(port)
            }
            _ => None,
        };
        canvas.set_pending_edge(None);

        match target {
            Some(port) => {
                let end = Self::anchor(canvas, port)?;
                let edge = canvas.scene.get_mut(id)?;
                edge.moving = false;
                let state = edge.connection_mut()?;
                state.end_anchor = Some(port.component);
                state.end_port = Some(port.index);
                edge.route_to(end)?;
                log::debug!("connection {id} committed to {}", port.component);
            }
            None => {
                canvas.remove_element(id)?;
                log::debug!("connection {id} released away from an input port");
            }
        }
        Ok(())
    }
}
