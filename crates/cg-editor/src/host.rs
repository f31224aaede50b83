//! Host application: raw input routing, click detection, persistence.
//!
//! The host owns the platform-facing state: whether the pointer is down,
//! where it was last seen, and what the press landed on. Raw events outside
//! the canvas viewport are dropped; the rest are hit tested, routed
//! (captured element > element under the pointer > canvas), and handed to
//! the canvas and then to every app module in registration order. After
//! each event the scene is projected onto the surface.

use crate::canvas::Canvas;
use crate::input::{InputEvent, KeyEvent, Modifiers, PointerEvent};
use cg_core::*;
use cg_render::{HitTarget, Projector, Surface};

/// A release within this distance of the press (screen units) can be a click.
pub const CLICK_RADIUS: f32 = 5.0;

/// A routed event as seen by the canvas and app modules.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutedEvent {
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    Click(PointerEvent),
    Wheel { delta_y: f32 },
    Key(KeyEvent),
}

/// An application-level sibling of the canvas (toolbox, panel, ...) that
/// receives routed events and persists its own opaque data.
pub trait AppModule {
    fn name(&self) -> &str;

    fn handle(&mut self, _canvas: &mut Canvas, _event: &RoutedEvent) -> Result<()> {
        Ok(())
    }

    fn export(&self) -> serde_json::Value;

    fn import(&mut self, data: &serde_json::Value) -> Result<()>;
}

#[derive(Debug, Clone, Copy)]
struct Press {
    target: HitTarget,
    position: Position,
}

pub struct Host<S: Surface> {
    pub canvas: Canvas,
    modules: Vec<Box<dyn AppModule>>,
    surface: S,
    projector: Projector,
    /// Canvas area in screen coordinates.
    viewport: Rect,
    pointer_down: bool,
    last_pointer: Position,
    press: Option<Press>,
    /// Set when the current gesture panned the canvas or moved an element.
    dragged: bool,
}

impl<S: Surface> Host<S> {
    pub fn new(canvas: Canvas, surface: S, viewport: Rect) -> Self {
        let mut host = Self {
            canvas,
            modules: Vec::new(),
            surface,
            projector: Projector::new(),
            viewport,
            pointer_down: false,
            last_pointer: Position::ORIGIN,
            press: None,
            dragged: false,
        };
        host.render();
        host
    }

    pub fn add_module(&mut self, module: Box<dyn AppModule>) {
        log::debug!("registered app module \"{}\"", module.name());
        self.modules.push(module);
    }

    pub fn module_mut(&mut self, name: &str) -> Result<&mut dyn AppModule> {
        self.modules
            .iter_mut()
            .find(|m| m.name() == name)
            .map(|m| m.as_mut() as &mut dyn AppModule)
            .ok_or_else(|| GridError::UnregisteredModule(name.to_string()))
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn is_pointer_down(&self) -> bool {
        self.pointer_down
    }

    /// Handle one raw event. Returns the routed events that were dispatched.
    pub fn handle(&mut self, event: &InputEvent) -> Result<Vec<RoutedEvent>> {
        if let Some(p) = event.position()
            && !self.viewport.contains(p)
        {
            if matches!(event, InputEvent::PointerUp { .. }) {
                // The canvas keeps its capture; the next press recovers it.
                self.pointer_down = false;
                self.press = None;
            }
            log::trace!("ignoring event outside the canvas at ({}, {})", p.x, p.y);
            return Ok(Vec::new());
        }

        let routed = self.route(event);
        for r in &routed {
            self.dispatch(r)?;
        }
        self.render();
        Ok(routed)
    }

    fn route(&mut self, event: &InputEvent) -> Vec<RoutedEvent> {
        let state = &self.canvas.state;
        match event {
            InputEvent::PointerDown { x, y, modifiers } => {
                let p = Position::new(*x, *y);
                let ev = state.pointer_event(p, p, *modifiers);
                self.pointer_down = true;
                self.last_pointer = p;
                self.dragged = false;
                self.press = Some(Press {
                    target: ev.hit,
                    position: p,
                });
                vec![RoutedEvent::PointerDown(ev)]
            }
            InputEvent::PointerMove { x, y, modifiers } => {
                let p = Position::new(*x, *y);
                if !self.pointer_down {
                    // Hovering never drags, even with a capture left over.
                    self.last_pointer = p;
                    return Vec::new();
                }
                let ev = state.pointer_event(p, self.last_pointer, *modifiers);
                self.last_pointer = p;
                vec![RoutedEvent::PointerMove(ev)]
            }
            InputEvent::PointerUp { x, y, modifiers } => {
                let p = Position::new(*x, *y);
                let ev = state.pointer_event(p, self.last_pointer, *modifiers);
                self.pointer_down = false;
                self.last_pointer = p;
                let mut out = vec![RoutedEvent::PointerUp(ev)];
                if let Some(press) = self.press.take()
                    && !self.dragged
                    && press.target.element() == ev.target.element()
                    && press.position.is_within_radius(p, CLICK_RADIUS)
                {
                    out.push(RoutedEvent::Click(ev));
                }
                out
            }
            InputEvent::Wheel { delta_y, .. } => vec![RoutedEvent::Wheel { delta_y: *delta_y }],
            InputEvent::KeyDown { key, modifiers } => vec![key_event(key, *modifiers, true)],
            InputEvent::KeyUp { key, modifiers } => vec![key_event(key, *modifiers, false)],
        }
    }

    fn dispatch(&mut self, event: &RoutedEvent) -> Result<()> {
        let canvas = &mut self.canvas;
        match event {
            RoutedEvent::PointerDown(ev) => canvas.pointer_down(ev)?,
            RoutedEvent::PointerMove(ev) => {
                canvas.pointer_move(ev)?;
                let moving = canvas
                    .state
                    .pointer_captured()
                    .and_then(|id| canvas.state.scene.get(id).ok())
                    .is_some_and(|e| e.moving);
                if moving || canvas.state.is_panning() {
                    self.dragged = true;
                }
            }
            RoutedEvent::PointerUp(ev) => canvas.pointer_up(ev)?,
            RoutedEvent::Click(ev) => canvas.click(ev)?,
            RoutedEvent::Wheel { delta_y } => canvas.wheel(*delta_y),
            RoutedEvent::Key(ev) => canvas.key(ev)?,
        }
        for module in &mut self.modules {
            module.handle(&mut self.canvas, event)?;
        }
        Ok(())
    }

    /// Project the scene onto the surface.
    pub fn render(&mut self) {
        let view = self.canvas.state.view_params();
        self.projector
            .project(&mut self.surface, &self.canvas.state.scene, view);
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    pub fn import(&mut self, data: &AppData) -> Result<()> {
        self.canvas.import(&data.grid)?;
        for (name, value) in &data.modules {
            self.module_mut(name)?.import(value)?;
        }
        self.render();
        Ok(())
    }

    pub fn export(&self) -> Result<AppData> {
        Ok(AppData {
            grid: self.canvas.export()?,
            modules: self
                .modules
                .iter()
                .map(|m| (m.name().to_string(), m.export()))
                .collect(),
        })
    }

    pub fn import_json(&mut self, text: &str) -> Result<()> {
        self.import(&AppData::from_json(text)?)
    }

    pub fn export_json(&self) -> Result<String> {
        self.export()?.to_json()
    }
}

fn key_event(key: &str, modifiers: Modifiers, pressed: bool) -> RoutedEvent {
    RoutedEvent::Key(KeyEvent {
        key: key.to_string(),
        modifiers,
        pressed,
    })
}
