//! The canvas: coordinate space, tool/focus/capture state, and the pointer
//! state machine.
//!
//! `CanvasState` holds everything an interaction can touch. `Canvas` wraps it
//! with the registered extensions and drives each event through them in
//! registration order before applying its own default behavior:
//!
//! ```text
//! idle ─press─▶ pressed ─move*─▶ (panning | dragging | resizing | connecting) ─release─▶ idle
//! ```
//!
//! Panning starts only with the grab tool, on the canvas background, when no
//! extension captured the pointer. Any handler error resets the interaction
//! before it propagates.

use crate::component::{AcceptDrops, DropPolicy};
use crate::extensions::CanvasExtension;
use crate::extensions::collision::CollisionExtension;
use crate::extensions::connections::ConnectionExtension;
use crate::input::{KeyEvent, Modifiers, PointerEvent};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::ToolKind;
use crate::viewport::ViewTransform;
use cg_core::*;
use cg_render::hit::absolute_position;
use cg_render::{BoxMeasure, HitTarget, Measure, ViewParams};

// ─── State ───────────────────────────────────────────────────────────────

pub struct CanvasState {
    pub scene: Scene,
    pub registry: ElementRegistry,
    pub view: ViewTransform,
    /// Display-only grid pitch; also the offset used when duplicating.
    pub grid_size: f32,
    pub tool: ToolKind,
    ids: IdAllocator,
    captured: Option<ElementId>,
    focused: Option<ElementId>,
    panning: bool,
    /// A connection being drawn that has not been committed to a port yet.
    pending_edge: Option<ElementId>,
    pub(crate) measure: Box<dyn Measure>,
    pub(crate) drop_policy: Box<dyn DropPolicy>,
}

impl CanvasState {
    pub fn new(config: &GridConfig, viewport: Rect) -> Self {
        Self {
            scene: Scene::new(),
            registry: config.registry(),
            view: ViewTransform::new(config.zoom, viewport),
            grid_size: config.size,
            tool: ToolKind::default(),
            ids: IdAllocator::new(),
            captured: None,
            focused: None,
            panning: false,
            pending_edge: None,
            measure: Box::new(BoxMeasure::new(config.container_insets)),
            drop_policy: Box::new(AcceptDrops),
        }
    }

    pub fn set_measure(&mut self, measure: Box<dyn Measure>) {
        self.measure = measure;
    }

    pub fn set_drop_policy(&mut self, policy: Box<dyn DropPolicy>) {
        self.drop_policy = policy;
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            offset: self.view.offset,
            zoom: self.view.zoom(),
            grid_size: self.grid_size,
        }
    }

    /// The id the next created element will get.
    pub fn next_element_id(&self) -> ElementId {
        self.ids.peek()
    }

    // ── Hit testing & routing ──

    pub fn hit_test(&self, screen: Position) -> HitTarget {
        cg_render::hit_test(
            &self.scene,
            self.measure.as_ref(),
            self.view.screen_to_canvas(screen),
        )
    }

    /// The pointer-captured element wins over whatever is under the pointer.
    pub fn route(&self, hit: HitTarget) -> HitTarget {
        match self.captured.and_then(|id| self.scene.get(id).ok()) {
            Some(e) if e.is_component() => HitTarget::Component(e.id),
            Some(e) => HitTarget::Connection(e.id),
            None => hit,
        }
    }

    pub fn pointer_event(
        &self,
        position: Position,
        last_position: Position,
        modifiers: Modifiers,
    ) -> PointerEvent {
        let hit = self.hit_test(position);
        PointerEvent {
            position,
            last_position,
            hit,
            target: self.route(hit),
            modifiers,
        }
    }

    /// Canvas-space box of an element, following container nesting.
    pub fn absolute_rect(&self, id: ElementId) -> Result<Rect> {
        let size = self.scene.get(id)?.size;
        let origin = absolute_position(&self.scene, self.measure.as_ref(), id)
            .ok_or(GridError::Detached(id))?;
        Ok(Rect::from_parts(origin, size))
    }

    // ── Capture & focus slots ──

    pub fn pointer_captured(&self) -> Option<ElementId> {
        self.captured
    }

    /// Hand the pointer to `id`. The previous holder stops moving/resizing.
    pub fn set_pointer_captured(&mut self, id: Option<ElementId>) {
        if let Some(prev) = self.captured.take()
            && let Ok(e) = self.scene.get_mut(prev)
        {
            e.moving = false;
            if let Ok(c) = e.component_mut() {
                c.resizing = None;
            }
        }
        if let Some(id) = id {
            log::debug!("pointer captured by {id}");
        }
        self.captured = id;
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Focus a component (or nothing) and raise it, with every ancestor
    /// container, to the top of the z-order.
    pub fn set_focused(&mut self, id: Option<ElementId>) -> Result<()> {
        if let Some(new) = id {
            self.scene.get(new)?.component()?;
        }
        if let Some(prev) = self.focused.take()
            && let Ok(e) = self.scene.get_mut(prev)
            && let Ok(c) = e.component_mut()
        {
            c.focused = false;
        }
        if let Some(new) = id {
            self.scene.get_mut(new)?.component_mut()?.focused = true;
            self.scene.raise_chain(new)?;
            log::debug!("focused {new}");
        }
        self.focused = id;
        Ok(())
    }

    pub fn is_panning(&self) -> bool {
        self.panning
    }

    pub fn pending_edge(&self) -> Option<ElementId> {
        self.pending_edge
    }

    pub(crate) fn set_pending_edge(&mut self, id: Option<ElementId>) {
        self.pending_edge = id;
    }

    /// Abandon whatever gesture is in flight: release the capture, clear
    /// moving/resizing flags, stop panning, drop an uncommitted connection.
    pub fn reset_interaction(&mut self) {
        self.set_pointer_captured(None);
        self.panning = false;
        if let Some(edge) = self.pending_edge.take()
            && self.scene.contains(edge)
        {
            log::debug!("discarding uncommitted connection {edge}");
            if let Err(err) = self.remove_element(edge) {
                log::warn!("could not discard connection {edge}: {err}");
            }
        }
    }

    // ── Element lifecycle ──

    /// Instantiate a registered template under `parent` with a fresh id.
    pub fn create_element(
        &mut self,
        element_type: ElementType,
        label: &str,
        parent: Parent,
    ) -> Result<ElementId> {
        let template = self.registry.lookup(element_type, label)?;
        let id = self.ids.next_id()?;
        self.scene.insert(parent, template.build(id))?;
        log::debug!("created {} \"{label}\" {id}", element_type.as_str());
        Ok(id)
    }

    /// Attach an already-built element, keeping its id.
    pub fn append_element(&mut self, parent: Parent, element: Element) -> Result<ElementId> {
        let id = element.id;
        if self.scene.contains(id) {
            return Err(GridError::InvalidData(format!("duplicate element id {id}")));
        }
        self.ids.reserve(id);
        self.scene.insert(parent, element)?;
        Ok(id)
    }

    /// Remove an element with everything it owns. Connections anchored to a
    /// removed component go with it. Returns every removed id.
    pub fn remove_element(&mut self, id: ElementId) -> Result<Vec<ElementId>> {
        let mut removed = self.scene.remove(id)?;

        let mut dangling: Vec<ElementId> = removed
            .iter()
            .flat_map(|&gone| self.scene.connections_anchored_to(gone))
            .collect();
        dangling.sort();
        dangling.dedup();
        for edge in dangling {
            if self.scene.contains(edge) {
                removed.extend(self.scene.remove(edge)?);
            }
        }

        for slot in [&mut self.captured, &mut self.focused, &mut self.pending_edge] {
            if slot.is_some_and(|held| removed.contains(&held)) {
                *slot = None;
            }
        }
        log::debug!("removed {} element(s) starting at {id}", removed.len());
        Ok(removed)
    }

    /// Drop every element and reset the interaction slots.
    pub fn clear(&mut self) {
        self.reset_interaction();
        self.focused = None;
        self.scene.clear();
    }

    fn apply_shortcut(&mut self, action: ShortcutAction) -> Result<()> {
        match action {
            ShortcutAction::ToolGrab => self.tool = ToolKind::Grab,
            ShortcutAction::ToolResize => self.tool = ToolKind::Resize,
            ShortcutAction::ToolConnect => self.tool = ToolKind::Connect,
            ShortcutAction::ZoomIn => {
                self.view.zoom_step(1);
            }
            ShortcutAction::ZoomOut => {
                self.view.zoom_step(-1);
            }
            ShortcutAction::ClearFocus => self.set_focused(None)?,
            ShortcutAction::Delete => {
                if let Some(id) = self.focused {
                    self.remove_element(id)?;
                }
            }
        }
        log::debug!("shortcut {action:?} (tool: {})", self.tool);
        Ok(())
    }
}

// ─── Canvas ──────────────────────────────────────────────────────────────

pub struct Canvas {
    pub state: CanvasState,
    extensions: Vec<Box<dyn CanvasExtension>>,
}

impl Canvas {
    /// A canvas with no extensions.
    pub fn new(config: &GridConfig, viewport: Rect) -> Self {
        Self {
            state: CanvasState::new(config, viewport),
            extensions: Vec::new(),
        }
    }

    /// A canvas with the component/collision and connection extensions.
    /// Fails when the configuration registers no connection type.
    pub fn standard(config: &GridConfig, viewport: Rect) -> Result<Self> {
        let mut canvas = Self::new(config, viewport);
        let connections = ConnectionExtension::new(&canvas.state.registry)?;
        canvas.add_extension(Box::new(CollisionExtension::new(config.collision.clone())));
        canvas.add_extension(Box::new(connections));
        Ok(canvas)
    }

    pub fn add_extension(&mut self, extension: Box<dyn CanvasExtension>) {
        log::debug!("registered canvas extension \"{}\"", extension.name());
        self.extensions.push(extension);
    }

    pub fn extension_names(&self) -> Vec<&str> {
        self.extensions.iter().map(|e| e.name()).collect()
    }

    fn guarded(&mut self, f: impl FnOnce(&mut Self) -> Result<()>) -> Result<()> {
        let result = f(self);
        if let Err(err) = &result {
            log::warn!("interaction aborted: {err}");
            self.state.reset_interaction();
        }
        result
    }

    // ── Pointer ──

    pub fn pointer_down(&mut self, event: &PointerEvent) -> Result<()> {
        self.guarded(|canvas| {
            if let Some(stale) = canvas.state.pointer_captured() {
                // The previous release happened outside the tracked area.
                log::warn!("pointer still captured by {stale} on press; releasing");
                canvas.state.reset_interaction();
            }
            let event = PointerEvent {
                target: event.hit,
                ..*event
            };
            for ext in &mut canvas.extensions {
                ext.on_pointer_down(&mut canvas.state, &event)?;
            }

            let state = &mut canvas.state;
            if event.hit == HitTarget::Canvas {
                state.set_focused(None)?;
                if state.tool.pans() && state.captured.is_none() {
                    state.panning = true;
                    log::debug!("pan start");
                }
            }
            Ok(())
        })
    }

    pub fn pointer_move(&mut self, event: &PointerEvent) -> Result<()> {
        self.guarded(|canvas| {
            for ext in &mut canvas.extensions {
                ext.on_pointer_move(&mut canvas.state, event)?;
            }
            let state = &mut canvas.state;
            if state.panning {
                let delta = state.view.drag_delta(event.last_position, event.position);
                state.view.pan(delta);
                log::trace!("pan to ({}, {})", state.view.offset.x, state.view.offset.y);
            }
            Ok(())
        })
    }

    pub fn pointer_up(&mut self, event: &PointerEvent) -> Result<()> {
        self.guarded(|canvas| {
            for ext in &mut canvas.extensions {
                ext.on_pointer_up(&mut canvas.state, event)?;
            }
            let state = &mut canvas.state;
            if state.panning {
                state.panning = false;
                log::debug!("pan end");
            }
            state.set_pointer_captured(None);
            Ok(())
        })
    }

    pub fn click(&mut self, event: &PointerEvent) -> Result<()> {
        self.guarded(|canvas| {
            for ext in &mut canvas.extensions {
                ext.on_click(&mut canvas.state, event)?;
            }
            Ok(())
        })
    }

    // ── Wheel & keyboard ──

    /// Negative `delta_y` (scroll up) zooms in one step, positive zooms out.
    pub fn wheel(&mut self, delta_y: f32) {
        let direction = if delta_y < 0.0 {
            1
        } else if delta_y > 0.0 {
            -1
        } else {
            return;
        };
        let zoom = self.state.view.zoom_step(direction);
        log::debug!("zoom {zoom}");
    }

    pub fn key(&mut self, event: &KeyEvent) -> Result<()> {
        self.guarded(|canvas| {
            let m = event.modifiers;
            if event.pressed
                && let Some(action) = ShortcutMap::resolve(&event.key, m.ctrl, m.shift, m.alt, m.meta)
            {
                canvas.state.apply_shortcut(action)?;
            }
            for ext in &mut canvas.extensions {
                ext.on_key(&mut canvas.state, event)?;
            }
            Ok(())
        })
    }

    // ─── Persistence ─────────────────────────────────────────────────────

    /// Rebuild the canvas from saved data. Elements keep their ids; nesting
    /// is restored from `parentId`, so parents must precede their children.
    pub fn import(&mut self, data: &GridData) -> Result<()> {
        self.guarded(|canvas| {
            let state = &mut canvas.state;
            state.clear();
            state.ids.restore(data.current_element_id);
            let zoom = state.view.set_zoom(data.zoom);
            if zoom != data.zoom {
                log::warn!("imported zoom {} clamped to {zoom}", data.zoom);
            }
            state.view.offset = data.offset;

            for record in &data.elements {
                let meta = record.element();
                let mut element = state
                    .registry
                    .instantiate(meta.element_type, &meta.label, meta.id)?;
                record.apply_to(&mut element)?;
                let parent = meta.parent_id.map_or(Parent::Root, Parent::Container);
                state.append_element(parent, element)?;
            }

            for (name, value) in &data.modules {
                let ext = canvas
                    .extensions
                    .iter_mut()
                    .find(|e| e.name() == name)
                    .ok_or_else(|| GridError::UnregisteredModule(name.clone()))?;
                ext.import(value)?;
            }
            log::debug!(
                "imported {} element(s), next id {}",
                data.elements.len(),
                canvas.state.next_element_id()
            );
            Ok(())
        })
    }

    /// Serialize attached elements in z-order, depth first through
    /// containers. A connection still being drawn is left out.
    pub fn export(&self) -> Result<GridData> {
        let state = &self.state;
        let elements = state
            .scene
            .walk()
            .into_iter()
            .filter(|&id| Some(id) != state.pending_edge)
            .map(|id| {
                let parent = match state.scene.parent_of(id)? {
                    Parent::Root => None,
                    Parent::Container(owner) => Some(owner),
                };
                Ok(ElementRecord::from_element(state.scene.get(id)?, parent))
            })
            .collect::<Result<Vec<_>>>()?;

        let modules = self
            .extensions
            .iter()
            .filter_map(|e| e.export().map(|value| (e.name().to_string(), value)))
            .collect();

        log::debug!("exported {} element(s)", elements.len());
        Ok(GridData {
            current_element_id: state.ids.peek().get(),
            zoom: state.view.zoom(),
            offset: state.view.offset,
            elements,
            modules,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORT: Rect = Rect::new(0.0, 0.0, 800.0, 600.0);

    fn config() -> GridConfig {
        GridConfig::from_json(
            r#"{
                "elements": [
                    {"type": "component", "label": "block", "size": {"w": 100, "h": 60}},
                    {"type": "component", "label": "group", "size": {"w": 300, "h": 200}, "container": true}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn ids_are_monotonic_and_never_reused() {
        let mut state = CanvasState::new(&config(), VIEWPORT);
        let a = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        let b = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        assert_eq!((a.get(), b.get()), (1, 2));
        state.remove_element(b).unwrap();
        let c = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        assert_eq!(c.get(), 3);
    }

    #[test]
    fn unregistered_label_consumes_no_id() {
        let mut state = CanvasState::new(&config(), VIEWPORT);
        let err = state
            .create_element(ElementType::Component, "ghost", Parent::Root)
            .unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(state.next_element_id().get(), 1);
    }

    #[test]
    fn creation_fails_once_ids_run_out() {
        let mut state = CanvasState::new(&config(), VIEWPORT);
        state.ids.restore(u32::MAX);
        let last = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        assert_eq!(last.get(), u32::MAX);
        let err = state
            .create_element(ElementType::Component, "block", Parent::Root)
            .unwrap_err();
        assert_eq!(err, GridError::IdsExhausted);
        assert_eq!(state.scene.elements().count(), 1);
    }

    #[test]
    fn focus_is_exclusive_and_raises_the_container_chain() {
        let mut state = CanvasState::new(&config(), VIEWPORT);
        let group = state.create_element(ElementType::Component, "group", Parent::Root).unwrap();
        let other = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        let inner = state
            .create_element(ElementType::Component, "block", Parent::Container(group))
            .unwrap();

        state.set_focused(Some(other)).unwrap();
        state.set_focused(Some(inner)).unwrap();
        assert!(!state.scene.get(other).unwrap().component().unwrap().focused);
        assert!(state.scene.get(inner).unwrap().component().unwrap().focused);
        assert_eq!(state.scene.elements_in(Parent::Root), vec![other, group]);

        state.set_focused(None).unwrap();
        assert_eq!(state.focused(), None);
        assert!(!state.scene.get(inner).unwrap().component().unwrap().focused);
    }

    #[test]
    fn capture_reassignment_clears_previous_flags() {
        let mut state = CanvasState::new(&config(), VIEWPORT);
        let a = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        let b = state.create_element(ElementType::Component, "block", Parent::Root).unwrap();
        state.set_pointer_captured(Some(a));
        {
            let e = state.scene.get_mut(a).unwrap();
            e.moving = true;
            e.component_mut().unwrap().resizing = Some(ResizeEdge::Left);
        }
        state.set_pointer_captured(Some(b));
        let e = state.scene.get(a).unwrap();
        assert!(!e.moving);
        assert_eq!(e.component().unwrap().resizing, None);
        assert_eq!(state.pointer_captured(), Some(b));
    }

    #[test]
    fn removing_a_group_clears_slots_for_nested_elements() {
        let mut state = CanvasState::new(&config(), VIEWPORT);
        let group = state.create_element(ElementType::Component, "group", Parent::Root).unwrap();
        let inner = state
            .create_element(ElementType::Component, "block", Parent::Container(group))
            .unwrap();
        state.set_focused(Some(inner)).unwrap();
        state.set_pointer_captured(Some(inner));

        let removed = state.remove_element(group).unwrap();
        assert_eq!(removed, vec![group, inner]);
        assert_eq!(state.focused(), None);
        assert_eq!(state.pointer_captured(), None);
    }

    #[test]
    fn wheel_zooms_by_step_and_ignores_zero() {
        let mut canvas = Canvas::new(&config(), VIEWPORT);
        canvas.wheel(-120.0);
        assert_eq!(canvas.state.view.zoom(), 1.25);
        canvas.wheel(0.0);
        assert_eq!(canvas.state.view.zoom(), 1.25);
        canvas.wheel(40.0);
        canvas.wheel(40.0);
        assert_eq!(canvas.state.view.zoom(), 0.75);
    }

    #[test]
    fn standard_canvas_requires_a_connection_type() {
        let err = Canvas::standard(&config(), VIEWPORT).err().unwrap();
        assert_eq!(err, GridError::NoConnectionType);

        let config = GridConfig::from_json(
            r#"{"elements": [{"type": "connection", "label": "line"}]}"#,
        )
        .unwrap();
        let canvas = Canvas::standard(&config, VIEWPORT).unwrap();
        assert_eq!(canvas.extension_names(), vec!["components", "connections"]);
    }
}
