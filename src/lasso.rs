//! Freehand lasso selector.
//!
//! Dragging over the overlay draws a curve; releasing closes it and asks every
//! mark view which of its points fall inside. Curves that enclose nothing are
//! dropped right away. Clicking a curve toggles its `selected` class, and the
//! delete key removes all selected curves together with their membership.
//!
//! Curve ids are `l<N>` where `N` is the running counter. The counter goes up
//! on every drag start and back down only when the curve of that same drag is
//! dropped for being empty, so a reclaimed id is always the one just freed.

use egui::Pos2;

use crate::color::parse_css_color;
use crate::config::LassoConfig;
use crate::drag::{DragBehavior, DragEvent, PointerEvent};
use crate::events::{EventController, EventKind, ResizeMeta, SelectorEvent};
use crate::geometry::{point_in_lasso, LineGenerator};
use crate::keyboard::{KeyEvent, KeyListener, KeyboardHub};
use crate::model::WidgetModel;
use crate::ready::ReadySignal;
use crate::scales::Scales;
use crate::selector::{BaseSelector, XySelector};
use crate::surface::{PathElement, Surface, SELECTED_CLASS};

pub const SURFACE_CLASS: &str = "lassoselector";

pub struct LassoSelector {
    base: XySelector,
    config: LassoConfig,
    line: LineGenerator,
    lasso_vertices: Vec<Pos2>,
    lasso_counter: u32,
    drag: DragBehavior,
    keyboard: KeyboardHub,
    key_listener: Option<KeyListener>,
    scales_ready: Option<ReadySignal<Scales>>,
    rendered: bool,
    interactive: bool,
    torn_down: bool,
    events: Option<EventController>,
}

impl LassoSelector {
    pub fn new(base: XySelector, keyboard: KeyboardHub) -> Self {
        Self {
            base,
            config: LassoConfig::default(),
            line: LineGenerator::new(),
            lasso_vertices: Vec::new(),
            lasso_counter: 0,
            drag: DragBehavior::new(),
            keyboard,
            key_listener: None,
            scales_ready: None,
            rendered: false,
            interactive: false,
            torn_down: false,
            events: None,
        }
    }

    pub fn with_config(mut self, config: LassoConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_events(mut self, events: EventController) -> Self {
        self.events = Some(events);
        self
    }

    pub fn base(&self) -> &XySelector {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut XySelector {
        &mut self.base
    }

    pub fn config(&self) -> &LassoConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        self.base.surface()
    }

    pub fn model(&self) -> &WidgetModel {
        self.base.model()
    }

    pub fn lasso_counter(&self) -> u32 {
        self.lasso_counter
    }

    pub fn lasso_vertices(&self) -> &[Pos2] {
        &self.lasso_vertices
    }

    /// Id of the most recently started curve.
    pub fn current_lasso_id(&self) -> String {
        format!("l{}", self.lasso_counter)
    }

    /// Whether the startup rendezvous completed and input is handled.
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_drawing(&self) -> bool {
        self.drag.is_dragging()
    }

    pub(crate) fn emit(&self, event: SelectorEvent) {
        if let Some(events) = &self.events {
            events.emit(event);
        }
    }

    // ── startup ─────────────────────────────────────────────────────────

    /// Attach the interaction handlers once mark views and scales are both
    /// ready. Returns whether the selector is interactive.
    pub fn poll_ready(&mut self) -> bool {
        if self.interactive {
            return true;
        }
        if !self.rendered || self.torn_down {
            return false;
        }
        let views_ready = self.base.mark_views_ready().is_resolved();
        let scales_ready = self
            .scales_ready
            .as_ref()
            .is_some_and(|s| s.is_resolved());
        if !(views_ready && scales_ready) {
            log::debug!(
                "lasso selector waiting: mark views ready={}, scales ready={}",
                views_ready,
                scales_ready
            );
            return false;
        }
        self.attach();
        true
    }

    fn attach(&mut self) {
        self.key_listener = Some(self.keyboard.listen());
        let surface = self.base.surface().clone();
        surface.set_class(SURFACE_CLASS);
        surface.append_overlay(self.base.width(), self.base.height());
        self.create_listeners();
        self.interactive = true;
        log::debug!(
            "lasso selector interactive ({}x{}, {} mark view(s))",
            self.base.width(),
            self.base.height(),
            self.base.mark_views().len()
        );
        self.emit(SelectorEvent::new(EventKind::READY));
    }

    /// Record a new plot size, relayout, and complete startup if it was waiting on scales.
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.base.set_size(width, height);
        self.relayout();
        self.poll_ready();
    }

    /// Per-frame housekeeping: finish startup and handle queued key presses.
    pub fn poll(&mut self) {
        if !self.poll_ready() {
            return;
        }
        let pending = match &self.key_listener {
            Some(listener) => listener.drain(),
            None => Vec::new(),
        };
        for event in pending {
            self.keydown(&event);
        }
    }

    /// Release the keyboard registration and every model listener.
    /// A torn-down selector never becomes interactive again.
    pub fn teardown(&mut self) {
        self.key_listener = None;
        self.base.teardown();
        self.interactive = false;
        self.torn_down = true;
    }

    // ── color ───────────────────────────────────────────────────────────

    /// Restyle every drawn curve. Empty or absent colors change nothing.
    pub fn change_color(&self, color: Option<&str>) -> bool {
        restyle_strokes(self.base.surface(), self.events.as_ref(), color)
    }

    // ── gesture ─────────────────────────────────────────────────────────

    /// Feed a pointer event through the drag recognizer.
    pub fn pointer(&mut self, event: PointerEvent) {
        if !self.interactive {
            return;
        }
        match self.drag.on_pointer(event) {
            Some(DragEvent::Start(_)) => self.drag_start(),
            Some(DragEvent::Move(p)) => self.drag_move(p),
            Some(DragEvent::End(_)) => self.drag_end(),
            None => {}
        }
    }

    /// Screen position of the overlay's top-left corner.
    pub fn set_origin(&mut self, origin: Pos2) {
        self.drag.set_origin(origin);
    }

    pub fn drag_start(&mut self) {
        self.lasso_vertices.clear();
        self.lasso_counter += 1;
        let id = self.current_lasso_id();
        let mut element = PathElement::new(id.clone());
        if let Some(color) = self.base.model().color() {
            element.stroke = Some(color);
        }
        self.base.surface().append_path(element);
        log::trace!("lasso {} started", id);
        self.emit(SelectorEvent::new(EventKind::LASSO_STARTED).with_lasso(&id, 0, None));
    }

    /// Append `pos` (overlay-local) and redraw the curve as an open polyline.
    pub fn drag_move(&mut self, pos: Pos2) {
        self.lasso_vertices.push(pos);
        let id = self.current_lasso_id();
        let line = self.line;
        let vertices = &self.lasso_vertices;
        self.base
            .surface()
            .update_path(&id, |p| p.set_geometry(&line, vertices, false));
    }

    /// Close the curve and run membership on every mark view; drop it if it holds nothing.
    pub fn drag_end(&mut self) {
        let id = self.current_lasso_id();
        let line = self.line;
        let vertices = self.lasso_vertices.clone();
        self.base
            .surface()
            .update_path(&id, |p| p.set_geometry(&line, &vertices, true));

        let mut mark_data_in_lasso = false;
        for view in self.base.mark_views_mut() {
            if view.update_selected_in_lasso(&id, Some(&vertices), Some(point_in_lasso)) {
                mark_data_in_lasso = true;
            }
        }

        if mark_data_in_lasso {
            log::debug!("lasso {} closed with {} vertices", id, vertices.len());
            self.emit(
                SelectorEvent::new(EventKind::LASSO_CLOSED | EventKind::SELECTION_CHANGED)
                    .with_lasso(&id, vertices.len(), None),
            );
        } else {
            self.base.surface().remove_path(&id);
            self.lasso_counter = self.lasso_counter.saturating_sub(1);
            log::debug!("lasso {} discarded: no data inside", id);
            self.emit(
                SelectorEvent::new(EventKind::LASSO_DISCARDED).with_lasso(&id, vertices.len(), None),
            );
        }
    }

    // ── curve management ────────────────────────────────────────────────

    /// Flip the `selected` class of a curve. Returns the new state.
    pub fn toggle_curve(&mut self, id: &str) -> Option<bool> {
        let selected = self.base.surface().toggle_class(id, SELECTED_CLASS)?;
        let vertex_count = self.base.surface().path(id).map_or(0, |p| p.vertices.len());
        self.emit(
            SelectorEvent::new(EventKind::LASSO_TOGGLED).with_lasso(id, vertex_count, Some(selected)),
        );
        Some(selected)
    }

    /// Click at an overlay-local position: toggles the topmost curve under it.
    pub fn click(&mut self, pos: Pos2) -> Option<bool> {
        if !self.interactive || !self.config.click_to_select || self.is_drawing() {
            return None;
        }
        let id = self.base.surface().hit_test(pos)?;
        self.toggle_curve(&id)
    }

    /// Only the configured delete key acts: every selected curve is cleared
    /// from all mark views and removed. The counter is left as is.
    pub fn keydown(&mut self, event: &KeyEvent) {
        let mut ev = SelectorEvent::new(EventKind::KEY_PRESSED);
        ev.key_code = Some(event.key_code);
        self.emit(ev);

        if !event.matches_binding(self.config.delete_key_code) {
            return;
        }
        let selected = self.base.surface().classed(SELECTED_CLASS);
        for id in selected {
            for view in self.base.mark_views_mut() {
                view.update_selected_in_lasso(&id, None, None);
            }
            if let Some(removed) = self.base.surface().remove_path(&id) {
                log::debug!("lasso {} deleted", id);
                self.emit(
                    SelectorEvent::new(EventKind::LASSO_DELETED | EventKind::SELECTION_CHANGED)
                        .with_lasso(&id, removed.vertices.len(), Some(true)),
                );
            }
        }
    }
}

/// Apply `color` to every path on `surface`; `None` and `""` are ignored.
fn restyle_strokes(surface: &Surface, events: Option<&EventController>, color: Option<&str>) -> bool {
    let Some(color) = color.filter(|c| !c.is_empty()) else {
        return false;
    };
    if let Err(e) = parse_css_color(color) {
        log::warn!("lasso stroke will use the fallback color: {}", e);
    }
    let n = surface.style_all_strokes(color);
    log::debug!("restyled {} lasso(s) to {}", n, color);
    if let Some(events) = events {
        let mut ev = SelectorEvent::new(EventKind::COLOR_CHANGED);
        ev.color = Some(color.to_string());
        events.emit(ev);
    }
    true
}

impl BaseSelector for LassoSelector {
    fn render(&mut self) {
        if self.rendered {
            return;
        }
        self.base.render();
        self.scales_ready = Some(self.base.create_scales());
        self.line = LineGenerator::new();
        self.lasso_vertices.clear();
        self.lasso_counter = 0;
        self.rendered = true;
        self.poll_ready();
    }

    fn create_listeners(&mut self) {
        self.base.create_listeners();
        let surface = self.base.surface().clone();
        let events = self.events.clone();
        let id = self.base.model().listen_to("change:color", move |_, value| {
            restyle_strokes(&surface, events.as_ref(), value.as_str());
        });
        self.base.track_listener(id);
    }

    fn relayout(&mut self) {
        self.base.relayout();
        let (width, height) = (self.base.width(), self.base.height());
        let changed = self
            .base
            .surface()
            .overlay()
            .is_some_and(|o| o.width != width || o.height != height);
        if self.base.surface().resize_overlay(width, height) && changed {
            let mut ev = SelectorEvent::new(EventKind::RESIZE);
            ev.resize = Some(ResizeMeta { width, height });
            self.emit(ev);
        }
    }
}

impl Drop for LassoSelector {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mark::ScatterMarkView;
    use egui::pos2;

    fn ready_selector() -> LassoSelector {
        let model = WidgetModel::new();
        let mut base = XySelector::new(model, (0.0, 10.0), (0.0, 10.0));
        base.set_size(100.0, 100.0);
        let mut sel = LassoSelector::new(base, KeyboardHub::new());
        sel.render();
        let scales = sel.base().scales().unwrap();
        let mark = ScatterMarkView::new("m", vec![[1.0, 9.0], [2.0, 8.0]], scales, WidgetModel::new());
        sel.base_mut().set_mark_views(vec![Box::new(mark)]);
        assert!(sel.poll_ready());
        sel
    }

    fn draw(sel: &mut LassoSelector, pts: &[Pos2]) {
        sel.drag_start();
        for p in pts {
            sel.drag_move(*p);
        }
        sel.drag_end();
    }

    #[test]
    fn open_path_while_drawing_closed_after() {
        let mut sel = ready_selector();
        sel.drag_start();
        sel.drag_move(pos2(0.0, 0.0));
        sel.drag_move(pos2(30.0, 0.0));
        let during = sel.surface().path("l1").unwrap();
        assert_eq!(during.d, "M0,0L30,0");
        assert!(!during.closed);
        sel.drag_move(pos2(30.0, 30.0));
        sel.drag_move(pos2(0.0, 30.0));
        sel.drag_end();
        let after = sel.surface().path("l1").unwrap();
        assert_eq!(after.d, "M0,0L30,0L30,30L0,30Z");
        assert!(after.closed);
    }

    #[test]
    fn render_is_idempotent() {
        let mut sel = ready_selector();
        draw(&mut sel, &[pos2(0.0, 0.0), pos2(30.0, 0.0), pos2(30.0, 30.0), pos2(0.0, 30.0)]);
        sel.render();
        assert_eq!(sel.lasso_counter(), 1);
        assert_eq!(sel.surface().path_count(), 1);
    }

    #[test]
    fn click_toggles_curve_under_pointer() {
        let mut sel = ready_selector();
        draw(&mut sel, &[pos2(0.0, 0.0), pos2(30.0, 0.0), pos2(30.0, 30.0), pos2(0.0, 30.0)]);
        assert_eq!(sel.click(pos2(15.0, 15.0)), Some(true));
        assert_eq!(sel.click(pos2(15.0, 15.0)), Some(false));
        assert_eq!(sel.click(pos2(80.0, 80.0)), None);
    }
}
