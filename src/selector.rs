//! Base selector shared by the interactive selectors.
//!
//! [`BaseSelector`] names the hooks a selector overrides; [`XySelector`] is the
//! base implementation that concrete selectors hold and delegate to. It owns
//! the drawing surface, the model, the pixel size, the x/y scales and the mark
//! views, together with the two readiness signals a selector waits on before
//! it becomes interactive.

use egui::Pos2;

use crate::mark::MarkView;
use crate::model::{ListenerId, WidgetModel};
use crate::ready::ReadySignal;
use crate::scales::Scales;
use crate::surface::Surface;

/// Hooks of a selector view.
pub trait BaseSelector {
    /// One-time setup after the view is created.
    fn render(&mut self);
    /// Subscribe to model changes.
    fn create_listeners(&mut self);
    /// React to a size change of the plot area.
    fn relayout(&mut self);
}

pub struct XySelector {
    surface: Surface,
    model: WidgetModel,
    width: f32,
    height: f32,
    x_domain: (f64, f64),
    y_domain: (f64, f64),
    scales: Option<Scales>,
    scales_requested: bool,
    scales_ready: ReadySignal<Scales>,
    mark_views: Vec<Box<dyn MarkView>>,
    mark_views_ready: ReadySignal<()>,
    listeners: Vec<ListenerId>,
}

impl XySelector {
    pub fn new(model: WidgetModel, x_domain: (f64, f64), y_domain: (f64, f64)) -> Self {
        Self {
            surface: Surface::new(),
            model,
            width: 0.0,
            height: 0.0,
            x_domain,
            y_domain,
            scales: None,
            scales_requested: false,
            scales_ready: ReadySignal::pending(),
            mark_views: Vec::new(),
            mark_views_ready: ReadySignal::pending(),
            listeners: Vec::new(),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn model(&self) -> &WidgetModel {
        &self.model
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Record the plot size. The first non-empty size completes a pending
    /// [`create_scales`](Self::create_scales).
    pub fn set_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
        if self.scales_requested && self.scales.is_none() && self.has_area() {
            self.build_scales();
        }
    }

    fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    fn build_scales(&mut self) {
        let scales = Scales::new(self.x_domain, self.y_domain, self.width, self.height);
        self.scales = Some(scales);
        self.scales_ready.resolve(scales);
        log::debug!("scales ready at {}x{}", self.width, self.height);
    }

    /// Build the x/y scales for the current size. The returned signal resolves
    /// immediately when the size is known, otherwise on the first non-empty
    /// [`set_size`](Self::set_size).
    pub fn create_scales(&mut self) -> ReadySignal<Scales> {
        self.scales_requested = true;
        if self.scales.is_none() && self.has_area() {
            self.build_scales();
        }
        self.scales_ready.clone()
    }

    pub fn scales(&self) -> Option<Scales> {
        self.scales
    }

    /// Attach the mark views and resolve the mark-views signal.
    pub fn set_mark_views(&mut self, views: Vec<Box<dyn MarkView>>) {
        self.mark_views = views;
        if let Some(scales) = self.scales {
            for view in self.mark_views.iter_mut() {
                view.set_scales(&scales);
            }
        }
        self.mark_views_ready.resolve(());
        log::debug!("{} mark view(s) attached", self.mark_views.len());
    }

    pub fn mark_views_ready(&self) -> ReadySignal<()> {
        self.mark_views_ready.clone()
    }

    pub fn mark_views(&self) -> &[Box<dyn MarkView>] {
        &self.mark_views
    }

    pub fn mark_views_mut(&mut self) -> &mut [Box<dyn MarkView>] {
        &mut self.mark_views
    }

    /// First mark view of concrete type `T`.
    pub fn mark_view<T: MarkView>(&self) -> Option<&T> {
        self.mark_views.iter().find_map(|v| v.downcast_ref::<T>())
    }

    /// Data coordinates of a pixel position, once scales exist.
    pub fn invert(&self, p: Pos2) -> Option<[f64; 2]> {
        self.scales.map(|s| s.unproject(p))
    }

    /// Keep `id` registered until [`teardown`](Self::teardown).
    pub fn track_listener(&mut self, id: ListenerId) {
        self.listeners.push(id);
    }

    /// Unregister every model listener this selector added.
    pub fn teardown(&mut self) {
        for id in self.listeners.drain(..) {
            self.model.stop_listening(id);
        }
    }
}

impl BaseSelector for XySelector {
    fn render(&mut self) {
        self.surface.set_visible(self.model.visible());
    }

    fn create_listeners(&mut self) {
        let surface = self.surface.clone();
        let id = self.model.listen_to("change:visible", move |_, value| {
            surface.set_visible(value.as_bool().unwrap_or(true));
        });
        self.track_listener(id);
    }

    fn relayout(&mut self) {
        if let Some(scales) = self.scales.as_mut() {
            scales.resize(self.width, self.height);
            let scales = *scales;
            for view in self.mark_views.iter_mut() {
                view.set_scales(&scales);
            }
        }
    }
}

impl Drop for XySelector {
    fn drop(&mut self) {
        self.teardown();
    }
}
