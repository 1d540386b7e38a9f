//! Retained drawing surface of a selector.
//!
//! The surface is the selector's own layer on top of the plot: one optional
//! overlay rectangle capturing pointer input, plus the path elements of the
//! drawn curves in creation order. It is painted with egui each frame (see
//! `ui`) and can be serialized to SVG (see `export`).

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use egui::Pos2;

use crate::geometry::{point_in_lasso, LineGenerator};

/// Class that marks a curve as targeted by the delete key.
pub const SELECTED_CLASS: &str = "selected";

/// Hidden, full-size rectangle that receives pointer input for the selector.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub visibility: &'static str,
    pub pointer_events: &'static str,
    pub cursor: &'static str,
}

impl OverlayRect {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            visibility: "hidden",
            pointer_events: "all",
            cursor: "crosshair",
        }
    }

    pub fn contains(&self, p: Pos2) -> bool {
        p.x >= self.x && p.y >= self.y && p.x <= self.x + self.width && p.y <= self.y + self.height
    }
}

/// A drawn curve.
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub id: String,
    pub vertices: Vec<Pos2>,
    pub closed: bool,
    /// SVG path data for `vertices`.
    pub d: String,
    pub stroke: Option<String>,
    pub classes: BTreeSet<String>,
}

impl PathElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            vertices: Vec::new(),
            closed: false,
            d: String::new(),
            stroke: None,
            classes: BTreeSet::new(),
        }
    }

    pub fn set_geometry(&mut self, line: &LineGenerator, vertices: &[Pos2], closed: bool) {
        self.vertices = vertices.to_vec();
        self.closed = closed;
        self.d = if closed {
            line.closed_path(vertices)
        } else {
            line.path(vertices)
        };
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn is_selected(&self) -> bool {
        self.has_class(SELECTED_CLASS)
    }
}

/// Shared handle to a selector's element tree. Clones address the same tree.
#[derive(Clone, Default)]
pub struct Surface {
    inner: Arc<Mutex<SurfaceInner>>,
}

struct SurfaceInner {
    class: Option<String>,
    visible: bool,
    overlay: Option<OverlayRect>,
    paths: Vec<PathElement>,
}

impl Default for SurfaceInner {
    fn default() -> Self {
        Self {
            class: None,
            visible: true,
            overlay: None,
            paths: Vec::new(),
        }
    }
}

impl Surface {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_class(&self, class: &str) {
        self.lock().class = Some(class.to_string());
    }

    pub fn class(&self) -> Option<String> {
        self.lock().class.clone()
    }

    pub fn set_visible(&self, visible: bool) {
        self.lock().visible = visible;
    }

    pub fn is_visible(&self) -> bool {
        self.lock().visible
    }

    // ── overlay ─────────────────────────────────────────────────────────

    /// Create (or replace) the overlay rectangle.
    pub fn append_overlay(&self, width: f32, height: f32) {
        self.lock().overlay = Some(OverlayRect::new(width, height));
    }

    pub fn overlay(&self) -> Option<OverlayRect> {
        self.lock().overlay.clone()
    }

    /// Resize the overlay; returns `false` when there is none yet.
    pub fn resize_overlay(&self, width: f32, height: f32) -> bool {
        match self.lock().overlay.as_mut() {
            Some(o) => {
                o.width = width;
                o.height = height;
                true
            }
            None => false,
        }
    }

    // ── paths ───────────────────────────────────────────────────────────

    pub fn append_path(&self, element: PathElement) {
        self.lock().paths.push(element);
    }

    /// Run `f` on the path with `id`. Returns `None` when no such path exists.
    pub fn update_path<R>(&self, id: &str, f: impl FnOnce(&mut PathElement) -> R) -> Option<R> {
        self.lock().paths.iter_mut().find(|p| p.id == id).map(f)
    }

    pub fn path(&self, id: &str) -> Option<PathElement> {
        self.lock().paths.iter().find(|p| p.id == id).cloned()
    }

    pub fn contains_path(&self, id: &str) -> bool {
        self.lock().paths.iter().any(|p| p.id == id)
    }

    pub fn remove_path(&self, id: &str) -> Option<PathElement> {
        let mut inner = self.lock();
        let idx = inner.paths.iter().position(|p| p.id == id)?;
        Some(inner.paths.remove(idx))
    }

    /// Ids of all paths carrying `class`, in document order.
    pub fn classed(&self, class: &str) -> Vec<String> {
        self.lock()
            .paths
            .iter()
            .filter(|p| p.has_class(class))
            .map(|p| p.id.clone())
            .collect()
    }

    /// Flip `class` on the path; returns the new state.
    pub fn toggle_class(&self, id: &str, class: &str) -> Option<bool> {
        self.update_path(id, |p| {
            if p.classes.remove(class) {
                false
            } else {
                p.classes.insert(class.to_string());
                true
            }
        })
    }

    /// Set the stroke of every path. Returns how many were restyled.
    pub fn style_all_strokes(&self, color: &str) -> usize {
        let mut inner = self.lock();
        for p in inner.paths.iter_mut() {
            p.stroke = Some(color.to_string());
        }
        inner.paths.len()
    }

    pub fn paths(&self) -> Vec<PathElement> {
        self.lock().paths.clone()
    }

    pub fn path_count(&self) -> usize {
        self.lock().paths.len()
    }

    /// Topmost closed path whose area contains `p`.
    pub fn hit_test(&self, p: Pos2) -> Option<String> {
        self.lock()
            .paths
            .iter()
            .rev()
            .find(|el| el.closed && point_in_lasso(p, &el.vertices))
            .map(|el| el.id.clone())
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("Surface")
            .field("class", &inner.class)
            .field("visible", &inner.visible)
            .field("overlay", &inner.overlay)
            .field("paths", &inner.paths.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn closed(id: &str, pts: &[Pos2]) -> PathElement {
        let mut el = PathElement::new(id);
        el.set_geometry(&LineGenerator::new(), pts, true);
        el
    }

    fn square(x: f32) -> Vec<Pos2> {
        vec![pos2(x, 0.0), pos2(x + 10.0, 0.0), pos2(x + 10.0, 10.0), pos2(x, 10.0)]
    }

    #[test]
    fn overlay_is_hidden_and_captures_pointer() {
        let s = Surface::new();
        assert!(!s.resize_overlay(1.0, 1.0));
        s.append_overlay(300.0, 200.0);
        let o = s.overlay().unwrap();
        assert_eq!((o.x, o.y, o.width, o.height), (0.0, 0.0, 300.0, 200.0));
        assert_eq!(o.visibility, "hidden");
        assert_eq!(o.pointer_events, "all");
        assert_eq!(o.cursor, "crosshair");
        assert!(s.resize_overlay(10.0, 20.0));
        assert_eq!(s.overlay().unwrap().height, 20.0);
    }

    #[test]
    fn toggle_and_select_by_class() {
        let s = Surface::new();
        s.append_path(closed("l1", &square(0.0)));
        s.append_path(closed("l2", &square(20.0)));
        assert_eq!(s.toggle_class("l2", SELECTED_CLASS), Some(true));
        assert_eq!(s.classed(SELECTED_CLASS), vec!["l2".to_string()]);
        assert_eq!(s.toggle_class("l2", SELECTED_CLASS), Some(false));
        assert!(s.classed(SELECTED_CLASS).is_empty());
        assert_eq!(s.toggle_class("nope", SELECTED_CLASS), None);
    }

    #[test]
    fn hit_test_prefers_topmost_closed_path() {
        let s = Surface::new();
        s.append_path(closed("l1", &square(0.0)));
        s.append_path(closed("l2", &square(5.0)));
        let mut open = PathElement::new("l3");
        open.set_geometry(&LineGenerator::new(), &square(0.0), false);
        s.append_path(open);
        assert_eq!(s.hit_test(pos2(7.0, 5.0)).as_deref(), Some("l2"));
        assert_eq!(s.hit_test(pos2(2.0, 5.0)).as_deref(), Some("l1"));
        assert_eq!(s.hit_test(pos2(50.0, 5.0)), None);
    }

    #[test]
    fn remove_path_returns_element() {
        let s = Surface::new();
        s.append_path(closed("l1", &square(0.0)));
        let removed = s.remove_path("l1").unwrap();
        assert!(removed.d.ends_with('Z'));
        assert!(!s.contains_path("l1"));
        assert!(s.remove_path("l1").is_none());
    }
}
