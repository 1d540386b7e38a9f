//! egui integration: input routing and painting for [`LassoSelector`].

use egui::{Color32, CursorIcon, Mesh, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use crate::color::{parse_css_color, DEFAULT_STROKE};
use crate::drag::DragBehavior;
use crate::geometry::{bounds, even_odd_spans};
use crate::lasso::LassoSelector;
use crate::surface::Surface;
use crate::LassoConfig;

impl LassoSelector {
    /// Show the selector over the remaining space of `ui`.
    ///
    /// Key presses are not read here: the host forwards them once per frame
    /// to the shared [`KeyboardHub`](crate::KeyboardHub).
    pub fn ui(&mut self, ui: &mut egui::Ui) -> egui::Response {
        let size = ui.available_size();
        let (rect, mut response) = ui.allocate_exact_size(size, Sense::click_and_drag());

        if rect.width() != self.base().width() || rect.height() != self.base().height() {
            self.set_size(rect.width(), rect.height());
        }
        self.set_origin(rect.min);
        self.poll();

        if self.is_interactive() {
            for event in DragBehavior::pointer_events(&response) {
                self.pointer(event);
            }
            if response.clicked() {
                if let Some(p) = response.interact_pointer_pos() {
                    self.click(p - rect.min.to_vec2());
                }
            }
            if self.config().crosshair_cursor {
                response = response.on_hover_cursor(CursorIcon::Crosshair);
            }
        }

        paint_surface(&ui.painter_at(rect), self.surface(), rect.min.to_vec2(), self.config());
        response
    }
}

/// Paint every curve of `surface`, shifted by `offset` into screen space.
pub fn paint_surface(painter: &Painter, surface: &Surface, offset: Vec2, config: &LassoConfig) {
    if !surface.is_visible() {
        return;
    }
    let fallback = parse_css_color(&config.fallback_stroke).unwrap_or(DEFAULT_STROKE);
    for path in surface.paths() {
        if path.vertices.len() < 2 {
            continue;
        }
        let color = path
            .stroke
            .as_deref()
            .and_then(|c| parse_css_color(c).ok())
            .unwrap_or(fallback);
        let width = if path.is_selected() {
            config.stroke_width * 2.0
        } else {
            config.stroke_width
        };
        let points: Vec<Pos2> = path.vertices.iter().map(|v| *v + offset).collect();
        if path.closed {
            let opacity = if path.is_selected() {
                config.selected_fill_opacity
            } else {
                config.fill_opacity
            };
            let fill = fill_mesh(&points, color.gamma_multiply(opacity));
            if !fill.is_empty() {
                painter.add(Shape::mesh(fill));
            }
        }
        let stroke = Stroke::new(width, color);
        let shape = if path.closed {
            Shape::closed_line(points, stroke)
        } else {
            Shape::line(points, stroke)
        };
        painter.add(shape);
    }
}

/// Even-odd fill of a closed curve as one-point-high rows. Lassos are
/// usually concave and may cross themselves, which a convex fill gets wrong.
pub fn fill_mesh(points: &[Pos2], color: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    if color.a() == 0 {
        return mesh;
    }
    let Some(area) = bounds(points) else {
        return mesh;
    };
    let mut y = area.min.y.floor();
    while y < area.max.y {
        for (x0, x1) in even_odd_spans(points, y + 0.5) {
            mesh.add_colored_rect(
                Rect::from_min_max(egui::pos2(x0, y), egui::pos2(x1, y + 1.0)),
                color,
            );
        }
        y += 1.0;
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn fill_covers_rows_of_a_closed_square() {
        let sq = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 4.0), pos2(0.0, 4.0)];
        let mesh = fill_mesh(&sq, Color32::RED.gamma_multiply(0.35));
        // four rows, one quad each
        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.indices.len(), 24);
    }

    #[test]
    fn transparent_or_degenerate_fill_is_empty() {
        let sq = [pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 4.0)];
        assert!(fill_mesh(&sq, Color32::TRANSPARENT).is_empty());
        assert!(fill_mesh(&sq[..2], Color32::RED).is_empty());
    }
}
