//! Snapshot export of a selector surface as SVG or PNG.
//!
//! The SVG mirrors the element tree: one group with the selector class, the
//! hidden overlay rectangle, and one `<path>` per curve. PNG output goes
//! through usvg + resvg.

use std::fmt::Write as _;
use std::path::Path;

use crate::color::{parse_css_color, to_hex, DEFAULT_STROKE};
use crate::config::LassoConfig;
use crate::error::{LassoError, Result};
use crate::events::{EventKind, ExportMeta, SelectorEvent};
use crate::lasso::LassoSelector;
use crate::surface::Surface;

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Serialize `surface` as a standalone SVG document of the given size.
pub fn surface_to_svg(surface: &Surface, width: f32, height: f32, config: &LassoConfig) -> String {
    let fallback = to_hex(parse_css_color(&config.fallback_stroke).unwrap_or(DEFAULT_STROKE));

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = width,
        h = height
    );
    let class = surface.class().unwrap_or_default();
    let visibility = if surface.is_visible() {
        ""
    } else {
        r#" visibility="hidden""#
    };
    let _ = writeln!(out, r#"<g class="{}"{}>"#, escape_attr(&class), visibility);

    if let Some(o) = surface.overlay() {
        let _ = writeln!(
            out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" visibility="{}" pointer-events="{}" style="cursor: {}"/>"#,
            o.x, o.y, o.width, o.height, o.visibility, o.pointer_events, o.cursor
        );
    }

    for path in surface.paths() {
        let color = path
            .stroke
            .as_deref()
            .and_then(|c| parse_css_color(c).ok())
            .map(to_hex)
            .unwrap_or_else(|| fallback.clone());
        let classes: Vec<&str> = path.classes.iter().map(|c| c.as_str()).collect();
        let (fill, opacity) = if !path.closed {
            ("none".to_string(), 0.0)
        } else if path.is_selected() {
            (color.clone(), config.selected_fill_opacity)
        } else {
            (color.clone(), config.fill_opacity)
        };
        let _ = writeln!(
            out,
            r#"<path id="{}" class="{}" d="{}" style="stroke: {}; stroke-width: {}; fill: {}; fill-opacity: {}; fill-rule: evenodd"/>"#,
            escape_attr(&path.id),
            escape_attr(&classes.join(" ")),
            path.d,
            color,
            config.stroke_width,
            fill,
            opacity
        );
    }

    out.push_str("</g>\n</svg>\n");
    out
}

/// Rasterize `surface` to PNG bytes.
pub fn surface_to_png(
    surface: &Surface,
    width: f32,
    height: f32,
    config: &LassoConfig,
) -> Result<Vec<u8>> {
    let (w, h) = (width.round() as u32, height.round() as u32);
    let svg = surface_to_svg(surface, width, height, config);
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_data(svg.as_bytes(), &opt)?;
    let mut pixmap =
        tiny_skia::Pixmap::new(w, h).ok_or(LassoError::EmptySurface { width: w, height: h })?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
    pixmap.encode_png().map_err(|e| LassoError::Png(e.to_string()))
}

impl LassoSelector {
    pub fn to_svg(&self) -> String {
        surface_to_svg(
            self.surface(),
            self.base().width(),
            self.base().height(),
            self.config(),
        )
    }

    pub fn save_svg(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_svg())?;
        self.notify_export("svg", path);
        Ok(())
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        let bytes = surface_to_png(
            self.surface(),
            self.base().width(),
            self.base().height(),
            self.config(),
        )?;
        std::fs::write(path, bytes)?;
        self.notify_export("png", path);
        Ok(())
    }

    fn notify_export(&self, format: &str, path: &Path) {
        log::debug!("exported lasso surface as {} to {:?}", format, path);
        let mut ev = SelectorEvent::new(EventKind::EXPORT);
        ev.export = Some(ExportMeta {
            format: format.to_string(),
            path: Some(path.display().to_string()),
        });
        self.emit(ev);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineGenerator;
    use crate::surface::{PathElement, SELECTED_CLASS};
    use egui::pos2;

    fn surface_with_curve() -> Surface {
        let s = Surface::new();
        s.set_class("lassoselector");
        s.append_overlay(40.0, 30.0);
        let mut el = PathElement::new("l1");
        el.set_geometry(
            &LineGenerator::new(),
            &[pos2(1.0, 1.0), pos2(20.0, 1.0), pos2(20.0, 20.0)],
            true,
        );
        el.stroke = Some("red".into());
        el.classes.insert(SELECTED_CLASS.to_string());
        s.append_path(el);
        s
    }

    #[test]
    fn svg_contains_overlay_and_paths() {
        let svg = surface_to_svg(&surface_with_curve(), 40.0, 30.0, &LassoConfig::default());
        assert!(svg.contains(r#"<g class="lassoselector">"#));
        assert!(svg.contains(r#"visibility="hidden" pointer-events="all""#));
        assert!(svg.contains(r#"id="l1" class="selected" d="M1,1L20,1L20,20Z""#));
        assert!(svg.contains("stroke: #ff0000"));
        assert!(svg.contains("fill-opacity: 0.35; fill-rule: evenodd"));
    }

    #[test]
    fn png_has_signature() {
        let png = surface_to_png(&surface_with_curve(), 40.0, 30.0, &LassoConfig::default()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn empty_size_cannot_be_rasterized() {
        let err = surface_to_png(&Surface::new(), 0.0, 0.0, &LassoConfig::default());
        assert!(err.is_err());
    }
}
