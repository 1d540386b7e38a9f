//! Example: Lasso selection on a scatter plot
//!
//! What it demonstrates
//! - Attaching a `ScatterMarkView` once the selector's scales are known.
//! - Drawing lassos with the mouse, clicking a lasso to select it and pressing
//!   Delete to remove the selected ones.
//! - Restyling every lasso by editing the model's `color` attribute.
//!
//! How to run
//! ```bash
//! cargo run --example scatter_lasso
//! ```
//! Selected point indices are logged; set `RUST_LOG=info` to see them.

use std::path::Path;

use eframe::egui;
use liveplot_lasso::{
    BaseSelector, KeyboardHub, LassoConfig, LassoSelector, ScatterMarkView, WidgetModel,
    XySelector,
};

struct ScatterLassoApp {
    selector: LassoSelector,
    keyboard: KeyboardHub,
    points: Vec<[f64; 2]>,
    points_model: WidgetModel,
    color: String,
    attached: bool,
}

impl ScatterLassoApp {
    fn new() -> Self {
        let keyboard = KeyboardHub::new();
        let model = WidgetModel::new();
        let color = "steelblue".to_string();
        model.set_color(Some(&color));

        let base = XySelector::new(model, (0.0, 10.0), (0.0, 10.0));
        let mut selector = LassoSelector::new(base, keyboard.clone())
            .with_config(LassoConfig::load_or_default());
        selector.render();

        let points_model = WidgetModel::new();
        points_model.listen_to("change:selected", |m, _| {
            log::info!("selected points: {:?}", m.selected());
        });

        Self {
            selector,
            keyboard,
            points: scatter_points(200),
            points_model,
            color,
            attached: false,
        }
    }

    /// The mark view needs pixel scales, which only exist after the first layout.
    fn attach_marks(&mut self) {
        if self.attached {
            return;
        }
        if let Some(scales) = self.selector.base().scales() {
            let mark = ScatterMarkView::new(
                "scatter",
                self.points.clone(),
                scales,
                self.points_model.clone(),
            );
            self.selector.base_mut().set_mark_views(vec![Box::new(mark)]);
            self.attached = true;
        }
    }
}

/// Deterministic pseudo-random cloud in [0, 10) x [0, 10).
fn scatter_points(n: usize) -> Vec<[f64; 2]> {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };
    (0..n).map(|_| [next() * 10.0, next() * 10.0]).collect()
}

impl eframe::App for ScatterLassoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.input(|i| self.keyboard.forward_egui(i));

        egui::TopBottomPanel::top("lasso_controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Lasso color:");
                if ui.text_edit_singleline(&mut self.color).lost_focus() {
                    self.selector.model().set_color(Some(&self.color));
                }
                if ui.button("Export SVG").clicked() {
                    if let Err(e) = self.selector.save_svg(Path::new("lasso.svg")) {
                        log::error!("SVG export failed: {}", e);
                    }
                }
                if ui.button("Export PNG").clicked() {
                    if let Err(e) = self.selector.save_png(Path::new("lasso.png")) {
                        log::error!("PNG export failed: {}", e);
                    }
                }
                ui.label(format!("{} selected", self.points_model.selected().len()));
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let response = self.selector.ui(ui);
            self.attach_marks();

            let selected = self.points_model.selected();
            let painter = ui.painter_at(response.rect);
            if let Some(scales) = self.selector.base().scales() {
                for (i, p) in self.points.iter().enumerate() {
                    let pos = scales.project(*p) + response.rect.min.to_vec2();
                    let color = if selected.binary_search(&i).is_ok() {
                        egui::Color32::from_rgb(230, 90, 40)
                    } else {
                        egui::Color32::GRAY
                    };
                    painter.circle_filled(pos, 3.0, color);
                }
            }
        });
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let opts = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size(egui::vec2(900.0, 700.0)),
        ..Default::default()
    };
    eframe::run_native(
        "Lasso selector",
        opts,
        Box::new(|_cc| Ok(Box::new(ScatterLassoApp::new()))),
    )
}
