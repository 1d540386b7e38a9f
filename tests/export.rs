use egui::pos2;
use liveplot_lasso::{
    BaseSelector, EventController, EventFilter, EventKind, KeyboardHub, LassoConfig,
    LassoSelector, ScatterMarkView, WidgetModel, XySelector,
};

fn selector_with_curve(events: &EventController) -> LassoSelector {
    let model = WidgetModel::new();
    model.set_color(Some("tomato"));
    let mut base = XySelector::new(model, (0.0, 10.0), (0.0, 10.0));
    base.set_size(64.0, 48.0);
    let mut sel = LassoSelector::new(base, KeyboardHub::new())
        .with_config(LassoConfig {
            stroke_width: 2.0,
            ..LassoConfig::default()
        })
        .with_events(events.clone());
    sel.render();
    let scales = sel.base().scales().unwrap();
    let mark = ScatterMarkView::new("m", vec![[5.0, 5.0]], scales, WidgetModel::new());
    sel.base_mut().set_mark_views(vec![Box::new(mark)]);
    assert!(sel.poll_ready());

    sel.drag_start();
    for p in [pos2(10.0, 10.0), pos2(50.0, 10.0), pos2(50.0, 40.0), pos2(10.0, 40.0)] {
        sel.drag_move(p);
    }
    sel.drag_end();
    sel
}

#[test]
fn svg_snapshot_lists_curves() {
    let events = EventController::new();
    let sel = selector_with_curve(&events);
    let svg = sel.to_svg();
    assert!(svg.starts_with("<svg "));
    assert!(svg.contains(r#"width="64" height="48""#));
    assert!(svg.contains(r#"<g class="lassoselector">"#));
    assert!(svg.contains(r#"id="l1""#));
    assert!(svg.contains("M10,10L50,10L50,40L10,40Z"));
    assert!(svg.contains("stroke: #ff6347; stroke-width: 2"));
}

#[test]
fn hidden_surface_is_marked_in_svg() {
    let events = EventController::new();
    let sel = selector_with_curve(&events);
    sel.model().set_visible(false);
    assert!(sel
        .to_svg()
        .contains(r#"<g class="lassoselector" visibility="hidden">"#));
}

#[test]
fn save_svg_and_png_to_disk() {
    let events = EventController::new();
    let rx = events.subscribe(EventFilter::only(EventKind::EXPORT));
    let sel = selector_with_curve(&events);
    let dir = tempfile::tempdir().unwrap();

    let svg_path = dir.path().join("lasso.svg");
    sel.save_svg(&svg_path).unwrap();
    let text = std::fs::read_to_string(&svg_path).unwrap();
    assert!(text.contains(r#"id="l1""#));

    let png_path = dir.path().join("lasso.png");
    sel.save_png(&png_path).unwrap();
    let bytes = std::fs::read(&png_path).unwrap();
    assert_eq!(&bytes[..4], b"\x89PNG");

    let formats: Vec<String> = rx
        .try_iter()
        .filter_map(|e| e.export.map(|x| x.format))
        .collect();
    assert_eq!(formats, vec!["svg".to_string(), "png".to_string()]);
}

#[test]
fn config_round_trips_through_yaml_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lasso.yaml");
    let cfg = LassoConfig {
        fallback_stroke: "#123456".into(),
        delete_key_code: 8,
        ..LassoConfig::default()
    };
    cfg.save(&path).unwrap();
    let loaded = LassoConfig::load(&path).unwrap();
    assert_eq!(loaded.fallback_stroke, "#123456");
    assert_eq!(loaded.delete_key_code, 8);
}
