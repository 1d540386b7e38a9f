//! Geometry helpers for lasso curves: the membership test and path data generation.

use egui::Pos2;

/// Signature of the membership test handed to mark views.
pub type PointInLasso = fn(Pos2, &[Pos2]) -> bool;

/// Even-odd test of `point` against the closed polygon through `vertices`.
///
/// Fewer than three vertices never enclose anything. A point lying exactly on
/// an edge counts as inside.
pub fn point_in_lasso(point: Pos2, vertices: &[Pos2]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut previous = vertices[vertices.len() - 1];

    for &current in vertices {
        if point_on_segment(point, previous, current) {
            return true;
        }

        let crosses = (current.y > point.y) != (previous.y > point.y);
        if crosses {
            let x_at_y = (previous.x - current.x) * (point.y - current.y)
                / (previous.y - current.y)
                + current.x;
            if point.x < x_at_y {
                inside = !inside;
            }
        }

        previous = current;
    }

    inside
}

fn point_on_segment(p: Pos2, a: Pos2, b: Pos2) -> bool {
    let ab = b - a;
    let ap = p - a;
    let cross = ab.x * ap.y - ab.y * ap.x;
    if cross.abs() > 1e-4 {
        return false;
    }
    let dot = ap.x * ab.x + ap.y * ab.y;
    dot >= 0.0 && dot <= ab.length_sq()
}

/// Builds SVG path data for a polyline, in the `M x,yL x,y` form.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineGenerator;

impl LineGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Open polyline through `vertices`. Empty input yields an empty string.
    pub fn path(&self, vertices: &[Pos2]) -> String {
        let mut d = String::new();
        for (i, v) in vertices.iter().enumerate() {
            d.push(if i == 0 { 'M' } else { 'L' });
            d.push_str(&format!("{},{}", v.x, v.y));
        }
        d
    }

    /// Same as [`path`](Self::path) with a trailing close-path segment.
    pub fn closed_path(&self, vertices: &[Pos2]) -> String {
        let mut d = self.path(vertices);
        d.push('Z');
        d
    }
}

/// Axis-aligned bounds of a vertex list, `None` when empty.
pub fn bounds(vertices: &[Pos2]) -> Option<egui::Rect> {
    let first = *vertices.first()?;
    let mut rect = egui::Rect::from_min_max(first, first);
    for &v in &vertices[1..] {
        rect.extend_with(v);
    }
    Some(rect)
}

/// Interior spans of the closed polygon along the horizontal line at `y`,
/// under the same even-odd rule as [`point_in_lasso`]. Spans are `(x0, x1)`
/// pairs, left to right.
pub fn even_odd_spans(vertices: &[Pos2], y: f32) -> Vec<(f32, f32)> {
    if vertices.len() < 3 {
        return Vec::new();
    }
    let mut xs: Vec<f32> = Vec::new();
    let mut previous = vertices[vertices.len() - 1];
    for &current in vertices {
        if (current.y > y) != (previous.y > y) {
            xs.push(
                (previous.x - current.x) * (y - current.y) / (previous.y - current.y) + current.x,
            );
        }
        previous = current;
    }
    xs.sort_by(|a, b| a.total_cmp(b));
    xs.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    fn square() -> Vec<Pos2> {
        vec![pos2(0.0, 0.0), pos2(10.0, 0.0), pos2(10.0, 10.0), pos2(0.0, 10.0)]
    }

    #[test]
    fn inside_and_outside_square() {
        let sq = square();
        assert!(point_in_lasso(pos2(5.0, 5.0), &sq));
        assert!(!point_in_lasso(pos2(15.0, 5.0), &sq));
        assert!(!point_in_lasso(pos2(-1.0, -1.0), &sq));
    }

    #[test]
    fn edge_counts_as_inside() {
        assert!(point_in_lasso(pos2(10.0, 5.0), &square()));
        assert!(point_in_lasso(pos2(0.0, 0.0), &square()));
    }

    #[test]
    fn degenerate_polygons_enclose_nothing() {
        assert!(!point_in_lasso(pos2(0.0, 0.0), &[]));
        assert!(!point_in_lasso(pos2(0.0, 0.0), &[pos2(0.0, 0.0)]));
        assert!(!point_in_lasso(
            pos2(1.0, 0.0),
            &[pos2(0.0, 0.0), pos2(2.0, 0.0)]
        ));
    }

    #[test]
    fn concave_notch_is_outside() {
        // U shape open at the top between x=3 and x=7
        let u = vec![
            pos2(0.0, 0.0),
            pos2(3.0, 0.0),
            pos2(3.0, 7.0),
            pos2(7.0, 7.0),
            pos2(7.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 10.0),
            pos2(0.0, 10.0),
        ];
        assert!(!point_in_lasso(pos2(5.0, 3.0), &u));
        assert!(point_in_lasso(pos2(1.5, 3.0), &u));
        assert!(point_in_lasso(pos2(5.0, 8.5), &u));
    }

    #[test]
    fn spans_skip_the_notch() {
        let u = vec![
            pos2(0.0, 0.0),
            pos2(3.0, 0.0),
            pos2(3.0, 7.0),
            pos2(7.0, 7.0),
            pos2(7.0, 0.0),
            pos2(10.0, 0.0),
            pos2(10.0, 10.0),
            pos2(0.0, 10.0),
        ];
        assert_eq!(even_odd_spans(&u, 3.0), vec![(0.0, 3.0), (7.0, 10.0)]);
        assert_eq!(even_odd_spans(&u, 8.5), vec![(0.0, 10.0)]);
        assert!(even_odd_spans(&u, 12.0).is_empty());
        assert!(even_odd_spans(&u[..2], 0.0).is_empty());
    }

    #[test]
    fn line_generator_formats_like_svg() {
        let g = LineGenerator::new();
        let pts = [pos2(0.0, 0.0), pos2(10.5, 2.0)];
        assert_eq!(g.path(&pts), "M0,0L10.5,2");
        assert_eq!(g.closed_path(&pts), "M0,0L10.5,2Z");
        assert_eq!(g.path(&[]), "");
    }

    #[test]
    fn bounds_cover_all_vertices() {
        let b = bounds(&square()).unwrap();
        assert_eq!(b.min, pos2(0.0, 0.0));
        assert_eq!(b.max, pos2(10.0, 10.0));
        assert!(bounds(&[]).is_none());
    }
}
