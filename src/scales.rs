//! Linear scales mapping data coordinates onto the selector's pixel space.

use egui::{pos2, Pos2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f32, f32),
    /// Constant pixel offset added after scaling.
    pub offset: f32,
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Self {
        Self {
            domain,
            range,
            offset: 0.0,
        }
    }

    pub fn scale(&self, v: f64) -> f32 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let t = if span.abs() < f64::EPSILON {
            0.5
        } else {
            (v - d0) / span
        };
        r0 + (t as f32) * (r1 - r0) + self.offset
    }

    pub fn invert(&self, px: f32) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = r1 - r0;
        if span.abs() < f32::EPSILON {
            return d0;
        }
        let t = ((px - self.offset - r0) / span) as f64;
        d0 + t * (d1 - d0)
    }

    pub fn set_range(&mut self, range: (f32, f32)) {
        self.range = range;
    }
}

/// The x/y scale pair of a selector. The y range runs top-down: pixel 0 is the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub x: LinearScale,
    pub y: LinearScale,
}

impl Scales {
    pub fn new(x_domain: (f64, f64), y_domain: (f64, f64), width: f32, height: f32) -> Self {
        Self {
            x: LinearScale::new(x_domain, (0.0, width)),
            y: LinearScale::new(y_domain, (height, 0.0)),
        }
    }

    /// Point in pixel space for a data point.
    pub fn project(&self, p: [f64; 2]) -> Pos2 {
        pos2(self.x.scale(p[0]), self.y.scale(p[1]))
    }

    pub fn unproject(&self, p: Pos2) -> [f64; 2] {
        [self.x.invert(p.x), self.y.invert(p.y)]
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.x.set_range((0.0, width));
        self.y.set_range((height, 0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_axis_points_up() {
        let s = Scales::new((0.0, 10.0), (0.0, 10.0), 100.0, 50.0);
        assert_eq!(s.project([0.0, 0.0]), pos2(0.0, 50.0));
        assert_eq!(s.project([10.0, 10.0]), pos2(100.0, 0.0));
    }

    #[test]
    fn invert_undoes_scale() {
        let mut x = LinearScale::new((-1.0, 1.0), (0.0, 200.0));
        x.offset = 5.0;
        let px = x.scale(0.5);
        assert!((x.invert(px) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn resize_keeps_domain() {
        let mut s = Scales::new((0.0, 1.0), (0.0, 1.0), 10.0, 10.0);
        s.resize(20.0, 40.0);
        assert_eq!(s.x.domain, (0.0, 1.0));
        assert_eq!(s.project([1.0, 0.0]), pos2(20.0, 40.0));
    }

    #[test]
    fn flat_domain_maps_to_middle() {
        let x = LinearScale::new((3.0, 3.0), (0.0, 10.0));
        assert_eq!(x.scale(3.0), 5.0);
    }
}
