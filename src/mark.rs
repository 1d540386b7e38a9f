//! Mark views: the plotted series a lasso selects from.
//!
//! A mark view owns the selection state of its data points. The selector only
//! reaches it through [`MarkView::update_selected_in_lasso`].

use std::collections::{BTreeMap, BTreeSet};

use downcast_rs::{impl_downcast, Downcast};
use egui::Pos2;

use crate::geometry::PointInLasso;
use crate::model::WidgetModel;
use crate::scales::Scales;

pub trait MarkView: Downcast {
    /// Name used in log output.
    fn name(&self) -> &str {
        "mark"
    }

    /// Record which data points lie inside the lasso `lasso_name`.
    ///
    /// With `vertices` and `point_in_lasso` both present, membership for that
    /// lasso is (re)computed and the return value says whether any point is
    /// inside. With either one absent, every membership flag recorded for
    /// `lasso_name` is cleared and the return value carries no meaning.
    fn update_selected_in_lasso(
        &mut self,
        lasso_name: &str,
        vertices: Option<&[Pos2]>,
        point_in_lasso: Option<PointInLasso>,
    ) -> bool;

    /// Called after the selector's scales change size.
    fn set_scales(&mut self, _scales: &Scales) {}
}
impl_downcast!(MarkView);

/// Scatter series: one point per datum, selection written to the model's `selected`.
pub struct ScatterMarkView {
    name: String,
    data: Vec<[f64; 2]>,
    scales: Scales,
    model: WidgetModel,
    by_lasso: BTreeMap<String, BTreeSet<usize>>,
}

impl ScatterMarkView {
    pub fn new(
        name: impl Into<String>,
        data: Vec<[f64; 2]>,
        scales: Scales,
        model: WidgetModel,
    ) -> Self {
        Self {
            name: name.into(),
            data,
            scales,
            model,
            by_lasso: BTreeMap::new(),
        }
    }

    pub fn data(&self) -> &[[f64; 2]] {
        &self.data
    }

    pub fn model(&self) -> &WidgetModel {
        &self.model
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    /// Pixel position of every datum under the current scales.
    pub fn pixel_positions(&self) -> Vec<Pos2> {
        self.data.iter().map(|d| self.scales.project(*d)).collect()
    }

    /// Lassos currently holding at least one point.
    pub fn lasso_names(&self) -> Vec<String> {
        self.by_lasso.keys().cloned().collect()
    }

    pub fn members(&self, lasso_name: &str) -> Option<Vec<usize>> {
        self.by_lasso
            .get(lasso_name)
            .map(|s| s.iter().copied().collect())
    }

    /// Sorted union of all lasso memberships.
    pub fn selected(&self) -> Vec<usize> {
        let all: BTreeSet<usize> = self.by_lasso.values().flatten().copied().collect();
        all.into_iter().collect()
    }

    fn publish(&self) {
        self.model.set_selected(&self.selected());
    }
}

impl MarkView for ScatterMarkView {
    fn name(&self) -> &str {
        &self.name
    }

    fn update_selected_in_lasso(
        &mut self,
        lasso_name: &str,
        vertices: Option<&[Pos2]>,
        point_in_lasso: Option<PointInLasso>,
    ) -> bool {
        let inside = match (vertices, point_in_lasso) {
            (Some(vertices), Some(test)) => {
                let members: BTreeSet<usize> = self
                    .data
                    .iter()
                    .enumerate()
                    .filter(|(_, d)| test(self.scales.project(**d), vertices))
                    .map(|(i, _)| i)
                    .collect();
                let any = !members.is_empty();
                if any {
                    self.by_lasso.insert(lasso_name.to_string(), members);
                } else {
                    self.by_lasso.remove(lasso_name);
                }
                any
            }
            _ => {
                self.by_lasso.remove(lasso_name);
                false
            }
        };
        log::trace!(
            "mark '{}': lasso {} -> {} selected",
            self.name,
            lasso_name,
            self.selected().len()
        );
        self.publish();
        inside
    }

    fn set_scales(&mut self, scales: &Scales) {
        self.scales = *scales;
    }
}
