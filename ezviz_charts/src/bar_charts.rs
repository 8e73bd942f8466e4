// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar chart bodies: vertical, clustered, stacked and circular.

use kurbo::Vec2;

use crate::axis::Axis;
use crate::bars_circular::BarsCircular;
use crate::bars_stacked::BarsStacked;
use crate::bars_vertical::BarsVertical;
use crate::chart::{ChartBody, adopt, inherit, plot_area};
use crate::circular_axis::{CircularAxis, CircularRingLabels, CircularSectorLabels};
use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, default_colors, radius_for,
};
use crate::data::{ChartData, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::layout::Margin;
use crate::scale::{ColorScale, ScaleBand, ScaleLinear, ScaleSlot};
use crate::stats::DerivedStatistics;

const AXIS_MARGIN: Margin = Margin {
    top: 20.0,
    right: 20.0,
    bottom: 20.0,
    left: 40.0,
};

/// Left and bottom axes around a plot of `height`, with the value axis flipped to grow upwards.
fn value_axes(
    frame: &mut Frame<'_>,
    config: &ComponentConfig,
    x: &ScaleBand,
    y: &ScaleLinear,
    height: f64,
    y_label: Option<&str>,
) {
    let transition = config.transition();
    Axis::bottom(x.clone())
        .with_transition(transition)
        .render_at(frame, "x-axis", Vec2::new(0.0, height));
    let mut y_axis = Axis::left(y.clone().with_range((height, 0.0))).with_transition(transition);
    if let Some(label) = y_label {
        y_axis = y_axis.with_title(label);
    }
    y_axis.render_at(frame, "y-axis", Vec2::ZERO);
}

/// One bar per category of a single series, with value and category axes.
#[derive(Clone, Debug)]
pub struct BarChartVertical {
    config: ComponentConfig,
    margin: Margin,
    y_axis_label: Option<String>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarChartVertical {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChartVertical {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: AXIS_MARGIN,
            y_axis_label: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the inner margin reserved for axes.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Labels the value axis; defaults to the series key.
    pub fn with_y_axis_label(mut self, label: impl Into<String>) -> Self {
        self.y_axis_label = Some(label.into());
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for BarChartVertical {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for BarChartVertical {
    fn name(&self) -> &'static str {
        "barChartVertical"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let (offset, size) = plot_area(self.config.size(), self.margin);
        self.color_scale.clear_inferred();

        let mut bars =
            inherit(&self.config, BarsVertical::new()).with_size(size.width, size.height);
        if let Some(scale) = self.color_scale.get() {
            bars = bars.with_color_scale(scale.clone());
        }
        let mut plot = frame.child("plot", offset);
        bars.render(&mut plot, data)?;
        adopt(&mut self.color_scale, bars.color_scale());

        let label = match (&self.y_axis_label, data) {
            (Some(label), _) => Some(label.as_str()),
            (None, SeriesInput::Single(series)) => Some(series.key.as_str()),
            (None, SeriesInput::Multi(_)) => None,
        };
        if let (Some(x), Some(y)) = (bars.x_scale(), bars.y_scale()) {
            value_axes(&mut plot, &self.config, x, y, size.height, label);
        }
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// Bars grouped by series: one cluster per series, one bar per category inside it.
#[derive(Clone, Debug)]
pub struct BarChartClustered {
    config: ComponentConfig,
    margin: Margin,
    y_axis_label: Option<String>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarChartClustered {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChartClustered {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: AXIS_MARGIN,
            y_axis_label: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the inner margin reserved for axes.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Labels the value axis.
    pub fn with_y_axis_label(mut self, label: impl Into<String>) -> Self {
        self.y_axis_label = Some(label.into());
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for BarChartClustered {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for BarChartClustered {
    fn name(&self) -> &'static str {
        "barChartClustered"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let (offset, size) = plot_area(self.config.size(), self.margin);
        self.color_scale.clear_inferred();
        let stats = DerivedStatistics::from_input(data);

        let x = ScaleBand::new(data.series().iter().map(|s| s.key.as_str()), (0.0, size.width))
            .with_padding(0.1)
            .with_round(true);
        let y = ScaleLinear::new((0.0, stats.max_or_zero()), (0.0, size.height)).nice();
        let mut bars = inherit(&self.config, BarsVertical::new())
            .with_size(x.bandwidth(), size.height)
            .with_y_scale(y.clone());
        if let Some(scale) = self.color_scale.get() {
            bars = bars.with_color_scale(scale.clone());
        }
        bars.init(data)?;
        adopt(&mut self.color_scale, bars.color_scale());

        let mut plot = frame.child("plot", offset);
        for series in data.series() {
            let Some(x0) = x.map(&series.key) else {
                continue;
            };
            bars.draw(&mut plot.child(&series.key, Vec2::new(x0, 0.0)), series);
        }
        value_axes(
            &mut plot,
            &self.config,
            &x,
            &y,
            size.height,
            self.y_axis_label.as_deref(),
        );
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// One stacked bar per series.
#[derive(Clone, Debug)]
pub struct BarChartStacked {
    config: ComponentConfig,
    margin: Margin,
    y_axis_label: Option<String>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarChartStacked {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChartStacked {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: AXIS_MARGIN,
            y_axis_label: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the inner margin reserved for axes.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Labels the value axis.
    pub fn with_y_axis_label(mut self, label: impl Into<String>) -> Self {
        self.y_axis_label = Some(label.into());
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for BarChartStacked {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for BarChartStacked {
    fn name(&self) -> &'static str {
        "barChartStacked"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let (offset, size) = plot_area(self.config.size(), self.margin);
        self.color_scale.clear_inferred();
        let stats = DerivedStatistics::from_input(data);
        let tallest = stats
            .group_totals_max
            .or(stats.category_total)
            .unwrap_or(0.0);

        let x = ScaleBand::new(data.series().iter().map(|s| s.key.as_str()), (0.0, size.width))
            .with_padding(0.15)
            .with_round(true);
        let y = ScaleLinear::new((0.0, tallest), (0.0, size.height)).nice();
        let mut bars = inherit(&self.config, BarsStacked::new())
            .with_size(x.bandwidth(), size.height)
            .with_y_scale(y.clone());
        if let Some(scale) = self.color_scale.get() {
            bars = bars.with_color_scale(scale.clone());
        }
        bars.init(data)?;
        adopt(&mut self.color_scale, bars.color_scale());

        let mut plot = frame.child("plot", offset);
        for series in data.series() {
            let Some(x0) = x.map(&series.key) else {
                continue;
            };
            bars.draw(&mut plot.child(&series.key, Vec2::new(x0, 0.0)), series);
        }
        value_axes(
            &mut plot,
            &self.config,
            &x,
            &y,
            size.height,
            self.y_axis_label.as_deref(),
        );
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// Bars bent around a centre, one ring per category, sweeping clockwise with value.
#[derive(Clone, Debug)]
pub struct BarChartCircular {
    config: ComponentConfig,
    margin: Margin,
    radius: Option<f64>,
    inner_radius: Option<f64>,
    start_angle: f64,
    end_angle: f64,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for BarChartCircular {
    fn default() -> Self {
        Self::new()
    }
}

impl BarChartCircular {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: Margin::uniform(20.0),
            radius: None,
            inner_radius: None,
            start_angle: 0.0,
            end_angle: 270.0,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the inner margin around the rings.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the outer radius; defaults to half the shorter side of the plot.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the inner radius; defaults to a quarter of the outer radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = Some(inner_radius);
        self
    }

    /// Sets the sweep of the largest value, in degrees.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for BarChartCircular {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for BarChartCircular {
    fn name(&self) -> &'static str {
        "barChartCircular"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let full = self.config.size();
        let (_, plot) = plot_area(full, self.margin);
        let radius = radius_for(self.radius, plot);
        let inner_radius = self.inner_radius.unwrap_or(radius / 4.0);
        self.color_scale.clear_inferred();

        let mut bars = inherit(&self.config, BarsCircular::new())
            .with_size(plot.width, plot.height)
            .with_radius(radius)
            .with_inner_radius(inner_radius)
            .with_angles(self.start_angle, self.end_angle);
        if let Some(scale) = self.color_scale.get() {
            bars = bars.with_color_scale(scale.clone());
        }
        bars.init(data)?;
        adopt(&mut self.color_scale, bars.color_scale());
        let (Some(rings), Some(sweep)) = (bars.x_scale().cloned(), bars.y_scale()) else {
            return Ok(());
        };
        let (lo, hi) = sweep.domain();
        let values = ScaleLinear::new((hi, lo), (self.start_angle, self.end_angle));

        let mut center = frame.child("plot", Vec2::new(full.width / 2.0, full.height / 2.0));
        CircularAxis::new(radius, values.clone(), rings.clone())
            .with_transition(self.config.transition())
            .render(&mut center.group("circular-axis"));
        CircularSectorLabels::new(radius * 1.04, values)
            .render(&mut center.group("sector-labels"));
        for series in data.series() {
            bars.draw(&mut center.group(&series.key), series);
        }
        CircularRingLabels::new(rings).render(&mut center.group("ring-labels"));
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::{Mark, Shape};
    use float_cmp::assert_approx_eq;
    use kurbo::Rect;

    use super::*;

    fn multi() -> SeriesInput {
        SeriesInput::Multi(vec![
            crate::data::Series::from_pairs("A", [("x", 1.0), ("y", 2.0)]),
            crate::data::Series::from_pairs("B", [("x", 3.0), ("y", 4.0)]),
        ])
    }

    fn rendered(body: &mut dyn ChartBody, data: &SeriesInput) -> Vec<Mark> {
        let mut marks = Vec::new();
        let Ok(()) = body.render(&mut Frame::new(&mut marks), data.into()) else {
            panic!("render should succeed");
        };
        marks
    }

    fn bars(marks: &[Mark]) -> Vec<Rect> {
        marks
            .iter()
            .filter(|m| m.class == "bar")
            .filter_map(|m| match &m.payload.shape {
                Shape::Rect(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn vertical_bars_sit_inside_the_axes() {
        let data = SeriesInput::Single(crate::data::Series::from_pairs(
            "Fruit",
            [("apples", 5.0), ("pears", 10.0)],
        ));
        let mut chart = BarChartVertical::new().with_size(260.0, 140.0);
        let marks = rendered(&mut chart, &data);
        let rects = bars(&marks);
        assert_eq!(rects.len(), 2);
        // The plot starts 40 in and 20 down, and is 100 tall.
        assert!(rects.iter().all(|r| r.x0 >= 40.0 && r.y1 == 120.0));
        let titles: Vec<_> = marks
            .iter()
            .filter(|m| m.class == "axis-title")
            .collect();
        assert_eq!(titles.len(), 1, "the series key labels the value axis");
        assert!(chart.color_scale().is_some());
    }

    #[test]
    fn clustered_bars_share_one_value_scale() {
        let mut chart = BarChartClustered::new()
            .with_size(240.0, 140.0)
            .with_margin(Margin::uniform(20.0));
        let rects = bars(&rendered(&mut chart, &multi()));
        assert_eq!(rects.len(), 4);
        // Values 1..4 share a 0..4 scale over 100 units.
        let mut heights: Vec<f64> = rects.iter().map(|r| r.height()).collect();
        heights.sort_by(f64::total_cmp);
        assert_eq!(heights, vec![25.0, 50.0, 75.0, 100.0]);
        // Group B's cluster is to the right of group A's.
        assert!(rects[2].x0 > rects[1].x1);
    }

    #[test]
    fn stacked_bars_reach_the_group_total() {
        let mut chart = BarChartStacked::new()
            .with_size(240.0, 140.0)
            .with_margin(Margin::uniform(20.0));
        let rects = bars(&rendered(&mut chart, &multi()));
        assert_eq!(rects.len(), 4);
        // B has the largest total, so its stack fills the plot; A's total of 3 reaches 3/7.
        let b_top = rects[2].y0.min(rects[3].y0);
        assert_eq!(b_top, 20.0);
        let a_top = rects[0].y0.min(rects[1].y0);
        assert_approx_eq!(f64, 120.0 - a_top, 300.0 / 7.0, epsilon = 1e-9);
    }

    #[test]
    fn circular_bars_are_centred() {
        let mut chart = BarChartCircular::new().with_size(240.0, 240.0);
        let marks = rendered(&mut chart, &multi());
        let arcs: Vec<_> = marks
            .iter()
            .filter(|m| m.class == "bar")
            .filter_map(|m| match &m.payload.shape {
                Shape::Arc(a) => Some(*a),
                _ => None,
            })
            .collect();
        assert_eq!(arcs.len(), 4);
        assert!(arcs.iter().all(|a| a.center == kurbo::Point::new(120.0, 120.0)));
        assert!(arcs.iter().all(|a| a.outer_radius <= 100.0));
    }

    #[test]
    fn candles_are_not_bar_data() {
        let candles = crate::data::CandleSeries::new("X", Vec::new());
        let mut chart = BarChartVertical::new();
        let mut marks = Vec::new();
        let result = chart.render(&mut Frame::new(&mut marks), (&candles).into());
        assert!(matches!(result, Err(ChartError::MalformedInput { .. })));
    }
}
