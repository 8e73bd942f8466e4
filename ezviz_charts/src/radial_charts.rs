// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart bodies drawn around a centre: donut, polar area, rose and radial heat map.

use ezviz_core::TextAnchor;
use kurbo::{Size, Vec2};

use crate::axis::Axis;
use crate::chart::{ChartBody, adopt, inherit, plot_area};
use crate::circular_axis::{CircularAxis, CircularRingLabels, CircularSectorLabels};
use crate::component::{
    ComponentConfig, Configurable, SeriesComponent, default_colors, heat_chart_colors,
    radius_for,
};
use crate::data::ChartData;
use crate::donut::Donut;
use crate::error::ChartError;
use crate::frame::Frame;
use crate::heat_map_ring::HeatMapRing;
use crate::layout::Margin;
use crate::polar_area::PolarArea;
use crate::rose_chart_sector::RoseChartSector;
use crate::scale::{ColorScale, ScaleBand, ScaleLinear, ScaleSlot};
use crate::stats::DerivedStatistics;

/// Radius shared by the radial bodies: explicit, or half the shorter side inside `margin`.
fn body_radius(radius: Option<f64>, size: Size, margin: Margin) -> f64 {
    radius_for(radius, plot_area(size, margin).1)
}

fn centre(size: Size) -> Vec2 {
    Vec2::new(size.width / 2.0, size.height / 2.0)
}

/// A donut of one series, centred in the chart box.
#[derive(Clone, Debug)]
pub struct DonutChart {
    config: ComponentConfig,
    margin: Margin,
    radius: Option<f64>,
    inner_radius: Option<f64>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for DonutChart {
    fn default() -> Self {
        Self::new()
    }
}

impl DonutChart {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: Margin::uniform(20.0),
            radius: None,
            inner_radius: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the margin around the donut.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the outer radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the inner radius; defaults to half the outer radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = Some(inner_radius);
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for DonutChart {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for DonutChart {
    fn name(&self) -> &'static str {
        "donutChart"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let size = self.config.size();
        let radius = body_radius(self.radius, size, self.margin);
        self.color_scale.clear_inferred();

        let mut donut = inherit(&self.config, Donut::new())
            .with_radius(radius)
            .with_inner_radius(self.inner_radius.unwrap_or(radius / 2.0));
        if let Some(scale) = self.color_scale.get() {
            donut = donut.with_color_scale(scale.clone());
        }
        donut.render(&mut frame.child("plot", centre(size)), data)?;
        adopt(&mut self.color_scale, donut.color_scale());
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// Equal-angle sectors whose radius encodes value, over a circular grid.
#[derive(Clone, Debug)]
pub struct PolarAreaChart {
    config: ComponentConfig,
    margin: Margin,
    radius: Option<f64>,
    start_angle: f64,
    end_angle: f64,
    capitalize_labels: bool,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for PolarAreaChart {
    fn default() -> Self {
        Self::new()
    }
}

impl PolarAreaChart {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: Margin::uniform(20.0),
            radius: None,
            start_angle: 0.0,
            end_angle: 360.0,
            capitalize_labels: false,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the margin around the grid.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the outer radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the angular extent in degrees.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Upper-cases the sector labels.
    pub fn with_capitalize_labels(mut self, capitalize: bool) -> Self {
        self.capitalize_labels = capitalize;
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for PolarAreaChart {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for PolarAreaChart {
    fn name(&self) -> &'static str {
        "polarAreaChart"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let size = self.config.size();
        let radius = body_radius(self.radius, size, self.margin);
        self.color_scale.clear_inferred();

        let mut polar = inherit(&self.config, PolarArea::new())
            .with_radius(radius)
            .with_angles(self.start_angle, self.end_angle);
        if let Some(scale) = self.color_scale.get() {
            polar = polar.with_color_scale(scale.clone());
        }
        polar.init(data)?;
        adopt(&mut self.color_scale, polar.color_scale());
        let (Some(x), Some(y)) = (polar.x_scale().cloned(), polar.y_scale().cloned()) else {
            return Ok(());
        };

        let mut plot = frame.child("plot", centre(size));
        CircularAxis::new(radius, x.clone(), y.clone())
            .with_transition(self.config.transition())
            .render(&mut plot.group("circular-axis"));
        for series in data.series() {
            polar.draw(&mut plot.group(&series.key), series);
        }
        Axis::left(ScaleLinear::new(y.domain(), (radius, 0.0)).nice())
            .with_transition(self.config.transition())
            .render_at(&mut plot, "vertical-axis", Vec2::new(0.0, -radius));
        CircularSectorLabels::new(radius * 1.04, x)
            .with_anchor(TextAnchor::Start)
            .with_capitalize(self.capitalize_labels)
            .render(&mut plot.group("sector-labels"));
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// One sector per series; each category is a petal whose radius encodes value.
#[derive(Clone, Debug)]
pub struct RoseChart {
    config: ComponentConfig,
    margin: Margin,
    radius: Option<f64>,
    stacked: bool,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for RoseChart {
    fn default() -> Self {
        Self::new()
    }
}

impl RoseChart {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: Margin::uniform(20.0),
            radius: None,
            stacked: false,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the margin around the rose.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the outer radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Stacks petals outward instead of overlapping them.
    pub fn with_stacked(mut self, stacked: bool) -> Self {
        self.stacked = stacked;
        self
    }

    /// Supplies the colour scale; it must be ordinal.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for RoseChart {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for RoseChart {
    fn name(&self) -> &'static str {
        "roseChart"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let size = self.config.size();
        let radius = body_radius(self.radius, size, self.margin);
        self.color_scale.clear_inferred();
        let stats = DerivedStatistics::from_input(data);
        let reach = if self.stacked {
            stats.group_totals_max.or(stats.category_total).unwrap_or(0.0)
        } else {
            stats.max_or_zero()
        };

        let x = ScaleBand::new(data.series().iter().map(|s| s.key.as_str()), (0.0, 360.0))
            .with_round(true);
        let mut sectors = inherit(&self.config, RoseChartSector::new())
            .with_radius(radius)
            .with_stacked(self.stacked)
            .with_x_scale(x.clone())
            .with_y_scale(ScaleLinear::new((0.0, reach), (0.0, radius)));
        if let Some(scale) = self.color_scale.get() {
            sectors = sectors.with_color_scale(scale.clone());
        }
        let mut plot = frame.child("plot", centre(size));
        sectors.render(&mut plot, data)?;
        adopt(&mut self.color_scale, sectors.color_scale());

        CircularSectorLabels::new(radius * 1.04, x)
            .with_anchor(TextAnchor::Start)
            .with_capitalize(true)
            .render(&mut plot.group("sector-labels"));
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// Concentric rings of cells, one ring per series, coloured by value thresholds.
#[derive(Clone, Debug)]
pub struct HeatMapRadial {
    config: ComponentConfig,
    margin: Margin,
    radius: Option<f64>,
    inner_radius: Option<f64>,
    start_angle: f64,
    end_angle: f64,
    thresholds: Option<Vec<f64>>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for HeatMapRadial {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatMapRadial {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, heat_chart_colors()),
            margin: Margin::uniform(20.0),
            radius: None,
            inner_radius: None,
            start_angle: 0.0,
            end_angle: 270.0,
            thresholds: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the margin around the rings.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the outer radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Sets the inner radius; defaults to a quarter of the outer radius.
    pub fn with_inner_radius(mut self, inner_radius: f64) -> Self {
        self.inner_radius = Some(inner_radius);
        self
    }

    /// Sets the angular extent in degrees.
    pub fn with_angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = start;
        self.end_angle = end;
        self
    }

    /// Sets the colour break points; derived from the data by default.
    pub fn with_thresholds(mut self, thresholds: Vec<f64>) -> Self {
        self.thresholds = Some(thresholds);
        self
    }

    /// Supplies the colour scale; it must be a threshold scale.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for HeatMapRadial {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for HeatMapRadial {
    fn name(&self) -> &'static str {
        "heatMapRadial"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.series()?;
        let size = self.config.size();
        let radius = body_radius(self.radius, size, self.margin);
        self.color_scale.clear_inferred();

        let mut rings = inherit(&self.config, HeatMapRing::new())
            .with_radius(radius)
            .with_inner_radius(self.inner_radius.unwrap_or(radius / 4.0))
            .with_angles(self.start_angle, self.end_angle);
        if let Some(thresholds) = &self.thresholds {
            rings = rings.with_thresholds(thresholds.clone());
        }
        if let Some(scale) = self.color_scale.get() {
            rings = rings.with_color_scale(scale.clone());
        }
        let mut plot = frame.child("plot", centre(size));
        rings.render(&mut plot, data)?;
        adopt(&mut self.color_scale, rings.color_scale());

        if let Some(x) = rings.x_scale() {
            CircularSectorLabels::new(radius * 1.04, x.clone())
                .with_anchor(TextAnchor::Start)
                .render(&mut plot.group("sector-labels"));
        }
        if let Some(y) = rings.y_scale() {
            CircularRingLabels::new(y.clone())
                .with_start_angle(self.start_angle)
                .render(&mut plot.group("ring-labels"));
        }
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}
