// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart bodies laid out on a category-by-series grid: heat map table and punch card.

use kurbo::Vec2;

use crate::axis::Axis;
use crate::chart::{ChartBody, adopt, inherit, plot_area};
use crate::component::{ComponentConfig, Configurable, SeriesComponent, heat_chart_colors};
use crate::data::{ChartData, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::heat_map_row::HeatMapRow;
use crate::layout::Margin;
use crate::proportional_area_circles::{ProportionalAreaCircles, steel_blues};
use crate::scale::{ColorScale, ScaleBand, ScaleLinear, ScaleSlot};

const GRID_MARGIN: Margin = Margin {
    top: 50.0,
    right: 20.0,
    bottom: 20.0,
    left: 50.0,
};

/// Category labels along the top, tilted, and series labels down the left.
fn grid_axes(frame: &mut Frame<'_>, config: &ComponentConfig, x: &ScaleBand, y: &ScaleBand) {
    Axis::top(x.clone())
        .with_label_angle(60.0)
        .with_transition(config.transition())
        .render_at(frame, "x-axis", Vec2::ZERO);
    Axis::left(y.clone())
        .with_transition(config.transition())
        .render_at(frame, "y-axis", Vec2::ZERO);
}

/// Offsets each series row by the row scale and draws it.
fn draw_rows(
    frame: &mut Frame<'_>,
    component: &impl SeriesComponent,
    rows: &ScaleBand,
    data: &SeriesInput,
) {
    for series in data.series() {
        let Some(y0) = rows.map(&series.key) else {
            continue;
        };
        component.draw(&mut frame.child(&series.key, Vec2::new(0.0, y0)), series);
    }
}

/// A table of cells, one row per series, coloured by value thresholds.
#[derive(Clone, Debug)]
pub struct HeatMapTable {
    config: ComponentConfig,
    margin: Margin,
    thresholds: Option<Vec<f64>>,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for HeatMapTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HeatMapTable {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, heat_chart_colors()),
            margin: GRID_MARGIN,
            thresholds: None,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the inner margin reserved for labels.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
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

impl Configurable for HeatMapTable {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for HeatMapTable {
    fn name(&self) -> &'static str {
        "heatMapTable"
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

        let mut cells =
            inherit(&self.config, HeatMapRow::new()).with_size(size.width, size.height);
        if let Some(thresholds) = &self.thresholds {
            cells = cells.with_thresholds(thresholds.clone());
        }
        if let Some(scale) = self.color_scale.get() {
            cells = cells.with_color_scale(scale.clone());
        }
        cells.init(data)?;
        adopt(&mut self.color_scale, cells.color_scale());

        let mut plot = frame.child("plot", offset);
        let (Some(x), Some(y)) = (cells.x_scale().cloned(), cells.y_scale().cloned()) else {
            return Ok(());
        };
        draw_rows(&mut plot, &cells, &y, data);
        grid_axes(&mut plot, &self.config, &x, &y);
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// A grid of circles whose area and shade follow the value, one row per series.
#[derive(Clone, Debug)]
pub struct PunchCard {
    config: ComponentConfig,
    margin: Margin,
    min_radius: f64,
    max_radius: f64,
    color_scale: ScaleSlot<ColorScale>,
    size_scale: Option<ScaleLinear>,
}

impl Default for PunchCard {
    fn default() -> Self {
        Self::new()
    }
}

impl PunchCard {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, steel_blues()),
            margin: GRID_MARGIN,
            min_radius: 2.0,
            max_radius: 20.0,
            color_scale: ScaleSlot::default(),
            size_scale: None,
        }
    }

    /// Sets the inner margin reserved for labels.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the radii the smallest and largest values map to.
    pub fn with_radius_range(mut self, min: f64, max: f64) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Supplies the colour scale; it must map values to colours.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for PunchCard {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for PunchCard {
    fn name(&self) -> &'static str {
        "punchCard"
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

        let mut circles = inherit(&self.config, ProportionalAreaCircles::new())
            .with_size(size.width, size.height)
            .with_radius_range(self.min_radius, self.max_radius);
        if let Some(scale) = self.color_scale.get() {
            circles = circles.with_color_scale(scale.clone());
        }
        circles.init(data)?;
        adopt(&mut self.color_scale, circles.color_scale());
        self.size_scale = circles.size_scale().cloned();

        let mut plot = frame.child("plot", offset);
        let (Some(x), Some(y)) = (circles.x_scale().cloned(), circles.y_scale().cloned()) else {
            return Ok(());
        };
        draw_rows(&mut plot, &circles, &y, data);
        grid_axes(&mut plot, &self.config, &x, &y);
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }

    fn size_scale(&self) -> Option<ScaleLinear> {
        self.size_scale.clone()
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::{Mark, Shape};
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::data::Series;
    use crate::legend::{LegendScaleKind, classify};

    fn week() -> SeriesInput {
        SeriesInput::Multi(vec![
            Series::from_pairs("Mon", [("1am", 0.0), ("2am", 10.0)]),
            Series::from_pairs("Tue", [("1am", 5.0), ("2am", 2.0)]),
        ])
    }

    fn rendered(body: &mut dyn ChartBody) -> Vec<Mark> {
        let mut marks = Vec::new();
        let Ok(()) = body.render(&mut Frame::new(&mut marks), (&week()).into()) else {
            panic!("render should succeed");
        };
        marks
    }

    #[test]
    fn table_rows_follow_the_series_scale() {
        let mut table = HeatMapTable::new().with_size(270.0, 270.0);
        let marks = rendered(&mut table);
        let cells: Vec<_> = marks
            .iter()
            .filter(|m| m.class == "cell")
            .filter_map(|m| m.payload.bounds())
            .collect();
        assert_eq!(cells.len(), 4);
        // Rows share a height and stack downwards inside the margin.
        assert!(cells[0].y0 >= 50.0);
        assert!(cells[2].y0 > cells[0].y0);
        assert_approx_eq!(f64, cells[0].height(), cells[2].height(), epsilon = 1e-9);
        assert!(marks.iter().any(|m| m.class == "tick-label"));
        let Some(scale) = table.color_scale() else {
            panic!("colour scale resolved");
        };
        assert_eq!(classify(&scale), LegendScaleKind::Threshold);
    }

    #[test]
    fn punch_card_exposes_a_size_scale() {
        let mut card = PunchCard::new().with_size(270.0, 270.0);
        let marks = rendered(&mut card);
        let radii: Vec<f64> = marks
            .iter()
            .filter(|m| m.class == "spot")
            .filter_map(|m| match &m.payload.shape {
                Shape::Circle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii.len(), 4);
        assert_approx_eq!(f64, radii[1], 20.0, epsilon = 1e-9);
        let Some(size) = card.size_scale() else {
            panic!("size scale resolved");
        };
        assert_eq!(size.domain(), (0.0, 10.0));
        let Some(scale) = card.color_scale() else {
            panic!("colour scale resolved");
        };
        assert_eq!(classify(&scale), LegendScaleKind::Linear);
    }

    #[test]
    fn candle_input_is_rejected() {
        let candles = crate::data::CandleSeries::new("X", Vec::new());
        let mut marks = Vec::new();
        let result = HeatMapTable::new().render(&mut Frame::new(&mut marks), (&candles).into());
        assert!(matches!(result, Err(ChartError::MalformedInput { .. })));
        assert!(marks.is_empty());
    }
}
