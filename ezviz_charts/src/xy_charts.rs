// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart bodies on continuous x/y axes: bubbles, lines over time and candlesticks.

use ezviz_core::{Ease, Transition};
use kurbo::Vec2;
use peniko::color::palette::css;

use crate::axis::{Axis, AxisScale};
use crate::bubbles::Bubbles;
use crate::candle_sticks::CandleSticks;
use crate::chart::{ChartBody, adopt, inherit, plot_area};
use crate::component::{ComponentConfig, Configurable, SeriesComponent, default_colors};
use crate::data::ChartData;
use crate::error::ChartError;
use crate::frame::Frame;
use crate::layout::Margin;
use crate::line_chart::LineChart;
use crate::scatter_plot::ScatterPlot;
use crate::scale::{ColorScale, ScaleLinear, ScaleSlot};

const XY_MARGIN: Margin = Margin {
    top: 20.0,
    right: 20.0,
    bottom: 40.0,
    left: 40.0,
};

/// Room below the plot for date labels tilted away from the axis.
const TIME_MARGIN: Margin = Margin {
    top: 20.0,
    right: 20.0,
    bottom: 60.0,
    left: 40.0,
};

const DATE_LABEL_ANGLE: f64 = -65.0;

/// Bottom and left axes for scales whose ranges already run in screen space.
fn xy_axes(
    frame: &mut Frame<'_>,
    transition: Transition,
    x: Axis,
    y: impl Into<AxisScale>,
    height: f64,
) {
    x.with_transition(transition)
        .render_at(frame, "x-axis", Vec2::new(0.0, height));
    Axis::left(y)
        .with_transition(transition)
        .render_at(frame, "y-axis", Vec2::ZERO);
}

/// Circles placed by each datum's `x`/`y`, sized by value and coloured by series.
#[derive(Clone, Debug)]
pub struct BubbleChart {
    config: ComponentConfig,
    margin: Margin,
    min_radius: f64,
    max_radius: f64,
    color_scale: ScaleSlot<ColorScale>,
    size_scale: Option<ScaleLinear>,
}

impl Default for BubbleChart {
    fn default() -> Self {
        Self::new()
    }
}

impl BubbleChart {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, default_colors()),
            margin: XY_MARGIN,
            min_radius: 3.0,
            max_radius: 20.0,
            color_scale: ScaleSlot::default(),
            size_scale: None,
        }
    }

    /// Sets the inner margin reserved for axes.
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

    /// Supplies the colour scale; it must be ordinal over series keys.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for BubbleChart {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for BubbleChart {
    fn name(&self) -> &'static str {
        "bubbleChart"
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

        let mut bubbles = inherit(&self.config, Bubbles::new())
            .with_size(size.width, size.height)
            .with_radius_range(self.min_radius, self.max_radius);
        if let Some(scale) = self.color_scale.get() {
            bubbles = bubbles.with_color_scale(scale.clone());
        }
        let mut plot = frame.child("plot", offset);
        bubbles.render(&mut plot, data)?;
        adopt(&mut self.color_scale, bubbles.color_scale());
        self.size_scale = bubbles.size_scale().cloned();

        if let (Some(x), Some(y)) = (bubbles.x_scale(), bubbles.y_scale()) {
            xy_axes(
                &mut plot,
                self.config.transition(),
                Axis::bottom(x.clone()),
                y.clone(),
                size.height,
            );
        }
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }

    fn size_scale(&self) -> Option<ScaleLinear> {
        self.size_scale.clone()
    }
}

/// One line per series over dated category keys, with a dot on every value.
#[derive(Clone, Debug)]
pub struct LineChartBody {
    config: ComponentConfig,
    margin: Margin,
    color_scale: ScaleSlot<ColorScale>,
}

impl Default for LineChartBody {
    fn default() -> Self {
        Self::new()
    }
}

impl LineChartBody {
    /// Creates the chart with default settings; lines draw in over a slower transition.
    pub fn new() -> Self {
        let mut config = ComponentConfig::new(400.0, 300.0, default_colors());
        config.set_transition(Transition::new(1.5, Ease::CubicInOut));
        Self {
            config,
            margin: TIME_MARGIN,
            color_scale: ScaleSlot::default(),
        }
    }

    /// Sets the inner margin reserved for axes.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Supplies the colour scale; it must be ordinal over series keys.
    pub fn with_color_scale(mut self, scale: ColorScale) -> Self {
        self.color_scale.supply(scale);
        self
    }
}

impl Configurable for LineChartBody {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for LineChartBody {
    fn name(&self) -> &'static str {
        "lineChart"
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

        let mut lines =
            inherit(&self.config, LineChart::new()).with_size(size.width, size.height);
        if let Some(scale) = self.color_scale.get() {
            lines = lines.with_color_scale(scale.clone());
        }
        let mut plot = frame.child("plot", offset);
        lines.render(&mut plot, data)?;
        adopt(&mut self.color_scale, lines.color_scale());

        if let (Some(x), Some(y), Some(colors)) =
            (lines.x_scale(), lines.y_scale(), lines.color_scale())
        {
            inherit(&self.config, ScatterPlot::new())
                .with_size(size.width, size.height)
                .with_x_scale(x.clone())
                .with_y_scale(y.clone())
                .with_color_scale(colors.clone())
                .render(&mut plot, data)?;
            xy_axes(
                &mut plot,
                self.config.transition(),
                Axis::bottom(x.clone()).with_label_angle(DATE_LABEL_ANGLE),
                y.clone(),
                size.height,
            );
        }
        Ok(())
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.color_scale.get().cloned()
    }
}

/// Daily open/high/low/close candles; rising days in the first colour, falling in the second.
#[derive(Clone, Debug)]
pub struct CandlestickChart {
    config: ComponentConfig,
    margin: Margin,
    candle_width: f64,
}

impl Default for CandlestickChart {
    fn default() -> Self {
        Self::new()
    }
}

impl CandlestickChart {
    /// Creates the chart with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 300.0, vec![css::GREEN, css::RED]),
            margin: TIME_MARGIN,
            candle_width: 3.0,
        }
    }

    /// Sets the inner margin reserved for axes.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Sets half the body width of each candle.
    pub fn with_candle_width(mut self, candle_width: f64) -> Self {
        self.candle_width = candle_width;
        self
    }
}

impl Configurable for CandlestickChart {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

impl ChartBody for CandlestickChart {
    fn name(&self) -> &'static str {
        "candlestickChart"
    }

    fn chart_config(&self) -> &ComponentConfig {
        &self.config
    }

    fn chart_config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }

    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError> {
        let data = data.candles()?;
        let (offset, size) = plot_area(self.config.size(), self.margin);

        let mut candles = inherit(&self.config, CandleSticks::new())
            .with_size(size.width, size.height)
            .with_candle_width(self.candle_width);
        let mut plot = frame.child("plot", offset);
        candles.render(&mut plot, data);

        if let (Some(x), Some(y)) = (candles.x_scale(), candles.y_scale()) {
            xy_axes(
                &mut plot,
                self.config.transition(),
                Axis::bottom(x.clone()).with_label_angle(DATE_LABEL_ANGLE),
                y.clone(),
                size.height,
            );
        }
        Ok(())
    }

    /// Keys the candle colours by direction.
    fn color_scale(&self) -> Option<ColorScale> {
        ColorScale::ordinal(["up", "down"], self.config.colors().to_vec()).ok()
    }
}

#[cfg(test)]
mod tests {
    use ezviz_core::{Mark, Shape};
    use serde_json::json;

    use super::*;
    use crate::data::{Candle, CandleSeries, SeriesInput};
    use crate::legend::{LegendScaleKind, classify};

    fn rendered(body: &mut dyn ChartBody, data: ChartData<'_>) -> Vec<Mark> {
        let mut marks = Vec::new();
        let Ok(()) = body.render(&mut Frame::new(&mut marks), data) else {
            panic!("render should succeed");
        };
        marks
    }

    #[test]
    fn bubbles_stay_inside_the_axes() {
        let Ok(input) = SeriesInput::from_json_value(&json!([
            { "key": "S1", "values": [
                { "key": "p", "value": 1, "x": 0, "y": 0 },
                { "key": "q", "value": 9, "x": 10, "y": 10 }
            ]}
        ])) else {
            panic!("valid input");
        };
        let mut chart = BubbleChart::new().with_size(240.0, 200.0);
        let marks = rendered(&mut chart, (&input).into());
        let centres: Vec<_> = marks
            .iter()
            .filter(|m| m.class == "bubble")
            .filter_map(|m| match &m.payload.shape {
                Shape::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        assert_eq!(centres.len(), 2);
        // Origin at the bottom-left corner of the plot, the far point at its top-right.
        assert_eq!((centres[0].x, centres[0].y), (40.0, 160.0));
        assert_eq!((centres[1].x, centres[1].y), (220.0, 20.0));
        let Some(size) = chart.size_scale() else {
            panic!("size scale resolved");
        };
        assert_eq!(size.range(), (3.0, 20.0));
    }

    #[test]
    fn line_chart_draws_a_line_per_series_with_dated_axis() {
        let input = SeriesInput::Multi(vec![
            crate::data::Series::from_pairs("A", [("2020-01-01", 1.0), ("2020-01-02", 3.0)]),
            crate::data::Series::from_pairs("B", [("2020-01-01", 2.0), ("2020-01-02", 2.0)]),
        ]);
        let mut chart = LineChartBody::new();
        let marks = rendered(&mut chart, (&input).into());
        assert_eq!(marks.iter().filter(|m| m.class == "line").count(), 2);
        assert_eq!(marks.iter().filter(|m| m.class == "dot").count(), 4);
        assert!(
            marks
                .iter()
                .filter(|m| m.class == "line")
                .all(|m| m.transition == Transition::new(1.5, Ease::CubicInOut))
        );
        let Some(scale) = chart.color_scale() else {
            panic!("colour scale resolved");
        };
        assert_eq!(classify(&scale), LegendScaleKind::Ordinal);
    }

    #[test]
    fn candles_are_coloured_by_direction() {
        let candles = CandleSeries::new(
            "ACME",
            vec![
                Candle {
                    date: 0.0,
                    open: 1.0,
                    high: 4.0,
                    low: 0.5,
                    close: 3.0,
                },
                Candle {
                    date: 86_400.0,
                    open: 3.0,
                    high: 3.5,
                    low: 1.0,
                    close: 2.0,
                },
            ],
        );
        let mut chart = CandlestickChart::new();
        let marks = rendered(&mut chart, (&candles).into());
        let bodies: Vec<_> = marks.iter().filter(|m| m.class == "open-close-bar").collect();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[0].payload.paint.fill, Some(css::GREEN));
        assert_eq!(bodies[1].payload.paint.fill, Some(css::RED));
        let Some(scale) = chart.color_scale() else {
            panic!("direction scale");
        };
        assert_eq!(classify(&scale), LegendScaleKind::Ordinal);
    }

    #[test]
    fn series_input_is_rejected_by_candlesticks() {
        let input = SeriesInput::Single(crate::data::Series::from_pairs("G", [("a", 1.0)]));
        let mut marks = Vec::new();
        let result =
            CandlestickChart::new().render(&mut Frame::new(&mut marks), (&input).into());
        assert!(matches!(result, Err(ChartError::MalformedInput { .. })));
    }
}
