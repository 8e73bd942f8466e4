// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable chart components and chart bodies for `ezviz_core`.
//!
//! The crate is layered:
//! - **Data** ([`SeriesInput`], [`CandleSeries`]) is parsed from JSON at the boundary and
//!   summarised by [`DerivedStatistics`] on every render pass.
//! - **Scales** map data values into screen coordinates and colours. Each declares its
//!   [`ScaleKind`]; supplied scales are checked, missing ones are inferred.
//! - **Components** ([`SeriesComponent`]) draw one kind of series mark; **guides** ([`Axis`],
//!   [`CircularAxis`], [`Legend`], [`Title`], [`CreditTag`]) annotate them.
//! - **Chart bodies** ([`ChartBody`]) compose components into a complete chart, and a [`Chart`]
//!   hosts a body with its legend and title on a persistent [`ezviz_core::Canvas`].
//!
//! Every component emits keyed [`ezviz_core::Mark`]s into a [`Frame`]; reconciliation with
//! earlier passes happens when the canvas commits, so re-rendering new data animates from the
//! old state.

mod axis;
mod bar_charts;
mod bars_circular;
mod bars_stacked;
mod bars_vertical;
mod bubbles;
mod candle_sticks;
mod chart;
mod circular_axis;
mod component;
mod credit_tag;
mod data;
mod donut;
mod error;
mod format;
mod frame;
mod grid_charts;
mod heat_map_ring;
mod heat_map_row;
mod labeled_node;
mod layout;
mod legend;
mod line_chart;
mod measure;
mod number_card;
pub mod palette;
mod polar_area;
mod proportional_area_circles;
mod radial_charts;
mod registry;
mod rose_chart_sector;
mod scale;
mod scatter_plot;
mod shape;
mod stats;
mod time;
mod title;
mod xy_charts;
mod z_order;

pub use axis::{Axis, AxisOrient, AxisScale, Tick};
pub use bar_charts::{BarChartCircular, BarChartClustered, BarChartStacked, BarChartVertical};
pub use bars_circular::BarsCircular;
pub use bars_stacked::BarsStacked;
pub use bars_vertical::BarsVertical;
pub use bubbles::Bubbles;
pub use candle_sticks::CandleSticks;
pub use chart::{
    CHART_BOX, CREDIT_BOX, Chart, ChartBody, ChartOptions, EaseOption, LEGEND_BOX, TITLE_BOX,
    TitleOptions, TransitionOptions,
};
pub use circular_axis::{CircularAxis, CircularRingLabels, CircularSectorLabels, RadialScale};
pub use component::{ComponentConfig, Configurable, SeriesComponent};
pub use credit_tag::CreditTag;
pub use data::{Candle, CandleSeries, ChartData, Datum, LeafValue, Series, SeriesInput};
pub use donut::Donut;
pub use error::ChartError;
pub use format::{format_tick, precision_for_step, range_label, to_fixed};
pub use frame::Frame;
pub use grid_charts::{HeatMapTable, PunchCard};
pub use heat_map_ring::HeatMapRing;
pub use heat_map_row::HeatMapRow;
pub use labeled_node::{LabeledNode, Node};
pub use layout::{CanvasLayout, LayoutSpec, Margin};
pub use legend::{Legend, LegendScaleKind, classify};
pub use line_chart::{LineChart, key_time};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use number_card::NumberCard;
pub use polar_area::PolarArea;
pub use proportional_area_circles::ProportionalAreaCircles;
pub use radial_charts::{DonutChart, HeatMapRadial, PolarAreaChart, RoseChart};
pub use registry::{ChartFactory, ChartRegistry};
pub use rose_chart_sector::RoseChartSector;
pub use scale::{
    ColorKeying, ColorScale, ScaleBand, ScaleKind, ScaleKindOf, ScaleLinear, ScaleLinearColor,
    ScaleOrdinal, ScaleSlot, ScaleThreshold, ScaleTime,
};
pub use scatter_plot::ScatterPlot;
pub use shape::{PieSlice, StackSegment, pie, stack};
pub use stats::{DerivedStatistics, Levels, decimal_places, round_to};
pub use time::{format_time, nice_time_step, nice_time_ticks};
pub use title::Title;
pub use xy_charts::{BubbleChart, CandlestickChart, LineChartBody};
pub use z_order::*;
