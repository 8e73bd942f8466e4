// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint-order conventions for chart-generated marks.
//!
//! The scene sorts by `(z_index, MarkId)`, so these values only need to be coarse.

/// Legend frame and other background fills.
pub const BACKGROUND: i32 = -100;
/// Gridlines and axis rings drawn behind series.
pub const GRID_LINES: i32 = -50;

/// Filled series marks (bars, slices, cells, circles).
pub const SERIES_FILL: i32 = 0;
/// Stroked series marks (lines, wicks, label connectors).
pub const SERIES_STROKE: i32 = 10;
/// Point series marks drawn above lines.
pub const SERIES_POINTS: i32 = 20;
/// Text attached to series marks.
pub const SERIES_LABELS: i32 = 25;

/// Axis domain lines and ticks.
pub const AXIS_RULES: i32 = 30;
/// Axis tick labels.
pub const AXIS_LABELS: i32 = 40;

/// Legend swatches.
pub const LEGEND_SWATCHES: i32 = 60;
/// Legend labels and title.
pub const LEGEND_LABELS: i32 = 70;
/// Chart title and credit tag.
pub const TITLES: i32 = 80;
