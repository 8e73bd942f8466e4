// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart orchestrator.
//!
//! A [`Chart`] hosts one [`ChartBody`] together with the shared guides (legend, title, credit
//! tag) and drives a complete render pass onto a [`Canvas`]:
//!
//! 1. **Layout**: the canvas less margins is split between chart, legend and title, so the body
//!    is sized before any of its scales are inferred.
//! 2. **Root**: the first pass on a canvas creates its layer groups; later passes only move them.
//! 3. **Render**: the body draws, the legend reads clones of the body's scales, then title and
//!    credit tag draw. Everything is committed at once, and a failed pass commits nothing.

use core::fmt;
use std::rc::Rc;

use ezviz_core::{Canvas, Dispatch, Ease, EventDatum, EventKind, MarkDiff, Transition};
use kurbo::{Point, Size, Vec2};
use serde::{Deserialize, Serialize};

use crate::component::{ComponentConfig, Configurable};
use crate::credit_tag::CreditTag;
use crate::data::ChartData;
use crate::error::ChartError;
use crate::frame::Frame;
use crate::layout::{CanvasLayout, LayoutSpec, Margin};
use crate::legend::Legend;
use crate::measure::{HeuristicTextMeasurer, TextMeasurer};
use crate::palette;
use crate::scale::{ColorScale, ScaleLinear, ScaleSlot};
use crate::title::Title;

/// Layer holding the chart body.
pub const CHART_BOX: &str = "chartbox";
/// Layer holding the legend.
pub const LEGEND_BOX: &str = "legendbox";
/// Layer holding the title.
pub const TITLE_BOX: &str = "titlebox";
/// Layer holding the credit tag.
pub const CREDIT_BOX: &str = "creditbox";

/// A complete chart drawing, hosted by [`Chart`].
///
/// Bodies keep their own settings in a [`ComponentConfig`]; the host overwrites the size,
/// dispatcher and (when configured) transition and colours before every pass.
pub trait ChartBody: fmt::Debug {
    /// Registry name, e.g. `barChartVertical`.
    fn name(&self) -> &'static str;

    /// Shared settings.
    fn chart_config(&self) -> &ComponentConfig;

    /// Shared settings, mutably.
    fn chart_config_mut(&mut self) -> &mut ComponentConfig;

    /// Draws the body into `frame`, whose origin is the top-left of the chart box.
    fn render(&mut self, frame: &mut Frame<'_>, data: ChartData<'_>) -> Result<(), ChartError>;

    /// The colour scale of the last pass, for the legend.
    fn color_scale(&self) -> Option<ColorScale>;

    /// The size scale of the last pass, for the legend.
    fn size_scale(&self) -> Option<ScaleLinear> {
        None
    }
}

/// Easing curve names accepted in [`TransitionOptions`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EaseOption {
    /// Constant speed.
    Linear,
    /// Cubic ease-in-out.
    CubicInOut,
    /// Bounce at the end.
    #[default]
    Bounce,
    /// Sinusoidal ease-in-out.
    SinInOut,
}

impl From<EaseOption> for Ease {
    fn from(ease: EaseOption) -> Self {
        match ease {
            EaseOption::Linear => Self::Linear,
            EaseOption::CubicInOut => Self::CubicInOut,
            EaseOption::Bounce => Self::Bounce,
            EaseOption::SinInOut => Self::SinInOut,
        }
    }
}

/// Transition timing as loaded from options.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionOptions {
    /// Duration in seconds.
    pub duration: f64,
    /// Easing curve.
    pub ease: EaseOption,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        Self {
            duration: 0.5,
            ease: EaseOption::Bounce,
        }
    }
}

impl From<TransitionOptions> for Transition {
    fn from(options: TransitionOptions) -> Self {
        Self::new(options.duration.max(0.0), options.ease.into())
    }
}

/// Title lines.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitleOptions {
    /// Main line.
    pub main_text: String,
    /// Optional second line.
    pub sub_text: Option<String>,
}

impl Default for TitleOptions {
    fn default() -> Self {
        Self {
            main_text: "Title".into(),
            sub_text: Some("Sub Title".into()),
        }
    }
}

/// Host-level chart settings. Every field has a default, so partial JSON is accepted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartOptions {
    /// Outer width.
    pub width: f64,
    /// Outer height.
    pub height: f64,
    /// Whitespace around the canvas.
    pub margin: Margin,
    /// Overrides the body's transition.
    pub transition: Option<TransitionOptions>,
    /// Categorical palette id overriding the body's colours.
    pub palette: Option<u8>,
    /// Whether to draw the legend.
    pub legend: bool,
    /// Legend heading.
    pub legend_title: String,
    /// Title lines; `None` draws no title.
    pub title: Option<TitleOptions>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            margin: Margin::default(),
            transition: None,
            palette: None,
            legend: true,
            legend_title: "Key".into(),
            title: None,
        }
    }
}

impl ChartOptions {
    /// Parses options from JSON.
    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        serde_json::from_str(text)
            .map_err(|e| ChartError::malformed("chart options", e.to_string()))
    }
}

/// A chart body with its guides, rendering onto a [`Canvas`].
pub struct Chart {
    body: Box<dyn ChartBody>,
    options: ChartOptions,
    dispatch: Dispatch,
    measurer: Rc<dyn TextMeasurer>,
    credit: CreditTag,
}

impl fmt::Debug for Chart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chart")
            .field("body", &self.body)
            .field("options", &self.options)
            .field("dispatch", &self.dispatch)
            .field("credit", &self.credit)
            .finish_non_exhaustive()
    }
}

impl Chart {
    /// Hosts `body` with default options.
    pub fn new(body: impl ChartBody + 'static) -> Self {
        Self::from_box(Box::new(body))
    }

    /// Hosts an already boxed body, as returned by a registry.
    pub fn from_box(body: Box<dyn ChartBody>) -> Self {
        Self {
            body,
            options: ChartOptions::default(),
            dispatch: Dispatch::new(),
            measurer: Rc::new(HeuristicTextMeasurer),
            credit: CreditTag::default(),
        }
    }

    /// Replaces the options.
    pub fn with_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the measurer used to size the title.
    pub fn with_measurer(mut self, measurer: impl TextMeasurer + 'static) -> Self {
        self.measurer = Rc::new(measurer);
        self
    }

    /// Replaces the credit tag.
    pub fn with_credit(mut self, credit: CreditTag) -> Self {
        self.credit = credit;
        self
    }

    /// The options.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// The options, mutably.
    pub fn options_mut(&mut self) -> &mut ChartOptions {
        &mut self.options
    }

    /// The hosted body.
    pub fn body(&self) -> &dyn ChartBody {
        &*self.body
    }

    /// The hosted body, mutably.
    pub fn body_mut(&mut self) -> &mut dyn ChartBody {
        &mut *self.body
    }

    /// The dispatcher every mark of this chart fires through.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Subscribes to a semantic event.
    pub fn on(&self, kind: EventKind, handler: impl Fn(EventKind, &EventDatum) + 'static) {
        self.dispatch.on(kind, handler);
    }

    fn title(&self) -> Option<Title> {
        self.options.title.as_ref().map(|t| {
            let title = Title::new(t.main_text.as_str());
            match &t.sub_text {
                Some(sub) => title.with_sub_text(sub.as_str()),
                None => title,
            }
        })
    }

    /// Runs one render pass and commits it to `canvas` at time `now`.
    ///
    /// Returns the reconciliation diffs. On error nothing is committed and the canvas keeps
    /// showing the previous pass.
    pub fn render<'a>(
        &mut self,
        canvas: &mut Canvas,
        data: impl Into<ChartData<'a>>,
        now: f64,
    ) -> Result<Vec<MarkDiff>, ChartError> {
        let data = data.into();
        let size = Size::new(self.options.width, self.options.height);
        let title = self.title();
        let legend = self
            .options
            .legend
            .then(|| Legend::new().with_title(self.options.legend_title.as_str()));
        let layout = CanvasLayout::arrange(&LayoutSpec {
            size,
            margin: self.options.margin,
            legend: legend.as_ref().map(Legend::size),
            title_height: title.as_ref().map(|t| t.measure(&*self.measurer)),
        });

        canvas.set_size(size);
        let title_anchor = layout
            .title
            .map_or(Point::ZERO, |r| Point::new(r.center().x, r.y0));
        let created = canvas.ensure_root(&[
            (CHART_BOX, layout.chart.origin()),
            (LEGEND_BOX, layout.legend.map_or(Point::ZERO, |r| r.origin())),
            (TITLE_BOX, title_anchor),
            (CREDIT_BOX, layout.credit),
        ]);
        if created {
            tracing::debug!(chart = self.body.name(), "created chart layers");
        }
        let offset = |name: &str| canvas.root().map_or(Vec2::ZERO, |root| root.offset(name));
        let (chart_at, legend_at, title_at, credit_at) = (
            offset(CHART_BOX),
            offset(LEGEND_BOX),
            offset(TITLE_BOX),
            offset(CREDIT_BOX),
        );

        let config = self.body.chart_config_mut();
        config.set_size(layout.chart.size());
        config.set_dispatch(self.dispatch.clone());
        if let Some(transition) = self.options.transition {
            config.set_transition(transition.into());
        }
        if let Some(id) = self.options.palette {
            config.set_colors(palette::categorical(id)?);
        }

        let mut marks = Vec::new();
        let mut root = Frame::new(&mut marks);
        self.body.render(&mut root.child(CHART_BOX, chart_at), data)?;

        if let (Some(legend), Some(rect)) = (legend, layout.legend) {
            let mut legend = legend.with_size(rect.width(), rect.height());
            if let Some(scale) = self.body.color_scale() {
                legend = legend.with_color_scale(scale);
            }
            if let Some(scale) = self.body.size_scale() {
                legend = legend.with_size_scale(scale);
            }
            legend.render(&mut root.child(LEGEND_BOX, legend_at));
        }
        if let Some(title) = &title {
            title.render(&mut root.child(TITLE_BOX, title_at));
        }
        self.credit.render(&mut root.child(CREDIT_BOX, credit_at));

        tracing::debug!(chart = self.body.name(), marks = marks.len(), "rendered chart");
        Ok(canvas.commit(marks, now))
    }
}

/// Offset and size of the plot area inside a body of `size` with inner `margin`.
pub(crate) fn plot_area(size: Size, margin: Margin) -> (Vec2, Size) {
    (
        Vec2::new(margin.left, margin.top),
        Size::new(
            (size.width - margin.left - margin.right).max(0.0),
            (size.height - margin.top - margin.bottom).max(0.0),
        ),
    )
}

/// Hands a body's transition, colours and dispatcher down to one of its components.
pub(crate) fn inherit<C: Configurable>(config: &ComponentConfig, component: C) -> C {
    component
        .with_transition(config.transition())
        .with_colors(config.colors().to_vec())
        .with_dispatch(config.dispatch().clone())
}

/// Records the colour scale a component resolved, unless the caller supplied one.
pub(crate) fn adopt(slot: &mut ScaleSlot<ColorScale>, resolved: Option<&ColorScale>) {
    if let Some(scale) = resolved {
        slot.resolve_with(|| scale.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_load_from_partial_json() {
        let Ok(options) = ChartOptions::from_json(
            r#"{
                "width": 800,
                "margin": {"left": 40},
                "transition": {"duration": 1.5, "ease": "cubic-in-out"},
                "title": {"main_text": "Sales"}
            }"#,
        ) else {
            panic!("options should parse");
        };
        assert_eq!(options.width, 800.0);
        assert_eq!(options.height, 400.0);
        assert_eq!(options.margin.left, 40.0);
        assert_eq!(options.margin.top, 15.0);
        assert!(options.legend);
        let Some(transition) = options.transition else {
            panic!("transition was given");
        };
        assert_eq!(
            Transition::from(transition),
            Transition::new(1.5, Ease::CubicInOut)
        );
        let Some(title) = options.title else {
            panic!("title was given");
        };
        assert_eq!(title.main_text, "Sales");
        assert_eq!(title.sub_text.as_deref(), Some("Sub Title"));
    }

    #[test]
    fn malformed_options_are_rejected() {
        let result = ChartOptions::from_json(r#"{"width": "wide"}"#);
        assert!(matches!(
            result,
            Err(ChartError::MalformedInput {
                expected: "chart options",
                ..
            })
        ));
    }

    #[test]
    fn plot_area_clamps_to_zero() {
        let (offset, size) = plot_area(Size::new(50.0, 30.0), Margin::uniform(20.0));
        assert_eq!(offset, Vec2::new(20.0, 20.0));
        assert_eq!(size, Size::new(10.0, 0.0));
    }
}
