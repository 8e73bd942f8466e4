// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reusable component protocol.
//!
//! A component is configured with chained `with_*` calls, then rendered against a [`Frame`]:
//! [`SeriesComponent::init`] resolves any scale the caller left unset from the data's
//! [`DerivedStatistics`](crate::DerivedStatistics), and [`SeriesComponent::draw`] emits one keyed
//! mark per datum. Reconciliation against earlier passes happens later, when the canvas commits.

use ezviz_core::{Dispatch, EventDatum, MarkEvent, Transition};
use kurbo::Size;
use peniko::Color;
use peniko::color::palette::css;

use crate::data::{Datum, Series, SeriesInput};
use crate::error::ChartError;
use crate::frame::Frame;
use crate::palette;
use crate::scale::{ColorKeying, ColorScale, ScaleSlot};

/// Settings every component shares.
#[derive(Clone, Debug)]
pub struct ComponentConfig {
    size: Size,
    transition: Transition,
    colors: Vec<Color>,
    dispatch: Dispatch,
}

impl ComponentConfig {
    /// Defaults with the given size and colour range.
    pub fn new(width: f64, height: f64, colors: Vec<Color>) -> Self {
        Self {
            size: Size::new(width, height),
            transition: Transition::default(),
            colors,
            dispatch: Dispatch::new(),
        }
    }

    /// The drawing size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The transition timing.
    pub fn transition(&self) -> Transition {
        self.transition
    }

    /// The colours scales are inferred with.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// The event dispatcher.
    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Sets the drawing size.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    /// Sets the transition timing.
    pub fn set_transition(&mut self, transition: Transition) {
        self.transition = transition;
    }

    /// Sets the colours scales are inferred with.
    pub fn set_colors(&mut self, colors: Vec<Color>) {
        self.colors = colors;
    }

    /// Shares an event dispatcher.
    pub fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.dispatch = dispatch;
    }

    /// Event for a datum of `series`.
    pub(crate) fn event(&self, series: &Series, datum: &Datum) -> MarkEvent {
        MarkEvent::new(
            &self.dispatch,
            EventDatum::new(Some(series.key.as_str()), datum.key.as_str(), datum.value()),
        )
    }
}

/// Builder-style access to [`ComponentConfig`].
pub trait Configurable: Sized {
    /// Shared settings.
    fn config(&self) -> &ComponentConfig;

    /// Shared settings, mutably.
    fn config_mut(&mut self) -> &mut ComponentConfig;

    /// Sets the drawing size.
    fn with_size(mut self, width: f64, height: f64) -> Self {
        self.set_size(Size::new(width, height));
        self
    }

    /// Sets the transition timing.
    fn with_transition(mut self, transition: Transition) -> Self {
        self.config_mut().set_transition(transition);
        self
    }

    /// Sets the colours scales are inferred with.
    fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.config_mut().set_colors(colors);
        self
    }

    /// Shares an event dispatcher.
    fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.set_dispatch(dispatch);
        self
    }

    /// Sets the drawing size in place.
    fn set_size(&mut self, size: Size) {
        self.config_mut().set_size(size);
    }

    /// Shares an event dispatcher in place.
    fn set_dispatch(&mut self, dispatch: Dispatch) {
        self.config_mut().set_dispatch(dispatch);
    }

    /// The drawing size.
    fn size(&self) -> Size {
        self.config().size()
    }

    /// The transition timing.
    fn transition(&self) -> Transition {
        self.config().transition()
    }

    /// The colours scales are inferred with.
    fn colors(&self) -> &[Color] {
        self.config().colors()
    }

    /// The event dispatcher.
    fn dispatch(&self) -> &Dispatch {
        self.config().dispatch()
    }
}

/// A component that draws hierarchical series data.
pub trait SeriesComponent {
    /// Resolves unset scales from `data`.
    fn init(&mut self, data: &SeriesInput) -> Result<(), ChartError>;

    /// Emits the marks for one series into `frame`, in local coordinates.
    fn draw(&self, frame: &mut Frame<'_>, series: &Series);

    /// Initialises, then draws each series in a group keyed by the series key.
    fn render(&mut self, frame: &mut Frame<'_>, data: &SeriesInput) -> Result<(), ChartError> {
        self.init(data)?;
        for series in data.series() {
            self.draw(&mut frame.group(&series.key), series);
        }
        Ok(())
    }
}

/// Checks a supplied colour scale against `keying`, then infers one if unset.
pub(crate) fn resolve_color(
    slot: &mut ScaleSlot<ColorScale>,
    keying: ColorKeying,
    infer: impl FnOnce() -> Result<ColorScale, ChartError>,
) -> Result<(), ChartError> {
    if let Some(scale) = slot.get() {
        scale.check(keying)?;
    }
    slot.try_resolve_with(infer).map(|_| ())
}

/// Fill used when a colour scale has no entry for an element.
pub(crate) const MISSING_COLOR: Color = css::LIGHT_GRAY;

/// Colour for an element, falling back to [`MISSING_COLOR`].
pub(crate) fn color_of(scale: Option<&ColorScale>, key: &str, value: f64) -> Color {
    scale
        .and_then(|s| s.color(key, value))
        .unwrap_or(MISSING_COLOR)
}

/// The categorical palette components infer ordinal colour scales with.
pub(crate) fn default_colors() -> Vec<Color> {
    palette::categorical(3).unwrap_or_default()
}

/// The four-step ramp heat maps bucket values into.
pub(crate) fn heat_colors() -> Vec<Color> {
    vec![
        Color::from_rgb8(214, 245, 0),
        Color::from_rgb8(255, 166, 0),
        Color::from_rgb8(255, 97, 0),
        Color::from_rgb8(200, 65, 65),
    ]
}

/// The five-step diverging ramp heat map charts bucket values into, hot to cold.
pub(crate) fn heat_chart_colors() -> Vec<Color> {
    vec![
        Color::from_rgb8(211, 65, 82),
        Color::from_rgb8(244, 188, 113),
        Color::from_rgb8(251, 246, 196),
        Color::from_rgb8(155, 207, 149),
        Color::from_rgb8(57, 138, 187),
    ]
}

/// The explicit radius, or half the shorter side of `size`.
pub(crate) fn radius_for(radius: Option<f64>, size: Size) -> f64 {
    radius.unwrap_or_else(|| size.width.min(size.height) / 2.0)
}

/// Degrees to radians.
pub(crate) fn radians(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Smallest and largest non-`NaN` values, or `(0, 0)` when there are none.
pub(crate) fn extent(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .unwrap_or((0.0, 0.0))
}

#[cfg(test)]
mod tests {
    use peniko::color::palette::css;

    use super::*;
    use crate::scale::ScaleThreshold;

    #[test]
    fn extent_skips_nan() {
        assert_eq!(extent([3.0, f64::NAN, -1.0]), (-1.0, 3.0));
        assert_eq!(extent([f64::NAN]), (0.0, 0.0));
    }

    #[test]
    fn missing_colours_fall_back() {
        let scale = ColorScale::Threshold(ScaleThreshold::new(vec![1.0], vec![css::RED]));
        assert_eq!(color_of(Some(&scale), "k", 0.0), css::RED);
        assert_eq!(color_of(Some(&scale), "k", 5.0), MISSING_COLOR);
        assert_eq!(color_of(None, "k", 0.0), MISSING_COLOR);
    }

    #[test]
    fn supplied_scales_are_checked_before_inference() {
        let mut slot = ScaleSlot::default();
        slot.supply(ColorScale::Threshold(ScaleThreshold::new(vec![], vec![css::RED])));
        let result = resolve_color(&mut slot, ColorKeying::Key, || {
            panic!("supplied scales are never inferred")
        });
        assert!(matches!(result, Err(ChartError::ScaleMismatch { .. })));
    }
}
