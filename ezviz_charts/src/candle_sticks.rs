// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Open/high/low/close candles.

use ezviz_core::{Curve, EventDatum, Mark, MarkEvent, Shape};
use kurbo::{Point, Rect};
use peniko::Color;
use peniko::color::palette::css;

use crate::component::{ComponentConfig, Configurable, extent};
use crate::data::{Candle, CandleSeries};
use crate::frame::Frame;
use crate::scale::{ScaleLinear, ScaleSlot, ScaleTime};
use crate::z_order;

const DAY: f64 = 86_400.0;

/// One candle per period: a high-low wick and an open-close body.
///
/// Rising periods use the first colour, falling periods the second.
#[derive(Clone, Debug)]
pub struct CandleSticks {
    config: ComponentConfig,
    candle_width: f64,
    x_scale: ScaleSlot<ScaleTime>,
    y_scale: ScaleSlot<ScaleLinear>,
}

impl Default for CandleSticks {
    fn default() -> Self {
        Self::new()
    }
}

impl CandleSticks {
    /// Creates the component with default settings.
    pub fn new() -> Self {
        Self {
            config: ComponentConfig::new(400.0, 400.0, vec![css::GREEN, css::RED]),
            candle_width: 3.0,
            x_scale: ScaleSlot::default(),
            y_scale: ScaleSlot::default(),
        }
    }

    /// Sets half the body width.
    pub fn with_candle_width(mut self, candle_width: f64) -> Self {
        self.candle_width = candle_width;
        self
    }

    /// Supplies the date scale.
    pub fn with_x_scale(mut self, scale: ScaleTime) -> Self {
        self.x_scale.supply(scale);
        self
    }

    /// Supplies the price scale.
    pub fn with_y_scale(mut self, scale: ScaleLinear) -> Self {
        self.y_scale.supply(scale);
        self
    }

    /// The date scale, once resolved.
    pub fn x_scale(&self) -> Option<&ScaleTime> {
        self.x_scale.get()
    }

    /// The price scale, once resolved.
    pub fn y_scale(&self) -> Option<&ScaleLinear> {
        self.y_scale.get()
    }

    /// Resolves unset scales: dates padded by a day each side, prices from lowest low to
    /// highest high.
    pub fn init(&mut self, data: &CandleSeries) {
        let size = self.size();
        self.x_scale.resolve_with(|| {
            let (lo, hi) = extent(data.values.iter().map(|c| c.date));
            ScaleTime::new((lo - DAY, hi + DAY), (0.0, size.width))
        });
        self.y_scale.resolve_with(|| {
            let (lo, _) = extent(data.values.iter().map(|c| c.low));
            let (_, hi) = extent(data.values.iter().map(|c| c.high));
            ScaleLinear::new((lo, hi), (size.height, 0.0)).nice()
        });
    }

    fn color(&self, candle: &Candle) -> Color {
        let index = usize::from(!candle.is_up());
        self.colors().get(index).copied().unwrap_or(css::GRAY)
    }

    /// Emits the candles of `data`.
    pub fn draw(&self, frame: &mut Frame<'_>, data: &CandleSeries) {
        let (Some(x), Some(y)) = (self.x_scale.get(), self.y_scale.get()) else {
            return;
        };
        let w = self.candle_width;
        for candle in &data.values {
            let key = format!("{}", candle.date);
            let color = self.color(candle);
            let cx = x.map(candle.date);
            let event = MarkEvent::new(
                self.dispatch(),
                EventDatum::new(Some(data.key.as_str()), key.as_str(), candle.close),
            );
            frame.push(
                Mark::builder(frame.id("wick", &key))
                    .polyline(
                        vec![Point::new(cx, y.map(candle.high)), Point::new(cx, y.map(candle.low))],
                        Curve::Linear,
                    )
                    .stroke(color, 1.0)
                    .z_index(z_order::SERIES_STROKE)
                    .transition(self.transition())
                    .class("high-low-line")
                    .build(),
            );
            let body = Rect::new(cx - w, y.map(candle.open), cx + w, y.map(candle.close)).abs();
            let mid = body.center().y;
            frame.push(
                Mark::builder(frame.id("body", &key))
                    .rect(body)
                    .enter(Shape::Rect(Rect::new(body.x0, mid, body.x1, mid)))
                    .fill(color)
                    .stroke(color, 1.0)
                    .z_index(z_order::SERIES_POINTS)
                    .transition(self.transition())
                    .event(event)
                    .class("open-close-bar")
                    .build(),
            );
        }
    }

    /// Initialises, then draws `data` in a group keyed by its series key.
    pub fn render(&mut self, frame: &mut Frame<'_>, data: &CandleSeries) {
        self.init(data);
        self.draw(&mut frame.group(&data.key), data);
    }
}

impl Configurable for CandleSticks {
    fn config(&self) -> &ComponentConfig {
        &self.config
    }

    fn config_mut(&mut self) -> &mut ComponentConfig {
        &mut self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candles() -> CandleSeries {
        CandleSeries::new(
            "ACME",
            vec![
                Candle {
                    date: 0.0,
                    open: 10.0,
                    high: 20.0,
                    low: 5.0,
                    close: 15.0,
                },
                Candle {
                    date: DAY,
                    open: 15.0,
                    high: 18.0,
                    low: 0.0,
                    close: 12.0,
                },
            ],
        )
    }

    #[test]
    fn up_and_down_days_are_coloured() {
        let mut sticks = CandleSticks::new().with_size(300.0, 100.0);
        let mut marks = Vec::new();
        sticks.render(&mut Frame::new(&mut marks), &candles());
        assert_eq!(marks.len(), 4);
        assert_eq!(marks[1].payload.paint.fill, Some(css::GREEN));
        assert_eq!(marks[3].payload.paint.fill, Some(css::RED));
        assert_eq!(sticks.x_scale().map(ScaleTime::domain), Some((-DAY, 2.0 * DAY)));
    }

    #[test]
    fn bodies_span_open_to_close() {
        let mut sticks = CandleSticks::new().with_size(300.0, 100.0);
        let mut marks = Vec::new();
        sticks.render(&mut Frame::new(&mut marks), &candles());
        // Prices 0..20 map onto 100..0; the first day is a third of the way across.
        assert_eq!(
            marks[1].payload.bounds(),
            Some(Rect::new(97.0, 25.0, 103.0, 50.0))
        );
        assert!(marks[1].event.is_some());
        assert!(marks[0].event.is_none());
    }
}
