// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: mappings from data values into positions, sizes and colours.
//!
//! Every scale reports its [`ScaleKind`] explicitly, so consumers such as the legend choose a
//! renderer by asking rather than by probing for behaviour.

use indexmap::IndexSet;
use peniko::Color;

use crate::error::ChartError;
use crate::time;

/// The family a scale belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleKind {
    /// Continuous numeric domain, continuous range.
    Linear,
    /// Discrete domain, evenly spaced bands.
    Band,
    /// Discrete domain, discrete range.
    Ordinal,
    /// Continuous domain cut into buckets by break points.
    Threshold,
    /// Continuous time domain (seconds).
    Time,
}

/// Anything that can report its scale kind.
pub trait ScaleKindOf {
    /// The scale family.
    fn kind(&self) -> ScaleKind;
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Restricts outputs to the range.
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Replaces the range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    /// Extends the domain outward to round tick values.
    #[must_use]
    pub fn nice(mut self) -> Self {
        let (d0, d1) = self.domain;
        let ticks = nice_ticks(d0, d1, 10);
        if let (Some(&lo), Some(&hi)) = (ticks.first(), ticks.last())
            && ticks.len() >= 2
        {
            self.domain = if d0 <= d1 { (lo, hi) } else { (hi, lo) };
        }
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let mut t = (x - d0) / denom;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Maps a range value back into the domain.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (y - r0) / denom * (d1 - d0)
    }

    /// The domain as configured.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The range as configured.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Round tick values inside the domain, roughly `count` of them.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = ordered(self.domain);
        let eps = (hi - lo).abs() * 1e-9;
        nice_ticks(lo, hi, count)
            .into_iter()
            .filter(|t| *t >= lo - eps && *t <= hi + eps)
            .collect()
    }

    /// The spacing of [`ScaleLinear::ticks`].
    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = ordered(self.domain);
        if count == 0 {
            return 0.0;
        }
        nice_step((hi - lo) / count as f64)
    }
}

impl ScaleKindOf for ScaleLinear {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Linear
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    if min == max {
        return vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let step = nice_step((max - min) / count.max(1) as f64);
    if step == 0.0 {
        return vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    // Multiplying from the start avoids accumulating error; rounding to the step's
    // precision strips the remainder (0.30000000000000004 -> 0.3).
    let precision = (-step.log10().floor()).max(0.0);
    let factor = 10_f64.powf(precision);
    (0..=n)
        .map(|i| ((start + step * i as f64) * factor).round() / factor)
        .collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A time scale: a linear scale over unix seconds with calendar-aware ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Maps a range value back to a timestamp.
    pub fn invert(&self, y: f64) -> f64 {
        self.inner.invert(y)
    }

    /// The domain in seconds.
    pub fn domain(&self) -> (f64, f64) {
        self.inner.domain()
    }

    /// The range.
    pub fn range(&self) -> (f64, f64) {
        self.inner.range()
    }

    /// Calendar-aware tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (d0, d1) = self.inner.domain();
        time::nice_time_ticks(d0, d1, count)
    }

    /// The spacing of [`ScaleTime::ticks`].
    pub fn tick_step(&self, count: usize) -> f64 {
        let (lo, hi) = ordered(self.inner.domain());
        time::nice_time_step((hi - lo) / count.max(1) as f64)
    }
}

impl ScaleKindOf for ScaleTime {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Time
    }
}

/// A discrete band scale: each domain key owns an evenly spaced band of the range.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBand {
    domain: IndexSet<String>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
}

impl ScaleBand {
    /// Creates an unpadded band scale.
    pub fn new<I, S>(domain: I, range: (f64, f64)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domain: domain.into_iter().map(Into::into).collect(),
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
        }
    }

    /// Sets inner and outer padding, as fractions of a step.
    pub fn with_padding(mut self, padding: f64) -> Self {
        let p = padding.clamp(0.0, 1.0);
        self.padding_inner = p;
        self.padding_outer = p;
        self
    }

    /// Sets inner padding only.
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self
    }

    /// Sets outer padding only.
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self
    }

    /// Rounds the step, start and bandwidth to whole units.
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self
    }

    /// Replaces the range.
    pub fn with_range(mut self, range: (f64, f64)) -> Self {
        self.range = range;
        self
    }

    fn layout(&self) -> (f64, f64, f64) {
        let n = self.domain.len() as f64;
        let (lo, hi) = ordered(self.range);
        let mut step = (hi - lo) / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut start = lo + (hi - lo - step * (n - self.padding_inner)) * self.align;
        let mut bandwidth = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            bandwidth = bandwidth.round();
        }
        (start, step, bandwidth)
    }

    /// Start of the band for `key`, or `None` for keys outside the domain.
    pub fn map(&self, key: &str) -> Option<f64> {
        let index = self.domain.get_index_of(key)?;
        let (start, step, _) = self.layout();
        let slot = if self.range.1 < self.range.0 {
            self.domain.len() - 1 - index
        } else {
            index
        };
        Some(start + step * slot as f64)
    }

    /// Width of every band.
    pub fn bandwidth(&self) -> f64 {
        self.layout().2
    }

    /// Distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.layout().1
    }

    /// Domain keys in order.
    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }

    /// Number of bands.
    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Whether the domain is empty.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// The range as configured.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

impl ScaleKindOf for ScaleBand {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Band
    }
}

/// A discrete mapping from domain keys to range values, cycling the range.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleOrdinal<R> {
    domain: IndexSet<String>,
    range: Vec<R>,
}

impl<R> ScaleOrdinal<R> {
    /// Creates an ordinal scale.
    pub fn new<I, S>(domain: I, range: Vec<R>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domain: domain.into_iter().map(Into::into).collect(),
            range,
        }
    }

    /// Range value for `key`; `None` for keys outside the domain or an empty range.
    pub fn map(&self, key: &str) -> Option<&R> {
        let index = self.domain.get_index_of(key)?;
        if self.range.is_empty() {
            return None;
        }
        self.range.get(index % self.range.len())
    }

    /// Domain keys in order.
    pub fn domain(&self) -> impl Iterator<Item = &str> {
        self.domain.iter().map(String::as_str)
    }

    /// Range values in order.
    pub fn range(&self) -> &[R] {
        &self.range
    }
}

impl<R> ScaleKindOf for ScaleOrdinal<R> {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Ordinal
    }
}

/// Buckets a continuous domain by ascending break points.
///
/// `n` thresholds make `n + 1` buckets; values below the first threshold fall in bucket 0.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleThreshold<R> {
    domain: Vec<f64>,
    range: Vec<R>,
}

impl<R> ScaleThreshold<R> {
    /// Creates a threshold scale.
    pub fn new(domain: Vec<f64>, range: Vec<R>) -> Self {
        Self { domain, range }
    }

    /// Range value for `x`; `None` for `NaN` or when the range has no entry for the bucket.
    pub fn map(&self, x: f64) -> Option<&R> {
        if x.is_nan() {
            return None;
        }
        let bucket = self.domain.partition_point(|t| *t <= x);
        self.range.get(bucket)
    }

    /// The domain extent of the bucket mapped to `value`.
    ///
    /// The outer buckets are unbounded on one side.
    pub fn invert_extent(&self, value: &R) -> Option<(Option<f64>, Option<f64>)>
    where
        R: PartialEq,
    {
        let i = self.range.iter().position(|r| r == value)?;
        let lo = i.checked_sub(1).and_then(|j| self.domain.get(j)).copied();
        Some((lo, self.domain.get(i).copied()))
    }

    /// Break points in order.
    pub fn domain(&self) -> &[f64] {
        &self.domain
    }

    /// Range values in order.
    pub fn range(&self) -> &[R] {
        &self.range
    }
}

impl<R> ScaleKindOf for ScaleThreshold<R> {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Threshold
    }
}

/// A linear colour ramp between two colours.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinearColor {
    domain: (f64, f64),
    range: (Color, Color),
}

impl ScaleLinearColor {
    /// Creates a colour ramp.
    pub fn new(domain: (f64, f64), range: (Color, Color)) -> Self {
        Self { domain, range }
    }

    /// Interpolated colour for `x`, clamped to the ends of the ramp.
    pub fn map(&self, x: f64) -> Option<Color> {
        let t = ScaleLinear::new(self.domain, (0.0, 1.0))
            .with_clamp(true)
            .map(x);
        if t.is_nan() {
            return None;
        }
        let a = self.range.0.to_rgba8();
        let b = self.range.1.to_rgba8();
        let channel = |x: u8, y: u8| -> u8 {
            let v = (f64::from(x) + (f64::from(y) - f64::from(x)) * t)
                .round()
                .clamp(0.0, 255.0);
            #[allow(clippy::cast_possible_truncation, reason = "clamped to the u8 range")]
            {
                v as u8
            }
        };
        Some(Color::from_rgba8(
            channel(a.r, b.r),
            channel(a.g, b.g),
            channel(a.b, b.b),
            channel(a.a, b.a),
        ))
    }

    /// The domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The end colours.
    pub fn range(&self) -> (Color, Color) {
        self.range
    }
}

impl ScaleKindOf for ScaleLinearColor {
    fn kind(&self) -> ScaleKind {
        ScaleKind::Linear
    }
}

/// How a component looks up colours.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorKeying {
    /// By category or series key; needs an ordinal scale.
    Key,
    /// By value; needs a threshold or linear scale.
    Value,
}

/// A colour scale of any supported kind.
#[derive(Clone, Debug, PartialEq)]
pub enum ColorScale {
    /// Key to colour.
    Ordinal(ScaleOrdinal<Color>),
    /// Value bucket to colour.
    Threshold(ScaleThreshold<Color>),
    /// Value to interpolated colour.
    Linear(ScaleLinearColor),
}

impl ColorScale {
    /// Colour for an element: ordinal scales read `key`, the others read `value`.
    pub fn color(&self, key: &str, value: f64) -> Option<Color> {
        match self {
            Self::Ordinal(s) => s.map(key).copied(),
            Self::Threshold(s) => s.map(value).copied(),
            Self::Linear(s) => s.map(value),
        }
    }

    /// Checks that this scale suits the given keying.
    pub fn check(&self, keying: ColorKeying) -> Result<(), ChartError> {
        match (keying, self) {
            (ColorKeying::Key, Self::Ordinal(_))
            | (ColorKeying::Value, Self::Threshold(_) | Self::Linear(_)) => Ok(()),
            (ColorKeying::Key, other) => Err(ChartError::ScaleMismatch {
                expected: ScaleKind::Ordinal,
                found: other.kind(),
            }),
            (ColorKeying::Value, other) => Err(ChartError::ScaleMismatch {
                expected: ScaleKind::Threshold,
                found: other.kind(),
            }),
        }
    }

    /// An ordinal colour scale; errors when `colors` is empty.
    pub fn ordinal<I, S>(domain: I, colors: Vec<Color>) -> Result<Self, ChartError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if colors.is_empty() {
            return Err(ChartError::EmptyRange);
        }
        Ok(Self::Ordinal(ScaleOrdinal::new(domain, colors)))
    }

    /// A threshold colour scale; errors when `colors` is empty.
    pub fn threshold(thresholds: Vec<f64>, colors: Vec<Color>) -> Result<Self, ChartError> {
        if colors.is_empty() {
            return Err(ChartError::EmptyRange);
        }
        Ok(Self::Threshold(ScaleThreshold::new(thresholds, colors)))
    }
}

impl ScaleKindOf for ColorScale {
    fn kind(&self) -> ScaleKind {
        match self {
            Self::Ordinal(_) => ScaleKind::Ordinal,
            Self::Threshold(_) => ScaleKind::Threshold,
            Self::Linear(_) => ScaleKind::Linear,
        }
    }
}

/// A component's scale setting: unset, inferred from data, or supplied by the caller.
///
/// Inferred scales are cached until [`ScaleSlot::clear_inferred`]; supplied scales are never
/// replaced by inference.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleSlot<S> {
    scale: Option<S>,
    supplied: bool,
}

impl<S> Default for ScaleSlot<S> {
    fn default() -> Self {
        Self {
            scale: None,
            supplied: false,
        }
    }
}

impl<S> ScaleSlot<S> {
    /// The resolved scale, if any.
    pub fn get(&self) -> Option<&S> {
        self.scale.as_ref()
    }

    /// Whether the caller supplied this scale.
    pub fn is_supplied(&self) -> bool {
        self.supplied
    }

    /// Stores a caller-supplied scale.
    pub fn supply(&mut self, scale: S) {
        self.scale = Some(scale);
        self.supplied = true;
    }

    /// Infers the scale if unset, then returns it.
    pub fn resolve_with(&mut self, infer: impl FnOnce() -> S) -> &S {
        self.scale.get_or_insert_with(infer)
    }

    /// Like [`ScaleSlot::resolve_with`] for fallible inference.
    ///
    /// A failed inference leaves the slot unset.
    pub fn try_resolve_with(
        &mut self,
        infer: impl FnOnce() -> Result<S, ChartError>,
    ) -> Result<&S, ChartError> {
        let scale = match self.scale.take() {
            Some(scale) => scale,
            None => infer()?,
        };
        Ok(self.scale.insert(scale))
    }

    /// Drops an inferred scale so the next pass infers again.
    pub fn clear_inferred(&mut self) {
        if !self.supplied {
            self.scale = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn linear_maps_and_inverts() {
        let s = ScaleLinear::new((0.0, 10.0), (100.0, 0.0));
        assert_approx_eq!(f64, s.map(2.5), 75.0, epsilon = 1e-9);
        assert_approx_eq!(f64, s.invert(75.0), 2.5, epsilon = 1e-9);
        assert_approx_eq!(f64, s.with_clamp(true).map(20.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn nice_extends_to_round_values() {
        let s = ScaleLinear::new((0.0, 97.0), (0.0, 1.0)).nice();
        assert_eq!(s.domain(), (0.0, 100.0));
        let s = ScaleLinear::new((0.0, 0.97), (0.0, 1.0)).nice();
        assert_eq!(s.domain(), (0.0, 1.0));
    }

    #[test]
    fn ticks_stay_inside_domain() {
        let s = ScaleLinear::new((0.5, 9.5), (0.0, 1.0));
        let ticks = s.ticks(10);
        assert_eq!(ticks.first(), Some(&1.0));
        assert_eq!(ticks.last(), Some(&9.0));
        let s = ScaleLinear::new((0.0, 0.3), (0.0, 1.0));
        assert!(s.ticks(3).contains(&0.3));
    }

    #[test]
    fn band_matches_d3_layout() {
        // d3.scaleBand().domain(["a","b","c"]).range([0, 100]).padding(0.1)
        let s = ScaleBand::new(["a", "b", "c"], (0.0, 100.0)).with_padding(0.1);
        assert_approx_eq!(f64, s.step(), 100.0 / 3.1, epsilon = 1e-9);
        assert_approx_eq!(f64, s.bandwidth(), 0.9 * 100.0 / 3.1, epsilon = 1e-9);
        let Some(a) = s.map("a") else {
            panic!("a is in the domain");
        };
        assert_approx_eq!(f64, a, 0.1 * 100.0 / 3.1, epsilon = 1e-9);
        assert_eq!(s.map("z"), None);
    }

    #[test]
    fn band_rounding_and_reversal() {
        let s = ScaleBand::new(["a", "b"], (0.0, 101.0)).with_round(true);
        assert_eq!(s.step(), 50.0);
        assert_eq!(s.map("a"), Some(1.0));
        let r = ScaleBand::new(["a", "b"], (100.0, 0.0));
        assert_eq!(r.map("a"), Some(50.0));
        assert_eq!(r.map("b"), Some(0.0));
    }

    #[test]
    fn ordinal_cycles_its_range() {
        let s = ScaleOrdinal::new(["a", "b", "c"], vec![1, 2]);
        assert_eq!(s.map("c"), Some(&1));
        assert_eq!(s.map("d"), None);
        assert_eq!(s.kind(), ScaleKind::Ordinal);
    }

    #[test]
    fn threshold_buckets_and_inverts() {
        let s = ScaleThreshold::new(vec![1.0, 2.0], vec!["low", "mid", "high"]);
        assert_eq!(s.map(0.5), Some(&"low"));
        assert_eq!(s.map(1.0), Some(&"mid"));
        assert_eq!(s.map(5.0), Some(&"high"));
        assert_eq!(s.map(f64::NAN), None);
        assert_eq!(s.invert_extent(&"low"), Some((None, Some(1.0))));
        assert_eq!(s.invert_extent(&"high"), Some((Some(2.0), None)));
    }

    #[test]
    fn color_scale_checks_keying() {
        let Ok(ordinal) = ColorScale::ordinal(["a"], vec![css::RED]) else {
            panic!("non-empty range");
        };
        assert!(ordinal.check(ColorKeying::Key).is_ok());
        assert_eq!(
            ordinal.check(ColorKeying::Value),
            Err(ChartError::ScaleMismatch {
                expected: ScaleKind::Threshold,
                found: ScaleKind::Ordinal
            })
        );
        assert_eq!(
            ColorScale::threshold(vec![1.0], Vec::new()),
            Err(ChartError::EmptyRange)
        );
    }

    #[test]
    fn slot_prefers_supplied_and_caches_inferred() {
        let mut slot: ScaleSlot<u32> = ScaleSlot::default();
        assert_eq!(*slot.resolve_with(|| 1), 1);
        assert_eq!(*slot.resolve_with(|| 2), 1);
        slot.clear_inferred();
        assert_eq!(*slot.resolve_with(|| 3), 3);
        slot.supply(9);
        slot.clear_inferred();
        assert_eq!(*slot.resolve_with(|| 4), 9);
        assert!(slot.is_supplied());
    }

    #[test]
    fn failed_inference_leaves_the_slot_unset() {
        let mut slot: ScaleSlot<u32> = ScaleSlot::default();
        assert_eq!(
            slot.try_resolve_with(|| Err(ChartError::EmptyRange)),
            Err(ChartError::EmptyRange)
        );
        assert_eq!(slot.get(), None);
        assert_eq!(slot.try_resolve_with(|| Ok(5)), Ok(&5));
        assert_eq!(slot.try_resolve_with(|| Err(ChartError::EmptyRange)), Ok(&5));
        assert!(!slot.is_supplied());
    }
}
