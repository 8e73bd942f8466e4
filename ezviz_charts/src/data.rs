// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical chart input.
//!
//! Every series component consumes the same two-level format: named series, each holding an
//! ordered list of `{ key, value }` data. A single series and a list of series are distinct
//! variants of [`SeriesInput`], resolved once when the input is built or parsed:
//!
//! ```json
//! { "key": "Fruit", "values": [{ "key": "Apples", "value": 9 }] }
//! [{ "key": "UK", "values": [...] }, { "key": "France", "values": [...] }]
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ChartError;

/// A leaf value, keeping its original textual form.
///
/// Decimal-place detection works on the text as written, so `"1.50"` counts two places while
/// the number `1.5` counts one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeafValue {
    /// A JSON number.
    Number(f64),
    /// A textual value.
    Text(String),
    /// No value.
    #[default]
    Missing,
}

impl LeafValue {
    /// Numeric coercion. Non-numeric text, empty text and missing values become `NaN`.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().unwrap_or(f64::NAN),
            Self::Missing => f64::NAN,
        }
    }

    /// The textual form used for decimal-place detection.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::Text(s) => Cow::Borrowed(s),
            Self::Missing => Cow::Borrowed(""),
        }
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => n.as_f64().map_or(Self::Missing, Self::Number),
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(Value::Bool(b)) => Self::Number(if *b { 1.0 } else { 0.0 }),
            _ => Self::Missing,
        }
    }
}

impl From<f64> for LeafValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for LeafValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// One category entry of a series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    /// Category key.
    #[serde(default)]
    pub key: String,
    /// Leaf value.
    #[serde(default)]
    pub value: LeafValue,
    /// Horizontal coordinate for scatter-style charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<LeafValue>,
    /// Vertical coordinate for scatter-style charts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<LeafValue>,
}

impl Datum {
    /// Creates a datum with a numeric value.
    pub fn new(key: impl Into<String>, value: impl Into<LeafValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            x: None,
            y: None,
        }
    }

    /// Sets scatter coordinates.
    pub fn with_xy(mut self, x: f64, y: f64) -> Self {
        self.x = Some(LeafValue::Number(x));
        self.y = Some(LeafValue::Number(y));
        self
    }

    /// Coerced value.
    pub fn value(&self) -> f64 {
        self.value.as_f64()
    }

    /// Coerced x coordinate (`NaN` when absent).
    pub fn x(&self) -> f64 {
        self.x.as_ref().map_or(f64::NAN, LeafValue::as_f64)
    }

    /// Coerced y coordinate (`NaN` when absent).
    pub fn y(&self) -> f64 {
        self.y.as_ref().map_or(f64::NAN, LeafValue::as_f64)
    }

    fn from_json(value: &Value) -> Result<Self, ChartError> {
        let Value::Object(map) = value else {
            return Err(ChartError::malformed(
                "datum object",
                format!("found {}", type_name(value)),
            ));
        };
        Ok(Self {
            key: key_text(map.get("key")),
            value: LeafValue::from_json(map.get("value")),
            x: map.get("x").map(|v| LeafValue::from_json(Some(v))),
            y: map.get("y").map(|v| LeafValue::from_json(Some(v))),
        })
    }
}

/// A named, ordered list of data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// Series key (group name).
    #[serde(default)]
    pub key: String,
    /// Data in order.
    pub values: Vec<Datum>,
}

impl Series {
    /// Creates a series.
    pub fn new(key: impl Into<String>, values: Vec<Datum>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Creates a series from `(category, value)` pairs.
    pub fn from_pairs<'a>(
        key: impl Into<String>,
        pairs: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> Self {
        Self::new(
            key,
            pairs.into_iter().map(|(k, v)| Datum::new(k, v)).collect(),
        )
    }

    /// Sum of coerced values (`NaN` propagates).
    pub fn total(&self) -> f64 {
        self.values.iter().map(Datum::value).sum()
    }

    fn from_json(value: &Value) -> Result<Self, ChartError> {
        let Value::Object(map) = value else {
            return Err(ChartError::malformed(
                "series object with a `values` array",
                format!("found {}", type_name(value)),
            ));
        };
        let Some(Value::Array(values)) = map.get("values") else {
            return Err(ChartError::malformed(
                "series object with a `values` array",
                format!("series {:?} has no `values` array", key_text(map.get("key"))),
            ));
        };
        Ok(Self {
            key: key_text(map.get("key")),
            values: values
                .iter()
                .map(Datum::from_json)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Input to every series component: one series or several.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged, try_from = "Value")]
pub enum SeriesInput {
    /// A single named series (one level).
    Single(Series),
    /// Several named series (two levels).
    Multi(Vec<Series>),
}

impl SeriesInput {
    /// Parses JSON text.
    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ChartError::malformed("JSON document", e.to_string()))?;
        Self::from_json_value(&value)
    }

    /// Resolves the shape of a parsed JSON value.
    ///
    /// An object is a single series, an array is a list of series; anything else is an error.
    pub fn from_json_value(value: &Value) -> Result<Self, ChartError> {
        match value {
            Value::Object(_) => Series::from_json(value).map(Self::Single),
            Value::Array(items) => items
                .iter()
                .map(Series::from_json)
                .collect::<Result<_, _>>()
                .map(Self::Multi),
            other => Err(ChartError::malformed(
                "series object or array of series",
                format!("found {}", type_name(other)),
            )),
        }
    }

    /// The series, in order. A single series is a one-element slice.
    pub fn series(&self) -> &[Series] {
        match self {
            Self::Single(series) => core::slice::from_ref(series),
            Self::Multi(series) => series,
        }
    }

    /// Whether this is the single-series variant.
    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }
}

impl TryFrom<Value> for SeriesInput {
    type Error = ChartError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json_value(&value)
    }
}

impl From<Series> for SeriesInput {
    fn from(series: Series) -> Self {
        Self::Single(series)
    }
}

impl From<Vec<Series>> for SeriesInput {
    fn from(series: Vec<Series>) -> Self {
        Self::Multi(series)
    }
}

/// One trading period.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Candle {
    /// Period start as unix seconds.
    pub date: f64,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
}

impl Candle {
    /// Whether the period closed above its open.
    pub fn is_up(&self) -> bool {
        self.close > self.open
    }

    fn from_json(value: &Value) -> Result<Self, ChartError> {
        let Value::Object(map) = value else {
            return Err(ChartError::malformed(
                "candle object",
                format!("found {}", type_name(value)),
            ));
        };
        let number = |name: &str| LeafValue::from_json(map.get(name)).as_f64();
        let date = match map.get("date") {
            Some(Value::String(s)) => parse_date(s).unwrap_or(f64::NAN),
            other => LeafValue::from_json(other).as_f64(),
        };
        Ok(Self {
            date,
            open: number("open"),
            high: number("high"),
            low: number("low"),
            close: number("close"),
        })
    }
}

/// A named series of candles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct CandleSeries {
    /// Series key.
    pub key: String,
    /// Candles in date order.
    pub values: Vec<Candle>,
}

impl CandleSeries {
    /// Creates a candle series.
    pub fn new(key: impl Into<String>, values: Vec<Candle>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }

    /// Parses JSON text.
    pub fn from_json(text: &str) -> Result<Self, ChartError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ChartError::malformed("JSON document", e.to_string()))?;
        Self::try_from(value)
    }
}

impl TryFrom<Value> for CandleSeries {
    type Error = ChartError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = &value else {
            return Err(ChartError::malformed(
                "candle series object with a `values` array",
                format!("found {}", type_name(&value)),
            ));
        };
        let Some(Value::Array(values)) = map.get("values") else {
            return Err(ChartError::malformed(
                "candle series object with a `values` array",
                "no `values` array",
            ));
        };
        Ok(Self {
            key: key_text(map.get("key")),
            values: values
                .iter()
                .map(Candle::from_json)
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Borrowed input for a chart body.
#[derive(Clone, Copy, Debug)]
pub enum ChartData<'a> {
    /// Hierarchical series.
    Series(&'a SeriesInput),
    /// Candlestick series.
    Candles(&'a CandleSeries),
}

impl<'a> ChartData<'a> {
    /// The hierarchical series, or an error for candle input.
    pub fn series(self) -> Result<&'a SeriesInput, ChartError> {
        match self {
            Self::Series(input) => Ok(input),
            Self::Candles(_) => Err(ChartError::malformed(
                "hierarchical series",
                "found a candle series",
            )),
        }
    }

    /// The candle series, or an error for hierarchical input.
    pub fn candles(self) -> Result<&'a CandleSeries, ChartError> {
        match self {
            Self::Candles(input) => Ok(input),
            Self::Series(_) => Err(ChartError::malformed(
                "candle series",
                "found hierarchical series",
            )),
        }
    }
}

impl<'a> From<&'a SeriesInput> for ChartData<'a> {
    fn from(input: &'a SeriesInput) -> Self {
        Self::Series(input)
    }
}

impl<'a> From<&'a CandleSeries> for ChartData<'a> {
    fn from(input: &'a CandleSeries) -> Self {
        Self::Candles(input)
    }
}

fn key_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses `YYYY-MM-DD` (optionally followed by a time part, which is ignored) as unix seconds.
pub(crate) fn parse_date(text: &str) -> Option<f64> {
    let date = text.get(..10)?;
    let mut parts = date.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: i64 = parts.next()?.parse().ok()?;
    let day: i64 = parts.next()?.parse().ok()?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }
    let days = days_from_civil(year, month, day);
    Some(days as f64 * 86_400.0)
}

/// Days since 1970-01-01 in the proleptic Gregorian calendar.
pub(crate) fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}
