// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape normalization: descriptive statistics every component derives its scales from.

use indexmap::{IndexMap, IndexSet};

use crate::data::{Series, SeriesInput};

/// Number of levels in the input hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Levels {
    /// One series of data.
    Single,
    /// Several series of data.
    Multi,
}

/// Statistics derived from one [`SeriesInput`].
///
/// Recomputed from scratch on every render pass; never mutated.
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedStatistics {
    /// Hierarchy depth.
    pub levels: Levels,
    /// The series key of single-level input.
    pub group_name: Option<String>,
    /// Series keys in order (multi-level input only).
    pub group_names: Vec<String>,
    /// Union of category keys, in order of first sighting.
    pub category_names: Vec<String>,
    /// Sum of each series' values (multi-level input only).
    pub group_totals: IndexMap<String, f64>,
    /// Largest series sum (multi-level input only).
    pub group_totals_max: Option<f64>,
    /// Sum of each category's values across series (multi-level input only).
    pub category_totals: IndexMap<String, f64>,
    /// Largest category sum (multi-level input only).
    pub category_totals_max: Option<f64>,
    /// Sum of all values (single-level input only).
    pub category_total: Option<f64>,
    /// Smallest value, `None` when there are no values.
    pub min_value: Option<f64>,
    /// Largest value, `None` when there are no values.
    pub max_value: Option<f64>,
    /// Most fractional digits written in any value (multi-level input only, else 0).
    pub max_decimal_place: u32,
    /// Break points at 15%, 40%, 55% and 90% of `[min, max]`.
    pub thresholds: Vec<f64>,
}

const THRESHOLD_FRACTIONS: [f64; 4] = [0.15, 0.40, 0.55, 0.90];

impl DerivedStatistics {
    /// Derives statistics from `input`.
    pub fn from_input(input: &SeriesInput) -> Self {
        let (levels, group_name) = match input {
            SeriesInput::Single(series) => (Levels::Single, Some(series.key.clone())),
            SeriesInput::Multi(_) => (Levels::Multi, None),
        };
        let all = input.series();

        let mut categories: IndexSet<String> = IndexSet::new();
        let mut group_totals: IndexMap<String, f64> = IndexMap::new();
        let mut category_totals: IndexMap<String, f64> = IndexMap::new();
        let mut extrema = Extrema::default();
        let mut max_decimal_place = 0;

        for series in all {
            for datum in &series.values {
                let value = datum.value();
                categories.insert(datum.key.clone());
                extrema.push(value);
                if levels == Levels::Multi {
                    *group_totals.entry(series.key.clone()).or_insert(0.0) += value;
                    *category_totals.entry(datum.key.clone()).or_insert(0.0) += value;
                    max_decimal_place = max_decimal_place.max(decimal_places(&datum.value.text()));
                }
            }
        }

        let (group_names, category_total) = match levels {
            Levels::Single => (Vec::new(), all.first().map(Series::total)),
            Levels::Multi => (all.iter().map(|s| s.key.clone()).collect(), None),
        };
        let (group_totals_max, category_totals_max) = match levels {
            Levels::Single => (None, None),
            Levels::Multi => (
                nan_skipping_max(group_totals.values().copied()),
                nan_skipping_max(category_totals.values().copied()),
            ),
        };

        let (min_value, max_value) = extrema.finish();
        let thresholds = match (min_value, max_value) {
            (Some(min), Some(max)) => THRESHOLD_FRACTIONS
                .iter()
                .map(|f| round_to(min + f * (max - min), max_decimal_place))
                .collect(),
            _ => Vec::new(),
        };

        tracing::trace!(
            ?levels,
            categories = categories.len(),
            ?min_value,
            ?max_value,
            max_decimal_place,
            "derived statistics"
        );

        Self {
            levels,
            group_name,
            group_names,
            category_names: categories.into_iter().collect(),
            group_totals,
            group_totals_max,
            category_totals,
            category_totals_max,
            category_total,
            min_value,
            max_value,
            max_decimal_place,
            thresholds,
        }
    }

    /// `max_value`, or 0 when there are no values.
    pub fn max_or_zero(&self) -> f64 {
        self.max_value.unwrap_or(0.0)
    }

    /// `min_value`, or 0 when there are no values.
    pub fn min_or_zero(&self) -> f64 {
        self.min_value.unwrap_or(0.0)
    }
}

/// Minimum and maximum that skip `NaN`, but remember that a leaf was seen.
#[derive(Default)]
struct Extrema {
    seen: bool,
    min: Option<f64>,
    max: Option<f64>,
}

impl Extrema {
    fn push(&mut self, value: f64) {
        self.seen = true;
        if value.is_nan() {
            return;
        }
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    fn finish(self) -> (Option<f64>, Option<f64>) {
        if !self.seen {
            return (None, None);
        }
        (
            Some(self.min.unwrap_or(f64::NAN)),
            Some(self.max.unwrap_or(f64::NAN)),
        )
    }
}

fn nan_skipping_max(values: impl Iterator<Item = f64>) -> Option<f64> {
    values
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))))
}

/// Fractional digits written in `text`, less any exponent, floored at zero.
///
/// `"1.25"` has 2, `"1e-7"` has 7, `"1.5e3"` has 0, and text without a trailing numeric
/// fraction has 0.
pub fn decimal_places(text: &str) -> u32 {
    let (mantissa, exponent) = match text.rfind(['e', 'E']) {
        Some(at) if is_exponent(&text[at + 1..]) => {
            (&text[..at], text[at + 1..].parse::<i64>().unwrap_or(0))
        }
        _ => (text, 0),
    };
    let fraction = match mantissa.rfind('.') {
        Some(at) => {
            let digits = &mantissa[at + 1..];
            if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
                i64::try_from(digits.len()).unwrap_or(i64::MAX)
            } else {
                0
            }
        }
        None => 0,
    };
    u32::try_from(fraction.saturating_sub(exponent).max(0)).unwrap_or(u32::MAX)
}

fn is_exponent(text: &str) -> bool {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Rounds to `places` fractional digits, like fixed-precision formatting.
pub fn round_to(value: f64, places: u32) -> f64 {
    if places > 15 || !value.is_finite() {
        return value;
    }
    let factor = 10_f64.powi(i32::try_from(places).unwrap_or(0));
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use serde_json::json;

    use super::*;
    use crate::data::Datum;

    fn multi() -> SeriesInput {
        SeriesInput::Multi(vec![
            Series::from_pairs("A", [("x", 1.0), ("y", 2.0)]),
            Series::from_pairs("B", [("x", 3.0), ("z", 4.0)]),
        ])
    }

    #[test]
    fn multi_level_worked_example() {
        let stats = DerivedStatistics::from_input(&multi());
        assert_eq!(stats.levels, Levels::Multi);
        assert_eq!(stats.category_names, ["x", "y", "z"]);
        assert_eq!(stats.group_names, ["A", "B"]);
        assert_eq!(stats.group_totals.get("A"), Some(&3.0));
        assert_eq!(stats.group_totals.get("B"), Some(&7.0));
        assert_eq!(stats.group_totals_max, Some(7.0));
        assert_eq!(stats.category_totals.get("x"), Some(&4.0));
        assert_eq!(stats.category_totals.get("y"), Some(&2.0));
        assert_eq!(stats.category_totals.get("z"), Some(&4.0));
        assert_eq!(stats.category_totals_max, Some(4.0));
        assert_eq!(stats.min_value, Some(1.0));
        assert_eq!(stats.max_value, Some(4.0));
        assert_eq!(stats.category_total, None);
    }

    #[test]
    fn single_level_worked_example() {
        let input = SeriesInput::Single(Series::from_pairs("G", [("a", 5.0), ("b", 10.0)]));
        let stats = DerivedStatistics::from_input(&input);
        assert_eq!(stats.levels, Levels::Single);
        assert_eq!(stats.group_name.as_deref(), Some("G"));
        assert_eq!(stats.category_total, Some(15.0));
        assert_eq!(stats.min_value, Some(5.0));
        assert_eq!(stats.max_value, Some(10.0));
        assert_eq!(stats.max_decimal_place, 0);
        assert!(stats.group_names.is_empty());
    }

    #[test]
    fn category_union_keeps_first_sighting_order() {
        let input = SeriesInput::Multi(vec![
            Series::from_pairs("A", [("b", 1.0), ("a", 1.0)]),
            Series::from_pairs("B", [("c", 1.0), ("a", 1.0), ("d", 1.0)]),
        ]);
        let stats = DerivedStatistics::from_input(&input);
        assert_eq!(stats.category_names, ["b", "a", "c", "d"]);
    }

    #[test]
    fn thresholds_are_ordered_and_rounded() {
        let input = SeriesInput::Multi(vec![Series::new(
            "A",
            vec![Datum::new("x", "0.25"), Datum::new("y", 8.25)],
        )]);
        let stats = DerivedStatistics::from_input(&input);
        assert_eq!(stats.max_decimal_place, 2);
        assert_eq!(stats.thresholds.len(), 4);
        assert_approx_eq!(f64, stats.thresholds[0], 1.45, epsilon = 1e-9);
        assert_approx_eq!(f64, stats.thresholds[3], 7.45, epsilon = 1e-9);
        assert!(stats.thresholds.windows(2).all(|w| w[0] <= w[1]));
        assert!(stats.thresholds.iter().all(|t| (0.25..=8.25).contains(t)));
    }

    #[test]
    fn single_level_thresholds_use_zero_places() {
        let input = SeriesInput::Single(Series::from_pairs("G", [("a", 0.5), ("b", 2.5)]));
        let stats = DerivedStatistics::from_input(&input);
        // 0.5 + 0.15 * 2 = 0.8 rounds to 1 with no fractional digits.
        assert_eq!(stats.thresholds[0], 1.0);

        // Whole-number rounding can push every break point above a narrow range.
        let input = SeriesInput::Single(Series::from_pairs("G", [("a", 0.5), ("b", 0.6)]));
        let stats = DerivedStatistics::from_input(&input);
        assert_eq!(stats.thresholds, [1.0, 1.0, 1.0, 1.0]);
        assert!(stats.thresholds.iter().all(|t| *t > 0.6));
    }

    #[test]
    fn empty_input_has_no_extrema() {
        let stats = DerivedStatistics::from_input(&SeriesInput::Multi(Vec::new()));
        assert_eq!(stats.min_value, None);
        assert_eq!(stats.max_value, None);
        assert!(stats.thresholds.is_empty());
        assert_eq!(stats.group_totals_max, None);
    }

    #[test]
    fn nan_leaves_are_skipped_by_extrema_but_not_sums() {
        let Ok(input) = SeriesInput::from_json_value(&json!([
            { "key": "A", "values": [{ "key": "x", "value": "n/a" }, { "key": "y", "value": 3 }] }
        ])) else {
            panic!("input should parse");
        };
        let stats = DerivedStatistics::from_input(&input);
        assert_eq!(stats.min_value, Some(3.0));
        assert_eq!(stats.max_value, Some(3.0));
        assert!(stats.group_totals.get("A").is_some_and(|t| t.is_nan()));

        let Ok(input) = SeriesInput::from_json_value(&json!({
            "key": "S", "values": [{ "key": "x" }]
        })) else {
            panic!("input should parse");
        };
        let stats = DerivedStatistics::from_input(&input);
        assert!(stats.min_value.is_some_and(f64::is_nan));
    }

    #[test]
    fn decimal_places_follow_written_form() {
        assert_eq!(decimal_places("1.25"), 2);
        assert_eq!(decimal_places("1e-7"), 7);
        assert_eq!(decimal_places("1.5e3"), 0);
        assert_eq!(decimal_places("1.5E-2"), 3);
        assert_eq!(decimal_places("12"), 0);
        assert_eq!(decimal_places("12.5abc"), 0);
        assert_eq!(decimal_places("1."), 0);
    }
}
