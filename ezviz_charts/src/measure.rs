// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for guide layout.
//!
//! Marks store unshaped strings, so guides that need text extents (legend boxes, axis margins)
//! ask a measurer for a rough estimate.

/// Estimates the extent of a run of text.
pub trait TextMeasurer {
    /// Returns `(width, height)` in canvas units.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Assumes an average glyph width of 0.6em and a line height of 1em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        let width = 0.6 * font_size * text.chars().count() as f64;
        (width, font_size)
    }
}

/// Width of the widest of `texts`.
pub(crate) fn widest<'a>(
    measurer: &dyn TextMeasurer,
    texts: impl IntoIterator<Item = &'a str>,
    font_size: f64,
) -> f64 {
    texts
        .into_iter()
        .map(|t| measurer.measure(t, font_size).0)
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_counts_chars_not_bytes() {
        let m = HeuristicTextMeasurer;
        assert_eq!(m.measure("ab", 10.0), (12.0, 10.0));
        assert_eq!(m.measure("éé", 10.0), (12.0, 10.0));
        assert_eq!(widest(&m, ["a", "abc", ""], 10.0), 18.0);
    }
}
