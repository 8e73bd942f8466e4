// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Colour palettes: fixed catalogs, sequential ramps and luminosity shifts.

use peniko::Color;

use crate::error::ChartError;

const CATEGORICAL: [[&str; 9]; 3] = [
    [
        "#5da5da", "#faa43a", "#60bd68", "#f17cb0", "#b2912f", "#b276b2", "#decf3f", "#f15854",
        "#4d4d4d",
    ],
    [
        "#fbb4ae", "#b3cde3", "#ccebc5", "#decbe4", "#fed9a6", "#ffffcc", "#e5d8bd", "#fddaec",
        "#f2f2f2",
    ],
    [
        "#3f51b5", "#ff9800", "#8bc34a", "#9c27b0", "#ffeb3b", "#03a9f4", "#f44336", "#009688",
        "#795548",
    ],
];

const DIVERGING: [[&str; 9]; 3] = [
    [
        "#8c510a", "#bf812d", "#dfc27d", "#f6e8c3", "#f5f5f5", "#c7eae5", "#80cdc1", "#35978f",
        "#01665e",
    ],
    [
        "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b", "#a6d96a", "#66bd63",
        "#1a9850",
    ],
    [
        "#0000ff", "#8052fe", "#b58bfb", "#ddc5f7", "#fffff0", "#ffcfb4", "#ff9e7a", "#ff6842",
        "#ff0000",
    ],
];

/// Luminosity step between adjacent colours of a sequential ramp.
const LUM_STEP: f64 = 0.1;

fn catalog(kind: &'static str, table: &[[&str; 9]; 3], id: u8) -> Result<Vec<Color>, ChartError> {
    let row = usize::from(id)
        .checked_sub(1)
        .and_then(|i| table.get(i))
        .ok_or(ChartError::UnknownPalette { kind, id })?;
    row.iter().map(|hex| parse_hex(hex)).collect()
}

/// Nine-colour categorical palette `1..=3`.
pub fn categorical(id: u8) -> Result<Vec<Color>, ChartError> {
    catalog("categorical", &CATEGORICAL, id)
}

/// Nine-colour diverging palette `1..=3`.
pub fn diverging(id: u8) -> Result<Vec<Color>, ChartError> {
    catalog("diverging", &DIVERGING, id)
}

/// A ramp of `count` shades around `seed`, dark to light.
pub fn sequential(seed: &str, count: usize) -> Result<Vec<Color>, ChartError> {
    let base = parse_hex(seed)?;
    let lum_max = LUM_STEP * count as f64 / 2.0;
    Ok((1..=count)
        .map(|step| {
            // Linear map of `1..=count` onto `[-lum_max, lum_max]`; one step sits on the lower end.
            let lum = if count > 1 {
                -lum_max + (step - 1) as f64 / (count - 1) as f64 * 2.0 * lum_max
            } else {
                -lum_max
            };
            shift(base, lum)
        })
        .collect())
}

/// Shifts each colour's luminosity by `amount` (`-0.2` darkens by 20%). Alpha is kept.
pub fn lum_shift(colors: &[Color], amount: f64) -> Vec<Color> {
    colors.iter().map(|&c| shift(c, amount)).collect()
}

fn shift(color: Color, lum: f64) -> Color {
    let rgba = color.to_rgba8();
    let channel = |c: u8| -> u8 {
        let c = f64::from(c);
        let v = (c + c * lum).clamp(0.0, 255.0).round();
        #[allow(clippy::cast_possible_truncation, reason = "clamped to the u8 range")]
        {
            v as u8
        }
    };
    Color::from_rgba8(channel(rgba.r), channel(rgba.g), channel(rgba.b), rgba.a)
}

/// Parses `#rgb`, `#rrggbb`, `rgb` or `rrggbb`.
pub fn parse_hex(text: &str) -> Result<Color, ChartError> {
    let invalid = || ChartError::InvalidHex(text.to_owned());
    let digits = text.strip_prefix('#').unwrap_or(text);
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        6 => digits.to_owned(),
        _ => return Err(invalid()),
    };
    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
    Ok(Color::from_rgb8(byte(0)?, byte(2)?, byte(4)?))
}

/// Formats a colour as lowercase `#rrggbb`.
pub fn to_hex(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}
