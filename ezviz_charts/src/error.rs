// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors raised by chart components.

use crate::scale::ScaleKind;

/// Everything that can abort a render pass or a configuration call.
///
/// Missing optional fields in input data are not errors; they render as coercion artifacts.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ChartError {
    /// A required container is absent, or the top-level value has the wrong type.
    #[error("Malformed input: expected {expected} ({detail})")]
    MalformedInput {
        /// The shape that was expected.
        expected: &'static str,
        /// What was found instead.
        detail: String,
    },

    /// A palette id outside the catalog.
    #[error("Unknown {kind} palette id {id}")]
    UnknownPalette {
        /// Catalog name (`categorical` or `diverging`).
        kind: &'static str,
        /// Requested id.
        id: u8,
    },

    /// A colour string that is not 3- or 6-digit hex.
    #[error("Invalid hex colour: {0:?}")]
    InvalidHex(String),

    /// A supplied scale of the wrong kind for the slot it was given to.
    #[error("Scale mismatch: expected {expected:?}, found {found:?}")]
    ScaleMismatch {
        /// Kind the slot accepts.
        expected: ScaleKind,
        /// Kind that was supplied.
        found: ScaleKind,
    },

    /// A colour range with no colours.
    #[error("Empty range")]
    EmptyRange,

    /// A chart name missing from a registry.
    #[error("Unknown chart type: {0}")]
    UnknownChart(String),
}

impl ChartError {
    pub(crate) fn malformed(expected: &'static str, detail: impl Into<String>) -> Self {
        Self::MalformedInput {
            expected,
            detail: detail.into(),
        }
    }
}
