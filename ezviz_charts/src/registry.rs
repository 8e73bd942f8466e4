// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Name-keyed chart body factories.

use indexmap::IndexMap;

use crate::bar_charts::{BarChartCircular, BarChartClustered, BarChartStacked, BarChartVertical};
use crate::chart::{Chart, ChartBody};
use crate::error::ChartError;
use crate::grid_charts::{HeatMapTable, PunchCard};
use crate::radial_charts::{DonutChart, HeatMapRadial, PolarAreaChart, RoseChart};
use crate::xy_charts::{BubbleChart, CandlestickChart, LineChartBody};

/// Builds a fresh chart body.
pub type ChartFactory = fn() -> Box<dyn ChartBody>;

/// Chart bodies by name, in registration order.
///
/// Registries are plain values: an application builds one, adds its own bodies and passes it
/// to whatever needs to create charts by name.
#[derive(Clone, Debug, Default)]
pub struct ChartRegistry {
    factories: IndexMap<&'static str, ChartFactory>,
}

fn boxed<B: ChartBody + Default + 'static>() -> Box<dyn ChartBody> {
    Box::new(B::default())
}

impl ChartRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every chart body in this crate.
    pub fn with_builtin() -> Self {
        let builtin: [(&'static str, ChartFactory); 13] = [
            ("barChartVertical", boxed::<BarChartVertical>),
            ("barChartClustered", boxed::<BarChartClustered>),
            ("barChartStacked", boxed::<BarChartStacked>),
            ("barChartCircular", boxed::<BarChartCircular>),
            ("donutChart", boxed::<DonutChart>),
            ("bubbleChart", boxed::<BubbleChart>),
            ("candlestickChart", boxed::<CandlestickChart>),
            ("heatMapTable", boxed::<HeatMapTable>),
            ("heatMapRadial", boxed::<HeatMapRadial>),
            ("lineChart", boxed::<LineChartBody>),
            ("polarAreaChart", boxed::<PolarAreaChart>),
            ("roseChart", boxed::<RoseChart>),
            ("punchCard", boxed::<PunchCard>),
        ];
        let mut registry = Self::new();
        for (name, factory) in builtin {
            registry.register(name, factory);
        }
        registry
    }

    /// Adds or replaces the factory for `name`; returns the one it replaced.
    pub fn register(&mut self, name: &'static str, factory: ChartFactory) -> Option<ChartFactory> {
        let replaced = self.factories.insert(name, factory);
        if replaced.is_some() {
            tracing::warn!(name, "chart factory replaced");
        }
        replaced
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// A new body for `name`.
    pub fn create(&self, name: &str) -> Result<Box<dyn ChartBody>, ChartError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| ChartError::UnknownChart(name.to_owned()))
    }

    /// A new chart hosting the body for `name`.
    pub fn chart(&self, name: &str) -> Result<Chart, ChartError> {
        self.create(name).map(Chart::from_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_match_their_bodies() {
        let registry = ChartRegistry::with_builtin();
        assert_eq!(registry.names().count(), 13);
        for name in registry.names() {
            let Ok(body) = registry.create(name) else {
                panic!("{name} is registered");
            };
            assert_eq!(body.name(), name);
        }
    }

    #[test]
    fn unknown_names_are_errors() {
        let registry = ChartRegistry::new();
        assert!(!registry.contains("barChartVertical"));
        assert!(matches!(
            registry.create("pieChart"),
            Err(ChartError::UnknownChart(name)) if name == "pieChart"
        ));
    }

    #[test]
    fn applications_can_override_builtins() {
        fn custom() -> Box<dyn ChartBody> {
            Box::new(BarChartVertical::new().with_y_axis_label("Custom"))
        }
        let mut registry = ChartRegistry::with_builtin();
        assert!(registry.register("barChartVertical", custom).is_some());
        assert_eq!(registry.names().count(), 13);
        assert!(registry.register("myChart", custom).is_none());
        assert_eq!(registry.names().last(), Some("myChart"));
    }
}
