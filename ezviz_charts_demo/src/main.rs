// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renders every built-in chart to an HTML report of SVG frames.
//!
//! Each chart is rendered twice onto the same canvas: the second data set arrives at `t = 1`
//! and the report shows the transition sampled at a few instants after it.

mod html;

use ezviz_charts::{CandleSeries, Chart, ChartOptions, ChartRegistry, SeriesInput, TitleOptions};
use ezviz_core::{Canvas, EventKind};
use serde_json::{Value, json};

/// Instants (seconds) at which each chart is sampled after the second render.
const FRAME_TIMES: [f64; 3] = [1.1, 1.25, 2.0];

type DemoResult<T> = Result<T, Box<dyn std::error::Error>>;

/// The two data sets a chart is shown with.
enum DemoData {
    Series(SeriesInput, SeriesInput),
    Candles(CandleSeries, CandleSeries),
}

fn fruit(apples: f64, extra: bool) -> Value {
    let mut values = vec![
        json!({ "key": "Apples", "value": apples }),
        json!({ "key": "Oranges", "value": 6 }),
        json!({ "key": "Pears", "value": 4.5 }),
        json!({ "key": "Bananas", "value": 8 }),
    ];
    if extra {
        values.push(json!({ "key": "Kiwis", "value": 3 }));
    }
    json!({ "key": "Fruit", "values": values })
}

fn sales(shift: f64) -> Value {
    let day = |key: &str, base: [f64; 4]| {
        json!({
            "key": key,
            "values": [
                { "key": "Q1", "value": base[0] + shift, "x": base[0], "y": base[1] },
                { "key": "Q2", "value": base[1], "x": base[1] + shift, "y": base[2] },
                { "key": "Q3", "value": base[2], "x": base[2], "y": base[3] + shift },
                { "key": "Q4", "value": base[3] + shift / 2.0, "x": base[3], "y": base[0] }
            ]
        })
    };
    json!([
        day("North", [12.0, 9.0, 14.0, 7.0]),
        day("South", [5.0, 11.0, 8.0, 13.0]),
        day("East", [9.0, 6.0, 10.0, 12.0]),
    ])
}

fn prices(shift: f64) -> Value {
    let series = |key: &str, start: f64| {
        let values: Vec<Value> = (0..10_u32)
            .map(|i| {
                let v = start + f64::from(i) * 1.5 + if i % 3 == 0 { shift } else { 0.0 };
                json!({ "key": format!("2024-03-{:02}", i + 1), "value": v })
            })
            .collect();
        json!({ "key": key, "values": values })
    };
    json!([series("Alpha", 10.0), series("Beta", 14.0)])
}

fn candles(shift: f64) -> Value {
    let values: Vec<Value> = (0..12_u32)
        .map(|i| {
            let open = 20.0 + f64::from(i % 5) * 2.0;
            let close = open + if i % 2 == 0 { 3.0 + shift } else { -2.5 };
            json!({
                "date": format!("2024-05-{:02}", i + 1),
                "open": open,
                "high": open.max(close) + 1.5,
                "low": open.min(close) - 1.0,
                "close": close
            })
        })
        .collect();
    json!({ "key": "ACME", "values": values })
}

fn demo_data(name: &str) -> DemoResult<DemoData> {
    let series = |a: Value, b: Value| -> DemoResult<DemoData> {
        Ok(DemoData::Series(
            SeriesInput::try_from(a)?,
            SeriesInput::try_from(b)?,
        ))
    };
    match name {
        "barChartVertical" | "donutChart" | "polarAreaChart" => {
            series(fruit(9.0, false), fruit(3.0, true))
        }
        "lineChart" => series(prices(0.0), prices(6.0)),
        "candlestickChart" => Ok(DemoData::Candles(
            CandleSeries::try_from(candles(0.0))?,
            CandleSeries::try_from(candles(2.0))?,
        )),
        _ => series(sales(0.0), sales(5.0)),
    }
}

fn render_section(registry: &ChartRegistry, name: &str) -> DemoResult<html::HtmlSection> {
    let options = ChartOptions {
        width: 560.0,
        height: 360.0,
        title: Some(TitleOptions {
            main_text: name.to_owned(),
            sub_text: Some("initial data, then an update at t = 1".to_owned()),
        }),
        ..ChartOptions::default()
    };
    let mut chart: Chart = registry.chart(name)?.with_options(options);
    chart.on(EventKind::ValueClick, |_, datum| {
        tracing::info!(key = %datum.key, value = datum.value, "value clicked");
    });

    let mut canvas = Canvas::new(560.0, 360.0);
    let mut frames = Vec::new();
    match demo_data(name)? {
        DemoData::Series(first, second) => {
            chart.render(&mut canvas, &first, 0.0)?;
            frames.push(canvas.to_svg(1.0));
            chart.render(&mut canvas, &second, 1.0)?;
        }
        DemoData::Candles(first, second) => {
            chart.render(&mut canvas, &first, 0.0)?;
            frames.push(canvas.to_svg(1.0));
            chart.render(&mut canvas, &second, 1.0)?;
        }
    }
    for now in FRAME_TIMES {
        frames.push(canvas.to_svg(now));
    }

    Ok(html::HtmlSection {
        title: name.to_owned(),
        description: format!(
            "Settled first pass, then the second pass sampled at t = {FRAME_TIMES:?}."
        ),
        frames,
    })
}

fn main() -> DemoResult<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .without_time()
        .init();

    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "ezviz_charts_demo.html".to_owned());
    let registry = ChartRegistry::with_builtin();
    let mut sections = Vec::new();
    for name in registry.names() {
        match render_section(&registry, name) {
            Ok(section) => sections.push(section),
            Err(err) => tracing::warn!(chart = name, %err, "chart failed to render"),
        }
    }

    let html = html::render_report("ezviz charts demo", &sections);
    std::fs::write(&out, html)?;
    tracing::info!(path = %out, charts = sections.len(), "wrote report");
    Ok(())
}
