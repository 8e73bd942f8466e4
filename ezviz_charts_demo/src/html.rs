// Copyright 2025 the ezviz Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single-page HTML report of rendered charts.

use std::fmt::Write as _;

/// One titled block of the report.
#[derive(Clone, Debug)]
pub(crate) struct HtmlSection {
    pub(crate) title: String,
    pub(crate) description: String,
    /// Inline SVG documents, shown side by side.
    pub(crate) frames: Vec<String>,
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn render_report(title: &str, sections: &[HtmlSection]) -> String {
    let mut out = String::new();
    let title = escape(title);
    let _ = writeln!(out, "<!doctype html>");
    let _ = writeln!(out, "<html><head><meta charset=\"utf-8\"><title>{title}</title>");
    let _ = writeln!(
        out,
        "<style>body{{font-family:sans-serif;margin:2em}}\
         .frames{{display:flex;flex-wrap:wrap;gap:1em}}\
         .frames svg{{border:1px solid #ddd}}</style></head><body>"
    );
    let _ = writeln!(out, "<h1>{title}</h1>");
    for section in sections {
        let _ = writeln!(out, "<section><h2>{}</h2>", escape(&section.title));
        let _ = writeln!(out, "<p>{}</p>", escape(&section.description));
        let _ = writeln!(out, "<div class=\"frames\">");
        for frame in &section.frames {
            let _ = writeln!(out, "{frame}");
        }
        let _ = writeln!(out, "</div></section>");
    }
    let _ = writeln!(out, "</body></html>");
    out
}
