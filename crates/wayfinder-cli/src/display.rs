//! Human-readable output for routes and graph reports
//!
//! Colors use crossterm's ANSI styling and are applied only when the caller
//! asks for them.

use crossterm::style::{Color, Stylize};
use wayfinder::editor::GraphReport;
use wayfinder::navigator::Waypoint;
use wayfinder::Route;

fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        format!("{}", text.with(color))
    } else {
        text.to_string()
    }
}

/// Render a route as a numbered list of waypoints
///
/// ```text
/// Route main_gate -> library (1 hop, distance 120)
///   1. main_gate  Main Gate
///   2. library    Library
/// ```
pub fn format_route(route: &Route, color: bool) -> String {
    let hops = route.hops();
    let mut out = format!(
        "Route {} -> {} ({} {}, distance {})\n",
        paint(route.start().unwrap_or_default(), Color::Cyan, color),
        paint(route.end().unwrap_or_default(), Color::Cyan, color),
        hops,
        if hops == 1 { "hop" } else { "hops" },
        paint(&route.distance.to_string(), Color::Yellow, color),
    );

    let width = route.path.iter().map(|id| id.len()).max().unwrap_or(0);
    let index_width = route.path.len().to_string().len();
    for (i, (id, record)) in route.path.iter().zip(&route.nodes).enumerate() {
        let padded = format!("{:<width$}", id, width = width);
        let line = match record.name() {
            Some(name) => format!(
                "  {:>iw$}. {}  {}",
                i + 1,
                paint(&padded, Color::Cyan, color),
                name,
                iw = index_width
            ),
            None => format!(
                "  {:>iw$}. {}",
                i + 1,
                paint(id, Color::Cyan, color),
                iw = index_width
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Render waypoints one per line as `id<TAB>name`
pub fn format_waypoints(waypoints: &[Waypoint]) -> String {
    waypoints
        .iter()
        .map(|w| match &w.name {
            Some(name) => format!("{}\t{}\n", w.id, name),
            None => format!("{}\n", w.id),
        })
        .collect()
}

/// Render a graph report as a list of findings
pub fn format_report(name: &str, report: &GraphReport, color: bool) -> String {
    if report.is_clean() {
        return format!("{} {}\n", paint("✓", Color::Green, color), name);
    }

    let mut out = String::new();
    let mark = if report.has_errors() {
        paint("✗", Color::Red, color)
    } else {
        paint("!", Color::Yellow, color)
    };
    out.push_str(&format!("{} {}\n", mark, name));

    for (from, to, weight) in &report.negative_weights {
        out.push_str(&format!("  negative weight {} on {} -> {}\n", weight, from, to));
    }
    for (from, to) in &report.dangling_edges {
        out.push_str(&format!("  edge {} -> {} targets a missing node\n", from, to));
    }
    for source in &report.unknown_sources {
        out.push_str(&format!("  edges listed for missing node {}\n", source));
    }
    for (from, to) in &report.one_way_edges {
        out.push_str(&format!("  one-way edge {} -> {}\n", from, to));
    }
    out
}
