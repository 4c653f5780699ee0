//! SVG charts for the dashboard widgets
//!
//! Line and bar charts plot one or more [`ChartSeries`] sharing the same
//! labels; the doughnut uses the first series only.

use super::number_format::format_euro;
use contracts::domain::a001_platform::Platform;
use contracts::shared::aggregation::{ChartKind, ChartSeries};
use leptos::prelude::*;
use std::f64::consts::PI;

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 240.0;
const PAD_LEFT: f64 = 48.0;
const PAD_BOTTOM: f64 = 28.0;
const PAD_TOP: f64 = 12.0;
const SINGLE_COLOR: &str = "#6366f1";

fn plot_width() -> f64 {
    WIDTH - PAD_LEFT - 8.0
}

fn plot_height() -> f64 {
    HEIGHT - PAD_TOP - PAD_BOTTOM
}

/// Largest value over every series, never below 1 so flat charts still draw
fn scale_max(series: &[ChartSeries]) -> f64 {
    series
        .iter()
        .map(|s| s.max_value())
        .fold(0.0_f64, f64::max)
        .max(1.0)
}

/// x of the i-th of `n` points, centred in its slot
fn slot_x(i: usize, n: usize) -> f64 {
    let slot = plot_width() / n.max(1) as f64;
    PAD_LEFT + slot * i as f64 + slot / 2.0
}

fn value_y(value: f64, max: f64) -> f64 {
    PAD_TOP + plot_height() * (1.0 - value / max)
}

fn polyline_points(values: &[f64], max: f64) -> String {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{:.1},{:.1}", slot_x(i, values.len()), value_y(*v, max)))
        .collect::<Vec<_>>()
        .join(" ")
}

/// SVG path of one doughnut slice between two angles (radians, 0 = 12 o'clock)
fn arc_path(cx: f64, cy: f64, r_outer: f64, r_inner: f64, start: f64, end: f64) -> String {
    // a full circle cannot be drawn as a single arc
    let end = if end - start >= 2.0 * PI { end - 1e-4 } else { end };
    let point = |r: f64, a: f64| (cx + r * a.sin(), cy - r * a.cos());
    let (x0, y0) = point(r_outer, start);
    let (x1, y1) = point(r_outer, end);
    let (x2, y2) = point(r_inner, end);
    let (x3, y3) = point(r_inner, start);
    let large = if end - start > PI { 1 } else { 0 };
    format!(
        "M {:.2} {:.2} A {r_outer} {r_outer} 0 {large} 1 {:.2} {:.2} L {:.2} {:.2} A {r_inner} {r_inner} 0 {large} 0 {:.2} {:.2} Z",
        x0, y0, x1, y1, x2, y2, x3, y3
    )
}

/// (start, end) angle of every positive value; zero slices are skipped
fn slice_angles(values: &[f64]) -> Vec<(usize, f64, f64)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let mut angle = 0.0;
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.0)
        .map(|(i, v)| {
            let sweep = v / total * 2.0 * PI;
            let slice = (i, angle, angle + sweep);
            angle += sweep;
            slice
        })
        .collect()
}

fn format_metric(value: f64, money: bool) -> String {
    if money {
        format_euro(value)
    } else {
        format!("{}", value.round() as i64)
    }
}

/// Colour of a series: platform accent for named series, the default otherwise
fn series_color(series: &ChartSeries, multi: bool) -> &'static str {
    if multi {
        Platform::color(&series.label)
    } else {
        SINGLE_COLOR
    }
}

fn axis_view(labels: Vec<String>, max: f64, money: bool) -> impl IntoView {
    let n = labels.len();
    // at most ~10 x labels
    let step = (n / 10).max(1);
    let x_labels = labels
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % step == 0)
        .map(|(i, label)| {
            view! {
                <text class="chart__x-label" x=format!("{:.1}", slot_x(i, n)) y=format!("{:.1}", HEIGHT - 8.0) text-anchor="middle">
                    {label}
                </text>
            }
        })
        .collect_view();
    let y_ticks = [0.0, 0.5, 1.0]
        .into_iter()
        .map(|f| {
            let y = value_y(max * f, max);
            view! {
                <line class="chart__grid" x1=format!("{:.1}", PAD_LEFT) x2=format!("{:.1}", WIDTH - 8.0) y1=format!("{:.1}", y) y2=format!("{:.1}", y) />
                <text class="chart__y-label" x=format!("{:.1}", PAD_LEFT - 6.0) y=format!("{:.1}", y + 4.0) text-anchor="end">
                    {format_metric(max * f, money)}
                </text>
            }
        })
        .collect_view();
    view! {
        {y_ticks}
        {x_labels}
    }
}

fn line_view(series: Vec<ChartSeries>, money: bool) -> AnyView {
    let max = scale_max(&series);
    let multi = series.len() > 1;
    let labels = series.first().map(|s| s.labels.clone()).unwrap_or_default();
    let lines = series
        .into_iter()
        .map(|s| {
            let color = series_color(&s, multi);
            let points = polyline_points(&s.values, max);
            let n = s.values.len();
            let dots = s
                .values
                .iter()
                .zip(s.labels.iter())
                .enumerate()
                .map(|(i, (v, label))| {
                    let tip = format!("{} {}: {}", s.label, label, format_metric(*v, money));
                    view! {
                        <circle cx=format!("{:.1}", slot_x(i, n)) cy=format!("{:.1}", value_y(*v, max)) r="3" fill=color>
                            <title>{tip}</title>
                        </circle>
                    }
                })
                .collect_view();
            view! {
                <polyline class="chart__line" points=points fill="none" stroke=color stroke-width="2" />
                {dots}
            }
        })
        .collect_view();
    view! {
        <svg class="chart chart--line" viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)>
            {axis_view(labels, max, money)}
            {lines}
        </svg>
    }
    .into_any()
}

fn bar_view(series: Vec<ChartSeries>, money: bool) -> AnyView {
    let max = scale_max(&series);
    let multi = series.len() > 1;
    let labels = series.first().map(|s| s.labels.clone()).unwrap_or_default();
    let n = labels.len().max(1);
    let group = series.len().max(1);
    let slot = plot_width() / n as f64;
    let bar_width = (slot * 0.8) / group as f64;
    let bars = series
        .into_iter()
        .enumerate()
        .map(|(k, s)| {
            let color = series_color(&s, multi);
            s.values
                .iter()
                .zip(s.labels.iter())
                .enumerate()
                .map(|(i, (v, label))| {
                    let x = PAD_LEFT + slot * i as f64 + slot * 0.1 + bar_width * k as f64;
                    let y = value_y(*v, max);
                    let tip = format!("{} {}: {}", s.label, label, format_metric(*v, money));
                    view! {
                        <rect
                            class="chart__bar"
                            x=format!("{:.1}", x)
                            y=format!("{:.1}", y)
                            width=format!("{:.1}", bar_width)
                            height=format!("{:.1}", PAD_TOP + plot_height() - y)
                            fill=color
                        >
                            <title>{tip}</title>
                        </rect>
                    }
                })
                .collect_view()
        })
        .collect_view();
    view! {
        <svg class="chart chart--bar" viewBox=format!("0 0 {} {}", WIDTH, HEIGHT)>
            {axis_view(labels, max, money)}
            {bars}
        </svg>
    }
    .into_any()
}

fn doughnut_view(series: Vec<ChartSeries>, money: bool) -> AnyView {
    let Some(s) = series.into_iter().next() else {
        return ().into_any();
    };
    let total: f64 = s.values.iter().sum();
    let slices = slice_angles(&s.values)
        .into_iter()
        .map(|(i, start, end)| {
            let label = s.labels.get(i).cloned().unwrap_or_default();
            let color = Platform::color(&label);
            let tip = format!("{}: {}", label, format_metric(s.values[i], money));
            view! {
                <path d=arc_path(120.0, 120.0, 100.0, 60.0, start, end) fill=color>
                    <title>{tip}</title>
                </path>
            }
        })
        .collect_view();
    let legend = s
        .labels
        .iter()
        .zip(s.values.iter())
        .map(|(label, v)| {
            let color = Platform::color(label);
            let text = format!("{}: {}", label, format_metric(*v, money));
            view! {
                <div class="chart__legend-item">
                    <span class="chart__legend-swatch" style=format!("background: {};", color)></span>
                    <span>{text}</span>
                </div>
            }
        })
        .collect_view();
    view! {
        <div class="chart chart--doughnut">
            <svg viewBox="0 0 240 240" width="240" height="240">
                {slices}
                <text x="120" y="126" text-anchor="middle" class="chart__center-label">
                    {format_metric(total, money)}
                </text>
            </svg>
            <div class="chart__legend">{legend}</div>
        </div>
    }
    .into_any()
}

/// Chart over one or more series; `money` formats values as euro
#[component]
pub fn Chart(
    #[prop(into)] kind: Signal<ChartKind>,
    #[prop(into)] series: Signal<Vec<ChartSeries>>,
    #[prop(optional)] money: bool,
) -> impl IntoView {
    move || {
        let series = series.get();
        match kind.get() {
            ChartKind::Line => line_view(series, money),
            ChartKind::Bar => bar_view(series, money),
            ChartKind::Doughnut => doughnut_view(series, money),
        }
    }
}
