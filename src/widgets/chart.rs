//! Terminal rendering of chart descriptors: bars with `BarChart`, pies on a
//! braille `Canvas` with a legend, line/scatter with `Chart` plus a point cursor
//! whose tooltip is shown under the plot.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Axis, Bar, BarChart, BarGroup, Block, Chart, Dataset, GraphType, Paragraph, Widget, Wrap,
    },
};
use std::f64::consts::TAU;

use crate::charts::{CategoryChart, ChartDescriptor, XyChart};
use crate::config::Theme;

const LEGEND_MIN_WIDTH: u16 = 24;
const TOOLTIP_HEIGHT: u16 = 3;
/// Sampling step of the pie canvas, in unit-circle coordinates.
const PIE_STEP: f64 = 0.02;

pub struct ChartView<'a> {
    chart: &'a ChartDescriptor,
    theme: &'a Theme,
    /// Index into the line/scatter points whose tooltip is shown
    cursor: Option<usize>,
}

impl<'a> ChartView<'a> {
    pub fn new(chart: &'a ChartDescriptor, theme: &'a Theme) -> Self {
        Self {
            chart,
            theme,
            cursor: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Option<usize>) -> Self {
        self.cursor = cursor;
        self
    }
}

impl Widget for ChartView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(self.chart.title())
            .border_style(Style::default().fg(self.theme.get("sidebar_border")));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.chart {
            ChartDescriptor::Bar(c) => render_bar(c, self.theme, inner, buf),
            ChartDescriptor::Pie(c) => render_pie(c, self.theme, inner, buf),
            ChartDescriptor::Line(c) => render_xy(c, true, self.cursor, self.theme, inner, buf),
            ChartDescriptor::Scatter(c) => {
                render_xy(c, false, self.cursor, self.theme, inner, buf)
            }
        }
    }
}

pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}

fn render_bar(chart: &CategoryChart, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let bars: Vec<Bar> = chart
        .segments
        .iter()
        .map(|s| {
            Bar::default()
                .value(s.value.max(0.0).round() as u64)
                .text_value(format_value(s.value))
                .label(Line::from(s.name.clone()))
                .style(Style::default().fg(theme.data_color(&s.color)))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(theme.data_color(&s.color)),
                )
        })
        .collect();

    let n = bars.len().max(1) as u16;
    let bar_width = (area.width / n).saturating_sub(1).clamp(1, 12);
    BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .label_style(Style::default().fg(theme.get("text_primary")))
        .render(area, buf);
}

/// Unit-disc sample points per segment, split by angle in proportion to value.
pub fn pie_slices(chart: &CategoryChart) -> Vec<Vec<(f64, f64)>> {
    let total: f64 = chart.segments.iter().map(|s| s.value.max(0.0)).sum();
    let mut slices = vec![Vec::new(); chart.segments.len()];
    if total <= 0.0 {
        return slices;
    }

    let mut ends = Vec::with_capacity(chart.segments.len());
    let mut acc = 0.0;
    for s in &chart.segments {
        acc += s.value.max(0.0) / total;
        ends.push(acc * TAU);
    }

    let steps = (2.0 / PIE_STEP) as i32;
    for i in 0..=steps {
        for j in 0..=steps {
            let x = -1.0 + f64::from(i) * PIE_STEP;
            let y = -1.0 + f64::from(j) * PIE_STEP;
            if x * x + y * y > 1.0 {
                continue;
            }
            let angle = y.atan2(x).rem_euclid(TAU);
            let index = ends
                .iter()
                .position(|&end| angle < end)
                .unwrap_or(ends.len() - 1);
            slices[index].push((x, y));
        }
    }
    slices
}

fn render_pie(chart: &CategoryChart, theme: &Theme, area: Rect, buf: &mut Buffer) {
    // Terminal cells are about twice as tall as wide.
    let pie_width = area
        .height
        .saturating_mul(2)
        .min(area.width.saturating_sub(LEGEND_MIN_WIDTH));
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pie_width), Constraint::Fill(1)])
        .split(area);

    let slices = pie_slices(chart);
    let colors: Vec<Color> = chart
        .segments
        .iter()
        .map(|s| theme.data_color(&s.color))
        .collect();
    Canvas::default()
        .marker(symbols::Marker::Braille)
        .x_bounds([-1.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(|ctx| {
            for (coords, color) in slices.iter().zip(&colors) {
                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: *color,
                });
            }
        })
        .render(layout[0], buf);

    let total = chart.total();
    let legend: Vec<Line> = chart
        .segments
        .iter()
        .zip(&colors)
        .map(|(s, color)| {
            let share = if total > 0.0 {
                s.value / total * 100.0
            } else {
                0.0
            };
            Line::from(vec![
                Span::styled("■ ", Style::default().fg(*color)),
                Span::styled(s.name.clone(), Style::default().fg(theme.get("text_primary"))),
                Span::styled(
                    format!("  {} ({:.1}%)", format_value(s.value), share),
                    Style::default().fg(theme.get("text_secondary")),
                ),
            ])
        })
        .collect();
    Paragraph::new(legend).render(layout[1], buf);
}

/// Padded plot range so a single value still has width.
fn padded((lo, hi): (f64, f64)) -> [f64; 2] {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        [lo - pad, hi + pad]
    } else {
        [lo - 1.0, hi + 1.0]
    }
}

fn axis_labels(bounds: [f64; 2], style: Style) -> Vec<Span<'static>> {
    let [lo, hi] = bounds;
    [lo, (lo + hi) / 2.0, hi]
        .into_iter()
        .map(|v| Span::styled(format_value((v * 100.0).round() / 100.0), style))
        .collect()
}

fn render_xy(
    chart: &XyChart,
    connect: bool,
    cursor: Option<usize>,
    theme: &Theme,
    area: Rect,
    buf: &mut Buffer,
) {
    let selected = cursor.and_then(|i| chart.points.get(i));
    let (plot_area, tooltip_area) = if selected.is_some() {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Fill(1), Constraint::Length(TOOLTIP_HEIGHT)])
            .split(area);
        (layout[0], Some(layout[1]))
    } else {
        (area, None)
    };

    match chart.bounds() {
        Some((x_range, y_range)) => {
            let positions = chart.positions();
            let highlighted: Vec<(f64, f64)> = selected.and_then(|p| p.position).into_iter().collect();
            let series_color = theme.data_color(&chart.color);

            let mut datasets = vec![Dataset::default()
                .marker(if connect {
                    symbols::Marker::Braille
                } else {
                    symbols::Marker::Dot
                })
                .graph_type(if connect {
                    GraphType::Line
                } else {
                    GraphType::Scatter
                })
                .style(Style::default().fg(series_color))
                .data(&positions)];
            if !highlighted.is_empty() {
                datasets.push(
                    Dataset::default()
                        .marker(symbols::Marker::Block)
                        .graph_type(GraphType::Scatter)
                        .style(Style::default().fg(theme.get("chart_cursor")))
                        .data(&highlighted),
                );
            }

            let label_style = Style::default().fg(theme.get("text_primary"));
            let x_bounds = padded(x_range);
            let y_bounds = padded(y_range);
            Chart::new(datasets)
                .x_axis(
                    Axis::default()
                        .title(chart.x_label.as_str())
                        .bounds(x_bounds)
                        .style(label_style)
                        .labels(axis_labels(x_bounds, label_style)),
                )
                .y_axis(
                    Axis::default()
                        .title(chart.y_label.as_str())
                        .bounds(y_bounds)
                        .style(label_style)
                        .labels(axis_labels(y_bounds, label_style)),
                )
                .legend_position(None)
                .render(plot_area, buf);
        }
        None => {
            Paragraph::new("No numeric points to plot")
                .style(Style::default().fg(theme.get("dimmed")))
                .render(plot_area, buf);
        }
    }

    if let (Some(point), Some(area)) = (selected, tooltip_area) {
        let [caption, x, y] = chart.tooltip(point);
        let lines = vec![
            Line::styled(
                caption,
                Style::default()
                    .fg(theme.get("chart_cursor"))
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from(x),
            Line::from(y),
        ];
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
