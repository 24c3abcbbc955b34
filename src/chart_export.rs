//! Chart export to PNG (plotters bitmap backend) and SVG (plotters SVG backend).
//!
//! Each chart is written at the width/height of its descriptor.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::charts::{CategoryChart, ChartDescriptor, XyChart};
use crate::config::chart_rgb;
use crate::dashboard::Section;
use crate::registry::Visualization;
use csvdash_cli::ExportFormat;

const FALLBACK_RGB: RGBColor = RGBColor(0x88, 0x84, 0xd8);

fn rgb(color: &str) -> RGBColor {
    chart_rgb(color)
        .map(|(r, g, b)| RGBColor(r, g, b))
        .unwrap_or(FALLBACK_RGB)
}

/// Reject charts that would draw nothing, before a file is created.
fn check_drawable(chart: &ChartDescriptor) -> Result<()> {
    match chart {
        ChartDescriptor::Pie(c) if c.total() <= 0.0 => {
            Err(eyre!("No data to export: pie values sum to zero"))
        }
        ChartDescriptor::Line(c) | ChartDescriptor::Scatter(c) if c.bounds().is_none() => {
            Err(eyre!("No data to export: no point has numeric x and y"))
        }
        _ => Ok(()),
    }
}

/// Write `chart` to `path` in `format`.
pub fn write_chart(path: &Path, chart: &ChartDescriptor, format: ExportFormat) -> Result<()> {
    check_drawable(chart)?;
    let dims = chart.dims();
    let size = (dims.width, dims.height);
    match format {
        ExportFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_chart(&root, chart)?;
            root.present()?;
        }
        ExportFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_chart(&root, chart)?;
            root.present()?;
        }
    }
    Ok(())
}

fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &ChartDescriptor) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let title = chart.title();
    match chart {
        ChartDescriptor::Pie(c) => draw_pie(root, &title, c),
        ChartDescriptor::Bar(c) => draw_bar(root, &title, c),
        ChartDescriptor::Line(c) => draw_xy(root, &title, c, true),
        ChartDescriptor::Scatter(c) => draw_xy(root, &title, c, false),
    }
}

fn draw_pie<DB>(root: &DrawingArea<DB, Shift>, title: &str, chart: &CategoryChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let area = root.titled(title, ("sans-serif", 20))?;
    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;

    let sizes: Vec<f64> = chart.segments.iter().map(|s| s.value.max(0.0)).collect();
    let colors: Vec<RGBColor> = chart.segments.iter().map(|s| rgb(&s.color)).collect();
    let labels: Vec<&str> = chart.segments.iter().map(|s| s.name.as_str()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.label_style(("sans-serif", 14).into_font().color(&BLACK));
    pie.percentages(("sans-serif", radius * 0.08).into_font().color(&BLACK));
    area.draw(&pie)?;
    Ok(())
}

fn draw_bar<DB>(root: &DrawingArea<DB, Shift>, title: &str, chart: &CategoryChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = chart.segments.len() as u32;
    let y_min = chart
        .segments
        .iter()
        .map(|s| s.value)
        .fold(0.0_f64, f64::min);
    let y_max = chart.max_value().max(0.0);
    let y_max = if y_max > y_min { y_max * 1.1 } else { y_min + 1.0 };

    let mut ctx = ChartBuilder::on(root)
        .margin(30)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d((0..n).into_segmented(), y_min..y_max)?;

    let names: Vec<&str> = chart.segments.iter().map(|s| s.name.as_str()).collect();
    let x_formatter = |v: &SegmentValue<u32>| match v {
        SegmentValue::CenterOf(i) => names
            .get(*i as usize)
            .map(|s| s.to_string())
            .unwrap_or_default(),
        _ => String::new(),
    };
    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&x_formatter)
        .y_desc("value")
        .draw()?;

    ctx.draw_series(chart.segments.iter().enumerate().map(|(i, s)| {
        let i = i as u32;
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), s.value)],
            rgb(&s.color).filled(),
        );
        bar.set_margin(0, 0, 5, 5);
        bar
    }))?;
    Ok(())
}

/// Pad a degenerate range so plotters has something to scale.
fn padded((lo, hi): (f64, f64)) -> std::ops::Range<f64> {
    if hi > lo {
        let pad = (hi - lo) * 0.05;
        (lo - pad)..(hi + pad)
    } else {
        (lo - 1.0)..(hi + 1.0)
    }
}

fn draw_xy<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    chart: &XyChart,
    connect: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (x_range, y_range) = chart
        .bounds()
        .ok_or_else(|| eyre!("No data to export: no point has numeric x and y"))?;
    let color = rgb(&chart.color);

    let mut ctx = ChartBuilder::on(root)
        .margin(30)
        .caption(title, ("sans-serif", 20))
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(padded(x_range), padded(y_range))?;

    ctx.configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .draw()?;

    let positions = chart.positions();
    if connect {
        ctx.draw_series(LineSeries::new(positions.iter().copied(), color.stroke_width(2)))?;
    }
    ctx.draw_series(
        positions
            .iter()
            .map(|&p| Circle::new(p, 4, color.filled())),
    )?;
    Ok(())
}

/// File name of an exported chart, e.g. `colorDemo-1-bar.png` (1-based index).
pub fn export_file_name(section_key: &str, index: usize, chart: &ChartDescriptor, format: ExportFormat) -> String {
    let key: String = section_key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!(
        "{}-{}-{}.{}",
        key,
        index + 1,
        chart.kind().as_str(),
        format.extension()
    )
}

/// Outcome of a batch export. One chart failing does not stop the others.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failures: Vec<(PathBuf, color_eyre::Report)>,
}

impl ExportReport {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty() && self.failures.is_empty()
    }
}

/// Write every chart of `sections` into `dir` (created if needed). Tables, notes
/// and failed slots are skipped. A chart that fails to write is logged and
/// recorded in the report; only failing to create `dir` aborts the batch.
pub fn export_sections(
    sections: &[(String, Section)],
    dir: &Path,
    format: ExportFormat,
) -> Result<ExportReport> {
    let charts: Vec<(&str, usize, &ChartDescriptor)> = sections
        .iter()
        .flat_map(|(key, section)| {
            section
                .visualizations
                .iter()
                .enumerate()
                .filter_map(move |(i, viz)| match viz {
                    Visualization::Chart(chart) => Some((key.as_str(), i, chart)),
                    _ => None,
                })
        })
        .collect();

    let mut report = ExportReport::default();
    if charts.is_empty() {
        return Ok(report);
    }
    std::fs::create_dir_all(dir)?;

    for (key, index, chart) in charts {
        let path = dir.join(export_file_name(key, index, chart, format));
        match write_chart(&path, chart, format) {
            Ok(()) => {
                info!(path = %path.display(), "exported chart");
                report.written.push(path);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "chart export failed");
                report.failures.push((path, e));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::{render_bar, render_pie, render_scatter};
    use serde_json::json;

    #[test]
    fn file_names_are_filesystem_safe() {
        let chart = render_bar(&json!([{"name": "a", "value": 1}]), None)
            .unwrap()
            .unwrap();
        assert_eq!(
            export_file_name("colorDemo", 0, &chart, ExportFormat::Png),
            "colorDemo-1-bar.png"
        );
        assert_eq!(
            export_file_name("my data/1", 2, &chart, ExportFormat::Svg),
            "my_data_1-3-bar.svg"
        );
    }

    #[test]
    fn colors_fall_back_for_unknown_names() {
        assert_eq!(rgb("purple"), RGBColor(128, 0, 128));
        assert_eq!(rgb("#010203"), RGBColor(1, 2, 3));
        assert_eq!(rgb("plaid"), FALLBACK_RGB);
    }

    #[test]
    fn undrawable_charts_are_rejected_before_writing() {
        let dir = tempfile::tempdir().unwrap();

        let pie = render_pie(&json!([{"name": "a", "value": 0}]), None)
            .unwrap()
            .unwrap();
        let path = dir.path().join("pie.svg");
        assert!(write_chart(&path, &pie, ExportFormat::Svg).is_err());
        assert!(!path.exists());

        let scatter = render_scatter(&json!([{"x": "n/a", "y": "?"}]), "x", "y", None)
            .unwrap()
            .unwrap();
        let path = dir.path().join("scatter.png");
        assert!(write_chart(&path, &scatter, ExportFormat::Png).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn sections_without_charts_write_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let sections = vec![(
            "all".to_string(),
            Section {
                heading: "All Data".into(),
                visualizations: vec![Visualization::Note("Fix me".into()), Visualization::Empty],
            },
        )];
        let report = export_sections(&sections, &out, ExportFormat::Png).unwrap();
        assert!(report.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn failing_chart_does_not_stop_later_charts() {
        let dir = tempfile::tempdir().unwrap();
        let unplottable = render_scatter(&json!([{"x": "n/a", "y": "?"}]), "x", "y", None)
            .unwrap()
            .unwrap();
        let bar = render_bar(&json!([{"name": "a", "value": 2}]), None)
            .unwrap()
            .unwrap();
        let sections = vec![
            (
                "first".to_string(),
                Section {
                    heading: "First".into(),
                    visualizations: vec![Visualization::Chart(unplottable)],
                },
            ),
            (
                "second".to_string(),
                Section {
                    heading: "Second".into(),
                    visualizations: vec![Visualization::Chart(bar)],
                },
            ),
        ];

        let report = export_sections(&sections, dir.path(), ExportFormat::Svg).unwrap();
        assert!(report.failures[0].0.ends_with("first-1-scatter.svg"));
        // The bar after the failed scatter was still attempted.
        assert_eq!(report.written.len() + report.failures.len(), 2);
        assert!(report
            .written
            .iter()
            .chain(report.failures.iter().map(|(p, _)| p))
            .any(|p| p.ends_with("second-1-bar.svg")));
    }
}
