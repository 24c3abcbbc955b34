//! Chart renderers: validate a loosely-typed array of point objects and build a
//! chart descriptor from it.
//!
//! Validation is the same for every chart: the input must be an array, an empty
//! array means "no chart", and the *first* element must carry the chart's required
//! fields. Later elements are not checked; missing values there fall back to
//! empty text or zero.

use serde_json::Value;
use thiserror::Error;

/// Fill used for pie segments without a `color`.
pub const DEFAULT_PIE_COLOR: &str = "yellow";
/// Fill used for bars without a `color`, and for line/scatter series.
pub const DEFAULT_SERIES_COLOR: &str = "#8884d8";

const PIE_FIELDS: &[&str] = &["name", "value"];
const XY_FIELDS: &[&str] = &["x", "y"];

/// Width and height of a chart, in pixels when exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dims {
    pub width: u32,
    pub height: u32,
}

impl Dims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub const PIE_DIMS: Dims = Dims::new(300, 300);
pub const BAR_DIMS: Dims = Dims::new(300, 300);
pub const LINE_DIMS: Dims = Dims::new(600, 300);
pub const SCATTER_DIMS: Dims = Dims::new(600, 300);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Expected an array of objects")]
    InvalidInput,
    #[error("Expected objects with {} fields", quoted_fields(.required))]
    MissingField { required: &'static [&'static str] },
    #[error("Page size must be greater than 0")]
    InvalidPageSize,
}

fn quoted_fields(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| format!("'{}'", f))
        .collect::<Vec<_>>()
        .join(" and ")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartKind {
    Pie,
    Bar,
    Line,
    Scatter,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pie => "pie",
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
        }
    }
}

/// One pie slice or bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryChart {
    pub dims: Dims,
    pub segments: Vec<Segment>,
}

impl CategoryChart {
    pub fn total(&self) -> f64 {
        self.segments.iter().map(|s| s.value).sum()
    }

    pub fn max_value(&self) -> f64 {
        self.segments.iter().map(|s| s.value).fold(0.0, f64::max)
    }
}

/// One line/scatter point. `x` and `y` keep their source text; `position` is set
/// only when both parse as finite numbers (other points are listed, not plotted).
#[derive(Debug, Clone, PartialEq)]
pub struct PlotPoint {
    pub x: String,
    pub y: String,
    pub label: Option<String>,
    pub position: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XyChart {
    pub dims: Dims,
    pub x_label: String,
    pub y_label: String,
    pub color: String,
    pub points: Vec<PlotPoint>,
}

impl XyChart {
    /// Caption line plus one line per axis, e.g.
    /// `["Ada", "100 Yard Dash Time: 12.1", "APCSP Score: 4"]`.
    pub fn tooltip(&self, point: &PlotPoint) -> [String; 3] {
        let caption = match &point.label {
            Some(label) => label.clone(),
            None => format!("Point at x={}", point.x),
        };
        [
            caption,
            format!("{}: {}", self.x_label, point.x),
            format!("{}: {}", self.y_label, point.y),
        ]
    }

    pub fn positions(&self) -> Vec<(f64, f64)> {
        self.points.iter().filter_map(|p| p.position).collect()
    }

    /// Plotted x and y ranges, `None` when no point is numeric.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut it = self.points.iter().filter_map(|p| p.position);
        let (x0, y0) = it.next()?;
        let init = ((x0, x0), (y0, y0));
        Some(it.fold(init, |((xl, xh), (yl, yh)), (x, y)| {
            ((xl.min(x), xh.max(x)), (yl.min(y), yh.max(y)))
        }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartDescriptor {
    Pie(CategoryChart),
    Bar(CategoryChart),
    Line(XyChart),
    Scatter(XyChart),
}

impl ChartDescriptor {
    pub fn kind(&self) -> ChartKind {
        match self {
            Self::Pie(_) => ChartKind::Pie,
            Self::Bar(_) => ChartKind::Bar,
            Self::Line(_) => ChartKind::Line,
            Self::Scatter(_) => ChartKind::Scatter,
        }
    }

    pub fn dims(&self) -> Dims {
        match self {
            Self::Pie(c) | Self::Bar(c) => c.dims,
            Self::Line(c) | Self::Scatter(c) => c.dims,
        }
    }

    /// Short human title, e.g. "Bar chart" or "Scatter: Time vs Score".
    pub fn title(&self) -> String {
        match self {
            Self::Pie(_) => "Pie chart".to_string(),
            Self::Bar(_) => "Bar chart".to_string(),
            Self::Line(c) => format!("Line: {} vs {}", c.y_label, c.x_label),
            Self::Scatter(c) => format!("Scatter: {} vs {}", c.y_label, c.x_label),
        }
    }
}

pub fn render_pie(data: &Value, dims: Option<Dims>) -> Result<Option<ChartDescriptor>, RenderError> {
    let chart = category_chart(data, dims.unwrap_or(PIE_DIMS), DEFAULT_PIE_COLOR)?;
    Ok(chart.map(ChartDescriptor::Pie))
}

pub fn render_bar(data: &Value, dims: Option<Dims>) -> Result<Option<ChartDescriptor>, RenderError> {
    let chart = category_chart(data, dims.unwrap_or(BAR_DIMS), DEFAULT_SERIES_COLOR)?;
    Ok(chart.map(ChartDescriptor::Bar))
}

pub fn render_line(
    data: &Value,
    x_label: &str,
    y_label: &str,
    dims: Option<Dims>,
) -> Result<Option<ChartDescriptor>, RenderError> {
    let chart = xy_chart(data, x_label, y_label, dims.unwrap_or(LINE_DIMS))?;
    Ok(chart.map(ChartDescriptor::Line))
}

pub fn render_scatter(
    data: &Value,
    x_label: &str,
    y_label: &str,
    dims: Option<Dims>,
) -> Result<Option<ChartDescriptor>, RenderError> {
    let chart = xy_chart(data, x_label, y_label, dims.unwrap_or(SCATTER_DIMS))?;
    Ok(chart.map(ChartDescriptor::Scatter))
}

fn category_chart(
    data: &Value,
    dims: Dims,
    default_color: &str,
) -> Result<Option<CategoryChart>, RenderError> {
    let Some(points) = validated_points(data, PIE_FIELDS)? else {
        return Ok(None);
    };
    let segments = points
        .iter()
        .map(|p| Segment {
            name: field(p, "name").map(display_text).unwrap_or_default(),
            value: field(p, "value").and_then(numeric).unwrap_or(0.0),
            color: non_empty_text(p, "color").unwrap_or_else(|| default_color.to_string()),
        })
        .collect();
    Ok(Some(CategoryChart { dims, segments }))
}

fn xy_chart(
    data: &Value,
    x_label: &str,
    y_label: &str,
    dims: Dims,
) -> Result<Option<XyChart>, RenderError> {
    let Some(points) = validated_points(data, XY_FIELDS)? else {
        return Ok(None);
    };
    let points = points
        .iter()
        .map(|p| {
            let x = field(p, "x");
            let y = field(p, "y");
            PlotPoint {
                x: x.map(display_text).unwrap_or_default(),
                y: y.map(display_text).unwrap_or_default(),
                label: non_empty_text(p, "label"),
                position: x.and_then(numeric).zip(y.and_then(numeric)),
            }
        })
        .collect();
    Ok(Some(XyChart {
        dims,
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        color: DEFAULT_SERIES_COLOR.to_string(),
        points,
    }))
}

/// Array check, empty check, then required fields on the first element only.
fn validated_points<'a>(
    data: &'a Value,
    required: &'static [&'static str],
) -> Result<Option<&'a [Value]>, RenderError> {
    let points = data.as_array().ok_or(RenderError::InvalidInput)?;
    let Some(first) = points.first() else {
        return Ok(None);
    };
    if required.iter().any(|name| field(first, name).is_none()) {
        return Err(RenderError::MissingField { required });
    }
    Ok(Some(points))
}

/// A present, non-null field of a point object.
fn field<'a>(point: &'a Value, name: &str) -> Option<&'a Value> {
    point.get(name).filter(|v| !v.is_null())
}

fn non_empty_text(point: &Value, name: &str) -> Option<String> {
    field(point, name)
        .map(display_text)
        .filter(|s| !s.is_empty())
}

fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
