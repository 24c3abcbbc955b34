//! Dataset registry: which datasets exist, where their CSV lives, and which
//! visualizations are drawn for each of them (plus the cross-dataset "all" view).
//!
//! The registry is plain configuration, deserialized from the `[[datasets]]` and
//! `[[all]]` tables of the config file. Each visualization entry knows how to turn
//! a dataset's rows into a [`Visualization`].

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::chart_data::{count_by_category, project_fields, Projection};
use crate::charts::{self, ChartDescriptor, Dims, RenderError};
use crate::record::Record;
use crate::widgets::datatable::DataTableState;

/// Key reserved for the cross-dataset view.
pub const ALL_KEY: &str = "all";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Stable identifier, unique within the registry
    pub key: String,
    /// Local path or http(s) URL of the CSV file
    pub source: String,
    /// Heading shown above the dataset's visualizations
    pub name: String,
    #[serde(default)]
    pub visualizations: Vec<VisualizationConfig>,
}

impl DatasetConfig {
    /// A dataset shown as one table of all its columns (used for `--dataset KEY=SOURCE`).
    pub fn ad_hoc(key: &str, source: &str) -> Self {
        Self {
            key: key.to_string(),
            source: source.to_string(),
            name: key.to_string(),
            visualizations: vec![VisualizationConfig::Table {
                fields: Vec::new(),
                page_size: None,
            }],
        }
    }
}

/// How rows are reshaped before charting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformConfig {
    /// Count rows per distinct value of a column (pie/bar input)
    CountBy(String),
    /// Copy x, y and label columns per row (line/scatter input)
    Project(Projection),
}

impl TransformConfig {
    pub fn apply(&self, rows: &[Record]) -> serde_json::Value {
        match self {
            Self::CountBy(column) => count_by_category(rows, column),
            Self::Project(projection) => project_fields(rows, projection),
        }
    }

    fn default_axis_labels(&self) -> (String, String) {
        match self {
            Self::CountBy(column) => (column.clone(), "Count".to_string()),
            Self::Project(p) => (p.x.clone(), p.y.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualizationConfig {
    Pie {
        transform: TransformConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Bar {
        transform: TransformConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Line {
        transform: TransformConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Scatter {
        transform: TransformConfig,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    /// Paginated table. Empty `fields` means every column of the first row.
    Table {
        #[serde(default)]
        fields: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page_size: Option<usize>,
    },
}

/// Width/height from config. A dimension left out keeps the chart's default.
fn dims(width: Option<u32>, height: Option<u32>, default: Dims) -> Option<Dims> {
    if width.is_none() && height.is_none() {
        return None;
    }
    Some(Dims::new(
        width.unwrap_or(default.width),
        height.unwrap_or(default.height),
    ))
}

/// Table projection plus the rows it pages over. `state` is the table's initial
/// pagination state; the front end copies it when the table is first shown.
#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub fields: Vec<String>,
    pub rows: Arc<[Record]>,
    pub state: DataTableState,
}

impl TableView {
    pub fn new(
        fields: Vec<String>,
        rows: Arc<[Record]>,
        page_size: usize,
    ) -> Result<Self, RenderError> {
        let state = DataTableState::new(rows.len(), page_size)?;
        Ok(Self {
            fields,
            rows,
            state,
        })
    }
}

/// One slot of a dashboard section.
#[derive(Debug, Clone, PartialEq)]
pub enum Visualization {
    Chart(ChartDescriptor),
    Table(TableView),
    Note(String),
    /// The renderer had no points to draw
    Empty,
    /// Inline error shown in place of the visualization
    Failed(String),
}

impl Visualization {
    pub fn title(&self) -> String {
        match self {
            Self::Chart(chart) => chart.title(),
            Self::Table(_) => "Table".to_string(),
            Self::Note(_) => "Note".to_string(),
            Self::Empty => "Empty".to_string(),
            Self::Failed(_) => "Error".to_string(),
        }
    }
}

impl VisualizationConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Pie { .. } => "pie",
            Self::Bar { .. } => "bar",
            Self::Line { .. } => "line",
            Self::Scatter { .. } => "scatter",
            Self::Table { .. } => "table",
        }
    }

    /// Build this visualization from a dataset's rows. `default_page_size` applies
    /// to tables that don't set their own.
    pub fn render(
        &self,
        rows: &Arc<[Record]>,
        default_page_size: usize,
    ) -> Result<Visualization, RenderError> {
        let chart = match self {
            Self::Pie {
                transform,
                width,
                height,
            } => charts::render_pie(&transform.apply(rows), dims(*width, *height, charts::PIE_DIMS))?,
            Self::Bar {
                transform,
                width,
                height,
            } => charts::render_bar(&transform.apply(rows), dims(*width, *height, charts::BAR_DIMS))?,
            Self::Line {
                transform,
                x_label,
                y_label,
                width,
                height,
            } => {
                let (x, y) = axis_labels(transform, x_label, y_label);
                charts::render_line(
                    &transform.apply(rows),
                    &x,
                    &y,
                    dims(*width, *height, charts::LINE_DIMS),
                )?
            }
            Self::Scatter {
                transform,
                x_label,
                y_label,
                width,
                height,
            } => {
                let (x, y) = axis_labels(transform, x_label, y_label);
                charts::render_scatter(
                    &transform.apply(rows),
                    &x,
                    &y,
                    dims(*width, *height, charts::SCATTER_DIMS),
                )?
            }
            Self::Table { fields, page_size } => {
                let fields = if fields.is_empty() {
                    rows.first()
                        .map(|r| r.columns().to_vec())
                        .unwrap_or_default()
                } else {
                    fields.clone()
                };
                let view = TableView::new(
                    fields,
                    rows.clone(),
                    page_size.unwrap_or(default_page_size),
                )?;
                return Ok(Visualization::Table(view));
            }
        };
        Ok(chart.map_or(Visualization::Empty, Visualization::Chart))
    }
}

fn axis_labels(
    transform: &TransformConfig,
    x_label: &Option<String>,
    y_label: &Option<String>,
) -> (String, String) {
    let (default_x, default_y) = transform.default_axis_labels();
    (
        x_label.clone().unwrap_or(default_x),
        y_label.clone().unwrap_or(default_y),
    )
}

/// Rows of every dataset, in registry order; `None` for datasets not loaded yet.
pub type RowsByDataset = Vec<(String, Option<Arc<[Record]>>)>;

/// Visualizations fed with all datasets at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CrossVisualizationConfig {
    /// Table of datasets with their load status, row and column counts
    Summary,
    /// Fixed text
    Note { text: String },
}

const SUMMARY_FIELDS: [&str; 4] = ["Dataset", "Status", "Rows", "Columns"];

impl CrossVisualizationConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Note { .. } => "note",
        }
    }

    pub fn render(
        &self,
        datasets: &RowsByDataset,
        default_page_size: usize,
    ) -> Result<Visualization, RenderError> {
        match self {
            Self::Note { text } => Ok(Visualization::Note(text.clone())),
            Self::Summary => {
                let rows: Arc<[Record]> = datasets
                    .iter()
                    .map(|(key, rows)| {
                        let (status, count, columns) = match rows {
                            Some(rows) => (
                                "loaded",
                                rows.len().to_string(),
                                rows.first().map_or(0, Record::len).to_string(),
                            ),
                            None => ("not loaded", "-".to_string(), "-".to_string()),
                        };
                        Record::from_pairs(SUMMARY_FIELDS.into_iter().zip([
                            key.clone(),
                            status.to_string(),
                            count,
                            columns,
                        ]))
                    })
                    .collect();
                let fields = SUMMARY_FIELDS.iter().map(|f| f.to_string()).collect();
                Ok(Visualization::Table(TableView::new(
                    fields,
                    rows,
                    default_page_size,
                )?))
            }
        }
    }
}

/// The built-in registry: a categorical color survey and a scatter demo, both read
/// from `data/` relative to the working directory.
pub fn default_datasets() -> Vec<DatasetConfig> {
    let color_count = || TransformConfig::CountBy("Favorite Color".to_string());
    vec![
        DatasetConfig {
            key: "colorDemo".to_string(),
            source: "data/colorDemo.csv".to_string(),
            name: "Colors".to_string(),
            visualizations: vec![
                VisualizationConfig::Bar {
                    transform: color_count(),
                    width: Some(800),
                    height: Some(400),
                },
                VisualizationConfig::Pie {
                    transform: color_count(),
                    width: Some(500),
                    height: Some(500),
                },
                VisualizationConfig::Table {
                    fields: ["Name", "Age", "Favorite Color", "Favorite Sport"]
                        .map(String::from)
                        .to_vec(),
                    page_size: None,
                },
            ],
        },
        DatasetConfig {
            key: "scatterDemo".to_string(),
            source: "data/scatterDemo.csv".to_string(),
            name: "Fake Scatter Data".to_string(),
            visualizations: vec![
                VisualizationConfig::Scatter {
                    transform: TransformConfig::Project(Projection {
                        x: "100 Yard Dash Time".to_string(),
                        y: "APCSP Score".to_string(),
                        label: Some("Name".to_string()),
                    }),
                    x_label: Some("100 Yard Dash Time".to_string()),
                    y_label: Some("APCSP Score".to_string()),
                    width: Some(800),
                    height: Some(400),
                },
                VisualizationConfig::Table {
                    fields: ["Name", "100 Yard Dash Time", "APCSP Score"]
                        .map(String::from)
                        .to_vec(),
                    page_size: None,
                },
            ],
        },
    ]
}

pub fn default_cross_visualizations() -> Vec<CrossVisualizationConfig> {
    vec![CrossVisualizationConfig::Summary]
}
