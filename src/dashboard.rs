//! The orchestrator: owns the dataset snapshot and composes every visualization
//! of the registry into sections.

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, info, warn};

use crate::charts::RenderError;
use crate::config::AppConfig;
use crate::dataset::DatasetCollection;
use crate::record::Record;
use crate::registry::{CrossVisualizationConfig, DatasetConfig, Visualization};
use crate::source::{load_dataset, LoadOptions};

/// Heading of the cross-dataset section.
pub const ALL_HEADING: &str = "All Data";

/// A heading plus the visualizations drawn under it, in configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: String,
    pub visualizations: Vec<Visualization>,
}

pub struct Dashboard {
    snapshot: Arc<DatasetCollection>,
    registry: Vec<DatasetConfig>,
    cross: Vec<CrossVisualizationConfig>,
    page_size: usize,
}

impl Dashboard {
    pub fn new(
        registry: Vec<DatasetConfig>,
        cross: Vec<CrossVisualizationConfig>,
        page_size: usize,
    ) -> Self {
        Self {
            snapshot: Arc::new(DatasetCollection::from_registry(&registry)),
            registry,
            cross,
            page_size,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.datasets.clone(),
            config.all.clone(),
            config.display.page_size,
        )
    }

    /// The current snapshot. Holders keep seeing it even after later commits.
    pub fn snapshot(&self) -> Arc<DatasetCollection> {
        Arc::clone(&self.snapshot)
    }

    pub fn datasets(&self) -> &DatasetCollection {
        &self.snapshot
    }

    /// Attach freshly loaded rows to `key`, building the next snapshot from the
    /// current one. Unknown or already loaded keys are left alone. Returns whether
    /// the snapshot changed.
    pub fn commit(&mut self, key: &str, rows: Vec<Record>) -> bool {
        match self.snapshot.get(key) {
            None => {
                debug!(dataset = key, "ignoring rows for unknown dataset");
                return false;
            }
            Some(dataset) if dataset.is_loaded() => {
                debug!(dataset = key, "dataset already loaded, keeping first load");
                return false;
            }
            Some(_) => {}
        }

        let count = rows.len();
        match self.snapshot.with_rows(key, rows.into()) {
            Some(next) => {
                self.snapshot = Arc::new(next);
                info!(dataset = key, rows = count, "dataset loaded");
                true
            }
            None => false,
        }
    }

    /// Section for one dataset; `None` until its rows are loaded.
    pub fn render_dataset(&self, key: &str) -> Option<Section> {
        let dataset = self.snapshot.get(key)?;
        let rows = dataset.rows.as_ref()?;
        let config = self.registry.iter().find(|c| c.key == key)?;

        let visualizations = config
            .visualizations
            .iter()
            .map(|viz| isolate(key, viz.kind(), viz.render(rows, self.page_size)))
            .collect();

        Some(Section {
            heading: dataset.name.clone(),
            visualizations,
        })
    }

    /// The cross-dataset section. Always rendered, loaded or not.
    pub fn render_all(&self) -> Section {
        let by_dataset = self.snapshot.rows_by_dataset();
        let visualizations = self
            .cross
            .iter()
            .map(|viz| isolate("all", viz.kind(), viz.render(&by_dataset, self.page_size)))
            .collect();

        Section {
            heading: ALL_HEADING.to_string(),
            visualizations,
        }
    }

    /// Sections for every loaded dataset in registry order, then the cross view.
    pub fn sections(&self) -> Vec<(String, Section)> {
        let mut sections: Vec<(String, Section)> = self
            .snapshot
            .keys()
            .filter_map(|key| self.render_dataset(key).map(|s| (key.to_string(), s)))
            .collect();
        sections.push((crate::registry::ALL_KEY.to_string(), self.render_all()));
        sections
    }

    /// Load every unloaded dataset concurrently and commit each result as it is
    /// joined. Returns the failures; failed datasets stay unloaded.
    pub fn load_all_blocking(&mut self, options: &LoadOptions) -> Vec<(String, color_eyre::Report)> {
        let pending: Vec<(String, String)> = self
            .snapshot
            .iter()
            .filter(|(_, d)| !d.is_loaded())
            .map(|(k, d)| (k.to_string(), d.source.clone()))
            .collect();

        let results: Vec<(String, Result<Vec<Record>>)> = thread::scope(|scope| {
            let handles: Vec<_> = pending
                .iter()
                .map(|(key, source)| {
                    info!(dataset = %key, source = %source, "loading dataset");
                    (key, scope.spawn(move || load_dataset(source, options)))
                })
                .collect();
            handles
                .into_iter()
                .map(|(key, handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(eyre!("loader thread panicked")));
                    (key.clone(), result)
                })
                .collect()
        });

        let mut failures = Vec::new();
        for (key, result) in results {
            match result {
                Ok(rows) => {
                    self.commit(&key, rows);
                }
                Err(e) => {
                    warn!(dataset = %key, error = ?e, "dataset failed to load");
                    failures.push((key, e));
                }
            }
        }
        failures
    }
}

/// Turn a renderer error into an inline failure so siblings still render.
fn isolate(
    section: &str,
    kind: &str,
    result: Result<Visualization, RenderError>,
) -> Visualization {
    result.unwrap_or_else(|e| {
        error!(section, visualization = kind, error = %e, "Error rendering visualization");
        Visualization::Failed(format!("Error rendering visualization: {}", e))
    })
}
