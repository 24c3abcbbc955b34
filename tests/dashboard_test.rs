use csvdash::chart_data::Projection;
use csvdash::charts::ChartDescriptor;
use csvdash::dashboard::{Dashboard, ALL_HEADING};
use csvdash::registry::{
    CrossVisualizationConfig, DatasetConfig, TransformConfig, Visualization, VisualizationConfig,
};
use csvdash::source::LoadOptions;
use std::sync::Arc;
use tempfile::TempDir;

mod common;

fn summary_cell(dashboard: &Dashboard, key: &str, field: &str) -> String {
    let all = dashboard.render_all();
    let Visualization::Table(view) = &all.visualizations[0] else {
        panic!("summary should be a table");
    };
    view.rows
        .iter()
        .find(|r| r.get("Dataset") == Some(key))
        .and_then(|r| r.get(field))
        .unwrap()
        .to_string()
}

#[test]
fn test_load_and_render_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = common::write_color_csv(dir.path(), 10);

    let mut dashboard = Dashboard::new(
        vec![common::color_dataset(&path)],
        vec![CrossVisualizationConfig::Summary],
        20,
    );
    assert!(dashboard.render_dataset("colors").is_none());
    assert_eq!(summary_cell(&dashboard, "colors", "Status"), "not loaded");

    let failures = dashboard.load_all_blocking(&LoadOptions::default());
    assert!(failures.is_empty());

    let section = dashboard.render_dataset("colors").unwrap();
    assert_eq!(section.heading, "Colors");
    assert_eq!(section.visualizations.len(), 2);

    let Visualization::Chart(ChartDescriptor::Bar(bar)) = &section.visualizations[0] else {
        panic!("expected a bar chart, got {:?}", section.visualizations[0]);
    };
    let counts: Vec<(&str, f64)> = bar
        .segments
        .iter()
        .map(|s| (s.name.as_str(), s.value))
        .collect();
    assert_eq!(counts, [("Red", 4.0), ("Blue", 3.0), ("Green", 3.0)]);
    assert_eq!(bar.segments[0].color, "red");

    let Visualization::Table(table) = &section.visualizations[1] else {
        panic!("expected a table");
    };
    assert_eq!(table.fields, ["Name", "Favorite Color"]);
    assert_eq!(table.state.total_pages(), 3);
    let page = table.state.page(&table.rows);
    assert_eq!(page.summary(), "Showing 1-4 of 10");
    assert_eq!(page.rows[0].get("Name"), Some("Person 0"));
    // Every column is read as text.
    assert_eq!(page.rows[0].get("Age"), Some("20"));

    assert_eq!(summary_cell(&dashboard, "colors", "Status"), "loaded");
    assert_eq!(summary_cell(&dashboard, "colors", "Rows"), "10");
    assert_eq!(summary_cell(&dashboard, "colors", "Columns"), "3");
}

#[test]
fn test_failed_load_leaves_dataset_unloaded() {
    let dir = TempDir::new().unwrap();
    let good = common::write_color_csv(dir.path(), 3);
    let mut missing = common::color_dataset(&dir.path().join("missing.csv"));
    missing.key = "missing".to_string();

    let mut dashboard = Dashboard::new(
        vec![common::color_dataset(&good), missing],
        vec![CrossVisualizationConfig::Summary],
        20,
    );
    let failures = dashboard.load_all_blocking(&LoadOptions::default());
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "missing");

    assert!(dashboard.datasets().get("colors").unwrap().is_loaded());
    assert!(!dashboard.datasets().get("missing").unwrap().is_loaded());
    assert!(dashboard.render_dataset("missing").is_none());

    // Only the loaded dataset has a section, then the cross view.
    let keys: Vec<String> = dashboard.sections().into_iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["colors", "all"]);
}

#[test]
fn test_renderer_failures_are_isolated() {
    let dir = TempDir::new().unwrap();
    let path = common::write_points_csv(dir.path());

    let config = DatasetConfig {
        key: "points".to_string(),
        source: path.to_string_lossy().to_string(),
        name: "Points".to_string(),
        visualizations: vec![
            // No column "Color": points lack name, so the renderer rejects them.
            VisualizationConfig::Pie {
                transform: TransformConfig::CountBy("Color".to_string()),
                width: None,
                height: None,
            },
            VisualizationConfig::Scatter {
                transform: TransformConfig::Project(Projection {
                    x: "Time".to_string(),
                    y: "Score".to_string(),
                    label: Some("Name".to_string()),
                }),
                x_label: None,
                y_label: None,
                width: None,
                height: None,
            },
            VisualizationConfig::Table {
                fields: Vec::new(),
                page_size: Some(0),
            },
        ],
    };
    let mut dashboard = Dashboard::new(
        vec![config],
        vec![CrossVisualizationConfig::Note {
            text: "More views coming".to_string(),
        }],
        20,
    );
    dashboard.load_all_blocking(&LoadOptions::default());

    let section = dashboard.render_dataset("points").unwrap();
    match &section.visualizations[0] {
        Visualization::Failed(msg) => assert_eq!(
            msg,
            "Error rendering visualization: Expected objects with 'name' and 'value' fields"
        ),
        other => panic!("expected failure, got {:?}", other),
    }
    let Visualization::Chart(ChartDescriptor::Scatter(scatter)) = &section.visualizations[1]
    else {
        panic!("scatter should still render");
    };
    assert_eq!(scatter.points.len(), 3);
    // The row with an empty time has no plot position.
    assert_eq!(scatter.positions().len(), 2);
    assert!(matches!(&section.visualizations[2], Visualization::Failed(_)));

    let all = dashboard.render_all();
    assert_eq!(all.heading, ALL_HEADING);
    assert_eq!(
        all.visualizations,
        [Visualization::Note("More views coming".to_string())]
    );
}

#[test]
fn test_snapshots_are_immutable() {
    let dir = TempDir::new().unwrap();
    let path = common::write_color_csv(dir.path(), 6);
    let mut dashboard = Dashboard::new(vec![common::color_dataset(&path)], Vec::new(), 20);

    let before = dashboard.snapshot();
    dashboard.load_all_blocking(&LoadOptions::default());
    let after = dashboard.snapshot();

    assert!(!before.get("colors").unwrap().is_loaded());
    assert!(after.get("colors").unwrap().is_loaded());
    assert!(!Arc::ptr_eq(&before, &after));

    // A second load attempt finds nothing pending.
    assert!(dashboard.load_all_blocking(&LoadOptions::default()).is_empty());
    assert!(Arc::ptr_eq(&after, &dashboard.snapshot()));
}
