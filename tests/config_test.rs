use csvdash::config::{AppConfig, ConfigManager};
use csvdash::registry::{CrossVisualizationConfig, TransformConfig, VisualizationConfig};
use csvdash::ExportFormat;
use std::fs;
use tempfile::TempDir;

// Helper to create a temporary config directory for testing
fn setup_test_config_dir() -> (TempDir, ConfigManager) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_manager = ConfigManager::with_dir(temp_dir.path().to_path_buf());
    (temp_dir, config_manager)
}

fn write_config(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, content).expect("Failed to write config");
    path
}

#[test]
fn test_default_config() {
    let config = AppConfig::default();

    assert_eq!(config.version, "0.1");
    assert_eq!(config.display.page_size, 20);
    assert_eq!(config.display.event_poll_interval_ms, 25);
    assert_eq!(config.loading.timeout_secs, 30);
    assert!(!config.loading.load_all_on_start);
    assert_eq!(config.export_format().unwrap(), ExportFormat::Png);
    assert_eq!(config.theme.colors.primary_chart_series_color, "#8884d8");
    assert!(!config.debug.enabled);

    let keys: Vec<&str> = config.datasets.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, ["colorDemo", "scatterDemo"]);
    assert_eq!(config.all, [CrossVisualizationConfig::Summary]);
    config.validate().unwrap();
}

#[test]
fn test_template_matches_defaults() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let template = config_manager.generate_default_config();
    assert!(template.contains("[display]"));
    assert!(template.contains("[theme.colors]"));
    assert!(template.contains("[[datasets]]"));
    assert!(template.contains("version = \"0.1\""));

    let parsed: AppConfig = toml::from_str(&template).expect("template should parse");
    assert_eq!(parsed, AppConfig::default());
}

#[test]
fn test_write_default_config() {
    let (_temp_dir, config_manager) = setup_test_config_dir();

    let config_path = config_manager
        .write_default_config(false)
        .expect("Failed to write config");
    assert!(config_path.exists());

    // A second write needs force
    assert!(config_manager.write_default_config(false).is_err());
    fs::write(&config_path, "# edited").unwrap();
    config_manager
        .write_default_config(true)
        .expect("force should overwrite");
    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[[datasets]]"));
}

#[test]
fn test_partial_config_merges_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[display]
page_size = 50

[theme.colors]
error = "bright_red"
"#,
    );

    let config = AppConfig::load_file(&path).unwrap();
    assert_eq!(config.display.page_size, 50);
    assert_eq!(config.display.event_poll_interval_ms, 25);
    assert_eq!(config.theme.colors.error, "bright_red");
    assert_eq!(config.theme.colors.success, "green");
    // No registry in the file keeps the built-in one
    assert_eq!(config.datasets, AppConfig::default().datasets);
}

#[test]
fn test_registry_replaces_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(
        &temp_dir,
        r#"
[[datasets]]
key = "sales"
source = "https://example.com/sales.csv.gz"
name = "Sales"

[[datasets.visualizations]]
kind = "pie"
transform = { count_by = "Region" }

[[datasets.visualizations]]
kind = "line"
transform = { project = { x = "Month", y = "Total" } }
y_label = "Total"

[[all]]
kind = "note"
text = "Quarterly numbers"
"#,
    );

    let config = AppConfig::load_file(&path).unwrap();
    assert_eq!(config.datasets.len(), 1);
    let sales = &config.datasets[0];
    assert_eq!(sales.key, "sales");
    assert_eq!(
        sales.visualizations[0],
        VisualizationConfig::Pie {
            transform: TransformConfig::CountBy("Region".to_string()),
            width: None,
            height: None,
        }
    );
    assert_eq!(sales.visualizations[1].kind(), "line");
    assert_eq!(
        config.all,
        [CrossVisualizationConfig::Note {
            text: "Quarterly numbers".to_string()
        }]
    );
}

#[test]
fn test_invalid_configs_are_rejected() {
    let cases = [
        ("[display]\npage_size = 0\n", "page_size"),
        ("[loading]\ntimeout_secs = 0\n", "timeout_secs"),
        ("[export]\nformat = \"gif\"\n", "gif"),
        ("[theme.colors]\nerror = \"not_a_color\"\n", "not_a_color"),
        (
            "[[datasets]]\nkey = \"all\"\nsource = \"a.csv\"\nname = \"A\"\n",
            "reserved",
        ),
        (
            "[[datasets]]\nkey = \"a\"\nsource = \"a.csv\"\nname = \"A\"\n\
             [[datasets]]\nkey = \"a\"\nsource = \"b.csv\"\nname = \"B\"\n",
            "Duplicate",
        ),
        (
            "[[datasets]]\nkey = \"a\"\nsource = \"\"\nname = \"A\"\n",
            "source",
        ),
    ];

    for (content, expected) in cases {
        let temp_dir = TempDir::new().unwrap();
        let path = write_config(&temp_dir, content);
        let err = AppConfig::load_file(&path).expect_err(content);
        assert!(
            err.to_string().contains(expected),
            "error for {:?} was {}",
            content,
            err
        );
    }
}

#[test]
fn test_unparseable_config_names_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_config(&temp_dir, "[display\npage_size = 1");
    let err = AppConfig::load_file(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}
