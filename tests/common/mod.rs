#![allow(dead_code)]

use csvdash::registry::{DatasetConfig, TransformConfig, VisualizationConfig};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};

/// A color survey with `n` respondents cycling through three colors.
pub fn write_color_csv(dir: &Path, n: usize) -> PathBuf {
    let path = dir.join("colors.csv");
    let colors = ["Red", "Blue", "Green"];
    let mut df = df!(
        "Name" => (0..n).map(|i| format!("Person {}", i)).collect::<Vec<String>>(),
        "Age" => (0..n).map(|i| (20 + i % 30) as i64).collect::<Vec<i64>>(),
        "Favorite Color" => (0..n).map(|i| colors[i % 3].to_string()).collect::<Vec<String>>()
    )
    .unwrap();
    let mut file = File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(&mut df).unwrap();
    path
}

pub fn write_points_csv(dir: &Path) -> PathBuf {
    let path = dir.join("points.csv");
    std::fs::write(&path, "Name,Time,Score\nAda,11.2,5\nBob,12.5,3\nCy,,4\n").unwrap();
    path
}

pub fn color_dataset(source: &Path) -> DatasetConfig {
    DatasetConfig {
        key: "colors".to_string(),
        source: source.to_string_lossy().to_string(),
        name: "Colors".to_string(),
        visualizations: vec![
            VisualizationConfig::Bar {
                transform: TransformConfig::CountBy("Favorite Color".to_string()),
                width: None,
                height: None,
            },
            VisualizationConfig::Table {
                fields: vec!["Name".to_string(), "Favorite Color".to_string()],
                page_size: Some(4),
            },
        ],
    }
}
