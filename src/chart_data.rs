//! Dataset transforms: reshape parsed records into the point objects the chart
//! renderers take.
//!
//! Transforms never validate columns. A missing column leaves the corresponding
//! key out of the point, and the renderer's field check reports it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::record::Record;

/// Count rows per distinct value of `column`.
///
/// Emits `{name, value, color}` per category in first-occurrence order, with
/// `color` the lowercased category name. Rows lacking the column are counted
/// under a category whose point has neither `name` nor `color`.
pub fn count_by_category(rows: &[Record], column: &str) -> Value {
    let mut order: Vec<(Option<&str>, u64)> = Vec::new();
    let mut index: HashMap<Option<&str>, usize> = HashMap::new();
    for row in rows {
        let category = row.get(column);
        match index.get(&category) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(category, order.len());
                order.push((category, 1));
            }
        }
    }

    Value::Array(
        order
            .into_iter()
            .map(|(category, count)| {
                let mut point = Map::new();
                if let Some(name) = category {
                    point.insert("name".into(), Value::from(name));
                    point.insert("color".into(), Value::from(name.to_lowercase()));
                }
                point.insert("value".into(), Value::from(count));
                Value::Object(point)
            })
            .collect(),
    )
}

/// Columns feeding the `x`, `y` and optional `label` of a line/scatter point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub x: String,
    pub y: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// One `{x, y, label}` point per row, values copied verbatim (no numeric coercion).
pub fn project_fields(rows: &[Record], projection: &Projection) -> Value {
    Value::Array(
        rows.iter()
            .map(|row| {
                let mut point = Map::new();
                let mut copy = |key: &str, column: &str| {
                    if let Some(v) = row.get(column) {
                        point.insert(key.into(), Value::from(v));
                    }
                };
                copy("x", &projection.x);
                copy("y", &projection.y);
                if let Some(label) = &projection.label {
                    copy("label", label);
                }
                Value::Object(point)
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn colors(names: &[&str]) -> Vec<Record> {
        names
            .iter()
            .map(|c| Record::from_pairs([("color", *c)]))
            .collect()
    }

    #[test]
    fn counts_in_first_occurrence_order() {
        let rows = colors(&["Red", "Red", "Blue"]);
        assert_eq!(
            count_by_category(&rows, "color"),
            json!([
                {"name": "Red", "value": 2, "color": "red"},
                {"name": "Blue", "value": 1, "color": "blue"}
            ])
        );

        let rows = colors(&["Green", "Blue", "Green", "Red", "Blue", "Green"]);
        let out = count_by_category(&rows, "color");
        let names: Vec<&str> = out
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["Green", "Blue", "Red"]);
        assert_eq!(out[0]["value"], 3);
    }

    #[test]
    fn count_of_missing_column_has_no_name() {
        let rows = colors(&["Red"]);
        assert_eq!(count_by_category(&rows, "Favorite Color"), json!([{"value": 1}]));
        assert_eq!(count_by_category(&[], "color"), json!([]));
    }

    #[test]
    fn projects_columns_verbatim() {
        let rows = vec![Record::from_pairs([
            ("Name", "A"),
            ("Time", "10"),
            ("Score", "5"),
        ])];
        let projection = Projection {
            x: "Time".into(),
            y: "Score".into(),
            label: Some("Name".into()),
        };
        assert_eq!(
            project_fields(&rows, &projection),
            json!([{"x": "10", "y": "5", "label": "A"}])
        );
    }

    #[test]
    fn projection_leaves_missing_columns_out() {
        let rows = vec![Record::from_pairs([("Time", "10")])];
        let projection = Projection {
            x: "Time".into(),
            y: "Score".into(),
            label: None,
        };
        assert_eq!(project_fields(&rows, &projection), json!([{"x": "10"}]));
    }
}
