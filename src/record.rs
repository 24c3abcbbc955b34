//! Parsed CSV rows: one `Record` per source row, keyed by header name.

use color_eyre::Result;
use polars::prelude::*;
use std::io::Cursor;
use std::sync::Arc;

/// One parsed row. Column names are shared between all records of a parse.
///
/// Lookups of columns the row doesn't have return `None`; callers decide whether
/// that is an error (transforms don't, renderers do).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    fn new(columns: Arc<[String]>, values: Vec<String>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Self { columns, values }
    }

    /// Build a record from (column, value) pairs, in order.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<String>) = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .unzip();
        Self::new(columns.into(), values)
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i].as_str())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

/// Parse CSV text with a header row into records.
///
/// Every column is read as text (no type inference); empty cells become `""`.
/// Either the whole input parses or an error is returned.
pub fn parse_csv(bytes: Vec<u8>) -> Result<Vec<Record>> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0));
    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(options)
        .finish()?;

    let columns: Arc<[String]> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let mut rows: Vec<Vec<String>> = vec![Vec::with_capacity(columns.len()); df.height()];
    for name in columns.iter() {
        let values = df.column(name.as_str())?.str()?;
        for (row, value) in rows.iter_mut().zip(values.iter()) {
            row.push(value.unwrap_or_default().to_string());
        }
    }

    Ok(rows
        .into_iter()
        .map(|values| Record::new(columns.clone(), values))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_keeps_values_as_text() {
        let csv = "Name,Age,Favorite Color\nAda,36,Red\nBob,007,Blue\n";
        let rows = parse_csv(csv.as_bytes().to_vec()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name"), Some("Ada"));
        assert_eq!(rows[1].get("Age"), Some("007"));
        assert_eq!(rows[1].get("Favorite Color"), Some("Blue"));
        assert_eq!(rows[0].columns(), ["Name", "Age", "Favorite Color"]);
    }

    #[test]
    fn parse_empty_cells_become_empty_strings() {
        let csv = "a,b\n1,\n,2\n";
        let rows = parse_csv(csv.as_bytes().to_vec()).unwrap();
        assert_eq!(rows[0].get("b"), Some(""));
        assert_eq!(rows[1].get("a"), Some(""));
    }

    #[test]
    fn parse_header_only_and_blank_input() {
        assert!(parse_csv(b"a,b\n".to_vec()).unwrap().is_empty());
        assert!(parse_csv(b"  \n".to_vec()).unwrap().is_empty());
    }

    #[test]
    fn record_lookup_of_unknown_column() {
        let r = Record::from_pairs([("x", "1"), ("y", "2")]);
        assert_eq!(r.get("z"), None);
        assert_eq!(r.len(), 2);
        assert_eq!(r.iter().collect::<Vec<_>>(), vec![("x", "1"), ("y", "2")]);
    }
}
