use std::sync::Arc;

use serde::Serialize;
use serde::ser::{SerializeMap, SerializeStruct, Serializer};

/// Number of records shown by a default preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 10;

/// One generated row: one value per schema column, in schema order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    columns: Arc<[String]>,
    values: Vec<String>,
}

impl Record {
    /// Build a record over a shared column list, asking `value_for` for the
    /// value of each column index in order.
    pub fn build<F>(columns: Arc<[String]>, value_for: F) -> Self
    where
        F: FnMut(usize) -> String,
    {
        let values = (0..columns.len()).map(value_for).collect();
        Self { columns, values }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .position(|name| name == column)
            .map(|idx| self.values[idx].as_str())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(column, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(String::as_str))
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Full, ordered output of one generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    columns: Arc<[String]>,
    records: Vec<Record>,
}

impl Dataset {
    pub fn new(columns: Arc<[String]>, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `rows` records, or all of them when the dataset is shorter.
    pub fn preview(&self, rows: usize) -> &[Record] {
        &self.records[..rows.min(self.records.len())]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Dataset", 2)?;
        state.serialize_field("columns", &self.columns[..])?;
        state.serialize_field("records", &self.records)?;
        state.end()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns() -> Arc<[String]> {
        Arc::from(vec!["id".to_string(), "age".to_string()])
    }

    fn record(cols: Arc<[String]>, id: &str, age: &str) -> Record {
        let values = [id.to_string(), age.to_string()];
        Record::build(cols, |idx| values[idx].clone())
    }

    #[test]
    fn record_lookup_and_order() {
        let record = record(columns(), "x", "18");
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("age"), Some("18"));
        assert_eq!(record.get("missing"), None);
        let pairs: Vec<(&str, &str)> = record.iter().collect();
        assert_eq!(pairs, vec![("id", "x"), ("age", "18")]);
    }

    #[test]
    fn record_serializes_as_ordered_map() {
        let json = serde_json::to_string(&record(columns(), "x", "18")).expect("serialize");
        assert_eq!(json, r#"{"id":"x","age":"18"}"#);
    }

    #[test]
    fn preview_is_bounded() {
        let cols = columns();
        let records = (0..3)
            .map(|idx| record(cols.clone(), &idx.to_string(), "1"))
            .collect();
        let dataset = Dataset::new(cols, records);
        assert_eq!(dataset.preview(DEFAULT_PREVIEW_ROWS).len(), 3);
        assert_eq!(dataset.preview(2).len(), 2);
        assert_eq!(dataset.preview(0).len(), 0);
    }
}
