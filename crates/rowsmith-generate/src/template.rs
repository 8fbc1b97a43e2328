//! Column names from a CSV template's header row.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rowsmith_core::{ColumnDefinition, ColumnRule};

use crate::errors::TemplateError;

const UTF8_BOM: char = '\u{feff}';

/// Read the header row of a `.csv` template.
///
/// An empty file yields no columns. Only the header is inspected; data rows
/// are ignored.
pub fn read_template_columns(path: &Path) -> Result<Vec<String>, TemplateError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(TemplateError::NotCsv(path.display().to_string()));
    }
    read_template_header(File::open(path)?)
}

pub fn read_template_header<R: Read>(reader: R) -> Result<Vec<String>, TemplateError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = csv::StringRecord::new();
    if !reader.read_record(&mut record)? {
        return Ok(Vec::new());
    }

    let mut seen = BTreeSet::new();
    let mut columns = Vec::with_capacity(record.len());
    for (idx, field) in record.iter().enumerate() {
        let name = if idx == 0 {
            field.trim_start_matches(UTF8_BOM)
        } else {
            field
        };
        if name.trim().is_empty() {
            return Err(TemplateError::EmptyHeader { position: idx + 1 });
        }
        if !seen.insert(name.to_string()) {
            return Err(TemplateError::DuplicateHeader(name.to_string()));
        }
        columns.push(name.to_string());
    }
    Ok(columns)
}

/// Template columns paired with the default text rule.
pub fn default_columns<I>(names: I) -> Vec<ColumnDefinition>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    names
        .into_iter()
        .map(|name| ColumnDefinition::new(name, ColumnRule::default()))
        .collect()
}
