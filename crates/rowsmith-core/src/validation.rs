use std::collections::BTreeSet;

use crate::error::SchemaError;
use crate::schema::ColumnDefinition;

/// Check user-added columns against template names and each other.
///
/// Columns are checked in order and the first violation wins:
/// - a blank (trimmed) name fails with [`SchemaError::EmptyColumnName`]
/// - a trimmed name already used by an existing column or an earlier new
///   column fails with [`SchemaError::DuplicateColumnName`]
pub fn validate_new_columns<'a, I>(
    existing_names: I,
    new_columns: &[ColumnDefinition],
) -> Result<(), SchemaError>
where
    I: IntoIterator<Item = &'a str>,
{
    let existing: BTreeSet<&str> = existing_names.into_iter().collect();
    let mut seen = BTreeSet::new();

    for column in new_columns {
        let name = column.trimmed_name();
        if name.is_empty() {
            return Err(SchemaError::EmptyColumnName);
        }
        if existing.contains(name) || !seen.insert(name) {
            return Err(SchemaError::DuplicateColumnName(name.to_string()));
        }
    }

    Ok(())
}
