use thiserror::Error;

/// Naming violations detected before any row is generated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A new column was submitted with a blank name.
    #[error("new column name must not be empty")]
    EmptyColumnName,
    /// A new column collides with an existing or earlier new column.
    #[error("duplicate column name: {0}")]
    DuplicateColumnName(String),
}
