//! Core contracts for rowsmith.
//!
//! This crate defines the column rule model, the schema snapshot consumed by
//! the generator, the record/dataset shapes it produces, and the validation
//! applied to user-added columns.

pub mod dataset;
pub mod error;
pub mod rule;
pub mod schema;
pub mod validation;

pub use dataset::{DEFAULT_PREVIEW_ROWS, Dataset, Record};
pub use error::SchemaError;
pub use rule::{
    CategorySource, Charset, ColumnRule, DEFAULT_DATE_FORMAT, DEFAULT_ID_LENGTH, NumericInput,
};
pub use schema::{ColumnDefinition, ColumnOrigin, Schema};
pub use validation::validate_new_columns;
