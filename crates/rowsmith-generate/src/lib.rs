//! Row generation for Rowsmith.
//!
//! Takes a column schema (template columns plus new columns, each with a
//! rule) and produces a dataset of string records, either in memory or
//! streamed to a quoted CSV file. Per-row seeding keeps runs reproducible.

pub mod charset;
pub mod engine;
pub mod errors;
pub mod generators;
pub mod model;
pub mod output;
pub mod template;

pub use charset::{alphabet, generate_id};
pub use engine::{
    CsvGeneration, GenerationEngine, GenerationResult, PreparedDataset, Rows, generate_dataset,
    prepare,
};
pub use errors::{GenerationError, TemplateError};
pub use generators::{Cell, Sentinel, TEXT_FALLBACK, generate_cell, generate_value, rule_sentinel};
pub use model::{ColumnReport, GenerateOptions, GenerationReport};
pub use template::{default_columns, read_template_columns, read_template_header};

/// File name used for CSV output inside a run directory.
pub const OUTPUT_FILE_NAME: &str = "augmented_dataset.csv";
