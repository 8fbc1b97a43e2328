use rowsmith_core::SchemaError;
use thiserror::Error;

/// Request-level errors emitted by the generation engine.
///
/// Per-cell problems never surface here; they are rendered as sentinel
/// values inside the dataset.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("nothing to generate: provide template columns or add at least one new column")]
    NothingToGenerate,
    #[error("invalid row count {0}: expected a positive integer")]
    InvalidRowCount(i64),
    #[error("{0}")]
    Schema(#[from] SchemaError),
    #[error("generation failed: {0}")]
    Failed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while reading column names from a CSV template.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template must be a .csv file: {0}")]
    NotCsv(String),
    #[error("template header {position} is empty")]
    EmptyHeader { position: usize },
    #[error("template header '{0}' appears more than once")]
    DuplicateHeader(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
