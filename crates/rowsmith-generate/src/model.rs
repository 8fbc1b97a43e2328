use serde::{Deserialize, Serialize};

use rowsmith_core::{ColumnOrigin, DEFAULT_PREVIEW_ROWS};

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Seed for reproducible runs; drawn from OS entropy when unset.
    pub seed: Option<u64>,
    /// Identifier recorded in the report; a fresh uuid when unset.
    pub run_id: Option<String>,
    /// Number of leading records kept for preview when streaming.
    pub preview_rows: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            seed: None,
            run_id: None,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

/// Per-column summary of a generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnReport {
    pub name: String,
    pub origin: ColumnOrigin,
    pub rule: String,
    pub sentinel_count: u64,
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub seed: u64,
    pub rows_requested: u64,
    pub rows_generated: u64,
    pub columns: Vec<ColumnReport>,
    pub sentinels_total: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

impl GenerationReport {
    pub fn new(run_id: String, seed: u64, rows_requested: u64) -> Self {
        Self {
            run_id,
            seed,
            rows_requested,
            rows_generated: 0,
            columns: Vec::new(),
            sentinels_total: 0,
            bytes_written: 0,
            duration_ms: 0,
        }
    }

    pub fn record_column(&mut self, column: ColumnReport) {
        self.sentinels_total += column.sentinel_count;
        self.columns.push(column);
    }

    /// Columns that rendered at least one sentinel.
    pub fn columns_with_sentinels(&self) -> impl Iterator<Item = &ColumnReport> {
        self.columns.iter().filter(|col| col.sentinel_count > 0)
    }
}
