use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use rowsmith_core::{
    ColumnDefinition, ColumnOrigin, ColumnRule, Dataset, Record, Schema, validate_new_columns,
};

use crate::errors::GenerationError;
use crate::generators::generate_cell;
use crate::model::{ColumnReport, GenerateOptions, GenerationReport};
use crate::output::csv::write_rows_csv;

/// Validated, read-only snapshot of a generation request.
///
/// Holds the combined column list (existing columns first, then new columns
/// keyed by their trimmed name) and the rule for each column.
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    columns: Arc<[String]>,
    origins: Vec<ColumnOrigin>,
    rules: Vec<ColumnRule>,
    row_count: u64,
}

/// Check every request-level precondition and snapshot the schema.
///
/// Checks run in order: something to generate, a positive row count, then
/// new-column naming. Nothing is generated when any check fails.
pub fn prepare(
    existing_columns: &[ColumnDefinition],
    new_columns: &[ColumnDefinition],
    row_count: i64,
) -> Result<PreparedDataset, GenerationError> {
    if existing_columns.is_empty() && new_columns.is_empty() {
        return Err(GenerationError::NothingToGenerate);
    }
    let rows = u64::try_from(row_count)
        .ok()
        .filter(|rows| *rows > 0)
        .ok_or(GenerationError::InvalidRowCount(row_count))?;
    validate_new_columns(
        existing_columns.iter().map(|col| col.name.as_str()),
        new_columns,
    )?;

    let mut columns = Vec::with_capacity(existing_columns.len() + new_columns.len());
    let mut origins = Vec::with_capacity(columns.capacity());
    let mut rules = Vec::with_capacity(columns.capacity());
    for col in existing_columns {
        columns.push(col.name.clone());
        origins.push(ColumnOrigin::Existing);
        rules.push(col.rule.clone());
    }
    for col in new_columns {
        columns.push(col.trimmed_name().to_string());
        origins.push(ColumnOrigin::New);
        rules.push(col.rule.clone());
    }

    debug!(
        columns = columns.len(),
        existing = existing_columns.len(),
        new = new_columns.len(),
        rows,
        "schema prepared"
    );

    Ok(PreparedDataset {
        columns: Arc::from(columns),
        origins,
        rules,
        row_count: rows,
    })
}

impl PreparedDataset {
    pub fn from_schema(schema: &Schema, row_count: i64) -> Result<Self, GenerationError> {
        prepare(&schema.existing_columns, &schema.new_columns, row_count)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Lazy record sequence for `seed`.
    ///
    /// Every row draws from its own RNG derived from `(seed, row_index)`, so
    /// calling this again with the same seed replays identical records.
    pub fn rows(&self, seed: u64) -> Rows<'_> {
        Rows {
            prepared: self,
            seed,
            next_row: 0,
            sentinels: vec![0; self.rules.len()],
        }
    }

    /// Generate every row into memory.
    ///
    /// Any internal failure aborts the whole batch; no partial dataset is
    /// returned.
    pub fn materialize(&self, seed: u64) -> Result<Dataset, GenerationError> {
        self.materialize_counted(seed).map(|(dataset, _)| dataset)
    }

    fn materialize_counted(&self, seed: u64) -> Result<(Dataset, Vec<u64>), GenerationError> {
        let mut records = self.reserve_records()?;
        std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut rows = self.rows(seed);
            for record in rows.by_ref() {
                records.push(record);
            }
            let dataset = Dataset::new(Arc::clone(&self.columns), records);
            (dataset, rows.into_sentinel_counts())
        }))
        .map_err(|panic| GenerationError::Failed(panic_message(panic)))
    }

    /// Record buffer sized for every row.
    ///
    /// Allocation failure is reported as an error; an infallible allocation
    /// of this size would abort the process instead.
    fn reserve_records(&self) -> Result<Vec<Record>, GenerationError> {
        let too_large = |detail: String| {
            GenerationError::Failed(format!(
                "cannot hold {} rows in memory: {detail}",
                self.row_count
            ))
        };
        let rows = usize::try_from(self.row_count).map_err(|err| too_large(err.to_string()))?;
        let mut records = Vec::new();
        records
            .try_reserve_exact(rows)
            .map_err(|err| too_large(err.to_string()))?;
        Ok(records)
    }

    fn record_at(&self, seed: u64, row_index: u64, sentinels: &mut [u64]) -> Record {
        let mut rng = ChaCha8Rng::seed_from_u64(hash_row_seed(seed, row_index));
        Record::build(Arc::clone(&self.columns), |idx| {
            let cell = generate_cell(&self.rules[idx], &mut rng);
            if cell.is_sentinel() {
                sentinels[idx] += 1;
            }
            cell.into_string()
        })
    }

    fn report(&self, run_id: String, seed: u64, rows_generated: u64, sentinels: &[u64]) -> GenerationReport {
        let mut report = GenerationReport::new(run_id, seed, self.row_count);
        report.rows_generated = rows_generated;
        for (idx, name) in self.columns.iter().enumerate() {
            report.record_column(ColumnReport {
                name: name.clone(),
                origin: self.origins[idx],
                rule: self.rules[idx].kind().to_string(),
                sentinel_count: sentinels.get(idx).copied().unwrap_or(0),
            });
        }
        report
    }
}

/// Lazy, restartable sequence of generated records.
#[derive(Debug)]
pub struct Rows<'a> {
    prepared: &'a PreparedDataset,
    seed: u64,
    next_row: u64,
    sentinels: Vec<u64>,
}

impl Rows<'_> {
    /// Sentinel cells produced so far, per column.
    pub fn into_sentinel_counts(self) -> Vec<u64> {
        self.sentinels
    }
}

impl Iterator for Rows<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        if self.next_row >= self.prepared.row_count {
            return None;
        }
        let record = self
            .prepared
            .record_at(self.seed, self.next_row, &mut self.sentinels);
        self.next_row += 1;
        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.prepared.row_count - self.next_row;
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl ExactSizeIterator for Rows<'_> {}

/// Validate the request and build the full dataset, drawing the run seed
/// from `rng`.
pub fn generate_dataset(
    existing_columns: &[ColumnDefinition],
    new_columns: &[ColumnDefinition],
    row_count: i64,
    rng: &mut dyn RngCore,
) -> Result<Dataset, GenerationError> {
    let prepared = prepare(existing_columns, new_columns, row_count)?;
    prepared.materialize(rng.next_u64())
}

/// Materialized dataset plus its run report.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub dataset: Dataset,
    pub report: GenerationReport,
}

/// Outcome of a streamed CSV run.
#[derive(Debug, Clone)]
pub struct CsvGeneration {
    pub path: PathBuf,
    pub report: GenerationReport,
    /// Leading records, up to `GenerateOptions::preview_rows`.
    pub preview: Vec<Record>,
}

/// Entry point for generating datasets from a schema snapshot.
#[derive(Debug, Clone, Default)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate the full dataset in memory.
    pub fn run(&self, schema: &Schema, row_count: i64) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        let prepared = PreparedDataset::from_schema(schema, row_count)?;
        let seed = self.resolve_seed();
        let run_id = self.resolve_run_id();

        info!(
            run_id = %run_id,
            rows = prepared.row_count,
            columns = prepared.columns.len(),
            seed,
            "generation started"
        );

        let (dataset, sentinels) = prepared.materialize_counted(seed).inspect_err(|err| {
            warn!(run_id = %run_id, error = %err, "generation failed");
        })?;

        let mut report = prepared.report(run_id, seed, dataset.len() as u64, &sentinels);
        report.duration_ms = start.elapsed().as_millis() as u64;
        finish(&report);

        Ok(GenerationResult { dataset, report })
    }

    /// Stream the dataset to `path` as CSV.
    ///
    /// Rows are written to a temporary sibling file that replaces `path`
    /// only once every row succeeded.
    pub fn run_to_csv(
        &self,
        schema: &Schema,
        row_count: i64,
        path: &Path,
    ) -> Result<CsvGeneration, GenerationError> {
        let start = Instant::now();
        let prepared = PreparedDataset::from_schema(schema, row_count)?;
        let seed = self.resolve_seed();
        let run_id = self.resolve_run_id();
        let tmp_path = temp_path(path);
        let preview_rows = self.options.preview_rows;

        info!(
            run_id = %run_id,
            rows = prepared.row_count,
            columns = prepared.columns.len(),
            seed,
            path = %path.display(),
            "generation started"
        );

        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(
            || -> Result<(u64, Vec<u64>, Vec<Record>), GenerationError> {
                let mut rows = prepared.rows(seed);
                let mut preview = Vec::new();
                let stream = rows.by_ref().inspect(|record| {
                    if preview.len() < preview_rows {
                        preview.push(record.clone());
                    }
                });
                let bytes = write_rows_csv(&tmp_path, &prepared.columns, stream)?;
                Ok((bytes, rows.into_sentinel_counts(), preview))
            },
        ));

        let (bytes_written, sentinels, preview) = match outcome {
            Ok(Ok(done)) => done,
            Ok(Err(err)) => {
                discard(&tmp_path);
                warn!(run_id = %run_id, error = %err, "generation failed");
                return Err(err);
            }
            Err(panic) => {
                discard(&tmp_path);
                let message = panic_message(panic);
                warn!(run_id = %run_id, error = %message, "generation panicked");
                return Err(GenerationError::Failed(message));
            }
        };
        std::fs::rename(&tmp_path, path)?;

        let mut report = prepared.report(run_id, seed, prepared.row_count, &sentinels);
        report.bytes_written = bytes_written;
        report.duration_ms = start.elapsed().as_millis() as u64;
        finish(&report);

        Ok(CsvGeneration {
            path: path.to_path_buf(),
            report,
            preview,
        })
    }

    fn resolve_run_id(&self) -> String {
        self.options
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }

    fn resolve_seed(&self) -> u64 {
        self.options.seed.unwrap_or_else(|| rand::rng().random())
    }
}

fn finish(report: &GenerationReport) {
    for column in report.columns_with_sentinels() {
        warn!(
            column = %column.name,
            rule = %column.rule,
            count = column.sentinel_count,
            "column rendered sentinel values"
        );
    }
    info!(
        run_id = %report.run_id,
        rows_generated = report.rows_generated,
        sentinels = report.sentinels_total,
        bytes_written = report.bytes_written,
        duration_ms = report.duration_ms,
        "generation completed"
    );
}

/// Sibling temp file, unique per call so concurrent runs never share one.
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset.csv".to_string());
    path.with_file_name(format!("{file_name}.{}.tmp", uuid::Uuid::new_v4().simple()))
}

fn discard(path: &Path) {
    if let Err(err) = std::fs::remove_file(path) {
        if err.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %err, "failed to remove partial output");
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic during generation".to_string()
    }
}

fn hash_row_seed(seed: u64, row_index: u64) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    hash ^= row_index.wrapping_mul(0x9e3779b97f4a7c15);
    hash = hash.wrapping_mul(0x100000001b3);
    hash
}
