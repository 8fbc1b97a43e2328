mod preview;
mod registry;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use registry::{RunContext, copy_output, init_run_logging, init_stderr_logging, start_run, write_report};
use rowsmith_generate::{
    GenerateOptions, GenerationEngine, GenerationError, TemplateError, read_template_columns,
};
use rowsmith_plan::{
    Plan, PlanError, ValidationReport, load_plan_value, plan_json_schema, resolve_schema,
    validate_plan_against_template, validate_plan_json,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
    #[error("{0}")]
    Generation(#[from] GenerationError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("plan validation failed with {errors} error(s) and {warnings} warning(s)")]
    InvalidPlan { errors: usize, warnings: usize },
}

#[derive(Parser, Debug)]
#[command(name = "rowsmith", version, about = "Augment tabular datasets with synthetic rows")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a dataset from a plan into a new run directory.
    Generate(GenerateArgs),
    /// Check a plan against its template without generating.
    Validate(ValidateArgs),
    /// Print the JSON Schema for plan files.
    PlanSchema,
    /// Print the column names of a CSV template.
    Columns(ColumnsArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Plan file (.json or .toml).
    #[arg(long)]
    plan: PathBuf,
    /// CSV template; overrides the plan's template.
    #[arg(long)]
    template: Option<PathBuf>,
    /// Row count; overrides the plan's rows.
    #[arg(long, allow_negative_numbers = true)]
    rows: Option<i64>,
    /// Seed; overrides the plan's seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Also copy the dataset to this path.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Number of records to print after generation.
    #[arg(long, default_value_t = rowsmith_core::DEFAULT_PREVIEW_ROWS)]
    preview: usize,
    /// Treat plan warnings as errors.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Plan file (.json or .toml).
    #[arg(long)]
    plan: PathBuf,
    /// CSV template; overrides the plan's template.
    #[arg(long)]
    template: Option<PathBuf>,
    /// Treat plan warnings as errors.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Print the validation report as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct ColumnsArgs {
    /// CSV template to read.
    #[arg(long)]
    template: PathBuf,
}

/// Plan parsed and checked against its template.
struct CheckedPlan {
    plan: Plan,
    template_path: Option<PathBuf>,
    template_columns: Vec<String>,
    report: ValidationReport,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Validate(args) => run_validate(args),
        Command::PlanSchema => run_plan_schema(),
        Command::Columns(args) => run_columns(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let GenerateArgs {
        plan: plan_path,
        template,
        rows,
        seed,
        run_dir,
        out,
        preview,
        strict,
    } = args;

    let checked = check_plan(&plan_path, template, rows)?;
    print_report(&checked.report);
    ensure_valid(&checked.report, strict)?;

    let CheckedPlan {
        plan,
        template_path,
        template_columns,
        ..
    } = checked;
    let schema = resolve_schema(&plan, &template_columns);
    let seed = seed.or(plan.seed).unwrap_or_else(|| rand::rng().random());

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        plan_path,
        template_path,
        rows: plan.rows,
        seed,
        strict,
        run_dir,
    };

    let run_paths = start_run(&run_ctx, &schema)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, seed, rows = plan.rows);

    let timer = Instant::now();
    let engine = GenerationEngine::new(GenerateOptions {
        seed: Some(seed),
        run_id: Some(run_id.clone()),
        preview_rows: preview,
    });
    let result = engine
        .run_to_csv(&schema, plan.rows, &run_paths.dataset_path)
        .inspect_err(|err| {
            tracing::error!(event = "run_finished", status = "failed", error = %err);
        })?;
    tracing::info!(event = "dataset_written", path = %result.path.display());

    write_report(&run_paths, &result.report)?;
    tracing::info!(event = "report_written", path = %run_paths.report_path.display());

    if let Some(out) = out.as_deref() {
        copy_output(&run_paths, out)?;
        tracing::info!(event = "dataset_copied", path = %out.display());
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    if !result.preview.is_empty() {
        print!("{}", preview::render_table(&schema.header(), &result.preview));
    }
    println!("run_dir={}", run_paths.root.display());
    println!("seed={seed}");
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    init_stderr_logging()?;

    let checked = check_plan(&args.plan, args.template, None)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&checked.report)?);
    } else {
        print_report(&checked.report);
    }
    ensure_valid(&checked.report, args.strict)?;

    let schema = resolve_schema(&checked.plan, &checked.template_columns);
    tracing::info!(
        event = "plan_validated",
        columns = schema.len(),
        warnings = checked.report.warnings.len()
    );
    if !args.json {
        println!("plan is valid: {} column(s), {} row(s)", schema.len(), checked.plan.rows);
    }
    Ok(())
}

fn run_plan_schema() -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&plan_json_schema())?;
    println!("{json}");
    Ok(())
}

fn run_columns(args: ColumnsArgs) -> Result<(), CliError> {
    for name in read_template_columns(&args.template)? {
        println!("{name}");
    }
    Ok(())
}

/// Load the plan, apply overrides, read the template, and collect issues.
///
/// Structural problems are returned as an error report without reading the
/// template.
fn check_plan(
    plan_path: &Path,
    template_override: Option<PathBuf>,
    rows_override: Option<i64>,
) -> Result<CheckedPlan, CliError> {
    let plan_json = load_plan_value(plan_path)?;
    let plan_schema = serde_json::to_value(plan_json_schema())?;

    let structural = validate_plan_json(&plan_json, &plan_schema)?;
    if !structural.is_ok() {
        print_report(&structural);
        return Err(CliError::InvalidPlan {
            errors: structural.errors.len(),
            warnings: structural.warnings.len(),
        });
    }

    let mut plan = Plan::from_value(plan_json)?;
    if let Some(rows) = rows_override {
        plan.rows = rows;
    }

    let template_path = template_override.or_else(|| plan.template_path(plan_path));
    let template_columns = match &template_path {
        Some(path) => read_template_columns(path)?,
        None => Vec::new(),
    };
    let report = validate_plan_against_template(&plan, &template_columns);

    Ok(CheckedPlan {
        plan,
        template_path,
        template_columns,
        report,
    })
}

fn ensure_valid(report: &ValidationReport, strict: bool) -> Result<(), CliError> {
    if report.is_ok() && (!strict || report.is_clean()) {
        return Ok(());
    }
    Err(CliError::InvalidPlan {
        errors: report.errors.len(),
        warnings: report.warnings.len(),
    })
}

fn print_report(report: &ValidationReport) {
    for issue in &report.errors {
        eprintln!("error {} {}: {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            eprintln!("  hint: {hint}");
        }
    }
    for issue in &report.warnings {
        eprintln!("warning {} {}: {}", issue.code, issue.path, issue.message);
        if let Some(hint) = &issue.hint {
            eprintln!("  hint: {hint}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsmith_plan::{IssueSeverity, ValidationIssue};

    fn warning() -> ValidationIssue {
        ValidationIssue::new(IssueSeverity::Warning, "default_rule", "/columns", "w", None)
    }

    #[test]
    fn cli_parses_generate_overrides() {
        let cli = Cli::parse_from([
            "rowsmith", "generate", "--plan", "p.json", "--rows", "25", "--seed", "7", "--strict",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.rows, Some(25));
                assert_eq!(args.seed, Some(7));
                assert!(args.strict);
                assert_eq!(args.preview, 10);
                assert_eq!(args.run_dir, PathBuf::from("runs"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn strict_mode_rejects_warnings() {
        let mut report = ValidationReport::default();
        report.push_warning(warning());
        assert!(ensure_valid(&report, false).is_ok());
        assert!(matches!(
            ensure_valid(&report, true),
            Err(CliError::InvalidPlan { errors: 0, warnings: 1 })
        ));
    }

    #[test]
    fn check_plan_reads_relative_template() {
        let plan_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../plans/examples/basic.plan.toml");
        let checked = check_plan(&plan_path, None, Some(3)).expect("check plan");
        assert_eq!(checked.plan.rows, 3);
        assert_eq!(checked.template_columns, ["id", "name", "age", "signup_date"]);
        assert!(checked.report.is_clean(), "{:?}", checked.report);
    }

    #[test]
    fn validation_report_serializes_for_json_output() {
        let cli = Cli::parse_from(["rowsmith", "validate", "--plan", "p.json", "--json"]);
        assert!(matches!(cli.command, Command::Validate(ValidateArgs { json: true, .. })));

        let plan_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../plans/examples/new_columns_only.plan.json");
        let checked = check_plan(&plan_path, None, Some(0)).expect("check plan");
        let json = serde_json::to_value(&checked.report).expect("serialize report");
        assert_eq!(json["errors"][0]["code"], "invalid_row_count");
        assert_eq!(json["errors"][0]["severity"], "error");
        assert!(json["warnings"].is_array());
    }

    #[test]
    fn rows_override_is_validated() {
        let plan_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("../../plans/examples/new_columns_only.plan.json");
        let checked = check_plan(&plan_path, None, Some(0)).expect("check plan");
        assert_eq!(checked.report.errors[0].code, "invalid_row_count");
    }
}
