use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use serde::Serialize;

use rowsmith_core::Schema;
use rowsmith_generate::{GenerationReport, OUTPUT_FILE_NAME};

use super::RegistryResult;

/// Metadata captured at run start.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub plan_path: PathBuf,
    pub template_path: Option<PathBuf>,
    pub rows: i64,
    pub seed: u64,
    pub strict: bool,
    pub run_dir: PathBuf,
}

/// JSON config written to each run directory.
#[derive(Debug, Serialize)]
pub struct RunConfig<'a> {
    pub run_id: &'a str,
    pub started_at: String,
    pub plan: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<&'a Path>,
    pub rows: i64,
    pub seed: u64,
    pub strict: bool,
    pub schema: &'a Schema,
    pub git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
pub struct GitInfo {
    pub commit: Option<String>,
    pub dirty: Option<bool>,
}

/// Paths for run artifacts.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
    pub logs_path: PathBuf,
    pub report_path: PathBuf,
    pub dataset_path: PathBuf,
}

pub fn start_run(ctx: &RunContext, schema: &Schema) -> RegistryResult<RunPaths> {
    let timestamp = ctx.started_at.format("%Y-%m-%dT%H-%M-%SZ").to_string();
    let root = ctx.run_dir.join(format!("{timestamp}__run_{}", ctx.run_id));

    create_dir_all(&root)?;

    let paths = RunPaths {
        config_path: root.join("config.json"),
        logs_path: root.join("logs.ndjson"),
        report_path: root.join("generation_report.json"),
        dataset_path: root.join(OUTPUT_FILE_NAME),
        root,
    };

    let config = RunConfig {
        run_id: &ctx.run_id,
        started_at: ctx.started_at.to_rfc3339(),
        plan: &ctx.plan_path,
        template: ctx.template_path.as_deref(),
        rows: ctx.rows,
        seed: ctx.seed,
        strict: ctx.strict,
        schema,
        git: collect_git_info(),
    };

    write_json(&paths.config_path, &config)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&paths.logs_path)?;

    Ok(paths)
}

pub fn write_report(paths: &RunPaths, report: &GenerationReport) -> RegistryResult<()> {
    write_json(&paths.report_path, report)
}

/// Copy the run's dataset to a user-chosen path.
pub fn copy_output(paths: &RunPaths, out_path: &Path) -> RegistryResult<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    std::fs::copy(&paths.dataset_path, out_path)?;
    Ok(())
}

pub fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

/// Write pretty JSON through a sibling temp file and rename it into place.
fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let data = serde_json::to_vec_pretty(value)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(&tmp_path)?;
    file.write_all(&data)?;
    file.sync_all()?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use rowsmith_core::{ColumnDefinition, ColumnRule};

    use super::*;

    fn temp_run_dir() -> PathBuf {
        std::env::temp_dir().join(format!("rowsmith_runs_{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn start_run_lays_out_artifacts() {
        let run_dir = temp_run_dir();
        let started_at = DateTime::parse_from_rfc3339("2024-05-17T08:30:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        let ctx = RunContext {
            run_id: "abc".to_string(),
            started_at,
            plan_path: PathBuf::from("plan.json"),
            template_path: None,
            rows: 5,
            seed: 9,
            strict: false,
            run_dir: run_dir.clone(),
        };
        let schema = Schema::new(
            Vec::new(),
            vec![ColumnDefinition::new("a", ColumnRule::default())],
        );

        let paths = start_run(&ctx, &schema).expect("start run");

        assert_eq!(paths.root, run_dir.join("2024-05-17T08-30-00Z__run_abc"));
        assert!(paths.logs_path.exists());
        assert_eq!(paths.dataset_path.file_name().and_then(|n| n.to_str()), Some("augmented_dataset.csv"));

        let config: serde_json::Value = serde_json::from_slice(
            &std::fs::read(&paths.config_path).expect("read config"),
        )
        .expect("parse config");
        assert_eq!(config["run_id"], "abc");
        assert_eq!(config["seed"], 9);
        assert_eq!(config["schema"]["new_columns"][0]["name"], "a");
        assert!(config.get("template").is_none());
        assert!(!paths.root.join("config.json.tmp").exists());

        std::fs::remove_dir_all(&run_dir).ok();
    }

    #[test]
    fn copy_output_creates_parent_dirs() {
        let run_dir = temp_run_dir();
        let root = run_dir.join("run");
        create_dir_all(&root).expect("create run dir");
        let paths = RunPaths {
            config_path: root.join("config.json"),
            logs_path: root.join("logs.ndjson"),
            report_path: root.join("generation_report.json"),
            dataset_path: root.join(OUTPUT_FILE_NAME),
            root: root.clone(),
        };
        std::fs::write(&paths.dataset_path, "\"a\"\n").expect("write dataset");

        let out = run_dir.join("exports/nested/out.csv");
        copy_output(&paths, &out).expect("copy");
        assert_eq!(std::fs::read_to_string(&out).expect("read"), "\"a\"\n");

        std::fs::remove_dir_all(&run_dir).ok();
    }
}
