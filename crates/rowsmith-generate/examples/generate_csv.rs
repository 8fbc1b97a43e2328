use std::env;
use std::path::PathBuf;

use rowsmith_core::{Charset, ColumnDefinition, ColumnRule, Schema};
use rowsmith_generate::{
    GenerateOptions, GenerationEngine, OUTPUT_FILE_NAME, default_columns, read_template_columns,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut template_path: Option<PathBuf> = None;
    let mut out_path: Option<PathBuf> = None;
    let mut rows: i64 = 20;
    let mut seed: Option<u64> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--template" => template_path = args.next().map(PathBuf::from),
            "--out" => out_path = args.next().map(PathBuf::from),
            "--rows" => rows = args.next().ok_or("missing --rows value")?.parse()?,
            "--seed" => seed = Some(args.next().ok_or("missing --seed value")?.parse()?),
            _ => return Err(format!("unexpected argument: {arg}").into()),
        }
    }

    let existing = match template_path {
        Some(path) => default_columns(read_template_columns(&path)?),
        None => Vec::new(),
    };
    let new_columns = vec![
        ColumnDefinition::new(
            "customer_code",
            ColumnRule::UniqueId {
                length: 10,
                charset: Charset::Alphanumeric,
            },
        ),
        ColumnDefinition::new(
            "segment",
            ColumnRule::Categorical {
                values: "retail, wholesale, online".into(),
            },
        ),
        ColumnDefinition::new(
            "score",
            ColumnRule::Range {
                min: 0.0.into(),
                max: 100.0.into(),
                decimal_places: Some(2),
            },
        ),
    ];
    let schema = Schema::new(existing, new_columns);

    let out_path = out_path.unwrap_or_else(|| env::temp_dir().join(OUTPUT_FILE_NAME));
    let engine = GenerationEngine::new(GenerateOptions {
        seed,
        ..GenerateOptions::default()
    });
    let result = engine.run_to_csv(&schema, rows, &out_path)?;

    println!("output={}", result.path.display());
    println!("seed={}", result.report.seed);
    for record in &result.preview {
        println!("{}", record.values().join(" | "));
    }
    Ok(())
}
