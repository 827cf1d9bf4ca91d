//! rescopy - resource copy for build pipelines
//!
//! Runs the targets of a JSON task file: glob-selected resources are copied
//! into a destination tree, optionally renamed and minified.

use clap::{Parser, ValueEnum};
use rescopy::{CopyConfig, CopyEngine, CopyOptions, Error as RescopyError, PlanItem, RunTotals};
use serde_json::{Value, json};
use std::io;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// rescopy - copy, rename and minify build resources
///
/// Reads named targets from a JSON task file and runs them in order. With no
/// TARGET arguments every target in the file runs.
///
/// Usage:
///   rescopy [TARGET]...
///   rescopy -c build/resources.json debug compress
#[derive(Parser, Debug)]
#[command(name = "rescopy", version, about, long_about = None)]
struct Args {
    /// Targets to run (default: all, in file order)
    targets: Vec<String>,

    /// Task file
    #[arg(short = 'c', long, default_value = "rescopy.json", value_name = "FILE")]
    config: PathBuf,

    /// Number of read/minify workers
    #[arg(short = 'j', long, default_value = "1")]
    jobs: usize,

    /// Let wildcards match names starting with '.'
    #[arg(long)]
    dot: bool,

    /// Do not call fsync after each file (faster but less safe)
    #[arg(long)]
    no_sync: bool,

    /// Print what would be copied without actually copying
    #[arg(short = 'n', long = "plan", alias = "dry-run")]
    plan: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    output: OutputMode,

    /// Do not print a line per copied file
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(RescopyError),

    #[error("Target not found: {name} (available: {available})")]
    UnknownTarget { name: String, available: String },

    #[error("Target {target} failed: {source}")]
    Run {
        target: String,
        source: RescopyError,
    },

    #[error("Failed to serialize JSON output: {source}")]
    JsonSerialize { source: serde_json::Error },
}

impl CliError {
    fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) | Self::UnknownTarget { .. } => "config",
            Self::Run { .. } => "io",
            Self::JsonSerialize { .. } => "internal",
        }
    }

    fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::UnknownTarget { .. } => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct TargetReport {
    name: String,
    totals: RunTotals,
}

impl TargetReport {
    fn to_json_value(&self) -> Value {
        json!({
            "name": self.name,
            "files_copied": self.totals.files_copied,
            "files_skipped": self.totals.files_skipped,
            "warnings": self
                .totals
                .warnings
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            "duration_ms": u64::try_from(self.totals.duration.as_millis()).unwrap_or(u64::MAX),
        })
    }
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error[{}]: {}", error.kind(), error);
        std::process::exit(error.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn run() -> CliResult<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = CopyConfig::from_path(&args.config).map_err(CliError::Config)?;
    let targets = select_targets(&args, &config)?;
    let engine = CopyEngine::new(build_options(&args));

    if args.plan {
        return emit_plan(&args, &config, &engine, &targets);
    }

    let start_time = Instant::now();
    let mut reports = Vec::with_capacity(targets.len());
    for name in &targets {
        if args.output == OutputMode::Human && !args.quiet {
            println!("Running \"{name}\" target");
        }
        let totals = engine
            .run_task(&config, name)
            .map_err(|source| CliError::Run {
                target: name.clone(),
                source,
            })?;
        if args.output == OutputMode::Human {
            print_totals(&totals, args.verbose);
        }
        reports.push(TargetReport {
            name: name.clone(),
            totals,
        });
    }

    match args.output {
        OutputMode::Human => {
            if args.verbose {
                eprintln!("Done in {:?}", start_time.elapsed());
            }
            Ok(())
        }
        OutputMode::Json => print_json_value(&json!({
            "schema_version": "1.0",
            "mode": "execute",
            "targets": reports.iter().map(TargetReport::to_json_value).collect::<Vec<Value>>(),
        })),
    }
}

fn select_targets(args: &Args, config: &CopyConfig) -> CliResult<Vec<String>> {
    if args.targets.is_empty() {
        return Ok(config.target_names().map(str::to_owned).collect());
    }
    for name in &args.targets {
        if !config.target_names().any(|t| t == name) {
            return Err(CliError::UnknownTarget {
                name: name.clone(),
                available: config.target_names().collect::<Vec<_>>().join(", "),
            });
        }
    }
    Ok(args.targets.clone())
}

fn build_options(args: &Args) -> CopyOptions {
    let mut options = CopyOptions::default().with_parallel(args.jobs);
    if args.no_sync {
        options = options.without_fsync();
    }
    if args.dot {
        options = options.with_dot();
    }

    // JSON mode leaves both handlers unset so messages go to stderr via tracing.
    if args.output == OutputMode::Human {
        options = options.with_warn_handler(|msg| {
            eprintln!("warning: {}", msg);
        });
        if !args.quiet {
            options = options.with_log_handler(|msg| {
                println!("{}", msg);
            });
        }
    }
    options
}

fn print_totals(totals: &RunTotals, verbose: bool) {
    if let Some(summary) = totals.summary() {
        println!("{summary}");
    }
    if verbose {
        eprintln!(
            "  copied: {}, skipped: {}, warnings: {}, took {:?}",
            totals.files_copied,
            totals.files_skipped,
            totals.warnings.len(),
            totals.duration
        );
    }
}

fn plan_action(item: &PlanItem) -> &'static str {
    if item.compress { "minify" } else { "copy" }
}

fn emit_plan(
    args: &Args,
    config: &CopyConfig,
    engine: &CopyEngine,
    targets: &[String],
) -> CliResult<()> {
    let mut planned: Vec<(String, Vec<PlanItem>)> = Vec::with_capacity(targets.len());
    for name in targets {
        let rules = match config.task(name) {
            Ok(task) => task.rules,
            Err(e) if e.is_config_error() => {
                eprintln!("warning: [{name}] {e}");
                Vec::new()
            }
            Err(e) => return Err(CliError::Config(e)),
        };
        let items = engine.plan(&rules).map_err(|source| CliError::Run {
            target: name.clone(),
            source,
        })?;
        planned.push((name.clone(), items));
    }

    match args.output {
        OutputMode::Human => {
            for (name, items) in &planned {
                println!("Plan for \"{}\" ({} items):", name, items.len());
                for item in items {
                    println!(
                        "  {} {} -> {}",
                        plan_action(item),
                        item.source,
                        item.destination
                    );
                }
            }
            Ok(())
        }
        OutputMode::Json => {
            let targets: Vec<Value> = planned
                .iter()
                .map(|(name, items)| {
                    json!({
                        "name": name,
                        "items": items
                            .iter()
                            .map(|item| json!({
                                "source": item.source,
                                "destination": item.destination,
                                "action": plan_action(item),
                            }))
                            .collect::<Vec<Value>>(),
                    })
                })
                .collect();
            print_json_value(&json!({
                "schema_version": "1.0",
                "mode": "plan",
                "targets": targets,
            }))
        }
    }
}

fn print_json_value(value: &Value) -> CliResult<()> {
    let serialized =
        serde_json::to_string(value).map_err(|source| CliError::JsonSerialize { source })?;
    println!("{serialized}");
    Ok(())
}
