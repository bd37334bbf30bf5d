use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use qini_analysis::{PlotSeries, QiniEvaluator, QiniReport};
use serde::Serialize;
use uplift_core::DataFrame;
use uplift_data::{file_sizes, read_csv, reduce_csv, write_csv, SimulationConfig};

use crate::args::Args;
use crate::config::QiniConfig;

const DEFAULT_FRACTION: f64 = 0.01;
const DEFAULT_SIM_BINS: usize = 20;

/// Output locations shared by `evaluate` and `simulate`.
struct Outputs {
    json: Option<PathBuf>,
    plot: Option<PathBuf>,
}

impl Outputs {
    fn from_args(args: &Args) -> Result<Self> {
        Ok(Self {
            json: args.value("--json")?.map(PathBuf::from),
            plot: args.value("--plot")?.map(PathBuf::from),
        })
    }
}

/// Apply command-line overrides on top of the environment config.
fn override_config(mut config: QiniConfig, args: &Args) -> Result<QiniConfig> {
    if let Some(n_bins) = args.parsed::<usize>("--bins")? {
        config.n_bins = n_bins;
    }
    if let Some(col) = args.value("--treatment")? {
        config.treatment_col = col.to_string();
    }
    if let Some(col) = args.value("--outcome")? {
        config.outcome_col = col.to_string();
    }
    if let Some(col) = args.value("--uplift")? {
        config.uplift_col = col.to_string();
    }
    if args.has_flag("--include-final-bin") {
        config.include_final_bin = true;
    }
    config.validate()?;
    Ok(config)
}

pub fn evaluate(config: QiniConfig, args: &Args) -> Result<QiniReport> {
    let config = override_config(config, args)?;
    let input = PathBuf::from(args.required("--input")?);

    let frame = read_csv(&input)?;
    let report = evaluate_frame(&frame, &config)
        .with_context(|| format!("Failed to evaluate {}", input.display()))?;

    write_outputs(&report, &Outputs::from_args(args)?)?;
    Ok(report)
}

pub fn simulate(config: QiniConfig, args: &Args) -> Result<QiniReport> {
    let mut config = config;
    if args.value("--bins")?.is_none() {
        config.n_bins = DEFAULT_SIM_BINS;
    }
    let config = override_config(config, args)?;

    let defaults = SimulationConfig::default();
    let sim = SimulationConfig {
        size: args.parsed("--size")?.unwrap_or(defaults.size),
        seed: args.parsed("--seed")?.unwrap_or(defaults.seed),
        ..defaults
    };
    tracing::info!("Simulating {} rows (seed {})", sim.size, sim.seed);
    let frame = sim.simulate()?;

    if let Some(output) = args.value("--output")? {
        write_csv(&frame, Path::new(output))?;
    }

    // The simulated frame always uses the default column names.
    let config = QiniConfig {
        treatment_col: "treatment".to_string(),
        outcome_col: "outcome".to_string(),
        uplift_col: "predicted_uplift".to_string(),
        ..config
    };
    let report = evaluate_frame(&frame, &config)?;
    write_outputs(&report, &Outputs::from_args(args)?)?;
    Ok(report)
}

pub fn reduce(args: &Args) -> Result<()> {
    let input = PathBuf::from(args.required("--input")?);
    let output = PathBuf::from(args.required("--output")?);
    let fraction = args.parsed("--fraction")?.unwrap_or(DEFAULT_FRACTION);

    log_sizes(&[&input]);
    let stats = reduce_csv(&input, &output, fraction)?;
    log_sizes(&[&output]);

    println!("Kept {} of {} rows", stats.kept_rows, stats.total_rows);
    Ok(())
}

pub fn files(args: &Args) -> Result<()> {
    for size in file_sizes(&args.positional()) {
        println!("{}", size);
    }
    Ok(())
}

fn evaluate_frame(frame: &DataFrame, config: &QiniConfig) -> Result<QiniReport> {
    let evaluator = QiniEvaluator::new(config.mapping(), config.builder());
    Ok(evaluator.evaluate(frame)?)
}

fn log_sizes(paths: &[&PathBuf]) {
    for size in file_sizes(paths) {
        tracing::info!("{}", size);
    }
}

fn write_outputs(report: &QiniReport, outputs: &Outputs) -> Result<()> {
    if let Some(path) = &outputs.json {
        write_json(path, report)?;
    }
    if let Some(path) = &outputs.plot {
        write_json(path, &PlotSeries::from_curve(&report.points)?)?;
    }
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

pub fn print_report(report: &QiniReport) {
    println!(
        "{} records ({} treated, {} control), {} bins",
        report.n_records, report.n_treated, report.n_control, report.n_bins
    );
    for point in report.points.points() {
        println!(
            "  {:>6.1}%  {:>12.4}",
            point.population_fraction * 100.0,
            point.uplift_value
        );
    }
    println!("Qini AUC: {:.4}", report.auc);
}
