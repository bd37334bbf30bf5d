//! qini-cli: Evaluate uplift model predictions with a Qini curve.
//!
//! Usage:
//!   cargo run -p qini-cli -- evaluate --input scored.csv --bins 10
//!   cargo run -p qini-cli -- evaluate --input scored.csv.gz --json report.json --plot plot.json
//!   cargo run -p qini-cli -- simulate --size 10000 --seed 42
//!   cargo run -p qini-cli -- reduce --input uplift_train.csv.gz --output small_uplift_train.csv --fraction 0.01
//!   cargo run -p qini-cli -- files small_clients.csv small_uplift_train.csv

mod args;
mod commands;
mod config;

use anyhow::Result;

use args::Args;
use config::QiniConfig;

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "qini_cli=info,qini_analysis=info,uplift_data=info".into());

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  qini-cli evaluate --input PATH        Qini curve + AUC for a scored CSV (.csv or .csv.gz)");
    eprintln!("  qini-cli simulate                     Evaluate a simulated dataset with no real uplift");
    eprintln!("  qini-cli reduce --input PATH --output PATH");
    eprintln!("                                        Keep the leading fraction of a CSV's rows");
    eprintln!("  qini-cli files PATH...                Print file sizes");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bins N               Number of bins (default: QINI_N_BINS or 10; simulate: 20)");
    eprintln!("  --treatment COL        Treatment column (default: treatment)");
    eprintln!("  --outcome COL          Outcome column (default: outcome)");
    eprintln!("  --uplift COL           Predicted uplift column (default: predicted_uplift)");
    eprintln!("  --include-final-bin    Add a point for rows past the last full bin");
    eprintln!("  --json PATH            Write the report as JSON");
    eprintln!("  --plot PATH            Write plot series (curve + baseline) as JSON");
    eprintln!("  --size N --seed S      Simulated dataset size and seed (default: 10000, 42)");
    eprintln!("  --output PATH          simulate: write the dataset; reduce: output CSV");
    eprintln!("  --fraction F           reduce: fraction of rows to keep (default: 0.01)");
    std::process::exit(1);
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let mut argv = std::env::args().skip(1);
    let command = argv.next().unwrap_or_else(|| usage());
    let args = Args::new(argv.collect());

    match command.as_str() {
        "evaluate" => {
            let config = QiniConfig::from_env()?;
            let report = commands::evaluate(config, &args)?;
            commands::print_report(&report);
        }
        "simulate" => {
            let config = QiniConfig::from_env()?;
            let report = commands::simulate(config, &args)?;
            commands::print_report(&report);
        }
        "reduce" => commands::reduce(&args)?,
        "files" => commands::files(&args)?,
        other => {
            eprintln!("Unknown command: {}", other);
            usage();
        }
    }

    Ok(())
}
