//! Climate Risk - command-line front end
//!
//! Prints one JSON document on stdout. Failures print an `{error, trace}`
//! document on stderr and exit with status 1.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use risk_engine::{EngineConfig, ErrorReport, RawReading, RiskContext, RiskEngine, TracingObserver};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "climate-risk")]
#[command(about = "Climate-driven disease risk assessment", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log more detail to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Assess one set of readings
    Predict {
        /// Temperature (°C)
        temperature: String,
        /// Relative humidity (%)
        humidity: String,
        /// Rainfall (mm)
        rainfall: String,
        /// Air quality index
        aqi: String,
        /// Free-form location label, logged only
        location: String,
        /// Regional outbreak context: Low, Moderate or High
        risk_context: Option<String>,
    },

    /// Assess a JSON list of {temp, humidity, rainfall, aqi, date} records
    Batch {
        /// JSON array of records
        records: String,
        /// Regional outbreak context: Low, Moderate or High
        risk_context: Option<String>,
    },
}

fn init_logging(verbose: u8, json: bool) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let installed = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    installed.context("Failed to set tracing subscriber")
}

fn parse_context(raw: Option<&str>) -> Result<RiskContext> {
    match raw {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(RiskContext::default()),
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::load(cli.config.as_deref())?;
    let engine = RiskEngine::from_config(&config, Arc::new(TracingObserver))?;

    let output = match cli.command {
        Commands::Predict {
            temperature,
            humidity,
            rainfall,
            aqi,
            location,
            risk_context,
        } => {
            let risk_context = parse_context(risk_context.as_deref())?;
            debug!("Assessing readings for {}", location);
            let result = engine.assess_raw(
                &RawReading::from(temperature.as_str()),
                &RawReading::from(humidity.as_str()),
                &RawReading::from(rainfall.as_str()),
                &RawReading::from(aqi.as_str()),
                risk_context,
            )?;
            serde_json::to_string(&result)?
        }
        Commands::Batch {
            records,
            risk_context,
        } => {
            let risk_context = parse_context(risk_context.as_deref())?;
            let results = engine.assess_batch_json(&records, risk_context)?;
            serde_json::to_string(&results)?
        }
    };

    println!("{}", output);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.log_json) {
        eprintln!("{:#}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let report = ErrorReport::from_error(e.as_ref());
            match serde_json::to_string(&report) {
                Ok(json) => eprintln!("{}", json),
                Err(_) => eprintln!("{}", report.trace),
            }
            ExitCode::FAILURE
        }
    }
}
