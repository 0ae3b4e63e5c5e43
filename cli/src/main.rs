mod error_formatter;
mod formatter;

use anyhow::{Context, Result};
use carbonate::{Catalog, Compliance, Engine, Resolution, TimeRange};
use clap::{Parser, Subcommand};
use formatter::Formatter;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "carbonate")]
#[command(about = "Emission estimates from whatever you know.")]
#[command(
    long_about = "Carbonate resolves an emission estimate through a graph of competing calculation methods.\nSupply whatever facts you have about a vehicle; missing quantities fall back to cruder methods."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a quantity and display the result
    ///
    /// Resolves the requested quantity (default: emission) with the given facts and shows
    /// which method produced it.
    Run {
        /// Facts about the vehicle (format: name=value)
        ///
        /// Examples: make=Toyota, make_model_year=Toyota/Prius/2010, daily_distance=40
        facts: Vec<String>,
        /// Quantity to resolve
        #[arg(short = 'q', long, default_value = carbonate::automobile::EMISSION)]
        quantity: String,
        /// Timeframe to estimate for (format: 2010 or 2010-01-01..2010-06-30; default: current year)
        #[arg(short = 't', long)]
        timeframe: Option<TimeRange>,
        /// Standards every method must comply with (format: ghg_protocol_scope_1,ghg_protocol_scope_3,iso)
        #[arg(short = 'c', long)]
        comply: Option<Compliance>,
        /// Reference data: a JSON file, or a directory of JSON files (default: bundled sample data)
        #[arg(short = 'd', long)]
        data: Option<PathBuf>,
        /// Output JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Show every quantity visited and the method chosen for it
        #[arg(short = 'e', long)]
        explain: bool,
    },
    /// List every node with its methods, requirements and compliance
    Nodes,
    /// List the facts the rule set accepts
    Inputs,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carbonate=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            facts,
            quantity,
            timeframe,
            comply,
            data,
            json,
            explain,
        } => run_command(
            &facts,
            &quantity,
            timeframe,
            comply.unwrap_or_default(),
            data.as_deref(),
            json,
            explain,
        ),
        Commands::Nodes => nodes_command(),
        Commands::Inputs => inputs_command(),
    };

    if let Err(e) = result {
        if let Some(carbonate_err) = e.downcast_ref::<carbonate::CarbonateError>() {
            eprintln!("{}", error_formatter::format_error(carbonate_err));
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}

/// JSON shape of `run --json`; the trace is included with `--explain`
#[derive(Serialize)]
struct RunOutput<'a> {
    quantity: &'a str,
    value: Option<&'a carbonate::Value>,
    method: Option<&'a str>,
    timeframe: &'a TimeRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<&'a carbonate::Trace>,
}

impl<'a> RunOutput<'a> {
    fn new(resolution: &'a Resolution, explain: bool) -> Self {
        Self {
            quantity: &resolution.quantity,
            value: resolution.value.as_ref(),
            method: resolution.method.as_deref(),
            timeframe: &resolution.timeframe,
            trace: explain.then_some(&resolution.trace),
        }
    }
}

fn run_command(
    facts: &[String],
    quantity: &str,
    timeframe: Option<TimeRange>,
    compliance: Compliance,
    data: Option<&Path>,
    json: bool,
    explain: bool,
) -> Result<()> {
    let catalog = load_catalog(data)?;
    let engine = Engine::automobile(catalog)?;

    if !engine.registry().is_known(quantity) {
        anyhow::bail!(
            "Unknown quantity '{}' (list them with: carbonate nodes)",
            quantity
        );
    }

    let refs: Vec<&str> = facts.iter().map(|s| s.as_str()).collect();
    let facts = engine.parse_facts(&refs)?;

    let resolution = engine.resolve(quantity, &facts, timeframe, &compliance)?;
    info!(
        quantity,
        method = resolution.method.as_deref().unwrap_or("-"),
        "resolved"
    );

    if json {
        let output = RunOutput::new(&resolution, explain);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let formatter = Formatter::default();
        print!("{}", formatter.format_resolution(&resolution, explain));
    }

    Ok(())
}

fn nodes_command() -> Result<()> {
    let registry = carbonate::automobile::registry()?;
    let formatter = Formatter::default();
    print!("{}", formatter.format_nodes(&registry));
    Ok(())
}

fn inputs_command() -> Result<()> {
    let registry = carbonate::automobile::registry()?;
    let formatter = Formatter::default();
    println!("{}", formatter.format_inputs(&registry));
    Ok(())
}

/// Load reference data from a JSON file or every .json file under a directory
///
/// Without a path the bundled sample tables are used.
fn load_catalog(data: Option<&Path>) -> Result<Catalog> {
    let Some(path) = data else {
        return Ok(Catalog::bundled()?);
    };

    let mut catalog = Catalog::new();
    let mut files: Vec<PathBuf> = if path.is_dir() {
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry?;
            if entry.path().extension().and_then(|s| s.to_str()) == Some("json") {
                found.push(entry.path().to_path_buf());
            }
        }
        found
    } else {
        vec![path.to_path_buf()]
    };
    files.sort();

    for file in &files {
        debug!(path = %file.display(), "loading reference data");
        let json = fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        catalog.load_json(&json)?;
    }
    info!(files = files.len(), records = catalog.len(), "reference data loaded");

    Ok(catalog)
}
