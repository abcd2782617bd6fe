use anyhow::{Context, Result};
use clap::Parser;
use oval_criteria::cli::{Args, Command, OutputFormat};
use oval_criteria::report::CheckReport;
use oval_criteria::{read_results, write_results, DefinitionModel, ResultSystem, ResultsConfig};
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn load_system(definitions: &str, config: ResultsConfig) -> Result<ResultSystem> {
    let model = DefinitionModel::from_file(definitions)
        .with_context(|| format!("Failed to load definitions from {}", definitions))?;
    Ok(ResultSystem::new(model).with_config(config))
}

fn load_results(definitions: &str, results: &str, config: ResultsConfig) -> Result<ResultSystem> {
    let mut system = load_system(definitions, config)?;
    let content = fs::read_to_string(results)
        .with_context(|| format!("Failed to read results from {}", results))?;
    read_results(&mut system, &content)
        .with_context(|| format!("Failed to parse results from {}", results))?;
    Ok(system)
}

fn emit(output: Option<&str>, content: &str) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("Failed to write {}", path))?;
            debug!("wrote {} bytes to {}", content.len(), path);
        }
        None => println!("{}", content),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // RUST_LOG wins over --verbose, e.g. RUST_LOG=oval_criteria::criteria=trace
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("oval_criteria=debug")
    } else {
        EnvFilter::new("oval_criteria=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();

    debug!("Logging initialized (verbose={})", args.verbose);

    let config = args.results_config().context("Invalid configuration")?;
    let output = args.output.as_deref();

    match &args.command {
        Command::Derive { definitions } => {
            let mut system = load_system(definitions, config)?;
            let derived = system.derive_all();
            debug!("derived {} definitions", derived.len());
            emit(output, &write_results(&system)?)?;
        }
        Command::Check { definitions, results } => {
            let mut system = load_results(definitions, results, config)?;
            system.lock();
            let report = CheckReport::from_system(&system);
            let rendered = match args.format {
                OutputFormat::Json => serde_json::to_string_pretty(&report)?,
                OutputFormat::Terminal => report.to_terminal(),
            };
            emit(output, &rendered)?;
            if report.invalid_count() > 0 {
                anyhow::bail!("{} invalid definition(s) in {}", report.invalid_count(), results);
            }
        }
        Command::Normalize { definitions, results } => {
            let system = load_results(definitions, results, config)?;
            emit(output, &write_results(&system)?)?;
        }
    }

    Ok(())
}
