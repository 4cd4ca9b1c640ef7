//! termfold - partial evaluation of SPARQL expressions ahead of SQL generation

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use std::io::Read;
use std::path::{Path, PathBuf};
use termfold::config::EvaluatorConfig;
use termfold::expression::{Binding, Expr};

/// Fold the constant parts of a JSON-encoded expression tree
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Expression file (JSON), or '-' for stdin
    #[arg(short, long, default_value = "-")]
    expr: PathBuf,

    /// Variable binding file (JSON object of variable name to expression)
    #[arg(short, long)]
    binding: Option<PathBuf>,

    /// Evaluator configuration file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON instead of its textual form
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match &args.config {
        Some(path) => EvaluatorConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EvaluatorConfig::default(),
    };
    log::debug!("Using configuration: {:?}", config);
    let evaluator = config.build();

    let expr: Expr = serde_json::from_str(&read_input(&args.expr)?)
        .context("Failed to parse expression")?;

    let binding: Option<Binding> = match &args.binding {
        Some(path) => Some(
            serde_json::from_str(&read_input(path)?).context("Failed to parse binding")?,
        ),
        None => None,
    };

    log::debug!("Evaluating {}", expr);
    let result = evaluator.evaluate(&expr, binding.as_ref());

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize result")?
        );
    } else {
        println!("{}", result);
    }

    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        Ok(input)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}
