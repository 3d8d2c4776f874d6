//! modulize CLI: transform one source file and print or write the result.

use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use modulize::{config::Config, orchestrator};

#[derive(Debug, Parser)]
#[command(
    name = "modulize",
    version,
    about = "Rewrite aggregated imports of multi-component libraries into granular per-component imports"
)]
struct Cli {
    /// Source file to transform
    input: PathBuf,

    /// Write output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Config file (default: ./modulize.toml, then the user config file)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::discover(cli.config.as_deref())?;
    let output = orchestrator::transform_file(&cli.input, &config)?;

    match &cli.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => std::io::stdout()
            .lock()
            .write_all(output.as_bytes())
            .context("failed to write to stdout")?,
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}
