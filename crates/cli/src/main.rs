mod cli;

use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use graphprof_core::parsers::{self, collapsed, snapshot};
use graphprof_core::printers::{GraphPrinter, PrintOptions, Printer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, InputFormat};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data = std::fs::read(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let graph = match cli.format {
        InputFormat::Auto => parsers::parse_auto(&data)?,
        InputFormat::Json => snapshot::parse_snapshot(&data)?,
        InputFormat::Collapsed => collapsed::parse_collapsed(&data)?,
    };
    debug!(
        threads = graph.threads.len(),
        methods = graph.method_count(),
        "loaded {}",
        cli.input.display()
    );

    let options = PrintOptions::with_min_percent(cli.min_percent);
    let printer = GraphPrinter::new();
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            printer
                .print(&graph, &options, &mut BufWriter::new(file))
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            info!("wrote report to {}", path.display());
        }
        None => {
            printer
                .print(&graph, &options, &mut io::stdout().lock())
                .context("failed to write report")?;
        }
    }
    Ok(())
}
