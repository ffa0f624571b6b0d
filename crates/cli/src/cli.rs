use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "graphprof")]
#[command(version)]
#[command(about = "Print a call-graph profile as a text graph report", long_about = None)]
pub struct Cli {
    /// Profile snapshot (JSON call graph or collapsed stacks)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Hide methods below this share of their thread's total time
    #[arg(short = 'm', long = "min-percent", value_name = "PCT", default_value_t = 0.0)]
    pub min_percent: f64,

    /// Write the report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Input format
    #[arg(long, value_enum, default_value = "auto")]
    pub format: InputFormat,

    /// Log debug output to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Auto,
    Json,
    Collapsed,
}
