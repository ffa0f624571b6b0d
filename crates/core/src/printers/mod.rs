//! Text report printers.
//!
//! Every printer consumes the same read-only [`CallGraph`] and writes a
//! complete report to an append-only sink.

pub mod graph;

pub use graph::GraphPrinter;

use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{CallGraph, ModelError};

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("invalid call graph: {0}")]
    InvalidModel(#[from] ModelError),
    #[error("minimum percentage must be within [0, 100), got {0}")]
    InvalidThreshold(f64),
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Options shared by all printers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintOptions {
    /// Methods whose share of their thread's top-level total time falls
    /// strictly below this percentage are left out of the report.
    pub min_percent: f64,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self { min_percent: 0.0 }
    }
}

impl PrintOptions {
    pub fn with_min_percent(min_percent: f64) -> Self {
        Self { min_percent }
    }

    pub fn validate(&self) -> Result<(), PrintError> {
        if (0.0..100.0).contains(&self.min_percent) {
            Ok(())
        } else {
            Err(PrintError::InvalidThreshold(self.min_percent))
        }
    }
}

/// A report format.
pub trait Printer {
    /// Format the whole report in memory. Validates `graph` and `options`
    /// first, so an invalid input never yields partial output.
    fn render(&self, graph: &CallGraph, options: &PrintOptions) -> Result<String, PrintError>;

    /// Render the report and write it to `out`.
    fn print(
        &self,
        graph: &CallGraph,
        options: &PrintOptions,
        out: &mut dyn io::Write,
    ) -> Result<(), PrintError> {
        let report = self.render(graph, options)?;
        out.write_all(report.as_bytes())?;
        out.flush()?;
        Ok(())
    }
}
