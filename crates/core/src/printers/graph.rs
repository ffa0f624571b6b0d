//! Graph report: every significant method with its callers above and its
//! callees below.
//!
//! ```text
//! Thread ID: 1
//!   %total   %self     total      self    children             calls   Name
//! --------------------------------------------------------------------------------
//!                       8.00      8.00      0.00                 2/2     A
//!   80.00%  80.00%      8.00      8.00      0.00                   2     B
//! ```

use std::cmp::Ordering;

use tracing::debug;

use super::{PrintError, PrintOptions, Printer};
use crate::model::call_graph::unsigned_zero;
use crate::model::{CallEdge, CallGraph, MethodInfo, ThreadInfo};

const PERCENTAGE_WIDTH: usize = 8;
const TIME_WIDTH: usize = 10;
const CALL_WIDTH: usize = 20;
const RULE_WIDTH: usize = 80;
const NAME_GAP: &str = "     ";

/// Floor for a thread's reference total, so an all-zero snapshot still
/// produces finite percentages.
const MIN_THREAD_TOTAL: f64 = 0.01;

/// Prints a call-graph report, one block per thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphPrinter;

impl GraphPrinter {
    pub fn new() -> Self {
        Self
    }
}

impl Printer for GraphPrinter {
    fn render(&self, graph: &CallGraph, options: &PrintOptions) -> Result<String, PrintError> {
        options.validate()?;
        graph.validate()?;

        let mut out = String::with_capacity(graph.method_count() * 3 * 96 + 256);
        for (i, thread) in graph.sorted_threads().into_iter().enumerate() {
            if i > 0 {
                out.push_str("\n\n");
            }
            render_thread(&mut out, thread, options.min_percent);
        }
        Ok(out)
    }
}

fn render_thread(out: &mut String, thread: &ThreadInfo, min_percent: f64) {
    // Longest total time first; name breaks ties. Times are validated finite,
    // and -0.0 must compare equal to 0.0 here.
    let mut methods: Vec<&MethodInfo> = thread.methods.iter().collect();
    methods.sort_by(|a, b| {
        b.total_time
            .partial_cmp(&a.total_time)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let thread_total = methods
        .first()
        .map_or(0.0, |m| m.total_time)
        .max(MIN_THREAD_TOTAL);

    render_heading(out, thread.id);

    let mut printed = 0usize;
    for method in &methods {
        let total_percentage = unsigned_zero((method.total_time / thread_total) * 100.0);
        let self_percentage = unsigned_zero((method.self_time / thread_total) * 100.0);

        if total_percentage < min_percent {
            continue;
        }
        printed += 1;

        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');

        for edge in &method.parents {
            render_edge(out, thread, edge, method.called);
        }

        // The percentage columns are one narrower to leave room for the sign.
        out.push_str(&format!(
            "{total_percentage:w$.2}%{self_percentage:w$.2}%",
            w = PERCENTAGE_WIDTH - 1
        ));
        push_times(out, method.total_time, method.self_time);
        out.push_str(&format!("{:>w$}", method.called, w = CALL_WIDTH));
        out.push_str(NAME_GAP);
        out.push_str(&method.name);
        out.push('\n');

        for edge in &method.children {
            let child_called = thread.method(edge.target).map_or(0, |m| m.called);
            render_edge(out, thread, edge, child_called);
        }
    }

    debug!(
        thread = thread.id,
        printed,
        skipped = methods.len() - printed,
        "rendered thread"
    );
}

fn render_heading(out: &mut String, thread_id: u64) {
    out.push_str(&format!("Thread ID: {thread_id}\n"));
    out.push_str(&format!(
        "{:>p$}{:>p$}{:>t$}{:>t$}{:>c$}{:>n$}   Name\n",
        "%total",
        "%self",
        "total",
        "self",
        "children",
        "calls",
        p = PERCENTAGE_WIDTH,
        t = TIME_WIDTH,
        c = TIME_WIDTH + 2,
        n = CALL_WIDTH - 2,
    ));
}

/// One caller or callee row. `denominator` is the printed method's call count
/// for parent rows and the callee's own call count for child rows.
fn render_edge(out: &mut String, thread: &ThreadInfo, edge: &CallEdge, denominator: u64) {
    // Targets were checked by `CallGraph::validate`.
    let Some(target) = thread.method(edge.target) else {
        return;
    };

    out.push_str(&" ".repeat(2 * PERCENTAGE_WIDTH));
    push_times(out, edge.total_time, edge.self_time);
    let calls = format!("{}/{}", edge.called, denominator);
    out.push_str(&format!("{calls:>w$}", w = CALL_WIDTH));
    out.push_str(NAME_GAP);
    out.push_str(&target.name);
    out.push('\n');
}

/// The `total`, `self` and `children` columns.
fn push_times(out: &mut String, total_time: f64, self_time: f64) {
    out.push_str(&format!(
        "{:w$.2}{:w$.2}{:w$.2}",
        unsigned_zero(total_time),
        unsigned_zero(self_time),
        unsigned_zero(total_time - self_time),
        w = TIME_WIDTH
    ));
}
