use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::model::{CallGraph, CallGraphBuilder, MethodId};

/// Name of the synthetic root that every folded stack hangs off.
pub const TOPLEVEL: &str = "<toplevel>";

#[derive(Debug, Error)]
pub enum CollapsedParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: invalid sample count `{count}`")]
    InvalidCount { line: usize, count: String },
    #[error("no valid stack lines found")]
    Empty,
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    total: f64,
    self_time: f64,
    called: u64,
}

/// Parse Brendan Gregg's collapsed/folded stack format into a call graph.
///
/// Each line has the format `frame;frame;... count`. All stacks land on a
/// single thread (id 0) under a synthetic [`TOPLEVEL`] method. Sample counts
/// are used as time, and "calls" count the stack lines a method or edge
/// appears on. A frame that recurs within one stack is only charged once.
pub fn parse_collapsed(data: &[u8]) -> Result<CallGraph, CollapsedParseError> {
    let text = std::str::from_utf8(data)?;

    let mut names: Vec<String> = vec![TOPLEVEL.to_string()];
    let mut index: HashMap<String, usize> = HashMap::from([(TOPLEVEL.to_string(), 0)]);
    let mut methods: Vec<Totals> = vec![Totals::default()];
    let mut edges: Vec<((usize, usize), Totals)> = Vec::new();
    let mut edge_index: HashMap<(usize, usize), usize> = HashMap::new();
    let mut samples = 0usize;

    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Split into stack and count: "a;b;c 42"
        let Some(pos) = line.rfind(' ') else {
            continue;
        };
        let count_str = line[pos + 1..].trim();
        let count = match count_str.parse::<f64>() {
            Ok(c) if c.is_finite() && c >= 0.0 => c,
            _ => {
                return Err(CollapsedParseError::InvalidCount {
                    line: lineno + 1,
                    count: count_str.to_string(),
                });
            }
        };

        let mut stack: Vec<usize> = vec![0];
        for name in line[..pos].split(';').map(str::trim).filter(|n| !n.is_empty()) {
            let id = match index.get(name) {
                Some(&id) => id,
                None => {
                    names.push(name.to_string());
                    methods.push(Totals::default());
                    index.insert(name.to_string(), names.len() - 1);
                    names.len() - 1
                }
            };
            stack.push(id);
        }
        if stack.len() < 2 {
            continue;
        }
        samples += 1;

        let mut charged = HashSet::with_capacity(stack.len());
        for &id in &stack {
            if charged.insert(id) {
                methods[id].total += count;
                methods[id].called += 1;
            }
        }
        if let Some(&leaf) = stack.last() {
            methods[leaf].self_time += count;
        }

        let mut charged_pairs = HashSet::with_capacity(stack.len());
        for pair in stack.windows(2) {
            let key = (pair[0], pair[1]);
            if !charged_pairs.insert(key) {
                continue;
            }
            let slot = *edge_index.entry(key).or_insert_with(|| {
                edges.push((key, Totals::default()));
                edges.len() - 1
            });
            edges[slot].1.total += count;
            edges[slot].1.called += 1;
        }
        let last = (stack[stack.len() - 2], stack[stack.len() - 1]);
        if let Some(&slot) = edge_index.get(&last) {
            edges[slot].1.self_time += count;
        }
    }

    if samples == 0 {
        return Err(CollapsedParseError::Empty);
    }

    let mut builder = CallGraphBuilder::new();
    let mut thread = builder.thread(0);
    for (name, totals) in names.into_iter().zip(&methods) {
        thread.method(name, totals.total, totals.self_time, totals.called);
    }
    for ((caller, callee), e) in edges {
        thread.call(MethodId(caller), MethodId(callee), e.total, e.self_time, e.called);
    }

    Ok(builder.build())
}
