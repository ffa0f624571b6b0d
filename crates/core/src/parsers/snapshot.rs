use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use thiserror::Error;

use crate::model::{CallGraph, CallGraphBuilder, MethodId};

#[derive(Debug, Error)]
pub enum SnapshotParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("thread {0} appears more than once")]
    DuplicateThread(u64),
    #[error("thread {thread}: `{caller}` calls unknown method `{callee}`")]
    UnknownCallee {
        thread: u64,
        caller: String,
        callee: String,
    },
}

/// JSON call-graph snapshot as written by the instrumentation side.
///
/// ```json
/// {"threads": [{"id": 1, "methods": [
///   {"name": "A", "total_time": 10.0, "self_time": 2.0, "called": 1,
///    "calls": [{"callee": "B", "total_time": 8.0, "self_time": 8.0, "called": 2}]},
///   {"name": "B", "total_time": 8.0, "self_time": 8.0, "called": 2}
/// ]}]}
/// ```
#[derive(Debug, Deserialize)]
struct SnapshotFile {
    threads: Vec<SnapshotThread>,
}

#[derive(Debug, Deserialize)]
struct SnapshotThread {
    id: u64,
    #[serde(default)]
    sort_key: Option<i64>,
    #[serde(default)]
    methods: Vec<SnapshotMethod>,
}

#[derive(Debug, Deserialize)]
struct SnapshotMethod {
    name: String,
    total_time: f64,
    self_time: f64,
    called: u64,
    #[serde(default)]
    calls: Vec<SnapshotCall>,
}

#[derive(Debug, Deserialize)]
struct SnapshotCall {
    callee: String,
    total_time: f64,
    self_time: f64,
    called: u64,
}

/// Parse a JSON call-graph snapshot.
///
/// Callees are referenced by method name and resolved against the methods of
/// the same thread. Parent edges are derived from the call lists, so each
/// method's callers appear in the order their call lists were listed.
/// The result is not validated; the printers do that.
pub fn parse_snapshot(data: &[u8]) -> Result<CallGraph, SnapshotParseError> {
    let file: SnapshotFile = serde_json::from_slice(data)?;
    let mut builder = CallGraphBuilder::new();
    let mut seen = HashSet::with_capacity(file.threads.len());

    for (pos, snap) in file.threads.into_iter().enumerate() {
        if !seen.insert(snap.id) {
            return Err(SnapshotParseError::DuplicateThread(snap.id));
        }
        let mut thread = builder.thread(snap.id);
        thread.sort_key(snap.sort_key.unwrap_or(pos as i64));

        // First occurrence wins for lookups; duplicates are left for validation.
        let mut ids: HashMap<&str, MethodId> = HashMap::with_capacity(snap.methods.len());
        let mut order = Vec::with_capacity(snap.methods.len());
        for method in &snap.methods {
            let id = thread.method(
                method.name.as_str(),
                method.total_time,
                method.self_time,
                method.called,
            );
            ids.entry(method.name.as_str()).or_insert(id);
            order.push(id);
        }

        for (method, &caller) in snap.methods.iter().zip(&order) {
            for call in &method.calls {
                let Some(&callee) = ids.get(call.callee.as_str()) else {
                    return Err(SnapshotParseError::UnknownCallee {
                        thread: snap.id,
                        caller: method.name.clone(),
                        callee: call.callee.clone(),
                    });
                };
                thread.call(caller, callee, call.total_time, call.self_time, call.called);
            }
        }
    }

    Ok(builder.build())
}
