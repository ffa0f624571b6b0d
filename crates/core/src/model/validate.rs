use std::collections::HashSet;

use thiserror::Error;
use tracing::trace;

use super::call_graph::{CallEdge, CallGraph, MethodInfo, ThreadInfo};

/// A structural invariant of the call-graph model does not hold.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("duplicate thread id {thread}")]
    DuplicateThread { thread: u64 },
    #[error("thread {thread}: duplicate method `{method}`")]
    DuplicateMethod { thread: u64, method: String },
    #[error("thread {thread}: `{method}` has invalid {field} {value}")]
    InvalidTime {
        thread: u64,
        method: String,
        field: &'static str,
        value: f64,
    },
    #[error("thread {thread}: `{method}` self time {self_time} exceeds total time {total_time}")]
    SelfExceedsTotal {
        thread: u64,
        method: String,
        self_time: f64,
        total_time: f64,
    },
    #[error("thread {thread}: `{method}` has a call count of zero")]
    NeverCalled { thread: u64, method: String },
    #[error("thread {thread}: `{method}` has an edge to missing method #{target}")]
    DanglingEdge {
        thread: u64,
        method: String,
        target: usize,
    },
}

impl CallGraph {
    /// Check every invariant the printers rely on.
    ///
    /// Reports the first violation found, walking threads and methods in
    /// storage order.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.threads.len());
        for thread in &self.threads {
            if !seen.insert(thread.id) {
                return Err(ModelError::DuplicateThread { thread: thread.id });
            }
            validate_thread(thread)?;
        }
        trace!(
            threads = self.threads.len(),
            methods = self.method_count(),
            "call graph validated"
        );
        Ok(())
    }
}

fn validate_thread(thread: &ThreadInfo) -> Result<(), ModelError> {
    let mut names = HashSet::with_capacity(thread.methods.len());
    for method in &thread.methods {
        if !names.insert(method.name.as_str()) {
            return Err(ModelError::DuplicateMethod {
                thread: thread.id,
                method: method.name.clone(),
            });
        }
        check_times(thread, method, method.total_time, method.self_time)?;
        if method.called == 0 {
            return Err(ModelError::NeverCalled {
                thread: thread.id,
                method: method.name.clone(),
            });
        }
        for edge in method.parents.iter().chain(&method.children) {
            validate_edge(thread, method, edge)?;
        }
    }
    Ok(())
}

fn validate_edge(
    thread: &ThreadInfo,
    method: &MethodInfo,
    edge: &CallEdge,
) -> Result<(), ModelError> {
    if thread.method(edge.target).is_none() {
        return Err(ModelError::DanglingEdge {
            thread: thread.id,
            method: method.name.clone(),
            target: edge.target.0,
        });
    }
    check_times(thread, method, edge.total_time, edge.self_time)
}

fn check_times(
    thread: &ThreadInfo,
    method: &MethodInfo,
    total_time: f64,
    self_time: f64,
) -> Result<(), ModelError> {
    for (field, value) in [("total time", total_time), ("self time", self_time)] {
        if !value.is_finite() || value < 0.0 {
            return Err(ModelError::InvalidTime {
                thread: thread.id,
                method: method.name.clone(),
                field,
                value,
            });
        }
    }
    if self_time > total_time {
        return Err(ModelError::SelfExceedsTotal {
            thread: thread.id,
            method: method.name.clone(),
            self_time,
            total_time,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CallGraphBuilder, MethodId};

    fn simple_graph() -> CallGraph {
        let mut builder = CallGraphBuilder::new();
        let mut thread = builder.thread(1);
        let a = thread.method("A", 10.0, 2.0, 1);
        let b = thread.method("B", 8.0, 8.0, 2);
        thread.call(a, b, 8.0, 8.0, 2);
        builder.build()
    }

    #[test]
    fn accepts_well_formed_graph() {
        assert_eq!(simple_graph().validate(), Ok(()));
        assert_eq!(CallGraph::new().validate(), Ok(()));
    }

    #[test]
    fn rejects_self_time_above_total() {
        let mut graph = simple_graph();
        graph.threads[0].methods[0].self_time = 11.0;
        assert!(matches!(
            graph.validate(),
            Err(ModelError::SelfExceedsTotal { ref method, .. }) if method == "A"
        ));
    }

    #[test]
    fn rejects_negative_and_nan_times() {
        let mut graph = simple_graph();
        graph.threads[0].methods[1].total_time = -1.0;
        assert!(matches!(
            graph.validate(),
            Err(ModelError::InvalidTime { field: "total time", .. })
        ));

        let mut graph = simple_graph();
        graph.threads[0].methods[1].self_time = f64::NAN;
        assert!(matches!(
            graph.validate(),
            Err(ModelError::InvalidTime { field: "self time", .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_edge() {
        let mut graph = simple_graph();
        graph.threads[0].methods[0].children[0].self_time = 9.0;
        assert!(matches!(
            graph.validate(),
            Err(ModelError::SelfExceedsTotal { ref method, .. }) if method == "A"
        ));
    }

    #[test]
    fn rejects_duplicate_method_names() {
        let mut builder = CallGraphBuilder::new();
        let mut thread = builder.thread(1);
        thread.method("C1#hello", 1.0, 1.0, 1);
        thread.method("C1#hello", 1.0, 1.0, 1);
        let err = builder.build().validate().unwrap_err();
        assert_eq!(err.to_string(), "thread 1: duplicate method `C1#hello`");
    }

    #[test]
    fn same_name_on_different_threads_is_fine() {
        let mut builder = CallGraphBuilder::new();
        builder.thread(1).method("main", 1.0, 1.0, 1);
        builder.thread(2).method("main", 1.0, 1.0, 1);
        assert!(builder.build().validate().is_ok());
    }

    #[test]
    fn rejects_duplicate_threads() {
        let mut graph = simple_graph();
        graph.threads.push(graph.threads[0].clone());
        assert_eq!(
            graph.validate(),
            Err(ModelError::DuplicateThread { thread: 1 })
        );
    }

    #[test]
    fn rejects_dangling_edges() {
        let mut graph = simple_graph();
        graph.threads[0].methods[1].parents[0].target = MethodId(5);
        assert_eq!(
            graph.validate(),
            Err(ModelError::DanglingEdge {
                thread: 1,
                method: "B".to_string(),
                target: 5,
            })
        );
    }

    #[test]
    fn rejects_zero_call_count() {
        let mut graph = simple_graph();
        graph.threads[0].methods[1].called = 0;
        assert!(matches!(graph.validate(), Err(ModelError::NeverCalled { .. })));
    }
}
