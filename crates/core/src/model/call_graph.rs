use serde::{Deserialize, Serialize};

/// Replace `-0.0` with `0.0`; every other value passes through.
pub(crate) fn unsigned_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

/// Index of a method inside its owning thread's `methods` vector.
///
/// Edges refer to their target through this id rather than a reference, so a
/// caller/callee cycle in the profile never becomes an ownership cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MethodId(pub usize);

impl MethodId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One aggregated caller→callee relationship.
///
/// The same statistics are stored twice: as a child edge on the caller
/// (`target` = callee) and as a parent edge on the callee (`target` = caller).
/// They describe the callee's cost incurred through this particular call site,
/// not either endpoint's global totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallEdge {
    /// The method at the other end of the edge.
    pub target: MethodId,
    pub total_time: f64,
    pub self_time: f64,
    /// Number of times this edge was traversed.
    pub called: u64,
}

impl CallEdge {
    pub fn children_time(&self) -> f64 {
        self.total_time - self.self_time
    }
}

/// Aggregate statistics for one distinct method observed on a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodInfo {
    /// Fully-qualified display name; unique within the thread.
    pub name: String,
    /// Inclusive time across all invocations.
    pub total_time: f64,
    /// Exclusive time, excluding callees.
    pub self_time: f64,
    /// Total invocation count on this thread.
    pub called: u64,
    pub parents: Vec<CallEdge>,
    pub children: Vec<CallEdge>,
}

impl MethodInfo {
    pub fn new(name: impl Into<String>, total_time: f64, self_time: f64, called: u64) -> Self {
        Self {
            name: name.into(),
            total_time: unsigned_zero(total_time),
            self_time: unsigned_zero(self_time),
            called,
            parents: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Time spent in callees.
    pub fn children_time(&self) -> f64 {
        self.total_time - self.self_time
    }
}

/// All methods observed on one thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadInfo {
    /// Opaque thread identifier, unique within a graph.
    pub id: u64,
    /// Creation sequence; threads are reported in `(sort_key, id)` order.
    pub sort_key: i64,
    pub methods: Vec<MethodInfo>,
}

impl ThreadInfo {
    pub fn new(id: u64, sort_key: i64) -> Self {
        Self {
            id,
            sort_key,
            methods: Vec::new(),
        }
    }

    pub fn method(&self, id: MethodId) -> Option<&MethodInfo> {
        self.methods.get(id.index())
    }

    /// Look up a method by its name key.
    pub fn find(&self, name: &str) -> Option<(MethodId, &MethodInfo)> {
        self.methods
            .iter()
            .enumerate()
            .find(|(_, m)| m.name == name)
            .map(|(i, m)| (MethodId(i), m))
    }
}

/// An immutable snapshot of one or more per-thread call graphs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallGraph {
    pub threads: Vec<ThreadInfo>,
}

impl CallGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }

    pub fn method_count(&self) -> usize {
        self.threads.iter().map(|t| t.methods.len()).sum()
    }

    /// Threads in reporting order: creation sequence, then id.
    pub fn sorted_threads(&self) -> Vec<&ThreadInfo> {
        let mut threads: Vec<&ThreadInfo> = self.threads.iter().collect();
        threads.sort_by_key(|t| (t.sort_key, t.id));
        threads
    }
}
