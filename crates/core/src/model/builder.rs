use super::call_graph::{CallEdge, CallGraph, MethodId, MethodInfo, ThreadInfo, unsigned_zero};

/// Incrementally assembles a [`CallGraph`].
///
/// The builder does not check invariants; call [`CallGraph::validate`] on the
/// result (the printers do this before writing anything).
#[derive(Debug, Default)]
pub struct CallGraphBuilder {
    threads: Vec<ThreadInfo>,
}

impl CallGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the thread with `id`, creating it on first use. New threads take
    /// the next creation sequence number as their sort key.
    pub fn thread(&mut self, id: u64) -> ThreadBuilder<'_> {
        let pos = match self.threads.iter().position(|t| t.id == id) {
            Some(pos) => pos,
            None => {
                let sort_key = self.threads.len() as i64;
                self.threads.push(ThreadInfo::new(id, sort_key));
                self.threads.len() - 1
            }
        };
        ThreadBuilder {
            thread: &mut self.threads[pos],
        }
    }

    pub fn build(self) -> CallGraph {
        CallGraph {
            threads: self.threads,
        }
    }
}

/// Mutable view of one thread inside a [`CallGraphBuilder`].
#[derive(Debug)]
pub struct ThreadBuilder<'a> {
    thread: &'a mut ThreadInfo,
}

impl ThreadBuilder<'_> {
    /// Override the creation sequence used for thread ordering.
    pub fn sort_key(&mut self, sort_key: i64) -> &mut Self {
        self.thread.sort_key = sort_key;
        self
    }

    /// Append a method record and return its id.
    pub fn method(
        &mut self,
        name: impl Into<String>,
        total_time: f64,
        self_time: f64,
        called: u64,
    ) -> MethodId {
        let id = MethodId(self.thread.methods.len());
        self.thread
            .methods
            .push(MethodInfo::new(name, total_time, self_time, called));
        id
    }

    /// Record a caller→callee edge on both endpoints.
    pub fn call(
        &mut self,
        caller: MethodId,
        callee: MethodId,
        total_time: f64,
        self_time: f64,
        called: u64,
    ) -> &mut Self {
        let edge = |target| CallEdge {
            target,
            total_time: unsigned_zero(total_time),
            self_time: unsigned_zero(self_time),
            called,
        };
        if let Some(m) = self.thread.methods.get_mut(caller.index()) {
            m.children.push(edge(callee));
        }
        if let Some(m) = self.thread.methods.get_mut(callee.index()) {
            m.parents.push(edge(caller));
        }
        self
    }
}
