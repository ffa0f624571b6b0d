pub mod builder;
pub mod call_graph;
pub mod validate;

pub use builder::{CallGraphBuilder, ThreadBuilder};
pub use call_graph::{CallEdge, CallGraph, MethodId, MethodInfo, ThreadInfo};
pub use validate::ModelError;
