//! Call-graph model, snapshot loaders, and text report printers for graphprof.

pub mod model;
pub mod parsers;
pub mod printers;
