pub mod collapsed;
pub mod snapshot;

use crate::model::CallGraph;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("snapshot: {0}")]
    Snapshot(#[from] snapshot::SnapshotParseError),
    #[error("collapsed: {0}")]
    Collapsed(#[from] collapsed::CollapsedParseError),
    #[error("unable to detect format")]
    UnknownFormat,
}

/// Auto-detect the snapshot format and parse it.
///
/// A JSON object with a `threads` key is a call-graph snapshot; anything else
/// is tried as collapsed stacks.
pub fn parse_auto(data: &[u8]) -> Result<CallGraph, ParseError> {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        if value.get("threads").is_some_and(serde_json::Value::is_array) {
            return Ok(snapshot::parse_snapshot(data)?);
        }
        return Err(ParseError::UnknownFormat);
    }

    match collapsed::parse_collapsed(data) {
        Ok(graph) => Ok(graph),
        Err(collapsed::CollapsedParseError::Empty) => Err(ParseError::UnknownFormat),
        Err(e) => Err(e.into()),
    }
}
