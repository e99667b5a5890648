//! Agent identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one tracked agent (e.g. a cell)
///
/// Tracking software emits both numeric and textual ids, so the id is stored
/// as text and compared lexically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(String);

impl AgentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for AgentId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}
