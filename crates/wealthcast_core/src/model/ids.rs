//! Identifiers for scenarios and crisis profiles
//!
//! Both are opaque strings chosen by the caller (scenarios) or by the catalog
//! data file (crises). Separate newtypes keep them from being mixed up.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a candidate investment strategy
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(pub String);

/// Identifier of a historical crisis profile
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrisisId(pub String);

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for CrisisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ScenarioId {
    fn from(s: &str) -> Self {
        ScenarioId(s.to_string())
    }
}

impl From<&str> for CrisisId {
    fn from(s: &str) -> Self {
        CrisisId(s.to_string())
    }
}
