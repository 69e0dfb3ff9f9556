//! Inconsistency reports for the remapping index.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::base::Name;
use crate::error::format_chain;

/// A redirect chain that loops back on itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    /// The key the scan started from.
    pub start: Name,
    /// Names walked from `start`, ending with the first repeated one.
    pub chain: Vec<Name>,
}

/// Every cycle found by an exhaustive scan of the remapping index.
///
/// Only built when at least one cycle exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InconsistencyReport {
    pub cycles: Vec<CycleReport>,
}

impl InconsistencyReport {
    const HEADING: &'static str = "These remapping chains never reach an endpoint:";

    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }

    /// Whether a scan starting at `key` hit a cycle.
    pub fn contains(&self, key: &str) -> bool {
        self.cycles.iter().any(|cycle| cycle.start.as_str() == key)
    }

    /// Every name that appears on some cyclic chain, sorted.
    pub fn implicated(&self) -> BTreeSet<Name> {
        self.cycles
            .iter()
            .flat_map(|cycle| cycle.chain.iter().cloned())
            .collect()
    }
}

impl fmt::Display for InconsistencyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = Self::HEADING.len();
        writeln!(f, "{}", Self::HEADING)?;
        writeln!(f, "{}", "=".repeat(width))?;
        for cycle in &self.cycles {
            writeln!(f, "  {}: {}", cycle.start, format_chain(&cycle.chain))?;
        }
        writeln!(f, "{}", "-".repeat(width))
    }
}
