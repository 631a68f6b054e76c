//! Engine call statistics

use std::collections::HashMap;

/// Snapshot of what an engine has been asked to do
#[derive(Clone, Debug, Default)]
pub struct EngineStats {
    /// Number of calls per engine operation
    pub calls: HashMap<&'static str, u64>,
    pub objects_created: u64,
    pub objects_destroyed: u64,
    /// Operations that reported an error status
    pub rejections: u64,
}

impl EngineStats {
    /// Number of calls to an operation, e.g. `"packet_create"`
    pub fn calls_to(&self, op: &str) -> u64 {
        self.calls.get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> u64 {
        self.calls.values().sum()
    }
}
