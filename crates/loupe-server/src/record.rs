//! Per-project record of the negotiated bridge port.
//!
//! Injected as an explicit store rather than reached as ambient process
//! state, so negotiation is testable and reusable across embedders.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Store entry for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordInfo {
    /// Negotiated port; set at most once per process lifetime.
    pub port: Option<u16>,
    /// One-shot guard preventing duplicate concurrent bootstraps.
    pub find_port: bool,
}

/// Project-keyed record store.
pub trait RecordStore: Send + Sync {
    fn get(&self, project: &str) -> RecordInfo;
    /// Records the negotiated port. The first write wins.
    fn set_port(&self, project: &str, port: u16);
    /// Takes the negotiation guard; true only for the first caller.
    fn try_begin_find(&self, project: &str) -> bool;
}

/// In-memory store covering a single process lifetime.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    records: Mutex<HashMap<String, RecordInfo>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryRecordStore {
    fn get(&self, project: &str) -> RecordInfo {
        self.records.lock().get(project).copied().unwrap_or_default()
    }

    fn set_port(&self, project: &str, port: u16) {
        let mut records = self.records.lock();
        let entry = records.entry(project.to_string()).or_default();
        if entry.port.is_none() {
            entry.port = Some(port);
        }
    }

    fn try_begin_find(&self, project: &str) -> bool {
        let mut records = self.records.lock();
        let entry = records.entry(project.to_string()).or_default();
        !std::mem::replace(&mut entry.find_port, true)
    }
}
