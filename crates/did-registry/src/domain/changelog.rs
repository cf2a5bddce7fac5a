//! # Backward-Linked Change Log
//!
//! An append-only arena of change records plus a per-identity pointer to
//! the most recent change. Each record carries `previous_change`, the
//! pointer's value before the operation that emitted it, so a consumer can
//! walk one identity's history backward from `changed(identity)` to the
//! zero sentinel without scanning the arena.
//!
//! Sequence numbers start at 1; 0 is the chain terminator. One operation
//! gets one sequence number even when it emits several records (enrollment
//! emits an added + changed pair), mirroring how the original events shared
//! a block number.

use std::collections::HashMap;

use registry_types::Address;

use crate::events::{ChangePayload, ChangeRecord};

#[derive(Debug, Default)]
pub struct ChangeLog {
    /// Arena, ordered by sequence number.
    records: Vec<ChangeRecord>,
    /// Per-identity pointer to the latest change.
    last_change: HashMap<Address, u64>,
}

impl ChangeLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The identity's latest change pointer, 0 if it never changed.
    pub fn changed(&self, identity: &Address) -> u64 {
        self.last_change.get(identity).copied().unwrap_or(0)
    }

    /// Append all records of one applied operation under a fresh sequence
    /// number and advance the identity's pointer. Returns the sequence
    /// number assigned.
    pub fn append(&mut self, identity: Address, payloads: Vec<ChangePayload>) -> u64 {
        let seq = self.records.last().map(|r| r.seq).unwrap_or(0) + 1;
        let previous_change = self.changed(&identity);
        for payload in payloads {
            self.records.push(ChangeRecord {
                identity,
                seq,
                previous_change,
                payload,
            });
        }
        self.last_change.insert(identity, seq);
        seq
    }

    /// All records emitted under one sequence number, in emission order.
    pub fn records_at(&self, seq: u64) -> &[ChangeRecord] {
        let start = self.records.partition_point(|r| r.seq < seq);
        let end = self.records.partition_point(|r| r.seq <= seq);
        &self.records[start..end]
    }

    /// Total number of records in the arena.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
