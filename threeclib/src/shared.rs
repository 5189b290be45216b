use std::collections::HashSet;
use log::trace;
use parking_lot::Mutex;
use crate::classifier::{Address, MissKind, ProcId};
use crate::statistics::StatisticsSink;

/// A miss classifier which can be shared between simulation threads
///
/// Each record, and the sink, sits behind its own lock. A record is checked and updated under a
/// single lock acquisition so no address is ever inserted twice, but no lock is held across both
/// records. Calls racing from different threads can therefore be ordered differently than any
/// serial run would order them; each call still produces exactly one event.
pub struct SharedMissClassifier<S: StatisticsSink + Send> {
    seen_addresses: Mutex<HashSet<Address>>,
    seen_lines: Mutex<HashSet<Address>>,
    sink: Mutex<S>,
}

impl<S: StatisticsSink + Send> SharedMissClassifier<S> {
    pub fn new(sink: S) -> Self {
        Self::with_capacity(0, 0, sink)
    }

    pub fn with_capacity(address_capacity: usize, line_capacity: usize, sink: S) -> Self {
        Self {
            seen_addresses: Mutex::new(HashSet::with_capacity(address_capacity)),
            seen_lines: Mutex::new(HashSet::with_capacity(line_capacity)),
            sink: Mutex::new(sink),
        }
    }

    /// Same rules as [`crate::classifier::MissClassifier::classify_miss`], callable through a
    /// shared reference
    pub fn classify_miss(&self, virtual_address: Address, line_address: Address, proc_id: ProcId) -> MissKind {
        let kind = if self.seen_addresses.lock().insert(virtual_address) {
            MissKind::Compulsory
        } else if self.seen_lines.lock().insert(line_address) {
            MissKind::Capacity
        } else {
            MissKind::Conflict
        };
        trace!("proc {proc_id}: {virtual_address:#x} (line {line_address:#x}) -> {}", kind.stat_name());
        self.sink.lock().record_event(proc_id, kind);
        kind
    }

    pub fn print_3c_stats(&self) {
        self.sink.lock().report();
    }

    pub fn address_count(&self) -> usize {
        self.seen_addresses.lock().len()
    }

    pub fn line_count(&self) -> usize {
        self.seen_lines.lock().len()
    }

    pub fn into_sink(self) -> S {
        self.sink.into_inner()
    }
}
