use std::collections::BTreeMap;
use log::info;
use serde::{Deserialize, Serialize};
use crate::classifier::{MissKind, ProcId};

/// Receives one event for every classified miss
///
/// Implementations decide how events are aggregated and reported, the classifier only
/// guarantees exactly one call to `record_event` per classification
pub trait StatisticsSink {
    /// Records a single classified miss for a processor
    ///
    /// # Arguments
    ///
    /// * `proc_id`: The processor which issued the access, as given to the classifier
    /// * `kind`: The classification
    ///
    /// returns: ()
    fn record_event(&mut self, proc_id: ProcId, kind: MissKind);

    /// Surfaces whatever has been aggregated so far. Sinks without a reporting format can rely on
    /// the default, which does nothing
    fn report(&self) {}
}

/// Keeps every event in order. Mostly useful for tests and for hosts doing their own aggregation
impl StatisticsSink for Vec<(ProcId, MissKind)> {
    fn record_event(&mut self, proc_id: ProcId, kind: MissKind) {
        self.push((proc_id, kind));
    }
}

/// Miss counts for one processor, or for all of them
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct MissCounts {
    pub compulsory: u64,
    pub capacity: u64,
    pub conflict: u64,
}

impl MissCounts {
    pub fn get(&self, kind: MissKind) -> u64 {
        match kind {
            MissKind::Compulsory => self.compulsory,
            MissKind::Capacity => self.capacity,
            MissKind::Conflict => self.conflict,
        }
    }

    fn increment(&mut self, kind: MissKind) {
        match kind {
            MissKind::Compulsory => self.compulsory += 1,
            MissKind::Capacity => self.capacity += 1,
            MissKind::Conflict => self.conflict += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.compulsory + self.capacity + self.conflict
    }

    /// The share of misses of the given kind, 0 if there were no misses at all
    pub fn miss_fraction(&self, kind: MissKind) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.get(kind) as f64 / total as f64,
        }
    }

    fn merge(&mut self, other: &MissCounts) {
        self.compulsory += other.compulsory;
        self.capacity += other.capacity;
        self.conflict += other.conflict;
    }
}

/// Counts classified misses per processor
#[derive(Debug, Default, Clone)]
pub struct MissStatistics {
    processors: BTreeMap<ProcId, MissCounts>,
}

impl StatisticsSink for MissStatistics {
    fn record_event(&mut self, proc_id: ProcId, kind: MissKind) {
        self.processors.entry(proc_id).or_default().increment(kind);
    }

    fn report(&self) {
        for (proc_id, counts) in &self.processors {
            info!("proc {proc_id}: {}", format_counts(counts));
        }
        info!("total: {}", format_counts(&self.total()));
    }
}

impl MissStatistics {
    /// Counts for a single processor, zero if it never missed
    pub fn processor(&self, proc_id: ProcId) -> MissCounts {
        self.processors.get(&proc_id).copied().unwrap_or_default()
    }

    /// Counts summed over every processor
    pub fn total(&self) -> MissCounts {
        let mut total = MissCounts::default();
        self.processors.values().for_each(|c| total.merge(c));
        total
    }

    /// Builds the serialisable report, processors in ascending id order
    pub fn to_report(&self, name: &str) -> MissReport {
        MissReport {
            name: name.to_string(),
            processors: self.processors.iter().map(|(proc_id, counts)| ProcessorResult {
                proc_id: *proc_id,
                counts: *counts,
            }).collect(),
            total: self.total(),
        }
    }
}

fn format_counts(counts: &MissCounts) -> String {
    MissKind::ALL
        .iter()
        .map(|kind| format!("{} = {} ({:.2}%)", kind.stat_name(), counts.get(*kind), counts.miss_fraction(*kind) * 100.0))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The result of classifying a run. Can be serialised to the output format
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct MissReport {
    pub name: String,
    pub processors: Vec<ProcessorResult>,
    pub total: MissCounts,
}

/// The result for an individual processor
#[derive(Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ProcessorResult {
    pub proc_id: ProcId,
    #[serde(flatten)]
    pub counts: MissCounts,
}
