use std::collections::HashSet;
use log::trace;
use crate::statistics::StatisticsSink;

/// A virtual or cache line address. Only equality and hashing are ever used
pub type Address = u64;

/// Identifier of the core or hardware thread which issued an access
pub type ProcId = u32;

/// The three miss categories of the 3C model
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum MissKind {
    /// First ever reference to the virtual address
    Compulsory,
    /// The address has been seen before, but never as part of this line
    Capacity,
    /// Both the address and the line have been seen, yet the access still missed
    Conflict,
}

impl MissKind {
    /// Every kind, in classification priority order
    pub const ALL: [MissKind; 3] = [MissKind::Compulsory, MissKind::Capacity, MissKind::Conflict];

    /// The name of the statistic this kind of miss is counted under
    pub fn stat_name(&self) -> &'static str {
        match self {
            MissKind::Compulsory => "DCACHE_COMPULSORY_MISS",
            MissKind::Capacity => "DCACHE_CAPACITY_MISS",
            MissKind::Conflict => "DCACHE_CONFLICT_MISS",
        }
    }
}

/// Classifies cache misses as compulsory, capacity, or conflict misses
///
/// The classifier keeps two records, every virtual address it has been given and every line
/// address which has caused a capacity miss. Neither ever shrinks; the classification depends on
/// exact "ever seen" membership, so there is no eviction.
///
/// Each classification is reported to the statistics sink the classifier was built with. The
/// classifier is meant to be owned by the cache model of a single simulation, see
/// [`crate::shared::SharedMissClassifier`] for a version which can be shared between threads.
///
/// # Examples
///
/// ```
/// use threeclib::classifier::{MissClassifier, MissKind};
/// use threeclib::statistics::MissStatistics;
/// let mut classifier = MissClassifier::new(MissStatistics::default());
/// assert_eq!(classifier.classify_miss(0x1000, 0x1000, 0), MissKind::Compulsory);
/// assert_eq!(classifier.classify_miss(0x1000, 0x1040, 0), MissKind::Capacity);
/// assert_eq!(classifier.classify_miss(0x1000, 0x1040, 1), MissKind::Conflict);
/// ```
pub struct MissClassifier<S: StatisticsSink> {
    seen_addresses: HashSet<Address>,
    seen_lines: HashSet<Address>,
    sink: S,
}

impl<S: StatisticsSink> MissClassifier<S> {
    pub fn new(sink: S) -> Self {
        Self::with_capacity(0, 0, sink)
    }

    /// Creates a classifier with both records pre-sized
    ///
    /// # Arguments
    ///
    /// * `address_capacity`: Expected number of distinct virtual addresses
    /// * `line_capacity`: Expected number of distinct line addresses
    /// * `sink`: Where classifications are reported
    ///
    /// returns: MissClassifier<S>
    pub fn with_capacity(address_capacity: usize, line_capacity: usize, sink: S) -> Self {
        Self {
            seen_addresses: HashSet::with_capacity(address_capacity),
            seen_lines: HashSet::with_capacity(line_capacity),
            sink,
        }
    }

    /// Classifies a miss and reports it to the sink, tagged with the processor id
    ///
    /// Must only be called for accesses the cache model has already found to be misses, this
    /// can't be checked here. The rules are tried in order and the first one to match wins, so a
    /// new address on a new line is always compulsory. Only the record belonging to the matching
    /// rule is updated, conflict misses update neither.
    ///
    /// # Arguments
    ///
    /// * `virtual_address`: The address of the access which missed
    /// * `line_address`: The aligned address of the line containing the access
    /// * `proc_id`: The processor which issued the access. Only used to tag the event
    ///
    /// returns: MissKind, the same kind passed to the sink
    pub fn classify_miss(&mut self, virtual_address: Address, line_address: Address, proc_id: ProcId) -> MissKind {
        let kind = if self.seen_addresses.insert(virtual_address) {
            MissKind::Compulsory
        } else if self.seen_lines.insert(line_address) {
            MissKind::Capacity
        } else {
            MissKind::Conflict
        };
        trace!("proc {proc_id}: {virtual_address:#x} (line {line_address:#x}) -> {}", kind.stat_name());
        self.sink.record_event(proc_id, kind);
        kind
    }

    /// Reporting hook, forwards to the sink's own reporting
    pub fn print_3c_stats(&self) {
        self.sink.report();
    }

    /// Number of distinct virtual addresses recorded so far
    pub fn address_count(&self) -> usize {
        self.seen_addresses.len()
    }

    /// Number of distinct line addresses recorded so far
    pub fn line_count(&self) -> usize {
        self.seen_lines.len()
    }

    /// The sink classifications are reported to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the classifier, giving back its sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}
