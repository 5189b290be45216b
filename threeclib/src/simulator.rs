use std::time::{Duration, Instant};
use log::debug;
use crate::classifier::{MissClassifier, MissKind};
use crate::config::ClassifierConfig;
use crate::error::SimError;
use crate::hex::HEX_LOOKUP;
use crate::statistics::{MissReport, MissStatistics};

// PPP VVVVVVVVVVVVVVVV LLLLLLLLLLLLLLLL\n
pub const RECORD_SIZE: usize = 38;
const PROC_OFFSET: usize = 0;
const PROC_SIZE: usize = 3;
const PROC_UPPER: usize = PROC_OFFSET + PROC_SIZE;
/// Largest processor id a record can hold
pub const MAX_PROC_ID: u32 = 999;
const ADDRESS_OFFSET: usize = PROC_UPPER + 1;
const ADDRESS_SIZE: usize = 16;
const ADDRESS_UPPER: usize = ADDRESS_OFFSET + ADDRESS_SIZE;
const LINE_OFFSET: usize = ADDRESS_UPPER + 1;
const LINE_UPPER: usize = LINE_OFFSET + ADDRESS_SIZE;

/// Replays a trace of confirmed misses through a classifier and collects the results.
///
/// It supports calling simulate multiple times, the classifier records and the time taken carry
/// over between calls
pub struct Simulator {
    name: String,
    classifier: MissClassifier<MissStatistics>,
    simulation_time: Duration,
}

impl Simulator {

    /// Creates a new simulator for a given configuration
    ///
    /// # Arguments
    ///
    /// * `config`: A classifier configuration, usually resulting from parsing JSON
    ///
    /// returns: Simulator
    pub fn new(config: &ClassifierConfig) -> Self {
        Self {
            name: config.name.clone(),
            classifier: MissClassifier::with_capacity(config.address_capacity, config.line_capacity, MissStatistics::default()),
            simulation_time: Duration::new(0, 0),
        }
    }

    /// Replays a miss trace held in a byte array.
    ///
    /// The byte array must follow the trace format, one 38 byte record per miss. Only the length
    /// is checked; for speed the records themselves aren't, use [`Simulator::validate`] first if
    /// the input may be malformed. A malformed record won't be caught here and gives meaningless
    /// classifications (or trips a debug assertion in debug builds).
    ///
    /// Reads from the byte array are sequential, so a memory mapped trace can be advised as such
    ///
    /// # Arguments
    ///
    /// * `bytes`: The input byte array
    ///
    /// returns: Result<MissReport, SimError>
    pub fn simulate(&mut self, bytes: &[u8]) -> Result<MissReport, SimError> {
        if bytes.len() % RECORD_SIZE != 0 {
            return Err(SimError::MalformedTrace {
                record: bytes.len() / RECORD_SIZE,
                reason: format!("trailing partial record of {} bytes", bytes.len() % RECORD_SIZE),
            });
        }
        let start = Instant::now();
        let mut i: usize = 0;
        while i < bytes.len() {
            let buffer = &bytes[i..i + RECORD_SIZE];
            let proc_id = parse_proc_id((&buffer[PROC_OFFSET..PROC_UPPER]).try_into().unwrap());
            let address = parse_address((&buffer[ADDRESS_OFFSET..ADDRESS_UPPER]).try_into().unwrap());
            let line = parse_address((&buffer[LINE_OFFSET..LINE_UPPER]).try_into().unwrap());
            self.classifier.classify_miss(address, line, proc_id);
            i += RECORD_SIZE;
        }
        let elapsed = start.elapsed();
        debug!("replayed {} misses in {:?}", bytes.len() / RECORD_SIZE, elapsed);
        self.simulation_time += elapsed;
        Ok(self.get_report())
    }

    /// Checks every record of a trace, reporting the first malformed one
    pub fn validate(bytes: &[u8]) -> Result<(), SimError> {
        let malformed = |record: usize, reason: &str| SimError::MalformedTrace { record, reason: reason.to_string() };
        for (record, buffer) in bytes.chunks(RECORD_SIZE).enumerate() {
            if buffer.len() != RECORD_SIZE {
                return Err(malformed(record, "truncated record"));
            }
            if !buffer[PROC_OFFSET..PROC_UPPER].iter().all(u8::is_ascii_digit) {
                return Err(malformed(record, "processor id is not 3 decimal digits"));
            }
            if !buffer[ADDRESS_OFFSET..ADDRESS_UPPER].iter().all(u8::is_ascii_hexdigit) {
                return Err(malformed(record, "virtual address is not 16 hex digits"));
            }
            if !buffer[LINE_OFFSET..LINE_UPPER].iter().all(u8::is_ascii_hexdigit) {
                return Err(malformed(record, "line address is not 16 hex digits"));
            }
            if buffer[PROC_UPPER] != b' ' || buffer[ADDRESS_UPPER] != b' ' || buffer[LINE_UPPER] != b'\n' {
                return Err(malformed(record, "bad field separator"));
            }
        }
        Ok(())
    }

    /// Builds the report for everything replayed so far
    pub fn get_report(&self) -> MissReport {
        self.classifier.sink().to_report(&self.name)
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of distinct virtual and line addresses recorded
    pub fn get_record_sizes(&self) -> (usize, usize) {
        (self.classifier.address_count(), self.classifier.line_count())
    }

    /// Classifies a single miss outside of a trace
    pub fn classify(&mut self, virtual_address: u64, line_address: u64, proc_id: u32) -> MissKind {
        self.classifier.classify_miss(virtual_address, line_address, proc_id)
    }

    pub fn classifier(&self) -> &MissClassifier<MissStatistics> {
        &self.classifier
    }
}

/// Parses a 64-bit value from a 16 byte hexadecimal address
///
/// Parsing addresses with the standard library dominates the replay time, as classification is
/// only a couple of hash lookups, so we use a custom implementation.
///
/// Each pair of hex digits is looked up in a 2^16 entry table generated by build.rs. Input
/// format checks are omitted; it won't panic in release builds, but malformed input gives
/// meaningless results
///
/// # Arguments
///
/// * `buf`: The byte buffer
///
/// returns: u64
///
/// # Examples
///
/// ```
/// use threeclib::simulator::parse_address;
/// assert_eq!(parse_address(b"000000000000000A"), 10);
/// assert_eq!(parse_address(b"00007ffd1234abcd"), 0x7ffd_1234_abcd);
/// ```
pub fn parse_address(buf: &[u8; 16]) -> u64 {
    let mut res: u64 = 0;
    let mut x = 0;
    while x < 15 {
        res <<= 8;
        res |= HEX_LOOKUP[buf[x] as usize][buf[x + 1] as usize] as u64;
        x += 2;
    }
    debug_assert_eq!(
        {
            let addr_as_str = std::str::from_utf8(buf).unwrap();
            u64::from_str_radix(addr_as_str, 16).unwrap()
        },
        res
    );
    res
}

/// Parses the 3 digit decimal processor id
///
/// Like [`parse_address`] the digits aren't checked. It never panics, non digits give a
/// meaningless id
///
/// # Arguments
///
/// * `buf`: The input
///
/// returns: u32
///
/// # Examples
///
/// ```
/// use threeclib::simulator::parse_proc_id;
/// assert_eq!(parse_proc_id(b"012"), 12);
/// ```
pub fn parse_proc_id(buf: &[u8; 3]) -> u32 {
    let mut res = buf[2].wrapping_sub(b'0') as u32;
    res += 10u32 * buf[1].wrapping_sub(b'0') as u32;
    res += 100u32 * buf[0].wrapping_sub(b'0') as u32;
    res
}

/// Formats a single trace record, the inverse of the parsing done by [`Simulator::simulate`]
///
/// Processor ids above 999 don't fit the record and are rejected
///
/// # Examples
///
/// ```
/// use threeclib::simulator::{format_record, RECORD_SIZE};
/// let record = format_record(1, 0x1000, 0x1000).unwrap();
/// assert_eq!(record, "001 0000000000001000 0000000000001000\n");
/// assert_eq!(record.len(), RECORD_SIZE);
/// assert!(format_record(1000, 0x1000, 0x1000).is_err());
/// ```
pub fn format_record(proc_id: u32, virtual_address: u64, line_address: u64) -> Result<String, SimError> {
    if proc_id > MAX_PROC_ID {
        return Err(SimError::ProcIdOutOfRange(proc_id));
    }
    Ok(format!("{proc_id:03} {virtual_address:016x} {line_address:016x}\n"))
}

#[cfg(test)]
mod tests {
    use crate::statistics::MissCounts;
    use super::*;

    fn config() -> ClassifierConfig {
        ClassifierConfig { name: "l1d".to_string(), address_capacity: 8, line_capacity: 8 }
    }

    fn trace(records: &[(u32, u64, u64)]) -> Vec<u8> {
        records.iter().map(|(p, va, line)| format_record(*p, *va, *line).unwrap()).collect::<String>().into_bytes()
    }

    #[test]
    fn replays_records_in_order() -> Result<(), SimError> {
        let bytes = trace(&[(0, 0x1000, 0x1000), (0, 0x1000, 0x1040), (0, 0x1000, 0x1040), (1, 0x2000, 0x1040)]);
        Simulator::validate(&bytes)?;
        let mut simulator = Simulator::new(&config());
        let report = simulator.simulate(&bytes)?;
        assert_eq!(report.name, "l1d");
        assert_eq!(report.processors[0].counts, MissCounts { compulsory: 1, capacity: 1, conflict: 1 });
        assert_eq!(report.processors[1].counts, MissCounts { compulsory: 1, capacity: 0, conflict: 0 });
        assert_eq!(simulator.get_record_sizes(), (2, 1));
        Ok(())
    }

    #[test]
    fn records_carry_over_between_calls() -> Result<(), SimError> {
        let mut simulator = Simulator::new(&config());
        simulator.simulate(&trace(&[(2, 0xABC0, 0xAB80)]))?;
        let report = simulator.simulate(&trace(&[(2, 0xABC0, 0xAB80), (2, 0xABC0, 0xAB80)]))?;
        assert_eq!(report.total, MissCounts { compulsory: 1, capacity: 1, conflict: 1 });
        assert_eq!(simulator.classify(0xABC0, 0xAB80, 4), MissKind::Conflict);
        Ok(())
    }

    #[test]
    fn upper_case_hex() {
        assert_eq!(parse_address(b"DEADBEEF00000040"), 0xDEAD_BEEF_0000_0040);
        assert_eq!(parse_address(b"deadbeef00000040"), 0xDEAD_BEEF_0000_0040);
        assert_eq!(parse_address(b"FFFFFFFFFFFFFFFF"), u64::MAX);
    }

    #[test]
    fn partial_record_is_rejected() {
        let mut bytes = trace(&[(0, 1, 0)]);
        bytes.extend_from_slice(b"000 ");
        let mut simulator = Simulator::new(&config());
        assert!(matches!(simulator.simulate(&bytes), Err(SimError::MalformedTrace { record: 1, .. })));
        assert!(matches!(Simulator::validate(&bytes), Err(SimError::MalformedTrace { record: 1, .. })));
    }

    #[test]
    fn validate_reports_the_first_bad_record() {
        let mut bytes = trace(&[(0, 1, 0), (0, 2, 0), (0, 3, 0)]);
        bytes[RECORD_SIZE + ADDRESS_OFFSET + 3] = b'g';
        bytes[2 * RECORD_SIZE + PROC_UPPER] = b'_';
        match Simulator::validate(&bytes) {
            Err(SimError::MalformedTrace { record, reason }) => {
                assert_eq!(record, 1);
                assert!(reason.contains("virtual address"));
            }
            other => panic!("expected a malformed record, got {other:?}"),
        }
    }

    #[test]
    fn bad_proc_id_digits_do_not_panic() -> Result<(), SimError> {
        let mut simulator = Simulator::new(&config());
        let report = simulator.simulate(b"0 1 0000000000001000 0000000000001000\n")?;
        assert_eq!(report.total.compulsory, 1);
        assert!(Simulator::validate(b"0 1 0000000000001000 0000000000001000\n").is_err());
        Ok(())
    }

    #[test]
    fn proc_ids_must_fit_three_digits() -> Result<(), SimError> {
        assert_eq!(format_record(MAX_PROC_ID, 0, 0)?.len(), RECORD_SIZE);
        assert!(matches!(format_record(MAX_PROC_ID + 1, 0, 0), Err(SimError::ProcIdOutOfRange(1000))));
        Ok(())
    }
}
