use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use crate::classifier::MissKind;
use crate::config::ClassifierConfig;
use crate::io::get_trace_bytes;
use crate::simulator::Simulator;
use crate::statistics::MissReport;
use crate::util::{get_configs, TEST_DATA_PATH};

#[test]
fn run_all_fixtures() -> Result<(), Box<dyn Error>> {
    let cases = get_configs(TEST_DATA_PATH)?;
    assert_eq!(cases.len(), 4);
    for test in cases {
        println!("Running test for {}", test.output);
        let config_file = File::open(&test.config)?;
        let expected_output_file = File::open(&test.output)?;
        let expected_output: MissReport = serde_json::from_reader(BufReader::new(expected_output_file))?;
        let config: ClassifierConfig = serde_json::from_reader(BufReader::new(config_file))?;
        let trace = get_trace_bytes(&test.trace)?;
        Simulator::validate(&trace)?;
        let mut simulator = Simulator::new(&config);
        let result = simulator.simulate(&trace)?;
        assert_eq!(result, expected_output);
        let time = simulator.get_execution_time();
        println!("Success for {}, time: {}", test.output, time.as_nanos() as f64 / 1e9);
    }
    Ok(())
}

#[test]
fn replaying_in_chunks_matches_one_pass() -> Result<(), Box<dyn Error>> {
    let config: ClassifierConfig = serde_json::from_str(r#"{"name": "l1d"}"#)?;
    let trace = get_trace_bytes(&format!("{TEST_DATA_PATH}/strided.trace"))?;
    let mut whole = Simulator::new(&config);
    let expected = whole.simulate(&trace)?;
    let mut chunked = Simulator::new(&config);
    for chunk in trace.chunks(crate::simulator::RECORD_SIZE * 7) {
        chunked.simulate(chunk)?;
    }
    assert_eq!(chunked.get_report(), expected);
    assert_eq!(chunked.get_record_sizes(), whole.get_record_sizes());
    Ok(())
}

#[test]
fn every_category_appears_in_the_strided_fixture() -> Result<(), Box<dyn Error>> {
    let config: ClassifierConfig = serde_json::from_str(r#"{"name": "l1d"}"#)?;
    let trace = get_trace_bytes(&format!("{TEST_DATA_PATH}/strided.trace"))?;
    let mut simulator = Simulator::new(&config);
    let report = simulator.simulate(&trace)?;
    for kind in MissKind::ALL {
        assert!(report.total.get(kind) > 0, "no {} in the fixture", kind.stat_name());
    }
    // Every distinct address is compulsory exactly once
    let (addresses, lines) = simulator.get_record_sizes();
    assert_eq!(report.total.compulsory, addresses as u64);
    assert_eq!(report.total.capacity, lines as u64);
    Ok(())
}
