use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use clap::Parser;
use log::info;
use threeclib::config::ClassifierConfig;
use threeclib::error::SimError;
use threeclib::io::get_trace_bytes;
use threeclib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Classifies data cache misses as compulsory, capacity, or conflict misses"))]
struct Args {
    config: String,
    trace: String,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,

    /// Skip checking the trace format before replaying it
    #[arg(long)]
    unchecked: bool,
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(Args::parse()).map_err(|e| e.to_string())
}

fn run(args: Args) -> Result<(), SimError> {
    let start = Instant::now();
    let config_file = File::open(&args.config).map_err(|source| SimError::Io { path: args.config.clone(), source })?;
    let config: ClassifierConfig = serde_json::from_reader(BufReader::new(config_file)).map_err(SimError::Config)?;
    let mut simulator = Simulator::new(&config);
    let trace = get_trace_bytes(&args.trace)?;
    if !args.unchecked {
        Simulator::validate(&trace)?;
    }
    let result = simulator.simulate(&trace)?;
    println!("{}", serde_json::to_string_pretty(&result).map_err(SimError::Output)?);
    simulator.classifier().print_3c_stats();
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        let (addresses, lines) = simulator.get_record_sizes();
        println!("Distinct virtual addresses recorded: {addresses}");
        println!("Distinct line addresses recorded: {lines}");
        info!("trace {} replayed with {} recorded addresses", args.trace, addresses + lines);
    }
    Ok(())
}
