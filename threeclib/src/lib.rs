//! # ThreeCLib
//!
//! ThreeCLib classifies data cache misses into the "3C" categories, compulsory, capacity, and
//! conflict misses, so a cache simulator can attribute its misses to a root cause
//!
//! The classifier is handed to the host's cache model and called once for every miss the model
//! finds. It never decides whether an access hits; it only explains a miss. Classifications are
//! reported to a statistics sink chosen by the host
//!
//! A trace replay simulator is provided to classify miss logs offline

/// Contains the classifier and the miss categories
pub mod classifier;

/// Contains the JSON configuration format for the replay simulator
pub mod config;

/// Contains the error type of the replay simulator
pub mod error;

/// Contains trace file loading
pub mod io;

/// Contains a classifier which can be shared between threads
pub mod shared;

/// Contains the simulator used to replay miss traces through a classifier
pub mod simulator;

/// Contains the statistics sink trait and a per-processor counting sink
pub mod statistics;

// Generated from the build.rs, private
mod hex {
    include!(concat!(env!("OUT_DIR"), "/hex.rs"));
}
#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
