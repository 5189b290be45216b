use serde::Deserialize;

/// Configuration for classifying the misses of one cache
#[derive(Debug, Deserialize)]
pub struct ClassifierConfig {
    /// Label for the classified cache, echoed in the report
    pub name: String,
    /// Expected number of distinct virtual addresses, used to pre-size the record
    #[serde(default)]
    pub address_capacity: usize,
    /// Expected number of distinct line addresses, used to pre-size the record
    #[serde(default)]
    pub line_capacity: usize,
}
