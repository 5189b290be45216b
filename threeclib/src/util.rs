use std::error::Error;
use std::fs;
use regex::Regex;

/// Fixture directory shipped with the crate
pub const TEST_DATA_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data");

pub struct TestCasePaths {
    pub config: String,
    pub trace: String,
    pub output: String,
}

/// Finds every `expected-<trace>-<config>.json` in a directory and pairs it with its
/// `<trace>.trace` and `<config>.json`, sorted by file name
pub fn get_configs(directory: &str) -> Result<Vec<TestCasePaths>, Box<dyn Error>> {
    let output_pattern = Regex::new(r"^expected-(?P<trace>[0-9a-zA-Z_]+)-(?P<config>[0-9a-zA-Z_]+)\.json$")?;
    let mut names = Vec::new();
    for entry in fs::read_dir(directory)? {
        let file_name = entry?.file_name().into_string().map_err(|e| format!("Can't convert OS string ({e:?}) to standard string"))?;
        if output_pattern.is_match(&file_name) {
            names.push(file_name);
        }
    }
    names.sort();
    let mut out = Vec::new();
    for file_name in names {
        let tokens = output_pattern.captures(&file_name).ok_or("Couldn't parse the file name".to_string())?;
        let trace = tokens.name("trace").ok_or("Couldn't get the trace file from the output file name".to_string())?.as_str();
        let config = tokens.name("config").ok_or("Couldn't get the config file from the output file name".to_string())?.as_str();
        out.push(TestCasePaths {
            config: format!("{directory}/{config}.json"),
            trace: format!("{directory}/{trace}.trace"),
            output: format!("{directory}/{file_name}"),
        });
    }
    Ok(out)
}
