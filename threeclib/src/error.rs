use thiserror::Error;

/// Errors from the trace replay driver. Classification itself can't fail
#[derive(Debug, Error)]
pub enum SimError {
    #[error("couldn't access {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't parse the config file: {0}")]
    Config(#[source] serde_json::Error),
    #[error("malformed trace record {record}: {reason}")]
    MalformedTrace { record: usize, reason: String },
    #[error("processor id {0} doesn't fit in a trace record")]
    ProcIdOutOfRange(u32),
    #[error("couldn't serialise the output: {0}")]
    Output(#[source] serde_json::Error),
}
