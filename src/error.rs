use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlvmCovError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML parse error at position {position}: {source}")]
    Xml {
        source: quick_xml::Error,
        position: usize,
    },

    #[error("Unsupported coverage document: {0}")]
    UnsupportedFormat(String),

    #[error("No data section found in coverage report")]
    EmptyReport,

    #[error("Invalid segment order in {filename}: line {current} follows line {previous}")]
    MalformedSegmentOrder {
        filename: String,
        previous: u32,
        current: u32,
    },

    #[error("Missing or invalid field: {0}")]
    MissingField(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlvmCovError>;
