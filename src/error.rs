use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no fields configured")]
    EmptyFieldConfig,

    #[error("configured field #{index} is an empty path")]
    EmptyFieldPath { index: usize },

    #[error("field path `{path}` contains an empty segment")]
    EmptySegment { path: String },

    #[error("group key `{group_key}` is not one of the configured fields")]
    GroupKeyNotConfigured { group_key: String },

    #[error("nesting under `{path}` exceeds the limit of {limit} array levels")]
    NestingTooDeep { path: String, limit: usize },

    #[error("input document is not an array of records")]
    NotAnArray,

    #[error("line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("no rows to convert")]
    NoRows,

    #[error("row {index} is not a JSON object")]
    NotARowObject { index: usize },

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, Error>;
