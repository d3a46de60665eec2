use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("csv row parsing failure: {0}")]
    CSVRowReadFailure(String),
    #[error("output writing failure: {0}")]
    OutputWriteFailure(String),
    #[error("row {row} has no date field")]
    MissingDateField { row: usize },
    #[error("row {row} date {value:?} does not match %Y-%m: {reason}")]
    DateParseFailure {
        row: usize,
        value: String,
        reason: String,
    },
}
