use shared::error::ApiException;
use thiserror::Error;

use crate::flow::Screen;

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("invalid server url: {0}")]
    InvalidServerUrl(#[from] url::ParseError),
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server rejected request with status {status}: {source}")]
    Rejected {
        status: u16,
        #[source]
        source: ApiException,
    },
    #[error("server responded with unexpected status {0}")]
    UnexpectedStatus(u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowError {
    #[error("`{event}` is not accepted on the {screen} screen")]
    UnexpectedEvent { screen: Screen, event: &'static str },
    #[error("grade row {row} does not exist (table has {rows} rows)")]
    UnknownRow { row: usize, rows: usize },
}
