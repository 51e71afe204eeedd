use thiserror::Error;

use crate::domain::Source;

#[derive(Error, Debug)]
pub enum TemblorError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{origin} response could not be parsed: {message}")]
    Parse { origin: Source, message: String },

    #[error("{origin} fetch failed: {message}")]
    Fetch { origin: Source, message: String },

    #[error("Unknown data source: {0}")]
    UnknownSource(String),

    #[error("Location unavailable: {0}")]
    Location(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TemblorError>;
