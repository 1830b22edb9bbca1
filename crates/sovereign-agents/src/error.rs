//! Error Types for the Fund Desk

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeskError>;

#[derive(Error, Debug)]
pub enum DeskError {
    /// A required panel input is absent or empty; carries the inline message
    #[error("{0}")]
    MissingInput(String),

    #[error("Unknown filing type: {0}")]
    UnknownFilingType(String),

    #[error("Unknown panel: {0}")]
    UnknownPanel(String),

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Session error: {0}")]
    Session(String),
}

impl DeskError {
    /// Errors the panel shows inline instead of calling the gateway
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::MissingInput(_) | Self::UnknownFilingType(_))
    }
}

impl From<csv::Error> for DeskError {
    fn from(err: csv::Error) -> Self {
        Self::Dataset(err.to_string())
    }
}
