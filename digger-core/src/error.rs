use digger_scanner::FetchError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiggerError {
    #[error("Failed to retrieve the listing page: {0}")]
    Fetch(#[from] FetchError),

    #[error("History store {} is unavailable: {source}", .path.display())]
    StoreUnavailable { path: PathBuf, source: io::Error },

    #[error("Failed to write history store {}: {source}", .path.display())]
    StoreWriteFailed { path: PathBuf, source: io::Error },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DiggerError>;
