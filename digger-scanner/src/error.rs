use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Failed to retrieve {url}: status code {status}")]
    Status { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// The HTTP status carried by a non-success response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::HttpError(e) => e.status().map(|s| s.as_u16()),
            FetchError::InvalidUrl(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
