use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A successfully fetched page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub status_code: u16,
    pub content_type: Option<String>,
    pub response_time: Duration,
    pub body: String,
}

impl FetchedPage {
    pub fn new(url: String, body: String) -> Self {
        Self {
            url,
            status_code: 200,
            content_type: None,
            response_time: Duration::from_secs(0),
            body,
        }
    }
}
