pub mod error;
pub mod fetcher;
pub mod patterns;
pub mod result;

pub use error::FetchError;
pub use fetcher::{ContentFetcher, HttpFetcher, StaticFetcher};
pub use result::FetchedPage;
