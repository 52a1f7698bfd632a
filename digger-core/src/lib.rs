pub mod config;
pub mod error;
pub mod history;
pub mod links;
pub mod lister;
pub mod model;
pub mod pipeline;
pub mod probe;
pub mod report;

pub use config::DiggerConfig;
pub use error::{DiggerError, Result};
pub use model::{Candidate, HostingLink, RunSummary};
pub use pipeline::{PipelineObserver, RunOutcome, SilentObserver, Stage, execute_run};
