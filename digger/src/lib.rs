pub mod commands;
pub mod console;
pub mod handlers;

pub use console::ConsoleObserver;
pub use handlers::{build_config, expand_path};
