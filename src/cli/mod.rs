//! CLI layer - Command-line interface
//!
//! Contains argument parsing, terminal output, keyboard input,
//! signal handling, and the interview runner.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod input;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_interview, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, InterviewOptions};
pub use presenter::{Presenter, TerminalView};
