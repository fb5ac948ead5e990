//! Presentation layer for council
//!
//! This crate contains the CLI definition, the console renderer, the JSONL
//! event encoder, the progress spinner and the presenter that drives a
//! discussion stream to the terminal.

pub mod cli;
pub mod discussion;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, ParticipantSpec};
pub use discussion::presenter::{DiscussionPresenter, PresentOutcome};
pub use output::console::ConsoleRenderer;
pub use output::jsonl::JsonlEncoder;
pub use progress::reporter::ProgressReporter;
