//! `[output]` section: how the CLI presents a run

use council_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// `text` or `jsonl`; `--output` wins when given
    pub format: Option<OutputFormat>,
    pub color: bool,
    /// Spinner while a participant is thinking
    pub show_progress: bool,
    /// Print follow-up questions after the summary
    pub show_followups: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            show_progress: true,
            show_followups: true,
        }
    }
}
