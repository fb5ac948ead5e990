//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Directory for per-run JSONL transcripts (disabled when unset)
    pub transcript_dir: Option<PathBuf>,
    /// Diagnostic log file; tracing output goes to stderr when unset
    pub log_file: Option<PathBuf>,
    /// `EnvFilter` directive used when no `-v` flag is given
    pub filter: Option<String>,
}
