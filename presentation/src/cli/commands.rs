//! CLI command definitions

use clap::Parser;
use council_domain::{
    BackendSelector, DiscussionDepth, DiscussionMode, OutputFormat, Participant,
    ParticipantRole, RolePreset, TerminationCondition,
};
use std::path::PathBuf;

/// A participant given on the command line as `[ID=]BACKEND[@ROLE]`.
///
/// `BACKEND` is `provider/model` (a bare model uses OpenAI). `ROLE` is a
/// preset name. Without an id the model name is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSpec {
    pub id: String,
    pub backend: BackendSelector,
    pub role: Option<RolePreset>,
}

impl ParticipantSpec {
    pub fn to_participant(&self) -> Participant {
        let participant = Participant::new(&self.id, self.backend.clone());
        match self.role {
            Some(preset) => participant.with_role(ParticipantRole::preset(preset)),
            None => participant,
        }
    }
}

impl std::str::FromStr for ParticipantSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (id, rest) = match s.split_once('=') {
            Some((id, rest)) if !id.trim().is_empty() => (Some(id.trim()), rest),
            Some(_) => return Err(format!("empty participant id in '{}'", s)),
            None => (None, s),
        };
        let (backend, role) = match rest.rsplit_once('@') {
            Some((backend, role)) => (backend, Some(role.parse::<RolePreset>()?)),
            None => (rest, None),
        };
        let backend: BackendSelector = backend.parse()?;
        let id = id.map(str::to_string).unwrap_or_else(|| backend.model.clone());

        Ok(Self { id, backend, role })
    }
}

/// CLI arguments for council
#[derive(Parser, Debug)]
#[command(name = "council")]
#[command(author, version, about = "Run a multi-round discussion between AI models")]
#[command(long_about = r#"
Council seats several AI models at one table and lets them discuss a topic
round-robin. Every participant sees the history so far, may request web
searches, and one of them writes the final summary.

Participants come from [[discussion.participants]] in the config file or
from -p flags (which replace the configured roster).

Configuration files are loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>     Explicit config file
3. ./council.toml      Project-level config
4. ~/.config/council/config.toml   Global config

Example:
  council "Should we rewrite the billing service?"
  council -p optimist=openai/gpt-4o@optimist -p critic=anthropic/claude-sonnet-4-5@critic \
          --rounds 2 "Is a four-day week viable?"
  council --output jsonl --snapshot run.json "Tabs or spaces?"
  council --resume run.json
"#)]
pub struct Cli {
    /// The topic to discuss (not required with --request or --resume)
    pub topic: Option<String>,

    /// Participant as [ID=]PROVIDER/MODEL[@ROLE] (can be specified multiple times)
    #[arg(short, long = "participant", value_name = "SPEC")]
    pub participants: Vec<ParticipantSpec>,

    /// Number of rounds
    #[arg(short, long, value_name = "N")]
    pub rounds: Option<usize>,

    /// Discussion mode: collaborative, debate, brainstorm, critical
    #[arg(long, value_name = "MODE")]
    pub mode: Option<DiscussionMode>,

    /// Discussion depth: brief, standard, deep
    #[arg(long, value_name = "DEPTH")]
    pub depth: Option<DiscussionDepth>,

    /// Early termination: rounds, consensus, keyword, manual
    #[arg(long, value_name = "CONDITION")]
    pub termination: Option<TerminationCondition>,

    /// Stop keyword for --termination keyword (can be specified multiple times)
    #[arg(long = "keyword", value_name = "WORD")]
    pub keywords: Vec<String>,

    /// Aspect the participants should focus on (can be specified multiple times)
    #[arg(long, value_name = "TEXT")]
    pub focus: Vec<String>,

    /// Aspect the participants should avoid (can be specified multiple times)
    #[arg(long, value_name = "TEXT")]
    pub avoid: Vec<String>,

    /// Enable web search (requires search.searxng_url)
    #[arg(long, conflicts_with = "no_search")]
    pub search: bool,

    /// Disable web search
    #[arg(long)]
    pub no_search: bool,

    /// Stop after the last round without generating a summary
    #[arg(long)]
    pub skip_summary: bool,

    /// Do not stream partial responses
    #[arg(long)]
    pub no_stream: bool,

    /// Output format: text or jsonl
    #[arg(short, long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Read the full discussion request from a JSON file
    #[arg(long, value_name = "PATH", conflicts_with = "resume")]
    pub request: Option<PathBuf>,

    /// Resume an interrupted discussion from a snapshot file
    #[arg(long, value_name = "PATH")]
    pub resume: Option<PathBuf>,

    /// Write a resumable snapshot here when interrupted with Ctrl-C
    #[arg(long, value_name = "PATH")]
    pub snapshot: Option<PathBuf>,

    /// Write a JSONL transcript of every event into this directory
    #[arg(long, value_name = "DIR")]
    pub transcript_dir: Option<PathBuf>,

    /// Write diagnostic logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// `Some(true)` / `Some(false)` when a search flag was given.
    pub fn search_override(&self) -> Option<bool> {
        match (self.search, self.no_search) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}
