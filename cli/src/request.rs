//! Building the discussion request from flags, config and request files

use anyhow::{Context, Result, bail};
use council_application::DiscussionRequest;
use council_domain::{ParticipantRoster, Topic};
use council_infrastructure::FileConfig;
use council_presentation::{Cli, ParticipantSpec};
use std::path::Path;
use tracing::warn;

/// Resolve the request for this invocation.
///
/// `--resume` files are used as-is. Otherwise the request comes from
/// `--request` or from the topic plus config, and command-line flags are
/// applied on top.
pub fn build(cli: &Cli, config: &FileConfig) -> Result<DiscussionRequest> {
    if let Some(path) = &cli.resume {
        let request = read_request(path)?;
        if request.resume.is_none() {
            bail!("{} is not a snapshot file (no resume data)", path.display());
        }
        return Ok(request);
    }

    let mut request = match &cli.request {
        Some(path) => read_request(path)?,
        None => {
            let topic = cli
                .topic
                .as_deref()
                .context("A topic is required (or use --request / --resume)")?;
            let topic = Topic::try_new(topic)?;
            from_config(topic, roster(cli, config)?, config)
        }
    };
    apply_flags(&mut request, cli);

    if request.search.enabled && config.search.searxng_url.is_none() {
        warn!("Search requested but search.searxng_url is not set; continuing without search");
        request.search.enabled = false;
    }

    Ok(request)
}

pub fn write_snapshot(path: &Path, request: &DiscussionRequest) -> Result<()> {
    let json = serde_json::to_string_pretty(request)?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot {}", path.display()))
}

fn read_request(path: &Path) -> Result<DiscussionRequest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a valid discussion request", path.display()))
}

fn roster(cli: &Cli, config: &FileConfig) -> Result<ParticipantRoster> {
    if !cli.participants.is_empty() {
        let participants = cli
            .participants
            .iter()
            .map(ParticipantSpec::to_participant)
            .collect();
        return Ok(ParticipantRoster::new(participants)?);
    }
    if config.discussion.participants.is_empty() {
        bail!(
            "No participants configured. Add [[discussion.participants]] to council.toml \
             or pass -p PROVIDER/MODEL"
        );
    }
    config.discussion.roster().map_err(anyhow::Error::msg)
}

fn from_config(topic: Topic, roster: ParticipantRoster, config: &FileConfig) -> DiscussionRequest {
    let discussion = &config.discussion;
    let mut request = DiscussionRequest::new(topic, roster, discussion.rounds)
        .with_search(config.search.to_search_config())
        .with_termination(discussion.termination.clone());

    if let Some(mode) = discussion.mode {
        request = request.with_mode(mode);
    }
    if let Some(depth) = discussion.depth {
        request = request.with_depth(depth);
    }
    if let Some(profile) = &discussion.profile {
        request = request.with_profile(profile.clone());
    }
    if discussion.stream_chunks {
        request = request.stream_chunks();
    }
    request
}

fn apply_flags(request: &mut DiscussionRequest, cli: &Cli) {
    if let Some(rounds) = cli.rounds {
        request.rounds = rounds;
    }
    if let Some(mode) = cli.mode {
        request.mode = Some(mode);
    }
    if let Some(depth) = cli.depth {
        request.depth = Some(depth);
    }
    if let Some(condition) = cli.termination {
        request.termination.condition = condition;
    }
    if !cli.keywords.is_empty() {
        request.termination.keywords = cli.keywords.clone();
    }
    if !cli.focus.is_empty() || !cli.avoid.is_empty() {
        let mut direction = request.direction.take().unwrap_or_default();
        direction.focus.extend(cli.focus.iter().cloned());
        direction.avoid.extend(cli.avoid.iter().cloned());
        request.direction = Some(direction);
    }
    if let Some(enabled) = cli.search_override() {
        request.search.enabled = enabled;
    }
    if cli.skip_summary {
        request.skip_summary = true;
    }
    if cli.no_stream {
        request.stream_chunks = false;
    }
}
