//! CLI entrypoint for council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod request;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{NoSearch, RunDiscussionUseCase, SearchGateway};
use council_domain::{OutputFormat, SnapshotRecorder};
use council_infrastructure::{
    ConfigLoader, FileConfig, JsonlTranscriptLogger, RoutingGateway, SearxngSearchGateway,
};
use council_presentation::{Cli, ConsoleRenderer, DiscussionPresenter, ProgressReporter};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Exit status after Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    if cli.show_config {
        show_config(&cli, &config)?;
        return Ok(ExitCode::SUCCESS);
    }

    let log_file = cli.log_file.as_deref().or(config.logging.log_file.as_deref());
    let _guard = init_tracing(cli.verbose, config.logging.filter.as_deref(), log_file)?;

    info!("Starting council");

    let issues = config.validate();
    if !issues.is_empty() {
        let list = issues
            .iter()
            .map(|issue| format!("  - {}", issue))
            .collect::<Vec<_>>()
            .join("\n");
        bail!("Invalid configuration:\n{}", list);
    }

    let request = request::build(&cli, &config)?;

    let format = cli.output.or(config.output.format).unwrap_or_default();
    if cli.no_color || !config.output.color || format == OutputFormat::Jsonl {
        colored::control::set_override(false);
    }

    // === Dependency Injection ===
    let gateway = Arc::new(RoutingGateway::from_config(&config.providers)?);
    let search: Arc<dyn SearchGateway> = match &config.search.searxng_url {
        Some(url) if request.search.enabled => Arc::new(SearxngSearchGateway::new(
            url.as_str(),
            Duration::from_secs(config.search.timeout_secs),
        )?),
        _ => Arc::new(NoSearch),
    };

    let mut use_case = RunDiscussionUseCase::with_search(gateway, search);
    let transcript_dir = cli
        .transcript_dir
        .as_ref()
        .or(config.logging.transcript_dir.as_ref());
    if let Some(dir) = transcript_dir {
        match JsonlTranscriptLogger::in_dir(dir) {
            Ok(logger) => {
                info!("Writing transcript to {}", logger.path().display());
                use_case = use_case.with_logger(Arc::new(logger));
            }
            Err(e) => warn!("Transcript disabled: cannot write to {}: {}", dir.display(), e),
        }
    }

    let mut recorder = match &request.resume {
        Some(snapshot) => SnapshotRecorder::from_snapshot(snapshot, request.participants.len()),
        None => SnapshotRecorder::new(request.participants.len(), request.total_rounds()),
    };

    let renderer = ConsoleRenderer::new(&request.participants)
        .with_followups(config.output.show_followups);
    let header = renderer.header(&request.topic, &request.participants);
    let mut presenter = DiscussionPresenter::new(std::io::stdout(), format, renderer);
    if !cli.quiet {
        presenter.write_text(&header)?;
        if config.output.show_progress {
            presenter = presenter.with_progress(ProgressReporter::new());
        }
    }

    let stream = use_case.execute(request.clone())?;
    let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
            warn!("Ctrl-C handler unavailable; run cannot be interrupted");
            std::future::pending::<()>().await;
        }
    };
    let outcome = presenter.present(stream, &mut recorder, interrupt).await?;

    if outcome.interrupted {
        eprintln!("\nInterrupted.");
        match &cli.snapshot {
            Some(_) if recorder.is_finished() => {
                eprintln!("All rounds were finished; nothing to resume.");
            }
            Some(path) => {
                request::write_snapshot(path, &request.resumed(&recorder))?;
                eprintln!(
                    "Snapshot written to {}. Continue with: council --resume {}",
                    path.display(),
                    path.display()
                );
            }
            None => {}
        }
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    }

    if outcome.fatal {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Initialize logging based on verbosity level.
///
/// `-v` flags win over `RUST_LOG`, which wins over `logging.filter`.
/// Logs go to stderr, or to `log_file` through a non-blocking writer.
fn init_tracing(
    verbose: u8,
    configured: Option<&str>,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(configured.unwrap_or("warn"))),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("Invalid log file path: {}", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("Failed to create {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).with_ansi(false).init();
            Ok(Some(guard))
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            Ok(None)
        }
    }
}

fn show_config(cli: &Cli, config: &FileConfig) -> Result<()> {
    for line in ConfigLoader::describe_sources(cli.config.as_deref()) {
        println!("{}", line);
    }
    println!();
    let mut shown = config.clone();
    let providers = &mut shown.providers;
    let keys = [&mut providers.openai.api_key, &mut providers.anthropic.api_key]
        .into_iter()
        .chain(providers.custom.values_mut().map(|c| &mut c.api_key));
    for key in keys.filter(|key| key.is_some()) {
        *key = Some("********".to_string());
    }

    println!("Merged configuration:");
    println!("{}", toml::to_string_pretty(&shown)?);

    let issues = config.validate();
    if !issues.is_empty() {
        println!("Problems:");
        for issue in issues {
            println!("  - {}", issue);
        }
    }
    Ok(())
}
