//! Progress reporting for discussion runs

use council_domain::ProgressEvent;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Shows a spinner while a participant is thinking or a search is running.
///
/// The spinner draws on stderr, so it never mixes with JSONL on stdout.
pub struct ProgressReporter {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    /// Status line for events that start a wait, if any.
    pub fn status_for(event: &ProgressEvent) -> Option<(String, String)> {
        match event {
            ProgressEvent::Progress {
                round,
                total_rounds,
                participant,
                ..
            } => Some((
                format!("Round {}/{}", round, total_rounds),
                format!("{} is thinking...", participant.name),
            )),
            ProgressEvent::Searching { query } => {
                Some(("Search".to_string(), format!("{}...", query)))
            }
            _ => None,
        }
    }

    /// Remove the spinner before anything is printed.
    pub fn clear(&self) {
        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }

    /// Start a spinner when `event` begins a wait.
    pub fn observe(&self, event: &ProgressEvent) {
        let Some((prefix, message)) = Self::status_for(event) else {
            return;
        };
        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::spinner_style());
        pb.set_prefix(prefix);
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.spinner.lock()
            && let Some(previous) = spinner.replace(pb)
        {
            previous.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}
