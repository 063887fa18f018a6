//! Front-end command: select files, run one analysis, show the result.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;

use crate::client::AnalysisClient;
use crate::config::ClientConfig;
use crate::intake::FilePicker;
use crate::session::{format_view, render, LoadingPhrases, RequestState, SessionDriver, View};

/// Analyze the first of `files` through the configured endpoint.
pub async fn cmd_analyze(config: &ClientConfig, files: &[PathBuf], json: bool) -> anyhow::Result<()> {
    let client = AnalysisClient::new(config)?;
    tracing::info!("Using analysis endpoint {}", client.endpoint());

    let (driver, updates) = SessionDriver::new(
        Arc::new(client),
        Duration::from_millis(config.min_loading_ms),
    );
    let (tx, commands) = mpsc::channel(8);
    let mut task = tokio::spawn(driver.run(commands));

    let picker = FilePicker::new(tx);
    let selected = picker.pick(files).await?;
    if selected > 1 {
        eprintln!(
            "  {} {} files selected, analyzing only the first",
            style("!").yellow(),
            selected
        );
    }
    // Closing the channel lets the driver finish after this selection
    drop(picker);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(100));

    let phrases = LoadingPhrases::default();
    let started = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(250));

    let snapshot = loop {
        tokio::select! {
            done = &mut task => break done?,
            _ = ticker.tick() => {
                let current = updates.borrow().clone();
                if let View::Progress { file } = render(&current) {
                    spinner.set_message(format!(
                        "{} {}",
                        phrases.phrase_at(started.elapsed()),
                        style(file).dim()
                    ));
                }
            }
        }
    };
    spinner.finish_and_clear();

    match snapshot.state {
        RequestState::Succeeded(ref result) if json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            Ok(())
        }
        RequestState::Succeeded(_) => {
            print!("{}", format_view(&render(&snapshot)));
            Ok(())
        }
        RequestState::Failed(_) => {
            eprint!("{}", format_view(&render(&snapshot)));
            anyhow::bail!("Analysis failed")
        }
        // The driver only stops after the selection has completed
        RequestState::Idle | RequestState::Analyzing { .. } => {
            anyhow::bail!("Analysis did not complete")
        }
    }
}
