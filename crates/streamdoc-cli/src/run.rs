//! One-shot chat run: resolve config, stream the answer, print the document

use crate::args::Cli;
use crate::chart::TerminalChartRenderer;
use crate::presenter::TerminalPresenter;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use streamdoc_core::config::{ConfigOverlay, load_config};
use streamdoc_core::{
    ChatRequest, ChatSession, ClientConfig, HttpTransport, LoggingConfig, SessionEnd,
    SessionSummary, StreamDocResult,
};
use tracing_subscriber::EnvFilter;

type TerminalSession = ChatSession<HttpTransport, TerminalPresenter, TerminalChartRenderer>;

/// Layer config file, environment and command line, then validate
pub fn resolve_config(cli: &Cli) -> StreamDocResult<ClientConfig> {
    load_config(&cli.config_file, overrides(cli))
}

/// Command line flags take precedence over every other source
pub fn overrides(cli: &Cli) -> ConfigOverlay {
    ConfigOverlay {
        endpoint: cli.endpoint.clone(),
        width: cli.width,
        log_level: cli.verbose.then(|| "debug".to_string()),
        log_format: cli.json_logs.then(|| "json".to_string()),
        ..ConfigOverlay::default()
    }
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if logging.is_json() {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

pub async fn run(cli: Cli, config: ClientConfig) -> anyhow::Result<()> {
    let width = config.render.width;
    let transport = HttpTransport::from_config(&config)?;
    let presenter = TerminalPresenter::new(width).raw(cli.raw);
    let session: Arc<TerminalSession> = Arc::new(ChatSession::new(
        transport,
        presenter,
        TerminalChartRenderer::new(width),
    ));

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    spinner.set_message(format!("Waiting for {}", config.endpoint));
    spinner.enable_steady_tick(Duration::from_millis(100));
    let progress = tokio::spawn(track_progress(session.clone(), spinner.clone()));

    let outcome = tokio::select! {
        result = session.start(ChatRequest::new(cli.prompt.clone())) => Some(result),
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            None
        }
    };

    progress.abort();
    spinner.finish_and_clear();

    let document = session.with_presenter(|presenter| presenter.render_document());
    if !document.is_empty() {
        println!("{}", document);
    }

    match outcome {
        None => {
            eprintln!("{}", "Interrupted, partial answer shown above".yellow());
            Ok(())
        }
        Some(Ok(SessionEnd::Completed(summary))) => {
            if cli.verbose {
                eprintln!("{}", format_summary(&summary).dimmed());
            }
            Ok(())
        }
        Some(Ok(SessionEnd::Superseded)) => Ok(()),
        Some(Err(e)) => {
            tracing::error!("chat stream failed: {}", e);
            Err(e.into())
        }
    }
}

async fn track_progress(session: Arc<TerminalSession>, spinner: ProgressBar) {
    let mut interval = tokio::time::interval(Duration::from_millis(200));
    loop {
        interval.tick().await;
        let snapshot = session.snapshot();
        if snapshot.is_empty() {
            continue;
        }
        spinner.set_message(format!(
            "Receiving: {} chars, {} tool slots",
            snapshot.plain_text().chars().count(),
            snapshot.slots().count()
        ));
    }
}

/// One-line session report for verbose mode
pub fn format_summary(summary: &SessionSummary) -> String {
    let mut line = format!(
        "{} frames ({} ignored), {} segments, {} slots, {} rendered",
        summary.frames,
        summary.ignored_frames,
        summary.segments,
        summary.slots,
        summary.renders.rendered
    );
    if summary.renders.dropped > 0 || summary.renders.failed > 0 {
        line.push_str(&format!(
            ", {} dropped, {} failed",
            summary.renders.dropped, summary.renders.failed
        ));
    }
    if !summary.saw_done {
        line.push_str(", no done event");
    }
    if summary.trailing_bytes > 0 {
        line.push_str(&format!(", {} trailing bytes", summary.trailing_bytes));
    }
    line
}
