//! collab-check — binary entrypoint.
//! Runs the sentiment and/or fetch suites and maps the verdict to the exit code.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use collab_check::config::HarnessConfig;
use collab_check::runner::{self, Collaborators};
use collab_check::telemetry::Telemetry;

#[derive(Debug, Parser)]
#[command(
    name = "collab-check",
    version,
    about = "Diagnostic harness for sentiment and fetch backends"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Config file (TOML). Falls back to $HARNESS_CONFIG_PATH, then config/harness.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the in-process stub collaborators even if a backend is configured.
    #[arg(long, global = true)]
    offline: bool,

    /// Write Prometheus-format case metrics here after the run.
    #[arg(long, global = true)]
    metrics_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Batch + single-tweet classification checks.
    Sentiment,
    /// Hashtag fetch checks.
    Scraper,
    /// Both suites (default).
    All,
}

/// Logs go to stderr so stdout carries only the report.
/// `RUST_LOG` sets the filter (default `warn`); `HARNESS_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var("HARNESS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    let telemetry = Telemetry::install()?;
    let cfg = HarnessConfig::resolve(cli.config.as_deref())?;
    let command = cli.command.unwrap_or(Command::All);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let (present, notice) = runner::preflight(&cfg, |k| std::env::var(k).ok());
    writeln!(out, "{notice}")?;
    writeln!(out)?;

    let collab = Collaborators::select(&cfg, cli.offline, present)?;
    tracing::info!(?command, "starting run");

    let mut summaries = Vec::new();
    if matches!(command, Command::Sentiment | Command::All) {
        summaries.push(
            runner::run_sentiment_suite(collab.classifier.as_ref(), &cfg.report, &mut out).await?,
        );
        writeln!(out)?;
    }
    if matches!(command, Command::Scraper | Command::All) {
        summaries.push(
            runner::run_default_fetch_suite(collab.fetcher.as_ref(), &cfg.report, &mut out).await?,
        );
        writeln!(out)?;
    }

    writeln!(out, "{}", runner::render_verdict(&summaries))?;
    out.flush()?;

    let exposition = telemetry.render();
    tracing::debug!(metrics = %exposition, "run metrics");
    if let Some(path) = &cli.metrics_out {
        telemetry.write_to(path)?;
    }
    Ok(runner::overall_passed(&summaries))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            tracing::error!(error = ?e, "harness aborted");
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
