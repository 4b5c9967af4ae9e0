use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use elbi_cli::pages::{collect_jobs, process_job};
use elbi_cli::sources::index_source;
use elbi_core::config::{Config, Settings};
use elbi_diagram::{CommandBackend, RendererOptions};
use elbi_search::{load_index, RenderOptions, SearchSession};

#[derive(Parser)]
#[command(name = "elbi")]
#[command(about = "Static-site search filter and diagram renderer.")]
struct Cli {
    /// Directory holding elbi.toml (defaults to the current directory).
    #[arg(long, global = true)]
    conf: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run one query against the page index and print the results fragment.
    Search {
        query: String,
        /// Path of index.json (overrides search.index_path).
        #[arg(long)]
        index: Option<String>,
        /// Site root or index URL to fetch instead of a local file.
        #[arg(long)]
        url: Option<String>,
        /// Print hits as JSON instead of HTML.
        #[arg(long)]
        json: bool,
    },
    /// Read the query box value from stdin, one line per keystroke, and
    /// re-render after the debounce delay.
    Interactive {
        #[arg(long)]
        index: Option<String>,
        #[arg(long)]
        url: Option<String>,
        /// Idle delay before evaluating (overrides search.debounce_ms).
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Render diagram blocks of HTML pages (files or directories).
    Diagrams {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Write rewritten pages here instead of in place.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Diagram CLI to run (overrides diagram.command).
        #[arg(long)]
        command: Option<String>,
    },
}

#[derive(Serialize)]
struct HitSummary<'a> {
    rank: usize,
    title: &'a str,
    relpermalink: &'a str,
    score: i64,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let base = cli.conf.clone().unwrap_or_else(|| PathBuf::from("."));
    let config = Config::load_from(&base).context("loading configuration")?;
    let settings = config.settings()?;

    match cli.command {
        Command::Search { query, index, url, json } => {
            search(&settings, &base, &query, index.as_deref(), url.as_deref(), json).await
        }
        Command::Interactive { index, url, debounce_ms } => {
            interactive(&settings, &base, index.as_deref(), url.as_deref(), debounce_ms).await
        }
        Command::Diagrams { paths, out, command } => diagrams(&settings, &paths, out.as_deref(), command).await,
    }
}

async fn search(
    settings: &Settings,
    base: &Path,
    query: &str,
    index: Option<&str>,
    url: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let source = index_source(&settings.search, base, index, url);
    let pages = load_index(source.as_ref()).await?;
    let session = SearchSession::from_settings(pages, &settings.search);

    let Some(outcome) = session.search(query) else {
        eprintln!("Empty query, nothing to search");
        return Ok(());
    };
    if json {
        let hits: Vec<HitSummary<'_>> = outcome
            .hits
            .iter()
            .enumerate()
            .map(|(i, hit)| HitSummary {
                rank: i + 1,
                title: &hit.page.title,
                relpermalink: &hit.page.relpermalink,
                score: hit.score,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&hits)?);
    } else {
        println!("{}", outcome.render(&RenderOptions::from(&settings.search)));
    }
    Ok(())
}

async fn interactive(
    settings: &Settings,
    base: &Path,
    index: Option<&str>,
    url: Option<&str>,
    debounce_ms: Option<u64>,
) -> anyhow::Result<()> {
    let source = index_source(&settings.search, base, index, url);
    let pages = load_index(source.as_ref()).await?;
    let mut session = SearchSession::from_settings(pages, &settings.search);
    let delay = Duration::from_millis(debounce_ms.unwrap_or(settings.search.debounce_ms));

    let (tx, rx) = mpsc::channel(64);
    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).await.is_err() {
                break;
            }
        }
    });

    session.drive(rx, delay, |html| println!("{html}")).await;
    reader.await?;
    tracing::info!(passes = session.passes(), "interactive session ended");
    Ok(())
}

async fn diagrams(
    settings: &Settings,
    paths: &[PathBuf],
    out: Option<&Path>,
    command: Option<String>,
) -> anyhow::Result<()> {
    let mut diagram_settings = settings.diagram.clone();
    if let Some(command) = command {
        diagram_settings.command = command;
    }
    let backend = CommandBackend::from_settings(&diagram_settings);
    let options = RendererOptions::from(&diagram_settings);

    let jobs = collect_jobs(paths, out)?;
    let (mut blocks, mut failed, mut rewritten) = (0, 0, 0);
    for job in &jobs {
        let rendered = process_job(job, &backend, &options).await?;
        if !rendered.outcomes.is_empty() {
            rewritten += 1;
        }
        blocks += rendered.outcomes.len();
        failed += rendered.failures();
    }
    println!(
        "Processed {} pages: {} rewritten, {} diagrams ({} failed)",
        jobs.len(),
        rewritten,
        blocks,
        failed
    );
    Ok(())
}
