//! Commit Report - git history over a date range as CSV or PDF
//!
//! # Usage
//! ```bash
//! commit-report                                  # Start server on 127.0.0.1:3001
//! commit-report --port 8080 --font fonts/Roboto-Regular.ttf
//! commit-report export --repo ~/a,~/b --since 2024-01-01 --until 2024-02-01 \
//!     --format pdf --output report.pdf           # One-off export
//! ```

mod analyzer;
mod config;
mod error;
mod git;
mod models;
mod report;
mod routes;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::{Args, Parser, Subcommand};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use analyzer::{Analyzer, flatten};
use config::{DEFAULT_FONT_PATH, DEFAULT_GIT_TIMEOUT_SECS, ReportConfig};

/// Commit Report - export git commit history as CSV or PDF
#[derive(Parser)]
#[command(name = "commit-report")]
#[command(about = "Git commit history reports as CSV or PDF", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to run the server on
    #[arg(short, long, env = "COMMIT_REPORT_PORT", default_value = "3001")]
    port: u16,

    #[command(flatten)]
    report: ReportArgs,
}

#[derive(Args)]
struct ReportArgs {
    /// TrueType font embedded into PDF reports
    #[arg(long, env = "COMMIT_REPORT_FONT", default_value = DEFAULT_FONT_PATH, global = true)]
    font: PathBuf,

    /// Seconds before a git invocation is killed (0 = no limit)
    #[arg(
        long,
        env = "COMMIT_REPORT_GIT_TIMEOUT",
        default_value_t = DEFAULT_GIT_TIMEOUT_SECS,
        global = true
    )]
    git_timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a report for one or more repositories without starting the server
    Export {
        /// Repository paths (repeat or separate with commas)
        #[arg(
            short,
            long = "repo",
            value_name = "REPO_PATH",
            value_delimiter = ',',
            required = true
        )]
        repos: Vec<String>,

        /// Start of the window, inclusive (passed to git --since)
        #[arg(long)]
        since: String,

        /// End of the window, exclusive (passed to git --until)
        #[arg(long)]
        until: String,

        /// Output format: csv or pdf
        #[arg(short, long, default_value = "csv")]
        format: String,

        /// File to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

async fn run_export(
    config: &ReportConfig,
    repos: Vec<String>,
    since: &str,
    until: &str,
    format: &str,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let repos: Vec<String> = repos
        .iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    let analyzer = Analyzer::from_config(config);
    let reports = analyzer
        .analyze(&repos, since, until)
        .await
        .context("Failed to analyze repositories")?;
    let commits = flatten(reports);

    let report = analyzer
        .export(&commits, format)
        .context("Failed to render report")?;

    match output {
        Some(path) => {
            std::fs::write(&path, &report.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Wrote {} commits to {}", commits.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&report.bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn serve(config: &ReportConfig, host: &str, port: u16) -> anyhow::Result<()> {
    if !config.font_path.is_file() {
        tracing::warn!(
            "Font file {} not found; PDF exports will fail until it is provided",
            config.font_path.display()
        );
    }

    let analyzer = Arc::new(Analyzer::from_config(config));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .merge(routes::create_router(analyzer))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("✗ Failed to bind to {}: {}", addr, e);
            eprintln!("  Try a different port with --port <PORT>");
            std::process::exit(1);
        }
    };

    println!();
    println!("  ┌─────────────────────────────────────────────┐");
    println!("  │             Git Commit Report               │");
    println!("  └─────────────────────────────────────────────┘");
    println!();
    println!("  Server:  http://{}", addr);
    println!("  Font:    {}", config.font_path.display());
    println!();
    println!("  POST /api/analyze  {{ repoPaths, startDate, endDate }}");
    println!("  POST /api/export   {{ commits, format: \"pdf\" | \"csv\" }}");
    println!();
    println!("  Press Ctrl+C to stop");
    println!();

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
        println!("\n  Shutting down...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ReportConfig::new(cli.report.font, cli.report.git_timeout);

    match cli.command {
        Some(Commands::Export {
            repos,
            since,
            until,
            format,
            output,
        }) => run_export(&config, repos, &since, &until, &format, output).await,
        None => serve(&config, &cli.host, cli.port).await,
    }
}
