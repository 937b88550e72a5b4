//! tickerpulse - social sentiment for a stock ticker
//!
//! Prints the aggregate as JSON on stdout; logs go to stderr.
//!
//! # Usage
//! ```sh
//! tickerpulse sentiment '$aapl'
//! tickerpulse --strategy lexicon portfolio "AAPL, MSFT; TSLA"
//! tickerpulse --offline --metrics sentiment TSLA
//! ```
//!
//! # Environment Variables
//! See `tickerpulse::config`. A `.env` file in the working directory is loaded first.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tickerpulse::application::bootstrap::{SentimentBootstrap, SourceMode};
use tickerpulse::application::pipeline::CancelSignal;
use tickerpulse::config::Config;
use tickerpulse::domain::sentiment::ClassificationStrategy;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about = "Aggregate social sentiment for stock tickers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Classification strategy (tag, lexicon); overrides SENTIMENT_STRATEGY
    #[arg(long, global = true)]
    strategy: Option<ClassificationStrategy>,

    /// Use built-in fixture posts instead of Stocktwits
    #[arg(long, global = true)]
    offline: bool,

    /// Print Prometheus metrics to stderr when done
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate sentiment for a single ticker
    Sentiment {
        /// Ticker symbol, with or without a leading `$`
        ticker: String,

        /// Maximum number of posts to fetch
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Aggregate sentiment for every ticker in a list
    Portfolio {
        /// Tickers separated by spaces, commas, semicolons, pipes or newlines
        tickers: String,

        /// Maximum number of posts to fetch per ticker
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stderr_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(strategy) = cli.strategy {
        config.sentiment.strategy = strategy;
    }

    let mode = if cli.offline {
        SourceMode::Offline
    } else {
        SourceMode::Stocktwits
    };
    let source = SentimentBootstrap::build_source(&config, mode);
    let handle = SentimentBootstrap::init(&config, source)?;

    let cancel = CancelSignal::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, cancelling");
                cancel.cancel();
            }
        });
    }

    let exit = match cli.command {
        Commands::Sentiment { ticker, limit } => {
            let limit = limit.unwrap_or(config.sentiment.post_limit);
            match handle.pipeline.run(&ticker, limit, &cancel).await {
                Ok(response) => {
                    println!("{}", serde_json::to_string_pretty(&response)?);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&e.to_body())?);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Portfolio { tickers, limit } => {
            let limit = limit.unwrap_or(config.sentiment.post_limit);
            let report = handle.pipeline.run_portfolio(&tickers, limit, &cancel).await;
            info!(
                "Portfolio sweep: {}/{} tickers succeeded, {} rejected",
                report.succeeded(),
                report.entries.len(),
                report.rejected.len()
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
            if report.succeeded() > 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    };

    if cli.metrics {
        eprintln!("{}", handle.metrics.render());
    }

    Ok(exit)
}
