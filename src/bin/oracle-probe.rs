// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Oracle Probe CLI
 * Calibrates a blind-injection oracle and evaluates conditions against it
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, Level};

use lonkero_oracle::config::{
    load_from_env, ComparisonSignal, ConfigLoader, HttpMethod, MatchMode, OracleConfig,
};
use lonkero_oracle::http_client::HttpClient;
use lonkero_oracle::template::QueryTemplate;
use lonkero_oracle::Requester;

#[derive(Parser)]
#[command(name = "oracle-probe")]
#[command(author = "Bountyy Oy <info@bountyy.fi>")]
#[command(version)]
#[command(about = "Blind-injection oracle: calibrate on known TRUE/FALSE values, then evaluate conditions", long_about = None)]
struct Cli {
    /// Target URL template containing {value}
    #[arg(short, long)]
    url: String,

    /// Form body template for POST probes (may contain {value})
    #[arg(long)]
    data: Option<String>,

    /// Config file (yaml, toml or json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comparison signal: size, time, text or status
    #[arg(short, long)]
    signal: Option<ComparisonSignal>,

    /// Match mode: strict or loose
    #[arg(short, long)]
    mode: Option<MatchMode>,

    /// Probe value known to evaluate TRUE
    #[arg(long, default_value = "1=1")]
    true_value: String,

    /// Probe value known to evaluate FALSE
    #[arg(long, default_value = "1=2")]
    false_value: String,

    /// Calibration rounds per truth value
    #[arg(long, default_value = "3")]
    calibrations: usize,

    /// Print the oracle model as JSON when done
    #[arg(long)]
    snapshot: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Conditions to evaluate
    conditions: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into()),
        )
        .with_target(false)
        .init();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("oracle-probe")
        .enable_all()
        .build()?;

    match runtime.block_on(async_main(cli)) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{:#}", e);
            std::process::exit(1);
        }
    }
}

async fn async_main(cli: Cli) -> Result<()> {
    let mut config: OracleConfig = match &cli.config {
        Some(path) => ConfigLoader::new(path)?.load_config()?,
        None => load_from_env()?,
    };

    if let Some(signal) = cli.signal {
        config.requester.comparison_signal = signal;
    }
    if let Some(mode) = cli.mode {
        config.requester.match_mode = mode;
    }

    let template = match (cli.data.clone(), config.http.method) {
        (Some(body), _) => QueryTemplate::post(cli.url.clone(), body)?,
        (None, HttpMethod::Post) => QueryTemplate::post(cli.url.clone(), "")?,
        (None, HttpMethod::Get) => QueryTemplate::get(cli.url.clone())?,
    };

    let client = HttpClient::from_config(&config.http)?;
    let requester: Requester<bool> =
        Requester::new(config.requester.clone(), Arc::new(client), Arc::new(template))?;

    info!(
        "Calibrating with {} rounds of {:?} / {:?}",
        cli.calibrations, cli.true_value, cli.false_value
    );
    for _ in 0..cli.calibrations {
        requester
            .make_request_as(&cli.true_value, "true", true)
            .await
            .context("Calibration with TRUE value failed")?;
        requester
            .make_request_as(&cli.false_value, "false", false)
            .await
            .context("Calibration with FALSE value failed")?;
    }

    for condition in &cli.conditions {
        let answer = requester
            .make_request(condition, false)
            .await
            .with_context(|| format!("Probe failed for condition {:?}", condition))?;
        println!("{}\t{}", answer, condition);
    }

    if cli.snapshot {
        println!("{}", serde_json::to_string_pretty(&requester.snapshot())?);
    }

    Ok(())
}
