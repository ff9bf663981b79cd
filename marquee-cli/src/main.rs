//! `marquee`: fetch and enrich TMDB film metadata from the command line.

mod cli;

use std::{io::Write, sync::Arc};

use anyhow::Context;
use clap::Parser;
use marquee_config::{
    ConfigLoad, ConfigLoader, ConfigLoaderOptions, MarqueeConfig,
};
use marquee_core::{
    AggregationCoordinator, EnrichmentPolicy, TmdbClient, TmdbClientSettings,
    WorkerPool,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command, GlobalArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing();
    let config = load_runtime_config(&cli.global)?;

    let pool = WorkerPool::new(config.pool.capacity);
    let coordinator = build_coordinator(&config, pool.clone())?;

    let outcome = run(cli.command, &coordinator).await;
    pool.shutdown();
    outcome
}

fn init_tracing() {
    // stdout carries the JSON result, so logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,marquee_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_runtime_config(args: &GlobalArgs) -> anyhow::Result<MarqueeConfig> {
    let ConfigLoad {
        mut config,
        warnings,
    } = ConfigLoader::with_options(ConfigLoaderOptions {
        config_path: args.config.clone(),
        env_file: args.env_file.clone(),
    })
    .load()
    .context("failed to load configuration")?;

    if let Some(capacity) = args.pool_capacity {
        config.pool.capacity = capacity;
    }

    if config.metadata.env_file_loaded {
        info!("loaded .env file");
    }
    if let Some(path) = config.metadata.config_path.as_ref() {
        info!(path = %path.display(), "using configuration file");
    }

    for warning in warnings.iter() {
        match &warning.hint {
            Some(hint) => warn!(
                message = %warning.message,
                hint = %hint,
                "configuration warning"
            ),
            None => warn!(message = %warning.message, "configuration warning"),
        }
    }

    Ok(config)
}

fn build_coordinator(
    config: &MarqueeConfig,
    pool: WorkerPool,
) -> anyhow::Result<AggregationCoordinator> {
    let client = TmdbClient::new(TmdbClientSettings {
        base_url: config.upstream.base_url.clone(),
        api_key: config.upstream.api_key.clone(),
        request_timeout: config.upstream.request_timeout,
    })
    .context("failed to build TMDB HTTP client")?;

    let policy = EnrichmentPolicy::default()
        .with_trailer_site(config.enrichment.trailer_site.clone())
        .with_max_members(config.enrichment.max_enriched_members);

    info!(
        pool_capacity = pool.capacity(),
        base_url = %config.upstream.base_url,
        "aggregator ready"
    );

    Ok(AggregationCoordinator::new(Arc::new(client), pool, policy))
}

async fn run(
    command: Command,
    coordinator: &AggregationCoordinator,
) -> anyhow::Result<()> {
    match command {
        Command::Movie { id } => {
            let aggregation = coordinator
                .aggregate_with_report(id)
                .await
                .with_context(|| format!("movie {id} not found"))?;
            for failure in aggregation.report.failures() {
                warn!(
                    movie_id = %id,
                    reason = %failure,
                    "enrichment incomplete"
                );
            }
            print_json(&aggregation.movie)
        }
        Command::Popular { page } => {
            print_json(&coordinator.popular(page).await)
        }
        Command::Search { query, page } => {
            print_json(&coordinator.search(&query, page).await)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)
        .context("failed to serialize result")?;
    writeln!(out).context("failed to write result")?;
    Ok(())
}
