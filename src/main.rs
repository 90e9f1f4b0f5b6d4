//! Tech News Aggregator: binary entrypoint.
//! Loads config, starts the refresh loop, and serves the Axum router.

use shuttle_axum::ShuttleAxum;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tech_news_aggregator::{app, metrics::Metrics, AggregatorConfig};

/// Compact logs by default, JSON lines with LOG_FORMAT=json.
/// RUST_LOG overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tech_news_aggregator=info,warn"));

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // The runtime may already have installed a subscriber; keep it if so.
    let res = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact())
            .try_init()
    };
    if res.is_err() {
        info!("tracing subscriber already installed");
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = AggregatorConfig::load().map_err(|e| {
        error!(error = %e, "invalid configuration; refresh loop not started");
        anyhow::Error::from(e)
    })?;
    info!(config = ?cfg, "configuration loaded");

    let metrics = Metrics::init(cfg.refresh_interval_secs)?;
    let aggregator = app::start(&cfg).await?;

    // Dropping the aggregator detaches the refresh task; it keeps running
    // for the life of the process.
    let router = aggregator.router().merge(metrics.router());

    Ok(router.into())
}
