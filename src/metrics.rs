// src/metrics.rs
//! Prometheus exposition for the refresh pipeline.
//!
//! Series are emitted where the work happens (ingest, pipeline, scheduler,
//! cache); this module only installs the recorder, attaches help text and
//! serves `/metrics`.

use metrics::{describe_counter, describe_gauge, describe_histogram, gauge, Unit};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use shuttle_axum::axum::{http::header, routing::get, Router};

const EXPOSITION_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder and expose the configured
    /// refresh interval as a static gauge.
    pub fn init(refresh_interval_secs: u64) -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        describe_all();
        gauge!("refresh_interval_secs").set(refresh_interval_secs as f64);
        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { ([(header::CONTENT_TYPE, EXPOSITION_CONTENT_TYPE)], h.render()) }
            }),
        )
    }
}

/// Help text for every series the crate emits. Must run after the recorder
/// is installed; descriptions sent to the no-op recorder are lost.
pub(crate) fn describe_all() {
    describe_counter!("refresh_cycles_total", "Completed refresh cycles.");
    describe_counter!(
        "refresh_cycle_failures_total",
        "Refresh cycles abandoned because of an error or panic."
    );
    describe_counter!(
        "ingest_items_total",
        "Stories kept after normalization, per source."
    );
    describe_counter!(
        "ingest_dropped_total",
        "Upstream items dropped by the normalizer, per source."
    );
    describe_counter!(
        "ingest_provider_errors_total",
        "Source fetch errors (source treated as empty for that cycle)."
    );
    describe_counter!("merge_matches_total", "Merged stories produced.");
    describe_counter!(
        "snapshot_persist_errors_total",
        "Snapshot writes that failed (live view still published)."
    );
    describe_histogram!(
        "ingest_fetch_ms",
        Unit::Milliseconds,
        "Source fetch time."
    );
    describe_histogram!(
        "refresh_duration_ms",
        Unit::Milliseconds,
        "Refresh cycle time."
    );
    describe_gauge!(
        "snapshot_generated_ts",
        Unit::Seconds,
        "Unix ts of the currently published snapshot."
    );
    describe_gauge!("refresh_interval_secs", Unit::Seconds, "Configured refresh interval.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn described_series_render_with_help_text() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            describe_all();
            metrics::counter!("refresh_cycles_total").increment(2);
            metrics::counter!("ingest_items_total", "source" => "hackernews").increment(7);
        });

        let out = handle.render();
        assert!(out.contains("# HELP refresh_cycles_total Completed refresh cycles."));
        assert!(out.contains("refresh_cycles_total 2"));
        assert!(out.contains("ingest_items_total{source=\"hackernews\"} 7"));
    }
}
