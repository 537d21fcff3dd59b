// Copyright (c) MySocial Team
// SPDX-License-Identifier: Apache-2.0

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use tracing::warn;

struct Metrics {
    registry: Registry,
    reaction_toggles: IntCounterVec,
    aggregate_failures: IntCounter,
    feed_pages: IntCounterVec,
}

impl Metrics {
    fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let reaction_toggles = IntCounterVec::new(
            Opts::new("fanpage_reaction_toggles_total", "Reaction toggles by settled outcome"),
            &["outcome"],
        )?;
        let aggregate_failures = IntCounter::new(
            "fanpage_aggregate_failures_total",
            "Posts served with zeroed aggregates after a failed fetch",
        )?;
        let feed_pages = IntCounterVec::new(
            Opts::new("fanpage_feed_pages_total", "Feed pages assembled"),
            &["kind"],
        )?;

        registry.register(Box::new(reaction_toggles.clone()))?;
        registry.register(Box::new(aggregate_failures.clone()))?;
        registry.register(Box::new(feed_pages.clone()))?;

        Ok(Self {
            registry,
            reaction_toggles,
            aggregate_failures,
            feed_pages,
        })
    }
}

static METRICS: Lazy<Option<Metrics>> = Lazy::new(|| match Metrics::new() {
    Ok(metrics) => Some(metrics),
    Err(e) => {
        warn!("Metrics disabled, registry setup failed: {}", e);
        None
    }
});

/// `outcome` is one of `added`, `removed`, `rolled_back`
pub fn record_reaction(outcome: &str) {
    if let Some(m) = METRICS.as_ref() {
        m.reaction_toggles.with_label_values(&[outcome]).inc();
    }
}

pub fn record_aggregate_failure() {
    if let Some(m) = METRICS.as_ref() {
        m.aggregate_failures.inc();
    }
}

/// `kind` is `initial` or `next`
pub fn record_feed_page(kind: &str) {
    if let Some(m) = METRICS.as_ref() {
        m.feed_pages.with_label_values(&[kind]).inc();
    }
}

/// Render all metrics in the Prometheus text format
pub fn gather() -> prometheus::Result<String> {
    match METRICS.as_ref() {
        Some(m) => TextEncoder::new().encode_to_string(&m.registry.gather()),
        None => Ok(String::new()),
    }
}
