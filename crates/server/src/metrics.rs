//! Prometheus metrics endpoint support.
//!
//! The registry aggregates the core pipeline metrics; the server exposes it
//! as text on `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    orderflow_core::metrics::register_core_metrics(&registry);
    registry
});

/// Renders the registry in the prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_contains_core_metrics() {
        orderflow_core::metrics::RUNS_TOTAL
            .with_label_values(&["succeeded"])
            .inc();
        let text = render();
        assert!(text.contains("orderflow_runs_total"));
    }
}
