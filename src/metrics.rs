use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus exporter with its own HTTP listener on `addr`
/// and register all application metrics. Must be called inside a Tokio
/// runtime.
pub fn init_metrics(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    // Pre-register counters so they appear even before the first increment.
    counter!("signatures_observed_total").absolute(0);
    counter!("transactions_analyzed_total").absolute(0);
    counter!("rpc_errors_total").absolute(0);
    counter!("oracle_errors_total").absolute(0);
    counter!("copy_descriptors_total").absolute(0);

    gauge!("monitored_wallets").set(0.0);

    Ok(())
}
