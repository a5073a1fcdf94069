/// Prometheus text exposition of all registered metrics.
pub async fn metrics() -> String {
    observe::metrics::encode(observe::metrics::get_registry())
}
