use prometheus::{
    Encoder, GaugeVec, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub estimates_total: IntCounterVec,
    pub transitions_total: IntCounterVec,
    pub delivery_creation_seconds: HistogramVec,
    pub images_total: IntCounterVec,
    pub trip_utilization: GaugeVec,
    pub active_deliveries: IntGauge,
    pub orphans_reaped_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let estimates_total = IntCounterVec::new(
            Opts::new("estimates_total", "Package price estimates by outcome"),
            &["outcome"],
        )
        .expect("valid estimates_total metric");

        let transitions_total = IntCounterVec::new(
            Opts::new(
                "transitions_total",
                "Lifecycle transition requests by entity and outcome",
            ),
            &["entity", "outcome"],
        )
        .expect("valid transitions_total metric");

        let delivery_creation_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "delivery_creation_seconds",
                "Latency of delivery assembly in seconds",
            ),
            &["outcome"],
        )
        .expect("valid delivery_creation_seconds metric");

        let images_total = IntCounterVec::new(
            Opts::new("images_total", "Package image attachments by outcome"),
            &["outcome"],
        )
        .expect("valid images_total metric");

        let trip_utilization = GaugeVec::new(
            Opts::new("trip_utilization", "Trip capacity utilization ratio [0..1]"),
            &["trip_id"],
        )
        .expect("valid trip_utilization metric");

        let active_deliveries = IntGauge::new(
            "active_deliveries",
            "Current number of deliveries in a non-terminal state",
        )
        .expect("valid active_deliveries metric");

        let orphans_reaped_total = IntCounter::new(
            "orphans_reaped_total",
            "Packages deleted by the orphan reaper",
        )
        .expect("valid orphans_reaped_total metric");

        registry
            .register(Box::new(estimates_total.clone()))
            .expect("register estimates_total");
        registry
            .register(Box::new(transitions_total.clone()))
            .expect("register transitions_total");
        registry
            .register(Box::new(delivery_creation_seconds.clone()))
            .expect("register delivery_creation_seconds");
        registry
            .register(Box::new(images_total.clone()))
            .expect("register images_total");
        registry
            .register(Box::new(trip_utilization.clone()))
            .expect("register trip_utilization");
        registry
            .register(Box::new(active_deliveries.clone()))
            .expect("register active_deliveries");
        registry
            .register(Box::new(orphans_reaped_total.clone()))
            .expect("register orphans_reaped_total");

        Self {
            registry,
            estimates_total,
            transitions_total,
            delivery_creation_seconds,
            images_total,
            trip_utilization,
            active_deliveries,
            orphans_reaped_total,
        }
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
