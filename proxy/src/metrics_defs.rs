use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUESTS: MetricDef = MetricDef {
    name: "resolve.requests",
    metric_type: MetricType::Counter,
    description: "Inbound scrape requests received on the metrics route",
};

pub const NOT_FOUND: MetricDef = MetricDef {
    name: "resolve.not_found",
    metric_type: MetricType::Counter,
    description: "Requests whose identifier matched no instance in the snapshot",
};

pub const FETCH_FAILURES: MetricDef = MetricDef {
    name: "resolve.fetch_failures",
    metric_type: MetricType::Counter,
    description: "Membership fetch calls that failed",
};

pub const FORWARD_FAILURES: MetricDef = MetricDef {
    name: "forward.failures",
    metric_type: MetricType::Counter,
    description: "Outbound scrape requests that failed",
};

// TODO: all metrics must be added here for now, this can be done dynamically with a macro in the future.
pub const ALL_METRICS: &[MetricDef] = &[REQUESTS, NOT_FOUND, FETCH_FAILURES, FORWARD_FAILURES];

/// Register descriptions with the installed metrics recorder.
pub fn describe_all() {
    for def in ALL_METRICS {
        match def.metric_type {
            MetricType::Counter => metrics::describe_counter!(def.name, def.description),
            MetricType::Gauge => metrics::describe_gauge!(def.name, def.description),
            MetricType::Histogram => metrics::describe_histogram!(def.name, def.description),
        }
    }
}
