//! Metrics and observability utilities
//!
//! Provides Prometheus metrics with SLO-aligned histograms
//! and standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all job board metrics
pub const METRICS_PREFIX: &str = "jobboard";

/// SLO-aligned histogram buckets for request latency (in seconds)
/// Targets: P50 < 50ms, P99 < 250ms
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001,  // 1ms
    0.005,  // 5ms
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms - P50 target
    0.075,  // 75ms
    0.100,  // 100ms
    0.150,  // 150ms
    0.250,  // 250ms - P99 target
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of HTTP requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "HTTP request latency in seconds"
    );

    // Identity metrics
    describe_counter!(
        format!("{}_logins_total", METRICS_PREFIX),
        Unit::Count,
        "Login attempts by outcome"
    );

    describe_counter!(
        format!("{}_signups_total", METRICS_PREFIX),
        Unit::Count,
        "Accounts created by role"
    );

    // Hiring metrics
    describe_counter!(
        format!("{}_companies_created_total", METRICS_PREFIX),
        Unit::Count,
        "Companies created"
    );

    describe_counter!(
        format!("{}_jobs_created_total", METRICS_PREFIX),
        Unit::Count,
        "Job postings created"
    );

    describe_counter!(
        format!("{}_applications_submitted_total", METRICS_PREFIX),
        Unit::Count,
        "Applications submitted"
    );

    describe_counter!(
        format!("{}_application_transitions_total", METRICS_PREFIX),
        Unit::Count,
        "Application status changes by target status"
    );

    // Dashboard metrics
    describe_histogram!(
        format!("{}_dashboard_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Dashboard aggregation latency in seconds"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record request metrics
pub struct RequestMetrics {
    start: Instant,
    endpoint: String,
    method: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(method: &str, endpoint: &str) -> Self {
        Self {
            start: Instant::now(),
            endpoint: endpoint.to_string(),
            method: method.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "method" => self.method.clone(),
            "endpoint" => self.endpoint.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "method" => self.method,
            "endpoint" => self.endpoint
        )
        .record(duration);
    }
}

pub fn record_login(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    counter!(
        format!("{}_logins_total", METRICS_PREFIX),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_signup(role: &str) {
    counter!(
        format!("{}_signups_total", METRICS_PREFIX),
        "role" => role.to_string()
    )
    .increment(1);
}

pub fn record_company_created() {
    counter!(format!("{}_companies_created_total", METRICS_PREFIX)).increment(1);
}

pub fn record_job_created() {
    counter!(format!("{}_jobs_created_total", METRICS_PREFIX)).increment(1);
}

pub fn record_application_submitted() {
    counter!(format!("{}_applications_submitted_total", METRICS_PREFIX)).increment(1);
}

pub fn record_status_transition(to: &str) {
    counter!(
        format!("{}_application_transitions_total", METRICS_PREFIX),
        "to" => to.to_string()
    )
    .increment(1);
}

pub fn record_dashboard(role: &str, duration_secs: f64) {
    histogram!(
        format!("{}_dashboard_duration_seconds", METRICS_PREFIX),
        "role" => role.to_string()
    )
    .record(duration_secs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_buckets() {
        // Verify buckets are sorted and contain SLO targets
        let mut prev = 0.0;
        for &bucket in LATENCY_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }

        assert!(LATENCY_BUCKETS.contains(&0.050));
        assert!(LATENCY_BUCKETS.contains(&0.250));
    }

    #[test]
    fn test_recorders_without_exporter() {
        let metrics = RequestMetrics::start("GET", "/api/jobseekers/jobs");
        metrics.finish(200);
        record_login(false);
        record_status_transition("REVIEWING");
    }
}
