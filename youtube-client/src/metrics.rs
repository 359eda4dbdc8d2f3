use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;

/// Estimated quota units charged per call of a Data API endpoint.
pub fn quota_cost(endpoint: &str) -> u64 {
    match endpoint {
        "/search" => 100,
        _ => 1,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMetrics {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub quota_exceeded_requests: u64,
    pub estimated_quota_units: u64,
    pub average_response_time: Duration,
    pub last_request_time: Option<SystemTime>,
    pub requests_by_endpoint: HashMap<String, EndpointMetrics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointMetrics {
    pub request_count: u64,
    pub success_count: u64,
    pub error_count: u64,
    pub quota_units: u64,
    pub total_response_time: Duration,
    pub min_response_time: Duration,
    pub max_response_time: Duration,
}

#[derive(Debug, Clone)]
pub struct RequestMetrics {
    pub endpoint: String,
    pub status_code: Option<u16>,
    pub response_time: Duration,
    pub success: bool,
    pub quota_exceeded: bool,
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self {
            total_requests: 0,
            successful_requests: 0,
            failed_requests: 0,
            quota_exceeded_requests: 0,
            estimated_quota_units: 0,
            average_response_time: Duration::from_millis(0),
            last_request_time: None,
            requests_by_endpoint: HashMap::new(),
        }
    }
}

impl ApiMetrics {
    /// One-line summary for the end-of-run log.
    pub fn summary(&self) -> String {
        format!(
            "{} API requests ({} ok, {} failed), ~{} quota units, avg {:?}",
            self.total_requests,
            self.successful_requests,
            self.failed_requests,
            self.estimated_quota_units,
            self.average_response_time
        )
    }

    /// One line per endpoint, sorted by endpoint path.
    pub fn endpoint_summaries(&self) -> Vec<String> {
        let mut endpoints: Vec<_> = self.requests_by_endpoint.iter().collect();
        endpoints.sort_by(|a, b| a.0.cmp(b.0));
        endpoints
            .into_iter()
            .map(|(endpoint, metrics)| format!("{} {}", endpoint, metrics.summary()))
            .collect()
    }
}

impl EndpointMetrics {
    fn new() -> Self {
        Self {
            request_count: 0,
            success_count: 0,
            error_count: 0,
            quota_units: 0,
            total_response_time: Duration::from_millis(0),
            min_response_time: Duration::from_secs(u64::MAX),
            max_response_time: Duration::from_millis(0),
        }
    }

    fn update(&mut self, metrics: &RequestMetrics) {
        self.request_count += 1;
        self.quota_units += quota_cost(&metrics.endpoint);
        self.total_response_time += metrics.response_time;

        if metrics.response_time < self.min_response_time {
            self.min_response_time = metrics.response_time;
        }
        if metrics.response_time > self.max_response_time {
            self.max_response_time = metrics.response_time;
        }

        if metrics.success {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
    }

    pub fn average_response_time(&self) -> Duration {
        if self.request_count == 0 {
            Duration::from_millis(0)
        } else {
            self.total_response_time / self.request_count as u32
        }
    }

    pub fn success_rate(&self) -> f64 {
        if self.request_count == 0 {
            0.0
        } else {
            self.success_count as f64 / self.request_count as f64
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} requests, {:.0}% ok, ~{} quota units, avg {:?}",
            self.request_count,
            self.success_rate() * 100.0,
            self.quota_units,
            self.average_response_time()
        )
    }
}

#[derive(Debug)]
pub struct MetricsCollector {
    metrics: Arc<RwLock<ApiMetrics>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            metrics: Arc::new(RwLock::new(ApiMetrics::default())),
        }
    }

    pub async fn record_request(&self, request_metrics: RequestMetrics) {
        let mut metrics = self.metrics.write().await;

        metrics.total_requests += 1;
        metrics.last_request_time = Some(SystemTime::now());
        metrics.estimated_quota_units += quota_cost(&request_metrics.endpoint);

        if request_metrics.success {
            metrics.successful_requests += 1;
        } else {
            metrics.failed_requests += 1;
        }

        if request_metrics.quota_exceeded {
            metrics.quota_exceeded_requests += 1;
        }

        // Running average
        let total_time = metrics.average_response_time * (metrics.total_requests - 1) as u32
            + request_metrics.response_time;
        metrics.average_response_time = total_time / metrics.total_requests as u32;

        metrics
            .requests_by_endpoint
            .entry(request_metrics.endpoint.clone())
            .or_insert_with(EndpointMetrics::new)
            .update(&request_metrics);
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.read().await.clone()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(endpoint: &str, millis: u64, success: bool) -> RequestMetrics {
        RequestMetrics {
            endpoint: endpoint.to_string(),
            status_code: Some(if success { 200 } else { 403 }),
            response_time: Duration::from_millis(millis),
            success,
            quota_exceeded: !success,
        }
    }

    #[tokio::test]
    async fn test_metrics_collection() {
        let collector = MetricsCollector::new();
        collector.record_request(request("/channels", 150, true)).await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 1);
        assert_eq!(metrics.successful_requests, 1);
        assert_eq!(metrics.failed_requests, 0);
        assert_eq!(metrics.estimated_quota_units, 1);
        assert_eq!(metrics.average_response_time, Duration::from_millis(150));
        assert!(metrics.last_request_time.is_some());
    }

    #[tokio::test]
    async fn test_quota_units_per_endpoint() {
        let collector = MetricsCollector::new();
        collector.record_request(request("/channels", 100, true)).await;
        collector.record_request(request("/search", 300, true)).await;
        collector.record_request(request("/videos", 200, false)).await;

        let metrics = collector.get_metrics().await;
        assert_eq!(metrics.total_requests, 3);
        assert_eq!(metrics.failed_requests, 1);
        assert_eq!(metrics.quota_exceeded_requests, 1);
        assert_eq!(metrics.estimated_quota_units, 102);
        assert_eq!(metrics.average_response_time, Duration::from_millis(200));

        let search = &metrics.requests_by_endpoint["/search"];
        assert_eq!(search.quota_units, 100);
        assert_eq!(search.average_response_time(), Duration::from_millis(300));
        assert_eq!(search.success_rate(), 1.0);
    }

    #[tokio::test]
    async fn test_endpoint_summaries_for_run_log() {
        let collector = MetricsCollector::new();
        assert!(collector.get_metrics().await.summary().starts_with("0 API requests"));
        assert!(collector.get_metrics().await.endpoint_summaries().is_empty());

        collector.record_request(request("/videos", 100, true)).await;
        collector.record_request(request("/channels", 100, true)).await;
        collector.record_request(request("/channels", 300, false)).await;

        let lines = collector.get_metrics().await.endpoint_summaries();
        assert_eq!(
            lines,
            vec![
                "/channels 2 requests, 50% ok, ~2 quota units, avg 200ms".to_string(),
                "/videos 1 requests, 100% ok, ~1 quota units, avg 100ms".to_string(),
            ]
        );
    }
}
