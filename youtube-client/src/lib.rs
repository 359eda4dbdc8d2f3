pub mod api;
pub mod metrics;


pub use api::YouTubeApiClient;
pub use metrics::{ApiMetrics, MetricsCollector};
