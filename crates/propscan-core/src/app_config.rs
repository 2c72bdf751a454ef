#[derive(Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Minimum interval between Rightmove requests, in milliseconds.
    pub rightmove_rate_limit_ms: u64,
    /// Minimum interval between TfL requests, in milliseconds. The TfL cap is
    /// 500 requests per minute, so anything at or above 120 ms is safe.
    pub tfl_rate_limit_ms: u64,
    pub request_timeout_secs: u64,
    /// Additional fetch attempts after the first failure.
    pub max_retries: u32,
    /// Ceiling on concurrently dispatched targets. `0` means no ceiling:
    /// one task per target, throttled only by the rate limiter.
    pub max_concurrent_targets: usize,
    pub user_agent: String,
    pub tfl_app_id: Option<String>,
    pub tfl_app_key: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("log_level", &self.log_level)
            .field("rightmove_rate_limit_ms", &self.rightmove_rate_limit_ms)
            .field("tfl_rate_limit_ms", &self.tfl_rate_limit_ms)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("max_concurrent_targets", &self.max_concurrent_targets)
            .field("user_agent", &self.user_agent)
            .field("tfl_app_id", &self.tfl_app_id.as_ref().map(|_| "[redacted]"))
            .field(
                "tfl_app_key",
                &self.tfl_app_key.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}
