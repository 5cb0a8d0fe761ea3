use std::time::Duration;

/// Retry policy for locating against a changing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatorConfig {
    /// Additional attempts after a stale element reference
    pub max_retries: usize,

    /// Pause before each retry
    pub retry_backoff: Duration,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }
}

impl LocatorConfig {
    /// Create config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of retries
    pub fn max_retries(mut self, retries: usize) -> Self {
        self.max_retries = retries;
        self
    }

    /// Builder method: set the pause between retries
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LocatorConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.retry_backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_builder() {
        let config = LocatorConfig::new().max_retries(5).retry_backoff(Duration::ZERO);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_backoff, Duration::ZERO);
    }
}
