//! Retry utilities.
//!
//! Exponential backoff for store calls that report part of their work as
//! not yet done and must be resent.

use std::time::Duration;

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 means no retries)
    pub max_attempts: u32,

    /// Delay before the first retry
    pub initial_delay: Duration,

    /// Upper bound on any single delay
    pub max_delay: Duration,

    /// Backoff multiplier (2.0 doubles the delay each attempt)
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::exponential(3)
    }
}

impl RetryConfig {
    /// Create a new retry configuration.
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            ..Self::exponential(max_attempts)
        }
    }

    /// Exponential backoff starting at 100ms.
    pub fn exponential(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }

    /// Set the maximum delay between retries.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }
}

/// Exponential backoff calculator.
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    config: RetryConfig,
    current_attempt: u32,
}

impl ExponentialBackoff {
    /// Create a calculator positioned before the first retry.
    pub fn new(config: RetryConfig) -> Self {
        Self {
            config,
            current_attempt: 0,
        }
    }

    /// Retries taken so far
    pub fn attempts(&self) -> u32 {
        self.current_attempt
    }

    /// Delay for the current attempt; zero before the first retry.
    pub fn delay(&self) -> Duration {
        if self.current_attempt == 0 {
            return Duration::ZERO;
        }

        let delay_ms = self.config.initial_delay.as_millis() as f64
            * self
                .config
                .backoff_multiplier
                .powi((self.current_attempt - 1) as i32);

        Duration::from_millis(delay_ms as u64).min(self.config.max_delay)
    }

    /// Take the next retry, returning how long to wait before it, or `None`
    /// once every attempt is spent.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.current_attempt >= self.config.max_attempts {
            return None;
        }

        self.current_attempt += 1;
        Some(self.delay())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_exponential() {
        let config = RetryConfig::exponential(5);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.initial_delay, Duration::from_millis(100));
        assert_eq!(config.backoff_multiplier, 2.0);
        assert_eq!(RetryConfig::default().max_attempts, 3);
    }

    #[test]
    fn test_delays_double_until_exhausted() {
        let mut backoff = ExponentialBackoff::new(RetryConfig::exponential(3));
        assert_eq!(backoff.delay(), Duration::ZERO);

        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_delay(), Some(Duration::from_millis(400)));
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.next_delay(), None);
        assert_eq!(backoff.attempts(), 3);
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig::exponential(10).with_max_delay(Duration::from_millis(500));
        let mut backoff = ExponentialBackoff::new(config);

        let delays: Vec<_> = std::iter::from_fn(|| backoff.next_delay()).collect();
        assert_eq!(delays.len(), 10);
        assert!(delays.iter().all(|delay| *delay <= Duration::from_millis(500)));
        assert_eq!(delays.last(), Some(&Duration::from_millis(500)));
    }

    #[test]
    fn test_no_attempts_never_waits() {
        let mut backoff = ExponentialBackoff::new(RetryConfig::new(0, Duration::from_millis(10)));
        assert_eq!(backoff.next_delay(), None);
    }
}
