//! Reopen scheduling after the link is lost
//!
//! The host calls `update()` on its own cadence, so the policy never sleeps.
//! It only records when the next reopen attempt becomes due and lets `update()`
//! compare that against the clock. The delay grows by `backoff_multiplier`
//! after each failed attempt and is capped at `max_delay_ms`.

use dexfan_core::ReconnectConfig;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, info};

/// Backoff bookkeeping for reopening a closed link
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    config: ReconnectConfig,
    /// Failed attempts since the link was last open
    attempts: u32,
    /// Delay applied before the next attempt
    delay: Duration,
    /// When the next attempt is due (None when not armed)
    next_attempt: Option<Instant>,
}

impl ReconnectPolicy {
    pub fn new(config: ReconnectConfig) -> Self {
        let delay = Duration::from_millis(config.initial_delay_ms);
        Self {
            config,
            attempts: 0,
            delay,
            next_attempt: None,
        }
    }

    /// Check if reconnection is enabled
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Failed attempts since the link was last open
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay that will precede the next attempt
    pub fn current_delay(&self) -> Duration {
        self.delay
    }

    /// Instant at which the next attempt becomes due
    pub fn next_attempt(&self) -> Option<Instant> {
        self.next_attempt
    }

    /// True once `max_attempts` consecutive attempts have failed
    pub fn is_exhausted(&self) -> bool {
        self.config.max_attempts > 0 && self.attempts >= self.config.max_attempts
    }

    /// Start waiting for a reopen after the link was lost or failed to open
    ///
    /// Has no effect when disabled or already armed.
    pub fn arm(&mut self, now: Instant) {
        if !self.config.enabled || self.next_attempt.is_some() || self.is_exhausted() {
            return;
        }
        debug!("Reconnect armed, first attempt in {:?}", self.delay);
        self.next_attempt = Some(now + self.delay);
    }

    /// Whether `update()` should try to reopen now
    pub fn should_attempt(&self, now: Instant) -> bool {
        self.config.enabled && self.next_attempt.is_some_and(|due| now >= due)
    }

    /// Record a failed reopen and schedule the next one
    pub fn record_failure(&mut self, now: Instant) {
        self.attempts += 1;

        if self.is_exhausted() {
            error!(
                "Reconnection failed after {} attempts, giving up",
                self.attempts
            );
            self.next_attempt = None;
            return;
        }

        self.delay = Duration::from_secs_f64(
            (self.delay.as_secs_f64() * self.config.backoff_multiplier)
                .min(Duration::from_millis(self.config.max_delay_ms).as_secs_f64()),
        );
        info!(
            "Reconnection attempt {}/{} failed, next in {:?}",
            self.attempts,
            if self.config.max_attempts == 0 {
                "unlimited".to_string()
            } else {
                self.config.max_attempts.to_string()
            },
            self.delay
        );
        self.next_attempt = Some(now + self.delay);
    }

    /// Record a successful reopen
    pub fn record_success(&mut self) {
        if self.attempts > 0 {
            info!("Reconnection successful after {} attempts", self.attempts + 1);
        }
        self.reset();
    }

    /// Disarm and restore the initial delay and attempt budget
    pub fn reset(&mut self) {
        self.attempts = 0;
        self.delay = Duration::from_millis(self.config.initial_delay_ms);
        self.next_attempt = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled_config() -> ReconnectConfig {
        ReconnectConfig {
            enabled: true,
            max_attempts: 0,
            initial_delay_ms: 1000,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }

    #[test]
    fn test_disabled_never_attempts() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig::default());
        let now = Instant::now();

        policy.arm(now);
        assert!(policy.next_attempt().is_none());
        assert!(!policy.should_attempt(now + Duration::from_secs(3600)));
    }

    #[test]
    fn test_not_armed_never_attempts() {
        let policy = ReconnectPolicy::new(enabled_config());
        assert!(!policy.should_attempt(Instant::now() + Duration::from_secs(60)));
    }

    #[test]
    fn test_first_attempt_after_initial_delay() {
        let mut policy = ReconnectPolicy::new(enabled_config());
        let now = Instant::now();
        policy.arm(now);

        assert!(!policy.should_attempt(now));
        assert!(!policy.should_attempt(now + Duration::from_millis(999)));
        assert!(policy.should_attempt(now + Duration::from_millis(1000)));
    }

    #[test]
    fn test_arm_twice_keeps_first_deadline() {
        let mut policy = ReconnectPolicy::new(enabled_config());
        let now = Instant::now();
        policy.arm(now);
        policy.arm(now + Duration::from_millis(500));

        assert_eq!(policy.next_attempt(), Some(now + Duration::from_millis(1000)));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let mut policy = ReconnectPolicy::new(enabled_config());
        let now = Instant::now();
        policy.arm(now);

        let expected = [2000, 4000, 5000, 5000];
        for ms in expected {
            policy.record_failure(now);
            assert_eq!(policy.current_delay(), Duration::from_millis(ms));
            assert_eq!(policy.next_attempt(), Some(now + Duration::from_millis(ms)));
        }
        assert_eq!(policy.attempts(), 4);
        assert!(!policy.is_exhausted());
    }

    #[test]
    fn test_max_attempts_exhausts() {
        let mut policy = ReconnectPolicy::new(ReconnectConfig {
            max_attempts: 2,
            ..enabled_config()
        });
        let now = Instant::now();
        policy.arm(now);

        policy.record_failure(now);
        assert!(!policy.is_exhausted());
        policy.record_failure(now);
        assert!(policy.is_exhausted());

        assert!(policy.next_attempt().is_none());
        assert!(!policy.should_attempt(now + Duration::from_secs(3600)));

        // Exhausted policy ignores further disconnects until reset
        policy.arm(now);
        assert!(policy.next_attempt().is_none());
    }

    #[test]
    fn test_success_resets() {
        let mut policy = ReconnectPolicy::new(enabled_config());
        let now = Instant::now();
        policy.arm(now);
        policy.record_failure(now);
        policy.record_failure(now);

        policy.record_success();
        assert_eq!(policy.attempts(), 0);
        assert_eq!(policy.current_delay(), Duration::from_millis(1000));
        assert!(policy.next_attempt().is_none());
    }
}
