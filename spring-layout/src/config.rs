//! Engine Configuration
//!
//! The scheduler only needs two knobs: how often it ticks and what its
//! background thread is called. Configuration can be built in code, parsed
//! from JSON, or read from the environment.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};

/// Environment variable holding the tick rate in ticks per second.
pub const TICK_RATE_ENV: &str = "SPRING_LAYOUT_TICK_RATE";

/// Environment variable holding the scheduler thread name.
pub const THREAD_NAME_ENV: &str = "SPRING_LAYOUT_THREAD_NAME";

const DEFAULT_TICK_RATE_HZ: f64 = 60.0;
const DEFAULT_THREAD_NAME: &str = "spring-layout";

/// The shortest wait the scheduler will ever use between ticks.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// The longest wait between ticks a configuration may ask for.
const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Configuration for a [`LayoutEngine`](crate::engine::LayoutEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Target number of ticks per second.
    pub tick_rate_hz: f64,

    /// Name given to the background scheduler thread.
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            thread_name: DEFAULT_THREAD_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    /// Set the target tick rate.
    pub fn with_tick_rate(mut self, tick_rate_hz: f64) -> Self {
        self.tick_rate_hz = tick_rate_hz;
        self
    }

    /// Set the scheduler thread name.
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| LayoutError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tick_rate_hz: std::env::var(TICK_RATE_ENV)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.tick_rate_hz),
            thread_name: std::env::var(THREAD_NAME_ENV)
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.thread_name),
        }
    }

    /// Check that the configuration can drive a scheduler.
    pub fn validate(&self) -> Result<()> {
        if !self.tick_rate_hz.is_finite() || self.tick_rate_hz <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "tick rate must be a positive number, got {}",
                self.tick_rate_hz
            )));
        }

        match Duration::try_from_secs_f64(1.0 / self.tick_rate_hz) {
            Ok(interval) if interval <= MAX_TICK_INTERVAL => Ok(()),
            _ => Err(LayoutError::InvalidConfig(format!(
                "tick rate {} Hz is too slow, at least one tick per {} s is required",
                self.tick_rate_hz,
                MAX_TICK_INTERVAL.as_secs()
            ))),
        }
    }

    /// Wait between two ticks, clamped to between one millisecond and one day.
    pub fn tick_interval(&self) -> Duration {
        let seconds = 1.0 / self.tick_rate_hz;
        if seconds.is_nan() || seconds <= 0.0 {
            return MIN_TICK_INTERVAL;
        }
        Duration::try_from_secs_f64(seconds)
            .unwrap_or(MAX_TICK_INTERVAL)
            .clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_about_sixty_hertz() {
        let config = EngineConfig::default();
        let interval = config.tick_interval();
        assert!(interval >= Duration::from_millis(16));
        assert!(interval <= Duration::from_millis(17));
    }

    #[test]
    fn interval_is_floored_to_one_millisecond() {
        let config = EngineConfig::default().with_tick_rate(1_000_000.0);
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn validate_rejects_bad_rates() {
        for rate in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = EngineConfig::default().with_tick_rate(rate);
            assert!(matches!(
                config.validate(),
                Err(LayoutError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let config = EngineConfig::from_json(r#"{ "tick_rate_hz": 30.0 }"#).unwrap();
        assert_eq!(config.tick_rate_hz, 30.0);
        assert_eq!(config.thread_name, "spring-layout");
    }

    #[test]
    fn json_rejects_invalid_rate() {
        let result = EngineConfig::from_json(r#"{ "tick_rate_hz": 0.0 }"#);
        assert!(matches!(result, Err(LayoutError::InvalidConfig(_))));
    }

    #[test]
    fn vanishingly_slow_rate_is_rejected_not_panicking() {
        let result = EngineConfig::from_json(r#"{ "tick_rate_hz": 1e-20 }"#);
        assert!(matches!(result, Err(LayoutError::InvalidConfig(_))));

        let config = EngineConfig::default().with_tick_rate(1e-20);
        assert_eq!(config.tick_interval(), Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn one_tick_per_day_is_the_slowest_accepted_rate() {
        let config = EngineConfig::default().with_tick_rate(1.0 / (24.0 * 60.0 * 60.0));
        assert!(config.validate().is_ok());

        let config = EngineConfig::default().with_tick_rate(1.0 / (48.0 * 60.0 * 60.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(EngineConfig::from_json("not json").is_err());
    }
}
