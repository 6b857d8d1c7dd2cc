use serde::{Deserialize, Serialize};

use crate::error::{MechanicsError, Result};

pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_STEPS_PER_SECOND: f64 = 1000.0;
pub const DEFAULT_MAX_TIME_SKIP: f64 = 0.1;

/// How wall-clock frames are turned into world updates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Simulated seconds per wall-clock second. Zero freezes the world, negative runs it
    /// backwards.
    pub speed: f64,
    /// Integration fidelity; the step size is its reciprocal.
    pub steps_per_second: f64,
    /// Longest wall-clock gap (s) a single frame may account for.
    pub max_time_skip: f64,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_SPEED,
            steps_per_second: DEFAULT_STEPS_PER_SECOND,
            max_time_skip: DEFAULT_MAX_TIME_SKIP,
        }
    }
}

impl RunnerConfig {
    pub fn step_size(&self) -> f64 {
        1.0 / self.steps_per_second
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() {
            return Err(MechanicsError::InvalidConfig(format!("speed must be finite, got {}", self.speed)));
        }
        if !(self.steps_per_second.is_finite() && self.steps_per_second > 0.0) {
            return Err(MechanicsError::InvalidConfig(format!(
                "stepsPerSecond must be positive, got {}",
                self.steps_per_second
            )));
        }
        if !(self.max_time_skip.is_finite() && self.max_time_skip > 0.0) {
            return Err(MechanicsError::InvalidConfig(format!(
                "maxTimeSkip must be positive, got {}",
                self.max_time_skip
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: RunnerConfig = serde_json::from_str(r#"{ "stepsPerSecond": 250 }"#).unwrap();
        assert_eq!(cfg.speed, DEFAULT_SPEED);
        assert_eq!(cfg.max_time_skip, DEFAULT_MAX_TIME_SKIP);
        assert_eq!(cfg.step_size(), 0.004);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_fidelity_is_rejected() {
        let cfg: RunnerConfig = serde_json::from_str(r#"{ "speed": -2, "stepsPerSecond": 0 }"#).unwrap();
        assert_eq!(cfg.speed, -2.0);
        assert!(matches!(cfg.validate(), Err(MechanicsError::InvalidConfig(_))));
    }

    #[test]
    fn default_step_is_a_millisecond() {
        let cfg = RunnerConfig::default();
        assert_eq!(cfg.step_size(), 0.001);
        assert!(cfg.validate().is_ok());
    }
}
