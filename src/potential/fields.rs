//! Ready-made potentials for the stock scenes.

use serde::{Deserialize, Serialize};

use crate::coordinate::{Cartesian, Polar};
use crate::models::Configuration;

use super::Energy;

/// `Σ ½·k·|x|²` around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HarmonicWell {
    pub stiffness: f64,
}

impl<const D: usize> Energy<Cartesian<D>> for HarmonicWell {
    fn energy(&self, configuration: &Configuration<Cartesian<D>>, _time: f64) -> f64 {
        configuration
            .positions()
            .iter()
            .map(|q| 0.5 * self.stiffness * q.0.norm_squared())
            .sum()
    }
}

impl Energy<Polar> for HarmonicWell {
    fn energy(&self, configuration: &Configuration<Polar>, _time: f64) -> f64 {
        configuration
            .positions()
            .iter()
            .map(|q| 0.5 * self.stiffness * q.r_squared())
            .sum()
    }
}

/// Constant acceleration `gravity` along +y; `Σ −m·g·y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformGravity {
    pub gravity: f64,
}

impl Energy<Cartesian<2>> for UniformGravity {
    fn energy(&self, configuration: &Configuration<Cartesian<2>>, _time: f64) -> f64 {
        configuration
            .masses()
            .iter()
            .zip(configuration.positions())
            .map(|(m, q)| -m * self.gravity * q.y())
            .sum()
    }
}

impl Energy<Polar> for UniformGravity {
    fn energy(&self, configuration: &Configuration<Polar>, _time: f64) -> f64 {
        configuration
            .masses()
            .iter()
            .zip(configuration.positions())
            .map(|(m, q)| -m * self.gravity * q.y())
            .sum()
    }
}
