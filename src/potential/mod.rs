//! Configuration-level potentials.
//!
//! A world is driven by exactly one [`Potential`]:
//! - [`ExactPotential`] wraps a scalar `V(configuration, t)` and provides
//!   finite-difference forces;
//! - [`ApproximatePotential`] only tracks a running energy estimate and cannot
//!   provide forces;
//! - `Absent` means no potential was supplied: energies are undefined and no force
//!   acts.

use std::fmt;

use crate::coordinate::{Coordinate, Differentiable};
use crate::error::{MechanicsError, Result};
use crate::models::Configuration;

pub mod difference;
pub mod fields;

pub use difference::{planar_gradient, rebuilt_gradient, shifted_gradient};
pub use fields::{HarmonicWell, UniformGravity};

/// Scalar energy of a whole configuration at time `t`.
pub trait Energy<C>: Send + Sync {
    fn energy(&self, configuration: &Configuration<C>, time: f64) -> f64;
}

// Удобство: можно передать замыкание вида Fn(configuration, t)
impl<C, F> Energy<C> for F
where
    F: Fn(&Configuration<C>, f64) -> f64 + Send + Sync,
{
    fn energy(&self, configuration: &Configuration<C>, time: f64) -> f64 {
        (self)(configuration, time)
    }
}

pub struct ExactPotential<C> {
    function: Box<dyn Energy<C>>,
}

impl<C: Differentiable> ExactPotential<C> {
    pub fn new<E: Energy<C> + 'static>(energy: E) -> Self {
        Self { function: Box::new(energy) }
    }

    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Configuration<C>, f64) -> f64 + Send + Sync + 'static,
    {
        Self::new(f)
    }

    pub fn at(&self, configuration: &Configuration<C>, time: f64) -> f64 {
        self.function.energy(configuration, time)
    }

    /// Gradient estimator around `configuration`, whose potential is `energy`.
    pub fn delta<'a>(
        &'a self,
        configuration: &'a mut Configuration<C>,
        time: f64,
        energy: f64,
    ) -> Gradient<'a, C> {
        Gradient {
            function: Some(&*self.function),
            configuration,
            time,
            energy,
        }
    }
}

impl<C> fmt::Debug for ExactPotential<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExactPotential").finish_non_exhaustive()
    }
}

/// Running potential-energy estimate with no force information.
///
/// Each step subtracts the work implied by the velocity change,
/// `Σᵢ mᵢ · Σ_d (v_afterᵢ − v_beforeᵢ)_d`. The estimate is lossy and drifts with
/// large steps; it assumes all work is velocity-derived and conservative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximatePotential {
    initial_energy: f64,
}

impl ApproximatePotential {
    pub fn new(initial_energy: f64) -> Self {
        Self { initial_energy }
    }

    pub fn initial_energy(&self) -> f64 {
        self.initial_energy
    }

    pub fn update<C: Coordinate>(
        &self,
        energy: f64,
        before: &Configuration<C>,
        after: &Configuration<C>,
    ) -> f64 {
        let work: f64 = before
            .masses()
            .iter()
            .zip(before.velocities().iter().zip(after.velocities()))
            .map(|(m, (v0, v1))| m * v1.sub(v0).component_sum())
            .sum();
        energy - work
    }

    pub fn delta(&self) -> Result<()> {
        Err(MechanicsError::UnsupportedGradient)
    }
}

#[derive(Debug)]
pub enum Potential<C> {
    Exact(ExactPotential<C>),
    Approximate(ApproximatePotential),
    Absent,
}

impl<C> Default for Potential<C> {
    fn default() -> Self {
        Potential::Absent
    }
}

impl<C: Differentiable> Potential<C> {
    pub fn exact<F>(f: F) -> Self
    where
        F: Fn(&Configuration<C>, f64) -> f64 + Send + Sync + 'static,
    {
        Potential::Exact(ExactPotential::from_fn(f))
    }

    pub fn approximate(initial_energy: f64) -> Self {
        Potential::Approximate(ApproximatePotential::new(initial_energy))
    }

    pub fn needs_approximating(&self) -> bool {
        matches!(self, Potential::Approximate(_))
    }

    /// Whether this potential produces forces worth estimating.
    pub fn exerts_forces(&self) -> bool {
        matches!(self, Potential::Exact(_))
    }

    /// Energy a world starts from: evaluated, seeded, or undefined.
    pub fn initial_energy(&self, configuration: &Configuration<C>, time: f64) -> Option<f64> {
        match self {
            Potential::Exact(p) => Some(p.at(configuration, time)),
            Potential::Approximate(p) => Some(p.initial_energy()),
            Potential::Absent => None,
        }
    }

    /// Direct evaluation; only exact potentials can be evaluated.
    pub fn at(&self, configuration: &Configuration<C>, time: f64) -> Option<f64> {
        match self {
            Potential::Exact(p) => Some(p.at(configuration, time)),
            _ => None,
        }
    }

    pub fn delta<'a>(
        &'a self,
        configuration: &'a mut Configuration<C>,
        time: f64,
        energy: f64,
    ) -> Result<Gradient<'a, C>> {
        match self {
            Potential::Exact(p) => Ok(p.delta(configuration, time, energy)),
            Potential::Approximate(_) => Err(MechanicsError::UnsupportedGradient),
            Potential::Absent => Ok(Gradient {
                function: None,
                configuration,
                time,
                energy,
            }),
        }
    }

    /// Energy after a step from `before` to `after` landing at `time`.
    pub fn next_energy(
        &self,
        energy: Option<f64>,
        before: &Configuration<C>,
        after: &Configuration<C>,
        time: f64,
    ) -> Option<f64> {
        match self {
            Potential::Exact(p) => Some(p.at(after, time)),
            Potential::Approximate(p) => {
                Some(p.update(energy.unwrap_or(p.initial_energy()), before, after))
            }
            Potential::Absent => None,
        }
    }
}

impl<C> From<f64> for Potential<C> {
    fn from(initial_energy: f64) -> Self {
        Potential::Approximate(ApproximatePotential::new(initial_energy))
    }
}

impl<C> From<ExactPotential<C>> for Potential<C> {
    fn from(p: ExactPotential<C>) -> Self {
        Potential::Exact(p)
    }
}

impl<C> From<ApproximatePotential> for Potential<C> {
    fn from(p: ApproximatePotential) -> Self {
        Potential::Approximate(p)
    }
}

/// Per-particle forward-difference gradients around one configuration.
///
/// Borrows the configuration mutably: the shift-based estimators perturb it in
/// place and restore it before returning.
pub struct Gradient<'a, C> {
    function: Option<&'a dyn Energy<C>>,
    configuration: &'a mut Configuration<C>,
    time: f64,
    energy: f64,
}

impl<C: Differentiable> Gradient<'_, C> {
    /// ∂V/∂x of particle `index`, estimated with step `delta`.
    pub fn at(&mut self, index: usize, delta: f64) -> C {
        match self.function {
            Some(f) => C::gradient(f, self.configuration, index, self.time, self.energy, delta),
            None => C::zero(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Vector2;
    use crate::models::Particle;

    fn pair() -> Configuration<Vector2> {
        [
            Particle::new(2.0, Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0)),
            Particle::new(3.0, Vector2::new(1.0, 0.0), Vector2::new(0.0, 0.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn approximate_update_subtracts_velocity_work() {
        let before = pair();
        let mut after = before.clone();
        after.set(0, before.particle(0).relabel(Vector2::new(0.1, 0.0), Vector2::new(0.5, 0.25)));
        after.set(1, before.particle(1).relabel(Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)));

        let p = ApproximatePotential::new(10.0);
        // 2·((0.5 − 1) + 0.25) + 3·(0 + 1) = −0.5 + 3
        assert!((p.update(10.0, &before, &after) - 7.5).abs() < 1e-12);
    }

    #[test]
    fn approximate_potential_has_no_gradient() {
        let mut config = pair();
        let potential: Potential<Vector2> = Potential::approximate(1.0);
        assert!(potential.needs_approximating());
        assert_eq!(
            potential.delta(&mut config, 0.0, 1.0).err(),
            Some(MechanicsError::UnsupportedGradient)
        );
        assert_eq!(ApproximatePotential::new(1.0).delta(), Err(MechanicsError::UnsupportedGradient));
    }

    #[test]
    fn absent_potential_is_undefined_and_forceless() {
        let mut config = pair();
        let potential: Potential<Vector2> = Potential::default();
        assert_eq!(potential.initial_energy(&config, 0.0), None);
        let mut gradient = potential.delta(&mut config, 0.0, 0.0).unwrap();
        assert_eq!(gradient.at(1, 1e-3), Vector2::new(0.0, 0.0));
    }

    #[test]
    fn named_fields_match_closures() {
        let config = pair();
        let well: ExactPotential<Vector2> = ExactPotential::new(HarmonicWell { stiffness: 4.0 });
        assert_eq!(well.at(&config, 0.0), 2.0);
        let gravity: ExactPotential<Vector2> = ExactPotential::new(UniformGravity { gravity: -10.0 });
        let moved: Configuration<Vector2> = [Particle::new(2.0, Vector2::new(0.0, 3.0), Vector2::new(0.0, 0.0))]
            .into_iter()
            .collect();
        assert_eq!(gravity.at(&moved, 0.0), 60.0);
    }
}
