use std::fmt;

use crate::coordinate::Coordinate;
use crate::models::{Particle, ParticleKind};

use super::numeric::FreeStep;
use super::oscillator::HarmonicOscillator;

/// Step used to difference a position function when no velocity function exists and
/// the caller gives no better hint.
pub const DEFAULT_STEP_HINT: f64 = 1.0;

pub type PathFn<C> = Box<dyn Fn(f64) -> C + Send + Sync>;

/// Trajectory with a known analytic solution.
///
/// Evaluation is O(1) at any `t` and carries no integration error.
pub struct ClosedForm<C> {
    mass: f64,
    kind: ParticleKind,
    position: PathFn<C>,
    velocity: Option<PathFn<C>>,
}

impl<C: Coordinate> ClosedForm<C> {
    pub fn new<P, V>(mass: f64, position: P, velocity: V) -> Self
    where
        P: Fn(f64) -> C + Send + Sync + 'static,
        V: Fn(f64) -> C + Send + Sync + 'static,
    {
        Self {
            mass,
            kind: ParticleKind::Euclidean,
            position: Box::new(position),
            velocity: Some(Box::new(velocity)),
        }
    }

    /// Only the position is known; velocity is differenced from it.
    pub fn from_position<P>(mass: f64, position: P) -> Self
    where
        P: Fn(f64) -> C + Send + Sync + 'static,
    {
        Self {
            mass,
            kind: ParticleKind::Euclidean,
            position: Box::new(position),
            velocity: None,
        }
    }

    pub fn with_kind(mut self, kind: ParticleKind) -> Self {
        self.kind = kind;
        self
    }

    /// Force-free motion `x0 + v0·t`.
    pub fn linear(mass: f64, x0: C, v0: C) -> Self {
        Self::new(mass, move |t| x0.add(&v0.scale(t)), move |_| v0)
    }

    /// Isotropic oscillator in the well `½·k·|x|²`, angular frequency `sqrt(k/m)`.
    pub fn oscillating(mass: f64, stiffness: f64, x0: C, v0: C) -> Self {
        let frequency = (stiffness / mass).sqrt();
        let axes: Vec<HarmonicOscillator> = (0..C::DIMENSION)
            .map(|axis| {
                HarmonicOscillator::from_initial(x0.component(axis), v0.component(axis), frequency)
            })
            .collect();
        let rates: Vec<HarmonicOscillator> = axes.iter().map(|h| h.derivative()).collect();
        Self::new(
            mass,
            move |t| C::from_fn(|axis| axes[axis].at(t)),
            move |t| C::from_fn(|axis| rates[axis].at(t)),
        )
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn kind(&self) -> ParticleKind {
        self.kind
    }

    pub fn position_at(&self, t: f64) -> C {
        (self.position)(t)
    }

    pub fn velocity_at(&self, t: f64, step_hint: f64) -> C {
        match &self.velocity {
            Some(velocity) => velocity(t),
            None => self.approximate_velocity(t, step_hint),
        }
    }

    /// Forward difference of the position function over `step`.
    pub fn approximate_velocity(&self, t: f64, step: f64) -> C {
        self.position_at(t + step).sub(&self.position_at(t)).over(step)
    }

    pub fn at(&self, t: f64, step_hint: f64) -> Particle<C> {
        Particle::with_kind(
            self.kind,
            self.mass,
            self.position_at(t),
            self.velocity_at(t, step_hint),
        )
    }

    /// Numeric trajectory starting from the same state at t = 0.
    pub fn approximate_form(&self) -> FreeStep<C> {
        FreeStep::from_particle(self.at(0.0, DEFAULT_STEP_HINT))
    }
}

impl<C> fmt::Debug for ClosedForm<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosedForm")
            .field("mass", &self.mass)
            .field("kind", &self.kind)
            .field("has_velocity", &self.velocity.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::{Vector1, Vector2};

    #[test]
    fn linear_is_exact_far_out() {
        let x0 = Vector2::new(1.5, -2.0);
        let v0 = Vector2::new(0.25, 3.0);
        let j = ClosedForm::linear(2.0, x0, v0);
        for t in [0.0, 1.0, 1e3, 1e9] {
            let p = j.at(t, 0.01);
            assert_eq!(*p.position(), Vector2::new(1.5 + 0.25 * t, -2.0 + 3.0 * t));
            assert_eq!(*p.velocity(), v0);
        }
    }

    #[test]
    fn differenced_velocity_uses_hint() {
        let j = ClosedForm::from_position(1.0, |t: f64| Vector1::new(t * t));
        let v = j.at(2.0, 0.5).velocity().x();
        assert_eq!(v, (2.5 * 2.5 - 4.0) / 0.5);
    }

    #[test]
    fn oscillating_returns_to_start() {
        let j = ClosedForm::oscillating(4.0, 1.0, Vector2::new(1.0, 0.0), Vector2::new(0.0, 0.5));
        let period = std::f64::consts::TAU / 0.5;
        let p = j.at(period, 0.01);
        assert!((p.position().x() - 1.0).abs() < 1e-9);
        assert!(p.position().y().abs() < 1e-9);
        assert!((p.velocity().y() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn approximate_form_starts_identical() {
        let j = ClosedForm::oscillating(2.0, 8.0, Vector2::new(0.0, 1.0), Vector2::new(1.0, 0.0));
        let numeric = j.approximate_form();
        assert_eq!(numeric.initial_value(), j.at(0.0, 1.0));
    }
}
