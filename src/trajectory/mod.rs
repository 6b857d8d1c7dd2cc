//! Per-particle dynamics laws.

use crate::coordinate::Coordinate;
use crate::models::Particle;

pub mod closed_form;
pub mod numeric;
pub mod oscillator;

pub use closed_form::{ClosedForm, DEFAULT_STEP_HINT};
pub use numeric::{FreeStep, PolarStep, SelfForced};
pub use oscillator::HarmonicOscillator;

/// How one particle evolves. The variant is fixed for the trajectory's lifetime.
#[derive(Debug)]
pub enum Trajectory<C> {
    /// Analytic solution, evaluated directly at any time.
    ClosedForm(ClosedForm<C>),
    /// Semi-implicit Euler under the world's potential gradient.
    FreeStep(FreeStep<C>),
    /// As `FreeStep` on (r, θ), with the polar-basis pseudo-forces.
    PolarStep(PolarStep<C>),
    /// Stepwise with its own force law; never receives a gradient.
    SelfForced(SelfForced<C>),
}

impl<C: Coordinate> Trajectory<C> {
    pub fn has_closed_form(&self) -> bool {
        matches!(self, Trajectory::ClosedForm(_))
    }

    /// Only meaningful for numeric trajectories.
    pub fn includes_potential(&self) -> bool {
        matches!(self, Trajectory::SelfForced(_))
    }

    /// Whether a step needs the potential's gradient for this particle.
    pub fn needs_gradient(&self) -> bool {
        matches!(self, Trajectory::FreeStep(_) | Trajectory::PolarStep(_))
    }

    pub fn mass(&self) -> f64 {
        match self {
            Trajectory::ClosedForm(j) => j.mass(),
            Trajectory::FreeStep(j) => j.mass(),
            Trajectory::PolarStep(j) => j.mass(),
            Trajectory::SelfForced(j) => j.mass(),
        }
    }

    /// Direct evaluation, available for closed-form trajectories only.
    pub fn at(&self, t: f64, step_hint: f64) -> Option<Particle<C>> {
        match self {
            Trajectory::ClosedForm(j) => Some(j.at(t, step_hint)),
            _ => None,
        }
    }

    /// Particle this trajectory contributes to a world whose clock reads `time`.
    pub fn initial_particle(&self, time: f64, step_hint: f64) -> Particle<C> {
        match self {
            Trajectory::ClosedForm(j) => j.at(time, step_hint),
            Trajectory::FreeStep(j) => j.initial_value(),
            Trajectory::PolarStep(j) => j.initial_value(),
            Trajectory::SelfForced(j) => j.initial_value(),
        }
    }

    /// One step of `delta` ending at `time`. A missing gradient means no force.
    pub fn advance(
        &self,
        particle: &Particle<C>,
        delta: f64,
        gradient: Option<&C>,
        time: f64,
        step_hint: f64,
    ) -> Particle<C> {
        let zero = C::zero();
        let gradient = gradient.unwrap_or(&zero);
        match self {
            Trajectory::ClosedForm(j) => j.at(time, step_hint),
            Trajectory::SelfForced(j) => j.update(particle, delta, time),
            Trajectory::FreeStep(j) => j.update(particle, delta, gradient, time),
            Trajectory::PolarStep(j) => j.update(particle, delta, gradient, time),
        }
    }
}

impl<C> From<ClosedForm<C>> for Trajectory<C> {
    fn from(j: ClosedForm<C>) -> Self {
        Trajectory::ClosedForm(j)
    }
}

impl<C> From<FreeStep<C>> for Trajectory<C> {
    fn from(j: FreeStep<C>) -> Self {
        Trajectory::FreeStep(j)
    }
}

impl<C> From<PolarStep<C>> for Trajectory<C> {
    fn from(j: PolarStep<C>) -> Self {
        Trajectory::PolarStep(j)
    }
}

impl<C> From<SelfForced<C>> for Trajectory<C> {
    fn from(j: SelfForced<C>) -> Self {
        Trajectory::SelfForced(j)
    }
}
