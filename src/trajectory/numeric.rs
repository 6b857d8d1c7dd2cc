use std::fmt;

use crate::coordinate::polar::wrap_angle;
use crate::coordinate::{Coordinate, Polar};
use crate::models::Particle;

/// Stepwise trajectory driven by the world's potential gradient.
///
/// One step is semi-implicit Euler: kick the velocity with the force at the current
/// position, then drift the position with the new velocity. This is not the explicit
/// variant that drifts with the pre-step velocity: from rest at x = 1 in a unit
/// spring with h = 0.5, one step lands at x = 0.6875 rather than staying at 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreeStep<C> {
    initial: Particle<C>,
}

impl<C: Coordinate> FreeStep<C> {
    pub fn new(mass: f64, position: C, velocity: C) -> Self {
        Self { initial: Particle::new(mass, position, velocity) }
    }

    pub fn from_particle(initial: Particle<C>) -> Self {
        Self { initial }
    }

    pub fn mass(&self) -> f64 { self.initial.mass() }
    pub fn initial_value(&self) -> Particle<C> { self.initial }

    /// `gradient` is ∂V/∂x at `particle`'s position.
    pub fn update(&self, particle: &Particle<C>, delta: f64, gradient: &C, _time: f64) -> Particle<C> {
        let velocity = particle.velocity().sub(&gradient.scale(delta / particle.mass()));
        let position = particle.position().add(&velocity.scale(delta));
        particle.relabel(position, velocity)
    }
}

/// [`FreeStep`] on (r, θ) coordinates.
///
/// The polar basis turns with the particle, so the step adds the centripetal
/// `v_θ²·r` and Coriolis `−2·v_r·v_θ/r` terms, and reads the θ gradient as a torque
/// (divided by r²). θ is kept in `[0, 2π)`. Any two-component coordinate is read as
/// (r, θ); the particles produced use the polar kinetic energy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarStep<C> {
    initial: Particle<C>,
}

impl<C: Coordinate> PolarStep<C> {
    pub fn new(mass: f64, position: C, velocity: C) -> Self {
        Self { initial: Particle::polar(mass, position, velocity) }
    }

    pub fn mass(&self) -> f64 { self.initial.mass() }
    pub fn initial_value(&self) -> Particle<C> { self.initial }

    pub fn update(&self, particle: &Particle<C>, delta: f64, gradient: &C, _time: f64) -> Particle<C> {
        let mass = particle.mass();
        let r = particle.position().component(0);
        let v_r = particle.velocity().component(0);
        let v_theta = particle.velocity().component(1);

        let acceleration = C::from_fn(|axis| match axis {
            0 => v_theta * v_theta * r - gradient.component(0) / mass,
            _ => -2.0 * v_r * v_theta / r - gradient.component(1) / (r * r * mass),
        });
        let velocity = particle.velocity().add(&acceleration.scale(delta));
        let position = particle
            .position()
            .add(&velocity.scale(delta))
            .map(|value, axis| if axis == 1 { wrap_angle(value) } else { value });

        Particle::polar(mass, position, velocity)
    }
}

pub type StepLaw<C> = Box<dyn Fn(&Particle<C>, f64, f64) -> Particle<C> + Send + Sync>;

/// Stepwise trajectory that carries its own force law and never consults the
/// world's potential.
pub struct SelfForced<C> {
    initial: Particle<C>,
    law: StepLaw<C>,
}

impl<C: Coordinate> SelfForced<C> {
    /// `law(particle, delta, time)` returns the particle one step later; `time` is
    /// the time at the end of the step.
    pub fn new<L>(initial: Particle<C>, law: L) -> Self
    where
        L: Fn(&Particle<C>, f64, f64) -> Particle<C> + Send + Sync + 'static,
    {
        Self { initial, law: Box::new(law) }
    }

    /// Semi-implicit Euler on a known acceleration, evaluated at the start of the
    /// step.
    pub fn from_acceleration<A>(initial: Particle<C>, acceleration: A) -> Self
    where
        A: Fn(&Particle<C>, f64) -> C + Send + Sync + 'static,
    {
        Self::new(initial, move |particle, delta, time| {
            let a = acceleration(particle, time - delta);
            let velocity = particle.velocity().add(&a.scale(delta));
            let position = particle.position().add(&velocity.scale(delta));
            particle.relabel(position, velocity)
        })
    }

    pub fn mass(&self) -> f64 { self.initial.mass() }
    pub fn initial_value(&self) -> Particle<C> { self.initial }

    pub fn update(&self, particle: &Particle<C>, delta: f64, time: f64) -> Particle<C> {
        (self.law)(particle, delta, time)
    }
}

impl SelfForced<Polar> {
    /// Rigid pendulum of `length` hanging in a uniform field `gravity` along +y
    /// (negative pulls down). θ is measured from +x; `θ'' = (g/ℓ)·cos θ`, which
    /// conserves `½mℓ²θ'² − m·g·ℓ·sin θ` under [`UniformGravity`].
    ///
    /// Pendulum scenes written against `V = g·r·sin θ` use `θ'' = −g/(m·ℓ)·cos θ`
    /// instead; pass the negated field (and fold in the mass) to reproduce them.
    ///
    /// [`UniformGravity`]: crate::potential::UniformGravity
    pub fn pendulum(gravity: f64, mass: f64, length: f64, angle: f64, angular_speed: f64) -> Self {
        let initial = Particle::polar(mass, Polar::new(length, angle), Polar::new(0.0, angular_speed));
        Self::from_acceleration(initial, move |particle, _| {
            Polar::new(0.0, gravity / length * particle.position().theta().cos())
        })
    }
}

impl<C> fmt::Debug for SelfForced<C>
where
    C: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelfForced")
            .field("initial", &self.initial)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Vector2;
    use std::f64::consts::TAU;

    #[test]
    fn free_step_kicks_then_drifts() {
        let j = FreeStep::new(2.0, Vector2::new(0.0, 0.0), Vector2::new(1.0, 0.0));
        let p = j.update(&j.initial_value(), 0.5, &Vector2::new(4.0, -2.0), 0.5);
        // v = (1, 0) − (4, −2)·0.5/2
        assert_eq!(*p.velocity(), Vector2::new(0.0, 0.5));
        assert_eq!(*p.position(), Vector2::new(0.0, 0.25));
        assert_eq!(p.mass(), 2.0);
    }

    #[test]
    fn polar_step_adds_curvature_and_wraps() {
        let j = PolarStep::new(1.0, Polar::new(2.0, TAU - 0.05), Polar::new(0.0, 1.0));
        let p = j.update(&j.initial_value(), 0.1, &Polar::new(0.0, 0.0), 0.1);
        // centripetal term only: v_r += 1²·2·0.1
        assert!((p.velocity().r() - 0.2).abs() < 1e-12);
        assert!((p.velocity().theta() - 1.0).abs() < 1e-12);
        assert!((p.position().theta() - 0.05).abs() < 1e-12);
        assert_eq!(p.kind(), crate::models::ParticleKind::Polar);
    }

    #[test]
    fn pendulum_swings_down_from_horizontal() {
        let j = SelfForced::pendulum(-10.0, 1.0, 2.0, 0.0, 0.0);
        let p = j.update(&j.initial_value(), 0.01, 0.01);
        assert!(p.velocity().theta() < 0.0);
        assert_eq!(p.position().r(), 2.0);
        assert_eq!(p.velocity().r(), 0.0);
    }
}
