use serde::{Deserialize, Serialize};

use crate::coordinate::{Coordinate, Polar, Vector2};

/// Which kinetic-energy formula a particle's coordinates call for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParticleKind {
    /// `½·m·|v|²`
    #[default]
    Euclidean,
    /// `½·m·(v_r² + r²·v_θ²)`; angular speed contributes in proportion to the radius.
    Polar,
}

impl ParticleKind {
    pub fn kinetic_energy<C: Coordinate>(self, mass: f64, position: &C, velocity: &C) -> f64 {
        match self {
            ParticleKind::Euclidean => 0.5 * mass * velocity.norm_squared(),
            ParticleKind::Polar => {
                let r = position.component(0);
                let v_r = velocity.component(0);
                let v_theta = velocity.component(1);
                0.5 * mass * (v_r * v_r + r * r * v_theta * v_theta)
            }
        }
    }
}

/// Immutable (mass, position, velocity) triple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle<C> {
    mass: f64,
    position: C,
    velocity: C,
    kind: ParticleKind,
}

impl<C: Coordinate> Particle<C> {
    pub fn new(mass: f64, position: C, velocity: C) -> Self {
        Self::with_kind(ParticleKind::Euclidean, mass, position, velocity)
    }

    /// Particle whose (r, θ) velocity is read in the polar basis.
    pub fn polar(mass: f64, position: C, velocity: C) -> Self {
        Self::with_kind(ParticleKind::Polar, mass, position, velocity)
    }

    pub fn with_kind(kind: ParticleKind, mass: f64, position: C, velocity: C) -> Self {
        Self { mass, position, velocity, kind }
    }

    pub fn mass(&self) -> f64 { self.mass }
    pub fn position(&self) -> &C { &self.position }
    pub fn velocity(&self) -> &C { &self.velocity }
    pub fn kind(&self) -> ParticleKind { self.kind }

    pub fn kinetic_energy(&self) -> f64 {
        self.kind.kinetic_energy(self.mass, &self.position, &self.velocity)
    }

    /// New particle displaced by `d_position` and, if given, `d_velocity`.
    pub fn perturb(&self, d_position: &C, d_velocity: Option<&C>) -> Self {
        let velocity = match d_velocity {
            Some(dv) => self.velocity.add(dv),
            None => self.velocity,
        };
        Self { position: self.position.add(d_position), velocity, ..*self }
    }

    /// Same mass and kind, new state.
    pub fn relabel(&self, position: C, velocity: C) -> Self {
        Self { position, velocity, ..*self }
    }
}

impl Particle<Polar> {
    /// Same particle seen in Cartesian coordinates.
    pub fn to_cartesian(&self) -> Particle<Vector2> {
        let (r, theta) = (self.position.r(), self.position.theta());
        let (r_dot, theta_dot) = (self.velocity.r(), self.velocity.theta());
        let (sin, cos) = theta.sin_cos();
        let velocity = Vector2::new(
            r_dot * cos - r * theta_dot * sin,
            r_dot * sin + r * theta_dot * cos,
        );
        Particle::new(self.mass, self.position.to_cartesian(), velocity)
    }
}

impl Particle<Vector2> {
    /// Same particle seen in polar coordinates, with a polar-basis velocity.
    pub fn to_polar(&self) -> Particle<Polar> {
        let q = self.position;
        let v = self.velocity;
        let velocity = Polar::new(
            (q.x() * v.x() + q.y() * v.y()) / q.r(),
            (v.y() * q.x() - v.x() * q.y()) / q.r_squared(),
        );
        Particle::polar(self.mass, q.to_polar(), velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_energy_scales_with_radius() {
        let p = Particle::polar(1.0, Polar::new(2.0, 0.3), Polar::new(0.0, 3.0));
        assert_eq!(p.kinetic_energy(), 18.0);
        let naive = Particle::new(1.0, Polar::new(2.0, 0.3), Polar::new(0.0, 3.0));
        assert_eq!(naive.kinetic_energy(), 4.5);
    }

    #[test]
    fn frame_change_keeps_energy() {
        let p = Particle::polar(2.5, Polar::new(2.0, 1.1), Polar::new(0.4, 3.0));
        let flat = p.to_cartesian();
        assert!((flat.kinetic_energy() - p.kinetic_energy()).abs() < 1e-9);
        let back = flat.to_polar();
        assert!((back.position().r() - 2.0).abs() < 1e-12);
        assert!((back.velocity().r() - 0.4).abs() < 1e-12);
        assert!((back.velocity().theta() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn perturb_leaves_source_untouched() {
        let p = Particle::new(3.0, Vector2::new(1.0, 1.0), Vector2::new(0.0, 2.0));
        let q = p.perturb(&Vector2::new(0.5, 0.0), None);
        assert_eq!(q.mass(), 3.0);
        assert_eq!(*q.position(), Vector2::new(1.5, 1.0));
        assert_eq!(*q.velocity(), Vector2::new(0.0, 2.0));
        assert_eq!(*p.position(), Vector2::new(1.0, 1.0));

        let r = p.perturb(&Vector2::new(0.0, 0.0), Some(&Vector2::new(1.0, 1.0)));
        assert_eq!(*r.velocity(), Vector2::new(1.0, 3.0));
    }
}
