use crate::coordinate::Coordinate;

use super::particle::{Particle, ParticleKind};

/// All particles of a world at one instant, stored column-wise (SoA).
///
/// Index `i` in every column belongs to the same particle, which in turn belongs to
/// trajectory `i` of the owning world.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration<C> {
    mass: Vec<f64>,          // массы
    position: Vec<C>,        // позиции
    velocity: Vec<C>,        // скорости
    kind: Vec<ParticleKind>, // формула кинетической энергии
}

impl<C> Default for Configuration<C> {
    fn default() -> Self {
        Self {
            mass: Vec::new(),
            position: Vec::new(),
            velocity: Vec::new(),
            kind: Vec::new(),
        }
    }
}

impl<C: Coordinate> Configuration<C> {
    pub fn new() -> Self { Self::default() }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            mass: Vec::with_capacity(n),
            position: Vec::with_capacity(n),
            velocity: Vec::with_capacity(n),
            kind: Vec::with_capacity(n),
        }
    }

    pub fn len(&self) -> usize { self.mass.len() }
    pub fn is_empty(&self) -> bool { self.mass.is_empty() }

    pub fn masses(&self) -> &[f64] { &self.mass }
    pub fn positions(&self) -> &[C] { &self.position }
    pub fn velocities(&self) -> &[C] { &self.velocity }
    pub fn kinds(&self) -> &[ParticleKind] { &self.kind }

    pub(crate) fn position_mut(&mut self, i: usize) -> &mut C { &mut self.position[i] }

    pub fn push(&mut self, particle: Particle<C>) {
        self.mass.push(particle.mass());
        self.position.push(*particle.position());
        self.velocity.push(*particle.velocity());
        self.kind.push(particle.kind());
    }

    /// Particle `i`. Panics when out of range, like slice indexing.
    pub fn particle(&self, i: usize) -> Particle<C> {
        Particle::with_kind(self.kind[i], self.mass[i], self.position[i], self.velocity[i])
    }

    pub fn get(&self, i: usize) -> Option<Particle<C>> {
        (i < self.len()).then(|| self.particle(i))
    }

    pub fn set(&mut self, i: usize, particle: Particle<C>) {
        self.mass[i] = particle.mass();
        self.position[i] = *particle.position();
        self.velocity[i] = *particle.velocity();
        self.kind[i] = particle.kind();
    }

    pub fn iter(&self) -> impl Iterator<Item = Particle<C>> + '_ {
        (0..self.len()).map(move |i| self.particle(i))
    }

    pub fn to_particles(&self) -> Vec<Particle<C>> {
        self.iter().collect()
    }

    pub fn kinetic_energy(&self) -> f64 {
        (0..self.len())
            .map(|i| self.kind[i].kinetic_energy(self.mass[i], &self.position[i], &self.velocity[i]))
            .sum()
    }
}

impl<C: Coordinate> FromIterator<Particle<C>> for Configuration<C> {
    fn from_iter<I: IntoIterator<Item = Particle<C>>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut out = Self::with_capacity(iter.size_hint().0);
        for particle in iter {
            out.push(particle);
        }
        out
    }
}
