pub mod configuration;
pub mod particle;

pub use configuration::Configuration;
pub use particle::{Particle, ParticleKind};
