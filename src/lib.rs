pub mod clock;
pub mod config;
pub mod coordinate;
pub mod engine;
pub mod error;
pub mod models;
pub mod potential;
pub mod trajectory;
pub mod world;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use clock::FrameClock;
pub use config::RunnerConfig;
pub use coordinate::{
    Cartesian, Coordinate, Differencing, Differentiable, MutableCoordinate, Point, Polar,
    Vector1, Vector2, Vector3,
};
pub use engine::{scene_catalog, Engine, SceneInfo};
pub use error::{MechanicsError, Result};
pub use models::{Configuration, Particle, ParticleKind};
pub use potential::{ApproximatePotential, Energy, ExactPotential, Gradient, Potential};
pub use trajectory::{ClosedForm, FreeStep, PolarStep, SelfForced, Trajectory};
pub use world::{Path, World, WorldSnapshot};
