use crate::clock::FrameClock;
use crate::config::RunnerConfig;
use crate::coordinate::{Polar, Vector2};
use crate::error::{MechanicsError, Result};
use crate::potential::{ExactPotential, HarmonicWell, Potential, UniformGravity};
use crate::trajectory::{ClosedForm, PolarStep, SelfForced, Trajectory};
use crate::world::{Path, World, WorldSnapshot};

pub const SCENE_FREE_DRIFT: &str = "free-drift";
pub const SCENE_OSCILLATOR_CLOSED: &str = "oscillator-closed";
pub const SCENE_OSCILLATOR_STEPPED: &str = "oscillator-stepped";
pub const SCENE_POLAR_SPRING: &str = "polar-spring";
pub const SCENE_PENDULUM: &str = "pendulum";

pub const DEMO_STIFFNESS: f64 = 1.0;
pub const DEMO_GRAVITY: f64 = -9.8;

pub struct SceneInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// `"cartesian"` or `"polar"`; positions are always reported in Cartesian.
    pub coordinates: &'static str,
}

pub fn scene_catalog() -> &'static [SceneInfo] {
    &[
        SceneInfo {
            id: SCENE_FREE_DRIFT,
            name: "Free drift",
            description: "Force-free particles on straight lines, evaluated in closed form.",
            coordinates: "cartesian",
        },
        SceneInfo {
            id: SCENE_OSCILLATOR_CLOSED,
            name: "Oscillator (closed form)",
            description: "Particles in a harmonic well, evaluated analytically at any time.",
            coordinates: "cartesian",
        },
        SceneInfo {
            id: SCENE_OSCILLATOR_STEPPED,
            name: "Oscillator (stepped)",
            description: "The same well integrated step by step from finite-difference forces.",
            coordinates: "cartesian",
        },
        SceneInfo {
            id: SCENE_POLAR_SPRING,
            name: "Polar spring",
            description: "Orbits in a harmonic well integrated on (r, θ) with curvature terms.",
            coordinates: "polar",
        },
        SceneInfo {
            id: SCENE_PENDULUM,
            name: "Pendulum",
            description: "Rigid pendulum released from the horizontal under uniform gravity.",
            coordinates: "polar",
        },
    ]
}

enum WorldKind {
    Planar(World<Vector2>),
    Polar(World<Polar>),
}

/// A built-in world driven by frame timestamps.
pub struct Engine {
    scene_id: &'static str,
    world: WorldKind,
    config: RunnerConfig,
    clock: Option<FrameClock>,
    paused: bool,
}

impl Engine {
    pub fn new_builtin(scene_id: &str) -> Result<Self> {
        let scene_id = normalize_scene_id(scene_id)
            .ok_or_else(|| MechanicsError::UnknownScene(scene_id.to_string()))?;
        let world = build_scene(scene_id)?;
        log::debug!("engine: built scene '{}'", scene_id);
        Ok(Self {
            scene_id,
            world,
            config: RunnerConfig::default(),
            clock: None,
            paused: false,
        })
    }

    pub fn with_config(mut self, config: RunnerConfig) -> Result<Self> {
        self.set_config(config)?;
        Ok(self)
    }

    pub fn scene_id(&self) -> &'static str { self.scene_id }
    pub fn config(&self) -> &RunnerConfig { &self.config }
    pub fn is_paused(&self) -> bool { self.paused }
    pub fn set_paused(&mut self, paused: bool) { self.paused = paused; }

    pub fn set_config(&mut self, config: RunnerConfig) -> Result<()> {
        config.validate()?;
        if let Some(clock) = &mut self.clock {
            clock.set_max_time_skip(config.max_time_skip);
        }
        self.config = config;
        Ok(())
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<()> {
        self.set_config(RunnerConfig { speed, ..self.config })
    }

    pub fn set_steps_per_second(&mut self, steps_per_second: f64) -> Result<()> {
        self.set_config(RunnerConfig { steps_per_second, ..self.config })
    }

    /// Accounts one animation frame at `now_ms` and advances the world by the clamped
    /// wall time times the speed. The first frame only starts the clock.
    pub fn frame(&mut self, now_ms: f64) -> Result<Path> {
        if self.clock.is_none() {
            self.clock = Some(FrameClock::with_max_time_skip(now_ms, self.config.max_time_skip));
            return Ok(Path::Idle);
        }
        let Some(clock) = self.clock.as_mut() else {
            return Ok(Path::Idle);
        };

        if self.paused {
            if !clock.is_paused() {
                clock.pause(now_ms);
            }
            return Ok(Path::Idle);
        }
        if clock.is_paused() {
            clock.unpause(now_ms);
        } else {
            clock.update(now_ms);
        }

        let delta = clock.delta();
        if self.config.speed == 0.0 || delta <= 0.0 {
            return Ok(Path::Idle);
        }
        self.advance(delta * self.config.speed, self.config.step_size())
    }

    pub fn advance(&mut self, elapsed: f64, step_size: f64) -> Result<Path> {
        match &mut self.world {
            WorldKind::Planar(world) => world.update(elapsed, step_size),
            WorldKind::Polar(world) => world.update(elapsed, step_size),
        }
    }

    pub fn len(&self) -> usize {
        match &self.world {
            WorldKind::Planar(world) => world.len(),
            WorldKind::Polar(world) => world.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn time(&self) -> f64 {
        match &self.world {
            WorldKind::Planar(world) => world.time(),
            WorldKind::Polar(world) => world.time(),
        }
    }

    pub fn steps_taken(&self) -> u64 {
        match &self.world {
            WorldKind::Planar(world) => world.steps_taken(),
            WorldKind::Polar(world) => world.steps_taken(),
        }
    }

    pub fn potential_energy(&self) -> Option<f64> {
        match &self.world {
            WorldKind::Planar(world) => world.potential_energy(),
            WorldKind::Polar(world) => world.potential_energy(),
        }
    }

    pub fn kinetic_energy(&self) -> f64 {
        match &self.world {
            WorldKind::Planar(world) => world.kinetic_energy(),
            WorldKind::Polar(world) => world.kinetic_energy(),
        }
    }

    pub fn total_energy(&self) -> Option<f64> {
        match &self.world {
            WorldKind::Planar(world) => world.total_energy(),
            WorldKind::Polar(world) => world.total_energy(),
        }
    }

    /// `[x0, y0, x1, y1, ...]` in the Cartesian plane, whatever the scene's coordinates.
    pub fn positions_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 2);
        match &self.world {
            WorldKind::Planar(world) => {
                for p in world.configuration().positions() {
                    out.push(p.x() as f32);
                    out.push(p.y() as f32);
                }
            }
            WorldKind::Polar(world) => {
                for p in world.configuration().positions() {
                    out.push(p.x() as f32);
                    out.push(p.y() as f32);
                }
            }
        }
        out
    }

    /// Cartesian velocities, laid out like [`Engine::positions_flat`].
    pub fn velocities_flat(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.len() * 2);
        match &self.world {
            WorldKind::Planar(world) => {
                for v in world.configuration().velocities() {
                    out.push(v.x() as f32);
                    out.push(v.y() as f32);
                }
            }
            WorldKind::Polar(world) => {
                for particle in world.configuration().iter() {
                    let v = particle.to_cartesian();
                    out.push(v.velocity().x() as f32);
                    out.push(v.velocity().y() as f32);
                }
            }
        }
        out
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        match &self.world {
            WorldKind::Planar(world) => world.snapshot(),
            WorldKind::Polar(world) => world.snapshot(),
        }
    }
}

fn normalize_scene_id(id: &str) -> Option<&'static str> {
    match id {
        SCENE_FREE_DRIFT => Some(SCENE_FREE_DRIFT),
        SCENE_OSCILLATOR_CLOSED => Some(SCENE_OSCILLATOR_CLOSED),
        SCENE_OSCILLATOR_STEPPED => Some(SCENE_OSCILLATOR_STEPPED),
        SCENE_POLAR_SPRING => Some(SCENE_POLAR_SPRING),
        SCENE_PENDULUM => Some(SCENE_PENDULUM),
        _ => None,
    }
}

/// Starting states shared by both oscillator scenes.
fn oscillator_starts() -> [(f64, Vector2, Vector2); 3] {
    [
        (1.0, Vector2::new(1.0, 0.0), Vector2::new(0.0, 1.0)),
        (2.0, Vector2::new(0.0, -2.0), Vector2::new(0.5, 0.0)),
        (0.5, Vector2::new(-1.5, 1.5), Vector2::new(0.0, 0.0)),
    ]
}

fn build_scene(scene_id: &'static str) -> Result<WorldKind> {
    match scene_id {
        SCENE_FREE_DRIFT => {
            let trajectories: Vec<Trajectory<Vector2>> = (0..5)
                .map(|i| {
                    let angle = i as f64 * std::f64::consts::TAU / 5.0;
                    ClosedForm::linear(1.0, Vector2::new(0.0, 0.0), Vector2::from_polar(1.0, angle)).into()
                })
                .collect();
            Ok(WorldKind::Planar(World::new(trajectories, Potential::default())))
        }
        SCENE_OSCILLATOR_CLOSED | SCENE_OSCILLATOR_STEPPED => {
            let stepped = scene_id == SCENE_OSCILLATOR_STEPPED;
            let trajectories: Vec<Trajectory<Vector2>> = oscillator_starts()
                .into_iter()
                .map(|(mass, x0, v0)| {
                    let closed = ClosedForm::oscillating(mass, DEMO_STIFFNESS, x0, v0);
                    if stepped {
                        closed.approximate_form().into()
                    } else {
                        closed.into()
                    }
                })
                .collect();
            let well = ExactPotential::new(HarmonicWell { stiffness: DEMO_STIFFNESS });
            Ok(WorldKind::Planar(World::new(trajectories, well)))
        }
        SCENE_POLAR_SPRING => {
            // Circular orbit needs v_θ² = k/m at any radius; the rest are eccentric.
            let trajectories: Vec<Trajectory<Polar>> = vec![
                PolarStep::new(1.0, Polar::new(1.0, 0.0), Polar::new(0.0, 1.0)).into(),
                PolarStep::new(1.0, Polar::new(2.0, 1.0), Polar::new(0.0, 0.5)).into(),
                PolarStep::new(2.0, Polar::new(1.5, 3.0), Polar::new(0.3, 0.4)).into(),
            ];
            let well = ExactPotential::new(HarmonicWell { stiffness: DEMO_STIFFNESS });
            Ok(WorldKind::Polar(World::new(trajectories, well)))
        }
        SCENE_PENDULUM => {
            let trajectories: Vec<Trajectory<Polar>> = vec![SelfForced::pendulum(DEMO_GRAVITY, 1.0, 1.0, 0.0, 0.0).into()];
            // Only reports the energy; the pendulum carries its own force law.
            let gravity = ExactPotential::new(UniformGravity { gravity: DEMO_GRAVITY });
            Ok(WorldKind::Polar(World::new(trajectories, gravity)))
        }
        _ => Err(MechanicsError::UnknownScene(scene_id.to_string())),
    }
}
