use std::cell::Cell;

use serde::Serialize;

use crate::coordinate::Differentiable;
use crate::error::{MechanicsError, Result};
use crate::models::{Configuration, Particle};
use crate::potential::Potential;
use crate::trajectory::{Trajectory, DEFAULT_STEP_HINT};

/// Number of steps a single update may unroll before it is worth a warning.
pub const LARGE_UNROLL: u64 = 100_000;

/// What the last [`World::update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Path {
    /// Less than one step of time is pending; nothing moved.
    #[default]
    Idle,
    /// Every trajectory was evaluated directly at the new time.
    FastPath,
    /// Whole steps were integrated one after another.
    SteppedPath,
}

/// Energies and state of a world at one instant, flattened for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSnapshot {
    pub time: f64,
    pub potential_energy: Option<f64>,
    pub kinetic_energy: f64,
    pub total_energy: Option<f64>,
    pub masses: Vec<f64>,
    pub positions: Vec<Vec<f64>>,
    pub velocities: Vec<Vec<f64>>,
}

/// Orchestrator for a set of trajectories under one potential.
///
/// Simulated time only advances in whole steps (or, when everything is closed-form,
/// in one jump); partial steps are buffered in `leftover`, so the result depends on
/// the total elapsed time and not on how it was split across calls.
#[derive(Debug)]
pub struct World<C> {
    trajectories: Vec<Trajectory<C>>,     // законы движения, индекс = индекс частицы
    potential: Potential<C>,
    configuration: Configuration<C>,      // текущее состояние всех частиц
    time: f64,                            // модельное время
    leftover: f64,                        // накопленный остаток меньше шага
    potential_energy: Option<f64>,
    kinetic_energy: Cell<Option<f64>>,    // кэш, сбрасывается при смене конфигурации
    has_closed_form: bool,
    needs_gradients: bool,
    steps_taken: u64,
    last_path: Path,
    active_path: Option<Path>,            // последний путь, на котором что-то сдвинулось
}

impl<C: Differentiable> World<C> {
    /// `potential` is anything that converts into a [`Potential`]: an
    /// [`ExactPotential`](crate::potential::ExactPotential), an `f64` seed for an
    /// approximated one, or a bare closure wrapped with [`Potential::exact`].
    pub fn new(trajectories: Vec<Trajectory<C>>, potential: impl Into<Potential<C>>) -> Self {
        let potential = potential.into();
        let configuration: Configuration<C> = trajectories
            .iter()
            .map(|j| j.initial_particle(0.0, DEFAULT_STEP_HINT))
            .collect();
        let potential_energy = potential.initial_energy(&configuration, 0.0);

        let mut world = Self {
            trajectories,
            potential,
            configuration,
            time: 0.0,
            leftover: 0.0,
            potential_energy,
            kinetic_energy: Cell::new(None),
            has_closed_form: false,
            needs_gradients: false,
            steps_taken: 0,
            last_path: Path::Idle,
            active_path: None,
        };
        world.has_closed_form = world.trajectories.iter().all(|j| j.has_closed_form());
        world.needs_gradients = world.compute_needs_gradients();

        log::debug!(
            "world: {} trajectories, closed form = {}, approximated potential = {}",
            world.trajectories.len(),
            world.has_closed_form,
            world.potential.needs_approximating()
        );
        world
    }

    pub fn len(&self) -> usize { self.trajectories.len() }
    pub fn is_empty(&self) -> bool { self.trajectories.is_empty() }
    pub fn time(&self) -> f64 { self.time }
    pub fn leftover(&self) -> f64 { self.leftover }
    pub fn steps_taken(&self) -> u64 { self.steps_taken }
    pub fn last_path(&self) -> Path { self.last_path }
    pub fn has_closed_form(&self) -> bool { self.has_closed_form }
    pub fn potential(&self) -> &Potential<C> { &self.potential }
    pub fn trajectories(&self) -> &[Trajectory<C>] { &self.trajectories }
    pub fn configuration(&self) -> &Configuration<C> { &self.configuration }

    /// Current particles, index-aligned with [`World::trajectories`].
    pub fn particles(&self) -> Vec<Particle<C>> {
        self.configuration.to_particles()
    }

    /// Whether an update may jump straight to the new time.
    pub fn uses_fast_path(&self) -> bool {
        self.has_closed_form && !self.potential.needs_approximating()
    }

    /// Cached potential energy; `None` when the world has no potential.
    pub fn potential_energy(&self) -> Option<f64> {
        self.potential_energy
    }

    pub fn kinetic_energy(&self) -> f64 {
        if let Some(t) = self.kinetic_energy.get() {
            return t;
        }
        let t = self.configuration.kinetic_energy();
        self.kinetic_energy.set(Some(t));
        t
    }

    pub fn total_energy(&self) -> Option<f64> {
        self.potential_energy.map(|v| v + self.kinetic_energy())
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            potential_energy: self.potential_energy(),
            kinetic_energy: self.kinetic_energy(),
            total_energy: self.total_energy(),
            masses: self.configuration.masses().to_vec(),
            positions: self.configuration.positions().iter().map(|q| q.values()).collect(),
            velocities: self.configuration.velocities().iter().map(|v| v.values()).collect(),
        }
    }

    /// Appends a trajectory whose particle joins at the world's current time.
    pub fn add_trajectory(&mut self, trajectory: impl Into<Trajectory<C>>) {
        let trajectory = trajectory.into();
        let was_fast = self.uses_fast_path();

        self.configuration.push(trajectory.initial_particle(self.time, DEFAULT_STEP_HINT));
        self.has_closed_form = self.has_closed_form && trajectory.has_closed_form();
        self.trajectories.push(trajectory);
        self.needs_gradients = self.compute_needs_gradients();
        self.kinetic_energy.set(None);
        if let Some(v) = self.potential.at(&self.configuration, self.time) {
            self.potential_energy = Some(v);
        }

        if was_fast && !self.uses_fast_path() {
            log::debug!("world: trajectory {} has no closed form, stepping from now on", self.len() - 1);
        }
    }

    /// Advances the world by `elapsed` seconds of simulated time in steps of
    /// `step_size`. `elapsed` may be negative to run backwards.
    pub fn update(&mut self, elapsed: f64, step_size: f64) -> Result<Path> {
        if !(step_size.is_finite() && step_size > 0.0) {
            return Err(MechanicsError::InvalidStepSize(step_size));
        }
        if !elapsed.is_finite() {
            return Err(MechanicsError::InvalidElapsed(elapsed));
        }
        if self.potential.needs_approximating() && self.trajectories.iter().any(|j| j.needs_gradient()) {
            // Силы из приближённой энергии не получить.
            return Err(MechanicsError::UnsupportedGradient);
        }

        let pending = self.leftover + elapsed;
        if pending.abs() < step_size {
            // Not enough time has passed to take a step yet.
            self.leftover = pending;
            self.last_path = Path::Idle;
            return Ok(Path::Idle);
        }

        if self.uses_fast_path() {
            self.leftover = 0.0;
            self.time += pending;
            let time = self.time;
            self.configuration = self
                .trajectories
                .iter()
                .map(|j| j.initial_particle(time, step_size))
                .collect();
            self.potential_energy = self.potential.at(&self.configuration, time);
            self.kinetic_energy.set(None);
            return Ok(self.settle(Path::FastPath));
        }

        let whole = (pending.abs() / step_size).floor() as u64;
        let delta = pending.signum() * step_size;
        self.leftover = pending - whole as f64 * delta;
        let end_time = self.time + pending - self.leftover;

        if whole > LARGE_UNROLL {
            log::warn!("world: unrolling {} steps in one update; clamp the elapsed time", whole);
        }
        log::trace!("world: {} steps of {} from t = {}", whole, delta, self.time);

        for _ in 0..whole {
            self.step(delta, step_size);
        }
        // Repeated small increments drift; land exactly on the accounted time.
        self.time = end_time;
        Ok(self.settle(Path::SteppedPath))
    }

    fn settle(&mut self, path: Path) -> Path {
        if self.active_path != Some(path) {
            log::debug!("world: {:?} -> {:?} at t = {}", self.active_path, path, self.time);
            self.active_path = Some(path);
        }
        self.last_path = path;
        path
    }

    // Порядок действий важен: градиент берётся в текущей конфигурации и в текущий
    // момент, и только потом сдвигается время.
    fn step(&mut self, delta: f64, step_size: f64) {
        let gradients = self.gradients(delta);
        self.time += delta;
        let next = self.next_configuration(delta, step_size, &gradients);
        self.potential_energy =
            self.potential
                .next_energy(self.potential_energy, &self.configuration, &next, self.time);
        self.kinetic_energy.set(None);
        self.configuration = next;
        self.steps_taken += 1;
    }

    fn compute_needs_gradients(&self) -> bool {
        self.potential.exerts_forces() && self.trajectories.iter().any(|j| j.needs_gradient())
    }

    fn gradients(&mut self, delta: f64) -> Vec<Option<C>> {
        let n = self.trajectories.len();
        if !self.needs_gradients {
            return vec![None; n];
        }
        let Potential::Exact(potential) = &self.potential else {
            return vec![None; n];
        };
        let time = self.time;
        let energy = match self.potential_energy {
            Some(v) => v,
            None => potential.at(&self.configuration, time),
        };
        let mut gradient = potential.delta(&mut self.configuration, time, energy);
        self.trajectories
            .iter()
            .enumerate()
            .map(|(i, j)| j.needs_gradient().then(|| gradient.at(i, delta)))
            .collect()
    }

    fn next_configuration(
        &self,
        delta: f64,
        step_size: f64,
        gradients: &[Option<C>],
    ) -> Configuration<C> {
        let time = self.time;
        let configuration = &self.configuration;
        let advance = |(i, j): (usize, &Trajectory<C>)| {
            j.advance(&configuration.particle(i), delta, gradients[i].as_ref(), time, step_size)
        };

        #[cfg(feature = "parallel")]
        let next: Vec<Particle<C>> = {
            use rayon::prelude::*;
            self.trajectories.par_iter().enumerate().map(advance).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let next: Vec<Particle<C>> = self.trajectories.iter().enumerate().map(advance).collect();

        next.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinate::Vector1;
    use crate::trajectory::{ClosedForm, FreeStep};

    fn drifting() -> World<Vector1> {
        World::new(
            vec![FreeStep::new(1.0, Vector1::new(0.0), Vector1::new(1.0)).into()],
            Potential::exact(|_: &Configuration<Vector1>, _| 0.0),
        )
    }

    #[test]
    fn partial_steps_are_buffered() {
        let mut w = drifting();
        assert_eq!(w.update(0.04, 0.1).unwrap(), Path::Idle);
        assert_eq!(w.time(), 0.0);
        assert_eq!(w.leftover(), 0.04);
        assert_eq!(w.update(0.07, 0.1).unwrap(), Path::SteppedPath);
        assert_eq!(w.steps_taken(), 1);
        assert!((w.leftover() - 0.01).abs() < 1e-12);
        assert!((w.time() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn negative_time_runs_backwards() {
        let mut w = drifting();
        w.update(-0.35, 0.1).unwrap();
        assert_eq!(w.steps_taken(), 3);
        assert!((w.time() + 0.3).abs() < 1e-12);
        assert!((w.leftover() + 0.05).abs() < 1e-12);
        assert!((w.particles()[0].position().x() + 0.3).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_step_sizes() {
        let mut w = drifting();
        assert_eq!(w.update(1.0, 0.0), Err(MechanicsError::InvalidStepSize(0.0)));
        assert_eq!(w.update(1.0, -0.1), Err(MechanicsError::InvalidStepSize(-0.1)));
        assert!(matches!(w.update(f64::NAN, 0.1), Err(MechanicsError::InvalidElapsed(_))));
        assert_eq!(w.time(), 0.0);
    }

    #[test]
    fn stepping_lands_exactly_on_the_accounted_time() {
        let mut w = drifting();
        assert_eq!(w.update(1.0, 0.1).unwrap(), Path::SteppedPath);
        assert_eq!(w.steps_taken(), 10);
        assert_eq!(w.time(), 1.0);
        assert_eq!(w.leftover(), 0.0);
    }

    #[test]
    fn approximated_potential_cannot_drive_free_steps() {
        let mut w = World::new(
            vec![FreeStep::new(1.0, Vector1::new(0.0), Vector1::new(1.0)).into()],
            5.0,
        );
        assert_eq!(w.update(1.0, 0.25), Err(MechanicsError::UnsupportedGradient));
        assert_eq!(w.time(), 0.0);
        assert_eq!(w.leftover(), 0.0);
        assert_eq!(w.steps_taken(), 0);
        assert_eq!(*w.particles()[0].position(), Vector1::new(0.0));
    }

    #[test]
    fn closed_world_jumps() {
        let mut w = World::new(
            vec![ClosedForm::linear(1.0, Vector1::new(0.0), Vector1::new(2.0)).into()],
            Potential::default(),
        );
        assert!(w.uses_fast_path());
        assert_eq!(w.update(12.345, 0.01).unwrap(), Path::FastPath);
        assert_eq!(w.steps_taken(), 0);
        assert_eq!(w.leftover(), 0.0);
        assert_eq!(w.time(), 12.345);
        assert_eq!(w.potential_energy(), None);
        assert_eq!(w.total_energy(), None);
        assert_eq!(w.kinetic_energy(), 2.0);
    }
}
