//! Forward-difference gradient estimators.
//!
//! All three return `(V(x + δ·e_d) − energy) / δ` per axis `d`, where `energy` is the
//! potential of the unperturbed configuration. They differ only in how the perturbed
//! configuration is produced, and agree as δ → 0.

use crate::coordinate::{Coordinate, MutableCoordinate, Vector2};
use crate::models::Configuration;

use super::Energy;

/// Two unrolled differences on the x then y column of a planar configuration.
pub fn planar_gradient<V>(
    potential: &V,
    configuration: &mut Configuration<Vector2>,
    index: usize,
    time: f64,
    energy: f64,
    delta: f64,
) -> Vector2
where
    V: Energy<Vector2> + ?Sized,
{
    let saved = *configuration.position_mut(index);

    configuration.position_mut(index).0[0] += delta;
    let d_x = potential.energy(configuration, time) - energy;
    *configuration.position_mut(index) = saved;

    configuration.position_mut(index).0[1] += delta;
    let d_y = potential.energy(configuration, time) - energy;
    *configuration.position_mut(index) = saved;

    Vector2::new(d_x / delta, d_y / delta)
}

/// Shifts one axis of the particle's position in place per evaluation.
pub fn shifted_gradient<C, V>(
    potential: &V,
    configuration: &mut Configuration<C>,
    index: usize,
    time: f64,
    energy: f64,
    delta: f64,
) -> C
where
    C: MutableCoordinate,
    V: Energy<C> + ?Sized,
{
    let saved = *configuration.position_mut(index);
    let mut differences = Vec::with_capacity(C::DIMENSION);
    for axis in 0..C::DIMENSION {
        configuration.position_mut(index).shift(axis, delta);
        differences.push((potential.energy(configuration, time) - energy) / delta);
        // (x + δ) − δ is not always x, so restore the saved copy
        *configuration.position_mut(index) = saved;
    }
    C::from_fn(|axis| differences[axis])
}

/// Evaluates a perturbed copy of the whole configuration for every axis.
pub fn rebuilt_gradient<C, V>(
    potential: &V,
    configuration: &Configuration<C>,
    index: usize,
    time: f64,
    energy: f64,
    delta: f64,
) -> C
where
    C: Coordinate,
    V: Energy<C> + ?Sized,
{
    let particle = configuration.particle(index);
    let differences: Vec<f64> = (0..C::DIMENSION)
        .map(|axis| {
            let mut perturbed = configuration.clone();
            perturbed.set(index, particle.perturb(&C::unit(axis).scale(delta), None));
            (potential.energy(&perturbed, time) - energy) / delta
        })
        .collect();
    C::from_fn(|axis| differences[axis])
}
