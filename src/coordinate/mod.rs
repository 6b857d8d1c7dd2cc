//! Fixed-dimension coordinates.
//!
//! Every coordinate is a short, fixed-length tuple of reals with vector-space
//! operations. Some coordinate types additionally allow an in-place axis shift
//! ([`MutableCoordinate`]); the finite-difference gradient estimator is the only
//! code that relies on it. Which estimator a type uses is decided statically by its
//! [`Differentiable`] impl.

use std::fmt::Debug;

use crate::error::{MechanicsError, Result};
use crate::models::Configuration;
use crate::potential::{rebuilt_gradient, Energy};

pub mod polar;
pub mod vector;

pub use polar::Polar;
pub use vector::{Cartesian, Point, Vector1, Vector2, Vector3};

/// Ordered, fixed-length real tuple.
///
/// `add`, `sub`, `scale` and `over` always return a new value and never touch the
/// receiver. Implementors only have to provide component access and construction;
/// the arithmetic defaults work componentwise.
pub trait Coordinate: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Number of components, identical for every value of the type.
    const DIMENSION: usize;

    fn component(&self, axis: usize) -> f64;

    fn from_fn<F: FnMut(usize) -> f64>(f: F) -> Self;

    fn dimension(&self) -> usize {
        Self::DIMENSION
    }

    fn values(&self) -> Vec<f64> {
        (0..Self::DIMENSION).map(|axis| self.component(axis)).collect()
    }

    fn from_values(values: &[f64]) -> Result<Self> {
        if values.len() != Self::DIMENSION {
            return Err(MechanicsError::DimensionMismatch {
                expected: Self::DIMENSION,
                found: values.len(),
            });
        }
        Ok(Self::from_fn(|axis| values[axis]))
    }

    fn fill(value: f64) -> Self {
        Self::from_fn(|_| value)
    }

    fn zero() -> Self {
        Self::fill(0.0)
    }

    /// Basis vector along `axis`.
    fn unit(axis: usize) -> Self {
        Self::from_fn(|i| if i == axis { 1.0 } else { 0.0 })
    }

    fn map<F: Fn(f64, usize) -> f64>(&self, f: F) -> Self {
        Self::from_fn(|axis| f(self.component(axis), axis))
    }

    fn zip<F: Fn(f64, f64) -> f64>(&self, other: &Self, f: F) -> Self {
        Self::from_fn(|axis| f(self.component(axis), other.component(axis)))
    }

    fn reduce<T, F: FnMut(T, f64, usize) -> T>(&self, init: T, mut f: F) -> T {
        (0..Self::DIMENSION).fold(init, |acc, axis| f(acc, self.component(axis), axis))
    }

    fn add(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a + b)
    }

    fn sub(&self, other: &Self) -> Self {
        self.zip(other, |a, b| a - b)
    }

    fn scale(&self, scalar: f64) -> Self {
        self.map(|v, _| v * scalar)
    }

    fn over(&self, scalar: f64) -> Self {
        self.map(|v, _| v / scalar)
    }

    fn negate(&self) -> Self {
        self.scale(-1.0)
    }

    /// Sum of squared components.
    fn norm_squared(&self) -> f64 {
        self.reduce(0.0, |acc, v, _| acc + v * v)
    }

    fn component_sum(&self) -> f64 {
        self.reduce(0.0, |acc, v, _| acc + v)
    }
}

/// Coordinates that can be nudged along one axis in place.
///
/// Only the gradient estimator calls `shift`, and it restores the saved value before
/// anything else observes the configuration.
pub trait MutableCoordinate: Coordinate {
    fn shift(&mut self, axis: usize, delta: f64);
}

/// Finite-difference strategy a coordinate type is estimated with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Differencing {
    /// Two unrolled forward differences on x then y.
    Planar,
    /// Shift one axis in place, evaluate, restore.
    Shift,
    /// Evaluate a perturbed copy of the whole configuration.
    Rebuild,
}

/// Coordinates the forward-difference gradient can be taken against.
///
/// The default estimator copies the configuration for every axis, which works for
/// any coordinate. Types with cheaper options override [`Differentiable::gradient`].
pub trait Differentiable: Coordinate {
    const STRATEGY: Differencing = Differencing::Rebuild;

    /// `(V(x + δ·e_d) − energy) / δ` for every axis `d` of particle `index`.
    fn gradient<V>(
        potential: &V,
        configuration: &mut Configuration<Self>,
        index: usize,
        time: f64,
        energy: f64,
        delta: f64,
    ) -> Self
    where
        V: Energy<Self> + ?Sized,
    {
        rebuilt_gradient(potential, configuration, index, time, energy, delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_checks_length() {
        let err = Vector2::from_values(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, MechanicsError::DimensionMismatch { expected: 2, found: 3 });
        let v = Vector2::from_values(&[1.0, 2.0]).unwrap();
        assert_eq!(v.values(), vec![1.0, 2.0]);
    }

    #[test]
    fn unit_and_reduce() {
        let e = Vector3::unit(1);
        assert_eq!(e.values(), vec![0.0, 1.0, 0.0]);
        let total = Point::<3>::new([1.0, 2.0, 3.0]).reduce(0.0, |acc, v, i| acc + v * i as f64);
        assert_eq!(total, 8.0);
    }

    #[test]
    fn arithmetic_is_pure() {
        let a = Point::new([1.0, -2.0]);
        let b = Point::new([0.5, 0.5]);
        let sum = Coordinate::add(&a, &b);
        let scaled = a.scale(2.0);
        assert_eq!(a, Point::new([1.0, -2.0]));
        assert_eq!(sum.values(), vec![1.5, -1.5]);
        assert_eq!(scaled.values(), vec![2.0, -4.0]);
        assert_eq!(a.over(2.0).values(), vec![0.5, -1.0]);
        assert_eq!(a.negate().values(), vec![-1.0, 2.0]);
    }

    #[test]
    fn strategies_are_static() {
        assert_eq!(Vector2::STRATEGY, Differencing::Planar);
        assert_eq!(Vector1::STRATEGY, Differencing::Shift);
        assert_eq!(Polar::STRATEGY, Differencing::Shift);
        assert_eq!(Point::<2>::STRATEGY, Differencing::Rebuild);
    }
}
