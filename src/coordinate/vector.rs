use std::ops::{Add, Div, Mul, Neg, Sub};

use nalgebra::SVector;

use super::{Coordinate, Differencing, Differentiable, MutableCoordinate, Polar};
use crate::models::Configuration;
use crate::potential::{planar_gradient, shifted_gradient, Energy};

/// Cartesian coordinate backed by a nalgebra column vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cartesian<const D: usize>(pub SVector<f64, D>);

pub type Vector1 = Cartesian<1>;
pub type Vector2 = Cartesian<2>;
pub type Vector3 = Cartesian<3>;

impl<const D: usize> Cartesian<D> {
    pub fn from_vector(v: SVector<f64, D>) -> Self {
        Self(v)
    }

    pub fn as_vector(&self) -> &SVector<f64, D> {
        &self.0
    }

    pub fn norm(&self) -> f64 {
        self.0.norm()
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.0.dot(&other.0)
    }

    pub fn normalize(&self) -> Self {
        Self(self.0.normalize())
    }
}

impl<const D: usize> From<SVector<f64, D>> for Cartesian<D> {
    fn from(v: SVector<f64, D>) -> Self {
        Self(v)
    }
}

impl<const D: usize> Coordinate for Cartesian<D> {
    const DIMENSION: usize = D;

    fn component(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    fn from_fn<F: FnMut(usize) -> f64>(mut f: F) -> Self {
        Self(SVector::<f64, D>::from_fn(|row, _| f(row)))
    }

    // Hot in every numeric step, so skip the per-component closures.
    fn add(&self, other: &Self) -> Self {
        Self(self.0 + other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        Self(self.0 - other.0)
    }

    fn scale(&self, scalar: f64) -> Self {
        Self(self.0 * scalar)
    }

    fn over(&self, scalar: f64) -> Self {
        Self(self.0 / scalar)
    }

    fn norm_squared(&self) -> f64 {
        self.0.norm_squared()
    }
}

impl<const D: usize> MutableCoordinate for Cartesian<D> {
    fn shift(&mut self, axis: usize, delta: f64) {
        self.0[axis] += delta;
    }
}

impl Differentiable for Vector1 {
    const STRATEGY: Differencing = Differencing::Shift;

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
        shifted_gradient(potential, configuration, index, time, energy, delta)
    }
}

impl Differentiable for Vector2 {
    const STRATEGY: Differencing = Differencing::Planar;

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
        planar_gradient(potential, configuration, index, time, energy, delta)
    }
}

impl Differentiable for Vector3 {
    const STRATEGY: Differencing = Differencing::Shift;

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
        shifted_gradient(potential, configuration, index, time, energy, delta)
    }
}

impl<const D: usize> Add for Cartesian<D> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl<const D: usize> Sub for Cartesian<D> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl<const D: usize> Mul<f64> for Cartesian<D> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self(self.0 * rhs)
    }
}

impl<const D: usize> Div<f64> for Cartesian<D> {
    type Output = Self;
    fn div(self, rhs: f64) -> Self {
        Self(self.0 / rhs)
    }
}

impl<const D: usize> Neg for Cartesian<D> {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl Vector1 {
    pub fn new(x: f64) -> Self {
        Self(SVector::<f64, 1>::new(x))
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }
}

impl Vector2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self(SVector::<f64, 2>::new(x, y))
    }

    pub fn from_polar(r: f64, theta: f64) -> Self {
        Self::new(r * theta.cos(), r * theta.sin())
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn r(&self) -> f64 {
        self.0.norm()
    }

    pub fn r_squared(&self) -> f64 {
        self.0.norm_squared()
    }

    pub fn theta(&self) -> f64 {
        self.y().atan2(self.x())
    }

    pub fn orthogonal(&self) -> Self {
        Self::new(-self.y(), self.x())
    }

    pub fn cross(&self, other: &Self) -> f64 {
        self.x() * other.y() - self.y() * other.x()
    }

    pub fn extend(&self, dr: f64) -> Self {
        Self::from_polar(self.r() + dr, self.theta())
    }

    pub fn rotate(&self, angle: f64) -> Self {
        Self::from_polar(self.r(), self.theta() + angle)
    }

    /// Product of the two vectors read as complex numbers.
    pub fn complex_mul(&self, other: &Self) -> Self {
        Self::new(
            self.x() * other.x() - self.y() * other.y(),
            self.x() * other.y() + self.y() * other.x(),
        )
    }

    pub fn to_polar(&self) -> Polar {
        Polar::from_cartesian(self.x(), self.y())
    }
}

impl Vector3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self(SVector::<f64, 3>::new(x, y, z))
    }
}

/// Plain tuple coordinate without an in-place shift.
///
/// Gradients against it go through the generic rebuild estimator, which makes it
/// the reference for any custom coordinate system expressed as raw components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point<const D: usize>(pub [f64; D]);

impl<const D: usize> Point<D> {
    pub fn new(values: [f64; D]) -> Self {
        Self(values)
    }
}

impl<const D: usize> Coordinate for Point<D> {
    const DIMENSION: usize = D;

    fn component(&self, axis: usize) -> f64 {
        self.0[axis]
    }

    fn from_fn<F: FnMut(usize) -> f64>(f: F) -> Self {
        Self(std::array::from_fn(f))
    }
}

impl<const D: usize> Differentiable for Point<D> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn plane_accessors() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.r(), 5.0);
        assert_eq!(v.r_squared(), 25.0);
        assert_eq!(v.orthogonal(), Vector2::new(-4.0, 3.0));
        assert_eq!(v.cross(&Vector2::new(1.0, 0.0)), -4.0);
        let i = Vector2::new(0.0, 1.0);
        assert_eq!(i.complex_mul(&i), Vector2::new(-1.0, 0.0));
        let rotated = Vector2::new(1.0, 0.0).rotate(FRAC_PI_2);
        assert!(rotated.x().abs() < 1e-12 && (rotated.y() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn shift_is_in_place() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        v.shift(2, 0.5);
        assert_eq!(v, Vector3::new(1.0, 2.0, 3.5));
    }

    #[test]
    fn operators_match_trait_methods() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(-3.0, 0.5);
        assert_eq!(a + b, Coordinate::add(&a, &b));
        assert_eq!(a - b, Coordinate::sub(&a, &b));
        assert_eq!(a * 2.0, Coordinate::scale(&a, 2.0));
        assert_eq!(a / 2.0, Coordinate::over(&a, 2.0));
        assert_eq!(-a, Coordinate::negate(&a));
    }
}
