use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::{Coordinate, Differencing, Differentiable, MutableCoordinate, Vector2};
use crate::models::Configuration;
use crate::potential::{shifted_gradient, Energy};

/// Plane coordinate stored as (r, θ).
///
/// The [`Coordinate`] arithmetic (`add`, `sub`, `scale`, `over`) works directly on
/// the raw (r, θ) pair, which is what velocities and step increments expressed in the
/// polar basis need. It is *not* complex arithmetic: use [`Polar::complex_mul`] and
/// [`Polar::complex_add`] to combine points of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Polar {
    r: f64,
    theta: f64,
}

impl Polar {
    pub const ZERO: Polar = Polar { r: 0.0, theta: 0.0 };
    pub const ONE: Polar = Polar { r: 1.0, theta: 0.0 };
    pub const I: Polar = Polar { r: 1.0, theta: PI / 2.0 };

    pub fn new(r: f64, theta: f64) -> Self {
        Self { r, theta }
    }

    pub fn from_cartesian(x: f64, y: f64) -> Self {
        Self::new((x * x + y * y).sqrt(), y.atan2(x))
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn theta(&self) -> f64 {
        self.theta
    }

    pub fn r_squared(&self) -> f64 {
        self.r * self.r
    }

    pub fn x(&self) -> f64 {
        self.r * self.theta.cos()
    }

    pub fn y(&self) -> f64 {
        self.r * self.theta.sin()
    }

    pub fn to_cartesian(&self) -> Vector2 {
        Vector2::new(self.x(), self.y())
    }

    pub fn orthogonal(&self) -> Self {
        Self::new(self.r, self.theta + TAU / 4.0)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.r, -self.theta)
    }

    pub fn extend(&self, dr: f64) -> Self {
        Self::new(self.r + dr, self.theta)
    }

    pub fn rotate(&self, angle: f64) -> Self {
        Self::new(self.r, self.theta + angle)
    }

    pub fn complex_mul(&self, other: &Self) -> Self {
        Self::new(self.r * other.r, self.theta + other.theta)
    }

    pub fn complex_add(&self, other: &Self) -> Self {
        Self::from_cartesian(self.x() + other.x(), self.y() + other.y())
    }

    /// Same point with a non-negative radius and θ reduced modulo a full turn.
    pub fn standard_form(&self) -> Self {
        if self.r < 0.0 {
            Self::new(-self.r, (self.theta + PI) % TAU)
        } else {
            Self::new(self.r, self.theta % TAU)
        }
    }

    /// Copy with θ wrapped into `[0, 2π)`.
    pub fn wrapped(&self) -> Self {
        Self::new(self.r, wrap_angle(self.theta))
    }
}

/// Wraps an angle into `[0, 2π)`.
pub fn wrap_angle(theta: f64) -> f64 {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid rounds tiny negative angles up to exactly TAU
    if wrapped >= TAU { 0.0 } else { wrapped }
}

impl Coordinate for Polar {
    const DIMENSION: usize = 2;

    fn component(&self, axis: usize) -> f64 {
        match axis {
            0 => self.r,
            _ => self.theta,
        }
    }

    fn from_fn<F: FnMut(usize) -> f64>(mut f: F) -> Self {
        let r = f(0);
        let theta = f(1);
        Self { r, theta }
    }
}

impl MutableCoordinate for Polar {
    fn shift(&mut self, axis: usize, delta: f64) {
        if axis == 0 {
            self.r += delta;
        } else {
            self.theta += delta;
        }
    }
}

impl Differentiable for Polar {
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
