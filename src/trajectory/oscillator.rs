/// `a·cos(ωt) + b·sin(ωt)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicOscillator {
    pub a: f64,
    pub b: f64,
    pub frequency: f64,
}

impl HarmonicOscillator {
    pub fn new(a: f64, b: f64, frequency: f64) -> Self {
        Self { a, b, frequency }
    }

    /// Oscillator passing through `x0` with rate `v0` at t = 0.
    pub fn from_initial(x0: f64, v0: f64, frequency: f64) -> Self {
        Self::new(x0, v0 / frequency, frequency)
    }

    pub fn at(&self, t: f64) -> f64 {
        let (sin, cos) = (self.frequency * t).sin_cos();
        self.a * cos + self.b * sin
    }

    pub fn derivative(&self) -> Self {
        Self::new(self.frequency * self.b, -self.frequency * self.a, self.frequency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivative_matches_difference() {
        let h = HarmonicOscillator::from_initial(2.0, -1.5, 3.0);
        assert_eq!(h.at(0.0), 2.0);
        assert!((h.derivative().at(0.0) + 1.5).abs() < 1e-12);

        let t = 0.7;
        let eps = 1e-6;
        let numeric = (h.at(t + eps) - h.at(t - eps)) / (2.0 * eps);
        assert!((numeric - h.derivative().at(t)).abs() < 1e-6);
    }
}
