use serde::{Deserialize, Serialize};

/// Bounded, differentiable nonlinearity applied after each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// `1 / (1 + e^-x)`, range (0, 1).
    #[default]
    Sigmoid,
    /// `tanh(x)`, range (-1, 1).
    Tanh,
}

impl Activation {
    #[must_use]
    pub fn apply(self, x: f32) -> f32 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
        }
    }

    /// Derivative expressed in terms of the activation's output `y`.
    #[must_use]
    pub fn derivative(self, y: f32) -> f32 {
        match self {
            Activation::Sigmoid => y * (1.0 - y),
            Activation::Tanh => 1.0 - y * y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_at_zero() {
        assert!((Activation::Sigmoid.apply(0.0) - 0.5).abs() < 1e-7);
        assert!(Activation::Tanh.apply(0.0).abs() < 1e-7);
        assert!((Activation::Sigmoid.derivative(0.5) - 0.25).abs() < 1e-7);
        assert!((Activation::Tanh.derivative(0.0) - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_derivative_matches_finite_difference() {
        let h = 1e-3;
        for activation in [Activation::Sigmoid, Activation::Tanh] {
            for x in [-2.0_f32, -0.3, 0.0, 0.7, 1.5] {
                let numeric = (activation.apply(x + h) - activation.apply(x - h)) / (2.0 * h);
                let analytic = activation.derivative(activation.apply(x));
                assert!(
                    (numeric - analytic).abs() < 1e-3,
                    "{activation:?} at {x}: {numeric} vs {analytic}"
                );
            }
        }
    }

    #[test]
    fn test_bounded() {
        for x in [-50.0_f32, 50.0] {
            let s = Activation::Sigmoid.apply(x);
            assert!((0.0..=1.0).contains(&s));
            let t = Activation::Tanh.apply(x);
            assert!((-1.0..=1.0).contains(&t));
        }
    }
}
