use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::Activation;

/// One fully connected layer: `activation(W·x + b)`.
///
/// `weights` is stored row-major with one row of `inputs` weights per output unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Layer {
    pub(crate) inputs: usize,
    pub(crate) outputs: usize,
    pub(crate) activation: Activation,
    pub(crate) weights: Vec<f32>,
    pub(crate) biases: Vec<f32>,
}

impl Layer {
    /// Weights drawn from `N(0, 1/inputs)`, biases zero.
    pub(crate) fn random<R>(inputs: usize, outputs: usize, activation: Activation, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let std_dev = (inputs as f32).sqrt().recip();
        let weights = (0..inputs * outputs)
            .map(|_| rng.sample::<f32, _>(StandardNormal) * std_dev)
            .collect();
        Self {
            inputs,
            outputs,
            activation,
            weights,
            biases: vec![0.0; outputs],
        }
    }

    pub(crate) fn filled(inputs: usize, outputs: usize, activation: Activation, value: f32) -> Self {
        Self {
            inputs,
            outputs,
            activation,
            weights: vec![value; inputs * outputs],
            biases: vec![value; outputs],
        }
    }

    pub(crate) fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }

    pub(crate) fn forward(&self, input: &[f32]) -> Vec<f32> {
        debug_assert_eq!(input.len(), self.inputs);
        self.weights
            .chunks_exact(self.inputs)
            .zip(&self.biases)
            .map(|(row, bias)| {
                let z = row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>() + bias;
                self.activation.apply(z)
            })
            .collect()
    }

    /// Applies one gradient-descent step given `delta`, the loss gradient with respect
    /// to this layer's pre-activation sums.
    ///
    /// When `propagate` is set, returns the loss gradient with respect to `input`,
    /// computed from the weights as they were before the update. Output units whose
    /// delta is exactly zero contribute nothing and are skipped.
    pub(crate) fn backward(
        &mut self,
        input: &[f32],
        delta: &[f32],
        learning_rate: f32,
        propagate: bool,
    ) -> Option<Vec<f32>> {
        debug_assert_eq!(input.len(), self.inputs);
        debug_assert_eq!(delta.len(), self.outputs);

        let mut input_grad = propagate.then(|| vec![0.0; self.inputs]);
        for ((row, bias), &d) in self
            .weights
            .chunks_exact_mut(self.inputs)
            .zip(&mut self.biases)
            .zip(delta)
        {
            if d == 0.0 {
                continue;
            }
            if let Some(grad) = &mut input_grad {
                for (g, w) in grad.iter_mut().zip(row.iter()) {
                    *g += w * d;
                }
            }
            let step = learning_rate * d;
            for (w, x) in row.iter_mut().zip(input) {
                *w -= step * x;
            }
            *bias -= step;
        }
        input_grad
    }

    pub(crate) fn check_shape(&self, index: usize) -> Result<(), String> {
        if self.inputs == 0 || self.outputs == 0 {
            return Err(format!("layer {index} has an empty dimension"));
        }
        let Some(expected) = self.inputs.checked_mul(self.outputs) else {
            return Err(format!(
                "layer {index} is too large ({}x{})",
                self.outputs, self.inputs
            ));
        };
        if self.weights.len() != expected {
            return Err(format!(
                "layer {index} has {} weights, expected {}x{}",
                self.weights.len(),
                self.outputs,
                self.inputs
            ));
        }
        if self.biases.len() != self.outputs {
            return Err(format!(
                "layer {index} has {} biases, expected {}",
                self.biases.len(),
                self.outputs
            ));
        }
        if !self.weights.iter().chain(&self.biases).all(|v| v.is_finite()) {
            return Err(format!("layer {index} contains non-finite parameters"));
        }
        Ok(())
    }
}
