use gomoku_engine::{Board, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{Activation, layer::Layer};

/// Shape of the hidden part of the network.
///
/// Input and output widths are not configurable: both equal the number of board cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainParams {
    pub hidden_layers: usize,
    pub hidden_neurons: usize,
    pub hidden_activation: Activation,
    /// Tanh by default so that targets in `[-1, 1]` are reachable.
    pub output_activation: Activation,
}

impl Default for BrainParams {
    fn default() -> Self {
        Self {
            hidden_layers: 2,
            hidden_neurons: 512,
            hidden_activation: Activation::Sigmoid,
            output_activation: Activation::Tanh,
        }
    }
}

impl BrainParams {
    /// `(inputs, outputs, activation)` of each layer for a board with `cells` cells.
    fn layer_shapes(&self, cells: usize) -> Vec<(usize, usize, Activation)> {
        assert!(
            self.hidden_layers == 0 || self.hidden_neurons > 0,
            "hidden layers need at least one neuron"
        );
        let mut shapes = Vec::with_capacity(self.hidden_layers + 1);
        let mut inputs = cells;
        for _ in 0..self.hidden_layers {
            shapes.push((inputs, self.hidden_neurons, self.hidden_activation));
            inputs = self.hidden_neurons;
        }
        shapes.push((inputs, cells, self.output_activation));
        shapes
    }
}

/// Feed-forward network scoring every cell of a `rows × cols` board.
///
/// Parameters are owned here and change only through [`Self::train_one`].
#[derive(Debug, Clone, PartialEq)]
pub struct Brain {
    pub(crate) rows: usize,
    pub(crate) cols: usize,
    pub(crate) layers: Vec<Layer>,
}

impl Brain {
    /// Creates a network with randomly initialized weights and zero biases.
    #[must_use]
    pub fn random<R>(rows: usize, cols: usize, params: &BrainParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let layers = params
            .layer_shapes(rows * cols)
            .into_iter()
            .map(|(inputs, outputs, activation)| Layer::random(inputs, outputs, activation, rng))
            .collect();
        Self { rows, cols, layers }
    }

    /// Creates a network whose every weight and bias equals `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, params: &BrainParams, value: f32) -> Self {
        let layers = params
            .layer_shapes(rows * cols)
            .into_iter()
            .map(|(inputs, outputs, activation)| Layer::filled(inputs, outputs, activation, value))
            .collect();
        Self { rows, cols, layers }
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of layers including the output layer.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Scores every cell of `board`, in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if the board dimensions differ from the network's.
    #[must_use]
    pub fn activate(&self, board: &Board) -> Vec<f32> {
        self.check_board(board);
        let input: Vec<f32> = board.input_values().collect();
        self.forward(&input)
    }

    /// Runs the network on a raw input vector.
    #[must_use]
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.rows * self.cols, "input width mismatch");
        self.layers
            .iter()
            .fold(input.to_vec(), |x, layer| layer.forward(&x))
    }

    /// Pulls the score of `action` on `board` towards `target`.
    ///
    /// Each of the `iterations` steps runs a forward pass, takes the squared error at the
    /// single output unit for `action`, backpropagates it through every layer and moves
    /// all weights and biases by `learning_rate × gradient`. Other output units get no
    /// error signal of their own.
    ///
    /// # Panics
    ///
    /// Panics if the board dimensions differ from the network's or `action` is off the
    /// board.
    pub fn train_one(
        &mut self,
        board: &Board,
        action: Position,
        target: f32,
        learning_rate: f32,
        iterations: usize,
    ) {
        self.check_board(board);
        let unit = board.index_of(action);
        let input: Vec<f32> = board.input_values().collect();

        for _ in 0..iterations {
            let trace = self.forward_trace(&input);
            let output = trace[self.layers.len()][unit];
            let Some(last) = self.layers.last() else {
                return;
            };

            let mut delta = vec![0.0; last.outputs];
            delta[unit] = (output - target) * last.activation.derivative(output);

            for index in (0..self.layers.len()).rev() {
                let upstream =
                    self.layers[index].backward(&trace[index], &delta, learning_rate, index > 0);
                if let Some(mut grad) = upstream {
                    let activation = self.layers[index - 1].activation;
                    for (g, &y) in grad.iter_mut().zip(&trace[index]) {
                        *g *= activation.derivative(y);
                    }
                    delta = grad;
                }
            }
        }
    }

    /// Outputs of every layer, preceded by the input itself.
    fn forward_trace(&self, input: &[f32]) -> Vec<Vec<f32>> {
        let mut trace = Vec::with_capacity(self.layers.len() + 1);
        trace.push(input.to_vec());
        for layer in &self.layers {
            let next = layer.forward(&trace[trace.len() - 1]);
            trace.push(next);
        }
        trace
    }

    fn check_board(&self, board: &Board) {
        assert!(
            board.rows() == self.rows && board.cols() == self.cols,
            "board is {}x{} but the brain expects {}x{}",
            board.rows(),
            board.cols(),
            self.rows,
            self.cols
        );
    }
}

#[cfg(test)]
mod tests {
    use gomoku_engine::{Cell, Mark};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn small_params() -> BrainParams {
        BrainParams {
            hidden_layers: 2,
            hidden_neurons: 6,
            ..BrainParams::default()
        }
    }

    #[test]
    fn test_layer_shapes() {
        let brain = Brain::filled(3, 4, &small_params(), 0.0);
        assert_eq!(brain.layer_count(), 3);
        assert_eq!(brain.parameter_count(), 12 * 6 + 6 + 6 * 6 + 6 + 6 * 12 + 12);
        assert_eq!(brain.activate(&Board::new(3, 4)).len(), 12);
    }

    #[test]
    fn test_no_hidden_layers() {
        let params = BrainParams {
            hidden_layers: 0,
            ..BrainParams::default()
        };
        let brain = Brain::filled(2, 2, &params, 0.0);
        assert_eq!(brain.layer_count(), 1);
        assert_eq!(brain.activate(&Board::new(2, 2)), vec![0.0; 4]);
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let a = Brain::random(3, 3, &small_params(), &mut Pcg32::seed_from_u64(7));
        let b = Brain::random(3, 3, &small_params(), &mut Pcg32::seed_from_u64(7));
        let c = Brain::random(3, 3, &small_params(), &mut Pcg32::seed_from_u64(8));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_outputs_bounded_by_output_activation() {
        let mut rng = Pcg32::seed_from_u64(1);
        let brain = Brain::random(3, 3, &small_params(), &mut rng);
        let mut board = Board::new(3, 3);
        board.set(Position::new(0, 0), Cell::Black);
        board.set(Position::new(2, 1), Cell::White);
        for v in brain.activate(&board) {
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_train_one_moves_towards_target() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut brain = Brain::random(3, 3, &small_params(), &mut rng);
        let mut board = Board::new(3, 3);
        board.place(Position::new(1, 1), Mark::Black).unwrap();
        let action = Position::new(0, 2);
        let unit = board.index_of(action);

        for target in [0.8, -0.6] {
            let before = (brain.activate(&board)[unit] - target).abs();
            brain.train_one(&board, action, target, 0.1, 100);
            let after = (brain.activate(&board)[unit] - target).abs();
            assert!(after < before, "target {target}: {before} -> {after}");
        }
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut brain = Brain::random(3, 3, &small_params(), &mut rng);
        let original = brain.clone();
        brain.train_one(&Board::new(3, 3), Position::new(0, 0), 1.0, 1.0, 0);
        assert_eq!(brain, original);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        // Single-iteration update equals -lr * dL/dw for a hidden-layer weight.
        let params = BrainParams {
            hidden_layers: 1,
            hidden_neurons: 3,
            ..BrainParams::default()
        };
        let mut rng = Pcg32::seed_from_u64(11);
        let brain = Brain::random(2, 2, &params, &mut rng);
        let mut board = Board::new(2, 2);
        board.set(Position::new(0, 1), Cell::White);
        board.set(Position::new(1, 0), Cell::Black);
        let action = Position::new(1, 1);
        let unit = board.index_of(action);
        let target = 0.3;

        let loss = |b: &Brain| {
            let y = b.activate(&board)[unit];
            0.5 * (y - target) * (y - target)
        };

        let h = 1e-2;
        let mut plus = brain.clone();
        plus.layers[0].weights[1] += h;
        let mut minus = brain.clone();
        minus.layers[0].weights[1] -= h;
        let numeric = (loss(&plus) - loss(&minus)) / (2.0 * h);

        let lr = 1e-2;
        let mut trained = brain.clone();
        trained.train_one(&board, action, target, lr, 1);
        let analytic = (brain.layers[0].weights[1] - trained.layers[0].weights[1]) / lr;

        assert!(
            (numeric - analytic).abs() < 1e-3,
            "numeric {numeric} vs analytic {analytic}"
        );
    }

    #[test]
    #[should_panic(expected = "brain expects 3x3")]
    fn test_wrong_board_size_panics() {
        let brain = Brain::filled(3, 3, &small_params(), 0.0);
        let _ = brain.activate(&Board::new(4, 4));
    }
}
