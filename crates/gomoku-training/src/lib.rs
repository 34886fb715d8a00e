//! Self-play Q-learning for the gomoku [`Brain`](gomoku_brain::Brain).
//!
//! A single network plays both colors. Every half-move is recorded as a
//! [`Transition`](self_play::Transition) in a fixed-capacity
//! [`ReplayPool`](replay_pool::ReplayPool); once the pool holds enough records the
//! [`Trainer`](trainer::Trainer) withdraws a batch and pulls the network's score for each
//! played cell towards its temporal-difference target.
//!
//! # Training loop
//!
//! ```text
//! normalized board ──activate──▶ epsilon-greedy move
//!        ▲                              │
//!        │                              ▼
//!   Brain::train_one           oracle verdict + rewards
//!        ▲                              │
//!        │                              ▼
//!   Q-learning target ◀──withdraw── ReplayPool
//! ```
//!
//! # Rewards
//!
//! | Verdict   | Mover | Previous mover |
//! |-----------|-------|----------------|
//! | continue  | 0, with next state | - |
//! | illegal   | lose  | - |
//! | win       | win   | lose |
//! | draw      | draw  | draw |
//!
//! # Determinism
//!
//! The [`Trainer`](trainer::Trainer) owns the only random number generator of a run
//! (a seeded `Pcg32`), used for network initialization, exploration and batch sampling.
//! The same seed and parameters reproduce a run exactly.
//!
//! # Example
//!
//! ```
//! use gomoku_brain::BrainParams;
//! use gomoku_training::trainer::{Trainer, TrainingParams};
//!
//! let params = TrainingParams {
//!     games: 2,
//!     pool_capacity: 64,
//!     training_threshold: 32,
//!     batch_size: 8,
//!     train_iterations: 2,
//!     learning_rate: 0.1,
//!     ..TrainingParams::default()
//! };
//! let brain_params = BrainParams { hidden_layers: 1, hidden_neurons: 16, ..BrainParams::default() };
//!
//! let mut trainer = Trainer::new(params, 42);
//! let mut brain = trainer.init_brain(7, 7, &brain_params);
//! for game in 0..trainer.params().games {
//!     let epsilon = trainer.epsilon_for(game);
//!     trainer.play_game(&mut brain, epsilon);
//! }
//! assert_eq!(trainer.stats().games, 2);
//! ```

pub mod replay_pool;
pub mod self_play;
pub mod trainer;
