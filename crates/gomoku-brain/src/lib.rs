//! Hand-rolled feed-forward network used as the Q-function of the gomoku player.
//!
//! The [`Brain`] maps a board (one input per cell) to one desirability score per cell.
//! It is trained one example at a time: [`Brain::train_one`] pulls a single output unit
//! towards a target value with plain gradient descent, repeating the step a fixed number
//! of times. There is no batching and no optimizer state.
//!
//! # Architecture
//!
//! ```text
//! board (rows × cols codes)
//!     ↓ fully connected, hidden activation
//! hidden layer × `hidden_layers` (`hidden_neurons` each)
//!     ↓ fully connected, output activation
//! scores (rows × cols)
//! ```
//!
//! # Persistence
//!
//! [`Brain::save`] and [`Brain::load`] round-trip every parameter exactly through a
//! versioned JSON document. Loading validates the document before any inference can
//! happen, so a malformed file surfaces as a [`BrainError`] to the caller.
//!
//! # Example
//!
//! ```
//! use gomoku_brain::{Brain, BrainParams};
//! use gomoku_engine::{Board, Position};
//!
//! let params = BrainParams { hidden_layers: 1, hidden_neurons: 8, ..BrainParams::default() };
//! let mut brain = Brain::filled(3, 3, &params, 0.0);
//! let board = Board::new(3, 3);
//!
//! let before = brain.activate(&board)[4];
//! brain.train_one(&board, Position::new(1, 1), 0.5, 0.1, 20);
//! let after = brain.activate(&board)[4];
//! assert!((after - 0.5).abs() < (before - 0.5).abs());
//! ```

use std::{io, path::PathBuf};

pub use self::{activation::*, brain::*};

mod activation;
mod brain;
mod layer;
mod model_file;

/// Errors raised while saving or loading a [`Brain`].
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum BrainError {
    #[display("failed to open model file {}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[display("failed to create model file {}", path.display())]
    Create { path: PathBuf, source: io::Error },
    #[display("failed to encode model")]
    Encode { source: serde_json::Error },
    #[display("malformed model data")]
    Decode { source: serde_json::Error },
    #[display("not a brain model (format tag {found:?})")]
    Format { found: String },
    #[display("unsupported model version {found} (expected {expected})")]
    Version { found: u32, expected: u32 },
    #[display("inconsistent model shape: {reason}")]
    Shape { reason: String },
}
