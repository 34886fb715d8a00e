//! Game rules built on top of the [`core`](crate::core) data structures.
//!
//! - [`evaluate`] - the terminal-state oracle: a pure function of (board, move, mark)
//! - [`Game`] - a running game with a canonical board, side to move and move history
//!
//! # Example
//!
//! ```
//! use gomoku_engine::{Game, MoveOutcome, Position};
//!
//! let mut game = Game::default();
//! assert_eq!(game.play(Position::new(7, 7)), MoveOutcome::Continue);
//!
//! // Playing on an occupied cell ends the game with a loss for the mover
//! assert_eq!(game.play(Position::new(7, 7)), MoveOutcome::Illegal);
//! assert!(game.is_over());
//! ```

pub use self::{game::*, oracle::*};

mod game;
mod oracle;
