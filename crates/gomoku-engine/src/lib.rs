//! Board representation and rules for five-in-a-row (gomoku).
//!
//! - [`core`] - cells, marks, positions and the [`Board`] grid
//! - [`engine`] - the terminal-state oracle ([`evaluate`]) and [`Game`], which tracks
//!   one canonical board plus the side to move

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("cell at {position} is already occupied")]
pub struct CellOccupiedError {
    pub position: Position,
}

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ParsePositionError {
    #[display("expected two coordinates separated by whitespace or a comma, got {input:?}")]
    Shape { input: String },
    #[display("invalid coordinate {input:?}")]
    Coordinate {
        input: String,
        source: std::num::ParseIntError,
    },
}
