use std::iter;

use crate::core::{Board, Cell, Mark, Position};

/// Number of stones in a row needed to win.
pub const WIN_LENGTH: usize = 5;

/// Line directions checked through the played cell: horizontal, vertical, diagonal (↘)
/// and anti-diagonal (↙). Each is scanned both ways.
const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Result of evaluating a single move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The game goes on.
    Continue,
    /// The move completed a run of [`WIN_LENGTH`] or more for the given mark.
    Win(Mark),
    /// The move filled the last empty cell without winning.
    Draw,
    /// The target cell was already occupied. The mover loses.
    Illegal,
}

impl MoveOutcome {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, MoveOutcome::Continue)
    }
}

/// Decides what happens when `mark` plays `last_move` on `board`.
///
/// `board` is the position *before* the move. Occupying a filled cell is
/// [`MoveOutcome::Illegal`]. Otherwise `last_move` is treated as holding `mark`, and the
/// longest run through it on each axis is compared against [`WIN_LENGTH`]. If there is
/// no win and `last_move` was the only empty cell, the result is a draw.
///
/// # Panics
///
/// Panics if `last_move` lies outside the board.
///
/// # Example
///
/// ```
/// use gomoku_engine::{evaluate, Board, Mark, MoveOutcome, Position};
///
/// let mut board = Board::standard();
/// for col in 0..4 {
///     board.place(Position::new(3, col), Mark::Black).unwrap();
/// }
///
/// assert_eq!(evaluate(&board, Position::new(3, 4), Mark::Black), MoveOutcome::Win(Mark::Black));
/// assert_eq!(evaluate(&board, Position::new(3, 4), Mark::White), MoveOutcome::Continue);
/// assert_eq!(evaluate(&board, Position::new(3, 0), Mark::White), MoveOutcome::Illegal);
/// ```
#[must_use]
pub fn evaluate(board: &Board, last_move: Position, mark: Mark) -> MoveOutcome {
    if !board[last_move].is_empty() {
        return MoveOutcome::Illegal;
    }

    if AXES
        .iter()
        .any(|&(d_row, d_col)| run_length(board, last_move, mark, d_row, d_col) >= WIN_LENGTH)
    {
        return MoveOutcome::Win(mark);
    }

    // `last_move` itself is still empty on the pre-move board
    if board.empty_count() == 1 {
        return MoveOutcome::Draw;
    }

    MoveOutcome::Continue
}

/// Length of the run of `mark` through `pos` along one axis, counting `pos` itself.
#[must_use]
pub fn run_length(board: &Board, pos: Position, mark: Mark, d_row: isize, d_col: isize) -> usize {
    1 + count_towards(board, pos, mark, d_row, d_col) + count_towards(board, pos, mark, -d_row, -d_col)
}

fn count_towards(board: &Board, start: Position, mark: Mark, d_row: isize, d_col: isize) -> usize {
    let target = Cell::from(mark);
    iter::successors(start.offset(d_row, d_col), |p| p.offset(d_row, d_col))
        .take_while(|&p| board.get(p) == Some(target))
        .count()
}
