use crate::core::{Board, Mark, Position};

use super::oracle::{self, MoveOutcome};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::IsVariant)]
pub enum GameResult {
    /// The mark completed five in a row.
    Won(Mark),
    Draw,
    /// The mark played on an occupied cell and lost.
    Forfeited(Mark),
}

impl GameResult {
    #[must_use]
    pub const fn winner(self) -> Option<Mark> {
        match self {
            GameResult::Won(mark) => Some(mark),
            GameResult::Forfeited(mark) => Some(mark.opponent()),
            GameResult::Draw => None,
        }
    }
}

/// A single game: one canonical true-color board plus the side to move.
///
/// The network always plays white, so callers query it with
/// [`normalized_board`](Self::normalized_board), which is derived from the canonical
/// board on demand instead of being kept as a second mirrored copy.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    to_move: Mark,
    moves: Vec<Position>,
    result: Option<GameResult>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Board::standard())
    }
}

impl Game {
    /// Starts a game on `board` with black to move.
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            board,
            to_move: Mark::Black,
            moves: vec![],
            result: None,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Legal moves played so far, in order.
    #[must_use]
    pub fn moves(&self) -> &[Position] {
        &self.moves
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.result
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// The board from the side to move's perspective, where it plays white.
    #[must_use]
    pub fn normalized_board(&self) -> Board {
        self.board.viewed_by(self.to_move)
    }

    /// Plays `pos` for the side to move.
    ///
    /// The move is judged on the normalized board with the mover as white. A win is
    /// reported in true colors. An illegal move leaves the board untouched and ends the
    /// game. Otherwise the stone is placed, and on [`MoveOutcome::Continue`] the turn
    /// passes to the opponent.
    ///
    /// # Panics
    ///
    /// Panics if the game is already over or `pos` is outside the board.
    pub fn play(&mut self, pos: Position) -> MoveOutcome {
        assert!(self.result.is_none(), "game is already over");
        let mover = self.to_move;

        let outcome = match oracle::evaluate(&self.normalized_board(), pos, Mark::White) {
            MoveOutcome::Win(_) => MoveOutcome::Win(mover),
            outcome => outcome,
        };

        if outcome.is_illegal() {
            self.result = Some(GameResult::Forfeited(mover));
            return outcome;
        }

        self.board.set(pos, mover.into());
        self.moves.push(pos);
        if outcome.is_terminal() {
            self.result = match outcome {
                MoveOutcome::Win(mark) => Some(GameResult::Won(mark)),
                _ => Some(GameResult::Draw),
            };
        } else {
            self.to_move = mover.opponent();
        }
        outcome
    }
}
