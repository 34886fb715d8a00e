//! Two-sided play on a single network.
//!
//! The network always plays white: every position is shown to it through
//! [`Game::normalized_board`], so one [`Brain`] can play both colors. Each half-move
//! yields up to two [`Transition`]s, one for the mover and, when the game ends, one
//! retrofitted for the previous mover.

use arrayvec::ArrayVec;
use gomoku_brain::Brain;
use gomoku_engine::{Board, Game, Mark, MoveOutcome, Position};
use rand::Rng;

pub const WIN_REWARD: f32 = 1.0;
pub const LOSE_REWARD: f32 = -1.0;
pub const DRAW_REWARD: f32 = 0.0;

/// One recorded half-move, from the mover's point of view.
///
/// `state` and `next_state` are normalized boards. `next_state` is present exactly when
/// the game went on after the move, and is seen by the side that moves next.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    state: Board,
    action: Position,
    next_state: Option<Board>,
    reward: f32,
}

impl Transition {
    /// A move after which the game continues.
    #[must_use]
    pub fn step(state: Board, action: Position, next_state: Board) -> Self {
        Self {
            state,
            action,
            next_state: Some(next_state),
            reward: 0.0,
        }
    }

    /// A move that ended the game for its player with `reward`.
    #[must_use]
    pub fn terminal(state: Board, action: Position, reward: f32) -> Self {
        Self {
            state,
            action,
            next_state: None,
            reward,
        }
    }

    #[must_use]
    pub fn state(&self) -> &Board {
        &self.state
    }

    #[must_use]
    pub fn action(&self) -> Position {
        self.action
    }

    #[must_use]
    pub fn next_state(&self) -> Option<&Board> {
        self.next_state.as_ref()
    }

    #[must_use]
    pub fn reward(&self) -> f32 {
        self.reward
    }

    #[must_use]
    pub fn is_game_end(&self) -> bool {
        self.next_state.is_none()
    }
}

/// Epsilon-greedy choice among the empty cells of a normalized board.
///
/// With probability `epsilon` a uniformly random empty cell is returned. Otherwise the
/// empty cell the network scores highest; ties go to the first cell in row-major order.
///
/// # Panics
///
/// Panics if `epsilon` is outside `[0, 1]` or the board has no empty cell.
pub fn select_action<R>(brain: &Brain, board: &Board, epsilon: f32, rng: &mut R) -> Position
where
    R: Rng + ?Sized,
{
    assert!(
        (0.0..=1.0).contains(&epsilon),
        "epsilon {epsilon} is outside [0, 1]"
    );
    let empty: Vec<Position> = board.empty_positions().collect();
    assert!(!empty.is_empty(), "no empty cell to play");

    if rng.random_bool(f64::from(epsilon)) {
        return empty[rng.random_range(0..empty.len())];
    }

    let scores = brain.activate(board);
    best_empty(board, &empty, &scores)
}

/// Highest-scoring cell of `empty`, first one on ties. NaN scores never win; if every
/// score is NaN the first empty cell is returned.
fn best_empty(board: &Board, empty: &[Position], scores: &[f32]) -> Position {
    let mut best = empty[0];
    let mut best_score = f32::NEG_INFINITY;
    for &pos in empty {
        let score = scores[board.index_of(pos)];
        if score > best_score {
            best = pos;
            best_score = score;
        }
    }
    best
}

/// Result of one half-move.
#[derive(Debug, Clone)]
pub struct Step {
    /// The side that made the move.
    pub mover: Mark,
    pub action: Position,
    pub outcome: MoveOutcome,
    pub transitions: ArrayVec<Transition, 2>,
}

/// A [`Game`] that also remembers what it needs to emit transitions.
#[derive(Debug, Clone)]
pub struct SelfPlayGame {
    game: Game,
    /// Normalized state and action of the last move, kept so that a game-ending reply
    /// can charge its player.
    previous: Option<(Board, Position)>,
}

impl SelfPlayGame {
    #[must_use]
    pub fn new(board: Board) -> Self {
        Self {
            game: Game::new(board),
            previous: None,
        }
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    /// Lets the network pick a move for the side to move and plays it.
    pub fn play_policy<R>(&mut self, brain: &Brain, epsilon: f32, rng: &mut R) -> Step
    where
        R: Rng + ?Sized,
    {
        let action = select_action(brain, &self.game.normalized_board(), epsilon, rng);
        self.play(action)
    }

    /// Plays `action` for the side to move and scores it.
    ///
    /// # Panics
    ///
    /// Panics if the game is already over or `action` is outside the board.
    pub fn play(&mut self, action: Position) -> Step {
        let mover = self.game.to_move();
        let state = self.game.normalized_board();
        let outcome = self.game.play(action);

        let mut transitions = ArrayVec::new();
        match outcome {
            MoveOutcome::Continue => {
                let next_state = self.game.normalized_board();
                transitions.push(Transition::step(state.clone(), action, next_state));
                self.previous = Some((state, action));
            }
            MoveOutcome::Illegal => {
                transitions.push(Transition::terminal(state, action, LOSE_REWARD));
            }
            MoveOutcome::Win(_) => {
                transitions.push(Transition::terminal(state, action, WIN_REWARD));
                if let Some((state, action)) = self.previous.take() {
                    transitions.push(Transition::terminal(state, action, LOSE_REWARD));
                }
            }
            MoveOutcome::Draw => {
                transitions.push(Transition::terminal(state, action, DRAW_REWARD));
                if let Some((state, action)) = self.previous.take() {
                    transitions.push(Transition::terminal(state, action, DRAW_REWARD));
                }
            }
        }

        Step {
            mover,
            action,
            outcome,
            transitions,
        }
    }
}

#[cfg(test)]
mod tests {
    use gomoku_brain::BrainParams;
    use gomoku_engine::Cell;
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn tiny_params() -> BrainParams {
        BrainParams {
            hidden_layers: 0,
            ..BrainParams::default()
        }
    }

    /// Brain with no hidden layer whose output for `favorite` is pushed up by its bias.
    fn brain_favoring(rows: usize, cols: usize, favorite: usize) -> Brain {
        let mut brain = Brain::filled(rows, cols, &tiny_params(), 0.0);
        let board = Board::new(rows, cols);
        let pos = board.position_at(favorite);
        brain.train_one(&board, pos, 0.9, 0.5, 50);
        brain
    }

    #[test]
    fn test_greedy_picks_best_empty_cell() {
        let brain = brain_favoring(3, 3, 4);
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            select_action(&brain, &Board::new(3, 3), 0.0, &mut rng),
            Position::new(1, 1)
        );
    }

    #[test]
    fn test_greedy_skips_occupied_best_cell() {
        let brain = brain_favoring(3, 3, 4);
        let mut board = Board::new(3, 3);
        board.set(Position::new(1, 1), Cell::Black);
        let mut rng = Pcg32::seed_from_u64(0);
        // all remaining scores are equal, so the first empty cell wins the tie
        assert_eq!(
            select_action(&brain, &board, 0.0, &mut rng),
            Position::new(0, 0)
        );
    }

    #[test]
    fn test_greedy_tie_goes_to_lowest_index() {
        let brain = Brain::filled(3, 3, &tiny_params(), 0.0);
        let mut board = Board::new(3, 3);
        board.set(Position::new(0, 0), Cell::White);
        board.set(Position::new(0, 1), Cell::Black);
        let mut rng = Pcg32::seed_from_u64(0);
        assert_eq!(
            select_action(&brain, &board, 0.0, &mut rng),
            Position::new(0, 2)
        );
    }

    #[test]
    fn test_greedy_ignores_nan_scores() {
        let board = Board::new(1, 4);
        let empty: Vec<Position> = board.empty_positions().collect();
        let scores = [f32::NAN, -0.5, 0.25, f32::NAN];
        assert_eq!(best_empty(&board, &empty, &scores), Position::new(0, 2));

        let scores = [f32::NAN; 4];
        assert_eq!(best_empty(&board, &empty, &scores), Position::new(0, 0));

        let scores = [f32::NEG_INFINITY, f32::NAN, f32::NEG_INFINITY, -1.0];
        assert_eq!(best_empty(&board, &empty, &scores), Position::new(0, 3));
    }

    #[test]
    fn test_random_choice_is_always_empty() {
        let brain = Brain::filled(3, 3, &tiny_params(), 0.0);
        let mut board = Board::new(3, 3);
        for col in 0..3 {
            board.set(Position::new(0, col), Cell::Black);
            board.set(Position::new(2, col), Cell::White);
        }
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..50 {
            let pos = select_action(&brain, &board, 1.0, &mut rng);
            assert_eq!(pos.row, 1);
        }
    }

    #[test]
    #[should_panic(expected = "epsilon 1.5 is outside [0, 1]")]
    fn test_epsilon_out_of_range() {
        let brain = Brain::filled(3, 3, &tiny_params(), 0.0);
        let _ = select_action(
            &brain,
            &Board::new(3, 3),
            1.5,
            &mut Pcg32::seed_from_u64(0),
        );
    }

    #[test]
    fn test_continue_emits_step_for_next_player() {
        let mut game = SelfPlayGame::new(Board::new(5, 5));
        let step = game.play(Position::new(2, 2));
        assert_eq!(step.mover, Mark::Black);
        assert_eq!(step.outcome, MoveOutcome::Continue);
        assert_eq!(step.transitions.len(), 1);

        let t = &step.transitions[0];
        assert!(!t.is_game_end());
        assert_eq!(t.reward(), 0.0);
        assert!(t.state().is_blank());
        // white moves next, so black's stone shows as the opponent's
        assert_eq!(t.next_state().unwrap()[Position::new(2, 2)], Cell::Black);

        let step = game.play(Position::new(0, 0));
        let t = &step.transitions[0];
        // black's own stone shows as white once it is black to move
        assert_eq!(t.next_state().unwrap()[Position::new(2, 2)], Cell::White);
        assert_eq!(t.next_state().unwrap()[Position::new(0, 0)], Cell::Black);
    }

    #[test]
    fn test_illegal_move_charges_only_mover() {
        let mut game = SelfPlayGame::new(Board::new(5, 5));
        game.play(Position::new(2, 2));
        let step = game.play(Position::new(2, 2));
        assert_eq!(step.outcome, MoveOutcome::Illegal);
        assert_eq!(step.transitions.len(), 1);
        assert!(step.transitions[0].is_game_end());
        assert_eq!(step.transitions[0].reward(), LOSE_REWARD);
        assert!(game.is_over());
    }

    #[test]
    fn test_win_retrofits_loss() {
        let mut game = SelfPlayGame::new(Board::new(6, 6));
        for col in 0..4 {
            game.play(Position::new(0, col));
            game.play(Position::new(5, col));
        }
        let step = game.play(Position::new(0, 4));
        assert_eq!(step.outcome, MoveOutcome::Win(Mark::Black));
        assert_eq!(step.transitions.len(), 2);

        let (winner, loser) = (&step.transitions[0], &step.transitions[1]);
        assert_eq!(winner.action(), Position::new(0, 4));
        assert_eq!(winner.reward(), WIN_REWARD);
        assert!(winner.is_game_end());
        assert_eq!(loser.action(), Position::new(5, 3));
        assert_eq!(loser.reward(), LOSE_REWARD);
        assert!(loser.is_game_end());
    }

    #[test]
    fn test_draw_rewards_both_sides() {
        // 1x2 board: black, then white fills the last cell
        let mut game = SelfPlayGame::new(Board::new(1, 2));
        game.play(Position::new(0, 0));
        let step = game.play(Position::new(0, 1));
        assert_eq!(step.outcome, MoveOutcome::Draw);
        let rewards: Vec<f32> = step.transitions.iter().map(Transition::reward).collect();
        assert_eq!(rewards, vec![DRAW_REWARD, DRAW_REWARD]);
        assert_eq!(step.transitions[1].action(), Position::new(0, 0));
    }
}
