//! Q-learning over the replay pool.
//!
//! The [`Trainer`] owns the pool and the run's only random number generator; the
//! [`Brain`] stays with the caller and is lent for each call.

use gomoku_brain::{Brain, BrainParams};
use gomoku_engine::{Board, GameResult, Mark, MoveOutcome, Position};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    replay_pool::{ReplayPool, SamplingPolicy},
    self_play::{SelfPlayGame, Step, Transition},
};

/// Exploration rate over a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Exploration {
    /// Decays from 1 towards 0: `(total - game) / total`.
    #[default]
    Linear,
    Constant { epsilon: f32 },
}

impl Exploration {
    /// Epsilon for the 0-based `game` of a run of `total` games.
    #[must_use]
    pub fn epsilon(self, game: usize, total: usize) -> f32 {
        match self {
            Exploration::Linear => {
                if total == 0 {
                    return 0.0;
                }
                #[expect(clippy::cast_precision_loss)]
                let e = total.saturating_sub(game) as f32 / total as f32;
                e.clamp(0.0, 1.0)
            }
            Exploration::Constant { epsilon } => epsilon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Number of self-play games in a run.
    pub games: usize,
    /// Discount factor applied to the best next-state score.
    pub gamma: f32,
    /// Step size passed to [`Brain::train_one`].
    pub learning_rate: f32,
    /// Gradient iterations per withdrawn transition.
    pub train_iterations: usize,
    pub pool_capacity: usize,
    /// Pool size at which a batch is withdrawn.
    pub training_threshold: usize,
    pub batch_size: usize,
    pub sampling: SamplingPolicy,
    /// Also try a batch once a game has ended.
    pub train_at_game_end: bool,
    pub exploration: Exploration,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            games: 10_000,
            gamma: 0.9,
            learning_rate: 3.0,
            train_iterations: 1000,
            pool_capacity: 508,
            training_threshold: 500,
            batch_size: 50,
            sampling: SamplingPolicy::Random,
            train_at_game_end: true,
            exploration: Exploration::Linear,
        }
    }
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[display(
    "games {games} (black {black_wins}, white {white_wins}, draw {draws}, illegal {illegal_moves}), \
     half-moves {half_moves}, batches {batches}"
)]
pub struct TrainingStats {
    pub games: usize,
    pub black_wins: usize,
    pub white_wins: usize,
    pub draws: usize,
    /// Games that ended on a move to an occupied cell.
    pub illegal_moves: usize,
    pub half_moves: usize,
    pub batches: usize,
    pub transitions: usize,
}

impl TrainingStats {
    fn record_step(&mut self, step: &Step) {
        self.half_moves += 1;
        self.transitions += step.transitions.len();
        if step.outcome.is_illegal() {
            self.illegal_moves += 1;
        }
    }

    fn record_game(&mut self, result: GameResult) {
        self.games += 1;
        match result.winner() {
            Some(Mark::Black) => self.black_wins += 1,
            Some(Mark::White) => self.white_wins += 1,
            None => self.draws += 1,
        }
    }
}

/// Training target for `transition`.
///
/// A game-ending transition is worth its reward. Otherwise the reward is topped up with
/// `gamma` times the best score the network gives any empty cell of the next state.
#[must_use]
pub fn q_target(brain: &Brain, transition: &Transition, gamma: f32) -> f32 {
    let Some(next) = transition.next_state() else {
        return transition.reward();
    };
    let scores = brain.activate(next);
    let best = next
        .empty_positions()
        .map(|pos| scores[next.index_of(pos)])
        .reduce(f32::max);
    match best {
        Some(best) => transition.reward() + gamma * best,
        None => transition.reward(),
    }
}

#[derive(Debug, Clone)]
pub struct Trainer {
    params: TrainingParams,
    pool: ReplayPool<Transition>,
    rng: Pcg32,
    stats: TrainingStats,
}

impl Trainer {
    #[must_use]
    pub fn new(params: TrainingParams, seed: u64) -> Self {
        let pool = ReplayPool::new(params.pool_capacity, params.sampling);
        if params.training_threshold.max(params.batch_size) > params.pool_capacity {
            log::warn!(
                "pool capacity {} is below the training threshold, no batch will be trained",
                params.pool_capacity
            );
        }
        Self {
            params,
            pool,
            rng: Pcg32::seed_from_u64(seed),
            stats: TrainingStats::default(),
        }
    }

    #[must_use]
    pub fn params(&self) -> &TrainingParams {
        &self.params
    }

    #[must_use]
    pub fn pool(&self) -> &ReplayPool<Transition> {
        &self.pool
    }

    #[must_use]
    pub fn stats(&self) -> &TrainingStats {
        &self.stats
    }

    /// Initializes a fresh network from the trainer's generator.
    #[must_use]
    pub fn init_brain(&mut self, rows: usize, cols: usize, params: &BrainParams) -> Brain {
        Brain::random(rows, cols, params, &mut self.rng)
    }

    /// Exploration rate for the 0-based `game` of the configured run.
    #[must_use]
    pub fn epsilon_for(&self, game: usize) -> f32 {
        self.params.exploration.epsilon(game, self.params.games)
    }

    /// Withdraws one batch and trains on it, if the pool is full enough.
    ///
    /// Returns whether a batch was trained.
    pub fn train_batch(&mut self, brain: &mut Brain) -> bool {
        let needed = self.params.training_threshold.max(self.params.batch_size);
        if self.pool.len() < needed {
            return false;
        }
        let batch = self.pool.withdraw(self.params.batch_size, &mut self.rng);
        for transition in &batch {
            let target = q_target(brain, transition, self.params.gamma);
            brain.train_one(
                transition.state(),
                transition.action(),
                target,
                self.params.learning_rate,
                self.params.train_iterations,
            );
        }
        self.stats.batches += 1;
        log::debug!(
            "trained batch {} on {} transitions, {} left in pool",
            self.stats.batches,
            batch.len(),
            self.pool.len()
        );
        true
    }

    /// Lets the network play one half-move, records it and trains if due.
    pub fn half_move(&mut self, game: &mut SelfPlayGame, brain: &mut Brain, epsilon: f32) -> Step {
        let step = game.play_policy(brain, epsilon, &mut self.rng);
        self.absorb(&step, brain);
        step
    }

    /// Plays a caller-chosen move, records it and trains if due.
    pub fn scripted_move(
        &mut self,
        game: &mut SelfPlayGame,
        brain: &mut Brain,
        action: Position,
    ) -> MoveOutcome {
        let step = game.play(action);
        self.absorb(&step, brain);
        step.outcome
    }

    fn absorb(&mut self, step: &Step, brain: &mut Brain) {
        self.stats.record_step(step);
        for transition in &step.transitions {
            self.pool.push(transition.clone());
        }
        self.train_batch(brain);
    }

    /// Plays a whole self-play game on a board matching the network.
    pub fn play_game(&mut self, brain: &mut Brain, epsilon: f32) -> GameResult {
        let mut game = SelfPlayGame::new(Board::new(brain.rows(), brain.cols()));
        let result = loop {
            self.half_move(&mut game, brain, epsilon);
            if let Some(result) = game.game().result() {
                break result;
            }
        };
        self.finish_game(brain, result);
        log::debug!(
            "game {} ended after {} moves: {result:?} (epsilon {epsilon:.3})",
            self.stats.games,
            game.game().moves().len()
        );
        result
    }

    /// Books a finished game and runs the end-of-game batch if enabled.
    pub fn finish_game(&mut self, brain: &mut Brain, result: GameResult) {
        self.stats.record_game(result);
        if self.params.train_at_game_end {
            self.train_batch(brain);
        }
    }
}
