use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, bail};
use chrono::Utc;
use gomoku_brain::Brain;
use gomoku_training::trainer::{Trainer, TrainingStats};

use crate::{
    checkpoint::{self, CheckpointMeta},
    config::AppConfig,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Random seed (overrides `run.seed`)
    #[arg(long)]
    seed: Option<u64>,
    /// Number of games in the run (overrides `training.games`)
    #[arg(long)]
    games: Option<usize>,
    /// Checkpoint directory (overrides `checkpoint.dir`)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Continue training from a saved model
    #[arg(long)]
    resume: Option<PathBuf>,
}

/// What a finished run produced.
#[derive(Debug)]
struct TrainSummary {
    final_model: PathBuf,
    games_played: usize,
    stats: TrainingStats,
}

pub(crate) fn run(config: &AppConfig, arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        seed,
        games,
        output_dir,
        resume,
    } = arg;

    let mut config = config.clone();
    if let Some(seed) = seed {
        config.run.seed = *seed;
    }
    if let Some(games) = games {
        config.training.games = *games;
    }
    if let Some(dir) = output_dir {
        config.checkpoint.dir.clone_from(dir);
    }
    config.validate()?;

    let summary = train(&config, resume.as_deref())?;

    eprintln!();
    eprintln!("Training completed");
    eprintln!("  Games played: {}", summary.games_played);
    eprintln!("  Black wins:   {}", summary.stats.black_wins);
    eprintln!("  White wins:   {}", summary.stats.white_wins);
    eprintln!("  Draws:        {}", summary.stats.draws);
    eprintln!("  Illegal:      {}", summary.stats.illegal_moves);
    eprintln!("  Batches:      {}", summary.stats.batches);
    eprintln!("  Model:        {}", summary.final_model.display());

    Ok(())
}

fn train(config: &AppConfig, resume: Option<&Path>) -> anyhow::Result<TrainSummary> {
    let dir = &config.checkpoint.dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create checkpoint directory: {}", dir.display()))?;

    let mut trainer = Trainer::new(config.training.clone(), config.run.seed);
    let (mut brain, start) = match resume {
        Some(path) => resume_from(config, path)?,
        None => (
            trainer.init_brain(config.board.rows, config.board.cols, &config.brain),
            0,
        ),
    };
    let total = config.training.games;
    if start >= total {
        log::warn!("model has already played {start} games, nothing left of {total}");
    }

    log::info!(
        "training games {start}..{total} on a {}x{} board, {} parameters, seed {}",
        brain.rows(),
        brain.cols(),
        brain.parameter_count(),
        config.run.seed
    );

    let mut last_saved = None;
    for game in start..total {
        let epsilon = trainer.epsilon_for(game);
        trainer.play_game(&mut brain, epsilon);
        let played = game + 1;

        if played % config.run.report_interval == 0 {
            log::info!(
                "[{played}/{total}] epsilon {epsilon:.3}, pool {}, {}",
                trainer.pool().len(),
                trainer.stats()
            );
        }
        if played % config.checkpoint.interval == 0 {
            save_checkpoint(config, &brain, &trainer, played)?;
            last_saved = Some(played);
        }
    }

    let games_played = start.max(total);
    let final_model = match (last_saved, resume) {
        (Some(n), _) if n == games_played => checkpoint::model_path(dir, n),
        // nothing was played, so the resumed model and its sidecar stay untouched
        (None, Some(path)) if start >= total => path.to_owned(),
        _ => save_checkpoint(config, &brain, &trainer, games_played)?,
    };

    Ok(TrainSummary {
        final_model,
        games_played,
        stats: trainer.stats().clone(),
    })
}

fn resume_from(config: &AppConfig, path: &Path) -> anyhow::Result<(Brain, usize)> {
    let brain =
        Brain::load(path).with_context(|| format!("Failed to resume from {}", path.display()))?;
    if (brain.rows(), brain.cols()) != (config.board.rows, config.board.cols) {
        bail!(
            "model {} is for a {}x{} board, configuration says {}x{}",
            path.display(),
            brain.rows(),
            brain.cols(),
            config.board.rows,
            config.board.cols
        );
    }
    let start = checkpoint::read_meta(path)?.map_or(0, |meta| meta.games_played);
    log::info!("resuming from {} after {start} games", path.display());
    Ok((brain, start))
}

fn save_checkpoint(
    config: &AppConfig,
    brain: &Brain,
    trainer: &Trainer,
    games_played: usize,
) -> anyhow::Result<PathBuf> {
    let meta = CheckpointMeta {
        saved_at: Utc::now(),
        games_played,
        seed: config.run.seed,
        stats: trainer.stats().clone(),
    };
    checkpoint::save(&config.checkpoint.dir, brain, &meta)
}
