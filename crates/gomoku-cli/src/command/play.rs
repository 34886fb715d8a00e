use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, bail};
use gomoku_brain::Brain;
use gomoku_engine::{Board, Cell, Game, GameResult, Mark, Position};
use gomoku_training::self_play;
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Path to the model file (JSON format)
    model_path: PathBuf,
    /// Play this color yourself; the model plays both sides if omitted
    #[arg(long)]
    human: Option<Mark>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg { model_path, human } = arg;
    let brain = Brain::load(model_path)
        .with_context(|| format!("Failed to load model: {}", model_path.display()))?;
    log::info!(
        "loaded {}x{} model from {}",
        brain.rows(),
        brain.cols(),
        model_path.display()
    );

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    play_game(&brain, *human, stdin, stdout)?;
    Ok(())
}

/// Plays one game with exploration disabled, reading the human's moves from `input`.
fn play_game<R, W>(
    brain: &Brain,
    human: Option<Mark>,
    mut input: R,
    mut out: W,
) -> anyhow::Result<GameResult>
where
    R: BufRead,
    W: Write,
{
    let mut game = Game::new(Board::new(brain.rows(), brain.cols()));
    // only consulted when exploring, which never happens at epsilon 0
    let mut rng = Pcg32::seed_from_u64(0);

    let result = loop {
        let mover = game.to_move();
        let pos = if human == Some(mover) {
            write!(out, "{}", game.board())?;
            read_move(game.board(), mover, &mut input, &mut out)?
        } else {
            self_play::select_action(brain, &game.normalized_board(), 0.0, &mut rng)
        };
        writeln!(out, "{mover}: {pos}")?;
        game.play(pos);
        if let Some(result) = game.result() {
            break result;
        }
    };

    write!(out, "{}", game.board())?;
    match result {
        GameResult::Won(mark) => writeln!(out, "{mark} wins")?,
        GameResult::Draw => writeln!(out, "Draw")?,
        GameResult::Forfeited(mark) => {
            writeln!(out, "{mark} played an occupied cell, {} wins", mark.opponent())?;
        }
    }
    out.flush()?;
    Ok(result)
}

/// Prompts until the human enters an empty cell as `row col`.
fn read_move<R, W>(board: &Board, mark: Mark, input: &mut R, out: &mut W) -> anyhow::Result<Position>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    loop {
        write!(out, "{mark} to move (row col): ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            bail!("input closed before the game ended");
        }
        let pos = match line.trim().parse::<Position>() {
            Ok(pos) => pos,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        match board.get(pos) {
            Some(Cell::Empty) => return Ok(pos),
            Some(_) => writeln!(out, "{pos} is already occupied")?,
            None => writeln!(
                out,
                "{pos} is outside the {}x{} board",
                board.rows(),
                board.cols()
            )?,
        }
    }
}

#[cfg(test)]
mod tests {
    use gomoku_brain::BrainParams;

    use super::*;

    fn flat_brain(rows: usize, cols: usize) -> Brain {
        let params = BrainParams {
            hidden_layers: 0,
            ..BrainParams::default()
        };
        Brain::filled(rows, cols, &params, 0.0)
    }

    #[test]
    fn test_self_play_fills_in_row_major_order() {
        // a constant network always takes the first empty cell
        let brain = flat_brain(1, 6);
        let mut out = Vec::new();
        let result = play_game(&brain, None, io::empty(), &mut out).unwrap();
        assert_eq!(result, GameResult::Draw);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Black: 0 0\nWhite: 0 1\nBlack: 0 2\n"));
        assert!(text.contains("  *  O  *  O  *  O\n"));
        assert!(text.ends_with("Draw\n"));
    }

    #[test]
    fn test_human_moves_are_validated() {
        let brain = flat_brain(1, 6);
        // white: bad syntax, occupied, off-board, then fine
        let input = "x\n0 0\n0 9\n0 5\n0 4\n0 3\n";
        let mut out = Vec::new();
        let result = play_game(&brain, Some(Mark::White), input.as_bytes(), &mut out).unwrap();
        assert_eq!(result, GameResult::Draw);

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0 0 is already occupied"));
        assert!(text.contains("0 9 is outside the 1x6 board"));
        assert!(text.contains("White: 0 5\n"));
        assert!(text.contains("Black: 0 1\n"));
    }

    #[test]
    fn test_human_input_closed() {
        let brain = flat_brain(3, 3);
        let mut out = Vec::new();
        assert!(play_game(&brain, Some(Mark::Black), io::empty(), &mut out).is_err());
    }
}
