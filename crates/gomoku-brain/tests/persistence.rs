use std::fs;

use gomoku_brain::{Activation, Brain, BrainError, BrainParams};
use gomoku_engine::{Board, Mark, Position};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

fn params() -> BrainParams {
    BrainParams {
        hidden_layers: 2,
        hidden_neurons: 16,
        hidden_activation: Activation::Tanh,
        output_activation: Activation::Tanh,
    }
}

/// Boards with a few random stones, always including the empty board.
fn battery(rng: &mut Pcg32, rows: usize, cols: usize) -> Vec<Board> {
    let mut boards = vec![Board::new(rows, cols)];
    for stones in 1..8 {
        let mut board = Board::new(rows, cols);
        for i in 0..stones {
            let pos = Position::new(rng.random_range(0..rows), rng.random_range(0..cols));
            let mark = if i % 2 == 0 { Mark::Black } else { Mark::White };
            let _ = board.place(pos, mark);
        }
        boards.push(board);
    }
    boards
}

#[test]
fn test_save_load_preserves_activations() {
    let mut rng = Pcg32::seed_from_u64(2024);
    let mut brain = Brain::random(5, 5, &params(), &mut rng);
    // move the parameters away from their initial values
    brain.train_one(&Board::new(5, 5), Position::new(2, 2), 0.7, 0.3, 5);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    brain.save(&path).unwrap();
    let loaded = Brain::load(&path).unwrap();

    assert_eq!(loaded.rows(), 5);
    assert_eq!(loaded.cols(), 5);
    assert_eq!(loaded.parameter_count(), brain.parameter_count());
    for board in battery(&mut rng, 5, 5) {
        let expected = brain.activate(&board);
        let actual = loaded.activate(&board);
        for (e, a) in expected.iter().zip(&actual) {
            assert!((e - a).abs() <= 1e-6, "{e} vs {a}");
        }
    }
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Brain::load(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, BrainError::Open { .. }));
}

#[test]
fn test_load_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{\"format\": \"gomoku-brain\", \"version\": 1").unwrap();
    let err = Brain::load(&path).unwrap_err();
    assert!(matches!(err, BrainError::Decode { .. }));
}

#[test]
fn test_load_rejects_version_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    Brain::filled(2, 2, &params(), 0.1).save(&path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    fs::write(&path, text.replace("\"version\":1", "\"version\":7")).unwrap();

    let err = Brain::load(&path).unwrap_err();
    assert!(matches!(err, BrainError::Version { found: 7, .. }));
    assert_eq!(
        err.to_string(),
        "unsupported model version 7 (expected 1)"
    );
}

#[test]
fn test_repeated_training_converges() {
    let mut rng = Pcg32::seed_from_u64(9);
    let mut brain = Brain::random(4, 4, &params(), &mut rng);
    let mut board = Board::new(4, 4);
    board.place(Position::new(0, 0), Mark::Black).unwrap();
    board.place(Position::new(3, 3), Mark::White).unwrap();
    let action = Position::new(1, 2);
    let unit = board.index_of(action);

    brain.train_one(&board, action, -0.5, 0.05, 400);
    assert!((brain.activate(&board)[unit] + 0.5).abs() < 0.05);
}
